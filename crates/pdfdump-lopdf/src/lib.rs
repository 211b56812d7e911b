//! Pure-Rust extraction backend built on `lopdf`.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document, ObjectId};

use pdfdump_core::backend::{BackendError, PdfBackend, PdfDocument, check_page_index, non_empty};

/// lopdf-based implementation of [`PdfBackend`].
///
/// Needs no native libraries. Text comes from the page content streams'
/// text-showing operators decoded with each font's declared encoding, so
/// layout is coarser than MuPDF's: one line per text object.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        let bytes = std::fs::read(path)?;
        let document =
            Document::load_mem(&bytes).map_err(|e| BackendError::Open(e.to_string()))?;
        if document.trailer.get(b"Encrypt").is_ok() {
            return Err(BackendError::Open("document is encrypted".into()));
        }
        let pages = document.get_pages();
        tracing::debug!(pages = pages.len(), "lopdf page tree loaded");

        Ok(Box::new(LopdfDocument {
            page_numbers: pages.keys().copied().collect(),
            pages,
            document,
        }))
    }
}

struct LopdfDocument {
    document: Document,
    /// Page tree keyed by 1-based page number.
    pages: BTreeMap<u32, ObjectId>,
    /// Page numbers in document order.
    page_numbers: Vec<u32>,
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_page_text(&self, index: usize) -> Result<Option<String>, BackendError> {
        check_page_index(index, self.page_numbers.len())?;
        let page_number = self.page_numbers[index];

        let text = self
            .document
            .extract_text(&[page_number])
            .map_err(|e| BackendError::Extraction {
                page: index + 1,
                message: e.to_string(),
            })?;

        Ok(non_empty(text))
    }
}
