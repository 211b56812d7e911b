use std::path::Path;

use mupdf::{Document, TextPageFlags};

use pdfdump_core::backend::{BackendError, PdfBackend, PdfDocument, check_page_index, non_empty};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island. It isolates the mupdf dependency
/// (which is AGPL-3.0) so that builds without the `mupdf` feature of the
/// CLI do not transitively depend on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn name(&self) -> &'static str {
        "mupdf"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::Open("invalid path encoding".into()))?;

        let document = Document::open(path_str).map_err(|e| BackendError::Open(e.to_string()))?;
        let page_count = document
            .page_count()
            .map_err(|e| BackendError::Open(e.to_string()))?;

        Ok(Box::new(MupdfDocument {
            document,
            page_count: usize::try_from(page_count).unwrap_or(0),
        }))
    }
}

struct MupdfDocument {
    document: Document,
    page_count: usize,
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn extract_page_text(&self, index: usize) -> Result<Option<String>, BackendError> {
        check_page_index(index, self.page_count)?;
        let page_err = |e: mupdf::Error| BackendError::Extraction {
            page: index + 1,
            message: e.to_string(),
        };

        let page_no = i32::try_from(index).map_err(|_| BackendError::PageOutOfRange {
            page: index + 1,
            count: self.page_count,
        })?;
        let page = self.document.load_page(page_no).map_err(page_err)?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(page_err)?;

        // Block/line iteration keeps MuPDF's reading order, one line per row.
        let mut text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                text.push_str(&line_text);
                text.push('\n');
            }
        }

        Ok(non_empty(text))
    }
}
