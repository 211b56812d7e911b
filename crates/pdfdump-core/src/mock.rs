//! In-memory backend for testing the pipeline without a PDF library.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{BackendError, PdfBackend, PdfDocument, check_page_index, non_empty};

/// What a single mock page returns when extracted.
#[derive(Clone, Debug)]
pub enum MockPage {
    Text(String),
    /// The page yields no text.
    Empty,
    /// Extraction of this page fails.
    Error(String),
}

/// A hand-rolled mock implementing [`PdfBackend`] for tests.
///
/// Every opened document serves the same fixed pages. Open documents and
/// page requests are counted so tests can check that documents are closed
/// and that extraction stops at the first failure.
pub struct MockBackend {
    name: &'static str,
    pages: Arc<Vec<MockPage>>,
    open_error: Option<String>,
    open_documents: Arc<AtomicUsize>,
    pages_requested: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn new(pages: Vec<MockPage>) -> Self {
        Self {
            name: "mock",
            pages: Arc::new(pages),
            open_error: None,
            open_documents: Arc::new(AtomicUsize::new(0)),
            pages_requested: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A mock with pages `"Page 1 text"`, `"Page 2 text"`, ...
    pub fn with_text_pages(count: usize) -> Self {
        Self::new(
            (1..=count)
                .map(|n| MockPage::Text(format!("Page {n} text")))
                .collect(),
        )
    }

    /// A mock whose `open` always fails with `message`.
    pub fn failing_open(message: &str) -> Self {
        let mut backend = Self::new(Vec::new());
        backend.open_error = Some(message.to_string());
        backend
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Documents opened and not yet dropped.
    pub fn open_documents(&self) -> usize {
        self.open_documents.load(Ordering::SeqCst)
    }

    /// Total `extract_page_text` calls across all documents.
    pub fn pages_requested(&self) -> usize {
        self.pages_requested.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MockBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    fn open(&self, _path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        if let Some(ref message) = self.open_error {
            return Err(BackendError::Open(message.clone()));
        }
        self.open_documents.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDocument {
            pages: Arc::clone(&self.pages),
            open_documents: Arc::clone(&self.open_documents),
            pages_requested: Arc::clone(&self.pages_requested),
        }))
    }
}

struct MockDocument {
    pages: Arc<Vec<MockPage>>,
    open_documents: Arc<AtomicUsize>,
    pages_requested: Arc<AtomicUsize>,
}

impl PdfDocument for MockDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_page_text(&self, index: usize) -> Result<Option<String>, BackendError> {
        check_page_index(index, self.pages.len())?;
        self.pages_requested.fetch_add(1, Ordering::SeqCst);
        match &self.pages[index] {
            MockPage::Text(text) => Ok(non_empty(text.clone())),
            MockPage::Empty => Ok(None),
            MockPage::Error(message) => Err(BackendError::Extraction {
                page: index + 1,
                message: message.clone(),
            }),
        }
    }
}

impl Drop for MockDocument {
    fn drop(&mut self) {
        self.open_documents.fetch_sub(1, Ordering::SeqCst);
    }
}
