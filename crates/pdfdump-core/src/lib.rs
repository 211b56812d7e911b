use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

pub mod backend;
pub mod compare;
pub mod config_file;
pub mod layout;
pub mod mock;
pub mod pipeline;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend, PdfDocument};
pub use compare::{Comparison, PageRow, backend_output_path, compare_backends};
pub use layout::{BannerStyle, DEFAULT_PLACEHOLDER, EmptyPage, Layout};
pub use pipeline::{
    DEFAULT_PREVIEW_CHARS, InputInfo, extract_document, inspect_input, preview, run, write_output,
};

/// Per-page outcome of an extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// 1-based page number, as printed in the banner.
    pub number: usize,
    /// Characters of extracted text (0 when the page was empty).
    pub chars: usize,
    pub empty: bool,
}

/// Result of extracting one document.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub backend: String,
    pub input: PathBuf,
    pub page_count: usize,
    pub pages: Vec<PageRecord>,
    /// The full output buffer: banners and page text in document order.
    #[serde(skip)]
    pub text: String,
}

impl Extraction {
    pub fn empty_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.empty).count()
    }

    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.chars).sum()
    }
}

/// Progress events emitted while a document is processed.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Opened { page_count: usize },
    Page { record: PageRecord },
    Written { path: PathBuf, bytes: usize },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
