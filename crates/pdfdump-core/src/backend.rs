use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text from page {page}: {message}")]
    Extraction { page: usize, message: String },
    #[error("page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },
    #[error("failed to read PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors only open documents; page iteration, banners and output
/// writing live in [`crate::pipeline`], so backends can be swapped without
/// touching the surrounding concatenation logic.
pub trait PdfBackend: Send + Sync {
    /// Short identifier used on the command line and in output file names.
    fn name(&self) -> &'static str;

    /// Open the document at `path` for page-by-page extraction.
    ///
    /// The returned document is closed when dropped.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError>;
}

/// An opened document: an ordered sequence of pages.
pub trait PdfDocument {
    fn page_count(&self) -> usize;

    /// Extract the text of the page at 0-based `index`.
    ///
    /// Returns `Ok(None)` when the page yields no text at all. Whitespace
    /// is text and comes back as-is.
    fn extract_page_text(&self, index: usize) -> Result<Option<String>, BackendError>;
}

/// Normalize raw backend output: strip trailing line breaks, then map an
/// empty result to `None`.
pub fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim_end_matches(['\n', '\r']);
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}

/// Ensure `index` addresses a page of a `count`-page document.
pub fn check_page_index(index: usize, count: usize) -> Result<(), BackendError> {
    if index < count {
        Ok(())
    } else {
        Err(BackendError::PageOutOfRange {
            page: index + 1,
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_empty_text_is_no_text() {
        assert_eq!(non_empty(String::new()), None);
        assert_eq!(non_empty("\n\r\n".to_string()), None);
        assert_eq!(non_empty("   ".to_string()), Some("   ".to_string()));
        assert_eq!(non_empty(" \n\t\n".to_string()), Some(" \n\t".to_string()));
        assert_eq!(non_empty(" a ".to_string()), Some(" a ".to_string()));
    }

    #[test]
    fn trailing_line_breaks_are_stripped() {
        assert_eq!(non_empty("one\ntwo\n\n".to_string()), Some("one\ntwo".to_string()));
        assert_eq!(non_empty("line\r\n".to_string()), Some("line".to_string()));
        assert_eq!(non_empty("\nlead".to_string()), Some("\nlead".to_string()));
    }

    #[test]
    fn page_index_bounds() {
        assert!(check_page_index(0, 1).is_ok());
        let err = check_page_index(3, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "page 4 out of range (document has 3 pages)"
        );
    }
}
