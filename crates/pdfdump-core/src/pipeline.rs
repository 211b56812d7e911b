//! The extraction pipeline: open, iterate pages, concatenate, write.

use std::path::{Path, PathBuf};

use crate::backend::PdfBackend;
use crate::layout::Layout;
use crate::{Extraction, PageRecord, PipelineError, ProgressEvent};

/// Number of characters shown in the console preview.
pub const DEFAULT_PREVIEW_CHARS: usize = 2000;

/// Existence and size of the input file, reported before extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputInfo {
    pub exists: bool,
    /// Size in bytes, `None` when the file does not exist.
    pub size: Option<u64>,
}

pub fn inspect_input(path: &Path) -> InputInfo {
    match std::fs::metadata(path) {
        Ok(meta) => InputInfo {
            exists: true,
            size: Some(meta.len()),
        },
        Err(_) => InputInfo {
            exists: false,
            size: None,
        },
    }
}

/// Extract every page of `input` into a single banner-separated buffer.
///
/// Pages are visited in document order; each contributes its banner
/// followed by its text, or the layout's empty-page policy when the
/// backend returns no text. The first backend error aborts the run.
pub fn extract_document<F>(
    backend: &dyn PdfBackend,
    input: &Path,
    layout: &Layout,
    mut progress: F,
) -> Result<Extraction, PipelineError>
where
    F: FnMut(ProgressEvent),
{
    match std::fs::metadata(input) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PipelineError::InputNotFound(input.to_path_buf()));
        }
        Err(e) => return Err(PipelineError::Io(e)),
    }

    let document = backend.open(input)?;
    let page_count = document.page_count();
    tracing::info!(
        backend = backend.name(),
        path = %input.display(),
        page_count,
        "opened document"
    );
    progress(ProgressEvent::Opened { page_count });

    let mut text = String::new();
    let mut pages = Vec::with_capacity(page_count);

    for index in 0..page_count {
        let number = index + 1;
        let page_text = document.extract_page_text(index)?;
        layout.push_section(&mut text, number, page_text.as_deref());

        let record = PageRecord {
            number,
            chars: page_text.as_deref().map_or(0, |t| t.chars().count()),
            empty: page_text.is_none(),
        };
        if record.empty {
            tracing::warn!(page = number, "no text extracted");
        } else {
            tracing::debug!(page = number, chars = record.chars, "page extracted");
        }
        progress(ProgressEvent::Page {
            record: record.clone(),
        });
        pages.push(record);
    }

    drop(document);

    Ok(Extraction {
        backend: backend.name().to_string(),
        input: input.to_path_buf(),
        page_count,
        pages,
        text,
    })
}

/// Write `text` to `path` in one operation, replacing any prior content.
pub fn write_output(path: &Path, text: &str) -> Result<(), PipelineError> {
    std::fs::write(path, text).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = text.len(), "wrote output");
    Ok(())
}

/// Extract `input` and write the result to `output`.
///
/// The output file is only touched once every page has been extracted, so
/// a failed run leaves any previous output in place.
pub fn run<F>(
    backend: &dyn PdfBackend,
    input: &Path,
    output: &Path,
    layout: &Layout,
    mut progress: F,
) -> Result<Extraction, PipelineError>
where
    F: FnMut(ProgressEvent),
{
    let extraction = extract_document(backend, input, layout, &mut progress)?;
    write_output(output, &extraction.text)?;
    progress(ProgressEvent::Written {
        path: PathBuf::from(output),
        bytes: extraction.text.len(),
    });
    Ok(extraction)
}

/// The first `max_chars` characters of `text`, never splitting a code point.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBackend, MockPage};

    #[test]
    fn preview_shorter_than_limit_is_whole_text() {
        assert_eq!(preview("short", 2000), "short");
    }

    #[test]
    fn preview_counts_chars_not_bytes() {
        assert_eq!(preview("héllo wörld", 4), "héll");
        assert_eq!(preview("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn preview_zero_is_empty() {
        assert_eq!(preview("abc", 0), "");
    }

    #[test]
    fn inspect_missing_input() {
        let info = inspect_input(Path::new("/definitely/not/here.pdf"));
        assert!(!info.exists);
        assert_eq!(info.size, None);
    }

    #[test]
    fn progress_reports_every_page_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdf");
        std::fs::write(&input, b"%PDF-1.4").unwrap();

        let backend = MockBackend::new(vec![
            MockPage::Text("one".into()),
            MockPage::Empty,
            MockPage::Text("three".into()),
        ]);
        let mut seen = Vec::new();
        let extraction =
            extract_document(&backend, &input, &Layout::default(), |event| {
                if let ProgressEvent::Page { record } = event {
                    seen.push(record.number);
                }
            })
            .unwrap();

        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(extraction.page_count, 3);
        assert_eq!(extraction.empty_pages(), 1);
        assert_eq!(extraction.total_chars(), 8);
    }

    #[test]
    fn document_is_closed_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdf");
        std::fs::write(&input, b"%PDF-1.4").unwrap();

        let backend = MockBackend::new(vec![
            MockPage::Text("one".into()),
            MockPage::Error("broken content stream".into()),
            MockPage::Text("three".into()),
        ]);
        let err = extract_document(&backend, &input, &Layout::default(), |_| {}).unwrap_err();

        assert!(err.to_string().contains("page 2"));
        assert_eq!(backend.open_documents(), 0);
        assert_eq!(backend.pages_requested(), 2);
    }

    #[test]
    fn unreadable_input_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.pdf");
        std::fs::write(&file, b"%PDF-1.4").unwrap();
        // A regular file used as a directory component fails with ENOTDIR,
        // not NotFound.
        let input = file.join("nested.pdf");

        let backend = MockBackend::with_text_pages(1);
        let err = extract_document(&backend, &input, &Layout::default(), |_| {}).unwrap_err();

        assert!(matches!(err, PipelineError::Io(_)), "got {err:?}");
        assert_eq!(backend.open_documents(), 0);
    }
}
