//! Side-by-side extraction of one document with several backends.

use std::path::{Path, PathBuf};

use crate::backend::PdfBackend;
use crate::layout::Layout;
use crate::pipeline::run;
use crate::{Extraction, PipelineError, ProgressEvent};

/// One row of a comparison table: a page and each backend's char count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRow {
    pub number: usize,
    /// `None` when that backend's document has no page with this number.
    pub chars: Vec<Option<usize>>,
}

/// Results of running every backend over the same input.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub extractions: Vec<Extraction>,
    pub outputs: Vec<PathBuf>,
}

impl Comparison {
    /// Page rows across all backends, up to the largest page count seen.
    pub fn rows(&self) -> Vec<PageRow> {
        let max_pages = self
            .extractions
            .iter()
            .map(|e| e.page_count)
            .max()
            .unwrap_or(0);
        (1..=max_pages)
            .map(|number| PageRow {
                number,
                chars: self
                    .extractions
                    .iter()
                    .map(|e| e.pages.get(number - 1).map(|p| p.chars))
                    .collect(),
            })
            .collect()
    }

    /// Whether every backend reported the same page count.
    pub fn page_counts_agree(&self) -> bool {
        self.extractions
            .windows(2)
            .all(|w| w[0].page_count == w[1].page_count)
    }
}

/// `report.txt` + `mupdf` -> `report.mupdf.txt`, in the same directory.
pub fn backend_output_path(output: &Path, backend: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let file_name = match output.extension() {
        Some(ext) => format!("{stem}.{backend}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{backend}"),
    };
    output.with_file_name(file_name)
}

/// Run `input` through each backend in turn, writing one output per backend.
///
/// Stops at the first failing backend; outputs already written stay.
pub fn compare_backends<F>(
    backends: &[&dyn PdfBackend],
    input: &Path,
    output: &Path,
    layout: &Layout,
    mut progress: F,
) -> Result<Comparison, PipelineError>
where
    F: FnMut(&str, ProgressEvent),
{
    let mut extractions = Vec::with_capacity(backends.len());
    let mut outputs = Vec::with_capacity(backends.len());

    for backend in backends {
        let name = backend.name();
        let path = backend_output_path(output, name);
        tracing::info!(backend = name, output = %path.display(), "comparing backend");
        let extraction = run(*backend, input, &path, layout, |event| progress(name, event))?;
        extractions.push(extraction);
        outputs.push(path);
    }

    Ok(Comparison {
        extractions,
        outputs,
    })
}
