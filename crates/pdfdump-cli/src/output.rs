use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use pdfdump_core::{Comparison, Extraction, InputInfo, preview};
use serde::Serialize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the existence/size check for the input file.
pub fn print_input_info(
    w: &mut dyn Write,
    path: &Path,
    info: &InputInfo,
    color: ColorMode,
) -> std::io::Result<()> {
    match info.size {
        Some(size) => writeln!(w, "Input: {} ({} bytes)", path.display(), size),
        None => {
            if color.enabled() {
                writeln!(w, "Input: {} ({})", path.display(), "not found".red())
            } else {
                writeln!(w, "Input: {} (not found)", path.display())
            }
        }
    }
}

/// Print the summary after a successful extraction.
pub fn print_extraction_summary(
    w: &mut dyn Write,
    extraction: &Extraction,
    output: &Path,
    preview_chars: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let headline = format!(
        "Successfully extracted {} pages with {}",
        extraction.page_count, extraction.backend
    );
    if color.enabled() {
        writeln!(w, "{}", headline.green())?;
    } else {
        writeln!(w, "{}", headline)?;
    }

    let empty = extraction.empty_pages();
    if empty > 0 {
        let msg = format!("({} of {} pages had no text)", empty, extraction.page_count);
        if color.enabled() {
            writeln!(w, "{}", msg.yellow())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    }

    writeln!(w, "Text saved to: {}", output.display())?;
    if preview_chars > 0 {
        let header = format!("First {} characters of extracted text:", preview_chars);
        if color.enabled() {
            writeln!(w, "{}", header.dimmed())?;
        } else {
            writeln!(w, "{}", header)?;
        }
        writeln!(w, "{}", preview(&extraction.text, preview_chars))?;
    }
    Ok(())
}

/// Machine-readable summary printed by `extract --json`.
#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    #[serde(flatten)]
    pub extraction: &'a Extraction,
    pub output: &'a Path,
    pub empty_pages: usize,
    pub total_chars: usize,
}

impl<'a> JsonSummary<'a> {
    pub fn new(extraction: &'a Extraction, output: &'a Path) -> Self {
        Self {
            extraction,
            output,
            empty_pages: extraction.empty_pages(),
            total_chars: extraction.total_chars(),
        }
    }
}

pub fn print_json_summary(
    w: &mut dyn Write,
    extraction: &Extraction,
    output: &Path,
) -> anyhow::Result<()> {
    let summary = JsonSummary::new(extraction, output);
    serde_json::to_writer_pretty(&mut *w, &summary)?;
    writeln!(w)?;
    Ok(())
}

/// Print the per-page character counts of every backend side by side.
pub fn print_comparison(
    w: &mut dyn Write,
    comparison: &Comparison,
    color: ColorMode,
) -> std::io::Result<()> {
    let names: Vec<&str> = comparison
        .extractions
        .iter()
        .map(|e| e.backend.as_str())
        .collect();

    let mut header = format!("{:>6}", "PAGE");
    for name in &names {
        header.push_str(&format!("  {:>10}", name));
    }
    let sep = "=".repeat(header.len());
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", header.bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "{}", header)?;
        writeln!(w, "{}", sep)?;
    }

    for row in comparison.rows() {
        let mut line = format!("{:>6}", row.number);
        for chars in &row.chars {
            let cell = match chars {
                Some(0) => "empty".to_string(),
                Some(n) => n.to_string(),
                None => "-".to_string(),
            };
            line.push_str(&format!("  {:>10}", cell));
        }
        let differs = row.chars.windows(2).any(|pair| pair[0] != pair[1]);
        if differs && color.enabled() {
            writeln!(w, "{}", line.yellow())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }

    let mut totals = format!("{:>6}", "TOTAL");
    for extraction in &comparison.extractions {
        totals.push_str(&format!("  {:>10}", extraction.total_chars()));
    }
    writeln!(w, "{}", sep)?;
    writeln!(w, "{}", totals)?;
    writeln!(w)?;

    if !comparison.page_counts_agree() {
        let counts: Vec<String> = comparison
            .extractions
            .iter()
            .map(|e| format!("{}={}", e.backend, e.page_count))
            .collect();
        let msg = format!("WARNING: page counts differ ({})", counts.join(", "));
        if color.enabled() {
            writeln!(w, "{}", msg.yellow())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    }

    for (extraction, path) in comparison.extractions.iter().zip(&comparison.outputs) {
        writeln!(w, "{:>8}: {}", extraction.backend, path.display())?;
    }
    Ok(())
}
