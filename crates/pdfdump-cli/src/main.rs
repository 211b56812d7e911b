use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use pdfdump_core::{BannerStyle, PdfBackend, ProgressEvent};
use tracing_subscriber::EnvFilter;

mod backends;
mod output;
mod settings;

use output::ColorMode;
use settings::{Overrides, Settings};

/// PDF text dumper - extract the text of every page of a PDF into one file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging and print the full error chain on failure
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the text of a PDF, page by page, into a text file
    Extract {
        #[command(flatten)]
        common: CommonArgs,

        /// Extraction backend (see `pdfdump backends`)
        #[arg(short, long)]
        backend: Option<String>,

        /// Number of characters of the result to preview (0 disables)
        #[arg(long)]
        preview_chars: Option<usize>,

        /// Print a JSON summary instead of the human-readable one
        #[arg(long)]
        json: bool,
    },

    /// Extract the same PDF with every backend and compare the results
    Compare {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// List the extraction backends compiled into this binary
    Backends,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Path to the PDF file to extract
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path of the text file to write (overwritten if it exists)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page banner format
    #[arg(long, value_enum)]
    banner: Option<BannerArg>,

    /// Text written for pages that yield no text
    #[arg(long, conflicts_with = "blank_empty_pages")]
    placeholder: Option<String>,

    /// Write nothing for pages that yield no text
    #[arg(long)]
    blank_empty_pages: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Hide the progress bar and the input check
    #[arg(short, long)]
    quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum BannerArg {
    /// `PAGE n` between two rules of `=`
    Ruled,
    /// `=== PAGE n ===`
    Compact,
}

impl From<BannerArg> for BannerStyle {
    fn from(arg: BannerArg) -> Self {
        match arg {
            BannerArg::Ruled => BannerStyle::Ruled,
            BannerArg::Compact => BannerStyle::Compact,
        }
    }
}

impl CommonArgs {
    fn overrides(&self, backend: Option<String>, preview_chars: Option<usize>) -> Overrides {
        Overrides {
            input: self.input.clone(),
            output: self.output.clone(),
            backend,
            banner: self.banner.map(BannerStyle::from),
            placeholder: self.placeholder.clone(),
            blank_empty_pages: self.blank_empty_pages,
            preview_chars,
        }
    }

    fn color(&self) -> ColorMode {
        ColorMode(!self.no_color && std::io::stdout().is_terminal())
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Extract {
            common,
            backend,
            preview_chars,
            json,
        } => extract(&common, backend, preview_chars, json),
        Command::Compare { common } => compare(&common),
        Command::Backends => list_backends(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if cli.verbose {
                eprintln!();
                eprintln!("{e:?}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_settings(overrides: Overrides) -> Settings {
    let config = pdfdump_core::config_file::load_config();
    settings::resolve(overrides, &config, |key| std::env::var(key).ok())
}

fn extract(
    common: &CommonArgs,
    backend: Option<String>,
    preview_chars: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let settings = resolve_settings(common.overrides(backend, preview_chars));
    let backend = backends::by_name(&settings.backend)?;
    let color = if json {
        ColorMode(false)
    } else {
        common.color()
    };
    let mut stdout = std::io::stdout().lock();

    if !json && !common.quiet {
        let info = pdfdump_core::inspect_input(&settings.input);
        output::print_input_info(&mut stdout, &settings.input, &info, color)?;
    }

    let bar = page_bar(json || common.quiet);
    let extraction = pdfdump_core::run(
        backend.as_ref(),
        &settings.input,
        &settings.output,
        &settings.layout,
        |event| track(&bar, backend.name(), event),
    )
    .with_context(|| {
        format!(
            "extracting {} with {}",
            settings.input.display(),
            settings.backend
        )
    });
    bar.finish_and_clear();
    let extraction = extraction?;

    if json {
        output::print_json_summary(&mut stdout, &extraction, &settings.output)?;
    } else {
        output::print_extraction_summary(
            &mut stdout,
            &extraction,
            &settings.output,
            settings.preview_chars,
            color,
        )?;
    }
    stdout.flush()?;
    Ok(())
}

fn compare(common: &CommonArgs) -> anyhow::Result<()> {
    let settings = resolve_settings(common.overrides(None, None));
    let color = common.color();
    let mut stdout = std::io::stdout().lock();

    if !common.quiet {
        let info = pdfdump_core::inspect_input(&settings.input);
        output::print_input_info(&mut stdout, &settings.input, &info, color)?;
    }

    let all = backends::all();
    let refs: Vec<&dyn PdfBackend> = all.iter().map(|b| b.as_ref()).collect();

    let bar = page_bar(common.quiet);
    let comparison = pdfdump_core::compare_backends(
        &refs,
        &settings.input,
        &settings.output,
        &settings.layout,
        |name, event| track(&bar, name, event),
    )
    .with_context(|| format!("comparing backends on {}", settings.input.display()));
    bar.finish_and_clear();
    let comparison = comparison?;

    output::print_comparison(&mut stdout, &comparison, color)?;
    stdout.flush()?;
    Ok(())
}

fn list_backends() -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    for name in backends::available() {
        if name == backends::DEFAULT_BACKEND {
            writeln!(stdout, "{name} (default)")?;
        } else {
            writeln!(stdout, "{name}")?;
        }
    }
    Ok(())
}

fn page_bar(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{bar:40.cyan/dim}] {pos}/{len} pages")
            .unwrap()
            .progress_chars("=> "),
    );
    bar
}

fn track(bar: &ProgressBar, backend: &str, event: ProgressEvent) {
    match event {
        ProgressEvent::Opened { page_count } => {
            bar.set_length(page_count as u64);
            bar.set_position(0);
            bar.set_message(backend.to_string());
        }
        ProgressEvent::Page { .. } => bar.inc(1),
        ProgressEvent::Written { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn extract_flags_parse() {
        let cli = Cli::try_parse_from([
            "pdfdump",
            "extract",
            "-i",
            "in.pdf",
            "-o",
            "out.txt",
            "--backend",
            "lopdf",
            "--banner",
            "compact",
            "--preview-chars",
            "50",
        ])
        .unwrap();
        let Command::Extract {
            common,
            backend,
            preview_chars,
            json,
        } = cli.command
        else {
            panic!("expected extract");
        };
        let overrides = common.overrides(backend, preview_chars);
        assert_eq!(overrides.input, Some(PathBuf::from("in.pdf")));
        assert_eq!(overrides.output, Some(PathBuf::from("out.txt")));
        assert_eq!(overrides.backend.as_deref(), Some("lopdf"));
        assert_eq!(overrides.banner, Some(BannerStyle::Compact));
        assert_eq!(overrides.preview_chars, Some(50));
        assert!(!json);
    }

    #[test]
    fn placeholder_conflicts_with_blank() {
        let result = Cli::try_parse_from([
            "pdfdump",
            "extract",
            "--placeholder",
            "x",
            "--blank-empty-pages",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["pdfdump", "compare", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Compare { .. }));
    }
}
