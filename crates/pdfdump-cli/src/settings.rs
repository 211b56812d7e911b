use std::path::PathBuf;

use pdfdump_core::config_file::ConfigFile;
use pdfdump_core::{BannerStyle, DEFAULT_PREVIEW_CHARS, EmptyPage, Layout};

use crate::backends::DEFAULT_BACKEND;

/// Input used when no flag, env var, or config entry names one.
pub const DEFAULT_INPUT: &str = "Website Audit and Improvement Plan.pdf";
/// Output used when no flag, env var, or config entry names one.
pub const DEFAULT_OUTPUT: &str = "website_improvement_plan.txt";

/// Options that may come from the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub backend: Option<String>,
    pub banner: Option<BannerStyle>,
    pub placeholder: Option<String>,
    pub blank_empty_pages: bool,
    pub preview_chars: Option<usize>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub backend: String,
    pub layout: Layout,
    pub preview_chars: usize,
}

/// Resolve settings: CLI flags > env vars > config file > defaults.
///
/// `env` looks up an environment variable; passing it in keeps resolution
/// testable without touching the process environment.
pub fn resolve(
    overrides: Overrides,
    config: &ConfigFile,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let input = overrides
        .input
        .or_else(|| env("PDFDUMP_INPUT").map(PathBuf::from))
        .or_else(|| config.input())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output = overrides
        .output
        .or_else(|| env("PDFDUMP_OUTPUT").map(PathBuf::from))
        .or_else(|| config.output())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let backend = overrides
        .backend
        .or_else(|| env("PDFDUMP_BACKEND"))
        .or_else(|| config.backend().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_BACKEND.to_string());

    let mut layout = config.layout();
    if let Some(banner) = overrides.banner {
        layout.banner = banner;
    }
    if overrides.blank_empty_pages {
        layout.empty_page = EmptyPage::Blank;
    } else if let Some(placeholder) = overrides.placeholder {
        layout.empty_page = EmptyPage::Placeholder(placeholder);
    }

    let preview_chars = overrides
        .preview_chars
        .or_else(|| config.preview_chars())
        .unwrap_or(DEFAULT_PREVIEW_CHARS);

    Settings {
        input,
        output,
        backend,
        layout,
        preview_chars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfdump_core::config_file::{ExtractionConfig, PathsConfig};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_when_nothing_configured() {
        let settings = resolve(Overrides::default(), &ConfigFile::default(), no_env);
        assert_eq!(settings.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(settings.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(settings.backend, DEFAULT_BACKEND);
        assert_eq!(settings.layout, Layout::default());
        assert_eq!(settings.preview_chars, 2000);
    }

    #[test]
    fn flag_beats_env_beats_config() {
        let config = ConfigFile {
            paths: Some(PathsConfig {
                input: Some("config.pdf".to_string()),
                output: Some("config.txt".to_string()),
            }),
            ..Default::default()
        };
        let env = |key: &str| match key {
            "PDFDUMP_INPUT" => Some("env.pdf".to_string()),
            "PDFDUMP_OUTPUT" => Some("env.txt".to_string()),
            _ => None,
        };

        let overrides = Overrides {
            input: Some(PathBuf::from("flag.pdf")),
            ..Default::default()
        };
        let settings = resolve(overrides, &config, env);
        assert_eq!(settings.input, PathBuf::from("flag.pdf"));
        assert_eq!(settings.output, PathBuf::from("env.txt"));

        let settings = resolve(Overrides::default(), &config, no_env);
        assert_eq!(settings.input, PathBuf::from("config.pdf"));
        assert_eq!(settings.output, PathBuf::from("config.txt"));
    }

    #[test]
    fn backend_from_env() {
        let env = |key: &str| (key == "PDFDUMP_BACKEND").then(|| "lopdf".to_string());
        let settings = resolve(Overrides::default(), &ConfigFile::default(), env);
        assert_eq!(settings.backend, "lopdf");
    }

    #[test]
    fn layout_flags_override_config() {
        let config = ConfigFile {
            extraction: Some(ExtractionConfig {
                banner: Some(BannerStyle::Compact),
                placeholder: Some("<config>".to_string()),
                preview_chars: Some(100),
                ..Default::default()
            }),
            ..Default::default()
        };

        let settings = resolve(Overrides::default(), &config, no_env);
        assert_eq!(settings.layout.banner, BannerStyle::Compact);
        assert_eq!(
            settings.layout.empty_page,
            EmptyPage::Placeholder("<config>".to_string())
        );
        assert_eq!(settings.preview_chars, 100);

        let overrides = Overrides {
            banner: Some(BannerStyle::Ruled),
            blank_empty_pages: true,
            preview_chars: Some(10),
            ..Default::default()
        };
        let settings = resolve(overrides, &config, no_env);
        assert_eq!(settings.layout.banner, BannerStyle::Ruled);
        assert_eq!(settings.layout.empty_page, EmptyPage::Blank);
        assert_eq!(settings.preview_chars, 10);
    }
}
