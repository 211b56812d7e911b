use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout::{BannerStyle, EmptyPage, Layout};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub paths: Option<PathsConfig>,
    pub extraction: Option<ExtractionConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    pub input: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub backend: Option<String>,
    pub banner: Option<BannerStyle>,
    pub placeholder: Option<String>,
    pub blank_empty_pages: Option<bool>,
    pub preview_chars: Option<usize>,
}

impl ConfigFile {
    pub fn input(&self) -> Option<PathBuf> {
        self.paths
            .as_ref()
            .and_then(|p| p.input.as_ref())
            .map(PathBuf::from)
    }

    pub fn output(&self) -> Option<PathBuf> {
        self.paths
            .as_ref()
            .and_then(|p| p.output.as_ref())
            .map(PathBuf::from)
    }

    pub fn backend(&self) -> Option<&str> {
        self.extraction.as_ref().and_then(|e| e.backend.as_deref())
    }

    pub fn preview_chars(&self) -> Option<usize> {
        self.extraction.as_ref().and_then(|e| e.preview_chars)
    }

    /// Build the page layout described by the `[extraction]` table.
    pub fn layout(&self) -> Layout {
        let Some(ref extraction) = self.extraction else {
            return Layout::default();
        };
        let empty_page = if extraction.blank_empty_pages.unwrap_or(false) {
            EmptyPage::Blank
        } else {
            extraction
                .placeholder
                .clone()
                .map(EmptyPage::Placeholder)
                .unwrap_or_default()
        };
        Layout::new(extraction.banner.unwrap_or_default()).with_empty_page(empty_page)
    }
}

/// Platform config directory path: `<config_dir>/pdfdump/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdfdump").join("config.toml"))
}

/// Load config by cascading CWD `.pdfdump.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pdfdump.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_paths = base.paths.unwrap_or_default();
    let overlay_paths = overlay.paths.unwrap_or_default();
    let base_extraction = base.extraction.unwrap_or_default();
    let overlay_extraction = overlay.extraction.unwrap_or_default();

    ConfigFile {
        paths: Some(PathsConfig {
            input: overlay_paths.input.or(base_paths.input),
            output: overlay_paths.output.or(base_paths.output),
        }),
        extraction: Some(ExtractionConfig {
            backend: overlay_extraction.backend.or(base_extraction.backend),
            banner: overlay_extraction.banner.or(base_extraction.banner),
            placeholder: overlay_extraction
                .placeholder
                .or(base_extraction.placeholder),
            blank_empty_pages: overlay_extraction
                .blank_empty_pages
                .or(base_extraction.blank_empty_pages),
            preview_chars: overlay_extraction
                .preview_chars
                .or(base_extraction.preview_chars),
        }),
    }
}
