use pdfdump_core::PdfBackend;
use pdfdump_lopdf::LopdfBackend;

/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND: &str = if cfg!(feature = "mupdf") {
    "mupdf"
} else {
    "lopdf"
};

/// Names of the backends compiled into this binary, default first.
pub fn available() -> Vec<&'static str> {
    let mut names = Vec::new();
    #[cfg(feature = "mupdf")]
    names.push("mupdf");
    names.push("lopdf");
    names
}

/// Look up a backend by name (case-insensitive).
pub fn by_name(name: &str) -> anyhow::Result<Box<dyn PdfBackend>> {
    match name.to_ascii_lowercase().as_str() {
        #[cfg(feature = "mupdf")]
        "mupdf" => Ok(Box::new(pdfdump_mupdf::MupdfBackend::new())),
        "lopdf" => Ok(Box::new(LopdfBackend::new())),
        other => anyhow::bail!(
            "unknown backend '{}' (available: {})",
            other,
            available().join(", ")
        ),
    }
}

/// Every compiled-in backend, in [`available`] order.
pub fn all() -> Vec<Box<dyn PdfBackend>> {
    available()
        .into_iter()
        .filter_map(|name| by_name(name).ok())
        .collect()
}
