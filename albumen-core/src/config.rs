use std::path::{Path, PathBuf};

/// Image extensions listed when nothing else is configured.
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp"];

/// URL prefix the static file service is mounted under.
pub const DEFAULT_URL_PREFIX: &str = "/photos";

/// Settings the [`Catalog`](crate::Catalog) is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Directory whose image files make up the catalog
    pub photos_dir: PathBuf,
    /// Lower-case extensions with a leading dot
    pub extensions: Vec<String>,
    /// Prefix used when building record URLs
    pub url_prefix: String,
}

impl CatalogConfig {
    pub fn new(photos_dir: impl Into<PathBuf>) -> Self {
        Self {
            photos_dir: photos_dir.into(),
            extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
        }
    }

    /// Replace the extension allow-list. Entries are normalized, so `"JPG"`,
    /// `"jpg"` and `".jpg"` are equivalent.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .filter_map(|ext| normalize_extension(ext.as_ref()))
            .collect();
        self
    }

    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    /// Whether `path` carries one of the configured extensions.
    pub fn is_image_file(&self, path: &Path) -> bool {
        let extension = extension_of(path);
        !extension.is_empty() && self.extensions.contains(&extension)
    }
}

/// Lower-cased extension of `path` including the dot, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!(".{}", trimmed.to_lowercase()))
    }
}
