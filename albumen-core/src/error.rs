use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Photo directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Photo not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while reading the embedded metadata block of a single file.
///
/// Never crosses the catalog boundary: the extractor folds it into the
/// placeholder summary for that file.
#[derive(Error, Debug)]
pub enum TagError {
    #[error("Metadata parse error: {0}")]
    Parse(#[from] exif::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
