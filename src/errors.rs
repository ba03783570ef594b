// src/errors.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure the pipeline can surface.
///
/// `Access` and `Scraping` are recoverable per app id (the scraper logs and
/// skips them); the rest propagate to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot access {url}: {reason}")]
    Access { url: String, reason: String },
    #[error("{0}")]
    Scraping(String),
    #[error("malformed store {}: {details}", path.display())]
    Format { path: PathBuf, details: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("batch index {index} out of range (sequence has {len} batches)")]
    BatchIndex { index: usize, len: usize },
    #[error("cannot decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Errors the scraper swallows (log + skip) instead of aborting the batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Access { .. } | Error::Scraping(_))
    }

    pub(crate) fn access(url: &str, reason: impl ToString) -> Self {
        Error::Access { url: s!(url), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
