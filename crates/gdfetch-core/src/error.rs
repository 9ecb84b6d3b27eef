//! Error types for the fetch pipeline.
//!
//! Transport errors keep libcurl's own diagnostic (or the HTTP status) so the
//! caller sees what actually failed. Filesystem and archive errors carry the
//! path they were operating on.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single HTTP exchange (search page or artifact download).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Curl reported an error (DNS, connect, TLS, timeout, write callback abort...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response finished with a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },
    /// Writing the body to its sink failed mid-transfer. Not retried.
    #[error("storage: {0}")]
    Storage(#[source] std::io::Error),
}

/// Any error that aborts the pipeline.
///
/// Benign terminal results (no link, unrecognized format, ambiguous
/// executable, attempt budget exhausted) are outcomes, not errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("version must not be empty")]
    EmptyVersion,

    #[error("version {0:?} contains characters not allowed in a file name")]
    InvalidVersion(String),

    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("extracting {}: {source}", archive.display())]
    Archive {
        archive: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("walking {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("pipeline task failed: {0}")]
    Join(String),
}

impl PipelineError {
    /// Shorthand for wrapping an `io::Error` with the operation and path.
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| PipelineError::Io { op, path, source }
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
