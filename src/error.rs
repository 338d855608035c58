use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(String),
    #[error("Source must be a valid local directory or Git URL: {0}")]
    InvalidSource(String),
    #[error("Invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: globset::Error,
    },
    #[error("git command not found; install Git to process remote repositories")]
    GitUnavailable,
    #[error("git clone of {url} failed: {message}")]
    Clone { url: String, message: String },
    #[error("Failed to build worker pool: {0}")]
    Pool(String),
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DigestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DigestError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A failure confined to a single file. It is recorded on the file's
/// record and never aborts the run.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to stat file: {0}")]
    Stat(#[source] std::io::Error),
    #[error("failed to read file: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to parse notebook JSON: {0}")]
    Notebook(#[source] serde_json::Error),
    #[error("cancelled before processing started")]
    Cancelled,
}
