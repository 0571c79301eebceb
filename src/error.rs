use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for text store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{}", io_message(.source, .path.as_deref()))]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

// Mirrors the usual "<file> (<reason>)" wording of I/O failures
fn io_message(source: &std::io::Error, path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("{} ({})", path.display(), source),
        None => source.to_string(),
    }
}

impl StoreError {
    /// Create a new IO error with path context
    pub fn io_error(err: std::io::Error, path: Option<impl Into<PathBuf>>) -> Self {
        Self::Io {
            source: err,
            path: path.map(|p| p.into()),
        }
    }

    /// Create a new invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// The underlying IO error kind, if this is an IO failure
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            StoreError::Io { source, .. } => Some(source.kind()),
            StoreError::InvalidPattern { .. } => None,
        }
    }

    /// Path the failed operation was working on, if known
    pub fn path(&self) -> Option<&Path> {
        match self {
            StoreError::Io { path, .. } => path.as_deref(),
            StoreError::InvalidPattern { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        StoreError::io_error(error, None::<PathBuf>)
    }
}

/// Result type alias using StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Contextual error mapping function
pub fn map_io_err<P: Into<PathBuf>>(path: P) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.into();
    move |err| StoreError::io_error(err, Some(path))
}
