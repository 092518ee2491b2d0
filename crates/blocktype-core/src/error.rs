//! Error types for classification runs.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a classification run.
///
/// Every variant is fatal: the driver stops at the first error and does not
/// continue with the remaining inputs.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Input could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from an open input failed.
    #[error("read error at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Skipping the header block failed.
    #[error("cannot seek in {path}: {source}")]
    Seek {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The block buffer could not be allocated.
    #[error("cannot allocate a {size} byte block buffer")]
    Allocation { size: usize },

    /// Directory traversal failed.
    #[error("cannot traverse {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// Writing results failed.
    #[error("cannot write output: {source}")]
    Output {
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The classifier engine reported a failure.
    #[error("classifier error: {message}")]
    Model { message: String },
}

impl ClassifyError {
    /// Create an open error with path context.
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a read error with path context.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a seek error with path context.
    pub fn seek(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Seek {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ClassifyError {
    fn from(source: std::io::Error) -> Self {
        Self::Output { source }
    }
}
