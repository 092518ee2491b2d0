//! Error types for the classifier engine.

use std::path::PathBuf;

use thiserror::Error;

use blocktype_core::ClassifyError;

/// Errors raised while loading or running the classifier engine.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A model, class or mask file could not be read or written.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A model, class or mask file has invalid contents.
    #[error("cannot parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A class file listed no classes.
    #[error("class file {path} defines no classes")]
    EmptyClassTable { path: PathBuf },

    /// A type name is not in the class table.
    #[error("{name}: not a valid type name")]
    UnknownType { name: String },

    /// The accumulate/classify/clear contract was violated.
    #[error("classifier state violation: {message}")]
    State { message: &'static str },

    /// Feature reduction is not possible.
    #[error("cannot reduce features: {message}")]
    Reduce { message: String },

    /// Writing a training dump failed.
    #[error("cannot write training dump: {source}")]
    Dump {
        #[source]
        source: std::io::Error,
    },
}

impl ModelError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error with path context.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<ModelError> for ClassifyError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownType { .. } => ClassifyError::invalid_config(err.to_string()),
            ModelError::Dump { source } => ClassifyError::Output { source },
            other => ClassifyError::Model {
                message: other.to_string(),
            },
        }
    }
}
