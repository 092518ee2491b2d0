//! Input path model: a filesystem path or standard input.

use std::fmt;
use std::path::{Path, PathBuf};

/// Path value that selects standard input.
pub const STDIN_SENTINEL: &str = "-";

/// A single input to classify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPath {
    /// Standard input.
    Stdin,
    /// A file on disk, or a directory whose regular files are visited.
    Path(PathBuf),
}

impl InputPath {
    /// Interpret a command line argument, mapping `-` to standard input.
    pub fn parse(arg: impl AsRef<Path>) -> Self {
        let arg = arg.as_ref();
        if arg.as_os_str() == STDIN_SENTINEL {
            Self::Stdin
        } else {
            Self::Path(arg.to_path_buf())
        }
    }

    /// Whether this input is standard input.
    pub fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }

    /// Path used for error context and reporting.
    pub fn as_path(&self) -> &Path {
        match self {
            Self::Stdin => Path::new(STDIN_SENTINEL),
            Self::Path(path) => path,
        }
    }

    /// Raw bytes of the path, as used to seed per-file sampling.
    pub fn as_bytes(&self) -> &[u8] {
        self.as_path().as_os_str().as_encoded_bytes()
    }
}

impl fmt::Display for InputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_path().display())
    }
}

impl From<PathBuf> for InputPath {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}
