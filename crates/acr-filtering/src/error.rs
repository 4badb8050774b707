//! Error types for filtering operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while filtering a resource.
#[derive(Debug, Error)]
pub enum FilteringError {
    /// I/O error reading or writing a resource.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured filter properties file does not exist.
    #[error("Filter properties file does not exist: {0}")]
    MissingFilterFile(PathBuf),

    /// A properties file could not be parsed.
    #[error("Error parsing {path} at line {line}: {message}")]
    Properties {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The declared or requested encoding is not supported.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Resource content is not valid in the detected encoding.
    #[error("Malformed {encoding} input in {path}")]
    MalformedInput { path: PathBuf, encoding: String },

    /// An expression refers back to itself.
    #[error("Expression cycle detected: {0}")]
    ExpressionCycle(String),

    /// The delimiter or escape configuration produced an invalid pattern.
    #[error("Invalid delimiter configuration: {0}")]
    Pattern(#[from] regex::Error),
}

impl FilteringError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
