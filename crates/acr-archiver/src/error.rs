//! Error types for archiver operations.

use thiserror::Error;

/// Errors that can occur while building or reading an archive.
#[derive(Debug, Error)]
pub enum ArchiverError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal error.
    #[error("Failed to scan directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Manifest could not be read or created.
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// An include or exclude pattern failed to compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The output timestamp could not be parsed or is out of range.
    #[error("Invalid output timestamp: {0}")]
    InvalidTimestamp(String),

    /// A file handed to the archiver does not exist or is not a regular file.
    #[error("{0} isn't a file")]
    NotAFile(String),

    /// The same entry was added twice and duplicates are rejected.
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Entry name is absolute or escapes the archive root.
    #[error("Invalid entry name: {0}")]
    InvalidEntryName(String),

    /// No output file was configured before creating the archive.
    #[error("No output file set")]
    MissingOutputFile,

    /// Requested entry is not present in the archive.
    #[error("Missing entry: {0}")]
    MissingEntry(String),
}

/// Errors raised while parsing, validating or writing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Attribute name contains characters outside `[A-Za-z0-9_-]` or is too long.
    #[error("Invalid attribute name: '{0}'")]
    InvalidAttributeName(String),

    /// A manifest line is neither `Name: value` nor a continuation.
    #[error("Invalid manifest line {line}: '{content}'")]
    InvalidLine { line: usize, content: String },

    /// A continuation line appeared with nothing to continue.
    #[error("Unexpected continuation at line {0}")]
    UnexpectedContinuation(usize),

    /// Individual section does not start with a `Name` attribute.
    #[error("Manifest section at line {0} has no Name attribute")]
    MissingSectionName(usize),

    /// Manifest bytes are not valid UTF-8.
    #[error("Manifest is not valid UTF-8")]
    InvalidEncoding,

    /// Manifest file could not be read.
    #[error("Failed to read manifest {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
