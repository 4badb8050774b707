//! Error types for application client packaging

use crate::config::ConfigError;
use crate::project::DependencyResolutionError;
use acr_archiver::{ArchiverError, ManifestError};
use acr_filtering::FilteringError;
use thiserror::Error;

/// Result type alias for packaging operations
pub type AcrResult<T> = Result<T, AcrError>;

/// Error type for packaging operations
///
/// Every failure raised by the archiver or the filter is wrapped into one of
/// these variants so callers see a single, descriptive message.
#[derive(Error, Debug)]
pub enum AcrError {
    /// The archiver failed to collect or write entries
    #[error("There was a problem creating the JavaEE Application Client archive: {0}")]
    Archiver(#[source] ArchiverError),

    /// The manifest could not be read or created
    #[error(
        "There was a problem reading / creating the manifest for the JavaEE Application Client archive: {0}"
    )]
    Manifest(#[source] ManifestError),

    /// File system failure while preparing or writing the archive
    #[error("There was a I/O problem creating the JavaEE Application Client archive: {0}")]
    Io(#[source] std::io::Error),

    /// A dependency needed for the manifest class path was not resolved
    #[error(
        "There was a problem resolving dependencies while creating the JavaEE Application Client archive: {0}"
    )]
    DependencyResolution(#[source] DependencyResolutionError),

    /// The deployment descriptor could not be filtered
    #[error("There was a problem filtering the deployment descriptor: {0}")]
    Filtering(#[source] FilteringError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AcrError {
    /// Returns a stable code per failure class, used as the CLI exit status
    pub fn error_code(&self) -> u8 {
        match self {
            AcrError::Archiver(_) => 2,
            AcrError::Manifest(_) => 3,
            AcrError::Io(_) => 4,
            AcrError::DependencyResolution(_) => 5,
            AcrError::Filtering(_) => 6,
            AcrError::Config(_) => 7,
        }
    }
}

impl From<ArchiverError> for AcrError {
    fn from(err: ArchiverError) -> Self {
        match err {
            ArchiverError::Io(e) => AcrError::Io(e),
            ArchiverError::Manifest(e) => AcrError::Manifest(e),
            other => AcrError::Archiver(other),
        }
    }
}

impl From<ManifestError> for AcrError {
    fn from(err: ManifestError) -> Self {
        AcrError::Manifest(err)
    }
}

impl From<std::io::Error> for AcrError {
    fn from(err: std::io::Error) -> Self {
        AcrError::Io(err)
    }
}

impl From<DependencyResolutionError> for AcrError {
    fn from(err: DependencyResolutionError) -> Self {
        AcrError::DependencyResolution(err)
    }
}

impl From<FilteringError> for AcrError {
    fn from(err: FilteringError) -> Self {
        AcrError::Filtering(err)
    }
}
