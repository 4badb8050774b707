//! Resource filtering for acr
//!
//! This crate provides:
//! - [`Interpolator`] for `${key}` / `@key@` token replacement with escape support
//! - [`properties`] parsing for filter files
//! - [`detect_xml_encoding`] to pick the charset of an XML resource
//! - [`FileFilter`] seam with the [`DefaultFileFilter`] implementation

mod error;
mod interpolation;

pub mod encoding;
pub mod filter;
pub mod properties;

pub use encoding::{detect_xml_encoding, detect_xml_file_encoding};
pub use error::FilteringError;
pub use filter::{DefaultFileFilter, FileFilter, FilterWrappers, FilteringRequest};
pub use interpolation::{Delimiter, InterpolationOptions, Interpolator, ValueSource};

/// Re-exported so callers can name encodings without a direct dependency.
pub use encoding_rs::Encoding;

/// Result type for filtering operations.
pub type FilteringResult<T> = Result<T, FilteringError>;
