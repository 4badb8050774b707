//! File filtering.
//!
//! [`FileFilter`] is the seam between packaging and filtering: callers build
//! [`FilterWrappers`] once from a [`FilteringRequest`], then copy files
//! through them.

use crate::interpolation::{InterpolationOptions, Interpolator, ValueSource};
use crate::{FilteringError, FilteringResult, properties};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed to build filter wrappers.
///
/// Property precedence, lowest first: filter files, project properties,
/// system properties, user properties. Model values (`project.*`, `pom.*`,
/// `basedir`) are consulted only when no property matches.
#[derive(Debug, Clone, Default)]
pub struct FilteringRequest {
    /// Directory that relative filter file paths are resolved against.
    pub basedir: PathBuf,
    /// Filter properties files.
    pub filters: Vec<PathBuf>,
    pub project_properties: BTreeMap<String, String>,
    pub system_properties: BTreeMap<String, String>,
    pub user_properties: BTreeMap<String, String>,
    /// Values derived from the project model, keyed by expression.
    pub model_values: BTreeMap<String, String>,
    pub escape_string: Option<String>,
    pub escape_windows_paths: bool,
}

/// Prepared values plus interpolator used to filter file contents.
#[derive(Debug, Clone)]
pub struct FilterWrappers {
    interpolator: Interpolator,
    properties: BTreeMap<String, String>,
    model_values: BTreeMap<String, String>,
}

impl FilterWrappers {
    /// Build wrappers directly from prepared values.
    pub fn new(
        options: InterpolationOptions,
        properties: BTreeMap<String, String>,
        model_values: BTreeMap<String, String>,
    ) -> FilteringResult<Self> {
        Ok(Self {
            interpolator: Interpolator::new(options)?,
            properties,
            model_values,
        })
    }

    /// Interpolate text.
    pub fn filter(&self, text: &str) -> FilteringResult<String> {
        self.interpolator.interpolate(text, self)
    }

    /// The merged property values.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

impl ValueSource for FilterWrappers {
    fn value(&self, expression: &str) -> Option<String> {
        self.properties
            .get(expression)
            .or_else(|| self.model_values.get(expression))
            .cloned()
    }
}

/// Copies files, optionally filtering their content.
pub trait FileFilter {
    /// Build the default filter wrappers for a request.
    fn default_filter_wrappers(&self, request: &FilteringRequest) -> FilteringResult<FilterWrappers>;

    /// Copy `from` to `to`, filtering content through `wrappers` when `filtering`
    /// is set. Content is decoded and re-encoded with `encoding`.
    fn copy_file(
        &self,
        from: &Path,
        to: &Path,
        filtering: bool,
        wrappers: &FilterWrappers,
        encoding: &'static Encoding,
    ) -> FilteringResult<()>;
}

/// Standard [`FileFilter`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFileFilter;

impl DefaultFileFilter {
    pub fn new() -> Self {
        Self
    }
}

impl FileFilter for DefaultFileFilter {
    fn default_filter_wrappers(&self, request: &FilteringRequest) -> FilteringResult<FilterWrappers> {
        let mut properties = BTreeMap::new();

        for filter in &request.filters {
            let path = if filter.is_absolute() {
                filter.clone()
            } else {
                request.basedir.join(filter)
            };
            if !path.is_file() {
                return Err(FilteringError::MissingFilterFile(path));
            }
            tracing::debug!(path = %path.display(), "Loading filter properties");
            properties.extend(properties::load(&path)?);
        }

        properties.extend(request.project_properties.clone());
        properties.extend(request.system_properties.clone());
        properties.extend(request.user_properties.clone());

        let options = InterpolationOptions {
            escape_string: request.escape_string.clone(),
            escape_windows_paths: request.escape_windows_paths,
            ..InterpolationOptions::default()
        };
        FilterWrappers::new(options, properties, request.model_values.clone())
    }

    fn copy_file(
        &self,
        from: &Path,
        to: &Path,
        filtering: bool,
        wrappers: &FilterWrappers,
        encoding: &'static Encoding,
    ) -> FilteringResult<()> {
        if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| FilteringError::io(parent, e))?;
        }

        if !filtering {
            fs::copy(from, to).map_err(|e| FilteringError::io(from, e))?;
            return Ok(());
        }

        let bytes = fs::read(from).map_err(|e| FilteringError::io(from, e))?;
        // A byte order mark decides the charset and is written back unchanged.
        let (encoding, bom) = match Encoding::for_bom(&bytes) {
            Some((bom_encoding, len)) => (bom_encoding, &bytes[..len]),
            None => (encoding, &[][..]),
        };
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom.len()..]);
        if had_errors {
            return Err(FilteringError::MalformedInput {
                path: from.to_path_buf(),
                encoding: encoding.name().to_string(),
            });
        }

        let filtered = wrappers.filter(&text)?;
        let (body, unmappable) = encode(&filtered, encoding);
        if unmappable {
            tracing::warn!(
                path = %to.display(),
                encoding = encoding.name(),
                "Filtered content has characters not representable in the target encoding"
            );
        }
        let mut encoded = Vec::with_capacity(bom.len() + body.len());
        encoded.extend_from_slice(bom);
        encoded.extend_from_slice(&body);
        fs::write(to, &encoded).map_err(|e| FilteringError::io(to, e))?;
        tracing::trace!(from = %from.display(), to = %to.display(), "Filtered file");
        Ok(())
    }
}

/// Encode `text` in `encoding`. `encoding_rs` only decodes UTF-16, so both
/// byte orders are encoded here.
fn encode<'a>(text: &'a str, encoding: &'static Encoding) -> (Cow<'a, [u8]>, bool) {
    if encoding == UTF_16LE {
        return (text.encode_utf16().flat_map(u16::to_le_bytes).collect(), false);
    }
    if encoding == UTF_16BE {
        return (text.encode_utf16().flat_map(u16::to_be_bytes).collect(), false);
    }
    let (bytes, _, unmappable) = encoding.encode(text);
    (bytes, unmappable)
}

#[cfg(test)]
#[path = "filter/filter_tests.rs"]
mod filter_tests;
