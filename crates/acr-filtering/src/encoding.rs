//! XML encoding detection.
//!
//! Detection order: byte order mark, UTF-16 without BOM, the `encoding`
//! attribute of the XML declaration, then UTF-8.

use crate::{FilteringError, FilteringResult};
use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Bytes examined for the XML declaration.
const PROLOG_LIMIT: usize = 1024;

/// Detect the encoding of an XML document.
pub fn detect_xml_encoding(bytes: &[u8]) -> FilteringResult<&'static Encoding> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Ok(encoding);
    }
    if bytes.starts_with(&[0x00, b'<', 0x00, b'?']) {
        return Ok(UTF_16BE);
    }
    if bytes.starts_with(&[b'<', 0x00, b'?', 0x00]) {
        return Ok(UTF_16LE);
    }

    let prolog = &bytes[..bytes.len().min(PROLOG_LIMIT)];
    if !prolog.starts_with(b"<?xml") {
        return Ok(UTF_8);
    }
    let end = prolog
        .windows(2)
        .position(|w| w == b"?>")
        .unwrap_or(prolog.len());
    let declaration = String::from_utf8_lossy(&prolog[..end]);

    match declared_encoding(&declaration) {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| FilteringError::UnsupportedEncoding(label.to_string())),
        None => Ok(UTF_8),
    }
}

/// Detect the encoding of an XML file on disk.
pub fn detect_xml_file_encoding<P: AsRef<Path>>(path: P) -> FilteringResult<&'static Encoding> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| FilteringError::io(path, e))?;
    detect_xml_encoding(&bytes)
}

fn declared_encoding(declaration: &str) -> Option<&str> {
    static ATTRIBUTE: OnceLock<Option<Regex>> = OnceLock::new();
    ATTRIBUTE
        .get_or_init(|| Regex::new(r#"encoding\s*=\s*["']([A-Za-z][A-Za-z0-9._\-]*)["']"#).ok())
        .as_ref()?
        .captures(declaration)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
