//! JAR manifest model.
//!
//! A manifest is a main section followed by zero or more named sections.
//! Attribute names are compared case-insensitively and keep their insertion
//! order when written.

use crate::ManifestError;
use std::io::Write;
use std::path::Path;

/// Maximum line length in bytes, excluding the line terminator.
const MAX_LINE_LENGTH: usize = 72;

/// Maximum attribute name length in bytes.
const MAX_NAME_LENGTH: usize = 70;

/// Manifest format version written by default.
pub const MANIFEST_VERSION: &str = "1.0";

/// Ordered set of manifest attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Create an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether an attribute with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set an attribute, replacing any existing value in place.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), ManifestError> {
        validate_name(name)?;
        match self
            .entries
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Remove an attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index).1)
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn merge_missing(&mut self, other: &Attributes) {
        for (name, value) in &other.entries {
            if !self.contains(name) {
                self.entries.push((name.clone(), value.clone()));
            }
        }
    }
}

/// A JAR manifest (`META-INF/MANIFEST.MF`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    main: Attributes,
    sections: Vec<(String, Attributes)>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

impl Manifest {
    /// Create a manifest containing only `Manifest-Version: 1.0`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            main: Attributes {
                entries: vec![("Manifest-Version".to_string(), MANIFEST_VERSION.to_string())],
            },
            sections: Vec::new(),
        }
    }

    /// Load a manifest from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ManifestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a manifest from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ManifestError> {
        let text = std::str::from_utf8(bytes).map_err(|_| ManifestError::InvalidEncoding)?;
        Self::parse(text)
    }

    /// Parse a manifest from text.
    ///
    /// Accepts `CRLF`, `LF` and `CR` line terminators. The main section ends at
    /// the first blank line; each following section must begin with `Name`.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut manifest = Self {
            main: Attributes::new(),
            sections: Vec::new(),
        };

        // Logical lines: (line number, content) with continuations folded in.
        let mut blocks: Vec<Vec<(usize, String)>> = vec![Vec::new()];
        for (index, raw) in split_lines(text).enumerate() {
            let line_number = index + 1;
            if raw.is_empty() {
                if blocks.last().is_some_and(|b| !b.is_empty()) {
                    blocks.push(Vec::new());
                }
                continue;
            }
            if let Some(rest) = raw.strip_prefix(' ') {
                let current = blocks
                    .last_mut()
                    .and_then(|block| block.last_mut())
                    .ok_or(ManifestError::UnexpectedContinuation(line_number))?;
                current.1.push_str(rest);
                continue;
            }
            if let Some(block) = blocks.last_mut() {
                block.push((line_number, raw.to_string()));
            }
        }

        for (block_index, block) in blocks.into_iter().filter(|b| !b.is_empty()).enumerate() {
            let mut attributes = Attributes::new();
            let first_line = block.first().map(|(n, _)| *n).unwrap_or_default();
            for (line_number, line) in block {
                let (name, value) =
                    line.split_once(": ")
                        .ok_or_else(|| ManifestError::InvalidLine {
                            line: line_number,
                            content: line.clone(),
                        })?;
                attributes.insert(name, value)?;
            }

            if block_index == 0 && !attributes.contains("Name") {
                manifest.main = attributes;
            } else {
                let name = attributes
                    .remove("Name")
                    .ok_or(ManifestError::MissingSectionName(first_line))?;
                manifest.sections.push((name, attributes));
            }
        }

        Ok(manifest)
    }

    /// Main section attributes.
    #[must_use]
    pub fn main_attributes(&self) -> &Attributes {
        &self.main
    }

    /// Get a main attribute value.
    #[must_use]
    pub fn main_attribute(&self, name: &str) -> Option<&str> {
        self.main.get(name)
    }

    /// Set a main attribute value.
    pub fn set_main_attribute(&mut self, name: &str, value: &str) -> Result<(), ManifestError> {
        self.main.insert(name, value)
    }

    /// Get a named section.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Attributes> {
        self.sections
            .iter()
            .find(|(section, _)| section == name)
            .map(|(_, attributes)| attributes)
    }

    /// Set an attribute in a named section, creating the section if needed.
    pub fn set_section_attribute(
        &mut self,
        section: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ManifestError> {
        if let Some((_, attributes)) = self.sections.iter_mut().find(|(s, _)| s == section) {
            return attributes.insert(name, value);
        }
        let mut attributes = Attributes::new();
        attributes.insert(name, value)?;
        self.sections.push((section.to_string(), attributes));
        Ok(())
    }

    /// Names of all individual sections, in order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }

    /// Fill in attributes and sections from `other` that this manifest lacks.
    ///
    /// Values already present here are kept.
    pub fn merge_missing(&mut self, other: &Manifest) {
        self.main.merge_missing(&other.main);
        for (name, attributes) in &other.sections {
            match self.sections.iter_mut().find(|(s, _)| s == name) {
                Some((_, existing)) => existing.merge_missing(attributes),
                None => self.sections.push((name.clone(), attributes.clone())),
            }
        }
    }

    /// Serialize the manifest.
    ///
    /// `Manifest-Version` is always written first. Lines are terminated with
    /// `CRLF` and wrapped at 72 bytes.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let version = self
            .main
            .get("Manifest-Version")
            .unwrap_or(MANIFEST_VERSION);
        write_attribute(out, "Manifest-Version", version)?;
        for (name, value) in self.main.iter() {
            if !name.eq_ignore_ascii_case("Manifest-Version") {
                write_attribute(out, name, value)?;
            }
        }
        out.write_all(b"\r\n")?;

        for (section, attributes) in &self.sections {
            write_attribute(out, "Name", section)?;
            for (name, value) in attributes.iter() {
                write_attribute(out, name, value)?;
            }
            out.write_all(b"\r\n")?;
        }
        Ok(())
    }

    /// Serialize the manifest to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut out);
        out
    }
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let trimmed = text.trim_end_matches(['\r', '\n']);
    let mut rest = Some(trimmed);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(['\r', '\n']) {
            Some(pos) => {
                let skip = if current[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[pos + skip..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
    .filter(move |_| !trimmed.is_empty())
}

fn write_attribute<W: Write>(out: &mut W, name: &str, value: &str) -> std::io::Result<()> {
    let line = format!("{name}: {value}");
    let mut rest = line.as_str();
    let mut first = true;
    loop {
        // Continuation lines spend one byte on the leading space.
        let limit = if first { MAX_LINE_LENGTH } else { MAX_LINE_LENGTH - 1 };
        if !first {
            out.write_all(b" ")?;
        }
        if rest.len() <= limit {
            out.write_all(rest.as_bytes())?;
            out.write_all(b"\r\n")?;
            return Ok(());
        }
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        out.write_all(&rest.as_bytes()[..cut])?;
        out.write_all(b"\r\n")?;
        rest = &rest[cut..];
        first = false;
    }
}

fn validate_name(name: &str) -> Result<(), ManifestError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LENGTH
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(ManifestError::InvalidAttributeName(name.to_string()))
    }
}
