//! JAR inspection.
//!
//! The [`JarReader`] opens an existing archive to list and read entries.

use crate::{ArchiverError, ArchiverResult, MANIFEST_NAME, Manifest};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Reader for JAR archives.
///
/// # Example
///
/// ```no_run
/// use acr_archiver::JarReader;
///
/// let mut reader = JarReader::open("target/my-client-1.0.0.jar")?;
/// for name in reader.entry_names() {
///     println!("{name}");
/// }
/// let manifest = reader.manifest()?;
/// # Ok::<(), acr_archiver::ArchiverError>(())
/// ```
#[derive(Debug)]
pub struct JarReader {
    archive: ZipArchive<File>,
}

impl JarReader {
    /// Open an archive for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> ArchiverResult<Self> {
        let file = File::open(path.as_ref())?;
        let archive = ZipArchive::new(file)?;
        Ok(Self { archive })
    }

    /// Entry names in archive order.
    #[must_use]
    pub fn entry_names(&self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|index| self.archive.name_for_index(index))
            .map(str::to_string)
            .collect()
    }

    /// Number of entries, directories included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Whether an entry with this exact name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read an entry's bytes.
    pub fn read_entry(&mut self, name: &str) -> ArchiverResult<Vec<u8>> {
        let mut entry = self
            .archive
            .by_name(name)
            .map_err(|_| ArchiverError::MissingEntry(name.to_string()))?;
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Read an entry as UTF-8 text.
    pub fn read_entry_to_string(&mut self, name: &str) -> ArchiverResult<String> {
        let bytes = self.read_entry(name)?;
        String::from_utf8(bytes).map_err(|e| {
            ArchiverError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Parse `META-INF/MANIFEST.MF`.
    pub fn manifest(&mut self) -> ArchiverResult<Manifest> {
        let bytes = self.read_entry(MANIFEST_NAME)?;
        Ok(Manifest::from_bytes(&bytes)?)
    }
}
