//! JAR creation.
//!
//! The [`JarArchiver`] collects resources from directories, single files and
//! in-memory buffers, then writes them into a `.jar` with a manifest.

use crate::scanner::DirectoryScanner;
use crate::timestamp::zip_datetime_from_system;
use crate::{
    ArchiverError, ArchiverResult, MANIFEST_NAME, META_INF_DIR, Manifest, OutputTimestamp,
};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// What to do when the same entry name is added twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateBehavior {
    /// Keep the first entry and log a warning.
    #[default]
    Skip,
    /// Fail archive creation.
    Fail,
}

/// Result of [`JarArchiver::create_archive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The archive was written.
    Written,
    /// The archive was newer than all inputs and left untouched.
    UpToDate,
}

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Directory,
    Bytes(Vec<u8>),
}

/// A single entry to be written.
#[derive(Debug, Clone)]
struct Resource {
    /// Entry name within the archive; directories end with `/`.
    name: String,
    source: Source,
}

/// Builder for JAR archives.
///
/// `META-INF/` and `META-INF/MANIFEST.MF` are always the first two entries.
/// A `META-INF/MANIFEST.MF` found among the added resources is merged into
/// the manifest passed to [`create_archive`](Self::create_archive), with the
/// passed values taking precedence.
#[derive(Debug, Clone)]
pub struct JarArchiver {
    output_file: Option<PathBuf>,
    compress: bool,
    forced: bool,
    use_default_excludes: bool,
    duplicate_behavior: DuplicateBehavior,
    timestamp: Option<OutputTimestamp>,
    resources: Vec<Resource>,
}

impl Default for JarArchiver {
    fn default() -> Self {
        Self::new()
    }
}

impl JarArchiver {
    /// Create an archiver with compression on and forced recreation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output_file: None,
            compress: true,
            forced: true,
            use_default_excludes: true,
            duplicate_behavior: DuplicateBehavior::default(),
            timestamp: None,
            resources: Vec::new(),
        }
    }

    /// Set the archive file to write.
    pub fn set_output_file<P: AsRef<Path>>(&mut self, path: P) {
        self.output_file = Some(path.as_ref().to_path_buf());
    }

    #[must_use]
    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    /// Deflate entries (`true`) or store them uncompressed.
    pub fn set_compress(&mut self, compress: bool) {
        self.compress = compress;
    }

    /// When `false`, an existing archive newer than every input is kept.
    pub fn set_forced(&mut self, forced: bool) {
        self.forced = forced;
    }

    /// Apply the SCM/editor default excludes to added directories.
    pub fn set_use_default_excludes(&mut self, use_default_excludes: bool) {
        self.use_default_excludes = use_default_excludes;
    }

    pub fn set_duplicate_behavior(&mut self, behavior: DuplicateBehavior) {
        self.duplicate_behavior = behavior;
    }

    /// Configure reproducible output from an output timestamp value.
    ///
    /// A valid timestamp fixes every entry's modification time and
    /// permissions and sorts entries by name. `None` or a value shorter than
    /// two characters leaves the archive non-reproducible.
    pub fn configure_reproducible(&mut self, output_timestamp: Option<&str>) -> ArchiverResult<()> {
        self.timestamp = OutputTimestamp::parse(output_timestamp)?;
        if let Some(timestamp) = &self.timestamp {
            tracing::debug!(%timestamp, "Reproducible archive entries enabled");
        }
        Ok(())
    }

    #[must_use]
    pub fn reproducible_timestamp(&self) -> Option<OutputTimestamp> {
        self.timestamp
    }

    /// Add the contents of a directory selected by include/exclude patterns.
    pub fn add_directory<P, S>(&mut self, dir: P, includes: &[S], excludes: &[S]) -> ArchiverResult<()>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let scanner = DirectoryScanner::with_options(
            dir.as_ref(),
            includes,
            excludes,
            self.use_default_excludes,
        )?;

        for entry in scanner.scan()? {
            if entry.is_dir {
                self.resources.push(Resource {
                    name: format!("{}/", entry.relative),
                    source: Source::Directory,
                });
            } else {
                self.resources.push(Resource {
                    name: entry.relative,
                    source: Source::File(entry.path),
                });
            }
        }
        Ok(())
    }

    /// Add a single file under the given entry name.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, entry_name: &str) -> ArchiverResult<()> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ArchiverError::NotAFile(path.display().to_string()));
        }
        self.resources.push(Resource {
            name: normalize_entry_name(entry_name)?,
            source: Source::File(path.to_path_buf()),
        });
        Ok(())
    }

    /// Add an in-memory entry.
    pub fn add_bytes(&mut self, entry_name: &str, contents: Vec<u8>) -> ArchiverResult<()> {
        self.resources.push(Resource {
            name: normalize_entry_name(entry_name)?,
            source: Source::Bytes(contents),
        });
        Ok(())
    }

    /// Names of all resources added so far, in insertion order.
    #[must_use]
    pub fn entry_names(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.name.as_str()).collect()
    }

    /// Write the archive.
    pub fn create_archive(&self, manifest: &Manifest) -> ArchiverResult<CreateOutcome> {
        let output = self
            .output_file
            .as_deref()
            .ok_or(ArchiverError::MissingOutputFile)?;

        if !self.forced && self.is_up_to_date(output)? {
            tracing::info!(path = %output.display(), "Archive is up to date");
            return Ok(CreateOutcome::UpToDate);
        }

        let mut manifest = manifest.clone();
        let planned = self.plan(&mut manifest)?;

        tracing::info!("Building jar: {}", output.display());
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut zip = ZipWriter::new(File::create(output)?);
        let mut written_dirs: HashSet<String> = HashSet::new();

        written_dirs.insert(META_INF_DIR.to_string());
        zip.add_directory(META_INF_DIR, self.entry_options(None, true)?)?;
        zip.start_file(MANIFEST_NAME, self.entry_options(None, false)?)?;
        manifest.write_to(&mut zip)?;

        for resource in planned {
            for parent in parent_dirs(&resource.name) {
                if written_dirs.insert(parent.clone()) {
                    zip.add_directory(parent.as_str(), self.entry_options(None, true)?)?;
                }
            }

            match &resource.source {
                Source::Directory => {
                    if written_dirs.insert(resource.name.clone()) {
                        zip.add_directory(resource.name.as_str(), self.entry_options(None, true)?)?;
                    }
                }
                Source::File(path) => {
                    let modified = fs::metadata(path)?.modified().ok();
                    zip.start_file(resource.name.as_str(), self.entry_options(modified, false)?)?;
                    let mut file = File::open(path)?;
                    io::copy(&mut file, &mut zip)?;
                }
                Source::Bytes(contents) => {
                    zip.start_file(resource.name.as_str(), self.entry_options(None, false)?)?;
                    zip.write_all(contents)?;
                }
            }
        }

        zip.finish()?;
        Ok(CreateOutcome::Written)
    }

    /// Resolve duplicates and pull an embedded manifest out of the resources.
    fn plan(&self, manifest: &mut Manifest) -> ArchiverResult<Vec<&Resource>> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut planned = Vec::with_capacity(self.resources.len());

        for resource in &self.resources {
            if resource.name == META_INF_DIR {
                continue;
            }
            if resource.name == MANIFEST_NAME {
                let found = match &resource.source {
                    Source::File(path) => Manifest::from_file(path)?,
                    Source::Bytes(contents) => Manifest::from_bytes(contents)?,
                    Source::Directory => continue,
                };
                tracing::debug!("Merging manifest found in archive content");
                manifest.merge_missing(&found);
                continue;
            }
            if !seen.insert(resource.name.as_str()) {
                match self.duplicate_behavior {
                    DuplicateBehavior::Skip => {
                        tracing::warn!(entry = %resource.name, "Skipping duplicate entry");
                        continue;
                    }
                    DuplicateBehavior::Fail => {
                        return Err(ArchiverError::DuplicateEntry(resource.name.clone()));
                    }
                }
            }
            planned.push(resource);
        }

        if self.timestamp.is_some() {
            planned.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(planned)
    }

    fn entry_options(
        &self,
        modified: Option<SystemTime>,
        is_dir: bool,
    ) -> ArchiverResult<SimpleFileOptions> {
        let method = if self.compress && !is_dir {
            CompressionMethod::Deflated
        } else {
            CompressionMethod::Stored
        };
        let mut options = SimpleFileOptions::default().compression_method(method);

        if let Some(timestamp) = &self.timestamp {
            options = options
                .last_modified_time(timestamp.to_zip_datetime()?)
                .unix_permissions(if is_dir { 0o755 } else { 0o644 });
        } else if let Some(modified) = modified {
            options = options.last_modified_time(zip_datetime_from_system(modified));
        }
        Ok(options)
    }

    fn is_up_to_date(&self, output: &Path) -> ArchiverResult<bool> {
        let Ok(metadata) = fs::metadata(output) else {
            return Ok(false);
        };
        let archive_time = metadata.modified()?;

        for resource in &self.resources {
            match &resource.source {
                Source::File(path) => {
                    if fs::metadata(path)?.modified()? > archive_time {
                        return Ok(false);
                    }
                }
                Source::Bytes(_) | Source::Directory => {}
            }
        }
        Ok(true)
    }
}

/// Normalize an entry name to `/` separators and reject names that escape the root.
fn normalize_entry_name(name: &str) -> ArchiverResult<String> {
    let normalized = name.replace('\\', "/");
    let escapes = normalized.starts_with('/')
        || normalized.split('/').any(|segment| segment == "..")
        || normalized.is_empty();
    if escapes {
        return Err(ArchiverError::InvalidEntryName(name.to_string()));
    }
    Ok(normalized)
}

/// Parent directory entries of an entry name, outermost first.
fn parent_dirs(name: &str) -> Vec<String> {
    let trimmed = name.trim_end_matches('/');
    let mut parents = Vec::new();
    for (index, ch) in trimmed.char_indices() {
        if ch == '/' {
            parents.push(format!("{}/", &trimmed[..index]));
        }
    }
    parents
}
