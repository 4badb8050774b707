//! Ant-style directory scanning.
//!
//! Patterns are matched against paths relative to the scanned directory,
//! always using `/` as the separator:
//!
//! - `*` matches within a single path segment
//! - `**` matches any number of segments, including none
//! - a pattern ending in `/` is treated as ending in `/**`
//! - `dir/**` also matches `dir` itself

use crate::{ArchiverError, ArchiverResult};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Patterns for SCM and editor files excluded when default excludes are on.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    // Miscellaneous typical temporary files
    "**/*~",
    "**/#*#",
    "**/.#*",
    "**/%*%",
    "**/._*",
    // CVS
    "**/CVS/**",
    "**/.cvsignore",
    // RCS / SCCS
    "**/RCS/**",
    "**/SCCS/**",
    // Visual SourceSafe
    "**/vssver.scc",
    // Subversion
    "**/.svn/**",
    // Arch
    "**/.arch-ids/**",
    // Bazaar
    "**/.bzr/**",
    // SurroundSCM
    "**/.MySCMServerInfo",
    // Mac
    "**/.DS_Store",
    // Serena Dimensions
    "**/.metadata/**",
    // Mercurial
    "**/.hg/**",
    "**/.hgignore",
    // git
    "**/.git/**",
    "**/.gitignore",
    "**/.gitattributes",
    // BitKeeper
    "**/BitKeeper/**",
    "**/ChangeSet/**",
    // darcs
    "**/_darcs/**",
    "**/.darcsrepo/**",
    "**/-darcs-backup*",
    "**/.darcs-temp-mail",
];

/// A file or directory selected by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedEntry {
    /// Path relative to the scanned directory, `/`-separated.
    pub relative: String,
    /// Absolute (or caller-relative) path on disk.
    pub path: PathBuf,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// Selects files under a directory by include and exclude patterns.
///
/// A path is selected when it matches at least one include and no exclude.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    basedir: PathBuf,
    includes: GlobSet,
    excludes: GlobSet,
    include_empty_dirs: bool,
}

impl DirectoryScanner {
    /// Create a scanner. Default SCM excludes are applied.
    pub fn new<P, S>(basedir: P, includes: &[S], excludes: &[S]) -> ArchiverResult<Self>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        Self::with_options(basedir, includes, excludes, true)
    }

    /// Create a scanner, choosing whether default SCM excludes apply.
    pub fn with_options<P, S>(
        basedir: P,
        includes: &[S],
        excludes: &[S],
        use_default_excludes: bool,
    ) -> ArchiverResult<Self>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let mut include_patterns: Vec<&str> = includes.iter().map(AsRef::as_ref).collect();
        if include_patterns.is_empty() {
            include_patterns.push("**");
        }
        let mut exclude_patterns: Vec<&str> = excludes.iter().map(AsRef::as_ref).collect();
        if use_default_excludes {
            exclude_patterns.extend_from_slice(DEFAULT_EXCLUDES);
        }

        Ok(Self {
            basedir: basedir.as_ref().to_path_buf(),
            includes: compile(&include_patterns)?,
            excludes: compile(&exclude_patterns)?,
            include_empty_dirs: true,
        })
    }

    /// Whether directories with no selected content are reported.
    #[must_use]
    pub fn include_empty_dirs(mut self, include: bool) -> Self {
        self.include_empty_dirs = include;
        self
    }

    /// Whether a relative path is selected by the patterns.
    #[must_use]
    pub fn is_selected(&self, relative: &str) -> bool {
        self.includes.is_match(relative) && !self.excludes.is_match(relative)
    }

    /// Walk the directory and return selected entries sorted by path.
    ///
    /// Directories are only reported when they match the patterns themselves;
    /// parent directories of selected files are left to the caller.
    pub fn scan(&self) -> ArchiverResult<Vec<ScannedEntry>> {
        let mut selected = Vec::new();

        for entry in WalkDir::new(&self.basedir)
            .follow_links(true)
            .sort_by_file_name()
            .min_depth(1)
        {
            let entry = entry?;
            let relative = relative_name(&self.basedir, entry.path())?;
            let is_dir = entry.file_type().is_dir();

            if is_dir && !self.include_empty_dirs {
                continue;
            }
            if self.is_selected(&relative) {
                selected.push(ScannedEntry {
                    relative,
                    path: entry.into_path(),
                    is_dir,
                });
            }
        }

        tracing::trace!(
            basedir = %self.basedir.display(),
            count = selected.len(),
            "Scanned directory"
        );
        Ok(selected)
    }
}

/// Normalize an Ant-style pattern into a glob.
#[must_use]
pub fn normalize_pattern(pattern: &str) -> String {
    let mut normalized = pattern.trim().replace('\\', "/");
    while let Some(stripped) = normalized.strip_prefix('/') {
        normalized = stripped.to_string();
    }
    if normalized.ends_with('/') {
        normalized.push_str("**");
    }
    while normalized.contains("**/**") {
        normalized = normalized.replace("**/**", "**");
    }
    normalized
}

fn compile(patterns: &[&str]) -> ArchiverResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let normalized = normalize_pattern(pattern);
        let mut variants = vec![normalized.clone()];
        if let Some(dir) = normalized.strip_suffix("/**") {
            variants.push(dir.to_string());
        }
        for variant in variants {
            let glob = GlobBuilder::new(&variant)
                .literal_separator(true)
                .build()
                .map_err(|source| ArchiverError::Pattern {
                    pattern: (*pattern).to_string(),
                    source,
                })?;
            builder.add(glob);
        }
    }
    builder.build().map_err(|source| ArchiverError::Pattern {
        pattern: patterns.join(","),
        source,
    })
}

fn relative_name(basedir: &Path, path: &Path) -> ArchiverResult<String> {
    let relative = path
        .strip_prefix(basedir)
        .map_err(|_| ArchiverError::InvalidEntryName(path.display().to_string()))?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}
