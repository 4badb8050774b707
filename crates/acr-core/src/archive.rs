//! Project-aware archive creation.
//!
//! [`ProjectArchiver`] wraps a [`JarArchiver`] and derives the manifest and
//! the embedded Maven descriptor from a [`Project`] and its
//! [`ArchiveConfiguration`].

use crate::config::{ArchiveConfiguration, ConfigError};
use crate::project::Project;
use crate::{AcrError, AcrResult};
use acr_archiver::{ArchiverError, CreateOutcome, JarArchiver, Manifest};
use std::path::Path;

/// `Created-By` value written when default entries are enabled
pub const CREATED_BY: &str = concat!("acr ", env!("CARGO_PKG_VERSION"));

/// Builds an application client archive for a project.
#[derive(Debug, Clone)]
pub struct ProjectArchiver {
    archiver: JarArchiver,
}

impl Default for ProjectArchiver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectArchiver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            archiver: JarArchiver::new(),
        }
    }

    pub fn set_output_file<P: AsRef<Path>>(&mut self, path: P) {
        self.archiver.set_output_file(path);
    }

    /// Enable reproducible entries; an unparseable timestamp is a configuration error.
    pub fn configure_reproducible(&mut self, output_timestamp: Option<&str>) -> AcrResult<()> {
        self.archiver
            .configure_reproducible(output_timestamp)
            .map_err(|e| match e {
                ArchiverError::InvalidTimestamp(message) => {
                    AcrError::Config(ConfigError::Invalid(message))
                }
                other => other.into(),
            })
    }

    /// The wrapped archiver, for adding content.
    pub fn archiver_mut(&mut self) -> &mut JarArchiver {
        &mut self.archiver
    }

    #[must_use]
    pub fn archiver(&self) -> &JarArchiver {
        &self.archiver
    }

    /// Build the manifest for a project.
    ///
    /// Configured entries override generated ones, and entries from
    /// `manifest_file` only fill in what is still missing.
    pub fn manifest(&self, project: &Project, config: &ArchiveConfiguration) -> AcrResult<Manifest> {
        let options = &config.manifest;
        let mut manifest = Manifest::new();

        if options.add_default_entries {
            manifest.set_main_attribute("Created-By", CREATED_BY)?;
        }
        if let Some(main_class) = &options.main_class {
            manifest.set_main_attribute("Main-Class", main_class)?;
        }
        if options.add_classpath {
            let classpath = class_path(project, &options.classpath_prefix)?;
            if !classpath.is_empty() {
                manifest.set_main_attribute("Class-Path", &classpath)?;
            }
        }

        let title = project.name.as_deref().unwrap_or(&project.artifact_id);
        if options.add_default_specification_entries {
            manifest.set_main_attribute("Specification-Title", title)?;
            manifest.set_main_attribute(
                "Specification-Version",
                &specification_version(&project.version),
            )?;
            if let Some(vendor) = &project.organization {
                manifest.set_main_attribute("Specification-Vendor", vendor)?;
            }
        }
        if options.add_default_implementation_entries {
            manifest.set_main_attribute("Implementation-Title", title)?;
            manifest.set_main_attribute("Implementation-Version", &project.version)?;
            if let Some(vendor) = &project.organization {
                manifest.set_main_attribute("Implementation-Vendor", vendor)?;
            }
        }

        for (name, value) in &config.manifest_entries {
            manifest.set_main_attribute(name, value)?;
        }
        for (section, entries) in &config.manifest_sections {
            for (name, value) in entries {
                manifest.set_section_attribute(section, name, value)?;
            }
        }

        if let Some(file) = &config.manifest_file {
            let path = project.resolve_path(file);
            tracing::debug!(path = %path.display(), "Merging manifest file");
            manifest.merge_missing(&Manifest::from_file(&path)?);
        }

        Ok(manifest)
    }

    /// Write the archive for a project.
    pub fn create_archive(
        &mut self,
        project: &Project,
        config: &ArchiveConfiguration,
    ) -> AcrResult<CreateOutcome> {
        self.archiver.set_compress(config.compress);
        self.archiver.set_forced(config.forced);

        let manifest = self.manifest(project, config)?;

        if config.add_maven_descriptor {
            self.archiver.add_bytes(
                &pom_properties_entry(project),
                pom_properties(project, CREATED_BY).into_bytes(),
            )?;
        }

        Ok(self.archiver.create_archive(&manifest)?)
    }
}

/// Space separated `Class-Path` value for the project's runtime dependencies.
fn class_path(project: &Project, prefix: &str) -> AcrResult<String> {
    let prefix = match prefix {
        "" => String::new(),
        p if p.ends_with('/') => p.to_string(),
        p => format!("{p}/"),
    };

    let entries: Vec<String> = project
        .runtime_classpath()?
        .iter()
        .filter_map(|file| file.file_name())
        .map(|name| format!("{prefix}{}", name.to_string_lossy()))
        .collect();
    Ok(entries.join(" "))
}

/// `major.minor` of a version, dropping any qualifier.
pub(crate) fn specification_version(version: &str) -> String {
    let release = version.split(['-', '+']).next().unwrap_or(version);
    let parts: Vec<&str> = release.split('.').take(2).collect();
    parts.join(".")
}

pub(crate) fn pom_properties_entry(project: &Project) -> String {
    format!(
        "META-INF/maven/{}/{}/pom.properties",
        project.group_id, project.artifact_id
    )
}

pub(crate) fn pom_properties(project: &Project, created_by: &str) -> String {
    format!(
        "#Created by {created_by}\nartifactId={}\ngroupId={}\nversion={}\n",
        project.artifact_id, project.group_id, project.version
    )
}

#[cfg(test)]
#[path = "archive/archive_tests.rs"]
mod archive_tests;
