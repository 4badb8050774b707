//! Packaging configuration
//!
//! Configuration lives in an `acr.toml` build descriptor next to the project:
//!
//! ```toml
//! [project]
//! group_id = "com.example"
//! artifact_id = "client"
//! version = "1.0.0"
//!
//! [acr]
//! filter_deployment_descriptor = true
//! excludes = ["**/*.bak"]
//!
//! [acr.archive.manifest]
//! main_class = "com.example.Main"
//! ```

use crate::project::Project;
use acr_archiver::OutputTimestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Property overriding [`AcrConfig::output_directory`]
pub const OUTPUT_DIRECTORY_PROPERTY: &str = "maven.acr.outputDirectory";

/// Property overriding [`AcrConfig::escape_backslashes_in_file_path`]
pub const ESCAPE_BACKSLASHES_PROPERTY: &str = "maven.acr.escapeBackslashesInFilePath";

/// Property overriding [`AcrConfig::escape_string`]
pub const ESCAPE_STRING_PROPERTY: &str = "maven.acr.escapeString";

/// Property overriding [`AcrConfig::filter_deployment_descriptor`]
pub const FILTER_DEPLOYMENT_DESCRIPTOR_PROPERTY: &str = "maven.acr.filterDeploymentDescriptor";

/// Property supplying the reproducible build timestamp
pub const OUTPUT_TIMESTAMP_PROPERTY: &str = "project.build.outputTimestamp";

/// Default build descriptor file name
pub const DEFAULT_CONFIG_FILE: &str = "acr.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Packaging options for the application client archive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcrConfig {
    /// Directory the archive is written to (default: the build directory)
    #[serde(default)]
    pub basedir: Option<PathBuf>,

    /// Directory whose content is archived (default: the build output directory)
    #[serde(default)]
    pub output_directory: Option<PathBuf>,

    /// Archive base name without extension (default: the final name)
    #[serde(default)]
    pub jar_name: Option<String>,

    /// Patterns excluded from the output directory
    #[serde(default)]
    pub excludes: Vec<String>,

    #[serde(default)]
    pub archive: ArchiveConfiguration,

    /// Double backslashes of Windows paths substituted into the descriptor
    #[serde(default)]
    pub escape_backslashes_in_file_path: bool,

    /// Prefix that suppresses interpolation of the following expression
    #[serde(default)]
    pub escape_string: Option<String>,

    /// Filter `META-INF/application-client.xml` before archiving
    #[serde(default)]
    pub filter_deployment_descriptor: bool,

    /// Properties files providing filter values
    #[serde(default)]
    pub filters: Vec<PathBuf>,

    /// Reproducible entry timestamp (default: the project's output timestamp)
    #[serde(default)]
    pub output_timestamp: Option<String>,
}

/// Archive writing options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfiguration {
    #[serde(default = "default_true")]
    pub compress: bool,

    /// Rewrite the archive even when it is up to date
    #[serde(default = "default_true")]
    pub forced: bool,

    /// Embed `META-INF/maven/<group>/<artifact>/pom.properties`
    #[serde(default = "default_true")]
    pub add_maven_descriptor: bool,

    /// Existing manifest whose entries are merged into the generated one
    #[serde(default)]
    pub manifest_file: Option<PathBuf>,

    #[serde(default)]
    pub manifest: ManifestConfiguration,

    #[serde(default)]
    pub manifest_entries: BTreeMap<String, String>,

    #[serde(default)]
    pub manifest_sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for ArchiveConfiguration {
    fn default() -> Self {
        Self {
            compress: true,
            forced: true,
            add_maven_descriptor: true,
            manifest_file: None,
            manifest: ManifestConfiguration::default(),
            manifest_entries: BTreeMap::new(),
            manifest_sections: BTreeMap::new(),
        }
    }
}

/// Generated manifest options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfiguration {
    #[serde(default)]
    pub main_class: Option<String>,

    /// Add a `Class-Path` entry listing runtime dependencies
    #[serde(default)]
    pub add_classpath: bool,

    #[serde(default)]
    pub classpath_prefix: String,

    /// Add the `Created-By` entry
    #[serde(default = "default_true")]
    pub add_default_entries: bool,

    #[serde(default)]
    pub add_default_implementation_entries: bool,

    #[serde(default)]
    pub add_default_specification_entries: bool,
}

impl Default for ManifestConfiguration {
    fn default() -> Self {
        Self {
            main_class: None,
            add_classpath: false,
            classpath_prefix: String::new(),
            add_default_entries: true,
            add_default_implementation_entries: false,
            add_default_specification_entries: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Configuration with every project default filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub basedir: PathBuf,
    pub output_directory: PathBuf,
    pub jar_name: String,
    pub output_timestamp: Option<String>,
}

impl ResolvedConfig {
    /// The archive file to produce
    pub fn jar_file(&self) -> PathBuf {
        self.basedir
            .join(format!("{}.{}", self.jar_name, acr_archiver::JAR_EXTENSION))
    }
}

impl AcrConfig {
    /// Create a configuration with every option at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the `maven.acr.*` property overrides
    pub fn apply_user_properties(
        &mut self,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), ConfigError> {
        if let Some(dir) = properties.get(OUTPUT_DIRECTORY_PROPERTY) {
            self.output_directory = Some(PathBuf::from(dir));
        }
        if let Some(value) = properties.get(ESCAPE_BACKSLASHES_PROPERTY) {
            self.escape_backslashes_in_file_path =
                parse_bool(ESCAPE_BACKSLASHES_PROPERTY, value)?;
        }
        if let Some(value) = properties.get(ESCAPE_STRING_PROPERTY) {
            self.escape_string = Some(value.clone());
        }
        if let Some(value) = properties.get(FILTER_DEPLOYMENT_DESCRIPTOR_PROPERTY) {
            self.filter_deployment_descriptor =
                parse_bool(FILTER_DEPLOYMENT_DESCRIPTOR_PROPERTY, value)?;
        }
        if let Some(value) = properties.get(OUTPUT_TIMESTAMP_PROPERTY) {
            self.output_timestamp = Some(value.clone());
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.jar_name {
            if name.is_empty() {
                return Err(ConfigError::Invalid("jar_name cannot be empty".to_string()));
            }
            if name.contains(['/', '\\']) {
                return Err(ConfigError::Invalid(format!(
                    "jar_name must not contain path separators: {name}"
                )));
            }
        }

        if self.escape_string.as_deref() == Some("") {
            return Err(ConfigError::Invalid(
                "escape_string cannot be empty".to_string(),
            ));
        }

        for name in self.archive.manifest_sections.keys() {
            if name.is_empty() {
                return Err(ConfigError::Invalid(
                    "manifest section name cannot be empty".to_string(),
                ));
            }
        }

        OutputTimestamp::parse(self.output_timestamp.as_deref())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }

    /// Fill in project defaults and anchor relative paths on the project base directory
    pub fn resolve(&self, project: &Project) -> ResolvedConfig {
        let basedir = match &self.basedir {
            Some(dir) => project.resolve_path(dir),
            None => project.build_directory(),
        };
        let output_directory = match &self.output_directory {
            Some(dir) => project.resolve_path(dir),
            None => project.build_output_directory(),
        };
        let jar_name = self
            .jar_name
            .clone()
            .unwrap_or_else(|| project.final_name());
        let output_timestamp = self
            .output_timestamp
            .clone()
            .or_else(|| project.build.output_timestamp.clone())
            .or_else(|| project.properties.get(OUTPUT_TIMESTAMP_PROPERTY).cloned());

        ResolvedConfig {
            basedir,
            output_directory,
            jar_name,
            output_timestamp,
        }
    }
}

fn parse_bool(property: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "" => Ok(true),
        "false" => Ok(false),
        other => Err(ConfigError::Invalid(format!(
            "{property} expects true or false, got '{other}'"
        ))),
    }
}

/// An `acr.toml` build descriptor: the project model plus packaging options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildDescriptor {
    pub project: Project,

    #[serde(default)]
    pub acr: AcrConfig,
}

impl BuildDescriptor {
    /// Load a build descriptor, using its directory as the project base directory
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut descriptor = Self::from_str(&content)?;
        descriptor.project.basedir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(descriptor)
    }

    /// Parse a build descriptor
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let mut descriptor: Self = toml::from_str(content)?;
        descriptor.project.init_artifact();
        Ok(descriptor)
    }

    /// Validate project coordinates and packaging options
    pub fn validate(&self) -> Result<(), ConfigError> {
        let project = &self.project;
        if project.group_id.is_empty() {
            return Err(ConfigError::Invalid("group_id cannot be empty".to_string()));
        }
        if project.artifact_id.is_empty() {
            return Err(ConfigError::Invalid(
                "artifact_id cannot be empty".to_string(),
            ));
        }
        if project.version.is_empty() {
            return Err(ConfigError::Invalid("version cannot be empty".to_string()));
        }
        for dependency in &project.dependencies {
            if dependency.group_id.is_empty() || dependency.artifact_id.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "dependency coordinates are incomplete: {}",
                    dependency.coordinates()
                )));
            }
        }

        self.acr.validate()
    }
}
