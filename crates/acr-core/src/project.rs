//! Project model: coordinates, build layout, dependencies and the produced artifact

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Packaging type recorded on the produced artifact
pub const APP_CLIENT_PACKAGING: &str = "app-client";

/// A dependency needed on the runtime class path has no resolved file
#[derive(Debug, Error)]
#[error("dependency {artifact} has not been resolved to a file")]
pub struct DependencyResolutionError {
    /// `groupId:artifactId:version` of the unresolved dependency
    pub artifact: String,
}

/// Dependency scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    Provided,
    Test,
    System,
}

impl Scope {
    /// Whether the scope is part of the runtime class path
    pub fn is_runtime(self) -> bool {
        matches!(self, Scope::Compile | Scope::Runtime)
    }
}

/// A project dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,

    #[serde(default)]
    pub scope: Scope,

    /// Resolved file, relative paths are anchored on the project base directory
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Dependency {
    /// `groupId:artifactId:version`
    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// Build layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    /// Build directory (default: `target`)
    #[serde(default = "default_build_directory")]
    pub directory: PathBuf,

    /// Compiled output directory (default: `<directory>/classes`)
    #[serde(default)]
    pub output_directory: Option<PathBuf>,

    /// Base name of produced archives (default: `<artifactId>-<version>`)
    #[serde(default)]
    pub final_name: Option<String>,

    /// Timestamp for reproducible archive entries
    #[serde(default)]
    pub output_timestamp: Option<String>,
}

fn default_build_directory() -> PathBuf {
    PathBuf::from("target")
}

impl Default for Build {
    fn default() -> Self {
        Self {
            directory: default_build_directory(),
            output_directory: None,
            final_name: None,
            output_timestamp: None,
        }
    }
}

/// The artifact record a build produces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub packaging: String,
    pub file: Option<PathBuf>,
}

/// A project being packaged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Directory containing the project descriptor
    #[serde(skip)]
    pub basedir: PathBuf,

    pub group_id: String,
    pub artifact_id: String,
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Organization name, used as the vendor in manifest entries
    #[serde(default)]
    pub organization: Option<String>,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    #[serde(default)]
    pub build: Build,

    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    #[serde(skip)]
    pub artifact: Artifact,
}

impl Project {
    /// Create a project with default build layout
    pub fn new(
        basedir: impl Into<PathBuf>,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Self {
        let mut project = Self {
            basedir: basedir.into(),
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            name: None,
            description: None,
            organization: None,
            properties: BTreeMap::new(),
            build: Build::default(),
            dependencies: Vec::new(),
            artifact: Artifact::default(),
        };
        project.init_artifact();
        project
    }

    /// Reset the artifact record from the project coordinates
    pub fn init_artifact(&mut self) {
        self.artifact = Artifact {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: self.version.clone(),
            packaging: APP_CLIENT_PACKAGING.to_string(),
            file: None,
        };
    }

    /// Anchor a path on the project base directory
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.basedir.join(path)
        }
    }

    /// `${project.build.directory}`
    pub fn build_directory(&self) -> PathBuf {
        self.resolve_path(&self.build.directory)
    }

    /// `${project.build.outputDirectory}`
    pub fn build_output_directory(&self) -> PathBuf {
        match &self.build.output_directory {
            Some(dir) => self.resolve_path(dir),
            None => self.build_directory().join("classes"),
        }
    }

    /// `${project.build.finalName}`
    pub fn final_name(&self) -> String {
        self.build
            .final_name
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.artifact_id, self.version))
    }

    /// Files of compile and runtime scoped dependencies, in declaration order
    pub fn runtime_classpath(&self) -> Result<Vec<PathBuf>, DependencyResolutionError> {
        self.dependencies
            .iter()
            .filter(|dependency| dependency.scope.is_runtime())
            .map(|dependency| {
                dependency
                    .file
                    .as_deref()
                    .map(|file| self.resolve_path(file))
                    .ok_or_else(|| DependencyResolutionError {
                        artifact: dependency.coordinates(),
                    })
            })
            .collect()
    }

    /// Expression values derived from the model, for filtering
    ///
    /// Every `project.*` key is also available under `pom.*`.
    pub fn model_values(&self) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        let basedir = self.basedir.display().to_string();

        let mut add = |key: &str, value: String| {
            values.insert(format!("project.{key}"), value.clone());
            values.insert(format!("pom.{key}"), value);
        };
        add("groupId", self.group_id.clone());
        add("artifactId", self.artifact_id.clone());
        add("version", self.version.clone());
        add("basedir", basedir.clone());
        add("build.directory", self.build_directory().display().to_string());
        add(
            "build.outputDirectory",
            self.build_output_directory().display().to_string(),
        );
        add("build.finalName", self.final_name());
        add("packaging", APP_CLIENT_PACKAGING.to_string());
        if let Some(name) = &self.name {
            add("name", name.clone());
        }
        if let Some(description) = &self.description {
            add("description", description.clone());
        }
        if let Some(organization) = &self.organization {
            add("organization.name", organization.clone());
        }

        values.insert("basedir".to_string(), basedir);
        values
    }
}

/// The invoking session: user supplied and system properties
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Properties given on the command line (`-D key=value`)
    pub user_properties: BTreeMap<String, String>,
    /// Environment and platform properties
    pub system_properties: BTreeMap<String, String>,
}

impl Session {
    /// Create a session with no properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session whose system properties come from the process environment
    ///
    /// Environment variables are exposed as `env.<NAME>`.
    pub fn from_env() -> Self {
        let mut system_properties: BTreeMap<String, String> = std::env::vars()
            .map(|(key, value)| (format!("env.{key}"), value))
            .collect();
        if let Ok(dir) = std::env::current_dir() {
            system_properties.insert("user.dir".to_string(), dir.display().to_string());
        }
        system_properties.insert("os.name".to_string(), std::env::consts::OS.to_string());
        system_properties.insert(
            "file.separator".to_string(),
            std::path::MAIN_SEPARATOR.to_string(),
        );

        Self {
            user_properties: BTreeMap::new(),
            system_properties,
        }
    }

    /// Add a user property
    pub fn with_user_property(mut self, key: &str, value: &str) -> Self {
        self.user_properties
            .insert(key.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
#[path = "project/project_tests.rs"]
mod project_tests;
