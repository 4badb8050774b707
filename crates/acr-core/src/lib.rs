//! acr-core - JavaEE application client packaging
//!
//! This crate provides:
//! - [`AcrMojo`] to archive a project's output directory into an application client JAR
//! - [`AcrConfig`] and the `acr.toml` [`BuildDescriptor`]
//! - [`Project`], [`Session`] and [`Artifact`] models
//! - [`ProjectArchiver`] for manifest and Maven descriptor generation
//! - [`AcrError`] with one distinct message per failure class
//!
//! # Example
//!
//! ```no_run
//! use acr_core::{AcrMojo, BuildDescriptor, Session};
//!
//! let mut descriptor = BuildDescriptor::from_file("acr.toml")?;
//! let mojo = AcrMojo::new(descriptor.acr.clone());
//! let jar = mojo.execute(&mut descriptor.project, &Session::from_env())?;
//! println!("{}", jar.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod mojo;
pub mod project;

pub use archive::{CREATED_BY, ProjectArchiver};
pub use config::{
    AcrConfig, ArchiveConfiguration, BuildDescriptor, ConfigError, DEFAULT_CONFIG_FILE,
    ManifestConfiguration, ResolvedConfig,
};
pub use error::{AcrError, AcrResult};
pub use mojo::{APP_CLIENT_XML, AcrMojo, DEFAULT_EXCLUDES, DEFAULT_INCLUDES};
pub use project::{
    APP_CLIENT_PACKAGING, Artifact, Build, Dependency, DependencyResolutionError, Project, Scope,
    Session,
};
