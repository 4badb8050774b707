//! JAR archiver for acr
//!
//! This crate provides the archive side of application client packaging:
//! a JAR manifest model, an Ant-style directory scanner, reproducible
//! timestamp handling, and a writer/reader pair for `.jar` files.
//!
//! # Archive Structure
//!
//! ```text
//! my-client-1.0.0.jar
//! ├── META-INF/
//! │   ├── MANIFEST.MF                  # always the first file entry
//! │   ├── application-client.xml       # deployment descriptor
//! │   └── maven/<group>/<artifact>/
//! │       └── pom.properties
//! └── com/example/
//!     └── Main.class
//! ```
//!
//! # Example
//!
//! ```no_run
//! use acr_archiver::{JarArchiver, Manifest};
//!
//! let mut archiver = JarArchiver::new();
//! archiver.set_output_file("target/my-client-1.0.0.jar");
//! archiver.configure_reproducible(Some("2024-01-01T00:00:00Z"))?;
//! archiver.add_directory("target/classes", &["**/**"], &["META-INF/application-client.xml"])?;
//!
//! let mut manifest = Manifest::new();
//! manifest.set_main_attribute("Main-Class", "com.example.Main")?;
//! archiver.create_archive(&manifest)?;
//! # Ok::<(), acr_archiver::ArchiverError>(())
//! ```

mod error;
mod manifest;
mod timestamp;

pub mod archiver;
pub mod reader;
pub mod scanner;

pub use archiver::{CreateOutcome, DuplicateBehavior, JarArchiver};
pub use error::{ArchiverError, ManifestError};
pub use manifest::{Attributes, Manifest};
pub use reader::JarReader;
pub use scanner::{DirectoryScanner, ScannedEntry};
pub use timestamp::OutputTimestamp;

/// Result type for archiver operations.
pub type ArchiverResult<T> = Result<T, ArchiverError>;

/// JAR file extension.
pub const JAR_EXTENSION: &str = "jar";

/// Directory holding archive metadata.
pub const META_INF_DIR: &str = "META-INF/";

/// Manifest entry name within the archive.
pub const MANIFEST_NAME: &str = "META-INF/MANIFEST.MF";
