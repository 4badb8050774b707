//! Package command.
//!
//! Loads `acr.toml`, runs the packaging goal and reports the produced artifact.

use acr_core::{AcrError, AcrMojo, Artifact, BuildDescriptor, DEFAULT_CONFIG_FILE, Session};
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Artifact record printed by `--json`.
#[derive(Debug, Serialize)]
pub struct ArtifactRecord<'a> {
    #[serde(flatten)]
    pub artifact: &'a Artifact,
    pub sha256: String,
}

/// Run the package command.
pub fn run(config: Option<PathBuf>, defines: &[String], json: bool) -> Result<()> {
    let path = config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut descriptor = load_descriptor(&path)?;

    let mut session = Session::from_env();
    for define in defines {
        let (key, value) = parse_define(define)?;
        session.user_properties.insert(key, value);
    }

    let mojo = AcrMojo::new(descriptor.acr.clone());
    let jar = mojo.execute(&mut descriptor.project, &session)?;

    let contents =
        fs::read(&jar).with_context(|| format!("Failed to read archive: {}", jar.display()))?;
    let record = ArtifactRecord {
        artifact: &descriptor.project.artifact,
        sha256: compute_sha256(&contents),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("Built {}", jar.display());
        println!("  sha256: {}", record.sha256);
    }
    Ok(())
}

/// Load and validate a build descriptor.
pub fn load_descriptor(path: &Path) -> Result<BuildDescriptor> {
    let descriptor = BuildDescriptor::from_file(path)
        .map_err(AcrError::from)
        .with_context(|| format!("Failed to load build descriptor: {}", path.display()))?;
    descriptor
        .validate()
        .map_err(AcrError::from)
        .with_context(|| format!("Invalid build descriptor: {}", path.display()))?;
    Ok(descriptor)
}

/// Split a `-D` argument; a bare key means `true`.
pub fn parse_define(define: &str) -> Result<(String, String)> {
    let (key, value) = define.split_once('=').unwrap_or((define, "true"));
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Invalid property definition: '{define}'. Expected KEY=VALUE");
    }
    Ok((key.to_string(), value.to_string()))
}

/// Compute SHA256 hash of data and return as hex string.
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[path = "package/package_tests.rs"]
mod package_tests;
