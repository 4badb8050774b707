//! Check command.

use crate::package::load_descriptor;
use acr_core::{AcrConfig, DEFAULT_CONFIG_FILE};
use anyhow::Result;
use std::path::PathBuf;

/// Validate a build descriptor and summarize what `package` would do.
pub fn run(config: Option<PathBuf>) -> Result<()> {
    let path = config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    println!("Checking build descriptor: {}", path.display());

    let descriptor = load_descriptor(&path)?;
    let project = &descriptor.project;
    let resolved = descriptor.acr.resolve(project);

    println!(
        "✓ Project: {}:{}:{}",
        project.group_id, project.artifact_id, project.version
    );
    println!("✓ Output directory: {}", resolved.output_directory.display());
    println!("✓ Archive: {}", resolved.jar_file().display());
    println!(
        "✓ Deployment descriptor filtering: {}",
        filtering_summary(&descriptor.acr)
    );
    if let Some(timestamp) = &resolved.output_timestamp {
        println!("✓ Reproducible timestamp: {timestamp}");
    }
    println!("\nBuild descriptor is valid!");

    Ok(())
}

fn filtering_summary(config: &AcrConfig) -> String {
    if !config.filter_deployment_descriptor {
        return "off".to_string();
    }
    match config.filters.len() {
        0 => "on".to_string(),
        1 => "on (1 filter file)".to_string(),
        n => format!("on ({n} filter files)"),
    }
}
