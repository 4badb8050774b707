//! List command.

use acr_archiver::JarReader;
use anyhow::{Context, Result};
use std::path::Path;

/// Print every entry of a JAR followed by its main manifest attributes.
pub fn run(jar: &Path) -> Result<()> {
    let mut reader =
        JarReader::open(jar).with_context(|| format!("Failed to open archive: {}", jar.display()))?;

    println!("{} ({} entries)", jar.display(), reader.len());
    for name in reader.entry_names() {
        println!("  {name}");
    }

    let manifest = reader
        .manifest()
        .with_context(|| format!("Failed to read manifest of {}", jar.display()))?;
    println!("\nManifest:");
    for (name, value) in manifest.main_attributes().iter() {
        println!("  {name}: {value}");
    }
    Ok(())
}
