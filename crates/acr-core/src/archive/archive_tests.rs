#![allow(non_snake_case)]

use super::*;
use crate::config::ManifestConfiguration;
use crate::project::{Dependency, Scope};
use acr_archiver::JarReader;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tempfile::TempDir;
use test_case::test_case;

fn project(dir: &Path) -> Project {
    let mut project = Project::new(dir, "com.example", "client", "1.4.2-SNAPSHOT");
    project.name = Some("Example Client".to_string());
    project.organization = Some("Example Corp".to_string());
    project
}

fn with_dependencies(mut project: Project) -> Project {
    project.dependencies = vec![
        Dependency {
            group_id: "com.example".to_string(),
            artifact_id: "api".to_string(),
            version: "1.0".to_string(),
            scope: Scope::Compile,
            file: Some(PathBuf::from("/repo/api-1.0.jar")),
        },
        Dependency {
            group_id: "javax".to_string(),
            artifact_id: "javaee-api".to_string(),
            version: "8.0".to_string(),
            scope: Scope::Provided,
            file: None,
        },
    ];
    project
}

#[test_case("1.4.2-SNAPSHOT", "1.4")]
#[test_case("2.0", "2.0")]
#[test_case("3", "3")]
#[test_case("1.0.0+build.5", "1.0")]
fn specification_version___keeps_major_minor(version: &str, expected: &str) {
    assert_eq!(specification_version(version), expected);
}

#[test]
fn ProjectArchiver___manifest___default_entries_only() {
    let dir = TempDir::new().unwrap();

    let manifest = ProjectArchiver::new()
        .manifest(&project(dir.path()), &ArchiveConfiguration::default())
        .unwrap();

    assert_eq!(manifest.main_attribute("Created-By"), Some(CREATED_BY));
    assert!(manifest.main_attribute("Main-Class").is_none());
    assert!(manifest.main_attribute("Implementation-Version").is_none());
}

#[test]
fn ProjectArchiver___manifest___adds_implementation_and_specification_entries() {
    let dir = TempDir::new().unwrap();
    let config = ArchiveConfiguration {
        manifest: ManifestConfiguration {
            main_class: Some("com.example.Main".to_string()),
            add_default_implementation_entries: true,
            add_default_specification_entries: true,
            ..ManifestConfiguration::default()
        },
        ..ArchiveConfiguration::default()
    };

    let manifest = ProjectArchiver::new()
        .manifest(&project(dir.path()), &config)
        .unwrap();

    assert_eq!(manifest.main_attribute("Main-Class"), Some("com.example.Main"));
    assert_eq!(manifest.main_attribute("Implementation-Title"), Some("Example Client"));
    assert_eq!(manifest.main_attribute("Implementation-Version"), Some("1.4.2-SNAPSHOT"));
    assert_eq!(manifest.main_attribute("Implementation-Vendor"), Some("Example Corp"));
    assert_eq!(manifest.main_attribute("Specification-Version"), Some("1.4"));
}

#[test]
fn ProjectArchiver___manifest___class_path_lists_runtime_dependencies() {
    let dir = TempDir::new().unwrap();
    let config = ArchiveConfiguration {
        manifest: ManifestConfiguration {
            add_classpath: true,
            classpath_prefix: "lib".to_string(),
            ..ManifestConfiguration::default()
        },
        ..ArchiveConfiguration::default()
    };

    let manifest = ProjectArchiver::new()
        .manifest(&with_dependencies(project(dir.path())), &config)
        .unwrap();

    assert_eq!(manifest.main_attribute("Class-Path"), Some("lib/api-1.0.jar"));
}

#[test]
fn ProjectArchiver___manifest___unresolved_class_path_dependency_errors() {
    let dir = TempDir::new().unwrap();
    let mut project = with_dependencies(project(dir.path()));
    project.dependencies[0].file = None;
    let config = ArchiveConfiguration {
        manifest: ManifestConfiguration {
            add_classpath: true,
            ..ManifestConfiguration::default()
        },
        ..ArchiveConfiguration::default()
    };

    let result = ProjectArchiver::new().manifest(&project, &config);

    assert!(matches!(result, Err(AcrError::DependencyResolution(_))));
}

#[test]
fn ProjectArchiver___manifest___entries_and_sections_override_defaults() {
    let dir = TempDir::new().unwrap();
    let mut sections = BTreeMap::new();
    sections.insert(
        "com/example/".to_string(),
        BTreeMap::from([("Sealed".to_string(), "true".to_string())]),
    );
    let config = ArchiveConfiguration {
        manifest_entries: BTreeMap::from([("Created-By".to_string(), "custom".to_string())]),
        manifest_sections: sections,
        ..ArchiveConfiguration::default()
    };

    let manifest = ProjectArchiver::new()
        .manifest(&project(dir.path()), &config)
        .unwrap();

    assert_eq!(manifest.main_attribute("Created-By"), Some("custom"));
    assert_eq!(
        manifest.section("com/example/").and_then(|s| s.get("Sealed")),
        Some("true")
    );
}

#[test]
fn ProjectArchiver___manifest___invalid_entry_name_is_manifest_error() {
    let dir = TempDir::new().unwrap();
    let config = ArchiveConfiguration {
        manifest_entries: BTreeMap::from([("Bad Name".to_string(), "x".to_string())]),
        ..ArchiveConfiguration::default()
    };

    let result = ProjectArchiver::new().manifest(&project(dir.path()), &config);

    assert!(matches!(result, Err(AcrError::Manifest(_))));
}

#[test]
fn ProjectArchiver___manifest___manifest_file_fills_missing_entries() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("MANIFEST.MF"),
        "Manifest-Version: 1.0\r\nMain-Class: from.File\r\nX-Extra: yes\r\n\r\n",
    )
    .unwrap();
    let config = ArchiveConfiguration {
        manifest_file: Some(PathBuf::from("MANIFEST.MF")),
        manifest: ManifestConfiguration {
            main_class: Some("com.example.Main".to_string()),
            ..ManifestConfiguration::default()
        },
        ..ArchiveConfiguration::default()
    };

    let manifest = ProjectArchiver::new()
        .manifest(&project(dir.path()), &config)
        .unwrap();

    assert_eq!(manifest.main_attribute("Main-Class"), Some("com.example.Main"));
    assert_eq!(manifest.main_attribute("X-Extra"), Some("yes"));
}

#[test]
fn ProjectArchiver___manifest___missing_manifest_file_is_manifest_error() {
    let dir = TempDir::new().unwrap();
    let config = ArchiveConfiguration {
        manifest_file: Some(PathBuf::from("absent.MF")),
        ..ArchiveConfiguration::default()
    };

    let result = ProjectArchiver::new().manifest(&project(dir.path()), &config);

    assert!(matches!(result, Err(AcrError::Manifest(_))));
}

#[test]
fn ProjectArchiver___configure_reproducible___invalid_timestamp_is_config_error() {
    let mut archiver = ProjectArchiver::new();

    let result = archiver.configure_reproducible(Some("yesterday"));

    assert!(matches!(result, Err(AcrError::Config(_))));
}

#[test]
fn ProjectArchiver___create_archive___embeds_pom_properties() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("client.jar");
    let mut archiver = ProjectArchiver::new();
    archiver.set_output_file(&jar);

    archiver
        .create_archive(&project(dir.path()), &ArchiveConfiguration::default())
        .unwrap();

    let mut reader = JarReader::open(&jar).unwrap();
    let properties = reader
        .read_entry_to_string("META-INF/maven/com.example/client/pom.properties")
        .unwrap();
    assert!(properties.contains("artifactId=client\n"));
    assert!(properties.contains("groupId=com.example\n"));
    assert!(properties.contains("version=1.4.2-SNAPSHOT\n"));
}

#[test]
fn ProjectArchiver___create_archive___maven_descriptor_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("client.jar");
    let mut archiver = ProjectArchiver::new();
    archiver.set_output_file(&jar);
    let config = ArchiveConfiguration {
        add_maven_descriptor: false,
        ..ArchiveConfiguration::default()
    };

    archiver.create_archive(&project(dir.path()), &config).unwrap();

    let reader = JarReader::open(&jar).unwrap();
    assert_eq!(
        reader.entry_names(),
        vec!["META-INF/".to_string(), "META-INF/MANIFEST.MF".to_string()]
    );
}
