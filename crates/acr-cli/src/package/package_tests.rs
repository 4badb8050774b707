#![allow(non_snake_case)]

use super::*;
use tempfile::TempDir;
use test_case::test_case;

#[test_case("client.title=Demo", "client.title", "Demo")]
#[test_case("maven.acr.filterDeploymentDescriptor", "maven.acr.filterDeploymentDescriptor", "true")]
#[test_case("path=a=b", "path", "a=b")]
#[test_case("empty=", "empty", "")]
fn parse_define___splits_key_and_value(define: &str, key: &str, value: &str) {
    let (k, v) = parse_define(define).unwrap();

    assert_eq!(k, key);
    assert_eq!(v, value);
}

#[test_case("=value")]
#[test_case("")]
fn parse_define___empty_key___returns_error(define: &str) {
    assert!(parse_define(define).is_err());
}

#[test]
fn compute_sha256___known_vector() {
    assert_eq!(
        compute_sha256(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn ArtifactRecord___serializes_flat() {
    let artifact = Artifact {
        group_id: "com.example".to_string(),
        artifact_id: "client".to_string(),
        version: "1.0".to_string(),
        packaging: "app-client".to_string(),
        file: Some(PathBuf::from("target/client-1.0.jar")),
    };
    let record = ArtifactRecord {
        artifact: &artifact,
        sha256: "00".to_string(),
    };

    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(value["artifact_id"], "client");
    assert_eq!(value["packaging"], "app-client");
    assert_eq!(value["file"], "target/client-1.0.jar");
    assert_eq!(value["sha256"], "00");
}

#[test]
fn load_descriptor___invalid_descriptor_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("acr.toml");
    fs::write(
        &path,
        "[project]\ngroup_id = \"\"\nartifact_id = \"a\"\nversion = \"1\"\n",
    )
    .unwrap();

    let err = load_descriptor(&path).unwrap_err();

    assert!(matches!(err.downcast_ref::<AcrError>(), Some(AcrError::Config(_))));
}

#[test]
fn load_descriptor___missing_file_is_config_error() {
    let dir = TempDir::new().unwrap();

    let err = load_descriptor(&dir.path().join("acr.toml")).unwrap_err();

    assert_eq!(err.downcast_ref::<AcrError>().map(AcrError::error_code), Some(7));
}
