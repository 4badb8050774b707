#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

fn dependency(artifact_id: &str, scope: Scope, file: Option<&str>) -> Dependency {
    Dependency {
        group_id: "com.example".to_string(),
        artifact_id: artifact_id.to_string(),
        version: "1.0".to_string(),
        scope,
        file: file.map(PathBuf::from),
    }
}

fn project() -> Project {
    Project::new("/work/client", "com.example", "client", "2.0.0")
}

#[test]
fn Project___new___initialises_app_client_artifact() {
    let project = project();

    assert_eq!(project.artifact.group_id, "com.example");
    assert_eq!(project.artifact.artifact_id, "client");
    assert_eq!(project.artifact.version, "2.0.0");
    assert_eq!(project.artifact.packaging, APP_CLIENT_PACKAGING);
    assert!(project.artifact.file.is_none());
}

#[test]
fn Project___build_directories___default_to_target_layout() {
    let project = project();

    assert_eq!(project.build_directory(), PathBuf::from("/work/client/target"));
    assert_eq!(
        project.build_output_directory(),
        PathBuf::from("/work/client/target/classes")
    );
}

#[test]
fn Project___build_output_directory___honours_configured_path() {
    let mut project = project();
    project.build.output_directory = Some(PathBuf::from("out"));

    assert_eq!(
        project.build_output_directory(),
        PathBuf::from("/work/client/out")
    );
}

#[test]
fn Project___final_name___defaults_to_artifact_and_version() {
    let mut project = project();
    assert_eq!(project.final_name(), "client-2.0.0");

    project.build.final_name = Some("renamed".to_string());
    assert_eq!(project.final_name(), "renamed");
}

#[test]
fn Project___runtime_classpath___keeps_compile_and_runtime_in_order() {
    let mut project = project();
    project.dependencies = vec![
        dependency("api", Scope::Compile, Some("lib/api.jar")),
        dependency("servlet", Scope::Provided, None),
        dependency("junit", Scope::Test, None),
        dependency("impl", Scope::Runtime, Some("/repo/impl.jar")),
    ];

    let classpath = project.runtime_classpath().unwrap();

    assert_eq!(
        classpath,
        vec![
            PathBuf::from("/work/client/lib/api.jar"),
            PathBuf::from("/repo/impl.jar"),
        ]
    );
}

#[test]
fn Project___runtime_classpath___unresolved_dependency_errors() {
    let mut project = project();
    project.dependencies = vec![dependency("api", Scope::Compile, None)];

    let err = project.runtime_classpath().unwrap_err();

    assert_eq!(err.artifact, "com.example:api:1.0");
    assert!(err.to_string().contains("com.example:api:1.0"));
}

#[test]
fn Project___model_values___exposes_project_and_pom_prefixes() {
    let mut project = project();
    project.name = Some("Client".to_string());

    let values = project.model_values();

    assert_eq!(values.get("project.version").map(String::as_str), Some("2.0.0"));
    assert_eq!(values.get("pom.version").map(String::as_str), Some("2.0.0"));
    assert_eq!(values.get("project.name").map(String::as_str), Some("Client"));
    assert_eq!(
        values.get("project.build.finalName").map(String::as_str),
        Some("client-2.0.0")
    );
    assert!(values.contains_key("basedir"));
    assert!(!values.contains_key("project.description"));
}

#[test_case(Scope::Compile, true)]
#[test_case(Scope::Runtime, true)]
#[test_case(Scope::Provided, false)]
#[test_case(Scope::Test, false)]
#[test_case(Scope::System, false)]
fn Scope___is_runtime___matches_runtime_classpath(scope: Scope, expected: bool) {
    assert_eq!(scope.is_runtime(), expected);
}

#[test]
fn Dependency___scope___defaults_to_compile() {
    let dependency: Dependency =
        toml::from_str("group_id = \"g\"\nartifact_id = \"a\"\nversion = \"1\"\n").unwrap();

    assert_eq!(dependency.scope, Scope::Compile);
}

#[test]
fn Dependency___scope___parses_lowercase() {
    let dependency: Dependency = toml::from_str(
        "group_id = \"g\"\nartifact_id = \"a\"\nversion = \"1\"\nscope = \"provided\"\n",
    )
    .unwrap();

    assert_eq!(dependency.scope, Scope::Provided);
}

#[test]
fn Session___from_env___exposes_environment_with_prefix() {
    let session = Session::from_env();

    assert!(session.user_properties.is_empty());
    assert!(session.system_properties.contains_key("os.name"));
    assert!(
        session
            .system_properties
            .keys()
            .filter(|key| *key != "os.name" && *key != "user.dir" && *key != "file.separator")
            .all(|key| key.starts_with("env."))
    );
}

#[test]
fn Session___with_user_property___adds_property() {
    let session = Session::new().with_user_property("client.title", "Demo");

    assert_eq!(
        session.user_properties.get("client.title").map(String::as_str),
        Some("Demo")
    );
}
