#![allow(non_snake_case)]

use super::*;
use encoding_rs::{UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252};
use test_case::test_case;
use tempfile::TempDir;

fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn DefaultFileFilter___default_filter_wrappers___applies_precedence() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("dev.properties"), "env=filter\nonly.filter=f\n").unwrap();

    let request = FilteringRequest {
        basedir: dir.path().to_path_buf(),
        filters: vec![PathBuf::from("dev.properties")],
        project_properties: map(&[("env", "project"), ("only.project", "p")]),
        system_properties: map(&[("env", "system")]),
        user_properties: map(&[("env", "user")]),
        ..FilteringRequest::default()
    };

    let wrappers = DefaultFileFilter.default_filter_wrappers(&request).unwrap();

    assert_eq!(wrappers.value("env").as_deref(), Some("user"));
    assert_eq!(wrappers.value("only.filter").as_deref(), Some("f"));
    assert_eq!(wrappers.value("only.project").as_deref(), Some("p"));
}

#[test]
fn DefaultFileFilter___default_filter_wrappers___properties_shadow_model_values() {
    let request = FilteringRequest {
        project_properties: map(&[("project.version", "overridden")]),
        model_values: map(&[("project.version", "1.0"), ("project.artifactId", "client")]),
        ..FilteringRequest::default()
    };

    let wrappers = DefaultFileFilter.default_filter_wrappers(&request).unwrap();

    assert_eq!(
        wrappers.filter("${project.artifactId}:${project.version}").unwrap(),
        "client:overridden"
    );
}

#[test]
fn DefaultFileFilter___default_filter_wrappers___missing_filter_file_errors() {
    let dir = TempDir::new().unwrap();
    let request = FilteringRequest {
        basedir: dir.path().to_path_buf(),
        filters: vec![PathBuf::from("absent.properties")],
        ..FilteringRequest::default()
    };

    let result = DefaultFileFilter.default_filter_wrappers(&request);

    assert!(matches!(result, Err(FilteringError::MissingFilterFile(_))));
}

#[test]
fn DefaultFileFilter___copy_file___filters_content() {
    let dir = TempDir::new().unwrap();
    let from = dir.path().join("in.xml");
    let to = dir.path().join("out/out.xml");
    fs::write(&from, "<display-name>${name}</display-name>").unwrap();

    let wrappers = FilterWrappers::new(
        InterpolationOptions::default(),
        map(&[("name", "Client")]),
        BTreeMap::new(),
    )
    .unwrap();

    DefaultFileFilter
        .copy_file(&from, &to, true, &wrappers, UTF_8)
        .unwrap();

    assert_eq!(
        fs::read_to_string(&to).unwrap(),
        "<display-name>Client</display-name>"
    );
}

#[test]
fn DefaultFileFilter___copy_file___without_filtering_copies_bytes() {
    let dir = TempDir::new().unwrap();
    let from = dir.path().join("in.xml");
    let to = dir.path().join("out.xml");
    fs::write(&from, "${name}").unwrap();
    let wrappers =
        FilterWrappers::new(InterpolationOptions::default(), map(&[("name", "x")]), BTreeMap::new())
            .unwrap();

    DefaultFileFilter
        .copy_file(&from, &to, false, &wrappers, UTF_8)
        .unwrap();

    assert_eq!(fs::read_to_string(&to).unwrap(), "${name}");
}

#[test]
fn DefaultFileFilter___copy_file___keeps_source_encoding() {
    let dir = TempDir::new().unwrap();
    let from = dir.path().join("in.xml");
    let to = dir.path().join("out.xml");
    fs::write(&from, b"<a>caf\xe9 ${name}</a>").unwrap();
    let wrappers = FilterWrappers::new(
        InterpolationOptions::default(),
        map(&[("name", "cr\u{e8}me")]),
        BTreeMap::new(),
    )
    .unwrap();

    DefaultFileFilter
        .copy_file(&from, &to, true, &wrappers, WINDOWS_1252)
        .unwrap();

    assert_eq!(fs::read(&to).unwrap(), b"<a>caf\xe9 cr\xe8me</a>".to_vec());
}

fn utf16(text: &str, encoding: &'static Encoding) -> Vec<u8> {
    if encoding == UTF_16BE {
        text.encode_utf16().flat_map(u16::to_be_bytes).collect()
    } else {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }
}

fn name_wrappers(value: &str) -> FilterWrappers {
    FilterWrappers::new(InterpolationOptions::default(), map(&[("name", value)]), BTreeMap::new())
        .unwrap()
}

#[test_case(UTF_16LE, &[0xFF, 0xFE] ; "utf16le with bom")]
#[test_case(UTF_16BE, &[0xFE, 0xFF] ; "utf16be with bom")]
#[test_case(UTF_16LE, &[] ; "utf16le without bom")]
#[test_case(UTF_16BE, &[] ; "utf16be without bom")]
fn DefaultFileFilter___copy_file___writes_utf16_back(encoding: &'static Encoding, bom: &[u8]) {
    let dir = TempDir::new().unwrap();
    let from = dir.path().join("in.xml");
    let to = dir.path().join("out.xml");
    let declaration = r#"<?xml version="1.0" encoding="UTF-16"?>"#;
    let mut source = bom.to_vec();
    source.extend(utf16(&format!("{declaration}<a>${{name}}</a>"), encoding));
    fs::write(&from, &source).unwrap();

    DefaultFileFilter
        .copy_file(&from, &to, true, &name_wrappers("Cr\u{e8}me \u{1F600}"), encoding)
        .unwrap();

    let mut expected = bom.to_vec();
    expected.extend(utf16(&format!("{declaration}<a>Cr\u{e8}me \u{1F600}</a>"), encoding));
    let written = fs::read(&to).unwrap();
    assert_eq!(written, expected);
    assert_eq!(crate::detect_xml_encoding(&written).unwrap(), encoding);
}

#[test]
fn DefaultFileFilter___copy_file___filtered_utf16_file_filters_again() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.xml");
    let second = dir.path().join("second.xml");
    let third = dir.path().join("third.xml");
    let mut source = vec![0xFF, 0xFE];
    source.extend(utf16("<a>${name}</a>", UTF_16LE));
    fs::write(&first, &source).unwrap();

    DefaultFileFilter
        .copy_file(&first, &second, true, &name_wrappers("Client"), UTF_16LE)
        .unwrap();
    DefaultFileFilter
        .copy_file(&second, &third, true, &name_wrappers("Other"), UTF_16LE)
        .unwrap();

    assert_eq!(fs::read(&second).unwrap(), fs::read(&third).unwrap());
}

#[test]
fn DefaultFileFilter___copy_file___keeps_utf8_byte_order_mark() {
    let dir = TempDir::new().unwrap();
    let from = dir.path().join("in.xml");
    let to = dir.path().join("out.xml");
    fs::write(&from, b"\xEF\xBB\xBF<a>${name}</a>").unwrap();

    DefaultFileFilter
        .copy_file(&from, &to, true, &name_wrappers("Client"), UTF_8)
        .unwrap();

    assert_eq!(fs::read(&to).unwrap(), b"\xEF\xBB\xBF<a>Client</a>".to_vec());
}

#[test]
fn DefaultFileFilter___copy_file___byte_order_mark_overrides_requested_encoding() {
    let dir = TempDir::new().unwrap();
    let from = dir.path().join("in.xml");
    let to = dir.path().join("out.xml");
    let mut source = vec![0xFF, 0xFE];
    source.extend(utf16("<a>${name}</a>", UTF_16LE));
    fs::write(&from, &source).unwrap();

    DefaultFileFilter
        .copy_file(&from, &to, true, &name_wrappers("Client"), UTF_8)
        .unwrap();

    let mut expected = vec![0xFF, 0xFE];
    expected.extend(utf16("<a>Client</a>", UTF_16LE));
    assert_eq!(fs::read(&to).unwrap(), expected);
}

#[test]
fn DefaultFileFilter___copy_file___malformed_utf8_errors() {
    let dir = TempDir::new().unwrap();
    let from = dir.path().join("in.xml");
    fs::write(&from, b"<a>\xff\xfe</a>").unwrap();
    let wrappers =
        FilterWrappers::new(InterpolationOptions::default(), BTreeMap::new(), BTreeMap::new())
            .unwrap();

    let result =
        DefaultFileFilter.copy_file(&from, &dir.path().join("out.xml"), true, &wrappers, UTF_8);

    assert!(matches!(result, Err(FilteringError::MalformedInput { .. })));
}

#[test]
fn DefaultFileFilter___copy_file___missing_source_is_io_error() {
    let dir = TempDir::new().unwrap();
    let wrappers =
        FilterWrappers::new(InterpolationOptions::default(), BTreeMap::new(), BTreeMap::new())
            .unwrap();

    let result = DefaultFileFilter.copy_file(
        &dir.path().join("absent.xml"),
        &dir.path().join("out.xml"),
        true,
        &wrappers,
        UTF_8,
    );

    assert!(matches!(result, Err(FilteringError::Io { .. })));
}
