use super::*;
use crate::loader::MemoryLoader;

#[test]
fn test_parse_minimal() {
    let descriptor = Descriptor::parse(br#"{ "name": "CoolMod" }"#).unwrap();
    assert_eq!(descriptor.name, "CoolMod");
    assert!(descriptor.custom_sounds.is_empty());
    assert!(!descriptor.declares_sounds("mod_skip"));
}

#[test]
fn test_parse_sound_declarations() {
    let raw = br#"{
        "name": "Loud",
        "version": "1.2.0",
        "customSounds": [
            { "name": "amb_a", "type": "mod_skip" },
            { "name": "amb_b", "type": "mod_sfx_2d", "file": "b.wav", "gain": 1.0 }
        ]
    }"#;
    let descriptor = Descriptor::parse(raw).unwrap();
    assert_eq!(descriptor.version.as_deref(), Some("1.2.0"));
    assert_eq!(descriptor.custom_sounds.len(), 2);
    assert!(descriptor.declares_sounds("mod_skip"));
}

#[test]
fn test_only_skip_entries_declare_nothing() {
    let raw = br#"{ "name": "Quiet", "customSounds": [ { "type": "mod_skip" } ] }"#;
    let descriptor = Descriptor::parse(raw).unwrap();
    assert!(!descriptor.declares_sounds("mod_skip"));
}

#[test]
fn test_malformed_json_is_syntax_error() {
    let err = Descriptor::parse(b"{ name: ").unwrap_err();
    assert!(matches!(err, DescriptorError::Syntax(_)));
}

#[test]
fn test_missing_or_empty_name_is_schema_error() {
    assert!(matches!(
        Descriptor::parse(br#"{ "version": "1" }"#).unwrap_err(),
        DescriptorError::Schema(_)
    ));
    assert!(matches!(
        Descriptor::parse(br#"{ "name": "  " }"#).unwrap_err(),
        DescriptorError::Schema(_)
    ));
}

#[test]
fn test_wrong_field_type_is_schema_error() {
    assert!(matches!(
        Descriptor::parse(br#"{ "name": 7 }"#).unwrap_err(),
        DescriptorError::Schema(_)
    ));
    assert!(matches!(
        Descriptor::parse(br#"{ "name": "A", "customSounds": [ { "type": 3 } ] }"#).unwrap_err(),
        DescriptorError::Schema(_)
    ));
}

#[test]
fn test_name_with_separator_is_rejected() {
    assert!(matches!(
        Descriptor::parse(br#"{ "name": "../escape" }"#).unwrap_err(),
        DescriptorError::Schema(_)
    ));
}

#[tokio::test]
async fn test_load_reports_path_on_io_error() {
    let loader = MemoryLoader::new();
    let err = load_descriptor(&loader, "MyMod/info.json").await.unwrap_err();
    match err {
        InstallError::Descriptor { path, source } => {
            assert_eq!(path, "MyMod/info.json");
            assert!(matches!(source, DescriptorError::Io(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_load_reports_path_on_parse_error() {
    let loader = MemoryLoader::new().with_file("info.json", "not json");
    let err = load_descriptor(&loader, "info.json").await.unwrap_err();
    assert!(matches!(
        err,
        InstallError::Descriptor {
            source: DescriptorError::Syntax(_),
            ..
        }
    ));
}
