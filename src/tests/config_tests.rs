use super::*;
use tempfile::TempDir;

#[test]
fn test_defaults_recognize_content_dirs() {
    let rules = RedmodRules::default();
    for name in ["archives", "customSounds", "scripts", "tweaks"] {
        assert!(rules.is_content_dir(name), "{name} should be recognized");
    }
    assert!(!rules.is_content_dir("CustomSounds"));
    assert!(!rules.is_content_dir("docs"));
}

#[test]
fn test_partial_file_overrides_only_named_fields() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("layout.json");
    fs::write(
        &path,
        r#"{ "redmod": { "base_dir": "redmods", "tweaks_required_subdir": "extra" } }"#,
    )
    .unwrap();

    let config = LayoutConfig::load(Some(&path)).unwrap();
    assert_eq!(config.redmod.base_dir, "redmods");
    assert_eq!(config.redmod.tweaks_required_subdir, "extra");
    assert_eq!(config.redmod.info_filename, "info.json");
    assert_eq!(config.preset, PresetRules::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("layout.json");
    fs::write(&path, "{ nope").unwrap();
    assert!(LayoutConfig::load(Some(&path)).is_err());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(LayoutConfig::load(Some(&tmp.path().join("absent.json"))).is_err());
}

#[test]
fn test_default_markers_compile_multiline() {
    let matchers = PresetRules::default().compile().unwrap();
    let text = "-- preset\nlocal entries = {\n{ hash = \"0x1A\", first = \"h0_000_pwa__basehead\" },\n}\nreturn entries\n";
    assert!(matchers.feminine.iter().all(|re| re.is_match(text)));
    assert!(!matchers.masculine.iter().all(|re| re.is_match(text)));
}

#[test]
fn test_invalid_marker_fails_compile() {
    let rules = PresetRules {
        feminine_markers: vec!["(unclosed".to_string()],
        ..PresetRules::default()
    };
    assert!(rules.compile().is_err());
}

#[test]
fn test_gendered_dirs() {
    let rules = PresetRules {
        unlocker_dir: "presets".to_string(),
        ..PresetRules::default()
    };
    assert_eq!(rules.female_dir(), "presets/female");
    assert_eq!(rules.male_dir(), "presets/male");
}
