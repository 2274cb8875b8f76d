use super::*;
use crate::{loader::MemoryLoader, plan::LayoutKind};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorder {
    seen: Arc<Mutex<Vec<(String, String, Vec<String>)>>>,
}

impl WarningSink for Recorder {
    fn warn(&self, title: &str, message: &str, files: &[String]) {
        self.seen
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string(), files.to_vec()));
    }
}

fn installer(loader: MemoryLoader) -> (Installer<MemoryLoader>, Recorder) {
    let recorder = Recorder::default();
    let installer = Installer::new(LayoutConfig::default(), loader)
        .unwrap()
        .with_warnings(recorder.clone());
    (installer, recorder)
}

#[test]
fn test_detect_reports_each_family() {
    let (installer, _) = installer(MemoryLoader::new());
    let tree = FileTree::from_paths([
        "mods/A/info.json",
        "mods/A/archives/a.archive",
        "extras/Look.preset",
    ])
    .unwrap();
    assert_eq!(installer.detect(&tree), vec![Family::Redmod, Family::Preset]);
    assert!(installer.test(Family::Redmod, &tree).supported);

    let tree = FileTree::from_paths(["readme.txt"]).unwrap();
    assert!(installer.detect(&tree).is_empty());
    assert_eq!(
        installer.test(Family::Preset, &tree),
        Support { supported: false }
    );
}

#[tokio::test]
async fn test_install_success_is_silent() {
    let loader = MemoryLoader::new().with_file("mods/A/info.json", r#"{ "name": "A" }"#);
    let (installer, recorder) = installer(loader);
    let tree = FileTree::from_paths(["mods/A/info.json", "mods/A/archives/a.archive"]).unwrap();
    let plan = installer
        .install(Family::Redmod, &tree, &UnitInfo::new("A"))
        .await
        .unwrap();
    assert_eq!(plan.family, Family::Redmod);
    assert_eq!(plan.layout, LayoutKind::RedmodCanonical);
    assert_eq!(plan.instructions.len(), 2);
    assert!(recorder.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejection_warns_with_mod_name_and_files() {
    let loader = MemoryLoader::new().with_file("mods/A/info.json", r#"{ "name": "B" }"#);
    let (installer, recorder) = installer(loader);
    let tree = FileTree::from_paths(["mods/A/info.json", "mods/A/archives/a.archive"]).unwrap();
    let err = installer
        .install(Family::Redmod, &tree, &UnitInfo::new("Cool Mod"))
        .await
        .unwrap_err();
    assert!(matches!(err, InstallError::NameMismatch { .. }));

    let seen = recorder.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (title, message, files) = &seen[0];
    assert!(title.contains("Cool Mod"));
    assert_eq!(message, &err.to_string());
    assert_eq!(files, &vec!["mods/A/archives/a.archive", "mods/A/info.json"]);
}

#[tokio::test]
async fn test_preset_rejection_lists_only_presets() {
    let loader = MemoryLoader::new()
        .with_file("a.preset", "garbage")
        .with_file("readme.txt", "hi");
    let (installer, recorder) = installer(loader);
    let tree = FileTree::from_paths(["a.preset", "readme.txt"]).unwrap();
    let err = installer
        .install(Family::Preset, &tree, &UnitInfo::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "no-layout");

    let seen = recorder.seen.lock().unwrap();
    let (title, _, files) = &seen[0];
    assert_eq!(title, "Cannot install this mod");
    assert_eq!(files, &vec!["a.preset".to_string()]);
}

#[test]
fn test_invalid_marker_fails_construction() {
    let mut config = LayoutConfig::default();
    config.preset.masculine_markers = vec!["(".to_string()];
    assert!(Installer::new(config, MemoryLoader::new()).is_err());
}
