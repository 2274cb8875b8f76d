#![allow(dead_code)]

use std::{fs, path::Path, sync::Once};
use tempfile::TempDir;

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Materializes `files` (path, contents) under a fresh temp dir.
pub fn archive_dir(files: &[(&str, &str)]) -> TempDir {
    init_logging();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (path, contents) in files {
        write_file(dir.path(), path, contents);
    }
    dir
}

pub fn write_file(root: &Path, path: &str, contents: &str) {
    let target = root.join(path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(target, contents).expect("Failed to write file");
}

pub fn info(name: &str) -> String {
    format!(r#"{{ "name": "{name}", "version": "1.0.0" }}"#)
}

pub const CYBERCAT: &str = r#"{
  "DataExists": true,
  "Unknown1": 0,
  "UnknownFirstBytes": "AAAA",
  "FirstSection": {},
  "SecondSection": {},
  "ThirdSection": {},
  "StringTriples": []
}"#;

pub const FEMININE: &str = "local entries = {\n    { hash = \"0x1F2E3D4C\", app = \"h0_000_pwa__basehead\" },\n}\nreturn entries\n";
