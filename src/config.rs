use anyhow::{Context, Result};
use directories::BaseDirs;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Every directory name, extension and marker the detectors rely on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub redmod: RedmodRules,
    pub preset: PresetRules,
}

impl LayoutConfig {
    /// Reads `path`, or the per-user `layout.json` if present, or falls back
    /// to the built-in tables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("read layout config {}", path.display()))?;
        let config: LayoutConfig = serde_json::from_str(&raw).context("parse layout config")?;
        log::debug!("Loaded layout config from {}", path.display());
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedmodRules {
    pub base_dir: String,
    pub info_filename: String,
    pub archives: CategoryRules,
    pub custom_sounds: CategoryRules,
    pub scripts: CategoryRules,
    pub tweaks: CategoryRules,
    pub sound_skip_kind: String,
    pub scripts_allowed_subdirs: Vec<String>,
    pub tweaks_required_subdir: String,
}

impl Default for RedmodRules {
    fn default() -> Self {
        Self {
            base_dir: "mods".to_string(),
            info_filename: "info.json".to_string(),
            archives: CategoryRules::new("archives", &[".archive", ".xl"]),
            custom_sounds: CategoryRules::new("customSounds", &[".wav"]),
            scripts: CategoryRules::new("scripts", &[".script", ".ws"]),
            tweaks: CategoryRules::new("tweaks", &[".tweak", ".yaml", ".yml"]),
            sound_skip_kind: "mod_skip".to_string(),
            scripts_allowed_subdirs: strings(&["core", "cyberpunk", "exec", "samples", "tests"]),
            tweaks_required_subdir: "base".to_string(),
        }
    }
}

impl RedmodRules {
    pub fn is_content_dir(&self, name: &str) -> bool {
        [&self.archives, &self.custom_sounds, &self.scripts, &self.tweaks]
            .iter()
            .any(|category| category.dir == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRules {
    pub dir: String,
    pub extensions: Vec<String>,
}

impl CategoryRules {
    pub fn new(dir: &str, extensions: &[&str]) -> Self {
        Self {
            dir: dir.to_string(),
            extensions: strings(extensions),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetRules {
    pub extension: String,
    pub cybercat_dir: String,
    pub unlocker_dir: String,
    pub unlocker_female_subdir: String,
    pub unlocker_male_subdir: String,
    pub cybercat_required_keys: Vec<String>,
    pub feminine_markers: Vec<String>,
    pub masculine_markers: Vec<String>,
}

impl Default for PresetRules {
    fn default() -> Self {
        Self {
            extension: ".preset".to_string(),
            cybercat_dir: "V2077/presets/cybercat".to_string(),
            unlocker_dir:
                "bin/x64/plugins/cyber_engine_tweaks/mods/AppearanceChangeUnlocker/character-preset"
                    .to_string(),
            unlocker_female_subdir: "female".to_string(),
            unlocker_male_subdir: "male".to_string(),
            cybercat_required_keys: strings(&[
                "DataExists",
                "Unknown1",
                "UnknownFirstBytes",
                "FirstSection",
                "SecondSection",
                "ThirdSection",
                "StringTriples",
            ]),
            feminine_markers: strings(&[
                r"^local entries = \{",
                r#"hash = "0x[0-9A-Fa-f]+""#,
                r"_pwa",
                r"^return entries",
            ]),
            masculine_markers: strings(&[
                r"^local entries = \{",
                r#"hash = "0x[0-9A-Fa-f]+""#,
                r"_pma",
                r"^return entries",
            ]),
        }
    }
}

impl PresetRules {
    pub fn female_dir(&self) -> String {
        crate::tree::join(&self.unlocker_dir, &self.unlocker_female_subdir)
    }

    pub fn male_dir(&self) -> String {
        crate::tree::join(&self.unlocker_dir, &self.unlocker_male_subdir)
    }

    pub fn compile(&self) -> Result<PresetMatchers> {
        Ok(PresetMatchers {
            feminine: compile_markers(&self.feminine_markers).context("feminine markers")?,
            masculine: compile_markers(&self.masculine_markers).context("masculine markers")?,
        })
    }
}

/// Marker lists compiled once per installer.
#[derive(Debug, Clone)]
pub struct PresetMatchers {
    pub feminine: Vec<Regex>,
    pub masculine: Vec<Regex>,
}

fn compile_markers(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .multi_line(true)
                .build()
                .with_context(|| format!("compile marker {pattern:?}"))
        })
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn default_config_path() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    Some(base.data_local_dir().join("redsmith").join("layout.json"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
