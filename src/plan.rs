use blake3::Hasher;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveInstruction {
    pub source: String,
    pub destination: String,
}

impl MoveInstruction {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Identity move, for files already sitting at their install location.
    pub fn in_place(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            source: path.clone(),
            destination: path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Redmod,
    Preset,
}

impl Family {
    pub const ALL: [Family; 2] = [Family::Redmod, Family::Preset];

    pub fn label(self) -> &'static str {
        match self {
            Family::Redmod => "REDmod",
            Family::Preset => "appearance preset",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "redmod" => Some(Family::Redmod),
            "preset" => Some(Family::Preset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    RedmodCanonical,
    RedmodNamed,
    RedmodToplevel,
    CyberCatCanonical,
    UnlockerCanonical,
    UnlockerLegacy,
    PresetToplevel,
}

impl LayoutKind {
    pub fn label(self) -> &'static str {
        match self {
            LayoutKind::RedmodCanonical => "redmod-canonical",
            LayoutKind::RedmodNamed => "redmod-named",
            LayoutKind::RedmodToplevel => "redmod-toplevel",
            LayoutKind::CyberCatCanonical => "cybercat-canonical",
            LayoutKind::UnlockerCanonical => "unlocker-canonical",
            LayoutKind::UnlockerLegacy => "unlocker-legacy",
            LayoutKind::PresetToplevel => "preset-toplevel",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The full set of moves for one accepted install attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallPlan {
    pub family: Family,
    pub layout: LayoutKind,
    pub instructions: Vec<MoveInstruction>,
}

impl InstallPlan {
    pub fn fingerprint(&self) -> String {
        let mut hasher = Hasher::new();
        for instruction in &self.instructions {
            hasher.update(instruction.source.as_bytes());
            hasher.update(&[0]);
            hasher.update(instruction.destination.as_bytes());
            hasher.update(&[0]);
        }
        hasher.finalize().to_hex().to_string()
    }
}
