//! Character appearance presets for CyberCAT and the Appearance Change
//! Unlocker. Files in the tools' own directories are trusted by location;
//! anything else is identified by content.

pub mod sniff;

use crate::{
    config::{PresetMatchers, PresetRules},
    error::InstallError,
    loader::FileLoader,
    outcome::Outcome,
    plan::{Family, LayoutKind, MoveInstruction},
    tree::{self, FileTree},
};
use sniff::sniff_candidates;
use std::slice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetLayout {
    CyberCatCanonical,
    UnlockerCanonical,
    UnlockerLegacy,
    Toplevel,
}

impl PresetLayout {
    pub fn kind(self) -> LayoutKind {
        match self {
            PresetLayout::CyberCatCanonical => LayoutKind::CyberCatCanonical,
            PresetLayout::UnlockerCanonical => LayoutKind::UnlockerCanonical,
            PresetLayout::UnlockerLegacy => LayoutKind::UnlockerLegacy,
            PresetLayout::Toplevel => LayoutKind::PresetToplevel,
        }
    }
}

fn is_preset(path: &str, rules: &PresetRules) -> bool {
    tree::has_extension(path, slice::from_ref(&rules.extension))
}

pub fn preset_files(tree: &FileTree, rules: &PresetRules) -> Vec<String> {
    tree.files_under("", |path| is_preset(path, rules))
}

pub fn is_applicable(tree: &FileTree, rules: &PresetRules) -> bool {
    tree.files().any(|path| is_preset(path, rules))
}

pub fn canonical_cybercat(tree: &FileTree, rules: &PresetRules) -> Outcome<Vec<MoveInstruction>> {
    in_place(tree.files_under(&rules.cybercat_dir, |path| is_preset(path, rules)))
}

pub fn canonical_unlocker(tree: &FileTree, rules: &PresetRules) -> Outcome<Vec<MoveInstruction>> {
    let mut files = tree.files_under(&rules.female_dir(), |path| is_preset(path, rules));
    files.extend(tree.files_under(&rules.male_dir(), |path| is_preset(path, rules)));
    in_place(files)
}

fn in_place(files: Vec<String>) -> Outcome<Vec<MoveInstruction>> {
    if files.is_empty() {
        return Outcome::NoMatch;
    }
    Outcome::Success(files.into_iter().map(MoveInstruction::in_place).collect())
}

/// Runs one layout. Only the sniffing layouts touch the loader.
pub async fn try_layout<L>(
    layout: PresetLayout,
    tree: &FileTree,
    rules: &PresetRules,
    matchers: &PresetMatchers,
    loader: &L,
) -> Result<Outcome<Vec<MoveInstruction>>, InstallError>
where
    L: FileLoader + ?Sized,
{
    match layout {
        PresetLayout::CyberCatCanonical => Ok(canonical_cybercat(tree, rules)),
        PresetLayout::UnlockerCanonical => Ok(canonical_unlocker(tree, rules)),
        PresetLayout::UnlockerLegacy => {
            let candidates = tree.files_in(&rules.unlocker_dir, |path| is_preset(path, rules));
            sniff_candidates(&candidates, rules, matchers, loader).await
        }
        PresetLayout::Toplevel => {
            let candidates = preset_files(tree, rules);
            sniff_candidates(&candidates, rules, matchers, loader).await
        }
    }
}

/// Tries each layout in priority order. The first layout that does not
/// answer `NoMatch` decides the result.
pub async fn plan<L>(
    tree: &FileTree,
    rules: &PresetRules,
    matchers: &PresetMatchers,
    loader: &L,
) -> Result<(LayoutKind, Vec<MoveInstruction>), InstallError>
where
    L: FileLoader + ?Sized,
{
    let mut outcome = canonical_cybercat(tree, rules)
        .map(|moves| (LayoutKind::CyberCatCanonical, moves))
        .or_else(|| {
            canonical_unlocker(tree, rules).map(|moves| (LayoutKind::UnlockerCanonical, moves))
        });
    for layout in [PresetLayout::UnlockerLegacy, PresetLayout::Toplevel] {
        if !outcome.is_no_match() {
            break;
        }
        log::debug!("No preset layout matched yet, trying {}", layout.kind());
        outcome = try_layout(layout, tree, rules, matchers, loader)
            .await?
            .map(|moves| (layout.kind(), moves));
    }

    match outcome {
        Outcome::Success((layout, instructions)) => {
            log::info!(
                "Preset {layout} layout: {} instruction(s)",
                instructions.len()
            );
            Ok((layout, instructions))
        }
        Outcome::Conflict(reason) => {
            log::debug!("Preset layout refused: {reason}");
            Err(InstallError::AmbiguousContent(reason))
        }
        Outcome::NoMatch => Err(InstallError::NoLayoutMatched {
            family: Family::Preset.label(),
        }),
    }
}

#[cfg(test)]
#[path = "tests/preset_tests.rs"]
mod tests;
