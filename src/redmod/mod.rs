//! REDmod archives: `info.json` plus content category directories, either
//! under `mods/`, in named top-level directories, or at the archive root.

pub mod descriptor;
pub mod validate;

use crate::{
    config::RedmodRules,
    error::InstallError,
    loader::FileLoader,
    plan::{Family, LayoutKind, MoveInstruction},
    tree::{self, FileTree},
};
use descriptor::load_descriptor;
use futures_util::future::join_all;
use validate::{validate_unit, ModUnit};

/// A directory that holds exactly one mod unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModCandidate {
    pub dir: String,
    pub implicit: bool,
}

impl ModCandidate {
    fn explicit(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            implicit: false,
        }
    }
}

/// Has a metadata file and at least one recognized content directory.
pub fn is_mod_unit_dir(tree: &FileTree, rules: &RedmodRules, dir: &str) -> bool {
    tree.is_file(&tree::join(dir, &rules.info_filename))
        && tree
            .subdir_names(dir)
            .iter()
            .any(|name| rules.is_content_dir(name))
}

pub fn has_canonical_layout(tree: &FileTree, rules: &RedmodRules) -> bool {
    tree.dir_exists(&rules.base_dir)
}

pub fn named_unit_dirs(tree: &FileTree, rules: &RedmodRules) -> Vec<String> {
    tree.subdir_names("")
        .into_iter()
        .filter(|name| is_mod_unit_dir(tree, rules, name))
        .collect()
}

pub fn has_named_layout(tree: &FileTree, rules: &RedmodRules) -> bool {
    !named_unit_dirs(tree, rules).is_empty()
}

pub fn has_toplevel_layout(tree: &FileTree, rules: &RedmodRules) -> bool {
    is_mod_unit_dir(tree, rules, "")
}

/// First matching layout in priority order.
pub fn detect_layout(tree: &FileTree, rules: &RedmodRules) -> Option<LayoutKind> {
    let detectors: [(LayoutKind, fn(&FileTree, &RedmodRules) -> bool); 3] = [
        (LayoutKind::RedmodCanonical, has_canonical_layout),
        (LayoutKind::RedmodNamed, has_named_layout),
        (LayoutKind::RedmodToplevel, has_toplevel_layout),
    ];
    let found = detectors
        .into_iter()
        .find(|(_, detect)| detect(tree, rules))
        .map(|(kind, _)| kind);
    log::debug!(
        "REDmod layout detection: {}",
        found.map(LayoutKind::label).unwrap_or("none")
    );
    found
}

pub fn is_applicable(tree: &FileTree, rules: &RedmodRules) -> bool {
    detect_layout(tree, rules).is_some()
}

pub fn enumerate(
    tree: &FileTree,
    rules: &RedmodRules,
    layout: LayoutKind,
) -> Result<Vec<ModCandidate>, InstallError> {
    let candidates = match layout {
        LayoutKind::RedmodCanonical => enumerate_canonical(tree, rules)?,
        // Named dirs are taken as detected, without the sibling check that
        // the canonical layout performs.
        LayoutKind::RedmodNamed => named_unit_dirs(tree, rules)
            .into_iter()
            .map(ModCandidate::explicit)
            .collect(),
        LayoutKind::RedmodToplevel => vec![ModCandidate {
            dir: String::new(),
            implicit: true,
        }],
        other => {
            log::error!("{other} is not a REDmod layout");
            return Err(InstallError::NoLayoutMatched {
                family: Family::Redmod.label(),
            });
        }
    };
    log::debug!(
        "REDmod candidates: {}",
        candidates
            .iter()
            .map(|candidate| candidate.dir.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(candidates)
}

fn enumerate_canonical(
    tree: &FileTree,
    rules: &RedmodRules,
) -> Result<Vec<ModCandidate>, InstallError> {
    let dirs: Vec<String> = tree
        .subdir_names(&rules.base_dir)
        .into_iter()
        .map(|name| tree::join(&rules.base_dir, &name))
        .collect();
    let offenders: Vec<String> = dirs
        .iter()
        .filter(|dir| !is_mod_unit_dir(tree, rules, dir))
        .cloned()
        .collect();
    if dirs.is_empty() {
        return Err(InstallError::NoModUnits {
            base: rules.base_dir.clone(),
        });
    }
    if !offenders.is_empty() {
        return Err(InstallError::EnumerationConflict {
            base: rules.base_dir.clone(),
            offenders,
        });
    }
    Ok(dirs.into_iter().map(ModCandidate::explicit).collect())
}

/// Loads and validates one unit.
pub async fn plan_unit<L>(
    tree: &FileTree,
    rules: &RedmodRules,
    loader: &L,
    candidate: &ModCandidate,
) -> Result<Vec<MoveInstruction>, InstallError>
where
    L: FileLoader + ?Sized,
{
    let info_path = tree::join(&candidate.dir, &rules.info_filename);
    let descriptor = load_descriptor(loader, &info_path).await?;
    let unit = ModUnit::new(descriptor, &candidate.dir, candidate.implicit, rules, tree);
    let instructions = validate_unit(&unit, rules)?;
    log::debug!(
        "{} -> {} ({} file(s))",
        if unit.source_dir.is_empty() {
            "<root>"
        } else {
            unit.source_dir.as_str()
        },
        unit.destination_dir,
        instructions.len()
    );
    Ok(instructions)
}

/// Full REDmod pipeline. All units must pass or nothing is returned.
pub async fn plan<L>(
    tree: &FileTree,
    rules: &RedmodRules,
    loader: &L,
) -> Result<(LayoutKind, Vec<MoveInstruction>), InstallError>
where
    L: FileLoader + ?Sized,
{
    let layout = detect_layout(tree, rules).ok_or(InstallError::NoLayoutMatched {
        family: Family::Redmod.label(),
    })?;
    let candidates = enumerate(tree, rules, layout)?;
    let results = join_all(
        candidates
            .iter()
            .map(|candidate| plan_unit(tree, rules, loader, candidate)),
    )
    .await;

    let mut instructions = Vec::new();
    for result in results {
        instructions.extend(result?);
    }
    log::info!(
        "REDmod {layout} layout: {} unit(s), {} instruction(s)",
        candidates.len(),
        instructions.len()
    );
    Ok((layout, instructions))
}

#[cfg(test)]
#[path = "tests/redmod_tests.rs"]
mod tests;
