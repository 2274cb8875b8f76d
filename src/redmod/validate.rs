use super::descriptor::Descriptor;
use crate::{
    config::{CategoryRules, RedmodRules},
    error::InstallError,
    plan::MoveInstruction,
    tree::{self, FileTree},
};
use std::collections::HashSet;

/// One mod unit with its metadata loaded, ready to be validated.
#[derive(Debug)]
pub struct ModUnit<'a> {
    pub descriptor: Descriptor,
    pub source_dir: String,
    pub destination_dir: String,
    /// The whole archive is the unit (toplevel layout).
    pub implicit: bool,
    pub tree: &'a FileTree,
}

impl<'a> ModUnit<'a> {
    pub fn new(
        descriptor: Descriptor,
        source_dir: &str,
        implicit: bool,
        rules: &RedmodRules,
        tree: &'a FileTree,
    ) -> Self {
        let destination_dir = tree::join(&rules.base_dir, &descriptor.name);
        Self {
            descriptor,
            source_dir: source_dir.to_string(),
            destination_dir,
            implicit,
            tree,
        }
    }

    fn category_dir(&self, category: &CategoryRules) -> String {
        tree::join(&self.source_dir, &category.dir)
    }

    fn category_files(&self, category: &CategoryRules) -> Vec<String> {
        self.tree.files_under(&self.category_dir(category), |path| {
            tree::has_extension(path, &category.extensions)
        })
    }

    fn relocate(&self, path: &str) -> MoveInstruction {
        let rel = tree::strip_dir(path, &self.source_dir).unwrap_or(path);
        MoveInstruction::new(path, tree::join(&self.destination_dir, rel))
    }

    fn relocate_all(&self, paths: &[String]) -> Vec<MoveInstruction> {
        paths.iter().map(|path| self.relocate(path)).collect()
    }
}

/// Runs every category check in order and concatenates their moves. Stops at
/// the first failing check.
pub fn validate_unit(
    unit: &ModUnit<'_>,
    rules: &RedmodRules,
) -> Result<Vec<MoveInstruction>, InstallError> {
    let mut instructions = metadata_placement(unit, rules)?;
    instructions.extend(archives(unit, rules));
    instructions.extend(custom_sounds(unit, rules)?);
    instructions.extend(scripts(unit, rules)?);
    instructions.extend(tweaks(unit, rules)?);
    let extras = extra_files(unit, &instructions);
    instructions.extend(extras);
    Ok(instructions)
}

pub fn metadata_placement(
    unit: &ModUnit<'_>,
    rules: &RedmodRules,
) -> Result<Vec<MoveInstruction>, InstallError> {
    if !unit.implicit {
        let dir_name = tree::file_name(&unit.source_dir);
        if dir_name != unit.descriptor.name {
            return Err(InstallError::NameMismatch {
                dir: unit.source_dir.clone(),
                declared: unit.descriptor.name.clone(),
            });
        }
    }
    let info = tree::join(&unit.source_dir, &rules.info_filename);
    Ok(vec![unit.relocate(&info)])
}

pub fn archives(unit: &ModUnit<'_>, rules: &RedmodRules) -> Vec<MoveInstruction> {
    unit.relocate_all(&unit.category_files(&rules.archives))
}

pub fn custom_sounds(
    unit: &ModUnit<'_>,
    rules: &RedmodRules,
) -> Result<Vec<MoveInstruction>, InstallError> {
    let files = unit.category_files(&rules.custom_sounds);
    let declared = unit.descriptor.declares_sounds(&rules.sound_skip_kind);
    match (declared, files.is_empty()) {
        (true, true) => Err(InstallError::SoundsDeclaredButAbsent {
            unit: unit.descriptor.name.clone(),
            dir: unit.category_dir(&rules.custom_sounds),
        }),
        (false, false) => Err(InstallError::SoundsUndeclared {
            unit: unit.descriptor.name.clone(),
            files,
        }),
        _ => Ok(unit.relocate_all(&files)),
    }
}

pub fn scripts(
    unit: &ModUnit<'_>,
    rules: &RedmodRules,
) -> Result<Vec<MoveInstruction>, InstallError> {
    let scripts_dir = unit.category_dir(&rules.scripts);
    let files = unit.category_files(&rules.scripts);
    let misplaced: Vec<String> = files
        .iter()
        .filter(|path| {
            let rel = tree::strip_dir(path, &scripts_dir).unwrap_or(path.as_str());
            match rel.split_once('/') {
                Some((subdir, _)) => !rules
                    .scripts_allowed_subdirs
                    .iter()
                    .any(|allowed| allowed == subdir),
                None => true,
            }
        })
        .cloned()
        .collect();
    if !misplaced.is_empty() {
        return Err(InstallError::MisplacedScripts {
            unit: unit.descriptor.name.clone(),
            allowed: rules.scripts_allowed_subdirs.clone(),
            files: misplaced,
        });
    }
    Ok(unit.relocate_all(&files))
}

pub fn tweaks(
    unit: &ModUnit<'_>,
    rules: &RedmodRules,
) -> Result<Vec<MoveInstruction>, InstallError> {
    let required = tree::join(&unit.category_dir(&rules.tweaks), &rules.tweaks_required_subdir);
    let files = unit.category_files(&rules.tweaks);
    let misplaced: Vec<String> = files
        .iter()
        .filter(|path| !tree::is_within(path.as_str(), &required))
        .cloned()
        .collect();
    if !misplaced.is_empty() {
        return Err(InstallError::MisplacedTweaks {
            unit: unit.descriptor.name.clone(),
            required,
            files: misplaced,
        });
    }
    Ok(unit.relocate_all(&files))
}

/// Everything under the unit that no category claimed. Never fails.
pub fn extra_files(unit: &ModUnit<'_>, claimed: &[MoveInstruction]) -> Vec<MoveInstruction> {
    let claimed: HashSet<&str> = claimed
        .iter()
        .map(|instruction| instruction.source.as_str())
        .collect();
    let extras = unit
        .tree
        .files_under(&unit.source_dir, |path| !claimed.contains(path));
    if !extras.is_empty() {
        log::warn!(
            "{} contains {} file(s) outside the recognized categories, installing them as-is: {}",
            unit.descriptor.name,
            extras.len(),
            extras.join(", ")
        );
    }
    unit.relocate_all(&extras)
}
