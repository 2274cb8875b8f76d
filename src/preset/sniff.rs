use crate::{
    config::{PresetMatchers, PresetRules},
    error::InstallError,
    loader::FileLoader,
    outcome::Outcome,
    plan::MoveInstruction,
    tree,
};
use futures_util::future::join_all;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetVariant {
    CyberCat,
    UnlockerFemale,
    UnlockerMale,
}

impl PresetVariant {
    pub fn target_dir(self, rules: &PresetRules) -> String {
        match self {
            PresetVariant::CyberCat => rules.cybercat_dir.clone(),
            PresetVariant::UnlockerFemale => rules.female_dir(),
            PresetVariant::UnlockerMale => rules.male_dir(),
        }
    }
}

/// Decides what kind of preset `bytes` holds, if any.
pub fn classify(
    bytes: &[u8],
    rules: &PresetRules,
    matchers: &PresetMatchers,
) -> Option<PresetVariant> {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(bytes) {
        if rules
            .cybercat_required_keys
            .iter()
            .all(|key| map.contains_key(key))
        {
            return Some(PresetVariant::CyberCat);
        }
    }
    let text = String::from_utf8_lossy(bytes);
    if all_match(&matchers.feminine, &text) {
        return Some(PresetVariant::UnlockerFemale);
    }
    if all_match(&matchers.masculine, &text) {
        return Some(PresetVariant::UnlockerMale);
    }
    None
}

fn all_match(markers: &[Regex], text: &str) -> bool {
    !markers.is_empty() && markers.iter().all(|marker| marker.is_match(text))
}

/// Loads and classifies every candidate.
///
/// None recognized is `NoMatch`, some recognized is `Conflict`, all
/// recognized is `Success` with one move per file into its variant's
/// directory, even when two files land on the same destination. Read
/// failures abort with the first failing path.
pub async fn sniff_candidates<L>(
    candidates: &[String],
    rules: &PresetRules,
    matchers: &PresetMatchers,
    loader: &L,
) -> Result<Outcome<Vec<MoveInstruction>>, InstallError>
where
    L: FileLoader + ?Sized,
{
    if candidates.is_empty() {
        return Ok(Outcome::NoMatch);
    }
    let loaded = join_all(candidates.iter().map(|path| loader.load(path))).await;

    let mut recognized = Vec::new();
    let mut unrecognized = Vec::new();
    for (path, result) in candidates.iter().zip(loaded) {
        let bytes = result.map_err(|source| InstallError::Io {
            path: path.clone(),
            source,
        })?;
        match classify(&bytes, rules, matchers) {
            Some(variant) => {
                log::debug!("{path}: {variant:?}");
                recognized.push((path.as_str(), variant));
            }
            None => {
                log::debug!("{path}: not a recognized preset");
                unrecognized.push(path.as_str());
            }
        }
    }

    if recognized.is_empty() {
        return Ok(Outcome::NoMatch);
    }
    if !unrecognized.is_empty() {
        return Ok(Outcome::Conflict(format!(
            "{} of {} preset file(s) could not be identified: {}",
            unrecognized.len(),
            candidates.len(),
            unrecognized.join(", ")
        )));
    }

    let instructions: Vec<MoveInstruction> = recognized
        .iter()
        .map(|(path, variant)| {
            MoveInstruction::new(
                *path,
                tree::join(&variant.target_dir(rules), tree::file_name(path)),
            )
        })
        .collect();
    if let Some(clashes) = destination_clash(&instructions) {
        log::warn!("Presets share an install path, the later one wins: {clashes}");
    }
    Ok(Outcome::Success(instructions))
}

fn destination_clash(instructions: &[MoveInstruction]) -> Option<String> {
    let mut by_destination: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for instruction in instructions {
        by_destination
            .entry(instruction.destination.as_str())
            .or_default()
            .push(instruction.source.as_str());
    }
    let clashes: Vec<String> = by_destination
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(destination, sources)| format!("{} -> {destination}", sources.join(" + ")))
        .collect();
    if clashes.is_empty() {
        return None;
    }
    Some(clashes.join("; "))
}
