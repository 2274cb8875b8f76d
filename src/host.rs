//! Entry points a mod manager calls: `test` to ask whether a family
//! applies, `install` to get the move plan or a rejection.

use crate::{
    config::{LayoutConfig, PresetMatchers},
    error::InstallError,
    loader::FileLoader,
    plan::{Family, InstallPlan},
    preset, redmod,
    tree::FileTree,
};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Support {
    pub supported: bool,
}

/// What the host knows about the archive being installed.
#[derive(Debug, Clone, Default)]
pub struct UnitInfo {
    pub name: String,
}

impl UnitInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Receives the user-facing warning when an install attempt is rejected.
pub trait WarningSink: Send + Sync {
    fn warn(&self, title: &str, message: &str, files: &[String]);
}

/// Default sink: writes the warning to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogWarnings;

impl WarningSink for LogWarnings {
    fn warn(&self, title: &str, message: &str, files: &[String]) {
        log::warn!("{title}: {message}");
        if !files.is_empty() {
            log::warn!("Considered files: {}", files.join(", "));
        }
    }
}

pub struct Installer<L: FileLoader> {
    config: LayoutConfig,
    matchers: PresetMatchers,
    loader: L,
    warnings: Box<dyn WarningSink>,
}

impl<L: FileLoader> Installer<L> {
    /// Fails only when a preset marker in `config` is not a valid regex.
    pub fn new(config: LayoutConfig, loader: L) -> Result<Self> {
        let matchers = config.preset.compile()?;
        Ok(Self {
            config,
            matchers,
            loader,
            warnings: Box::new(LogWarnings),
        })
    }

    pub fn with_warnings(mut self, sink: impl WarningSink + 'static) -> Self {
        self.warnings = Box::new(sink);
        self
    }

    pub fn test(&self, family: Family, tree: &FileTree) -> Support {
        let supported = match family {
            Family::Redmod => redmod::is_applicable(tree, &self.config.redmod),
            Family::Preset => preset::is_applicable(tree, &self.config.preset),
        };
        Support { supported }
    }

    /// Every family whose detector fires, in priority order.
    pub fn detect(&self, tree: &FileTree) -> Vec<Family> {
        Family::ALL
            .into_iter()
            .filter(|family| self.test(*family, tree).supported)
            .collect()
    }

    pub async fn install(
        &self,
        family: Family,
        tree: &FileTree,
        unit: &UnitInfo,
    ) -> Result<InstallPlan, InstallError> {
        let result = match family {
            Family::Redmod => redmod::plan(tree, &self.config.redmod, &self.loader).await,
            Family::Preset => {
                preset::plan(tree, &self.config.preset, &self.matchers, &self.loader).await
            }
        };
        match result {
            Ok((layout, instructions)) => Ok(InstallPlan {
                family,
                layout,
                instructions,
            }),
            Err(err) => {
                log::error!(
                    "{} install of {} rejected ({}): {err}",
                    family.label(),
                    display_name(unit),
                    err.kind()
                );
                let title = format!("Cannot install {}", display_name(unit));
                let files = self.considered_files(family, tree);
                self.warnings.warn(&title, &err.to_string(), &files);
                Err(err)
            }
        }
    }

    fn considered_files(&self, family: Family, tree: &FileTree) -> Vec<String> {
        match family {
            Family::Redmod => tree.files().map(str::to_string).collect(),
            Family::Preset => preset::preset_files(tree, &self.config.preset),
        }
    }
}

fn display_name(unit: &UnitInfo) -> &str {
    if unit.name.trim().is_empty() {
        "this mod"
    } else {
        unit.name.as_str()
    }
}

#[cfg(test)]
#[path = "tests/host_tests.rs"]
mod tests;
