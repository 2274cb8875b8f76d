use crate::{
    error::{DescriptorError, InstallError},
    loader::FileLoader,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded `info.json` of one REDmod unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "customSounds")]
    pub custom_sounds: Vec<SoundDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundDeclaration {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub gain: Option<f64>,
    #[serde(default)]
    pub pitch: Option<f64>,
}

impl Descriptor {
    pub fn parse(bytes: &[u8]) -> Result<Self, DescriptorError> {
        let value: Value = serde_json::from_slice(bytes).map_err(DescriptorError::Syntax)?;
        let descriptor: Descriptor = serde_json::from_value(value)
            .map_err(|err| DescriptorError::Schema(err.to_string()))?;
        let name = descriptor.name.trim();
        if name.is_empty() {
            return Err(DescriptorError::Schema("name must not be empty".to_string()));
        }
        // The name becomes a directory under the base dir.
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(DescriptorError::Schema(format!(
                "name {:?} is not a valid directory name",
                descriptor.name
            )));
        }
        Ok(descriptor)
    }

    /// Whether any sound entry asks for content, i.e. is not of the skip kind.
    pub fn declares_sounds(&self, skip_kind: &str) -> bool {
        self.custom_sounds
            .iter()
            .any(|sound| sound.kind != skip_kind)
    }
}

pub async fn load_descriptor<L>(loader: &L, path: &str) -> Result<Descriptor, InstallError>
where
    L: FileLoader + ?Sized,
{
    let bytes = loader
        .load(path)
        .await
        .map_err(|err| InstallError::Descriptor {
            path: path.to_string(),
            source: DescriptorError::Io(err),
        })?;
    Descriptor::parse(&bytes).map_err(|source| InstallError::Descriptor {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "tests/descriptor_tests.rs"]
mod tests;
