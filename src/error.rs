use std::io;
use thiserror::Error;

/// Why a mod unit's `info.json` could not be turned into a descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("unreadable: {0}")]
    Io(#[from] io::Error),
    #[error("malformed json: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("schema mismatch: {0}")]
    Schema(String),
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("path is listed both as a file and as a directory: {0}")]
    FileDirCollision(String),
    #[error("path escapes the archive root: {0}")]
    ParentTraversal(String),
}

/// Every way an install attempt can be refused.
///
/// None of these are recovered from. The first one raised ends the attempt
/// and is reported to the user as a single message.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("could not load {path}: {source}")]
    Descriptor {
        path: String,
        #[source]
        source: DescriptorError,
    },
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("mod directory {dir} does not match the name declared in its metadata ({declared})")]
    NameMismatch { dir: String, declared: String },
    #[error("{unit} declares custom sounds but {dir} contains no sound files")]
    SoundsDeclaredButAbsent { unit: String, dir: String },
    #[error("{unit} ships sound files without declaring them: {}", .files.join(", "))]
    SoundsUndeclared { unit: String, files: Vec<String> },
    #[error(
        "{unit} has script files outside the allowed directories ({}): {}",
        .allowed.join(", "),
        .files.join(", ")
    )]
    MisplacedScripts {
        unit: String,
        allowed: Vec<String>,
        files: Vec<String>,
    },
    #[error("{unit} has tweak files outside {required}: {}", .files.join(", "))]
    MisplacedTweaks {
        unit: String,
        required: String,
        files: Vec<String>,
    },
    #[error("{base} contains directories that are not valid mods: {}", .offenders.join(", "))]
    EnumerationConflict { base: String, offenders: Vec<String> },
    #[error("{base} does not contain any mod directories")]
    NoModUnits { base: String },
    #[error("ambiguous preset layout: {0}")]
    AmbiguousContent(String),
    #[error("no {family} layout recognized in this archive")]
    NoLayoutMatched { family: &'static str },
}

impl InstallError {
    /// Short category label used in warning titles and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            InstallError::Descriptor { .. } => "descriptor",
            InstallError::Io { .. } => "io",
            InstallError::NameMismatch { .. } => "name-mismatch",
            InstallError::SoundsDeclaredButAbsent { .. } | InstallError::SoundsUndeclared { .. } => {
                "sounds-cross-check"
            }
            InstallError::MisplacedScripts { .. } | InstallError::MisplacedTweaks { .. } => {
                "misplaced-file"
            }
            InstallError::EnumerationConflict { .. } | InstallError::NoModUnits { .. } => {
                "enumeration-conflict"
            }
            InstallError::AmbiguousContent(_) => "ambiguous-content",
            InstallError::NoLayoutMatched { .. } => "no-layout",
        }
    }
}
