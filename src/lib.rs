//! Layout classification and install planning for Cyberpunk 2077 mod
//! archives.

pub mod config;
pub mod error;
pub mod host;
pub mod loader;
pub mod outcome;
pub mod plan;
pub mod preset;
pub mod redmod;
pub mod tree;

pub use config::LayoutConfig;
pub use error::InstallError;
pub use host::{Installer, LogWarnings, Support, UnitInfo, WarningSink};
pub use loader::{DirLoader, FileLoader, MemoryLoader, ZipLoader};
pub use outcome::Outcome;
pub use plan::{Family, InstallPlan, LayoutKind, MoveInstruction};
pub use tree::FileTree;
