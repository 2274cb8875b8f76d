use crate::error::TreeError;
use anyhow::{Context, Result};
use std::{collections::BTreeSet, fs, path::Path};
use walkdir::WalkDir;

/// Read-only listing of the files and directories inside a mod archive.
///
/// Paths are relative, use `/` as separator and never start or end with one.
/// The archive root is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    files: BTreeSet<String>,
    dirs: BTreeSet<String>,
}

impl FileTree {
    /// Builds a tree from raw entries. Entries ending in a separator are
    /// directories, everything else is a file.
    pub fn from_paths<I, S>(entries: I) -> std::result::Result<Self, TreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut files = BTreeSet::new();
        let mut dirs = BTreeSet::new();
        for entry in entries {
            let raw = entry.as_ref();
            let is_dir = raw.ends_with('/') || raw.ends_with('\\');
            let path = normalize_path(raw);
            if path.is_empty() {
                continue;
            }
            if path.split('/').any(|part| part == "..") {
                return Err(TreeError::ParentTraversal(raw.to_string()));
            }
            for ancestor in ancestors(&path) {
                dirs.insert(ancestor.to_string());
            }
            if is_dir {
                dirs.insert(path);
            } else {
                files.insert(path);
            }
        }
        if let Some(collision) = files.intersection(&dirs).next() {
            return Err(TreeError::FileDirCollision(collision.clone()));
        }
        Ok(Self { files, dirs })
    }

    pub fn from_dir(root: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
            let entry = entry.context("walk mod directory")?;
            let rel = entry
                .path()
                .strip_prefix(root)
                .context("rel path")?
                .to_string_lossy()
                .replace('\\', "/");
            if is_ignored_path(&rel) {
                continue;
            }
            if entry.file_type().is_dir() {
                entries.push(format!("{rel}/"));
            } else if entry.file_type().is_file() {
                entries.push(rel);
            }
        }
        Self::from_paths(entries).with_context(|| format!("index {}", root.display()))
    }

    /// Lists a zip archive without extracting it.
    pub fn from_zip(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).context("open zip")?;
        let mut archive = zip::ZipArchive::new(file).context("read zip")?;
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index(i).context("zip entry")?;
            if entry.enclosed_name().is_none() {
                log::warn!("Skipping unsafe zip entry {}", entry.name());
                continue;
            }
            let name = entry.name().replace('\\', "/");
            if is_ignored_path(&name) {
                continue;
            }
            entries.push(name);
        }
        Self::from_paths(entries).with_context(|| format!("index {}", path.display()))
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    pub fn is_file(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    pub fn dir_exists(&self, dir: &str) -> bool {
        dir.is_empty() || self.dirs.contains(dir)
    }

    /// Files directly inside `dir` that satisfy `filter`.
    pub fn files_in<F>(&self, dir: &str, filter: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        self.files
            .iter()
            .filter(|path| parent_of(path) == dir && filter(path))
            .cloned()
            .collect()
    }

    /// Files anywhere below `dir` that satisfy `filter`.
    pub fn files_under<F>(&self, dir: &str, filter: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        self.files
            .iter()
            .filter(|path| is_within(path, dir) && filter(path))
            .cloned()
            .collect()
    }

    /// Names of the directories directly inside `dir`.
    pub fn subdir_names(&self, dir: &str) -> Vec<String> {
        self.dirs
            .iter()
            .filter(|path| parent_of(path) == dir)
            .map(|path| file_name(path).to_string())
            .collect()
    }
}

pub fn normalize_path(raw: &str) -> String {
    raw.replace('\\', "/")
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

pub fn join(dir: &str, name: &str) -> String {
    match (dir.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (_, true) => dir.to_string(),
        _ => format!("{dir}/{name}"),
    }
}

pub fn parent_of(path: &str) -> &str {
    path.rfind('/').map(|idx| &path[..idx]).unwrap_or("")
}

pub fn file_name(path: &str) -> &str {
    path.rfind('/').map(|idx| &path[idx + 1..]).unwrap_or(path)
}

/// `path` relative to `dir`, or `None` when it lies outside.
pub fn strip_dir<'a>(path: &'a str, dir: &str) -> Option<&'a str> {
    if dir.is_empty() {
        return Some(path);
    }
    path.strip_prefix(dir)?.strip_prefix('/')
}

pub fn is_within(path: &str, dir: &str) -> bool {
    strip_dir(path, dir).is_some()
}

pub fn has_extension(path: &str, extensions: &[String]) -> bool {
    let name = file_name(path).to_ascii_lowercase();
    extensions
        .iter()
        .any(|ext| name.len() > ext.len() && name.ends_with(&ext.to_ascii_lowercase()))
}

fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/').map(move |(idx, _)| &path[..idx])
}

fn is_ignored_path(path: &str) -> bool {
    path.split('/').any(|part| {
        part.eq_ignore_ascii_case("__MACOSX")
            || part.eq_ignore_ascii_case(".ds_store")
            || part.eq_ignore_ascii_case("thumbs.db")
            || part == ".git"
            || part == ".svn"
            || part == ".vscode"
    })
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
