use async_trait::async_trait;
use std::{
    collections::HashMap,
    fmt,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use zip::ZipArchive;

/// Reads the bytes of a file inside the archive being installed.
///
/// Paths are tree-relative (see [`crate::tree::FileTree`]). Calls may be
/// issued concurrently.
#[async_trait]
pub trait FileLoader: Send + Sync {
    async fn load(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Loads from an extracted archive on disk.
#[derive(Debug, Clone)]
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileLoader for DirLoader {
    async fn load(&self, path: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.root.join(path)).await
    }
}

/// Loads single entries straight out of a zip archive.
///
/// The central directory is read once in [`ZipLoader::open`]; loads look up
/// the entry by normalized name and share one open archive.
#[derive(Debug, Clone)]
pub struct ZipLoader {
    inner: Arc<ZipIndex>,
}

struct ZipIndex {
    archive: Mutex<ZipArchive<fs::File>>,
    entries: HashMap<String, usize>,
}

impl fmt::Debug for ZipIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipIndex")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl ZipLoader {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = fs::File::open(path.as_ref())?;
        let archive = ZipArchive::new(file).map_err(io::Error::other)?;
        let entries = (0..archive.len())
            .filter_map(|i| {
                archive
                    .name_for_index(i)
                    .map(|name| (crate::tree::normalize_path(name), i))
            })
            .collect();
        Ok(Self {
            inner: Arc::new(ZipIndex {
                archive: Mutex::new(archive),
                entries,
            }),
        })
    }
}

#[async_trait]
impl FileLoader for ZipLoader {
    async fn load(&self, path: &str) -> io::Result<Vec<u8>> {
        let inner = Arc::clone(&self.inner);
        let name = path.to_string();
        tokio::task::spawn_blocking(move || inner.read(&name))
            .await
            .map_err(io::Error::other)?
    }
}

impl ZipIndex {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        let index = *self.entries.get(name).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{name} not in archive"))
        })?;
        let mut archive = self
            .archive
            .lock()
            .map_err(|_| io::Error::other("zip archive lock poisoned"))?;
        let mut entry = archive.by_index(index).map_err(io::Error::other)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// In-memory contents, for hosts that already hold the archive in RAM.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) {
        self.files
            .insert(crate::tree::normalize_path(path), bytes.into());
    }
}

#[async_trait]
impl FileLoader for MemoryLoader {
    async fn load(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
