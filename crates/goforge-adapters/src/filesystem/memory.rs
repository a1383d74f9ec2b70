//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use goforge_core::{
    application::{ApplicationError, ports::Filesystem},
    error::GenResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep a handle while the
/// service owns a boxed copy.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// All files in path order.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> GenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> GenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
