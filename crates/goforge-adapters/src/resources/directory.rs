//! Asset directory on disk.

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::trace;

use goforge_core::{
    application::{ApplicationError, ports::ResourceLoader},
    error::GenResult,
};

/// Reads resources relative to an asset root.
///
/// Relative paths (`templates/...`) resolve under the root; an absolute
/// path such as an overridden manifest location is used as-is.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl ResourceLoader for DirectoryResources {
    fn read_to_string(&self, path: &str) -> GenResult<String> {
        let full = self.resolve(path);
        trace!(path = %full.display(), "Reading resource");

        std::fs::read_to_string(&full).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::ResourceMissing { path: path.into() },
            _ => ApplicationError::ResourceUnreadable {
                path: path.into(),
                reason: e.to_string(),
            },
        }
        .into())
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}
