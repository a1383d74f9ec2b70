//! Per-generation staging directories under the system temp dir.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use goforge_core::{
    application::{
        ApplicationError,
        ports::{StagingArea, Workspace},
    },
    error::GenResult,
};

/// Hands out fresh `gen-<label>-XXXX` directories.
#[derive(Debug, Clone, Default)]
pub struct TempWorkspace {
    parent: Option<PathBuf>,
}

impl TempWorkspace {
    /// Stage under the system temp directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage under `parent` instead of the system temp directory.
    pub fn in_dir(parent: impl Into<PathBuf>) -> Self {
        Self {
            parent: Some(parent.into()),
        }
    }
}

impl Workspace for TempWorkspace {
    fn acquire(&self, label: &str) -> GenResult<Box<dyn StagingArea>> {
        let prefix = format!("gen-{}-", label);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match &self.parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| ApplicationError::StagingFailed {
            reason: e.to_string(),
        })?;

        debug!(root = %dir.path().display(), "Staging directory created");
        Ok(Box::new(TempStaging { dir: Some(dir) }))
    }
}

/// Staging directory removed when dropped.
#[derive(Debug)]
pub struct TempStaging {
    dir: Option<TempDir>,
}

impl StagingArea for TempStaging {
    fn root(&self) -> &Path {
        self.dir.as_ref().map_or(Path::new(""), TempDir::path)
    }
}

impl Drop for TempStaging {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => debug!(root = %path.display(), "Staging directory removed"),
                Err(e) => warn!(root = %path.display(), error = %e, "Failed to remove staging directory"),
            }
        }
    }
}
