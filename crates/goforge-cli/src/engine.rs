//! Locating the manifest and assets, and wiring the generation service.

use std::{path::PathBuf, sync::Arc};

use tracing::{debug, instrument};

use goforge_adapters::{DirectoryResources, asset_discovery, local_adapters};
use goforge_core::application::{GenerationService, ManifestStore};

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult},
};

/// A loaded manifest bound to its asset root.
pub struct Engine {
    pub manifest_path: PathBuf,
    pub asset_root: PathBuf,
    store: Arc<ManifestStore>,
}

impl Engine {
    /// Resolve locations (flags, then config) and load the manifest.
    #[instrument(skip_all)]
    pub fn load(global: &GlobalArgs, config: &AppConfig) -> CliResult<Self> {
        let manifest_path = resolve_manifest_path(
            global
                .manifest
                .clone()
                .unwrap_or_else(|| config.manifest_path.clone()),
        );

        let asset_root = match global.assets.clone().or_else(|| config.assets_dir.clone()) {
            Some(dir) => dir,
            None => asset_discovery::discover(&manifest_path).map_err(CliError::Setup)?,
        };
        debug!(
            manifest = %manifest_path.display(),
            assets = %asset_root.display(),
            "Locations resolved"
        );

        let resources = DirectoryResources::new(&asset_root);
        let store = ManifestStore::load(&manifest_path.to_string_lossy(), &resources)
            .map_err(CliError::Setup)?;

        Ok(Self {
            manifest_path,
            asset_root,
            store: Arc::new(store),
        })
    }

    pub fn store(&self) -> &ManifestStore {
        &self.store
    }

    /// A generation service over the shared store and local adapters.
    pub fn service(&self) -> GenerationService {
        GenerationService::new(Arc::clone(&self.store), local_adapters(&self.asset_root))
    }
}

/// A relative manifest path that exists from the working directory is made
/// absolute; otherwise it stays relative to the asset root.
fn resolve_manifest_path(path: PathBuf) -> PathBuf {
    if path.is_relative() && path.is_file() {
        std::path::absolute(&path).unwrap_or(path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_relative_manifest_stays_relative() {
        let path = resolve_manifest_path(PathBuf::from("does/not/exist.json"));
        assert_eq!(path, PathBuf::from("does/not/exist.json"));
    }

    #[test]
    fn absolute_manifest_is_kept() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("manifest.json");
        std::fs::write(&file, "{}").unwrap();
        assert_eq!(resolve_manifest_path(file.clone()), file);
    }
}
