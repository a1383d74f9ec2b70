//! Locating the asset root (the directory holding `templates/`).

use std::path::{Path, PathBuf};

use tracing::debug;

use goforge_core::{
    application::ApplicationError,
    domain::layout::TEMPLATE_ROOT,
    error::GenResult,
};

/// Environment variable naming an asset root explicitly.
pub const ASSETS_DIR_ENV: &str = "GOFORGE_ASSETS_DIR";

/// Candidate roots in lookup order: `$GOFORGE_ASSETS_DIR`, the manifest's
/// directory, `./`, the executable's directory, `../`.
pub fn candidates(manifest_path: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();

    if let Some(dir) = std::env::var_os(ASSETS_DIR_ENV) {
        out.push(PathBuf::from(dir));
    }
    if let Some(parent) = manifest_path.parent() {
        if !parent.as_os_str().is_empty() {
            out.push(parent.to_path_buf());
        }
    }
    out.push(PathBuf::from("."));
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        out.push(exe_dir);
    }
    out.push(PathBuf::from(".."));
    out
}

/// First candidate that contains a `templates/` directory.
pub fn first_asset_root(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|dir| has_templates(dir))
}

/// Resolve the asset root for `manifest_path`.
pub fn discover(manifest_path: &Path) -> GenResult<PathBuf> {
    let root = first_asset_root(candidates(manifest_path)).ok_or_else(|| {
        ApplicationError::ResourceMissing {
            path: TEMPLATE_ROOT.into(),
        }
    })?;
    debug!(root = %root.display(), "Asset root discovered");
    Ok(root)
}

pub fn has_templates(dir: &Path) -> bool {
    dir.join(TEMPLATE_ROOT.trim_end_matches('/')).is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_root_with_templates_wins() {
        let empty = TempDir::new().unwrap();
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::create_dir(first.path().join("templates")).unwrap();
        std::fs::create_dir(second.path().join("templates")).unwrap();

        let found = first_asset_root(vec![
            empty.path().to_path_buf(),
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(found.as_deref(), Some(first.path()));
    }

    #[test]
    fn templates_file_is_not_a_root() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("templates"), "").unwrap();
        assert!(!has_templates(dir.path()));
    }

    #[test]
    fn manifest_directory_is_a_candidate() {
        let list = candidates(Path::new("/srv/assets/manifest.json"));
        assert!(list.contains(&PathBuf::from("/srv/assets")));
        assert_eq!(list.last(), Some(&PathBuf::from("..")));
    }
}
