//! Infrastructure adapters for goforge.
//!
//! This crate implements the ports defined in `goforge-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod archiver;
pub mod asset_discovery;
pub mod filesystem;
pub mod renderer;
pub mod resources;
pub mod workspace;

use std::path::Path;

use goforge_core::application::Adapters;

// Re-export commonly used adapters
pub use archiver::ZipArchiver;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::HandlebarsRenderer;
pub use resources::{DirectoryResources, MemoryResources};
pub use workspace::{TempStaging, TempWorkspace};

/// Production adapter set reading assets from `asset_root`.
pub fn local_adapters(asset_root: &Path) -> Adapters {
    Adapters {
        resources: Box::new(DirectoryResources::new(asset_root)),
        renderer: Box::new(HandlebarsRenderer::new()),
        filesystem: Box::new(LocalFilesystem::new()),
        workspace: Box::new(TempWorkspace::new()),
        archiver: Box::new(ZipArchiver::new()),
    }
}
