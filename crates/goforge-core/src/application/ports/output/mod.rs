//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `goforge-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::RenderContext;
use crate::error::GenResult;

/// Port for writes into a staging tree.
///
/// Implemented by:
/// - `goforge_adapters::filesystem::LocalFilesystem` (production)
/// - `goforge_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> GenResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> GenResult<()>;
}

/// Port for read-only assets addressed by manifest-relative paths
/// (`templates/...`, `manifest.json`).
///
/// Implemented by:
/// - `goforge_adapters::resources::DirectoryResources` (asset directory on disk)
/// - `goforge_adapters::resources::MemoryResources` (in-memory asset map)
pub trait ResourceLoader: Send + Sync {
    /// Read a resource as UTF-8 text.
    ///
    /// A missing resource is `ApplicationError::ResourceMissing`.
    fn read_to_string(&self, path: &str) -> GenResult<String>;

    /// Check whether a resource exists.
    fn exists(&self, path: &str) -> bool;
}

/// Port for template rendering.
///
/// Implementations must not keep state between calls: two renders of the
/// same template with different contexts are independent.
///
/// Implemented by:
/// - `goforge_adapters::renderer::HandlebarsRenderer`
pub trait TemplateRenderer: Send + Sync {
    /// Render template `source` (identified by `template` for errors).
    fn render(&self, template: &str, source: &str, context: &RenderContext) -> GenResult<String>;
}

/// Port handing out exclusively owned staging areas.
///
/// Implemented by:
/// - `goforge_adapters::workspace::TempWorkspace`
#[cfg_attr(test, mockall::automock)]
pub trait Workspace: Send + Sync {
    /// Create a fresh, empty staging area.
    fn acquire(&self, label: &str) -> GenResult<Box<dyn StagingArea>>;
}

/// A per-generation staging directory.
///
/// Dropping the value removes the directory and everything under it, so
/// teardown runs on every exit path including unwinding.
pub trait StagingArea: Send {
    fn root(&self) -> &Path;
}

/// Port packing a finished staging tree into a single artifact.
///
/// Implemented by:
/// - `goforge_adapters::archiver::ZipArchiver`
#[cfg_attr(test, mockall::automock)]
pub trait Archiver: Send + Sync {
    fn pack(&self, root: &Path) -> GenResult<Vec<u8>>;
}
