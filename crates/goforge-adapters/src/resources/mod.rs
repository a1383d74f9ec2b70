//! Resource loaders for templates, fragments, metadata and the manifest.

mod directory;
mod memory;

pub use directory::DirectoryResources;
pub use memory::MemoryResources;
