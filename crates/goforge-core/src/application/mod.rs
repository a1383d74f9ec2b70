//! Application layer for goforge.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ManifestStore, LayerComposer, GenerationService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Composition decisions live in `crate::domain::plan`; services only
//! execute plans through the ports.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    Adapters, DEFAULT_MANIFEST_PATH, GeneratedArchive, GenerationService, LayerComposer,
    ManifestStore,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Archiver, Filesystem, ResourceLoader, StagingArea, TemplateRenderer, Workspace};

pub use error::ApplicationError;
