//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `goforge-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: writes into the staging tree
//!   - `ResourceLoader`: reads templates, fragments and metadata
//!   - `TemplateRenderer`: renders template text against a context
//!   - `Workspace` / `StagingArea`: per-generation staging directory
//!   - `Archiver`: packs the staging tree
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (The CLI calls `GenerationService` directly)

pub mod output;

pub use output::{Archiver, Filesystem, ResourceLoader, StagingArea, TemplateRenderer, Workspace};

#[cfg(test)]
pub use output::{MockArchiver, MockWorkspace};
