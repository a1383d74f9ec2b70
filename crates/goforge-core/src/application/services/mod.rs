//! Application services - orchestrate use cases.
//!
//! `ManifestStore` owns the shared catalog, `LayerComposer` executes one
//! plan into one staging tree, and `GenerationService` ties them to the
//! staging and archiving ports.

pub mod composer;
pub mod generation_service;
pub mod manifest_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use composer::LayerComposer;
pub use generation_service::{Adapters, GeneratedArchive, GenerationService};
pub use manifest_store::{DEFAULT_MANIFEST_PATH, ManifestStore};
