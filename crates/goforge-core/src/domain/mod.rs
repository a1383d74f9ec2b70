//! Domain layer for goforge.
//!
//! Pure composition logic: the manifest model, request rules, dependency
//! normalization, config merging and layer planning. Nothing here performs
//! I/O; template content, fragments and staging are reached through the
//! ports in [`crate::application::ports`].
//!
//! - **No I/O**: fragments arrive as strings, plans are data
//! - **Deterministic**: ordered maps and sorted sets only
//! - **Immutable inputs**: planning borrows the manifest, never mutates it

pub mod config_doc;
pub mod context;
pub mod dependencies;
pub mod deps_meta;
pub mod error;
pub mod includes;
pub mod layout;
pub mod manifest;
pub mod plan;
pub mod request;

mod validation;

pub use config_doc::MergedConfig;
pub use context::{CommonContext, RenderContext};
pub use dependencies::{BASELINE_MODULES, DependencySet, module_path};
pub use deps_meta::{ConfigBinding, ConfigEntry, DepBinding, DepEntry, DepsMetadata};
pub use error::DomainError;
pub use includes::Includes;
pub use manifest::{DisplayMeta, FrameworkDef, LibCategory, LibDef, MIN_MANIFEST_VERSION, Manifest};
pub use plan::{GenerationPlan, Layer, LayerPlan, RenderStep, Step};
pub use request::{DEFAULT_ARCHITECTURE, GenerateRequest};
pub use validation::DomainValidator;
