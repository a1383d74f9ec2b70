//! goforge Core - manifest-driven Go project composition engine.
//!
//! This crate provides the domain and application layers for goforge,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           goforge-cli (CLI)             │
//! │       (Drives GenerationService)        │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ManifestStore, GenerationService,     │
//! │   LayerComposer)                        │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │ (Filesystem, ResourceLoader, Renderer,  │
//! │  Workspace, Archiver)                   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     goforge-adapters (Infrastructure)   │
//! │ (Handlebars, TempWorkspace, ZipArchiver)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Manifest, GenerationPlan, Dependency-  │
//! │  Set, MergedConfig, RenderContext)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use goforge_core::prelude::*;
//!
//! // 1. Load the manifest once, share it read-only
//! let store = Arc::new(ManifestStore::load("manifest.json", &resources)?);
//!
//! // 2. Build the service with injected adapters
//! let service = GenerationService::new(store, adapters);
//!
//! // 3. Generate
//! let request = GenerateRequest::new("demo-api", "example.com/demo-api", "gin")
//!     .with_lib("redis")
//!     .with_example(true);
//! let archive = service.generate(&request, uuid::Uuid::new_v4())?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Adapters, GeneratedArchive, GenerationService, ManifestStore,
        ports::{Archiver, Filesystem, ResourceLoader, StagingArea, TemplateRenderer, Workspace},
    };
    pub use crate::domain::{
        DependencySet, GenerateRequest, GenerationPlan, Layer, Manifest, RenderContext,
    };
    pub use crate::error::{ErrorKind, GenError, GenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
