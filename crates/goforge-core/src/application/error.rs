//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not request or
//! manifest rules. Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that occur while loading assets or running a generation.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A manifest-referenced resource does not exist.
    #[error("Resource not found: {path}")]
    ResourceMissing { path: String },

    /// A resource exists but could not be read.
    #[error("Failed to read resource {path}: {reason}")]
    ResourceUnreadable { path: String, reason: String },

    /// Template content could not be resolved at render time.
    #[error("Template not found: {template}")]
    TemplateNotFound { template: String },

    /// Template parse or execution failed.
    #[error("Template {template} failed to render: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// A config fragment is not a JSON object.
    #[error("Config fragment {path} is invalid: {reason}")]
    FragmentInvalid { path: String, reason: String },

    /// Dependency metadata could not be parsed.
    #[error("Metadata file {path} is invalid: {reason}")]
    MetadataInvalid { path: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A staging area could not be created.
    #[error("Failed to create staging area: {reason}")]
    StagingFailed { reason: String },

    /// Packaging the staging tree failed.
    #[error("Failed to create archive: {reason}")]
    ArchiveFailed { reason: String },

    /// Shared state lock poisoned.
    #[error("Internal store lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ResourceMissing { .. }
            | Self::FragmentInvalid { .. }
            | Self::MetadataInvalid { .. } => ErrorKind::Config,
            Self::TemplateNotFound { .. } | Self::RenderingFailed { .. } => ErrorKind::Template,
            Self::ResourceUnreadable { .. }
            | Self::FilesystemError { .. }
            | Self::StagingFailed { .. }
            | Self::ArchiveFailed { .. } => ErrorKind::FileSystem,
            Self::StoreLockError => ErrorKind::Internal,
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ResourceMissing { path } => vec![
                format!("Missing asset: {}", path),
                "Point --assets (or GOFORGE__ASSETS_DIR) at the directory holding templates/".into(),
            ],
            Self::TemplateNotFound { template } | Self::RenderingFailed { template, .. } => vec![
                format!("Check the template: {}", template),
                "Try: goforge validate".into(),
            ],
            Self::FragmentInvalid { path, .. } | Self::MetadataInvalid { path, .. } => {
                vec![format!("Fix the JSON in {}", path)]
            }
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::StagingFailed { .. } => vec![
                "Check that the system temp directory is writable".into(),
                "Set TMPDIR to use another location".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }
}
