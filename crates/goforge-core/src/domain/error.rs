// ============================================================================
// domain/error.rs - request and manifest rule violations
// ============================================================================

use thiserror::Error;

use crate::domain::plan::Layer;
use crate::error::ErrorKind;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (errors travel through layer wrappers)
/// - Categorizable (mapped onto the shared [`ErrorKind`] taxonomy)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Libraries '{first}' and '{second}' are mutually exclusive ({category})")]
    ExclusiveSelection {
        category: String,
        first: String,
        second: String,
    },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("Framework '{name}' not found")]
    UnknownFramework { name: String },

    #[error("Library '{name}' not found")]
    UnknownLibrary { name: String },

    // ========================================================================
    // Manifest Errors (startup-time configuration)
    // ========================================================================
    #[error("Invalid manifest: {reason}")]
    InvalidManifest { reason: String },

    #[error("Manifest version {found} is not supported (minimum {minimum})")]
    UnsupportedManifestVersion { found: String, minimum: String },

    #[error("Invalid {owner}: {reason}")]
    InvalidDefinition { owner: String, reason: String },

    #[error("Output '{path}' is produced by both the {first} and {second} layers")]
    OutputCollision {
        path: String,
        first: Layer,
        second: Layer,
    },
}

impl DomainError {
    /// Taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidField { .. }
            | Self::MissingRequiredField { .. }
            | Self::ExclusiveSelection { .. } => ErrorKind::Validation,
            Self::UnknownFramework { .. } | Self::UnknownLibrary { .. } => ErrorKind::NotFound,
            Self::InvalidManifest { .. }
            | Self::UnsupportedManifestVersion { .. }
            | Self::InvalidDefinition { .. }
            | Self::OutputCollision { .. } => ErrorKind::Config,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidField { field, .. } => match *field {
                "project_name" => vec![
                    "Project names use lowercase letters, digits and hyphens".into(),
                    "Example: my-service".into(),
                ],
                "module_name" => vec![
                    "Module names look like host/owner/repo".into(),
                    "Example: github.com/acme/my-service".into(),
                ],
                _ => vec!["Check the value and try again".into()],
            },
            Self::MissingRequiredField { field } => vec![format!("Provide a value for {}", field)],
            Self::ExclusiveSelection { category, .. } => vec![
                format!("Only one {} library can be selected", category),
                "Remove one of the conflicting libraries".into(),
            ],
            Self::UnknownFramework { .. } => vec!["Try: goforge list".into()],
            Self::UnknownLibrary { .. } => vec![
                "Library names are case-sensitive".into(),
                "Try: goforge list".into(),
            ],
            Self::OutputCollision { path, .. } => vec![
                format!("Rename the template that renders {}", path),
                "Framework templates must not share names with application files".into(),
            ],
            Self::UnsupportedManifestVersion { minimum, .. } => {
                vec![format!("Update the manifest to version {} or later", minimum)]
            }
            _ => vec!["Try: goforge validate".into()],
        }
    }
}
