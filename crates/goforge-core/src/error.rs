//! Unified error handling for goforge core.
//!
//! Domain and application errors are wrapped by [`GenError`], which exposes a
//! closed [`ErrorKind`] taxonomy. The kind decides the status code a caller
//! reports and the short message a user sees; `Display` keeps the full
//! operator-facing context.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, Layer};

/// Root error type for goforge core operations.
#[derive(Debug, Error, Clone)]
pub enum GenError {
    /// Request or manifest rule violations.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Orchestration failures (templates, staging, archiving).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// A generation layer failed; the whole generation is aborted.
    #[error("Layer '{layer}' failed: {source}")]
    LayerFailed {
        layer: Layer,
        #[source]
        source: Box<GenError>,
    },

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl GenError {
    /// Wrap an error with the layer it happened in.
    ///
    /// Already-wrapped errors are returned unchanged so a failure is
    /// attributed to the innermost layer only.
    pub fn in_layer(self, layer: Layer) -> Self {
        match self {
            wrapped @ Self::LayerFailed { .. } => wrapped,
            other => Self::LayerFailed {
                layer,
                source: Box::new(other),
            },
        }
    }

    /// The taxonomy kind of this error.
    ///
    /// A layer failure reports the kind of its cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => e.kind(),
            Self::Application(e) => e.kind(),
            Self::LayerFailed { source, .. } => source.kind(),
            Self::Configuration { .. } => ErrorKind::Config,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// The layer that failed, if the error came out of composition.
    pub fn failed_layer(&self) -> Option<Layer> {
        match self {
            Self::LayerFailed { layer, .. } => Some(*layer),
            _ => None,
        }
    }

    /// Short caller-facing sentence; never contains paths or internals.
    pub fn user_message(&self) -> String {
        match self {
            Self::Domain(e) if e.kind() != ErrorKind::Config => e.to_string(),
            Self::LayerFailed { layer, source } => {
                format!("{} (while generating the {} layer)", source.user_message(), layer)
            }
            _ => self.kind().summary().to_string(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::LayerFailed { source, .. } => source.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in goforge".into(),
                "Please report it with the request and manifest that triggered it".into(),
            ],
        }
    }
}

/// Closed error taxonomy shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-policy request field.
    Validation,
    /// Referenced framework or library absent from the manifest.
    NotFound,
    /// Manifest or fragment malformed or version-incompatible.
    Config,
    /// Template missing, unparsable or failed to execute.
    Template,
    /// Staging or archival I/O failure.
    FileSystem,
    /// Anything uncategorized.
    Internal,
}

impl ErrorKind {
    /// HTTP-equivalent status for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::Config | Self::Template | Self::FileSystem | Self::Internal => 500,
        }
    }

    /// Machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Config => "CONFIG_ERROR",
            Self::Template => "TEMPLATE_ERROR",
            Self::FileSystem => "FILESYSTEM_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    fn summary(self) -> &'static str {
        match self {
            Self::Validation => "The request is invalid",
            Self::NotFound => "A requested framework or library does not exist",
            Self::Config => "The generator is misconfigured",
            Self::Template => "A project template could not be rendered",
            Self::FileSystem => "The project files could not be written",
            Self::Internal => "Failed to generate project",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Convenient result type alias.
pub type GenResult<T> = Result<T, GenError>;

/// Extension trait for adding context to foreign errors.
pub trait Context<T> {
    /// Convert the error into an internal error with a message prefix.
    fn context(self, msg: impl Into<String>) -> GenResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> GenResult<T> {
        self.map_err(|e| GenError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
