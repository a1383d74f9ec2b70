//! Error handling for the goforge CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Exit code mapping

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;
use uuid::Uuid;

use goforge_core::error::{ErrorKind, GenError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input that never reached the engine.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The archive destination is already taken.
    #[error("Output already exists at {path}")]
    OutputExists { path: PathBuf },

    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Loading the manifest or its assets failed.
    #[error("Could not load the manifest: {0}")]
    Setup(#[source] GenError),

    /// A generation failed; `request_id` tags its log lines.
    #[error("Generation {request_id} failed: {source}")]
    Generation {
        request_id: Uuid,
        #[source]
        source: GenError,
    },

    /// Any other engine error (planning, listing).
    #[error("{0}")]
    Core(#[from] GenError),

    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    fn core(&self) -> Option<&GenError> {
        match self {
            Self::Setup(e) | Self::Core(e) | Self::Generation { source: e, .. } => Some(e),
            _ => None,
        }
    }

    /// The line shown to the user: short, without paths or internals.
    pub fn headline(&self) -> String {
        match self {
            Self::Generation { request_id, source } => {
                format!("{} (request {})", source.user_message(), request_id)
            }
            Self::Setup(e) => format!("Could not load the manifest: {}", e.user_message()),
            Self::Core(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::OutputExists { path } => vec![
                format!("The file '{}' already exists", path.display()),
                "Use --force to overwrite it".into(),
                "Or choose another destination with --output".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Use 'goforge init --force' to recreate a default config".into(),
            ],

            Self::Setup(e) => {
                let mut out = e.suggestions();
                out.push("Point --manifest at manifest.json and --assets at the directory holding templates/".into());
                out.push("Or set MANIFEST_PATH / GOFORGE_ASSETS_DIR".into());
                out
            }

            Self::Generation { source, .. } | Self::Core(source) => {
                let mut out = source.suggestions();
                if matches!(source.kind(), ErrorKind::NotFound | ErrorKind::Validation) {
                    out.push("Run 'goforge list' to see frameworks and libraries".into());
                }
                out
            }

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        if let Some(core) = self.core() {
            return match core.kind() {
                ErrorKind::Validation => ErrorCategory::UserError,
                ErrorKind::NotFound => ErrorCategory::NotFound,
                ErrorKind::Config => ErrorCategory::Configuration,
                ErrorKind::Template | ErrorKind::FileSystem | ErrorKind::Internal => {
                    ErrorCategory::Internal
                }
            };
        }
        match self {
            Self::InvalidInput { .. } | Self::OutputExists { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            _ => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.headline().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`]; no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self.headline()));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Machine-readable form: `{error, code, requestId}`.
    pub fn to_json(&self) -> serde_json::Value {
        let code = self
            .core()
            .map(|e| e.kind().code())
            .unwrap_or(match self.category() {
                ErrorCategory::UserError => "VALIDATION_ERROR",
                ErrorCategory::Configuration => "CONFIG_ERROR",
                _ => "INTERNAL_ERROR",
            });
        let request_id = match self {
            Self::Generation { request_id, .. } => Some(request_id.to_string()),
            _ => None,
        };
        serde_json::json!({
            "error": self.headline(),
            "code": code,
            "requestId": request_id,
        })
    }

    /// Log the error once, with full operator context.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Framework or library not found.
    NotFound,
    /// Configuration or manifest error.
    Configuration,
    /// Internal/system error.
    Internal,
}

/// Extension trait to convert I/O results into [`CliError`] with a
/// descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goforge_core::{
        application::ApplicationError,
        domain::{DomainError, Layer},
    };
    use std::io;

    fn template_failure() -> GenError {
        GenError::from(ApplicationError::RenderingFailed {
            template: "templates/usecase/user_usecase.tmpl".into(),
            reason: "unclosed block".into(),
        })
        .in_layer(Layer::Usecase)
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn exit_code_user_error() {
        let err = CliError::InvalidInput {
            message: "x".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn exit_code_not_found() {
        let err = CliError::Core(
            DomainError::UnknownFramework {
                name: "fiber".into(),
            }
            .into(),
        );
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_code_configuration() {
        let err = CliError::ConfigError {
            message: "x".into(),
            source: None,
        };
        assert_eq!(err.exit_code(), 4);
        assert_eq!(
            CliError::Setup(GenError::Configuration {
                message: "bad manifest".into()
            })
            .exit_code(),
            4
        );
    }

    #[test]
    fn exit_code_internal() {
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
        let err = CliError::Generation {
            request_id: Uuid::nil(),
            source: template_failure(),
        };
        assert_eq!(err.exit_code(), 1);
    }

    // ── messages ──────────────────────────────────────────────────────────

    #[test]
    fn generation_headline_carries_request_id_not_paths() {
        let id = Uuid::new_v4();
        let err = CliError::Generation {
            request_id: id,
            source: template_failure(),
        };
        let headline = err.headline();
        assert!(headline.contains(&id.to_string()));
        assert!(!headline.contains("templates/"));
        assert!(err.to_string().contains("templates/usecase/user_usecase.tmpl"));
    }

    #[test]
    fn output_exists_suggests_force() {
        let err = CliError::OutputExists {
            path: PathBuf::from("/tmp/demo.zip"),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("--force")));
    }

    #[test]
    fn not_found_suggests_list() {
        let err = CliError::Core(DomainError::UnknownLibrary { name: "mongo".into() }.into());
        assert!(err.suggestions().iter().any(|s| s.contains("goforge list")));
    }

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::OutputExists {
            path: PathBuf::from("/tmp/x.zip"),
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_chain() {
        let err = CliError::Generation {
            request_id: Uuid::nil(),
            source: template_failure(),
        };
        let s = err.format_plain(true);
        assert!(s.contains("Caused by:"));
        assert!(!s.contains("Use -v"));
    }

    #[test]
    fn json_payload_has_code_and_request_id() {
        let id = Uuid::new_v4();
        let err = CliError::Generation {
            request_id: id,
            source: template_failure(),
        };
        let json = err.to_json();
        assert_eq!(json["code"], "TEMPLATE_ERROR");
        assert_eq!(json["requestId"], id.to_string());
    }

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading config");
        assert!(matches!(cli, Err(CliError::IoError { .. })));
    }
}
