//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (`--manifest`, `--assets`; applied at the call-site)
//! 2. `MANIFEST_PATH`, then `GOFORGE__*` environment variables
//!    (`GOFORGE__ASSETS_DIR`, `GOFORGE__LOG__LEVEL`, ...)
//! 3. Config file (`--config FILE`, else the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the manifest location.
pub const MANIFEST_PATH_ENV: &str = "MANIFEST_PATH";

const ENV_PREFIX: &str = "GOFORGE";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Manifest location, relative to the asset root unless absolute.
    pub manifest_path: PathBuf,
    /// Asset root holding `templates/`; discovered when unset.
    pub assets_dir: Option<PathBuf>,
    /// Logging settings.
    pub log: LogConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Values used when a `generate` flag is omitted.
    pub defaults: Defaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Overrides the level derived from `-v`/`-q`.
    pub level: Option<String>,
    /// `text` or `json`.
    pub format: String,
    /// Also append logs to this file.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    pub framework: Option<String>,
    pub architecture: Option<String>,
    pub include_example: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(goforge_core::application::DEFAULT_MANIFEST_PATH),
            assets_dir: None,
            log: LogConfig {
                level: None,
                format: "text".into(),
                file: None,
            },
            output: OutputConfig { no_color: false },
            defaults: Defaults {
                framework: None,
                architecture: None,
                include_example: false,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration, layering file and environment over defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };
        let manifest_override = std::env::var(MANIFEST_PATH_ENV)
            .ok()
            .filter(|v| !v.is_empty());

        Self::build(&path, required, manifest_override)
            .with_context(|| format!("Failed to load configuration from '{}'", path.display()))
    }

    fn build(path: &Path, required: bool, manifest_override: Option<String>) -> anyhow::Result<Self> {
        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("manifest_path", manifest_override)?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.goforge.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "goforge", "goforge")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".goforge.toml"))
    }

    /// Render as TOML, the on-disk format.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
