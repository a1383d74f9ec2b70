//! Tracing subscriber initialisation.
//!
//! Only the CLI crate is allowed to call [`init_logging`]; `goforge-core`
//! and `goforge-adapters` only *emit* spans and events.
//!
//! # Verbosity mapping
//!
//! | Flag(s)  | Filter level |
//! |----------|--------------|
//! | (none)   | WARN         |
//! | `-v`     | INFO         |
//! | `-vv`    | DEBUG        |
//! | `-vvv`   | TRACE        |
//! | `--quiet`| ERROR        |
//!
//! `GOFORGE_LOG` (or `log.level` in the config file) replaces the flag-derived
//! level; `RUST_LOG` overrides everything.

use std::{
    io::IsTerminal as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{cli::GlobalArgs, config::LogConfig};

/// Environment variable overriding the log level.
pub const LOG_ENV: &str = "GOFORGE_LOG";

const TARGETS: [&str; 4] = ["goforge", "goforge_cli", "goforge_core", "goforge_adapters"];

/// Initialise the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros fire. The returned
/// guard flushes the log file on drop and has to live until exit.
pub fn init_logging(args: &GlobalArgs, config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_level = std::env::var(LOG_ENV).ok();
    let level = resolve_level(args, env_level.as_deref(), config.level.as_deref());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&level)));

    let json = config.format.eq_ignore_ascii_case("json");
    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(use_ansi)
            .with_writer(std::io::stderr)
    });
    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
    });

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(guard)
}

fn file_writer(path: &Path) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory '{}'", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

/// An explicit override wins when it names a valid level.
fn resolve_level(args: &GlobalArgs, env_level: Option<&str>, config_level: Option<&str>) -> String {
    env_level
        .or(config_level)
        .and_then(|l| l.trim().parse::<LevelFilter>().ok())
        .map(|l| l.to_string().to_ascii_lowercase())
        .unwrap_or_else(|| derive_level(args).to_string())
}

/// Translate the verbosity counter + quiet flag to a level string.
fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn filter_directives(level: &str) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
