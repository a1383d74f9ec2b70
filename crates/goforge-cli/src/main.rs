//! # goforge CLI
//!
//! Manifest-driven Go project generator.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Load configuration (file + env + defaults).
//! 3. Initialise the tracing subscriber; the level may come from config.
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! |  0   | Success                 |
//! |  1   | Internal / system error |
//! |  2   | User / input error      |
//! |  3   | Resource not found      |
//! |  4   | Configuration error     |

use std::{io::IsTerminal, process::ExitCode};

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod engine;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // Load .env before anything else, including config and tracing.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too; clap picks the exit code.
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // ── 2. Load configuration ─────────────────────────────────────────────
    // `init` creates the file, so it may not exist yet.
    let loaded = if matches!(cli.command, Commands::Init(_)) {
        Ok(AppConfig::default())
    } else {
        AppConfig::load(cli.global.config.as_deref())
    };
    let config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            return ExitCode::from(4);
        }
    };

    // ── 3. Initialise tracing ─────────────────────────────────────────────
    // The guard flushes the file appender on drop; keep it for all of main.
    let _log_guard = match init_logging(&cli.global, &config.log) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::from(1);
        }
    };

    debug!(
        engine = goforge_core::VERSION,
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;
    let json_errors = output.format() == OutputFormat::Json;

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    match run(cli, config, output) {
        Ok(()) => {
            info!("goforge completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose, json_errors),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::Generate(cmd) => commands::generate::execute(cmd, cli.global, config, output),
        Commands::List(cmd) => commands::list::execute(cmd, cli.global, config, output),
        Commands::Manifest => commands::manifest::execute(cli.global, config, output),
        Commands::Validate => commands::validate::execute(cli.global, config, output),
        Commands::Init(cmd) => commands::init::execute(cmd, cli.global, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, cli.global, config, output),
    }
}

/// Translate a `CliError` into a user message and an exit code.
fn handle_error(err: CliError, verbose: bool, json: bool) -> ExitCode {
    err.log();

    // stderr keeps the message visible when stdout is redirected.
    if json {
        eprintln!("{}", err.to_json());
    } else if std::io::stderr().is_terminal() {
        eprint!("{}", err.format_colored(verbose));
    } else {
        eprint!("{}", err.format_plain(verbose));
    }

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
