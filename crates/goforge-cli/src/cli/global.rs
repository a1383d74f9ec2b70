//! Global arguments that apply to every subcommand.
//!
//! Declared here and flattened into [`super::Cli`] so that `-v`, `-q`, etc.
//! are available on any invocation without repetition

use clap::Args;
use std::path::PathBuf;

/// Global arguments for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Increase logging verbosity.
    ///
    /// Pass once for INFO (`-v`), twice for DEBUG (`-vv`), three times for
    /// TRACE (`-vvv`).  Conflicts with `--quiet`.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Only warnings and errors
    -v      - Info level (generation summary)
    -vv     - Debug level (per-layer progress)
    -vvv    - Trace level (every rendered template)"
    )]
    pub verbose: u8,

    /// Print only errors; generated archives are still written.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only print errors"
    )]
    pub quiet: bool,

    /// Disable ANSI colour codes in messages and logs; `NO_COLOR` sets it.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// TOML configuration file; must exist when given.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Read configuration from FILE instead of the default location"
    )]
    pub config: Option<PathBuf>,

    /// `auto` picks `human` on a terminal and `plain` otherwise.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Format for command results and errors"
    )]
    pub output_format: OutputFormat,

    /// Manifest location; overrides `MANIFEST_PATH` and the config file.
    #[arg(
        long = "manifest",
        global = true,
        value_name = "FILE",
        help = "Path to manifest.json"
    )]
    pub manifest: Option<PathBuf>,

    /// Asset root holding `templates/`; skips discovery.
    #[arg(
        long = "assets",
        global = true,
        value_name = "DIR",
        help = "Directory containing templates/"
    )]
    pub assets: Option<PathBuf>,
}

/// How the CLI should render its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Human-readable with colors.
    Human,
    /// Plain text without colors.
    Plain,
    /// JSON output.
    Json,
}
