//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "goforge",
    bin_name = "goforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Manifest-driven Go project generator",
    long_about = "goforge composes a runnable Go service from a manifest of \
                  frameworks and libraries and delivers it as a zip archive.",
    after_help = "EXAMPLES:\n\
        \x20 goforge generate --name demo-api --module example.com/demo-api --framework gin\n\
        \x20 goforge generate --name demo-api --module example.com/demo-api -f gin -l redis --example\n\
        \x20 goforge list --format json\n\
        \x20 goforge completions bash > /usr/share/bash-completion/completions/goforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a project archive.
    #[command(
        visible_alias = "gen",
        about = "Generate a Go project archive",
        after_help = "EXAMPLES:\n\
            \x20 goforge generate --name demo-api --module example.com/demo-api --framework gin\n\
            \x20 goforge generate -n shop -m github.com/acme/shop -f echo -l postgres -l redis --example\n\
            \x20 goforge generate -n demo -m example.com/demo -f gin --dry-run"
    )]
    Generate(GenerateArgs),

    /// List frameworks and libraries.
    #[command(
        visible_alias = "ls",
        about = "List available frameworks and libraries",
        after_help = "EXAMPLES:\n\
            \x20 goforge list\n\
            \x20 goforge list --format json\n\
            \x20 goforge list --format csv > catalogue.csv"
    )]
    List(ListArgs),

    /// Print the loaded manifest verbatim.
    #[command(about = "Print the loaded manifest as JSON")]
    Manifest,

    /// Load and validate the manifest and every asset it references.
    #[command(about = "Validate the manifest and its assets")]
    Validate,

    /// Initialise a goforge configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 goforge init          # default location\n\
            \x20 goforge init --force  # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 goforge completions bash > ~/.local/share/bash-completion/completions/goforge\n\
            \x20 goforge completions zsh  > ~/.zfunc/_goforge\n\
            \x20 goforge completions fish > ~/.config/fish/completions/goforge.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the goforge configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 goforge config get manifest_path\n\
            \x20 goforge config list\n\
            \x20 goforge config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `goforge generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Project name: lowercase letters, digits and hyphens.
    #[arg(short = 'n', long = "name", value_name = "PROJECT", help = "Project name")]
    pub name: String,

    /// Go module path, e.g. `github.com/acme/demo-api`.
    #[arg(short = 'm', long = "module", value_name = "MODULE", help = "Go module path")]
    pub module: String,

    /// Web framework key from the manifest.
    #[arg(
        short = 'f',
        long = "framework",
        value_name = "FRAMEWORK",
        help = "Framework to use (see `goforge list`)"
    )]
    pub framework: Option<String>,

    /// Architecture label recorded in the generated README.
    #[arg(short = 'a', long = "arch", value_name = "ARCH", help = "Architecture label")]
    pub architecture: Option<String>,

    /// Library key; repeat for several.
    #[arg(
        short = 'l',
        long = "lib",
        value_name = "LIB",
        help = "Library to include (repeatable)"
    )]
    pub libs: Vec<String>,

    /// Add the example user domain, use case, handler, jobs and consumers.
    #[arg(short = 'e', long = "example", help = "Include the example application")]
    pub example: bool,

    /// Archive destination; defaults to `./<project>.zip`.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output archive path"
    )]
    pub output: Option<PathBuf>,

    /// Overwrite an existing archive.
    #[arg(long = "force", help = "Overwrite an existing archive")]
    pub force: bool,

    /// Plan without writing anything.
    #[arg(long = "dry-run", help = "Show what would be generated without generating")]
    pub dry_run: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `goforge list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON object.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `goforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `goforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `goforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `log.level`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from([
            "goforge",
            "generate",
            "--name",
            "demo-api",
            "--module",
            "example.com/demo-api",
            "--framework",
            "gin",
            "-l",
            "redis",
            "-l",
            "kafka",
            "--example",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.name, "demo-api");
        assert_eq!(args.framework.as_deref(), Some("gin"));
        assert_eq!(args.libs, vec!["redis", "kafka"]);
        assert!(args.example);
        assert!(!args.dry_run);
    }

    #[test]
    fn gen_alias() {
        let cli = Cli::parse_from(["goforge", "gen", "-n", "x", "-m", "example.com/x"]);
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "goforge",
            "list",
            "--manifest",
            "/srv/manifest.json",
            "-vv",
        ]);
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(
            cli.global.manifest.as_deref(),
            Some(std::path::Path::new("/srv/manifest.json"))
        );
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        // clap should reject --quiet --verbose together
        let result = Cli::try_parse_from(["goforge", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn name_and_module_are_required() {
        assert!(Cli::try_parse_from(["goforge", "generate", "--name", "x"]).is_err());
    }
}
