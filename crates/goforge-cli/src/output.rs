//! Output management and formatting.

use std::{
    io::{self, IsTerminal},
    time::Duration,
};

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet and JSON modes.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.suppressed() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.suppressed() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.suppressed() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.suppressed() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.suppressed() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty JSON document; always written, even in quiet mode.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    /// Raw line for machine consumers (`list --format list|csv`).
    pub fn raw(&self, line: &str) -> io::Result<()> {
        self.term.write_line(line)
    }

    /// Spinner on stderr while `msg` runs; hidden unless interactive.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.suppressed() || self.resolved_format != OutputFormat::Human || !io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        let template = if self.supports_color() {
            "{spinner:.cyan} {msg}"
        } else {
            "{spinner} {msg}"
        };
        if let Ok(style) = ProgressStyle::with_template(template) {
            bar.set_style(style);
        }
        bar.set_message(msg.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    fn suppressed(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
