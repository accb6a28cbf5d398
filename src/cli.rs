//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::audit::ComparisonKind;

/// Top-level CLI parser for `navdrift`.
#[derive(Debug, Parser)]
#[command(name = "navdrift", version, about = "Audit routes, menus and app files for drift")]
pub struct Cli {
    /// Log debug detail to stderr (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cross-check the module registry against routes, files and menu.
    Audit {
        /// Configuration file (defaults to `navdrift.yaml` when present).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Run only the named comparison; repeatable.
        #[arg(long, value_enum)]
        only: Vec<Check>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Retry missing keys through the normalizer as well as extra keys.
        #[arg(long)]
        symmetric: bool,
        /// Exit with a failure status when drift is detected.
        #[arg(long)]
        strict: bool,
    },
    /// Print the normalized comparison key of each value.
    Normalize {
        /// Values to normalize.
        #[arg(required = true)]
        values: Vec<String>,
        /// Noise characters to strip instead of the configured set.
        #[arg(long)]
        noise: Option<String>,
    },
    /// Print the effective configuration as YAML.
    Config {
        /// Configuration file (defaults to `navdrift.yaml` when present).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Comparison selector for `--only`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Check {
    /// Routes vs modules.
    Routes,
    /// Implementation files vs modules.
    Files,
    /// Menu vs modules.
    Menu,
}

impl From<Check> for ComparisonKind {
    fn from(check: Check) -> Self {
        match check {
            Check::Routes => ComparisonKind::Routes,
            Check::Files => ComparisonKind::Files,
            Check::Menu => ComparisonKind::Menu,
        }
    }
}

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable text.
    Text,
    /// JSON array of reports.
    Json,
}
