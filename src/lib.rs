//! Core library entry for the `navdrift` CLI.
//!
//! `navdrift` cross-references a web application's module registry with its
//! router configuration, navigation menu and implementation files, and reports
//! drift between them.

pub mod adapters;
pub mod anomaly;
pub mod audit;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod ports;
pub mod reconcile;
pub mod report;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return err.print().map_err(|e| e.to_string());
        }
        Err(err) => return Err(err.to_string()),
    };
    init_tracing(cli.verbose);
    commands::dispatch(&cli.command)
}

/// Install the stderr log subscriber; `RUST_LOG` wins over `verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    // A subscriber may already be installed when `run` is called repeatedly.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_executes_normalize() {
        let result = run(["navdrift", "normalize", "POS Shop", "--noise", " "]);
        assert!(result.is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["navdrift", "unknown"]);
        assert!(result.is_err());
    }
}
