//! Command dispatch and handlers.

pub mod audit;
pub mod config;
pub mod normalize;

use std::env;
use std::path::{Path, PathBuf};

use crate::cli::Command;
use crate::config::{AuditConfig, ROOT_ENV};
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let ctx = ServiceContext::live();
    let cwd = env::current_dir().map_err(|e| format!("failed to get current directory: {e}"))?;

    match command {
        Command::Audit { config, only, format, symmetric, strict } => {
            let args = audit::AuditArgs {
                config: config.as_deref(),
                only,
                format: *format,
                symmetric: *symmetric,
                strict: *strict,
            };
            audit::run(&ctx, &cwd, &args)
        }
        Command::Normalize { values, noise } => normalize::run(&ctx, &cwd, values, noise.as_deref()),
        Command::Config { config: path } => config::run(&ctx, &cwd, path.as_deref()),
    }
}

/// Load the configuration, honouring `NAVDRIFT_ROOT`.
fn load_config(ctx: &ServiceContext, cwd: &Path, path: Option<&Path>) -> Result<AuditConfig, String> {
    let root_override = env::var_os(ROOT_ENV).filter(|v| !v.is_empty()).map(PathBuf::from);
    AuditConfig::load(ctx, path, cwd, root_override).map_err(|e| e.to_string())
}
