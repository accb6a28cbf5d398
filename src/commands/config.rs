//! `navdrift config` command.

use std::path::Path;

use crate::context::ServiceContext;

/// Execute the `config` command: print the effective configuration.
///
/// # Errors
///
/// Returns an error string if the configuration cannot be loaded or
/// serialized.
pub fn run(ctx: &ServiceContext, cwd: &Path, path: Option<&Path>) -> Result<(), String> {
    let config = super::load_config(ctx, cwd, path)?;
    print!("{}", config.to_yaml().map_err(|e| e.to_string())?);
    Ok(())
}
