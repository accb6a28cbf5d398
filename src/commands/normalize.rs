//! `navdrift normalize` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::normalize::Normalizer;

/// Execute the `normalize` command: one `value -> key` line per value.
///
/// Uses the configured normalizer unless `noise` is given.
///
/// # Errors
///
/// Returns an error string if the configuration cannot be loaded.
pub fn run(
    ctx: &ServiceContext,
    cwd: &Path,
    values: &[String],
    noise: Option<&str>,
) -> Result<(), String> {
    let normalizer = match noise {
        Some(noise) => Normalizer::new(noise),
        None => super::load_config(ctx, cwd, None)?.normalizer,
    };
    println!("{}", render(&normalizer, values));
    Ok(())
}

fn render(normalizer: &Normalizer, values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("{v} -> {}", normalizer.normalize(v)))
        .collect::<Vec<_>>()
        .join("\n")
}
