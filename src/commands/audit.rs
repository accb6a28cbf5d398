//! `navdrift audit` command.

use std::path::Path;

use crate::audit::{run_audit, AuditOptions, ComparisonKind};
use crate::cli::{Check, Format};
use crate::context::ServiceContext;
use crate::reconcile::RetryPolicy;
use crate::report::{format_reports, Report};

/// Arguments of the `audit` command.
#[derive(Debug, Clone)]
pub struct AuditArgs<'a> {
    /// Explicit configuration file.
    pub config: Option<&'a Path>,
    /// Comparisons to run; empty means all.
    pub only: &'a [Check],
    /// Output format.
    pub format: Format,
    /// Force the symmetric retry policy.
    pub symmetric: bool,
    /// Fail when drift is detected.
    pub strict: bool,
}

/// Execute the `audit` command and print the reports to stdout.
///
/// # Errors
///
/// Returns an error string when configuration or an input cannot be loaded,
/// or when `--strict` is set and drift was found.
pub fn run(ctx: &ServiceContext, cwd: &Path, args: &AuditArgs<'_>) -> Result<(), String> {
    let reports = collect(ctx, cwd, args)?;
    println!("{}", render(&reports, args.format)?);

    let drifted = reports.iter().filter(|r| r.has_drift()).count();
    if args.strict && drifted > 0 {
        return Err(format!(
            "drift detected in {drifted} comparison{}",
            if drifted == 1 { "" } else { "s" }
        ));
    }
    Ok(())
}

/// Load configuration and inputs and run every selected comparison.
///
/// # Errors
///
/// Returns an error string when configuration or an input cannot be loaded.
pub fn collect(ctx: &ServiceContext, cwd: &Path, args: &AuditArgs<'_>) -> Result<Vec<Report>, String> {
    let config = super::load_config(ctx, cwd, args.config)?;
    let options = AuditOptions {
        only: args.only.iter().copied().map(ComparisonKind::from).collect(),
        retry: args.symmetric.then_some(RetryPolicy::Symmetric),
    };
    run_audit(ctx, &config, &options).map_err(|e| e.to_string())
}

/// Render reports in the requested format.
///
/// # Errors
///
/// Returns an error string if JSON serialization fails.
pub fn render(reports: &[Report], format: Format) -> Result<String, String> {
    match format {
        Format::Text => Ok(format_reports(reports)),
        Format::Json => serde_json::to_string_pretty(reports)
            .map_err(|e| format!("failed to serialize reports: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryFileSystem;

    fn ctx() -> ServiceContext {
        let mut fs = InMemoryFileSystem::new();
        fs.add_file("/app/src/data/appModules.ts", "createModule('crm', 'CRM')\ncreateModule('fleet', 'Fleet')")
            .add_file("/app/src/App.tsx", "<Route path=\"/apps/crm\" />")
            .add_file("/app/navdrift.yaml", "inputs:\n  menu: null\n  files: null\n");
        ServiceContext::with_fs(Box::new(fs))
    }

    fn args(strict: bool) -> AuditArgs<'static> {
        AuditArgs { config: None, only: &[], format: Format::Text, symmetric: false, strict }
    }

    #[test]
    fn collect_runs_configured_comparisons() {
        let reports = collect(&ctx(), Path::new("/app"), &args(false)).unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].missing, vec!["fleet"]);
    }

    #[test]
    fn text_render_lists_drift_and_skips() {
        let reports = collect(&ctx(), Path::new("/app"), &args(false)).unwrap();
        let text = render(&reports, Format::Text).unwrap();
        assert!(text.contains("- fleet"));
        assert!(text.contains("Skipped: menu input not configured"));
    }

    #[test]
    fn json_render_is_an_array() {
        let reports = collect(&ctx(), Path::new("/app"), &args(false)).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render(&reports, Format::Json).unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 3);
        assert_eq!(json[0]["status"], "drift");
    }

    #[test]
    fn strict_mode_fails_on_drift() {
        let err = run(&ctx(), Path::new("/app"), &args(true)).unwrap_err();
        assert!(err.contains("drift detected in 1 comparison"));
        assert!(run(&ctx(), Path::new("/app"), &args(false)).is_ok());
    }

    #[test]
    fn missing_registry_is_reported() {
        let ctx = ServiceContext::with_fs(Box::new(InMemoryFileSystem::new()));
        let err = collect(&ctx, Path::new("/app"), &args(false)).unwrap_err();
        assert!(err.contains("input unavailable"));
        assert!(err.contains("appModules.ts"));
    }
}
