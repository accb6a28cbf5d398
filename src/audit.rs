//! The audit run: load every input, extract, reconcile, report.
//!
//! The three cross-checks (routes, implementation files, menu) share one
//! [`Comparison`] routine and differ only in the keys fed into it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::anomaly::{scan_lines, LineAnomaly};
use crate::config::AuditConfig;
use crate::context::ServiceContext;
use crate::error::AuditError;
use crate::extract::{CompiledPattern, FileRecord, MenuItemRecord, ModuleRecord, RouteRecord};
use crate::normalize::{strip_extension, Normalizer};
use crate::reconcile::{duplicates, reconcile, RetryPolicy};
use crate::report::{build_report, Report, ReportLabels};

/// One of the cross-checks against the module registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    /// Module slugs against routed slugs.
    Routes,
    /// Module slugs against implementation file names.
    Files,
    /// Module display names against menu items.
    Menu,
}

impl ComparisonKind {
    /// Every comparison, in report order.
    pub const ALL: [ComparisonKind; 3] =
        [ComparisonKind::Routes, ComparisonKind::Files, ComparisonKind::Menu];

    /// Labels used in the report of this comparison.
    #[must_use]
    pub fn labels(self) -> ReportLabels {
        match self {
            ComparisonKind::Routes => ReportLabels::new("routes vs modules", "modules", "routes"),
            ComparisonKind::Files => ReportLabels::new("files vs modules", "modules", "files"),
            ComparisonKind::Menu => ReportLabels::new("menu vs modules", "modules", "menu"),
        }
    }
}

/// Per-run switches layered over the configuration.
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    /// Comparisons to run; empty means all.
    pub only: Vec<ComparisonKind>,
    /// Overrides the configured retry policy.
    pub retry: Option<RetryPolicy>,
}

impl AuditOptions {
    fn wants(&self, kind: ComparisonKind) -> bool {
        self.only.is_empty() || self.only.contains(&kind)
    }
}

/// Builder for one source-vs-target comparison.
#[derive(Debug, Clone)]
pub struct Comparison {
    labels: ReportLabels,
    source: Vec<String>,
    source_labels: Option<Vec<String>>,
    target: Vec<String>,
    normalizer: Normalizer,
    retry: RetryPolicy,
    anomalies: Vec<LineAnomaly>,
}

impl Comparison {
    /// Starts a comparison with empty key sets and default normalization.
    #[must_use]
    pub fn new(labels: ReportLabels) -> Self {
        Self {
            labels,
            source: Vec::new(),
            source_labels: None,
            target: Vec::new(),
            normalizer: Normalizer::default(),
            retry: RetryPolicy::default(),
            anomalies: Vec::new(),
        }
    }

    /// Sets the source-of-truth keys.
    #[must_use]
    pub fn source(mut self, keys: Vec<String>) -> Self {
        self.source = keys;
        self
    }

    /// Sets source keys that are compared under one form and reported under
    /// another, as `(key, label)` pairs.
    #[must_use]
    pub fn labelled_source(mut self, pairs: Vec<(String, String)>) -> Self {
        let (keys, labels): (Vec<String>, Vec<String>) = pairs.into_iter().unzip();
        self.source = keys;
        self.source_labels = Some(labels);
        self
    }

    /// Sets the compared keys.
    #[must_use]
    pub fn target(mut self, keys: Vec<String>) -> Self {
        self.target = keys;
        self
    }

    /// Sets the normalizer used by the second pass.
    #[must_use]
    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Attaches line anomalies found in the target text.
    #[must_use]
    pub fn anomalies(mut self, anomalies: Vec<LineAnomaly>) -> Self {
        self.anomalies = anomalies;
        self
    }

    /// Reconciles and builds the report. Duplicate source keys are surfaced.
    #[must_use]
    pub fn run(self) -> Report {
        let result = reconcile(&self.source, &self.target, &self.normalizer, self.retry);
        let dups = duplicates(self.source_labels.as_deref().unwrap_or(&self.source));
        if !dups.is_empty() {
            warn!(comparison = %self.labels.comparison, ?dups, "duplicate source keys");
        }
        info!(
            comparison = %self.labels.comparison,
            source = result.total_source,
            target = result.total_target,
            missing = result.missing_in_target.len(),
            residual_extra = result.residual_extra.len(),
            "comparison finished"
        );
        let report =
            build_report(&result, &self.labels).with_anomalies(self.anomalies).with_duplicates(dups);
        match &self.source_labels {
            Some(labels) => relabel_source(report, &self.source, labels, &self.target),
            None => report,
        }
    }
}

/// Swaps source keys in `report` for their labels. Missing keys are mapped
/// positionally so two labels sharing one key both stay visible.
fn relabel_source(mut report: Report, keys: &[String], labels: &[String], target: &[String]) -> Report {
    let label_of = |key: &str| {
        keys.iter().position(|k| k == key).map_or_else(|| key.to_string(), |i| labels[i].clone())
    };
    report.missing = keys
        .iter()
        .zip(labels)
        .filter(|(k, _)| !target.contains(k))
        .map(|(_, label)| label.clone())
        .collect();
    if let Some(residual) = report.residual_missing.as_mut() {
        for key in residual.iter_mut() {
            *key = label_of(key);
        }
    }
    for (_, source) in &mut report.normalized_matches {
        *source = label_of(source);
    }
    report
}

/// Raw contents of every configured input, read before any extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditInputs {
    /// Module registry text.
    pub module_registry: String,
    /// Router configuration text, when configured.
    pub routes: Option<String>,
    /// Menu text, when configured.
    pub menu: Option<String>,
    /// Implementation file names, when configured.
    pub files: Option<Vec<String>>,
}

/// Reads every input the selected comparisons need.
///
/// # Errors
///
/// Returns [`AuditError::InputUnavailable`] on the first source that cannot
/// be read; nothing is extracted in that case.
pub fn load_inputs(
    ctx: &ServiceContext,
    config: &AuditConfig,
    options: &AuditOptions,
) -> Result<AuditInputs, AuditError> {
    let read = |path: &Path| -> Result<String, AuditError> {
        let full = config.resolve(path);
        let text = ctx.fs.read_to_string(&full).map_err(|e| unavailable(&full, &*e))?;
        debug!(path = %full.display(), bytes = text.len(), "read input");
        Ok(text)
    };
    let inputs = &config.inputs;

    let module_registry = read(inputs.module_registry.as_path())?;
    let routes = optional(options.wants(ComparisonKind::Routes), inputs.routes.as_deref())
        .map(read)
        .transpose()?;
    let menu =
        optional(options.wants(ComparisonKind::Menu), inputs.menu.as_deref()).map(read).transpose()?;
    let files = optional(options.wants(ComparisonKind::Files), inputs.files.as_deref())
        .map(|dir| {
            let full = config.resolve(dir);
            let names = ctx.fs.list_dir(&full).map_err(|e| unavailable(&full, &*e))?;
            debug!(path = %full.display(), entries = names.len(), "listed files");
            Ok::<_, AuditError>(names)
        })
        .transpose()?;

    Ok(AuditInputs { module_registry, routes, menu, files })
}

fn optional(wanted: bool, path: Option<&Path>) -> Option<&Path> {
    path.filter(|_| wanted)
}

fn unavailable(path: &Path, err: &(dyn std::error::Error + Send + Sync)) -> AuditError {
    AuditError::InputUnavailable { path: PathBuf::from(path), reason: err.to_string() }
}

/// Compiled extraction patterns of a configuration.
#[derive(Debug, Clone)]
pub struct AuditPatterns {
    module_registry: CompiledPattern,
    route: CompiledPattern,
    menu_item: CompiledPattern,
}

impl AuditPatterns {
    /// Compiles every configured pattern.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidPattern`] for the first bad pattern.
    pub fn compile(config: &AuditConfig) -> Result<Self, AuditError> {
        let p = &config.patterns;
        Ok(Self {
            module_registry: p.module_registry.compile("module_registry")?,
            route: p.route.compile("route")?,
            menu_item: p.menu_item.compile("menu_item")?,
        })
    }
}

/// Runs the audit against already-loaded inputs. Pure: no I/O.
#[must_use]
pub fn audit_inputs(
    inputs: &AuditInputs,
    patterns: &AuditPatterns,
    config: &AuditConfig,
    options: &AuditOptions,
) -> Vec<Report> {
    let retry = options.retry.unwrap_or(config.retry);
    let modules: Vec<ModuleRecord> = patterns
        .module_registry
        .extract(&inputs.module_registry)
        .iter()
        .filter_map(ModuleRecord::from_record)
        .collect();
    let slugs: Vec<String> = modules.iter().map(|m| m.slug.clone()).collect();

    let mut reports = Vec::new();
    for kind in ComparisonKind::ALL {
        if !options.wants(kind) {
            continue;
        }
        let labels = kind.labels();
        let report = match kind {
            ComparisonKind::Routes => match &inputs.routes {
                Some(text) => {
                    let routes: Vec<String> = patterns
                        .route
                        .extract(text)
                        .iter()
                        .filter_map(RouteRecord::from_record)
                        .map(|r| r.slug)
                        .filter(|slug| !config.route_exclude.contains(slug))
                        .collect();
                    Comparison::new(labels)
                        .source(slugs.clone())
                        .target(routes)
                        .normalizer(config.normalizer.clone())
                        .retry(retry)
                        .anomalies(scan_lines(text, &patterns.route.spec().boundary))
                        .run()
                }
                None => skipped(labels, "routes input not configured"),
            },
            ComparisonKind::Files => match &inputs.files {
                Some(names) => {
                    let listing = &config.files;
                    let files: Vec<String> = names
                        .iter()
                        .filter(|n| strip_extension(n, &listing.extension).is_some())
                        .map(|n| {
                            FileRecord::from_file_name(n, &listing.extension, &listing.normalizer)
                                .normalized_basename
                        })
                        .collect();
                    let keyed: Vec<(String, String)> =
                        slugs.iter().map(|s| (listing.normalizer.normalize(s), s.clone())).collect();
                    Comparison::new(labels)
                        .labelled_source(keyed)
                        .target(files)
                        .normalizer(config.normalizer.clone())
                        .retry(retry)
                        .run()
                }
                None => skipped(labels, "files input not configured"),
            },
            ComparisonKind::Menu => match &inputs.menu {
                Some(_) if !modules.is_empty() && modules.iter().all(|m| m.display_name.is_none()) => {
                    skipped(labels, "module registry pattern captures no display names")
                }
                Some(text) => {
                    let names: Vec<String> =
                        modules.iter().filter_map(|m| m.display_name.clone()).collect();
                    let items: Vec<String> = patterns
                        .menu_item
                        .extract(text)
                        .iter()
                        .filter_map(MenuItemRecord::from_record)
                        .map(|m| m.display_name)
                        .collect();
                    Comparison::new(labels)
                        .source(names)
                        .target(items)
                        .normalizer(config.normalizer.clone())
                        .retry(retry)
                        .run()
                }
                None => skipped(labels, "menu input not configured"),
            },
        };
        reports.push(report);
    }
    reports
}

/// Compiles patterns, loads every input, then audits.
///
/// # Errors
///
/// Fails fast on an invalid pattern or an unreadable input; no partial
/// reports are produced.
pub fn run_audit(
    ctx: &ServiceContext,
    config: &AuditConfig,
    options: &AuditOptions,
) -> Result<Vec<Report>, AuditError> {
    let patterns = AuditPatterns::compile(config)?;
    let inputs = load_inputs(ctx, config, options)?;
    Ok(audit_inputs(&inputs, &patterns, config, options))
}

fn skipped(labels: ReportLabels, reason: &str) -> Report {
    info!(comparison = %labels.comparison, reason, "comparison skipped");
    Report::skipped(labels, reason)
}
