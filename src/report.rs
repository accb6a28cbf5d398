//! Human-readable findings for each comparison.
//!
//! Every comparison produces a report, including comparisons that found
//! nothing to check or were not configured, so that a quiet run can never be
//! mistaken for a check that did not happen.

use serde::Serialize;

use crate::anomaly::LineAnomaly;
use crate::reconcile::ReconciliationResult;

/// Names used when rendering one comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLabels {
    /// Comparison title, e.g. `routes vs modules`.
    pub comparison: String,
    /// Name of the source of truth.
    pub source: String,
    /// Name of the compared collection.
    pub target: String,
}

impl ReportLabels {
    /// Creates labels from string slices.
    #[must_use]
    pub fn new(comparison: &str, source: &str, target: &str) -> Self {
        Self {
            comparison: comparison.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// Overall outcome of one comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportStatus {
    /// Source and target agree exactly.
    Consistent,
    /// Every exact mismatch was absorbed by normalization.
    ConsistentAfterNormalization,
    /// At least one finding is true drift.
    Drift,
    /// The comparison was not run.
    Skipped {
        /// Why the comparison was not run.
        reason: String,
    },
}

/// Findings for one comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Labels used for rendering.
    pub labels: ReportLabels,
    /// Overall outcome.
    #[serde(flatten)]
    pub status: ReportStatus,
    /// Number of source records.
    pub total_source: usize,
    /// Number of target records.
    pub total_target: usize,
    /// Source keys missing from the target.
    pub missing: Vec<String>,
    /// Target keys missing from the source, even after normalization.
    pub extra: Vec<String>,
    /// `(target, source)` pairs matched only after normalization.
    pub normalized_matches: Vec<(String, String)>,
    /// Extra keys left after normalization.
    pub residual_extra: Vec<String>,
    /// Missing keys left after a symmetric normalized retry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual_missing: Option<Vec<String>>,
    /// Lines holding more than one record boundary.
    pub anomalous_lines: Vec<LineAnomaly>,
    /// Source keys that appear more than once.
    pub duplicate_keys: Vec<String>,
}

impl Report {
    /// A report for a comparison that was not run.
    #[must_use]
    pub fn skipped(labels: ReportLabels, reason: &str) -> Self {
        Self {
            labels,
            status: ReportStatus::Skipped { reason: reason.to_string() },
            total_source: 0,
            total_target: 0,
            missing: Vec::new(),
            extra: Vec::new(),
            normalized_matches: Vec::new(),
            residual_extra: Vec::new(),
            residual_missing: None,
            anomalous_lines: Vec::new(),
            duplicate_keys: Vec::new(),
        }
    }

    /// Attaches line anomalies found in the target text.
    #[must_use]
    pub fn with_anomalies(mut self, anomalies: Vec<LineAnomaly>) -> Self {
        self.anomalous_lines = anomalies;
        self.refresh_status();
        self
    }

    /// Attaches duplicated source keys.
    #[must_use]
    pub fn with_duplicates(mut self, duplicates: Vec<String>) -> Self {
        self.duplicate_keys = duplicates;
        self.refresh_status();
        self
    }

    /// Returns `true` when the report carries true drift.
    #[must_use]
    pub fn has_drift(&self) -> bool {
        self.status == ReportStatus::Drift
    }

    fn effective_missing(&self) -> &[String] {
        self.residual_missing.as_deref().unwrap_or(&self.missing)
    }

    fn refresh_status(&mut self) {
        if matches!(self.status, ReportStatus::Skipped { .. }) {
            return;
        }
        self.status = if !self.effective_missing().is_empty()
            || !self.residual_extra.is_empty()
            || !self.anomalous_lines.is_empty()
            || !self.duplicate_keys.is_empty()
        {
            ReportStatus::Drift
        } else if self.missing.is_empty() && self.normalized_matches.is_empty() {
            ReportStatus::Consistent
        } else {
            ReportStatus::ConsistentAfterNormalization
        };
    }
}

/// Builds the report for one reconciliation.
#[must_use]
pub fn build_report<K: AsRef<str>>(result: &ReconciliationResult<K>, labels: &ReportLabels) -> Report {
    let mut report = Report {
        labels: labels.clone(),
        status: ReportStatus::Consistent,
        total_source: result.total_source,
        total_target: result.total_target,
        missing: owned(&result.missing_in_target),
        extra: owned(&result.extra_in_target),
        normalized_matches: result
            .normalized_matches
            .iter()
            .map(|m| (m.target.as_ref().to_string(), m.source.as_ref().to_string()))
            .collect(),
        residual_extra: owned(&result.residual_extra),
        residual_missing: result.residual_missing.as_deref().map(owned::<K>),
        anomalous_lines: Vec::new(),
        duplicate_keys: Vec::new(),
    };
    report.refresh_status();
    report
}

/// Renders one report as text.
#[must_use]
pub fn format_report(report: &Report) -> String {
    let labels = &report.labels;
    let mut lines = vec![format!("== {} ==", labels.comparison)];

    if let ReportStatus::Skipped { reason } = &report.status {
        lines.push(format!("  Skipped: {reason}"));
        return lines.join("\n");
    }

    lines.push(count_line(&labels.source, report.total_source));
    lines.push(count_line(&labels.target, report.total_target));

    push_list(&mut lines, &format!("Missing in {}", labels.target), "-", &report.missing);
    push_list(&mut lines, &format!("Extra in {}", labels.target), "+", &report.extra);
    if !report.normalized_matches.is_empty() {
        lines.push(format!("  Matched after normalization ({}):", report.normalized_matches.len()));
        for (target, source) in &report.normalized_matches {
            lines.push(format!("    ~ {target} -> {source}"));
        }
    }
    if let Some(residual) = &report.residual_missing {
        if !report.missing.is_empty() {
            let title = format!("Still missing in {} after normalization", labels.target);
            if residual.is_empty() {
                lines.push(format!("  {title}: none"));
            } else {
                push_list(&mut lines, &title, "-", residual);
            }
        }
    }
    if !report.anomalous_lines.is_empty() {
        lines.push(format!(
            "  Lines with multiple entries in {} ({}):",
            labels.target,
            report.anomalous_lines.len()
        ));
        for a in &report.anomalous_lines {
            lines.push(format!("    line {} ({}x): {}", a.line_number, a.count, a.text));
        }
    }
    push_list(
        &mut lines,
        &format!("Duplicate keys in {}", labels.source),
        "!",
        &report.duplicate_keys,
    );

    lines.push(match &report.status {
        ReportStatus::Consistent => {
            format!("  Result: all {} are consistent with {}.", labels.source, labels.target)
        }
        ReportStatus::ConsistentAfterNormalization => format!(
            "  Result: all {} are consistent with {} after normalization.",
            labels.source, labels.target
        ),
        ReportStatus::Drift => "  Result: drift detected.".to_string(),
        ReportStatus::Skipped { reason } => format!("  Skipped: {reason}"),
    });

    lines.join("\n")
}

/// Renders several reports, one block each, in order.
#[must_use]
pub fn format_reports(reports: &[Report]) -> String {
    reports.iter().map(format_report).collect::<Vec<_>>().join("\n\n")
}

fn owned<K: AsRef<str>>(keys: &[K]) -> Vec<String> {
    keys.iter().map(|k| k.as_ref().to_string()).collect()
}

fn count_line(label: &str, count: usize) -> String {
    if count == 0 {
        format!("  {label}: 0 records found (no matches)")
    } else {
        format!("  {label}: {count}")
    }
}

fn push_list(lines: &mut Vec<String>, title: &str, marker: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("  {title} ({}):", items.len()));
    for item in items {
        lines.push(format!("    {marker} {item}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;
    use crate::reconcile::{reconcile, RetryPolicy};

    fn labels() -> ReportLabels {
        ReportLabels::new("routes vs modules", "modules", "routes")
    }

    fn report_for(source: &[&str], target: &[&str], policy: RetryPolicy) -> Report {
        let r = reconcile(source, target, &Normalizer::default(), policy);
        build_report(&r, &labels())
    }

    #[test]
    fn consistent_report_affirms_explicitly() {
        let report = report_for(&["a", "b"], &["a", "b"], RetryPolicy::ExtraOnly);
        assert_eq!(report.status, ReportStatus::Consistent);
        let text = format_report(&report);
        assert!(text.contains("== routes vs modules =="));
        assert!(text.contains("modules: 2"));
        assert!(text.contains("routes: 2"));
        assert!(text.contains("all modules are consistent with routes"));
    }

    #[test]
    fn drift_report_lists_offending_keys() {
        let report = report_for(&["accounting", "invoicing"], &["accounting"], RetryPolicy::ExtraOnly);
        assert!(report.has_drift());
        assert_eq!(report.missing, vec!["invoicing"]);
        let text = format_report(&report);
        assert!(text.contains("Missing in routes (1):"));
        assert!(text.contains("- invoicing"));
        assert!(text.contains("Result: drift detected."));
    }

    #[test]
    fn zero_source_records_are_stated() {
        let report = report_for(&[], &[], RetryPolicy::ExtraOnly);
        assert_eq!(report.total_source, 0);
        let text = format_report(&report);
        assert!(text.contains("modules: 0 records found"));
        assert!(text.contains("routes: 0 records found"));
    }

    #[test]
    fn normalized_matches_are_rendered() {
        let report = report_for(&["POS Shop"], &["POS-Shop"], RetryPolicy::Symmetric);
        assert_eq!(report.status, ReportStatus::ConsistentAfterNormalization);
        let text = format_report(&report);
        assert!(text.contains("~ POS-Shop -> POS Shop"));
        assert!(!text.contains("Extra in routes"));
        assert!(text.contains("Still missing in routes after normalization: none"));
        assert!(text.contains("consistent with routes after normalization"));
    }

    #[test]
    fn extra_block_lists_only_unabsorbed_keys() {
        let report = report_for(&["POS Shop"], &["POS-Shop", "Helpdesk"], RetryPolicy::Symmetric);
        assert_eq!(report.extra, vec!["Helpdesk"]);
        let text = format_report(&report);
        assert!(text.contains("Extra in routes (1):"));
        assert!(text.contains("+ Helpdesk"));
        assert!(!text.contains("+ POS-Shop"));
    }

    #[test]
    fn asymmetric_policy_keeps_exact_miss_as_drift() {
        let report = report_for(&["POS Shop"], &["POS-Shop"], RetryPolicy::ExtraOnly);
        assert!(report.has_drift());
        assert!(report.extra.is_empty());
        assert!(report.residual_extra.is_empty());
    }

    #[test]
    fn anomalies_turn_consistent_report_into_drift() {
        let anomaly = LineAnomaly { line_number: 7, count: 2, text: "<Route/><Route/>".into() };
        let report =
            report_for(&["a"], &["a"], RetryPolicy::ExtraOnly).with_anomalies(vec![anomaly]);
        assert!(report.has_drift());
        let text = format_report(&report);
        assert!(text.contains("line 7 (2x): <Route/><Route/>"));
    }

    #[test]
    fn duplicates_are_listed_under_source() {
        let report = report_for(&["a", "a"], &["a"], RetryPolicy::ExtraOnly)
            .with_duplicates(vec!["a".to_string()]);
        assert!(report.has_drift());
        assert!(format_report(&report).contains("Duplicate keys in modules (1):"));
    }

    #[test]
    fn skipped_report_is_never_silent() {
        let report = Report::skipped(labels(), "routes input not configured")
            .with_anomalies(Vec::new());
        assert!(!report.has_drift());
        let text = format_report(&report);
        assert!(text.contains("Skipped: routes input not configured"));
    }

    #[test]
    fn reports_are_concatenated_in_order() {
        let a = report_for(&["a"], &["a"], RetryPolicy::ExtraOnly);
        let b = Report::skipped(ReportLabels::new("menu vs modules", "modules", "menu"), "off");
        let text = format_reports(&[a, b]);
        let first = text.find("routes vs modules").unwrap();
        let second = text.find("menu vs modules").unwrap();
        assert!(first < second);
    }

    #[test]
    fn report_serializes_to_json() {
        let report = report_for(&["a"], &["b"], RetryPolicy::ExtraOnly);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "drift");
        assert_eq!(json["missing"][0], "a");
        assert_eq!(json["residual_extra"][0], "b");
        assert!(json.get("residual_missing").is_none());
    }
}
