//! Declarative pattern extraction.
//!
//! A [`PatternSpec`] describes how records appear in a text source: the
//! boundary token, a capture expression, the ordered field names, and whether
//! each match is one record or a delimited block of records. Extraction is
//! best-effort: unmatched text is skipped and an empty result is valid.

pub mod records;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuditError;

pub use records::{FileRecord, MenuItemRecord, ModuleRecord, RouteRecord};

/// How a single match is turned into records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Capture {
    /// Each match is one record; capture group N fills field N.
    #[default]
    Inline,
    /// The first capture group is a delimited list; each item is one record.
    Block {
        /// Item separator inside the block.
        separator: String,
        /// Characters trimmed from both ends of every item, after whitespace.
        #[serde(default)]
        trim: String,
    },
}

/// Declarative description of records inside a text source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Literal token that opens a record; also drives the line anomaly scan.
    pub boundary: String,
    /// Capture expression in `regex` syntax.
    pub regex: String,
    /// Ordered field names, one per capture group.
    pub fields: Vec<String>,
    /// Inline or block capture.
    #[serde(default)]
    pub capture: Capture,
}

impl PatternSpec {
    /// Creates an inline pattern.
    #[must_use]
    pub fn inline(boundary: &str, regex: &str, fields: &[&str]) -> Self {
        Self {
            boundary: boundary.to_string(),
            regex: regex.to_string(),
            fields: fields.iter().map(ToString::to_string).collect(),
            capture: Capture::Inline,
        }
    }

    /// Creates a block pattern whose single field is filled by list items.
    #[must_use]
    pub fn block(boundary: &str, regex: &str, field: &str, separator: &str, trim: &str) -> Self {
        Self {
            boundary: boundary.to_string(),
            regex: regex.to_string(),
            fields: vec![field.to_string()],
            capture: Capture::Block { separator: separator.to_string(), trim: trim.to_string() },
        }
    }

    /// Compiles the capture expression and checks it against the field list.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidPattern`] when the regex does not compile,
    /// the field list is empty, the regex has fewer capture groups than the
    /// capture mode needs, or a block separator is empty.
    pub fn compile(&self, name: &str) -> Result<CompiledPattern, AuditError> {
        let invalid =
            |reason: String| AuditError::InvalidPattern { name: name.to_string(), reason };

        if self.fields.is_empty() {
            return Err(invalid("no fields declared".to_string()));
        }
        let regex = Regex::new(&self.regex).map_err(|e| invalid(e.to_string()))?;
        let groups = regex.captures_len() - 1;

        match &self.capture {
            Capture::Inline if groups < self.fields.len() => {
                return Err(invalid(format!(
                    "{} field(s) declared but the regex has {groups} capture group(s)",
                    self.fields.len()
                )));
            }
            Capture::Block { separator, .. } => {
                if groups < 1 {
                    return Err(invalid("block capture needs one capture group".to_string()));
                }
                if separator.is_empty() {
                    return Err(invalid("block separator is empty".to_string()));
                }
            }
            Capture::Inline => {}
        }

        Ok(CompiledPattern { name: name.to_string(), spec: self.clone(), regex })
    }
}

/// One extracted record: named field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Builds a record from `(name, value)` pairs.
    #[must_use]
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Value of the named field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Value of the first declared field.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.fields.first().map(|(_, v)| v.as_str())
    }
}

/// A [`PatternSpec`] with its regex compiled.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    name: String,
    spec: PatternSpec,
    regex: Regex,
}

impl CompiledPattern {
    /// The source declaration.
    #[must_use]
    pub fn spec(&self) -> &PatternSpec {
        &self.spec
    }

    /// Extracts records from `text`; see [`extract`].
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<Record> {
        extract(text, self)
    }
}

/// Extracts records from `text` in first-occurrence order.
///
/// Nothing is deduplicated. Block patterns matching several times are
/// flattened into one sequence, keeping cross-block order. Empty block items
/// (a trailing separator) are skipped.
#[must_use]
pub fn extract(text: &str, pattern: &CompiledPattern) -> Vec<Record> {
    let spec = &pattern.spec;
    let mut records = Vec::new();

    for caps in pattern.regex.captures_iter(text) {
        match &spec.capture {
            Capture::Inline => {
                let values: Option<Vec<(String, String)>> = spec
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(i, field)| caps.get(i + 1).map(|m| (field.clone(), m.as_str().to_string())))
                    .collect();
                // Groups that did not participate make the match unusable.
                let Some(values) = values else { continue };
                records.push(Record::new(values));
            }
            Capture::Block { separator, trim } => {
                let Some(block) = caps.get(1) else { continue };
                let trim_chars: Vec<char> = trim.chars().collect();
                for item in block.as_str().split(separator.as_str()) {
                    let value = item.trim().trim_matches(trim_chars.as_slice()).trim();
                    if !value.is_empty() {
                        records.push(Record::new(vec![(spec.fields[0].clone(), value.to_string())]));
                    }
                }
            }
        }
    }

    debug!(pattern = %pattern.name, records = records.len(), "extracted records");
    records
}
