//! Error taxonomy for an audit run.
//!
//! Only conditions that abort a run live here. An extractor finding nothing
//! and a comparison finding drift are ordinary report outcomes.

use std::fmt;
use std::path::PathBuf;

/// Fatal errors raised while preparing or running an audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// A required text source or directory could not be read.
    InputUnavailable {
        /// The path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        reason: String,
    },
    /// A configured pattern could not be compiled or is malformed.
    InvalidPattern {
        /// Name of the pattern in the configuration.
        name: String,
        /// Why the pattern was rejected.
        reason: String,
    },
    /// The configuration file could not be read or parsed.
    Config(String),
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditError::InputUnavailable { path, reason } => {
                write!(f, "input unavailable: {}: {reason}", path.display())
            }
            AuditError::InvalidPattern { name, reason } => {
                write!(f, "invalid pattern '{name}': {reason}")
            }
            AuditError::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for AuditError {}
