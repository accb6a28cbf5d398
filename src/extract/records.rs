//! Typed views over extracted records.

use serde::Serialize;

use super::Record;
use crate::normalize::{basename_key, Normalizer};

/// An application module from the registry. Unique by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRecord {
    /// Machine-readable identifier.
    pub slug: String,
    /// Human-readable name, when the registry pattern captures one.
    pub display_name: Option<String>,
}

impl ModuleRecord {
    /// Reads `slug` (or the first field) and `name` / `display_name`.
    #[must_use]
    pub fn from_record(record: &Record) -> Option<Self> {
        let slug = record.get("slug").or_else(|| record.first())?;
        let display_name = record.get("name").or_else(|| record.get("display_name"));
        Some(Self { slug: slug.to_string(), display_name: display_name.map(ToString::to_string) })
    }
}

/// A routed application path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRecord {
    /// Slug segment of the route.
    pub slug: String,
}

impl RouteRecord {
    /// Reads `slug` or the first field.
    #[must_use]
    pub fn from_record(record: &Record) -> Option<Self> {
        let slug = record.get("slug").or_else(|| record.first())?;
        Some(Self { slug: slug.to_string() })
    }
}

/// A navigation menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItemRecord {
    /// Display name shown in the menu.
    pub display_name: String,
}

impl MenuItemRecord {
    /// Reads `name` or the first field.
    #[must_use]
    pub fn from_record(record: &Record) -> Option<Self> {
        let name = record.get("name").or_else(|| record.first())?;
        Some(Self { display_name: name.to_string() })
    }
}

/// An implementation file, keyed by its normalized basename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Lower-cased, separator-stripped basename without extension.
    pub normalized_basename: String,
}

impl FileRecord {
    /// Derives the record from a directory entry name.
    #[must_use]
    pub fn from_file_name(file_name: &str, extension: &str, normalizer: &Normalizer) -> Self {
        Self { normalized_basename: basename_key(file_name, extension, normalizer) }
    }
}
