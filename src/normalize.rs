//! Canonical comparison keys for slugs, display names and file basenames.
//!
//! Normalization absorbs superficial formatting differences such as
//! `"POS Shop"` vs `"POS-Shop"` or `"spreadsheet-bi"` vs `"Spreadsheetbi"`.

use serde::{Deserialize, Serialize};

/// Noise characters removed by the default normalizer.
pub const DEFAULT_NOISE: &str = " -()";

/// Maps strings to a lower-cased key with noise characters removed.
///
/// The transformation is pure and idempotent:
/// `normalize(normalize(x)) == normalize(x)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Normalizer {
    noise: Vec<char>,
}

impl Normalizer {
    /// Creates a normalizer that strips every character of `noise`.
    ///
    /// A noise character is stored lower-cased when it lower-cases to a single
    /// character, and as given otherwise.
    #[must_use]
    pub fn new(noise: &str) -> Self {
        let mut chars: Vec<char> = noise.chars().map(lower_single).collect();
        chars.sort_unstable();
        chars.dedup();
        Self { noise: chars }
    }

    /// Returns the canonical comparison key for `input`.
    #[must_use]
    pub fn normalize(&self, input: &str) -> String {
        input.to_lowercase().chars().filter(|c| !self.noise.contains(c)).collect()
    }

    /// The noise characters, as configured.
    #[must_use]
    pub fn noise(&self) -> String {
        self.noise.iter().collect()
    }
}

fn lower_single(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE)
    }
}

impl From<String> for Normalizer {
    fn from(noise: String) -> Self {
        Self::new(&noise)
    }
}

impl From<Normalizer> for String {
    fn from(normalizer: Normalizer) -> Self {
        normalizer.noise()
    }
}

/// Normalizes with the default noise set (space, hyphen, parentheses).
#[must_use]
pub fn normalize(input: &str) -> String {
    Normalizer::default().normalize(input)
}

/// Returns the stem of `file_name` when it ends with `extension`, compared
/// case-insensitively. The stem must be non-empty. An empty extension
/// accepts every name unchanged.
#[must_use]
pub fn strip_extension<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    if extension.is_empty() {
        return Some(file_name);
    }
    let cut = file_name.len().checked_sub(extension.len()).filter(|&cut| cut > 0)?;
    let suffix = file_name.get(cut..)?;
    suffix.eq_ignore_ascii_case(extension).then_some(&file_name[..cut])
}

/// Derives the comparison key of an implementation file name.
///
/// Strips `extension` when present (case-insensitively), then applies
/// `normalizer`. `"Spreadsheet-BI.tsx"` becomes `"spreadsheetbi"`.
#[must_use]
pub fn basename_key(file_name: &str, extension: &str, normalizer: &Normalizer) -> String {
    normalizer.normalize(strip_extension(file_name, extension).unwrap_or(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_default_noise() {
        assert_eq!(normalize("POS Shop"), "posshop");
        assert_eq!(normalize("POS-Shop"), "posshop");
        assert_eq!(normalize("Spreadsheet (BI)"), "spreadsheetbi");
        assert_eq!(normalize("spreadsheet-bi"), "spreadsheetbi");
    }

    #[test]
    fn leaves_other_content_untouched() {
        assert_eq!(normalize("e_learning.v2"), "e_learning.v2");
        assert_eq!(normalize("IoT"), "iot");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "",
            "   ",
            "POS Shop",
            "Spreadsheet (BI)",
            "--a--",
            "ΑΣ-Β",
            "İstanbul",
            "Straße",
            "e-Learning (Beta)",
            "ÅNGSTRÖM-Ω",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn custom_noise_set() {
        let n = Normalizer::new("_.");
        assert_eq!(n.normalize("Field_Service.v1"), "fieldservicev1");
        assert_eq!(n.normalize("POS Shop"), "pos shop");
    }

    #[test]
    fn uppercase_noise_matches_lowered_input() {
        let n = Normalizer::new("X");
        assert_eq!(n.normalize("aXb"), "ab");
    }

    #[test]
    fn multi_char_lowercase_noise_leaves_plain_letters() {
        let n = Normalizer::new("İ");
        assert_eq!(n.normalize("Pixel"), "pixel");
        assert_eq!(n.noise(), "İ");
    }

    #[test]
    fn strip_extension_is_case_insensitive() {
        assert_eq!(strip_extension("CRM.TSX", ".tsx"), Some("CRM"));
        assert_eq!(strip_extension("README.md", ".tsx"), None);
        assert_eq!(strip_extension(".tsx", ".tsx"), None);
        assert_eq!(strip_extension("anything", ""), Some("anything"));
        assert_eq!(strip_extension("é.tsx", "x.tsx"), None);
    }

    #[test]
    fn basename_key_strips_extension_and_separators() {
        let n = Normalizer::new("-_");
        assert_eq!(basename_key("Spreadsheet-BI.tsx", ".tsx", &n), "spreadsheetbi");
        assert_eq!(basename_key("POSShop.TSX", ".tsx", &n), "posshop");
        assert_eq!(basename_key("README.md", ".tsx", &n), "readme.md");
        assert_eq!(basename_key(".tsx", ".tsx", &n), ".tsx");
    }

    #[test]
    fn normalizer_round_trips_through_yaml() {
        let n = Normalizer::new(" -");
        let yaml = serde_yaml::to_string(&n).unwrap();
        let back: Normalizer = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, n);
    }
}
