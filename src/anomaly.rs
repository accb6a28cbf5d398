//! Line-level formatting anomalies.
//!
//! Record extraction reads through line breaks, so two routes crammed onto one
//! physical line look identical to two routes on separate lines. This scan
//! works on raw lines to surface that drift.

use serde::Serialize;

/// A physical line holding more than one record boundary token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineAnomaly {
    /// 1-based line number.
    pub line_number: usize,
    /// Occurrences of the boundary token on the line.
    pub count: usize,
    /// The line, trimmed.
    pub text: String,
}

/// Flags every line of `text` with more than one occurrence of `token`.
///
/// An empty token never matches.
#[must_use]
pub fn scan_lines(text: &str, token: &str) -> Vec<LineAnomaly> {
    if token.is_empty() {
        return Vec::new();
    }
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let count = line.matches(token).count();
            (count > 1).then(|| LineAnomaly {
                line_number: i + 1,
                count,
                text: line.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_two_routes_on_one_line() {
        let text = r#"<Route path="/apps/a"/><Route path="/apps/b"/>"#;
        let found = scan_lines(text, "<Route");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line_number, 1);
        assert_eq!(found[0].count, 2);
    }

    #[test]
    fn reports_line_numbers_and_counts() {
        let text = "<Routes>\n  <Route path=\"/apps/a\" />\n  <Route path=\"/apps/b\" /><Route path=\"/apps/c\" /><Route path=\"/apps/d\" />\n</Routes>\n";
        let found = scan_lines(text, "<Route");
        // `<Routes>` itself contains the token once; only line 3 repeats it.
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line_number, 3);
        assert_eq!(found[0].count, 3);
        assert!(found[0].text.starts_with("<Route path=\"/apps/b\""));
    }

    #[test]
    fn clean_text_has_no_anomalies() {
        assert!(scan_lines("<Route a/>\n<Route b/>\n", "<Route").is_empty());
        assert!(scan_lines("", "<Route").is_empty());
    }

    #[test]
    fn empty_token_never_matches() {
        assert!(scan_lines("aaa", "").is_empty());
    }
}
