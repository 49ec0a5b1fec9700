//! Bidirectional line-number mapping table.
//!
//! Configured as free text, one `new:old` pair per line (for example
//! `X2:SB2` or `100:5000`). Lines starting with `//` or `#` are comments.
//! Malformed lines are skipped with a logged warning; there is no
//! partial-line recovery.

use std::collections::HashMap;
use tracing::warn;

/// Parsed mapping from new line designations to their legacy counterparts.
///
/// Keys are uppercase-normalized so lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct LineMapping {
    forward: HashMap<String, String>,
}

impl LineMapping {
    /// Parse the admin-configured mapping text.
    pub fn parse(text: &str) -> Self {
        let mut forward = HashMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
                continue;
            }
            match line.split_once(':') {
                Some((new, old)) if !new.trim().is_empty() && !old.trim().is_empty() => {
                    forward.insert(new.trim().to_uppercase(), old.trim().to_string());
                }
                _ => warn!(line = idx + 1, content = line, "skipping malformed mapping line"),
            }
        }
        Self { forward }
    }

    /// Forward lookup: new designation to legacy designation.
    pub fn lookup(&self, new: &str) -> Option<&str> {
        self.forward.get(&new.to_uppercase()).map(String::as_str)
    }

    /// Reverse lookup: legacy designation back to its new designation.
    ///
    /// The table is small (admin-maintained), so a linear scan stands in for
    /// the inverted map.
    pub fn lookup_old(&self, old: &str) -> Option<&str> {
        let old = old.to_uppercase();
        self.forward
            .iter()
            .find(|(_, v)| v.to_uppercase() == old)
            .map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_and_looks_up_both_ways() {
        let mapping = LineMapping::parse("100:5000\nX2:SB2");
        assert_eq!(mapping.lookup("100"), Some("5000"));
        assert_eq!(mapping.lookup("X2"), Some("SB2"));
        assert_eq!(mapping.lookup_old("5000"), Some("100"));
        assert_eq!(mapping.lookup_old("SB2"), Some("X2"));
        assert_eq!(mapping.lookup("999"), None);
        assert_eq!(mapping.lookup_old("999"), None);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mapping = LineMapping::parse("X2:SB2");
        assert_eq!(mapping.lookup("x2"), Some("SB2"));
        assert_eq!(mapping.lookup_old("sb2"), Some("X2"));
    }

    #[test]
    fn skips_comments_blank_and_malformed_lines() {
        let text = "// header comment\n# another\n\n100:5000\nno-colon-here\n:empty\nalso:\n200:6000";
        let mapping = LineMapping::parse(text);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.lookup("200"), Some("6000"));
    }

    #[test]
    fn trims_whitespace_around_pairs() {
        let mapping = LineMapping::parse("  100 : 5000  ");
        assert_eq!(mapping.lookup("100"), Some("5000"));
    }
}
