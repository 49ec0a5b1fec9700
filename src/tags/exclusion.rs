//! Stopword list for tag filtering.
//!
//! Admin-edited free text: words separated by whitespace or commas, `//` and
//! `#` comment lines ignored. Words are lowercase-normalized on parse.

use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct ExclusionList {
    words: HashSet<String>,
}

impl ExclusionList {
    pub fn parse(text: &str) -> Self {
        let mut words = HashSet::new();
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
                continue;
            }
            for word in line.split(|c: char| c.is_whitespace() || c == ',') {
                if !word.is_empty() {
                    words.insert(word.to_lowercase());
                }
            }
        }
        Self { words }
    }

    /// Membership test. Expects an already-lowercased word.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_words_across_lines_and_commas() {
        let list = ExclusionList::parse("und oder\nder, die, das\n// kommentar\n# auch\n");
        assert_eq!(list.len(), 5);
        assert!(list.contains("und"));
        assert!(list.contains("das"));
        assert!(!list.contains("kommentar"));
    }

    #[test]
    fn words_are_lowercased() {
        let list = ExclusionList::parse("UND Oder");
        assert!(list.contains("und"));
        assert!(list.contains("oder"));
    }
}
