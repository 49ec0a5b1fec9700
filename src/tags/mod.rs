//! Keyword-tag extraction from PDF text.
//!
//! Tags enrich the frontend search: the PDF text is tokenized, stopwords and
//! noise are dropped, and the remaining keywords are stored comma-separated
//! on the schedule record. Extraction failure is never fatal - a schedule
//! imports fine without tags.

mod exclusion;

pub use exclusion::ExclusionList;

use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Cap on tags per document; beyond this the text adds noise, not recall.
pub const MAX_TAGS: usize = 200;

/// Minimum tag length in characters.
pub const MIN_TAG_LEN: usize = 3;

/// Extract keyword tags from a PDF file.
///
/// Returns `None` when the text cannot be extracted or yields no usable
/// keywords; the caller imports the record without tags either way.
pub fn extract_tags(pdf_path: &Path, exclusion: &ExclusionList) -> Option<String> {
    let text = match pdf_extract::extract_text(pdf_path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %pdf_path.display(), error = %e, "PDF text extraction failed, importing without tags");
            return None;
        }
    };

    let tags = tags_from_text(&text, exclusion);
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(", "))
    }
}

/// Tokenize text into candidate tags.
///
/// Tokens are lowercased and split on anything non-alphanumeric (umlauts and
/// ß are kept). Short tokens, purely numeric tokens and exclusion words are
/// dropped; duplicates keep their first occurrence.
pub fn tags_from_text(text: &str, exclusion: &ExclusionList) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for token in text.split(|c: char| !c.is_alphanumeric()) {
        if token.is_empty() {
            continue;
        }
        let token = token.to_lowercase();
        if token.chars().count() < MIN_TAG_LEN {
            continue;
        }
        if token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if exclusion.contains(&token) {
            continue;
        }
        if seen.insert(token.clone()) {
            tags.push(token);
            if tags.len() >= MAX_TAGS {
                break;
            }
        }
    }

    tags
}
