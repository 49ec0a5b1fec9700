//! Filename-driven metadata derivation.
//!
//! Timetable PDFs are named `<designation(s)>-<place>-<place>-....pdf`, e.g.
//! `100-villach-klagenfurt.pdf` or `x2-10-st-veit-a-d-glan-klagenfurt.pdf`.
//! The parser derives a display title and both the current ("neu") and legacy
//! ("alt") line designations, using the admin-configured mapping table to
//! fill in whichever side the filename does not carry.

pub mod mapping;
mod title;

pub use mapping::LineMapping;
pub use title::expand_places;

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;

/// Leading `[Letter]+Digits` token (e.g. `X2`), optionally chained with
/// further numeric tokens, followed by a place chain. Place names are
/// usually letters but purely numeric ones occur, so the chain is `.+`;
/// backtracking keeps the designation split stable.
static ALPHANUMERIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+\d+)((?:-\d+)*)-(.+)$").unwrap());

/// 2-3 digit new designations, hyphen-chained, followed by a place chain.
static NEW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2,3}(?:-\d{2,3})*)-(.+)$").unwrap());

/// 4-digit legacy designations, hyphen-chained, place chain optional.
static LEGACY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}(?:-\d{4})*)(?:-(.+))?$").unwrap());

/// Errors from filename parsing. Both are per-file scan errors: the file is
/// skipped with an error count increment and the scan continues.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("not a PDF filename: {0}")]
    NotAPdf(String),

    #[error("unrecognized filename pattern: {0}")]
    UnrecognizedPattern(String),
}

/// Which filename shape matched, with the raw pieces it captured.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FilenameShape {
    /// `X2-...` style: new designations with a letter prefix.
    Alphanumeric {
        designations: Vec<String>,
        places: String,
    },
    /// `100-...` style: plain new designations.
    New {
        designations: Vec<String>,
        places: String,
    },
    /// `5000-...` style: legacy designations, reverse-mapped to new ones.
    Legacy {
        designations: Vec<String>,
        places: Option<String>,
    },
}

/// Metadata derived from a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    pub titel: String,
    pub linie_neu: String,
    pub linie_alt: String,
}

fn classify(stem: &str) -> Result<FilenameShape, ParseError> {
    if let Some(caps) = ALPHANUMERIC_PATTERN.captures(stem) {
        let mut designations = vec![caps[1].to_string()];
        designations.extend(caps[2].split('-').filter(|t| !t.is_empty()).map(String::from));
        return Ok(FilenameShape::Alphanumeric {
            designations,
            places: caps[3].to_string(),
        });
    }

    if let Some(caps) = NEW_PATTERN.captures(stem) {
        return Ok(FilenameShape::New {
            designations: caps[1].split('-').map(String::from).collect(),
            places: caps[2].to_string(),
        });
    }

    if let Some(caps) = LEGACY_PATTERN.captures(stem) {
        return Ok(FilenameShape::Legacy {
            designations: caps[1].split('-').map(String::from).collect(),
            places: caps.get(2).map(|m| m.as_str().to_string()),
        });
    }

    Err(ParseError::UnrecognizedPattern(stem.to_string()))
}

/// Derive title and line designations from a PDF filename.
pub fn parse_filename(filename: &str, mapping: &LineMapping) -> Result<ParsedFilename, ParseError> {
    let stem = filename
        .strip_suffix(".pdf")
        .or_else(|| filename.strip_suffix(".PDF"))
        .ok_or_else(|| ParseError::NotAPdf(filename.to_string()))?;

    match classify(stem)? {
        FilenameShape::Alphanumeric { designations, places }
        | FilenameShape::New { designations, places } => {
            let neu: Vec<String> = designations.iter().map(|d| d.to_uppercase()).collect();
            let alt: Vec<String> = designations
                .iter()
                .filter_map(|d| match mapping.lookup(d) {
                    Some(old) => Some(old.to_string()),
                    None => {
                        warn!(designation = %d, file = filename, "no legacy mapping for designation");
                        None
                    }
                })
                .collect();
            Ok(ParsedFilename {
                titel: title::build_title(&places),
                linie_neu: neu.join(", "),
                linie_alt: alt.join(", "),
            })
        }
        FilenameShape::Legacy { designations, places } => {
            let alt: Vec<String> = designations.iter().map(|d| d.to_uppercase()).collect();
            let neu: Vec<String> = designations
                .iter()
                .filter_map(|d| match mapping.lookup_old(d) {
                    Some(new) => Some(new.to_string()),
                    None => {
                        warn!(designation = %d, file = filename, "no new designation for legacy number");
                        None
                    }
                })
                .collect();
            let titel = match places {
                Some(chain) => title::build_title(&chain),
                // No place chain to derive a title from; show the legacy numbers.
                None => alt.join(", "),
            };
            Ok(ParsedFilename {
                titel,
                linie_neu: neu.join(", "),
                linie_alt: alt.join(", "),
            })
        }
    }
}

/// Validity bounds for a schedule year: Dec 14 of the previous calendar year
/// through Dec 13 of the schedule year (transit schedule-year convention).
pub fn schedule_year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    let von = NaiveDate::from_ymd_opt(year - 1, 12, 14).unwrap_or(NaiveDate::MIN);
    let bis = NaiveDate::from_ymd_opt(year, 12, 13).unwrap_or(NaiveDate::MAX);
    (von, bis)
}

/// Derive validity from the enclosing folder name.
///
/// A folder starting with four digits fixes the schedule year; anything else
/// falls back to the current system year with the same offset rule.
pub fn validity_for_folder(folder: &str) -> (NaiveDate, NaiveDate) {
    schedule_year_bounds(folder_year(folder).unwrap_or_else(|| Utc::now().year()))
}

fn folder_year(folder: &str) -> Option<i32> {
    let digits: String = folder.chars().take(4).collect();
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> LineMapping {
        LineMapping::parse("100:5000\n200:5100\nX2:SB2")
    }

    #[test]
    fn two_digit_and_three_digit_designations() {
        let parsed = parse_filename("100-villach-klagenfurt.pdf", &mapping()).unwrap();
        assert_eq!(parsed.linie_neu, "100");
        assert_eq!(parsed.linie_alt, "5000");
        assert_eq!(parsed.titel, "Villach \u{2014} Klagenfurt");

        let parsed = parse_filename("100-200-villach.pdf", &mapping()).unwrap();
        assert_eq!(parsed.linie_neu, "100, 200");
        assert_eq!(parsed.linie_alt, "5000, 5100");
        assert!(!parsed.titel.is_empty());
    }

    #[test]
    fn alphanumeric_leading_token_is_uppercased() {
        let parsed = parse_filename("x2-villach-klagenfurt.pdf", &mapping()).unwrap();
        assert!(parsed.linie_neu.contains("X2"));
        assert_eq!(parsed.linie_alt, "SB2");

        let parsed = parse_filename("x2-10-villach.pdf", &mapping()).unwrap();
        assert_eq!(parsed.linie_neu, "X2, 10");
    }

    #[test]
    fn legacy_numbers_are_reverse_mapped() {
        let parsed = parse_filename("5000-villach-klagenfurt.pdf", &mapping()).unwrap();
        assert_eq!(parsed.linie_alt, "5000");
        assert_eq!(parsed.linie_neu, "100");
        assert_eq!(parsed.titel, "Villach \u{2014} Klagenfurt");
    }

    #[test]
    fn legacy_without_places_uses_numbers_as_title() {
        let parsed = parse_filename("5000-5100.pdf", &mapping()).unwrap();
        assert_eq!(parsed.linie_alt, "5000, 5100");
        assert_eq!(parsed.titel, "5000, 5100");
    }

    #[test]
    fn numeric_place_chains_parse() {
        let parsed = parse_filename("100-12.pdf", &mapping()).unwrap();
        assert_eq!(parsed.linie_neu, "100");
        assert_eq!(parsed.linie_alt, "5000");
        assert_eq!(parsed.titel, "12");

        let parsed = parse_filename("x2-10.pdf", &mapping()).unwrap();
        assert_eq!(parsed.linie_neu, "X2");
        assert_eq!(parsed.titel, "10");
    }

    #[test]
    fn mapping_miss_leaves_side_empty() {
        let parsed = parse_filename("999-villach.pdf", &mapping()).unwrap();
        assert_eq!(parsed.linie_neu, "999");
        assert_eq!(parsed.linie_alt, "");
    }

    #[test]
    fn abbreviations_expand_in_title() {
        let parsed = parse_filename("100-st-veit-a-d-glan-klagenfurt.pdf", &mapping()).unwrap();
        assert_eq!(parsed.titel, "St.Veit \u{2014} an der Glan \u{2014} Klagenfurt");
    }

    #[test]
    fn unrecognized_pattern_is_an_error() {
        assert!(matches!(
            parse_filename("readme.pdf", &mapping()),
            Err(ParseError::UnrecognizedPattern(_))
        ));
        assert!(matches!(
            parse_filename("100-villach.txt", &mapping()),
            Err(ParseError::NotAPdf(_))
        ));
    }

    #[test]
    fn uppercase_extension_is_accepted() {
        assert!(parse_filename("100-villach.PDF", &mapping()).is_ok());
    }

    #[test]
    fn folder_year_fixes_validity() {
        let (von, bis) = validity_for_folder("2026");
        assert_eq!(von, NaiveDate::from_ymd_opt(2025, 12, 14).unwrap());
        assert_eq!(bis, NaiveDate::from_ymd_opt(2026, 12, 13).unwrap());

        // Suffixes after the year digits are fine
        let (von, _) = validity_for_folder("2025-archiv");
        assert_eq!(von, NaiveDate::from_ymd_opt(2024, 12, 14).unwrap());
    }

    #[test]
    fn folder_without_year_falls_back_to_current_year() {
        let year = Utc::now().year();
        let (von, bis) = validity_for_folder("sonstige");
        assert_eq!(von, NaiveDate::from_ymd_opt(year - 1, 12, 14).unwrap());
        assert_eq!(bis, NaiveDate::from_ymd_opt(year, 12, 13).unwrap());
    }
}
