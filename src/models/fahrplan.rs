//! Schedule record model.
//!
//! One row per cataloged timetable PDF. Identity is (dateiname, jahr, region);
//! all other metadata is derived from the filename and folder at import time
//! and can be edited afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Filesystem status of the PDF backing a schedule record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PdfStatus {
    /// File present at `pdf_pfad`.
    Ok,
    /// File no longer found on disk (detected by sync).
    Missing,
    /// Record created by a manual single-file import.
    Import,
}

impl PdfStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Missing => "MISSING",
            Self::Import => "IMPORT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "OK" => Some(Self::Ok),
            "MISSING" => Some(Self::Missing),
            "IMPORT" => Some(Self::Import),
            _ => None,
        }
    }
}

/// A cataloged timetable PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fahrplan {
    /// Database row ID (0 until inserted).
    pub id: i64,
    /// Human-readable title derived from the place chain in the filename.
    pub titel: String,
    /// Legacy line designation(s), comma-joined.
    pub linie_alt: String,
    /// Current line designation(s), comma-joined.
    pub linie_neu: String,
    /// Free-text description, empty unless edited.
    pub kurzbeschreibung: String,
    /// First day of validity (schedule-year convention: Dec 14 of the
    /// previous calendar year).
    pub gueltig_von: NaiveDate,
    /// Last day of validity (Dec 13 of the schedule year).
    pub gueltig_bis: NaiveDate,
    /// Path of the PDF relative to the base directory.
    pub pdf_pfad: String,
    /// Bare filename including the `.pdf` extension.
    pub dateiname: String,
    /// Enclosing folder name, which encodes the schedule year.
    pub jahr: String,
    /// Region subfolder name, empty for PDFs directly under the year folder.
    pub region: String,
    /// Comma-separated keyword tags extracted from the PDF text.
    pub tags: Option<String>,
    pub pdf_status: PdfStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fahrplan {
    /// Create a new record ready for insertion.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        titel: String,
        linie_alt: String,
        linie_neu: String,
        gueltig_von: NaiveDate,
        gueltig_bis: NaiveDate,
        pdf_pfad: String,
        dateiname: String,
        jahr: String,
        region: String,
        tags: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Set by database
            titel,
            linie_alt,
            linie_neu,
            kurzbeschreibung: String::new(),
            gueltig_von,
            gueltig_bis,
            pdf_pfad,
            dateiname,
            jahr,
            region,
            tags,
            pdf_status: PdfStatus::Ok,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for status in [PdfStatus::Ok, PdfStatus::Missing, PdfStatus::Import] {
            assert_eq!(PdfStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(PdfStatus::from_str("bogus"), None);
    }
}
