//! Scan statistics accumulated across chunks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One failed file in a scan, kept for the error protocol shown to the
/// operator after the scan completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanFileError {
    pub file: String,
    pub region: String,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl ScanFileError {
    pub fn new(file: &str, region: &str, message: impl Into<String>) -> Self {
        Self {
            file: file.to_string(),
            region: region.to_string(),
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }
}

/// Aggregated totals for a whole scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    pub imported: u64,
    pub skipped: u64,
    pub error_count: u64,
    /// Imported count per region (empty region key = year folder itself).
    pub regions: BTreeMap<String, u64>,
    pub errors: Vec<ScanFileError>,
}

impl ScanStats {
    pub fn record_import(&mut self, region: &str) {
        self.imported += 1;
        *self.regions.entry(region.to_string()).or_insert(0) += 1;
    }

    pub fn record_error(&mut self, error: ScanFileError) {
        self.error_count += 1;
        self.errors.push(error);
    }

    pub fn processed(&self) -> u64 {
        self.imported + self.skipped + self.error_count
    }
}
