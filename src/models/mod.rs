//! Domain models.

mod fahrplan;
mod stats;

pub use fahrplan::{Fahrplan, PdfStatus};
pub use stats::{ScanFileError, ScanStats};
