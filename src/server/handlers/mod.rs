//! API endpoint handlers.

mod admin;
mod fahrplan;
mod scan;
mod search;
mod settings;
mod types;

pub use admin::{
    analyze_all_tags, clear_db, delete_missing, health, publish, recreate_db, status, sync_table,
};
pub use fahrplan::{delete_fahrplan, get_fahrplan, list_fahrplaene, update_fahrplan};
pub use scan::{import_single, scan_chunk, scan_finish, scan_info};
pub use search::{autocomplete, search, search_stats};
pub use settings::{
    load_exclusion_words, load_line_mapping, save_exclusion_words, save_line_mapping,
};

use super::AppState;
