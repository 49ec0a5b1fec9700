//! Settings for data locations, scan behavior and the HTTP server.
//!
//! Loaded once per process from `config.toml` in the data directory, with
//! environment overrides. Operations receive an immutable reference; nothing
//! mutates settings mid-operation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CHUNK_SIZE: usize = 10;
pub const DEFAULT_MAX_SCAN_ERRORS: usize = 50;
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the schedule-year folders with the PDFs.
    pub pdf_base_dir: PathBuf,
    /// Directory for the database and config file.
    pub data_dir: PathBuf,
    /// Files per scan chunk.
    pub chunk_size: usize,
    /// Error budget per scan session; past this the scan aborts.
    pub max_scan_errors: usize,
    /// Default result cap for the frontend search.
    pub max_search_results: usize,
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pdf_base_dir: PathBuf::from("fahrplaene"),
            data_dir: default_data_dir(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_scan_errors: DEFAULT_MAX_SCAN_ERRORS,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            host: "127.0.0.1".to_string(),
            port: 8090,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fahrplanportal")
}

impl Settings {
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("fahrplanportal.db")
    }

    pub fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.toml")
    }

    /// Write the current settings out as TOML (used by `init`).
    pub fn save(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let path = Self::config_path(&self.data_dir);
        fs::write(&path, toml::to_string_pretty(self)?)?;
        info!(path = %path.display(), "wrote config");
        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Load settings: explicit data dir beats `FAHRPLANPORTAL_DATA_DIR` beats the
/// platform default; `config.toml` in that directory supplies the rest, with
/// `FAHRPLANPORTAL_PDF_DIR` overriding the PDF base directory.
pub fn load_settings(data_dir: Option<PathBuf>) -> anyhow::Result<Settings> {
    let data_dir = data_dir
        .or_else(|| std::env::var("FAHRPLANPORTAL_DATA_DIR").ok().map(PathBuf::from))
        .map(|p| expand(&p))
        .unwrap_or_else(default_data_dir);

    let config_path = Settings::config_path(&data_dir);
    let mut settings = if config_path.is_file() {
        let text = fs::read_to_string(&config_path)?;
        toml::from_str(&text)?
    } else {
        Settings::default()
    };
    settings.data_dir = data_dir;

    if let Ok(pdf_dir) = std::env::var("FAHRPLANPORTAL_PDF_DIR") {
        settings.pdf_base_dir = PathBuf::from(pdf_dir);
    }
    settings.pdf_base_dir = expand(&settings.pdf_base_dir);

    fs::create_dir_all(&settings.data_dir)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.chunk_size, 10);
        assert_eq!(settings.max_scan_errors, 50);
    }

    #[test]
    fn loads_config_file_from_data_dir() {
        let dir = tempdir().unwrap();
        fs::write(
            Settings::config_path(dir.path()),
            "chunk_size = 25\npdf_base_dir = \"/srv/fahrplaene\"\n",
        )
        .unwrap();

        let settings = load_settings(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(settings.chunk_size, 25);
        assert_eq!(settings.pdf_base_dir, PathBuf::from("/srv/fahrplaene"));
        assert_eq!(settings.data_dir, dir.path());
        // Unspecified fields keep defaults
        assert_eq!(settings.max_scan_errors, 50);
    }

    #[test]
    fn save_roundtrip() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.data_dir = dir.path().to_path_buf();
        settings.port = 9999;
        settings.save().unwrap();

        let loaded = load_settings(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(loaded.port, 9999);
    }
}
