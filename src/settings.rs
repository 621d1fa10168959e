use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::iso_codes::DEFAULT_ISO_639_PATH;

pub const DEFAULT_HISTORY_SIZE: usize = 50;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// List actions that are currently disabled in search results.
    #[serde(default)]
    pub search_show_unavailable: bool,
    /// Maximum number of entries kept in the action history.
    #[serde(default = "default_history_size")]
    pub action_history_size: usize,
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Also write log output to this file.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Location of `iso_639.xml`. If `None`, the system iso-codes path is
    /// used.
    #[serde(default)]
    pub iso_codes_path: Option<PathBuf>,
    /// JSON translation catalog used to show language names in their own
    /// language. Without it names are listed untranslated.
    #[serde(default)]
    pub iso_codes_catalog: Option<PathBuf>,
}

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_show_unavailable: false,
            action_history_size: default_history_size(),
            debug_logging: false,
            log_file: None,
            iso_codes_path: None,
            iso_codes_catalog: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn iso_codes_path(&self) -> PathBuf {
        self.iso_codes_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ISO_639_PATH))
    }
}
