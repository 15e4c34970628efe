//! Settings persistence for the console front-end.
//!
//! One JSON file under the platform config directory holding the destination
//! root. A corrupted file falls back to defaults rather than blocking the
//! install.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Parent directory under which each archive gets its own folder
    pub destination_root: Option<PathBuf>,
}

impl Settings {
    fn file_path() -> Result<PathBuf, Box<dyn Error>> {
        let config_dir = dirs::config_dir().ok_or("failed to locate the config directory")?;
        Ok(config_dir.join("zipinstall").join("settings.json"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        Self::load_from(&Self::file_path()?)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        self.save_to(&Self::file_path()?)
    }

    fn load_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents).unwrap_or_else(|e| {
            eprintln!("Failed to parse settings file: {e}. Using defaults.");
            Self::default()
        });
        Ok(settings)
    }

    fn save_to(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
