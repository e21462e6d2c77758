use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CashflowError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the category file, including the file name. The journal and
    /// the report always live in the current working directory.
    pub category_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            category_file: default_category_file().to_string_lossy().to_string(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("cashflow")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_category_file() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("financial")
        .join("cashflow_categories.txt")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| CashflowError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_exists() -> bool {
    settings_path().exists()
}

pub fn category_file_path() -> PathBuf {
    PathBuf::from(&load_settings().category_file)
}
