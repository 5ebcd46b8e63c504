use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::header::DEFAULT_SCAN_ROWS;
use crate::normalizer::{DateOrder, DEFAULT_RECONCILED};
use crate::suggester::{MatchConfig, DEFAULT_MATCH_THRESHOLD};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_scan_rows")]
    pub header_scan_rows: usize,
    #[serde(default = "default_threshold")]
    pub match_threshold: f64,
    #[serde(default = "default_true")]
    pub substring_match: bool,
    #[serde(default)]
    pub date_order: DateOrder,
    #[serde(default = "default_reconciled")]
    pub reconciled: String,
}

fn default_output_dir() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("ledgerline")
        .to_string_lossy()
        .to_string()
}

fn default_scan_rows() -> usize {
    DEFAULT_SCAN_ROWS
}

fn default_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

fn default_true() -> bool {
    true
}

fn default_reconciled() -> String {
    DEFAULT_RECONCILED.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            header_scan_rows: default_scan_rows(),
            match_threshold: default_threshold(),
            substring_match: default_true(),
            date_order: DateOrder::default(),
            reconciled: default_reconciled(),
        }
    }
}

impl Settings {
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            threshold: self.match_threshold,
            substring_match: self.substring_match,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand_path(&self.output_dir))
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(LedgerError::Settings(format!(
                "match_threshold must be between 0 and 1, got {}",
                self.match_threshold
            )));
        }
        if self.header_scan_rows == 0 {
            return Err(LedgerError::Settings(
                "header_scan_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ledgerline")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
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
    settings.validate()?;
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| LedgerError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
