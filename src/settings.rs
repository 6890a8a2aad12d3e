use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RedflagError, Result};

/// Thresholds consumed by the detection rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub z_threshold: f64,
    pub min_account_size: usize,
    pub employee_min_transactions: usize,
    pub employee_total_multiplier: f64,
    pub same_day_count: usize,
    pub small_amount: f64,
    pub threshold_amounts: Vec<f64>,
    pub business_start_hour: i64,
    pub business_end_hour: i64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            z_threshold: 3.0,
            min_account_size: 5,
            employee_min_transactions: 5,
            employee_total_multiplier: 2.0,
            same_day_count: 4,
            small_amount: 200.0,
            threshold_amounts: vec![9999.0, 99999.0, 1_000_000.0],
            business_start_hour: 6,
            business_end_hour: 20,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub detection: DetectionConfig,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("redflag")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load settings from `path`, or from the default location when `None`.
/// A missing default file yields defaults; a missing explicit file is an error.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (settings_path(), false),
    };
    if !path.exists() {
        if explicit {
            return Err(RedflagError::Settings(format!(
                "settings file not found: {}",
                path.display()
            )));
        }
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(&path)?;
    serde_json::from_str(&content)
        .map_err(|e| RedflagError::Settings(format!("{}: {e}", path.display())))
}

pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| RedflagError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}
