use serde::Deserialize;
use std::fs;

use crate::model::ConfigError;

/// One watched product. The catalog name is what bundle detection compares
/// store titles against.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    pub product_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub snapshot_dir: String,
    pub products: Vec<ProductConfig>,
    pub check_interval_seconds: u64,
    #[serde(default = "default_staleness_hours")]
    pub staleness_hours: i64,
    #[serde(default = "default_trend_window_days")]
    pub trend_window_days: i64,
}

fn default_staleness_hours() -> i64 {
    72
}

fn default_trend_window_days() -> i64 {
    30
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
