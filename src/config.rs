use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// Optional settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "dashboard.json";

const FIELDS: [&str; 4] = ["data_path", "window_size", "min_window_size", "title"];

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset loaded at startup.
    pub data_path: PathBuf,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("dados-vendas-chocolate.csv"),
            window_size: [1280.0, 900.0],
            min_window_size: [800.0, 600.0],
            title: "Dashboard Vendas de Chocolates".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse a config file. Fields it leaves out keep their defaults and are
    /// logged at warn level.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let value: Value =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

        let missing = missing_fields(&value);
        if !missing.is_empty() {
            log::warn!(
                "{} does not set {}; using defaults",
                path.display(),
                missing.join(", ")
            );
        }
        serde_json::from_value(value).with_context(|| format!("parsing {}", path.display()))
    }

    /// Read `path` if it exists; otherwise, or on any error, use the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }
}

/// Known settings absent from a parsed config object.
fn missing_fields(value: &Value) -> Vec<&'static str> {
    match value.as_object() {
        Some(map) => FIELDS.into_iter().filter(|f| !map.contains_key(*f)).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_uses_defaults() {
        let config = DashboardConfig::load_or_default(Path::new("/no/such/dashboard.json"));
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, r#"{{"data_path": "vendas.parquet", "window_size": [1024, 768]}}"#).unwrap();

        let config = DashboardConfig::load_or_default(file.path());
        assert_eq!(config.data_path, PathBuf::from("vendas.parquet"));
        assert_eq!(config.window_size, [1024.0, 768.0]);
        assert_eq!(config.title, DashboardConfig::default().title);
    }

    #[test]
    fn reports_fields_left_to_defaults() {
        let partial = serde_json::json!({"data_path": "vendas.csv", "title": "Vendas"});
        assert_eq!(missing_fields(&partial), vec!["window_size", "min_window_size"]);

        let complete = serde_json::json!({
            "data_path": "vendas.csv",
            "window_size": [1024, 768],
            "min_window_size": [640, 480],
            "title": "Vendas",
        });
        assert!(missing_fields(&complete).is_empty());
        assert_eq!(missing_fields(&serde_json::json!({})), FIELDS.to_vec());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, "not json").unwrap();

        assert!(DashboardConfig::from_file(file.path()).is_err());
        assert_eq!(
            DashboardConfig::load_or_default(file.path()),
            DashboardConfig::default()
        );
    }
}
