//! Configuration for import and report assembly
//!
//! Engine thresholds are fixed; this only tunes the layers around the engine.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/storepulse/config/storepulse.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::analytics::DEFAULT_RECOVERY_RATE;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/storepulse.toml");

/// Order import settings
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    /// chrono formats tried in order for order timestamps
    pub date_formats: Vec<String>,
    pub default_store_id: String,
    /// Stamped on aggregated abandoned-cart records
    pub recovery_rate: f64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%m/%d/%Y".to_string(),
            ],
            default_store_id: "default".to_string(),
            recovery_rate: DEFAULT_RECOVERY_RATE,
        }
    }
}

/// Report assembly settings
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub include_seasonality: bool,
    pub narrative: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_seasonality: true,
            narrative: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub import: ImportConfig,
    pub report: ReportConfig,
    /// File the config was read from (None = embedded defaults)
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load from an explicit path, the data-dir override, or embedded defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let override_path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        p.display()
                    )));
                }
                Some(p.to_path_buf())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        match override_path {
            Some(p) => {
                let content = fs::read_to_string(&p).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", p.display(), e))
                })?;
                let mut config = parse_config(&content)?;
                tracing::debug!(path = %p.display(), "Loaded config override");
                config.source = Some(p);
                Ok(config)
            }
            None => parse_config(DEFAULT_CONFIG),
        }
    }

    /// Parse config TOML, applying it over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("storepulse").join("config").join("storepulse.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    import: Option<RawImport>,
    abandoned_carts: Option<RawAbandonedCarts>,
    report: Option<RawReport>,
}

#[derive(Debug, Deserialize)]
struct RawImport {
    date_formats: Option<Vec<String>>,
    default_store_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAbandonedCarts {
    recovery_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawReport {
    include_seasonality: Option<bool>,
    narrative: Option<bool>,
}

fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(import) = raw.import {
        if let Some(formats) = import.date_formats {
            if formats.is_empty() {
                return Err(Error::Config(
                    "import.date_formats must list at least one format".into(),
                ));
            }
            config.import.date_formats = formats;
        }
        if let Some(store_id) = import.default_store_id {
            config.import.default_store_id = store_id;
        }
    }

    if let Some(carts) = raw.abandoned_carts {
        if let Some(rate) = carts.recovery_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::Config(format!(
                    "abandoned_carts.recovery_rate must be between 0 and 1, got {}",
                    rate
                )));
            }
            config.import.recovery_rate = rate;
        }
    }

    if let Some(report) = raw.report {
        if let Some(seasonality) = report.include_seasonality {
            config.report.include_seasonality = seasonality;
        }
        if let Some(narrative) = report.narrative {
            config.report.narrative = narrative;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [abandoned_carts]
            recovery_rate = 0.35

            [report]
            narrative = false
            "#,
        )
        .unwrap();

        assert_eq!(config.import.recovery_rate, 0.35);
        assert!(!config.report.narrative);
        assert!(config.report.include_seasonality);
        assert_eq!(config.import.default_store_id, "default");
        assert_eq!(config.import.date_formats.len(), 4);
    }

    #[test]
    fn test_rejects_out_of_range_recovery_rate() {
        let err = Config::from_toml("[abandoned_carts]\nrecovery_rate = 1.5").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_empty_date_formats() {
        let err = Config::from_toml("[import]\ndate_formats = []").unwrap_err();
        assert!(err.to_string().contains("date_formats"));
    }

    #[test]
    fn test_rejects_invalid_toml() {
        let err = Config::from_toml("[report\nnarrative = yes").unwrap_err();
        assert!(err.to_string().contains("Invalid config TOML"));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[import]\ndefault_store_id = \"acme\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.import.default_store_id, "acme");
        assert_eq!(config.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }
}
