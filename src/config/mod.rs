//! Application configuration
//!
//! Loaded from a TOML file with environment-variable overrides. A missing
//! config file is created with defaults so the service starts with zero
//! setup. Environment keys: `PLUTO_PORT` (listen port), `PLUTO_REGIONS`
//! (comma-separated region list).

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Regions to aggregate, in merge-priority order
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
    /// Interval between guide rebuilds, e.g. "2h", "30m"
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: String,
    /// Number of consecutive EPG windows fetched per refresh
    #[serde(default = "default_window_count")]
    pub window_count: usize,
    /// Duration of one EPG window in minutes
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u32,
    /// Channel ids per timeline request
    #[serde(default = "default_group_size")]
    pub group_size: usize,
    /// Display-number offsets applied per region in the merged directory
    #[serde(default = "default_number_offsets")]
    pub number_offsets: HashMap<String, u32>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            refresh_interval: default_refresh_interval(),
            window_count: default_window_count(),
            window_minutes: default_window_minutes(),
            group_size: default_group_size(),
            number_offsets: default_number_offsets(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_file(&config_file)
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let mut config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment overrides kept compatible with the historical deployment
    /// variables (`PLUTO_PORT`, `PLUTO_REGIONS`).
    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PLUTO_PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.web.port = port,
                Err(_) => warn!("Ignoring unparseable PLUTO_PORT value: {}", port),
            }
        }
        if let Ok(regions) = std::env::var("PLUTO_REGIONS") {
            let regions: Vec<String> = regions
                .split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
            if !regions.is_empty() {
                self.provider.regions = regions;
            }
        }
    }

    /// Parse the configured refresh interval into a [`Duration`]
    pub fn refresh_interval(&self) -> Result<Duration> {
        humantime::parse_duration(&self.provider.refresh_interval).map_err(|e| {
            anyhow::anyhow!(
                "Invalid refresh_interval '{}': {}",
                self.provider.refresh_interval,
                e
            )
        })
    }

    /// Whether a region name is valid for request handling ("all" included)
    pub fn knows_region(&self, region: &str) -> bool {
        region == "all" || self.provider.regions.iter().any(|r| r == region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_historical_regions() {
        let config = Config::default();
        assert_eq!(
            config.provider.regions,
            vec!["local", "us_east", "us_west", "ca", "uk"]
        );
        assert_eq!(config.provider.window_count, 3);
        assert_eq!(config.provider.window_minutes, 720);
        assert_eq!(config.provider.group_size, 100);
        assert_eq!(config.web.port, 8000);
    }

    #[test]
    fn test_refresh_interval_parses() {
        let config = Config::default();
        assert_eq!(
            config.refresh_interval().unwrap(),
            Duration::from_secs(2 * 3600)
        );
    }

    #[test]
    fn test_number_offsets() {
        let config = Config::default();
        assert_eq!(config.provider.number_offsets.get("ca"), Some(&6000));
        assert_eq!(config.provider.number_offsets.get("uk"), Some(&7000));
        assert_eq!(config.provider.number_offsets.get("fr"), Some(&8000));
        assert_eq!(config.provider.number_offsets.get("local"), None);
    }

    #[test]
    fn test_knows_region() {
        let config = Config::default();
        assert!(config.knows_region("uk"));
        assert!(config.knows_region("all"));
        assert!(!config.knows_region("de"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [web]
            port = 9000

            [provider]
            regions = ["uk"]
            "#,
        )
        .unwrap();
        assert_eq!(config.web.port, 9000);
        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.provider.regions, vec!["uk"]);
        assert_eq!(config.provider.window_count, 3);
    }
}
