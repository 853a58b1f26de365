//! Configuration structures.

use serde::{Deserialize, Serialize};

use dca_core::types::Frequency;
use dca_engine::MatchMode;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "dca-sim".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Price cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Directory holding the file-backed cache
    pub dir: String,
    /// Capacity budget in bytes
    pub max_size_bytes: u64,
    /// TTL for historical series, seconds
    pub historical_ttl_secs: u64,
    /// TTL for spot prices, seconds
    pub spot_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: ".dca-cache".to_string(),
            max_size_bytes: 5 * 1024 * 1024,
            historical_ttl_secs: 24 * 3600,
            spot_ttl_secs: 60,
        }
    }
}

/// Remote price source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    pub base_url: String,
    /// Minimum spacing between requests, milliseconds
    pub min_request_interval_ms: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            min_request_interval_ms: 1500,
        }
    }
}

/// Simulation defaults applied when the caller omits a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub default_amount: f64,
    pub default_frequency: Frequency,
    pub match_mode: MatchMode,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            default_amount: 100.0,
            default_frequency: Frequency::Weekly,
            match_mode: MatchMode::Nearest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.simulation.default_frequency, Frequency::Weekly);
        assert_eq!(config.simulation.match_mode, MatchMode::Nearest);
        assert_eq!(config.cache.spot_ttl_secs, 60);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let raw = r#"
            [cache]
            dir = "/tmp/dca"
            max_size_bytes = 1048576
            historical_ttl_secs = 3600
            spot_ttl_secs = 30

            [simulation]
            default_amount = 250.0
            default_frequency = "monthly"
            match_mode = "forward-only"
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.cache.dir, "/tmp/dca");
        assert_eq!(config.simulation.default_frequency, Frequency::Monthly);
        assert_eq!(config.simulation.match_mode, MatchMode::ForwardOnly);
        // Untouched sections fall back to defaults
        assert_eq!(config.logging.level, "info");
    }
}
