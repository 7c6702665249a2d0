//! Configuration management for the AgriVision harvest forecast server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files `config/{environment}.toml`, where the environment
//!    comes from `AGRIVISION_ENVIRONMENT` (default `development`)
//! 3. Environment variable overrides of the form `AGRIVISION__SECTION__KEY`,
//!    e.g. `AGRIVISION__FORECAST__MAX_FORECAST_DAYS=10`

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// Forecast engine configuration
    pub forecast: ForecastConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

/// Where daily weather comes from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeatherProvider {
    /// Deterministic series, no network access
    Synthetic,
    OpenWeatherMap,
}

impl WeatherProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherProvider::Synthetic => "synthetic",
            WeatherProvider::OpenWeatherMap => "openweathermap",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    pub provider: WeatherProvider,

    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: String,

    /// Base daily maximum for the synthetic provider (°C)
    pub synthetic_max_c: f64,

    /// Base daily minimum for the synthetic provider (°C)
    pub synthetic_min_c: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Smallest harvest worth scheduling (kg)
    pub min_harvest_kg: f64,

    /// Upper bound on days fetched for district forecasts
    pub max_forecast_days: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRIVISION_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        Self::from_sources(&environment, env_overrides())
    }

    fn from_sources(environment: &str, overrides: Environment) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.provider", "synthetic")?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.api_key", "")?
            .set_default("weather.synthetic_max_c", 32.0)?
            .set_default("weather.synthetic_min_c", 22.0)?
            .set_default("forecast.min_harvest_kg", shared::forecast::MIN_HARVEST_KG)?
            .set_default("forecast.max_forecast_days", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(overrides)
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Reject combinations the server cannot run with
    fn check(&self) -> Result<(), ConfigError> {
        if self.weather.provider == WeatherProvider::OpenWeatherMap
            && self.weather.api_key.trim().is_empty()
        {
            return Err(ConfigError::Message(
                "weather.api_key is required for the openweathermap provider".to_string(),
            ));
        }
        if shared::validate_min_harvest_kg(self.forecast.min_harvest_kg).is_err() {
            return Err(ConfigError::Message(
                "forecast.min_harvest_kg must be a non-negative number".to_string(),
            ));
        }
        if self.forecast.max_forecast_days == 0 {
            return Err(ConfigError::Message(
                "forecast.max_forecast_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// `AGRIVISION__SECTION__KEY` variables
fn env_overrides() -> Environment {
    Environment::with_prefix("AGRIVISION")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            provider: WeatherProvider::Synthetic,
            api_endpoint: "https://api.openweathermap.org/data/2.5".to_string(),
            api_key: String::new(),
            synthetic_max_c: 32.0,
            synthetic_min_c: 22.0,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_harvest_kg: shared::forecast::MIN_HARVEST_KG,
            max_forecast_days: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            weather: WeatherConfig::default(),
            forecast: ForecastConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_provider_names() {
        let provider: WeatherProvider = serde_json::from_str("\"openweathermap\"").unwrap();
        assert_eq!(provider, WeatherProvider::OpenWeatherMap);
        assert_eq!(WeatherProvider::Synthetic.as_str(), "synthetic");
    }

    #[test]
    fn test_openweathermap_requires_key() {
        let mut config = Config::default();
        config.weather.provider = WeatherProvider::OpenWeatherMap;
        assert!(config.check().is_err());

        config.weather.api_key = "secret".to_string();
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_double_underscore_overrides() {
        let vars: HashMap<String, String> = [
            ("AGRIVISION__FORECAST__MAX_FORECAST_DAYS", "10"),
            ("AGRIVISION__WEATHER__SYNTHETIC_MAX_C", "35.5"),
            ("AGRIVISION_SERVER__PORT", "9999"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::from_sources("test", env_overrides().source(Some(vars))).unwrap();
        assert_eq!(config.environment, "test");
        assert_eq!(config.forecast.max_forecast_days, 10);
        assert_eq!(config.weather.synthetic_max_c, 35.5);
        // single underscore after the prefix is not an override
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let mut config = Config::default();
        config.forecast.min_harvest_kg = -1.0;
        assert!(config.check().is_err());
    }
}
