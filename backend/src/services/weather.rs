//! Weather service supplying daily min/max series to the forecast engine

use chrono::{Days, NaiveDate, Utc};
use shared::DailyWeather;
use tracing::instrument;

use crate::config::{WeatherConfig, WeatherProvider};
use crate::error::{AppError, AppResult};
use crate::external::WeatherClient;

/// Longest series any provider will return
pub const MAX_WEATHER_DAYS: u32 = 30;

/// Weather service for fetching daily forecasts
#[derive(Clone)]
pub struct WeatherService {
    provider: WeatherProvider,
    synthetic: SyntheticWeather,
    weather_client: Option<WeatherClient>,
}

/// Deterministic weather around a fixed base, for demos and offline use
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticWeather {
    pub base_max_c: f64,
    pub base_min_c: f64,
}

impl SyntheticWeather {
    /// Daily swing applied on top of the base temperatures (°C)
    const AMPLITUDE_C: f64 = 2.0;

    /// `days` consecutive days starting at `start`
    ///
    /// Temperatures oscillate by ±2 °C with a weekly period and are rounded
    /// to one decimal.
    pub fn series(&self, start: NaiveDate, days: u32) -> Vec<DailyWeather> {
        (0..days)
            .filter_map(|i| {
                let date = start.checked_add_days(Days::new(u64::from(i)))?;
                let swing = Self::AMPLITUDE_C
                    * (f64::from(i) * std::f64::consts::TAU / 7.0).sin();
                Some(DailyWeather::new(
                    date,
                    round1(self.base_max_c + swing),
                    round1(self.base_min_c + swing),
                ))
            })
            .collect()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Keep requests inside what the providers can serve
pub fn clamp_days(days: u32) -> u32 {
    days.clamp(1, MAX_WEATHER_DAYS)
}

impl WeatherService {
    pub fn new(config: &WeatherConfig) -> Self {
        let weather_client = match config.provider {
            WeatherProvider::OpenWeatherMap => Some(WeatherClient::with_base_url(
                config.api_key.clone(),
                config.api_endpoint.clone(),
            )),
            WeatherProvider::Synthetic => None,
        };

        Self {
            provider: config.provider,
            synthetic: SyntheticWeather {
                base_max_c: config.synthetic_max_c,
                base_min_c: config.synthetic_min_c,
            },
            weather_client,
        }
    }

    /// Daily forecast for a district, starting today
    #[instrument(skip(self))]
    pub async fn daily_forecast(&self, district: &str, days: u32) -> AppResult<Vec<DailyWeather>> {
        let district = district.trim();
        if district.is_empty() {
            return Err(AppError::Validation {
                field: "district".to_string(),
                message: "District is required".to_string(),
            });
        }

        let days = clamp_days(days);
        let series = match self.provider {
            WeatherProvider::Synthetic => {
                self.synthetic.series(Utc::now().date_naive(), days)
            }
            WeatherProvider::OpenWeatherMap => {
                let client = self.weather_client.as_ref().ok_or_else(|| {
                    AppError::Configuration("Weather API client not configured".to_string())
                })?;
                client.get_daily_forecast(district, days as usize).await?
            }
        };

        if series.is_empty() {
            tracing::warn!(district, "Weather provider returned no days");
            return Err(AppError::WeatherServiceUnavailable);
        }

        tracing::info!(
            district,
            provider = self.provider.as_str(),
            days = series.len(),
            "Fetched daily weather"
        );
        Ok(series)
    }
}
