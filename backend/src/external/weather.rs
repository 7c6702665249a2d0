//! Weather API client for fetching weather data
//!
//! Integrates with the OpenWeatherMap 5-day / 3-hour forecast and folds it
//! into the daily min/max series the forecast engine consumes.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use shared::DailyWeather;

use crate::error::{AppError, AppResult};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    city: OWMCity,
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMCity {
    name: String,
    /// Shift from UTC in seconds
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    main: OWMMain,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp_min: f64,
    temp_max: f64,
}

impl WeatherClient {
    /// Create a WeatherClient against `base_url`, e.g. the public
    /// `https://api.openweathermap.org/data/2.5`
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch up to `days` days of daily min/max temperatures for a district
    pub async fn get_daily_forecast(
        &self,
        district: &str,
        days: usize,
    ) -> AppResult<Vec<DailyWeather>> {
        let url = format!("{}/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", district),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Weather API request failed: {}", e);
                AppError::WeatherServiceUnavailable
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("District '{}'", district)));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: OWMForecastResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse forecast response: {}", e))
        })?;

        tracing::debug!(
            city = %data.city.name,
            items = data.list.len(),
            "Received 3-hourly forecast"
        );

        Ok(aggregate_daily(&data, days))
    }
}

/// Fold 3-hourly items into one entry per local calendar date
///
/// Each day keeps the highest `temp_max` and the lowest `temp_min` seen in
/// its slots. Items with an unrepresentable timestamp are skipped.
fn aggregate_daily(data: &OWMForecastResponse, days: usize) -> Vec<DailyWeather> {
    let offset = i64::from(data.city.timezone);
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for item in &data.list {
        let Some(timestamp) = DateTime::<Utc>::from_timestamp(item.dt + offset, 0) else {
            continue;
        };
        by_date
            .entry(timestamp.date_naive())
            .and_modify(|(max, min)| {
                *max = max.max(item.main.temp_max);
                *min = min.min(item.main.temp_min);
            })
            .or_insert((item.main.temp_max, item.main.temp_min));
    }

    by_date
        .into_iter()
        .take(days)
        .map(|(date, (max, min))| DailyWeather::new(date, max, min))
        .collect()
}
