//! Request and response models for the forecast API
//!
//! Re-exports models from the shared crate and adds backend-specific models

pub use shared::forecast::{ForecastInput, HarvestSchedule};
pub use shared::models::*;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Forecast on weather the caller already has
///
/// Same shape as [`ForecastInput`] except that an absent threshold falls
/// back to the server's configured one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub stage_counts: StageCounts,
    pub weather: Vec<DailyWeather>,
    pub controls: Controls,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_harvest_kg: Option<f64>,
}

/// Forecast for a district: weather is fetched server-side
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DistrictForecastRequest {
    pub analysis: PlantAnalysis,
    pub controls: Controls,
    #[validate(length(min = 1, max = 100, message = "District must be 1-100 characters"))]
    pub district: String,
}

/// What the dashboard needs after a district run
#[derive(Debug, Clone, Serialize)]
pub struct DistrictForecastResponse {
    pub detection: DetectionSummary,
    pub weather: Vec<DailyWeather>,
    pub forecast: ForecastResult,
}

/// Schedule an externally supplied ready-mass series
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HarvestPlanRequest {
    pub daily: Vec<DailyForecastPoint>,
    #[validate(range(min = 0.0, message = "Harvest capacity must not be negative"))]
    pub harvest_capacity_kg_day: f64,
    #[serde(default)]
    pub min_harvest_kg: Option<f64>,
}
