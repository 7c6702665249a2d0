//! HTTP handlers for weather endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::DailyWeather;
use crate::AppState;

/// Query parameters for a district forecast
#[derive(Debug, Deserialize)]
pub struct DistrictQuery {
    pub district: String,
    pub days: Option<u32>,
}

const DEFAULT_DAYS: u32 = 14;

/// Daily min/max temperatures for a district
pub async fn get_daily_forecast(
    State(state): State<AppState>,
    Query(query): Query<DistrictQuery>,
) -> AppResult<Json<Vec<DailyWeather>>> {
    let days = query.days.unwrap_or(DEFAULT_DAYS);
    let series = state.weather.daily_forecast(&query.district, days).await?;
    Ok(Json(series))
}
