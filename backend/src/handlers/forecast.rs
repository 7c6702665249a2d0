//! HTTP handlers for forecast and harvest plan endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::{ApiJson, AppResult};
use crate::models::{
    DistrictForecastRequest, DistrictForecastResponse, ForecastRequest, HarvestPlanRequest,
    HarvestSchedule,
};
use crate::services::ReportingService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// Run a forecast on supplied weather
pub async fn create_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
    ApiJson(request): ApiJson<ForecastRequest>,
) -> AppResult<impl IntoResponse> {
    let result = state.forecasts.forecast(request)?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::forecast_csv(&result)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"harvest_forecast.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(result).into_response())
    }
}

/// Detect, fetch district weather and forecast
pub async fn create_district_forecast(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DistrictForecastRequest>,
) -> AppResult<Json<DistrictForecastResponse>> {
    let response = state
        .forecasts
        .forecast_district(&state.weather, request)
        .await?;
    Ok(Json(response))
}

/// Schedule harvests for a supplied ready-mass series
pub async fn create_harvest_plan(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<HarvestPlanRequest>,
) -> AppResult<Json<HarvestSchedule>> {
    let plan = state.forecasts.harvest_plan(request)?;
    Ok(Json(plan))
}
