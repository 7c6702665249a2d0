//! HTTP handlers for detection endpoints

use axum::{extract::State, Json};

use crate::error::ApiJson;
use crate::models::{DetectionSummary, PlantAnalysis};
use crate::AppState;

/// Turn classifier output into stage counts and a growth stage
pub async fn summarize_detection(
    State(state): State<AppState>,
    ApiJson(analysis): ApiJson<PlantAnalysis>,
) -> Json<DetectionSummary> {
    Json(state.forecasts.summarize(&analysis))
}
