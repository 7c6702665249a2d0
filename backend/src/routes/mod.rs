//! Route definitions for the harvest forecast API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/forecasts", forecast_routes())
        .route("/harvest-plans", post(handlers::create_harvest_plan))
        .route("/detections/summary", post(handlers::summarize_detection))
        .route("/weather/forecast", get(handlers::get_daily_forecast))
}

/// Forecast routes
fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_forecast))
        .route("/district", post(handlers::create_district_forecast))
}
