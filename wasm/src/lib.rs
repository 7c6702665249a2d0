//! WebAssembly module for the AgriVision harvest planner
//!
//! Provides client-side computation for:
//! - Harvest forecasts from a stage snapshot and weather series
//! - Detection summaries from classifier output
//! - Yield figures for the dashboard cards

use serde::Serialize;
use shared::forecast::{self, metrics, ForecastInput};
use shared::{Controls, ForecastResult, PlantAnalysis, Stage, StageCounts};
use wasm_bindgen::prelude::*;

fn to_js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to serialize result: {}", e))
}

#[cfg(target_arch = "wasm32")]
fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn console_warn(_message: &str) {}

fn forecast_json(input_json: &str) -> Result<String, String> {
    let input: ForecastInput =
        serde_json::from_str(input_json).map_err(|e| format!("Invalid forecast JSON: {}", e))?;
    let result = forecast::run_forecast(&input).map_err(|e| e.to_string())?;
    to_json(&result)
}

fn summary_json(analysis_json: &str) -> Result<String, String> {
    let analysis: PlantAnalysis = serde_json::from_str(analysis_json)
        .map_err(|e| format!("Invalid analysis JSON: {}", e))?;
    let summary = shared::summarize_analysis(&analysis);
    if !summary.ignored_stages.is_empty() {
        console_warn(&format!(
            "Ignoring unrecognized stages: {}",
            summary.ignored_stages.join(", ")
        ));
    }
    to_json(&summary)
}

fn context_lines(result_json: &str) -> Result<Vec<String>, String> {
    let result: ForecastResult = serde_json::from_str(result_json)
        .map_err(|e| format!("Invalid forecast result JSON: {}", e))?;
    Ok(result.context_lines())
}

/// Run a full forecast; input and output are JSON
#[wasm_bindgen]
pub fn run_forecast(input_json: &str) -> Result<String, JsValue> {
    forecast_json(input_json).map_err(to_js_error)
}

/// Summarize classifier output into stage counts and a growth stage
#[wasm_bindgen]
pub fn summarize_detection(analysis_json: &str) -> Result<String, JsValue> {
    summary_json(analysis_json).map_err(to_js_error)
}

/// Headline figures of a forecast result, one per line, for the chat assistant
#[wasm_bindgen]
pub fn forecast_context(result_json: &str) -> Result<String, JsValue> {
    context_lines(result_json)
        .map(|lines| lines.join("\n"))
        .map_err(to_js_error)
}

/// Current yield after post-harvest loss (kg)
#[wasm_bindgen]
pub fn calculate_sellable_yield(yield_now_kg: f64, post_harvest_loss_pct: f64) -> f64 {
    metrics::sellable_kg(yield_now_kg, post_harvest_loss_pct)
}

/// Mass of the mature fruit across all plants (kg)
#[wasm_bindgen]
pub fn calculate_current_yield(mature: f64, avg_weight_g: f64, num_plants: u32) -> f64 {
    let controls = Controls {
        avg_weight_g,
        num_plants,
        ..Controls::default()
    };
    metrics::yield_now_kg(&StageCounts::default().with(Stage::Mature, mature), &controls)
}

/// Growth stage label from fruit counts
#[wasm_bindgen]
pub fn classify_growth_stage(immature: f64, ripening: f64, mature: f64) -> String {
    let counts = StageCounts::default()
        .with(Stage::Immature, immature)
        .with(Stage::Ripening, ripening)
        .with(Stage::Mature, mature);
    shared::classify_growth_stage(&counts).to_string()
}
