//! Harvest forecasting
//!
//! `run_forecast` is the single entry point used by the backend and the WASM
//! bindings. It validates the inputs, then runs the pure kernels in
//! [`simulator`], [`scheduler`] and [`metrics`].

pub mod metrics;
pub mod scheduler;
pub mod simulator;

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::models::{Controls, DailyWeather, ForecastResult, StageCounts};
use crate::validation;

pub use scheduler::{HarvestSchedule, SchedulerState, MIN_HARVEST_KG};

fn default_min_harvest_kg() -> f64 {
    MIN_HARVEST_KG
}

/// Everything needed for one forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastInput {
    pub stage_counts: StageCounts,
    pub weather: Vec<DailyWeather>,
    pub controls: Controls,
    /// District the weather was fetched for, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default = "default_min_harvest_kg")]
    pub min_harvest_kg: f64,
}

impl ForecastInput {
    pub fn new(stage_counts: StageCounts, weather: Vec<DailyWeather>, controls: Controls) -> Self {
        Self {
            stage_counts,
            weather,
            controls,
            location: None,
            min_harvest_kg: MIN_HARVEST_KG,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_min_harvest_kg(mut self, min_harvest_kg: f64) -> Self {
        self.min_harvest_kg = min_harvest_kg;
        self
    }

    /// Check every input before any arithmetic runs
    pub fn validate(&self) -> Result<(), ForecastError> {
        validation::validate_controls(&self.controls)?;
        validation::validate_min_harvest_kg(self.min_harvest_kg)?;
        validation::validate_stage_counts(&self.stage_counts, &self.controls.pipeline.pipeline())?;
        validation::validate_weather(&self.weather)
    }
}

/// Run a complete forecast: metrics, ripening simulation and harvest plan
pub fn run_forecast(input: &ForecastInput) -> Result<ForecastResult, ForecastError> {
    input.validate()?;

    let controls = &input.controls;
    let pipeline = controls.pipeline.pipeline();

    let yield_now_kg = metrics::yield_now_kg(&input.stage_counts, controls);
    let sellable_kg = metrics::sellable_kg(yield_now_kg, controls.post_harvest_loss_pct);

    let daily = simulator::simulate(&input.stage_counts, &input.weather, controls, &pipeline);
    let plan = scheduler::schedule(
        &daily,
        controls.harvest_capacity_kg_day,
        input.min_harvest_kg,
    );

    let notes = build_notes(input, &plan);

    Ok(ForecastResult {
        yield_now_kg,
        sellable_kg,
        daily,
        harvest_plan: plan.tasks,
        harvest_window: plan.window,
        notes,
    })
}

fn build_notes(input: &ForecastInput, plan: &HarvestSchedule) -> Vec<String> {
    let controls = &input.controls;
    let mut notes = Vec::new();

    match &input.location {
        Some(location) => notes.push(format!(
            "Forecast is based on a weather prediction for {}.",
            location
        )),
        None => notes.push("Forecast is based on the supplied weather series.".to_string()),
    }

    notes.push(format!(
        "Harvest plan is optimized for a capacity of {} kg/day.",
        controls.harvest_capacity_kg_day
    ));

    let days = simulator::simulated_days(controls.forecast_days, input.weather.len());
    if days < controls.forecast_days as usize {
        notes.push(format!(
            "Weather data covers {} of the {} requested days; the forecast stops at day {}.",
            days, controls.forecast_days, days
        ));
    }

    if plan.carryover_kg > input.min_harvest_kg {
        notes.push(format!(
            "{:.2} kg remains unharvested at the end of the horizon.",
            plan.carryover_kg
        ));
    }

    notes
}
