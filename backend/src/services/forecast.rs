//! Forecast service wiring weather, detection and the forecast engine

use shared::forecast::scheduler;
use shared::{
    run_forecast, summarize_analysis, validate_capacity, validate_controls,
    validate_forecast_series, validate_min_harvest_kg,
};
use tracing::instrument;
use validator::Validate;

use crate::config::ForecastConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    DailyForecastPoint, DetectionSummary, DistrictForecastRequest, DistrictForecastResponse,
    ForecastInput, ForecastRequest, ForecastResult, HarvestPlanRequest, HarvestSchedule,
    PlantAnalysis,
};
use crate::services::weather::WeatherService;

/// Forecast service
#[derive(Clone)]
pub struct ForecastService {
    config: ForecastConfig,
}

impl ForecastService {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Run a forecast on caller-supplied weather
    ///
    /// A threshold in the request wins over the configured one.
    pub fn forecast(&self, request: ForecastRequest) -> AppResult<ForecastResult> {
        let mut input = ForecastInput::new(request.stage_counts, request.weather, request.controls)
            .with_min_harvest_kg(request.min_harvest_kg.unwrap_or(self.config.min_harvest_kg));
        input.location = request.location;
        self.run(&input)
    }

    #[instrument(skip(self, input), fields(
        days = input.controls.forecast_days,
        weather_days = input.weather.len(),
        capacity = input.controls.harvest_capacity_kg_day,
    ))]
    fn run(&self, input: &ForecastInput) -> AppResult<ForecastResult> {
        let result = run_forecast(input)?;

        tracing::info!(
            ready_kg = result.final_ready_kg(),
            harvest_kg = result.total_harvest_kg(),
            tasks = result.harvest_plan.len(),
            "Forecast completed"
        );
        Ok(result)
    }

    /// Summarize classifier output into stage counts and a growth stage
    pub fn summarize(&self, analysis: &PlantAnalysis) -> DetectionSummary {
        let summary = summarize_analysis(analysis);
        if !summary.ignored_stages.is_empty() {
            tracing::warn!(
                ignored = ?summary.ignored_stages,
                "Classifier returned unrecognized stages"
            );
        }
        summary
    }

    /// Detect, fetch district weather and forecast in one go
    #[instrument(skip(self, weather, request), fields(district = %request.district))]
    pub async fn forecast_district(
        &self,
        weather: &WeatherService,
        request: DistrictForecastRequest,
    ) -> AppResult<DistrictForecastResponse> {
        request.validate()?;

        let detection = self.summarize(&request.analysis);

        let mut controls = request.controls;
        validate_controls(&controls)?;
        if controls.forecast_days > self.config.max_forecast_days {
            tracing::debug!(
                requested = controls.forecast_days,
                max = self.config.max_forecast_days,
                "Capping forecast horizon"
            );
            controls.forecast_days = self.config.max_forecast_days;
        }

        let district = request.district.trim().to_string();
        let daily_weather = weather
            .daily_forecast(&district, controls.forecast_days)
            .await?;

        let input = ForecastInput::new(detection.stage_counts, daily_weather.clone(), controls)
            .with_location(district)
            .with_min_harvest_kg(self.config.min_harvest_kg);
        let forecast = self.run(&input)?;

        Ok(DistrictForecastResponse {
            detection,
            weather: daily_weather,
            forecast,
        })
    }

    /// Schedule a ready-mass series that did not come from the simulator
    #[instrument(skip(self, request), fields(days = request.daily.len()))]
    pub fn harvest_plan(&self, request: HarvestPlanRequest) -> AppResult<HarvestSchedule> {
        request.validate()?;
        validate_capacity(request.harvest_capacity_kg_day)?;
        validate_forecast_series(&request.daily)?;

        let min_harvest_kg = request.min_harvest_kg.unwrap_or(self.config.min_harvest_kg);
        validate_min_harvest_kg(min_harvest_kg)?;

        warn_on_regressions(&request.daily);

        Ok(scheduler::schedule(
            &request.daily,
            request.harvest_capacity_kg_day,
            min_harvest_kg,
        ))
    }
}

fn warn_on_regressions(series: &[DailyForecastPoint]) {
    let regressions = scheduler::ready_regressions(series);
    if regressions > 0 {
        tracing::warn!(
            regressions,
            "Ready mass decreases in supplied series; decreases are ignored"
        );
    }
}
