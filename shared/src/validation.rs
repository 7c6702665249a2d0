//! Validation of forecast inputs
//!
//! The simulator and scheduler are pure arithmetic and trust their inputs.
//! Everything that reaches them from outside goes through these checks first.

use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ForecastError;
use crate::models::{Controls, DailyForecastPoint, DailyWeather, Pipeline, StageCounts};

// ============================================================================
// Controls
// ============================================================================

/// Validate farm and model parameters
pub fn validate_controls(controls: &Controls) -> Result<(), ForecastError> {
    let numeric = [
        ("avg_weight_g", controls.avg_weight_g),
        ("post_harvest_loss_pct", controls.post_harvest_loss_pct),
        ("gdd_base_c", controls.gdd_base_c),
        ("harvest_capacity_kg_day", controls.harvest_capacity_kg_day),
    ];
    // NaN slips through range comparisons, so check finiteness first
    for (field, value) in numeric {
        if !value.is_finite() {
            return Err(ForecastError::invalid(field, "must be a finite number"));
        }
    }

    controls.validate().map_err(|errors| first_violation(&errors))?;

    if controls.avg_weight_g <= 0.0 {
        return Err(ForecastError::invalid(
            "avg_weight_g",
            "must be greater than 0",
        ));
    }
    validate_capacity(controls.harvest_capacity_kg_day)
}

/// Validate a daily harvest capacity (kg/day)
pub fn validate_capacity(capacity_kg_day: f64) -> Result<(), ForecastError> {
    if !capacity_kg_day.is_finite() || capacity_kg_day <= 0.0 {
        return Err(ForecastError::invalid(
            "harvest_capacity_kg_day",
            "must be greater than 0",
        ));
    }
    Ok(())
}

/// Validate the smallest harvest worth scheduling (kg)
pub fn validate_min_harvest_kg(min_harvest_kg: f64) -> Result<(), ForecastError> {
    if !min_harvest_kg.is_finite() || min_harvest_kg < 0.0 {
        return Err(ForecastError::invalid(
            "min_harvest_kg",
            "must be a non-negative number",
        ));
    }
    Ok(())
}

fn first_violation(errors: &ValidationErrors) -> ForecastError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .first()
        .and_then(|(field, errs)| errs.first().map(|err| (*field, err)))
        .map(|(field, err)| ForecastError::invalid(field, describe(err)))
        .unwrap_or_else(|| ForecastError::invalid("controls", "invalid controls"))
}

fn describe(err: &ValidationError) -> String {
    match (err.params.get("min"), err.params.get("max")) {
        (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
        (Some(min), None) => format!("must be at least {}", min),
        (None, Some(max)) => format!("must be at most {}", max),
        (None, None) => format!("failed {} check", err.code),
    }
}

// ============================================================================
// Stage snapshot
// ============================================================================

/// Validate a stage snapshot against the pipeline that will simulate it
pub fn validate_stage_counts(
    counts: &StageCounts,
    pipeline: &Pipeline,
) -> Result<(), ForecastError> {
    for (stage, value) in counts.iter() {
        if !value.is_finite() || value < 0.0 {
            return Err(ForecastError::invalid(
                stage.as_str(),
                "count must be a non-negative number",
            ));
        }
        if stage.is_fruit() && value > 0.0 && !pipeline.contains(stage) {
            return Err(ForecastError::invalid(
                stage.as_str(),
                "stage is not part of the selected pipeline",
            ));
        }
    }
    Ok(())
}

// ============================================================================
// Time series
// ============================================================================

/// Validate a weather series: non-empty, finite, ordered by date
pub fn validate_weather(weather: &[DailyWeather]) -> Result<(), ForecastError> {
    if weather.is_empty() {
        return Err(ForecastError::EmptyWeather);
    }

    for day in weather {
        if !day.temp_max_c.is_finite() || !day.temp_min_c.is_finite() {
            return Err(ForecastError::invalid(
                "weather",
                format!("temperatures for {} must be finite", day.date),
            ));
        }
        if day.temp_max_c < day.temp_min_c {
            return Err(ForecastError::invalid(
                "weather",
                format!("maximum temperature for {} is below the minimum", day.date),
            ));
        }
    }

    if let Some(pair) = weather.windows(2).find(|pair| pair[1].date <= pair[0].date) {
        return Err(ForecastError::invalid(
            "weather",
            format!("{} does not follow {}", pair[1].date, pair[0].date),
        ));
    }
    Ok(())
}

/// Validate an externally supplied ready-mass series before scheduling it
///
/// Decreases in `ready_kg` are allowed here; the scheduler decides how to
/// treat them.
pub fn validate_forecast_series(series: &[DailyForecastPoint]) -> Result<(), ForecastError> {
    for point in series {
        if !point.ready_kg.is_finite() || point.ready_kg < 0.0 {
            return Err(ForecastError::invalid(
                "daily",
                format!("ready_kg for {} must be a non-negative number", point.date),
            ));
        }
    }

    if let Some(pair) = series.windows(2).find(|pair| pair[1].date <= pair[0].date) {
        return Err(ForecastError::invalid(
            "daily",
            format!("{} does not follow {}", pair[1].date, pair[0].date),
        ));
    }
    Ok(())
}
