//! Reporting service for forecast export
//! Flattens a forecast into one CSV row per simulated day

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::ForecastResult;

/// Reporting service
pub struct ReportingService;

/// One day of the forecast report
#[derive(Debug, Serialize, PartialEq)]
pub struct ForecastReportRow {
    pub date: NaiveDate,
    pub ready_kg: f64,
    pub gdd_cum: f64,
    /// Planned harvest, 0 on days with no task
    pub harvest_kg: f64,
}

impl ReportingService {
    /// Join the daily curve with the harvest plan
    pub fn forecast_rows(result: &ForecastResult) -> Vec<ForecastReportRow> {
        let planned: HashMap<NaiveDate, f64> = result
            .harvest_plan
            .iter()
            .map(|task| (task.date, task.harvest_kg))
            .collect();

        result
            .daily
            .iter()
            .map(|day| ForecastReportRow {
                date: day.date,
                ready_kg: day.ready_kg,
                gdd_cum: day.gdd_cum,
                harvest_kg: planned.get(&day.date).copied().unwrap_or(0.0),
            })
            .collect()
    }

    /// Export forecast to CSV format
    pub fn forecast_csv(result: &ForecastResult) -> AppResult<String> {
        Self::export_to_csv(&Self::forecast_rows(result))
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
