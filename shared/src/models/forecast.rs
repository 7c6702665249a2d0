//! Forecast output models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::DateRange;

/// Simulated state of one forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastPoint {
    pub date: NaiveDate,
    /// Cumulative mass that has reached the terminal stage (kg)
    pub ready_kg: f64,
    /// Growing degree days accumulated since the start of the run
    pub gdd_cum: f64,
}

/// Mass to pick on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestTask {
    pub date: NaiveDate,
    pub harvest_kg: f64,
}

/// First and last day with a scheduled harvest
pub type HarvestWindow = DateRange;

/// Everything a forecast run hands to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Mass already ripe at capture time (kg)
    pub yield_now_kg: f64,
    /// `yield_now_kg` after post-harvest loss (kg)
    pub sellable_kg: f64,
    pub daily: Vec<DailyForecastPoint>,
    pub harvest_plan: Vec<HarvestTask>,
    #[serde(
        rename = "harvestWindow",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub harvest_window: Option<HarvestWindow>,
    pub notes: Vec<String>,
}

impl ForecastResult {
    /// Sum of the harvest plan (kg)
    pub fn total_harvest_kg(&self) -> f64 {
        self.harvest_plan.iter().map(|task| task.harvest_kg).sum()
    }

    /// Ready mass on the last simulated day
    pub fn final_ready_kg(&self) -> f64 {
        self.daily.last().map(|day| day.ready_kg).unwrap_or(0.0)
    }

    /// Headline figures as plain lines for the insights assistant,
    /// two decimals with units
    pub fn context_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Current yield: {:.2} kg", self.yield_now_kg),
            format!("Sellable yield: {:.2} kg", self.sellable_kg),
            format!(
                "Ready by day {}: {:.2} kg",
                self.daily.len(),
                self.final_ready_kg()
            ),
            format!("Total forecasted harvest: {:.2} kg", self.total_harvest_kg()),
        ];

        match &self.harvest_window {
            Some(window) => lines.push(format!(
                "Harvest window: {} to {}",
                window.start, window.end
            )),
            None => lines.push("Harvest window: none scheduled".to_string()),
        }

        lines.extend(
            self.harvest_plan
                .iter()
                .map(|task| format!("Harvest {}: {:.2} kg", task.date, task.harvest_kg)),
        );
        lines
    }
}
