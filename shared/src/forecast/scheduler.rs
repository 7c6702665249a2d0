//! Greedy capacity-bounded harvest scheduling
//!
//! Each day the newly ripened mass joins a backlog and as much of the
//! backlog as the daily capacity allows is picked. Whatever is left carries
//! over to the next day.

use serde::{Deserialize, Serialize};

use crate::models::{DailyForecastPoint, HarvestTask, HarvestWindow};

/// Harvests at or below this mass (kg) are not worth a trip to the field
pub const MIN_HARVEST_KG: f64 = 0.1;

/// Carried between days
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SchedulerState {
    /// Ripe mass waiting to be picked (kg)
    pub backlog_kg: f64,
    /// Highest cumulative ready mass seen so far (kg)
    pub last_ready_kg: f64,
}

/// A full harvest plan for one forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestSchedule {
    pub tasks: Vec<HarvestTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<HarvestWindow>,
    /// Backlog still unpicked after the last day (kg)
    pub carryover_kg: f64,
}

impl HarvestSchedule {
    pub fn total_harvest_kg(&self) -> f64 {
        self.tasks.iter().map(|task| task.harvest_kg).sum()
    }
}

/// Schedule one day
///
/// Only growth of the cumulative ready mass beyond its previous high feeds
/// the backlog, so a dip in an externally supplied series neither drains the
/// backlog nor gets counted twice when the series climbs back.
pub fn step(
    state: SchedulerState,
    point: &DailyForecastPoint,
    capacity_kg: f64,
    min_harvest_kg: f64,
) -> (SchedulerState, Option<HarvestTask>) {
    let newly_ready = (point.ready_kg - state.last_ready_kg).max(0.0);
    let mut backlog_kg = state.backlog_kg + newly_ready;

    let can_harvest = backlog_kg.min(capacity_kg);
    let task = if can_harvest > min_harvest_kg {
        backlog_kg -= can_harvest;
        Some(HarvestTask {
            date: point.date,
            harvest_kg: can_harvest,
        })
    } else {
        None
    };

    let next = SchedulerState {
        backlog_kg,
        last_ready_kg: state.last_ready_kg.max(point.ready_kg),
    };
    (next, task)
}

/// Build the harvest plan for a chronologically ordered series
pub fn schedule(
    series: &[DailyForecastPoint],
    capacity_kg: f64,
    min_harvest_kg: f64,
) -> HarvestSchedule {
    let (state, tasks) = series.iter().fold(
        (SchedulerState::default(), Vec::new()),
        |(state, mut tasks), point| {
            let (next, task) = step(state, point, capacity_kg, min_harvest_kg);
            tasks.extend(task);
            (next, tasks)
        },
    );

    HarvestSchedule {
        window: harvest_window(&tasks),
        tasks,
        carryover_kg: state.backlog_kg,
    }
}

/// First and last task dates, in plan order
pub fn harvest_window(tasks: &[HarvestTask]) -> Option<HarvestWindow> {
    match (tasks.first(), tasks.last()) {
        (Some(first), Some(last)) => Some(HarvestWindow::new(first.date, last.date)),
        _ => None,
    }
}

/// Count day-over-day decreases in cumulative ready mass
///
/// The simulator never produces these; a non-zero count means the series
/// came from somewhere else and the dips were ignored while scheduling.
pub fn ready_regressions(series: &[DailyForecastPoint]) -> usize {
    series
        .windows(2)
        .filter(|pair| pair[1].ready_kg < pair[0].ready_kg)
        .count()
}
