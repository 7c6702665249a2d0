//! Farm and model parameters for a forecast run

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::PipelineKind;

/// Parameters that scale the simulation, owned by the caller
///
/// Range checks are declared here; the positivity and finiteness rules that
/// `validator` cannot express live in [`crate::validation::validate_controls`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    /// Average fruit weight in grams
    #[validate(range(min = 0.0, max = 5000.0))]
    pub avg_weight_g: f64,

    #[validate(range(min = 1, max = 1000000))]
    pub num_plants: u32,

    /// Post-harvest loss (0-100)
    #[validate(range(min = 0.0, max = 100.0))]
    pub post_harvest_loss_pct: f64,

    /// Requested horizon; weather data may shorten it
    #[validate(range(min = 1, max = 365))]
    pub forecast_days: u32,

    /// Base temperature for growing degree days
    #[validate(range(min = -50.0, max = 50.0))]
    pub gdd_base_c: f64,

    #[validate(range(min = 0.0))]
    pub harvest_capacity_kg_day: f64,

    #[serde(default)]
    pub pipeline: PipelineKind,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            avg_weight_g: 85.0,
            num_plants: 10,
            post_harvest_loss_pct: 7.0,
            forecast_days: 14,
            gdd_base_c: 10.0,
            harvest_capacity_kg_day: 20.0,
            pipeline: PipelineKind::SixStage,
        }
    }
}
