//! Ripeness stages and per-stage fruit populations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ForecastError;

/// A ripeness stage reported by the plant classifier
///
/// Variants are declared in pipeline order, so `Ord` follows ripening order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Flower,
    Immature,
    Breaker,
    Ripening,
    Pink,
    Mature,
}

impl Stage {
    /// All recognized stages, earliest first
    pub const ALL: [Stage; 6] = [
        Stage::Flower,
        Stage::Immature,
        Stage::Breaker,
        Stage::Ripening,
        Stage::Pink,
        Stage::Mature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Flower => "flower",
            Stage::Immature => "immature",
            Stage::Breaker => "breaker",
            Stage::Ripening => "ripening",
            Stage::Pink => "pink",
            Stage::Mature => "mature",
        }
    }

    /// Flowers carry no harvestable mass
    pub fn is_fruit(&self) -> bool {
        !matches!(self, Stage::Flower)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == normalized)
            .ok_or_else(|| ForecastError::UnknownStage(s.trim().to_string()))
    }
}

/// Fruit population per stage
///
/// Populations are fractional because the simulator moves proportional
/// shares of a stage forward each day. Missing stages deserialize as 0;
/// unknown stage keys are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageCounts {
    pub flower: f64,
    pub immature: f64,
    pub breaker: f64,
    pub ripening: f64,
    pub pink: f64,
    pub mature: f64,
}

impl StageCounts {
    pub fn get(&self, stage: Stage) -> f64 {
        match stage {
            Stage::Flower => self.flower,
            Stage::Immature => self.immature,
            Stage::Breaker => self.breaker,
            Stage::Ripening => self.ripening,
            Stage::Pink => self.pink,
            Stage::Mature => self.mature,
        }
    }

    pub fn set(&mut self, stage: Stage, value: f64) {
        match stage {
            Stage::Flower => self.flower = value,
            Stage::Immature => self.immature = value,
            Stage::Breaker => self.breaker = value,
            Stage::Ripening => self.ripening = value,
            Stage::Pink => self.pink = value,
            Stage::Mature => self.mature = value,
        }
    }

    pub fn add(&mut self, stage: Stage, delta: f64) {
        self.set(stage, self.get(stage) + delta);
    }

    /// Builder-style setter, handy for fixtures
    pub fn with(mut self, stage: Stage, value: f64) -> Self {
        self.set(stage, value);
        self
    }

    /// Total fruit count, flowers excluded
    pub fn total_fruit(&self) -> f64 {
        Stage::ALL
            .iter()
            .filter(|stage| stage.is_fruit())
            .map(|stage| self.get(*stage))
            .sum()
    }

    /// Stages paired with their populations, in pipeline order
    pub fn iter(&self) -> impl Iterator<Item = (Stage, f64)> + '_ {
        Stage::ALL.into_iter().map(move |stage| (stage, self.get(stage)))
    }
}
