//! Stage-transition pipelines driven by thermal accumulation

use serde::{Deserialize, Serialize};

use super::Stage;
use crate::error::ForecastError;

/// One step of the ripening pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
    /// Growing degree days needed to move the whole `from` population in a day
    pub threshold_gdd: f64,
}

impl Transition {
    pub const fn new(from: Stage, to: Stage, threshold_gdd: f64) -> Self {
        Self {
            from,
            to,
            threshold_gdd,
        }
    }

    /// Share of the `from` population that completes this transition
    /// given one day's thermal accumulation
    pub fn fraction(&self, daily_gdd: f64) -> f64 {
        (daily_gdd / self.threshold_gdd).clamp(0.0, 1.0)
    }
}

/// Tomato pipeline: immature → breaker → ripening → pink → mature
pub const SIX_STAGE_TRANSITIONS: [Transition; 4] = [
    Transition::new(Stage::Immature, Stage::Breaker, 70.0),
    Transition::new(Stage::Breaker, Stage::Ripening, 80.0),
    Transition::new(Stage::Ripening, Stage::Pink, 40.0),
    Transition::new(Stage::Pink, Stage::Mature, 55.0),
];

/// Coarse pipeline: immature → ripening → mature
pub const THREE_STAGE_TRANSITIONS: [Transition; 2] = [
    Transition::new(Stage::Immature, Stage::Ripening, 80.0),
    Transition::new(Stage::Ripening, Stage::Mature, 55.0),
];

/// An ordered, contiguous chain of transitions ending in a terminal stage
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    transitions: Vec<Transition>,
}

impl Pipeline {
    /// Build a custom pipeline
    ///
    /// Each transition must start where the previous one ended, stages must
    /// move forward, and thresholds must be positive.
    pub fn new(transitions: Vec<Transition>) -> Result<Self, ForecastError> {
        if transitions.is_empty() {
            return Err(ForecastError::invalid(
                "pipeline",
                "at least one transition is required",
            ));
        }
        for (i, transition) in transitions.iter().enumerate() {
            if !(transition.threshold_gdd.is_finite() && transition.threshold_gdd > 0.0) {
                return Err(ForecastError::invalid(
                    "pipeline",
                    format!("threshold for {} must be positive", transition.from),
                ));
            }
            if transition.to <= transition.from || !transition.from.is_fruit() {
                return Err(ForecastError::invalid(
                    "pipeline",
                    format!("{} -> {} does not move forward", transition.from, transition.to),
                ));
            }
            if i > 0 && transitions[i - 1].to != transition.from {
                return Err(ForecastError::invalid(
                    "pipeline",
                    format!("{} does not follow {}", transition.from, transitions[i - 1].to),
                ));
            }
        }
        Ok(Self { transitions })
    }

    pub fn six_stage() -> Self {
        Self {
            transitions: SIX_STAGE_TRANSITIONS.to_vec(),
        }
    }

    pub fn three_stage() -> Self {
        Self {
            transitions: THREE_STAGE_TRANSITIONS.to_vec(),
        }
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Stage where fruit ends up (harvestable)
    pub fn terminal(&self) -> Stage {
        self.transitions
            .last()
            .map(|t| t.to)
            .unwrap_or(Stage::Mature)
    }

    /// Stages that still feed a later stage
    pub fn non_terminal(&self) -> impl Iterator<Item = Stage> + '_ {
        self.transitions.iter().map(|t| t.from)
    }

    /// Every stage taking part in the pipeline, earliest first
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages: Vec<Stage> = self.non_terminal().collect();
        stages.push(self.terminal());
        stages
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.stages().contains(&stage)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::six_stage()
    }
}

/// Which built-in pipeline a forecast uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PipelineKind {
    #[default]
    SixStage,
    ThreeStage,
}

impl PipelineKind {
    pub fn pipeline(&self) -> Pipeline {
        match self {
            PipelineKind::SixStage => Pipeline::six_stage(),
            PipelineKind::ThreeStage => Pipeline::three_stage(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_stage_order() {
        let pipeline = Pipeline::six_stage();
        assert_eq!(
            pipeline.stages(),
            vec![
                Stage::Immature,
                Stage::Breaker,
                Stage::Ripening,
                Stage::Pink,
                Stage::Mature
            ]
        );
        assert_eq!(pipeline.terminal(), Stage::Mature);
        assert!(!pipeline.contains(Stage::Flower));
    }

    #[test]
    fn test_three_stage_skips_breaker_and_pink() {
        let pipeline = Pipeline::three_stage();
        assert!(!pipeline.contains(Stage::Breaker));
        assert!(!pipeline.contains(Stage::Pink));
        assert_eq!(pipeline.transitions()[0].threshold_gdd, 80.0);
    }

    #[test]
    fn test_fraction_saturates_at_threshold() {
        let t = Transition::new(Stage::Immature, Stage::Breaker, 70.0);
        assert_eq!(t.fraction(35.0), 0.5);
        assert_eq!(t.fraction(70.0), 1.0);
        assert_eq!(t.fraction(140.0), 1.0);
        assert_eq!(t.fraction(0.0), 0.0);
    }

    #[test]
    fn test_custom_pipeline_must_be_contiguous() {
        let gap = vec![
            Transition::new(Stage::Immature, Stage::Breaker, 70.0),
            Transition::new(Stage::Ripening, Stage::Mature, 55.0),
        ];
        assert!(Pipeline::new(gap).is_err());

        let backwards = vec![Transition::new(Stage::Mature, Stage::Pink, 10.0)];
        assert!(Pipeline::new(backwards).is_err());

        let ok = vec![Transition::new(Stage::Immature, Stage::Mature, 120.0)];
        assert_eq!(Pipeline::new(ok).unwrap().terminal(), Stage::Mature);
    }

    #[test]
    fn test_pipeline_kind_wire_names() {
        let kind: PipelineKind = serde_json::from_str("\"threeStage\"").unwrap();
        assert_eq!(kind, PipelineKind::ThreeStage);
        assert_eq!(kind.pipeline(), Pipeline::three_stage());
    }
}
