//! Plant classifier output and the detection summary derived from it

use serde::{Deserialize, Serialize};

use super::{Stage, StageCounts};
use crate::forecast::metrics::avg_bbox_area;

/// Raw result of the plant-image classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantAnalysis {
    /// e.g. "Tomato", "Lemon"
    pub plant_type: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub stages: Vec<StageTally>,
    /// Per-fruit detections; when present they are the source of the counts
    #[serde(default)]
    pub boxes: Vec<DetectionBox>,
}

/// One stage label and how many items the classifier put in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTally {
    pub stage: String,
    pub count: f64,
}

/// Bounding box in image-relative coordinates `[x1, y1, x2, y2]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionBox {
    #[serde(rename = "box")]
    pub bounds: [f64; 4],
    pub stage: Stage,
}

impl DetectionBox {
    pub fn area(&self) -> f64 {
        let [x1, y1, x2, y2] = self.bounds;
        ((x2 - x1) * (y2 - y1)).abs()
    }
}

/// Overall ripeness label for the plant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GrowthStage {
    Immature,
    Ripening,
    Mature,
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrowthStage::Immature => write!(f, "Immature"),
            GrowthStage::Ripening => write!(f, "Ripening"),
            GrowthStage::Mature => write!(f, "Mature"),
        }
    }
}

/// Classify the plant by majority-style thresholds over fruit detections
///
/// `Mature` when mature fruit is more than half of the detections,
/// `Ripening` when ripening fruit is more than a third, else `Immature`.
/// Compared by multiplication so an empty snapshot is simply `Immature`.
pub fn classify_growth_stage(counts: &StageCounts) -> GrowthStage {
    let detections = counts.total_fruit();
    if counts.mature * 2.0 > detections {
        GrowthStage::Mature
    } else if counts.ripening * 3.0 > detections {
        GrowthStage::Ripening
    } else {
        GrowthStage::Immature
    }
}

/// What the dashboard shows after an image is analyzed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionSummary {
    pub plant_type: String,
    pub summary: Option<String>,
    pub stage_counts: StageCounts,
    /// Fruit detections, flowers excluded
    pub detections: f64,
    pub growth_stage: GrowthStage,
    /// Mean box area in image-relative units, 0 without boxes
    pub avg_bbox_area: f64,
    /// Stage labels the classifier produced that are not recognized
    pub ignored_stages: Vec<String>,
}

/// Fold the classifier's output into a typed snapshot
///
/// With bounding boxes, each box adds one to its stage and the tallies are
/// not read. Otherwise tally labels are matched case-insensitively and
/// repeated labels accumulate. Unrecognized labels are dropped from the
/// counts and reported back.
pub fn summarize_analysis(analysis: &PlantAnalysis) -> DetectionSummary {
    let mut stage_counts = StageCounts::default();
    let mut ignored_stages = Vec::new();

    if analysis.boxes.is_empty() {
        for tally in &analysis.stages {
            match tally.stage.parse::<Stage>() {
                Ok(stage) => stage_counts.add(stage, tally.count),
                Err(_) => ignored_stages.push(tally.stage.trim().to_string()),
            }
        }
    } else {
        for detection in &analysis.boxes {
            stage_counts.add(detection.stage, 1.0);
        }
    }

    DetectionSummary {
        plant_type: analysis.plant_type.clone(),
        summary: analysis.summary.clone(),
        detections: stage_counts.total_fruit(),
        growth_stage: classify_growth_stage(&stage_counts),
        avg_bbox_area: avg_bbox_area(&analysis.boxes),
        stage_counts,
        ignored_stages,
    }
}
