//! Point-in-time yield figures for the dashboard

use crate::models::{Controls, DetectionBox, StageCounts};

/// Mass of `count` fruit per plant across all plants (kg)
pub fn fruit_mass_kg(count: f64, controls: &Controls) -> f64 {
    count * controls.avg_weight_g / 1000.0 * f64::from(controls.num_plants)
}

/// Mass already fully ripe at capture time (kg)
pub fn yield_now_kg(counts: &StageCounts, controls: &Controls) -> f64 {
    fruit_mass_kg(counts.mature, controls)
}

/// Current yield after post-harvest loss (kg)
pub fn sellable_kg(yield_now_kg: f64, post_harvest_loss_pct: f64) -> f64 {
    yield_now_kg * (1.0 - post_harvest_loss_pct / 100.0)
}

/// Mean bounding-box area, 0 when nothing was detected
pub fn avg_bbox_area(boxes: &[DetectionBox]) -> f64 {
    if boxes.is_empty() {
        return 0.0;
    }
    boxes.iter().map(DetectionBox::area).sum::<f64>() / boxes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stage;

    #[test]
    fn test_yield_now() {
        let counts = StageCounts::default()
            .with(Stage::Mature, 12.0)
            .with(Stage::Pink, 30.0);
        let controls = Controls {
            avg_weight_g: 85.0,
            num_plants: 10,
            ..Controls::default()
        };
        assert!((yield_now_kg(&counts, &controls) - 10.2).abs() < 1e-9);
    }

    #[test]
    fn test_sellable_yield() {
        assert_eq!(sellable_kg(5.0, 20.0), 4.0);
        assert_eq!(sellable_kg(5.0, 0.0), 5.0);
        assert_eq!(sellable_kg(0.0, 7.0), 0.0);
    }

    #[test]
    fn test_avg_bbox_area_empty() {
        assert_eq!(avg_bbox_area(&[]), 0.0);
    }

    #[test]
    fn test_avg_bbox_area() {
        let boxes = [
            DetectionBox {
                bounds: [0.0, 0.0, 0.1, 0.1],
                stage: Stage::Mature,
            },
            DetectionBox {
                bounds: [0.5, 0.5, 0.8, 0.8],
                stage: Stage::Immature,
            },
        ];
        assert!((avg_bbox_area(&boxes) - 0.05).abs() < 1e-9);
    }
}
