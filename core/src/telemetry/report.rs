use serde::{Deserialize, Serialize};

use crate::classify::cargo::CargoDetection;
use crate::classify::target::ResolvedTarget;
use crate::prelude::TelemetryReport;
use crate::telemetry::store::TelemetryValue;

/// Table paths the robot code subscribes to. The key and array layouts
/// below are a hard compatibility contract; change nothing without also
/// changing the consumer.
pub const TARGETS_TABLE: &str = "vision/targets";
pub const CARGO_TABLE: &str = "vision/cargo";

/// Resolved left/right pair for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetReport {
    pub left: ResolvedTarget,
    pub right: ResolvedTarget,
}

impl TargetReport {
    pub fn sentinel_pair() -> Self {
        Self::default()
    }

    fn side_values(target: &ResolvedTarget) -> Vec<f64> {
        if target.is_sentinel() {
            return vec![0.0; 6];
        }
        vec![
            target.rect.center.x,
            target.rect.center.y,
            target.rect.width,
            target.rect.height,
            target.rect.angle,
            target.distance,
        ]
    }
}

impl TelemetryReport for TargetReport {
    fn table(&self) -> &'static str {
        TARGETS_TABLE
    }

    /// `contour_left` / `contour_right`, each
    /// `[centerX, centerY, width, height, angle, distance]`; an unmatched
    /// side is six zeros.
    fn entries(&self) -> Vec<(&'static str, TelemetryValue)> {
        vec![
            (
                "contour_left",
                TelemetryValue::NumberArray(Self::side_values(&self.left)),
            ),
            (
                "contour_right",
                TelemetryValue::NumberArray(Self::side_values(&self.right)),
            ),
        ]
    }
}

/// All cargo detections for one frame, ascending radius.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CargoReport {
    pub detections: Vec<CargoDetection>,
}

impl CargoReport {
    pub fn new(detections: Vec<CargoDetection>) -> Self {
        Self { detections }
    }
}

impl TelemetryReport for CargoReport {
    fn table(&self) -> &'static str {
        CARGO_TABLE
    }

    /// Parallel `x`/`y`/`r` arrays, one entry per detection.
    fn entries(&self) -> Vec<(&'static str, TelemetryValue)> {
        let x = self.detections.iter().map(|d| d.center.x).collect();
        let y = self.detections.iter().map(|d| d.center.y).collect();
        let r = self.detections.iter().map(|d| d.radius).collect();
        vec![
            ("x", TelemetryValue::NumberArray(x)),
            ("y", TelemetryValue::NumberArray(y)),
            ("r", TelemetryValue::NumberArray(r)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{OrientedRect, Point2};

    #[test]
    fn target_entries_follow_the_wire_layout() {
        let report = TargetReport {
            left: ResolvedTarget {
                rect: OrientedRect::new(Point2::new(180.0, 110.0), 8.0, 20.0, -75.5),
                matched: Some("left".to_string()),
                distance: 115.25,
            },
            right: ResolvedTarget::sentinel(),
        };
        let entries = report.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "contour_left");
        assert_eq!(
            entries[0].1,
            TelemetryValue::NumberArray(vec![180.0, 110.0, 8.0, 20.0, -75.5, 115.25])
        );
        assert_eq!(entries[1].0, "contour_right");
        assert_eq!(entries[1].1, TelemetryValue::NumberArray(vec![0.0; 6]));
    }

    #[test]
    fn sentinel_pair_is_all_zeros() {
        for (_, value) in TargetReport::sentinel_pair().entries() {
            assert_eq!(value, TelemetryValue::NumberArray(vec![0.0; 6]));
        }
    }

    #[test]
    fn cargo_entries_are_parallel_arrays() {
        let report = CargoReport::new(vec![
            CargoDetection {
                center: Point2::new(100.0, 50.0),
                radius: 8.0,
            },
            CargoDetection {
                center: Point2::new(60.0, 40.0),
                radius: 12.5,
            },
        ]);
        let entries = report.entries();
        assert_eq!(entries[0], ("x", TelemetryValue::NumberArray(vec![100.0, 60.0])));
        assert_eq!(entries[1], ("y", TelemetryValue::NumberArray(vec![50.0, 40.0])));
        assert_eq!(entries[2], ("r", TelemetryValue::NumberArray(vec![8.0, 12.5])));
    }

    #[test]
    fn empty_cargo_report_keeps_all_three_keys() {
        let entries = CargoReport::default().entries();
        assert_eq!(entries.len(), 3);
        for (_, value) in entries {
            assert_eq!(value, TelemetryValue::NumberArray(Vec::new()));
        }
    }
}
