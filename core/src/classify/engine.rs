use log::debug;

use crate::prelude::{ClassifyPolicy, TelemetryReport};
use crate::segmentation::Contour;
use crate::telemetry::TelemetrySink;

/// Generic classification engine driving one policy.
///
/// The cargo and target pipelines share this loop; only the policy differs.
pub struct Classifier<P> {
    policy: P,
}

impl<P: ClassifyPolicy> Classifier<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Run one frame's candidates through fit, filter/rank, and resolve.
    /// Candidates the policy cannot fit are skipped; the frame itself always
    /// resolves, an empty candidate set included.
    pub fn classify(&self, contours: &[Contour]) -> P::Resolved {
        let mut fitted = Vec::with_capacity(contours.len());
        for (index, contour) in contours.iter().enumerate() {
            match self.policy.fit(contour) {
                Ok(primitive) => fitted.push(primitive),
                Err(err) => debug!("skipping candidate {}: {}", index, err),
            }
        }
        let ranked = self.policy.filter_and_rank(fitted);
        self.policy.resolve(ranked)
    }
}

/// Publish a resolved report under its table path, one put per key.
pub fn publish_report<R: TelemetryReport>(report: &R, sink: &dyn TelemetrySink) {
    for (key, value) in report.entries() {
        sink.put(report.table(), key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::cargo::CargoPolicy;
    use crate::classify::target::TargetPolicy;
    use crate::geometry::Point2;
    use crate::telemetry::{MemorySink, TelemetryValue};

    fn square(cx: f64, cy: f64, half: f64) -> Contour {
        Contour::new(vec![
            Point2::new(cx - half, cy - half),
            Point2::new(cx + half, cy - half),
            Point2::new(cx + half, cy + half),
            Point2::new(cx - half, cy + half),
        ])
    }

    fn collinear() -> Contour {
        Contour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ])
    }

    fn tilted_rect(cx: f64, cy: f64, width: f64, height: f64, angle: f64) -> Contour {
        let rad = angle.to_radians();
        let (ux, uy) = (rad.cos(), rad.sin());
        let (nx, ny) = (-uy, ux);
        let mut points = Vec::new();
        for (sw, sh) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            points.push(Point2::new(
                cx + sw * width * ux + sh * height * nx,
                cy + sw * width * uy + sh * height * ny,
            ));
        }
        Contour::new(points)
    }

    #[test]
    fn degenerate_candidates_are_skipped_not_fatal() {
        let classifier = Classifier::new(CargoPolicy);
        let report = classifier.classify(&[square(50.0, 50.0, 4.0), collinear(), square(90.0, 90.0, 6.0)]);
        assert_eq!(report.detections.len(), 2);
        assert!(report.detections[0].radius <= report.detections[1].radius);
    }

    #[test]
    fn empty_candidate_set_still_resolves() {
        let classifier = Classifier::new(CargoPolicy);
        let report = classifier.classify(&[]);
        assert!(report.detections.is_empty());

        let classifier = Classifier::new(TargetPolicy::default());
        let report = classifier.classify(&[]);
        assert!(report.left.is_sentinel());
        assert!(report.right.is_sentinel());
    }

    #[test]
    fn target_pipeline_classifies_a_tape_pair_end_to_end() {
        let classifier = Classifier::new(TargetPolicy::default());
        let contours = [
            tilted_rect(180.0, 110.0, 8.0, 20.0, -75.5),
            tilted_rect(240.0, 110.0, 8.0, 20.0, -14.5),
            collinear(),
        ];
        let report = classifier.classify(&contours);
        assert_eq!(report.left.matched.as_deref(), Some("left"));
        assert_eq!(report.right.matched.as_deref(), Some("right"));
        assert!((report.left.rect.angle + 75.5).abs() < 1e-6);
        assert!((report.right.rect.angle + 14.5).abs() < 1e-6);
        assert!(report.left.distance > 0.0);
    }

    #[test]
    fn publish_writes_every_report_key() {
        let sink = MemorySink::new();
        let classifier = Classifier::new(CargoPolicy);
        let report = classifier.classify(&[square(50.0, 50.0, 4.0)]);
        publish_report(&report, &sink);
        for key in ["x", "y", "r"] {
            match sink.get("vision/cargo", key) {
                Some(TelemetryValue::NumberArray(values)) => assert_eq!(values.len(), 1),
                other => panic!("unexpected value for {}: {:?}", key, other),
            }
        }
    }
}
