use serde::{Deserialize, Serialize};

use crate::geometry::{min_enclosing_circle, Circle, Point2};
use crate::prelude::{ClassifyPolicy, ClassifyResult};
use crate::segmentation::Contour;
use crate::telemetry::report::CargoReport;

/// One detected cargo piece: the minimal enclosing circle of a contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CargoDetection {
    pub center: Point2,
    pub radius: f64,
}

/// Circle policy: no admissibility gate, every fitted candidate is reported,
/// smallest radius first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CargoPolicy;

impl ClassifyPolicy for CargoPolicy {
    type Primitive = Circle;
    type Ranked = Circle;
    type Resolved = CargoReport;

    fn fit(&self, contour: &Contour) -> ClassifyResult<Circle> {
        min_enclosing_circle(&contour.points)
    }

    fn filter_and_rank(&self, mut fitted: Vec<Circle>) -> Vec<Circle> {
        // Stable, so equal radii keep their candidate order.
        fitted.sort_by(|a, b| a.radius.total_cmp(&b.radius));
        fitted
    }

    fn resolve(&self, ranked: Vec<Circle>) -> CargoReport {
        CargoReport::new(
            ranked
                .into_iter()
                .map(|c| CargoDetection {
                    center: c.center,
                    radius: c.radius,
                })
                .collect(),
        )
    }
}
