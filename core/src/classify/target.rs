use log::debug;
use serde::{Deserialize, Serialize};

use crate::classify::distance::RangingModel;
use crate::geometry::{min_area_rect, OrientedRect, Point2};
use crate::prelude::{ClassifyPolicy, ClassifyResult};
use crate::segmentation::Contour;
use crate::telemetry::report::TargetReport;

/// Named reference orientation a fitted rectangle is matched against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetClass {
    pub name: String,
    /// Reference angle in the fitter's degree convention.
    pub reference_angle: f64,
    /// Admissible deviation in degrees, exclusive.
    pub tolerance: f64,
    /// Calibration for this class's physical target.
    pub ranging: RangingModel,
}

impl TargetClass {
    /// Left strip of the 2019 vision tape pair.
    pub fn left() -> Self {
        Self {
            name: "left".to_string(),
            reference_angle: -75.5,
            tolerance: 10.0,
            ranging: RangingModel::default(),
        }
    }

    /// Right strip, mirrored.
    pub fn right() -> Self {
        Self {
            name: "right".to_string(),
            reference_angle: -14.5,
            tolerance: 10.0,
            ranging: RangingModel::default(),
        }
    }

    /// Deviation between a measured angle and this class's reference.
    pub fn deviation(&self, angle: f64) -> f64 {
        angle_diff(angle, self.reference_angle)
    }

    pub fn admits(&self, angle: f64) -> bool {
        self.deviation(angle) < self.tolerance
    }
}

/// Sign-loose angle difference: both operands are taken as absolute values
/// before differencing, so angles of opposite sign compare as close. The
/// robot code was calibrated against this exact comparison; keep it as is.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    (a.abs() - b.abs()).abs()
}

/// Configuration for the rectangle policy: the two target classes plus the
/// reference point candidates are ranked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetParams {
    pub left: TargetClass,
    pub right: TargetClass,
    /// Expected target location in the frame, not the image center.
    pub reference_point: Point2,
}

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            left: TargetClass::left(),
            right: TargetClass::right(),
            reference_point: Point2::new(208.0, 120.0),
        }
    }
}

/// Admitted rectangle carrying its rank key.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRect {
    pub rect: OrientedRect,
    /// Distance from the rectangle center to the reference point.
    pub ref_distance: f64,
}

/// One side of the resolved pair. A side with no satisfying candidate keeps
/// the all-zero rectangle and zero distance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub rect: OrientedRect,
    pub matched: Option<String>,
    pub distance: f64,
}

impl ResolvedTarget {
    pub fn sentinel() -> Self {
        Self::default()
    }

    pub fn is_sentinel(&self) -> bool {
        self.matched.is_none()
    }
}

/// Rectangle policy: minimum-area rectangle fits, angle gating against the
/// two target classes, best-per-class resolution into a left/right pair.
#[derive(Debug, Clone, Default)]
pub struct TargetPolicy {
    params: TargetParams,
}

impl TargetPolicy {
    pub fn new(params: TargetParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TargetParams {
        &self.params
    }

    /// Index of the admitted candidate with the smallest deviation from
    /// `class`. Ties keep the earlier candidate, which ranked closer to the
    /// reference point.
    fn best_match(&self, class: &TargetClass, ranked: &[RankedRect]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, candidate) in ranked.iter().enumerate() {
            let deviation = class.deviation(candidate.rect.angle);
            if deviation >= class.tolerance {
                continue;
            }
            if best.map_or(true, |(_, d)| deviation < d) {
                best = Some((index, deviation));
            }
        }
        best.map(|(index, _)| index)
    }

    fn resolve_side(&self, class: &TargetClass, rect: OrientedRect) -> ResolvedTarget {
        let (bw, bh) = rect.bounding_box();
        match class.ranging.estimate(bw, bh) {
            Ok(distance) => ResolvedTarget {
                rect,
                matched: Some(class.name.clone()),
                distance,
            },
            Err(err) => {
                debug!("{} target cannot be ranged: {}", class.name, err);
                ResolvedTarget::sentinel()
            }
        }
    }
}

impl ClassifyPolicy for TargetPolicy {
    type Primitive = OrientedRect;
    type Ranked = RankedRect;
    type Resolved = TargetReport;

    fn fit(&self, contour: &Contour) -> ClassifyResult<OrientedRect> {
        min_area_rect(&contour.points)
    }

    fn filter_and_rank(&self, fitted: Vec<OrientedRect>) -> Vec<RankedRect> {
        let mut ranked: Vec<RankedRect> = fitted
            .into_iter()
            .filter(|rect| {
                self.params.left.admits(rect.angle) || self.params.right.admits(rect.angle)
            })
            .map(|rect| RankedRect {
                ref_distance: rect.center.distance_to(self.params.reference_point),
                rect,
            })
            .collect();
        ranked.sort_by(|a, b| a.ref_distance.total_cmp(&b.ref_distance));
        ranked
    }

    fn resolve(&self, ranked: Vec<RankedRect>) -> TargetReport {
        let best_left = self.best_match(&self.params.left, &ranked);
        let best_right = self.best_match(&self.params.right, &ranked);
        // One candidate never fills both slots; the left slot wins the tie.
        let best_right = match (best_left, best_right) {
            (Some(l), Some(r)) if l == r => None,
            _ => best_right,
        };

        let left = match best_left {
            Some(i) => self.resolve_side(&self.params.left, ranked[i].rect),
            None => ResolvedTarget::sentinel(),
        };
        let right = match best_right {
            Some(i) => self.resolve_side(&self.params.right, ranked[i].rect),
            None => ResolvedTarget::sentinel(),
        };
        TargetReport { left, right }
    }
}
