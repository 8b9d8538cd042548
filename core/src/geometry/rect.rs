use serde::{Deserialize, Serialize};

use crate::geometry::hull::convex_hull;
use crate::geometry::point::Point2;
use crate::prelude::{ClassifyError, ClassifyResult};

/// Minimum-area rectangle fitted around a contour.
///
/// Angle convention follows the legacy imaging libraries the robot code was
/// calibrated against: degrees in `[-90, 0)`, where `width` is the extent
/// along the side whose undirected direction lies in `[90, 180)` degrees and
/// `angle` is that direction minus 180. An axis-aligned rectangle therefore
/// reports `-90` with its extents swapped relative to the intuitive reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    pub center: Point2,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
}

impl OrientedRect {
    pub fn new(center: Point2, width: f64, height: f64, angle: f64) -> Self {
        Self {
            center,
            width,
            height,
            angle,
        }
    }

    /// Extents of the axis-aligned bounding box, unrounded.
    pub fn bounding_box(&self) -> (f64, f64) {
        let rad = self.angle.to_radians();
        let cos = rad.cos().abs();
        let sin = rad.sin().abs();
        (
            self.width * cos + self.height * sin,
            self.width * sin + self.height * cos,
        )
    }
}

/// Minimum-area oriented rectangle via rotating calipers over the convex
/// hull. One hull edge is flush with the optimal rectangle, so every edge
/// orientation is tried and the smallest area wins; ties keep the earliest
/// edge, making the result deterministic. Degenerate contours are rejected.
pub fn min_area_rect(points: &[Point2]) -> ClassifyResult<OrientedRect> {
    let hull = convex_hull(points);
    if hull.len() < 3 {
        return Err(ClassifyError::DegenerateShape(format!(
            "{} points with hull of {}",
            points.len(),
            hull.len()
        )));
    }

    let mut best_area = f64::INFINITY;
    let mut best = (1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        let len = a.distance_to(b);
        if len == 0.0 {
            continue;
        }
        let ux = (b.x - a.x) / len;
        let uy = (b.y - a.y) / len;

        let mut smin = f64::INFINITY;
        let mut smax = f64::NEG_INFINITY;
        let mut tmin = f64::INFINITY;
        let mut tmax = f64::NEG_INFINITY;
        for p in &hull {
            let s = p.x * ux + p.y * uy;
            let t = -p.x * uy + p.y * ux;
            smin = smin.min(s);
            smax = smax.max(s);
            tmin = tmin.min(t);
            tmax = tmax.max(t);
        }
        let area = (smax - smin) * (tmax - tmin);
        if area < best_area {
            best_area = area;
            best = (ux, uy, smin, smax, tmin, tmax);
        }
    }

    let (ux, uy, smin, smax, tmin, tmax) = best;
    let mid_s = (smin + smax) / 2.0;
    let mid_t = (tmin + tmax) / 2.0;
    let center = Point2::new(mid_s * ux - mid_t * uy, mid_s * uy + mid_t * ux);
    let along = smax - smin;
    let across = tmax - tmin;

    let mut dir = uy.atan2(ux).to_degrees() % 180.0;
    if dir < 0.0 {
        dir += 180.0;
    }
    let (width, height, side_dir) = if dir >= 90.0 {
        (along, across, dir)
    } else {
        (across, along, dir + 90.0)
    };
    Ok(OrientedRect::new(center, width, height, side_dir - 180.0))
}
