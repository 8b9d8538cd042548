use serde::{Deserialize, Serialize};

use crate::geometry::hull::convex_hull;
use crate::geometry::point::Point2;
use crate::prelude::{ClassifyError, ClassifyResult};

/// Slack when testing point containment, so boundary points survive the
/// rounding introduced by circumcenter arithmetic.
const CONTAINS_EPS: f64 = 1e-7;

/// Circle in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    fn contains(&self, p: Point2) -> bool {
        self.center.distance_to(p) <= self.radius + CONTAINS_EPS
    }
}

/// Minimal enclosing circle of a contour.
///
/// Runs the incremental Welzl scheme over the convex hull vertices in a
/// fixed order, so the result is deterministic for a given input. Inputs
/// whose hull collapses below a triangle are rejected rather than fitted.
pub fn min_enclosing_circle(points: &[Point2]) -> ClassifyResult<Circle> {
    let hull = convex_hull(points);
    if hull.len() < 3 {
        return Err(ClassifyError::DegenerateShape(format!(
            "{} points with hull of {}",
            points.len(),
            hull.len()
        )));
    }
    Ok(enclosing(&hull))
}

fn enclosing(pts: &[Point2]) -> Circle {
    let mut circle = diameter_circle(pts[0], pts[1]);
    for i in 2..pts.len() {
        if !circle.contains(pts[i]) {
            circle = enclosing_with_one(&pts[..i], pts[i]);
        }
    }
    circle
}

fn enclosing_with_one(pts: &[Point2], q: Point2) -> Circle {
    let mut circle = diameter_circle(pts[0], q);
    for j in 1..pts.len() {
        if !circle.contains(pts[j]) {
            circle = enclosing_with_two(&pts[..j], pts[j], q);
        }
    }
    circle
}

fn enclosing_with_two(pts: &[Point2], p: Point2, q: Point2) -> Circle {
    let mut circle = diameter_circle(p, q);
    for &r in pts {
        if !circle.contains(r) {
            circle = circumcircle(p, q, r);
        }
    }
    circle
}

fn diameter_circle(a: Point2, b: Point2) -> Circle {
    let center = Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    Circle::new(center, a.distance_to(b) / 2.0)
}

fn circumcircle(a: Point2, b: Point2, c: Point2) -> Circle {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        // Numerically collinear triple: fall back to the widest pair.
        let ab = diameter_circle(a, b);
        let ac = diameter_circle(a, c);
        let bc = diameter_circle(b, c);
        let mut widest = ab;
        if ac.radius > widest.radius {
            widest = ac;
        }
        if bc.radius > widest.radius {
            widest = bc;
        }
        return widest;
    }
    let a_sq = a.x * a.x + a.y * a.y;
    let b_sq = b.x * b.x + b.y * b.y;
    let c_sq = c.x * c.x + c.y * c.y;
    let ux = (a_sq * (b.y - c.y) + b_sq * (c.y - a.y) + c_sq * (a.y - b.y)) / d;
    let uy = (a_sq * (c.x - b.x) + b_sq * (a.x - c.x) + c_sq * (b.x - a.x)) / d;
    let center = Point2::new(ux, uy);
    Circle::new(center, center.distance_to(a))
}
