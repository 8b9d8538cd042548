//! Boundary types for the upstream segmentation pipeline.
//!
//! Thresholding and morphology run outside this crate; the classifier only
//! sees frames and the candidate contours extracted from them.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2;

/// One video frame as delivered by the acquisition loop. Pixel data is
/// opaque to the classifier and may be empty for synthetic sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    pub seq: u64,
    pub timestamp: f64,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(seq: u64, timestamp: f64, width: u32, height: u32) -> Self {
        Self {
            seq,
            timestamp,
            width,
            height,
            data: Vec::new(),
        }
    }
}

/// Candidate contour produced by segmentation. Points are unordered as far
/// as the fitters are concerned; only the point set matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point2>,
}

impl Contour {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Collaborator that turns a frame into candidate contours.
///
/// An empty result is a normal frame outcome, not an error; the classifier
/// still publishes its sentinel output for such frames.
pub trait ShapeExtractor: Send {
    fn extract(&mut self, frame: &Frame) -> Vec<Contour>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contour_length_reflects_points() {
        let contour = Contour::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]);
        assert_eq!(contour.len(), 2);
        assert!(!contour.is_empty());
        assert!(Contour::default().is_empty());
    }

    #[test]
    fn frame_serializes_without_pixel_payload() {
        let frame = Frame::new(7, 1.25, 320, 240);
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["seq"], 7);
        assert!(json.get("data").is_none());
    }
}
