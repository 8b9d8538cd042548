use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use visioncore::geometry::Point2;
use visioncore::segmentation::{Contour, Frame, ShapeExtractor};

/// Configuration for the synthetic contour scenes used when no real camera
/// pipeline is attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub tape_pairs: usize,
    pub cargo_pieces: usize,
    /// Per-coordinate corner noise in pixels.
    pub jitter: f64,
    pub seed: u64,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Synthetic camera cadence in frames per second.
    pub fps: u32,
    pub description: Option<String>,
    pub scenario: Option<String>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tape_pairs: 1,
            cargo_pieces: 2,
            jitter: 0.35,
            seed: 7,
            frame_width: 320,
            frame_height: 240,
            fps: 30,
            description: None,
            scenario: None,
        }
    }
}

/// Which slice of the scene a segmentation channel sees. The real pipelines
/// threshold the same frame differently, so the tape channel never reports
/// cargo contours and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneChannel {
    All,
    Tapes,
    Cargo,
}

impl SceneChannel {
    fn takes_tapes(self) -> bool {
        matches!(self, SceneChannel::All | SceneChannel::Tapes)
    }

    fn takes_cargo(self) -> bool {
        matches!(self, SceneChannel::All | SceneChannel::Cargo)
    }
}

fn jitter(rng: &mut StdRng, amount: f64) -> f64 {
    if amount > 0.0 {
        rng.gen_range(-amount..amount)
    } else {
        0.0
    }
}

fn rect_contour(
    rng: &mut StdRng,
    config: &SceneConfig,
    cx: f64,
    cy: f64,
    width: f64,
    height: f64,
    angle: f64,
) -> Contour {
    let rad = angle.to_radians();
    let (ux, uy) = (rad.cos(), rad.sin());
    let (nx, ny) = (-uy, ux);
    let mut points = Vec::with_capacity(4);
    for (sw, sh) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
        points.push(Point2::new(
            cx + sw * width * ux + sh * height * nx + jitter(rng, config.jitter),
            cy + sw * width * uy + sh * height * ny + jitter(rng, config.jitter),
        ));
    }
    Contour::new(points)
}

fn circle_contour(rng: &mut StdRng, config: &SceneConfig, cx: f64, cy: f64, radius: f64) -> Contour {
    let mut points = Vec::with_capacity(12);
    for i in 0..12 {
        let theta = i as f64 / 12.0 * TAU;
        points.push(Point2::new(
            cx + radius * theta.cos() + jitter(rng, config.jitter),
            cy + radius * theta.sin() + jitter(rng, config.jitter),
        ));
    }
    Contour::new(points)
}

/// Deterministic contour scene for one frame: tape pairs at the calibrated
/// reference angles around the expected target location, cargo circles along
/// the lower band. The draw depends only on the seed and the frame sequence;
/// the channel filter picks what gets emitted without disturbing the draw,
/// so every channel sees the same geometry for the same frame.
pub fn build_channel_contours(
    config: &SceneConfig,
    frame: &Frame,
    channel: SceneChannel,
) -> Vec<Contour> {
    let mut rng = StdRng::seed_from_u64(config.seed ^ frame.seq);
    let w = frame.width.max(1) as f64;
    let h = frame.height.max(1) as f64;
    let mut contours = Vec::new();
    for pair in 0..config.tape_pairs {
        let cx = w * 0.65 + pair as f64 * 40.0;
        let cy = h * 0.5;
        let left = rect_contour(&mut rng, config, cx - 28.0, cy, 8.0, 20.0, -75.5);
        let right = rect_contour(&mut rng, config, cx + 28.0, cy, 8.0, 20.0, -14.5);
        if channel.takes_tapes() {
            contours.push(left);
            contours.push(right);
        }
    }
    for piece in 0..config.cargo_pieces {
        let cx = w * (piece as f64 + 1.0) / (config.cargo_pieces as f64 + 1.0);
        let cy = h * 0.8;
        let ring = circle_contour(&mut rng, config, cx, cy, 9.0 + piece as f64 * 2.5);
        if channel.takes_cargo() {
            contours.push(ring);
        }
    }
    contours
}

/// Full scene for one frame, tapes before cargo.
pub fn build_scene_contours(config: &SceneConfig, frame: &Frame) -> Vec<Contour> {
    build_channel_contours(config, frame, SceneChannel::All)
}

/// Segmentation stand-in that renders the configured scene for every frame.
pub struct SyntheticScene {
    config: SceneConfig,
    channel: SceneChannel,
}

impl SyntheticScene {
    pub fn new(config: SceneConfig) -> Self {
        Self::for_channel(config, SceneChannel::All)
    }

    pub fn for_channel(config: SceneConfig, channel: SceneChannel) -> Self {
        Self { config, channel }
    }
}

impl ShapeExtractor for SyntheticScene {
    fn extract(&mut self, frame: &Frame) -> Vec<Contour> {
        build_channel_contours(&self.config, frame, self.channel)
    }
}
