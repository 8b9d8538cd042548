use serde::{Deserialize, Serialize};
use visioncore::segmentation::Contour;
use visioncore::telemetry::FrameMetrics;

use crate::workflow::context::WorkerContext;

/// Status surface exposed to the console and debugging tools.
#[derive(Debug, Clone, Serialize)]
pub struct StatusModel {
    pub running: bool,
    pub source: usize,
    pub camera: usize,
    pub frames: usize,
    pub candidates: usize,
    pub last_seq: Option<u64>,
}

impl StatusModel {
    pub fn collect(context: &WorkerContext, metrics: &FrameMetrics) -> Self {
        let snapshot = metrics.snapshot();
        Self {
            running: context.is_running(),
            source: context.source(),
            camera: context.camera(),
            frames: snapshot.frames,
            candidates: snapshot.candidates,
            last_seq: snapshot.last_seq,
        }
    }
}

/// Body of `POST /ingest`: contours pushed by an external segmentation
/// stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub contours: Vec<Contour>,
}

/// Body of `POST /source`: the remote camera switch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SourceRequest {
    pub source: usize,
}
