use crate::segmentation::Contour;
use crate::telemetry::TelemetryValue;

/// Common error type for classification.
#[derive(thiserror::Error, Debug)]
pub enum ClassifyError {
    #[error("degenerate shape: {0}")]
    DegenerateShape(String),
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),
}

pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Trait describing one object class's classification policy.
///
/// A policy fits a geometric primitive to each candidate contour, filters and
/// orders the fitted primitives, and resolves the survivors into a
/// fixed-shape result. The engine drives the three steps in order for every
/// frame; per-candidate failures stay inside `fit` and never abort a frame.
pub trait ClassifyPolicy {
    /// Primitive fitted around a single contour.
    type Primitive;
    /// Candidate that passed the admissibility gate, carrying its rank key.
    type Ranked;
    /// Fixed-shape frame result handed to telemetry.
    type Resolved;

    fn fit(&self, contour: &Contour) -> ClassifyResult<Self::Primitive>;
    fn filter_and_rank(&self, fitted: Vec<Self::Primitive>) -> Vec<Self::Ranked>;
    fn resolve(&self, ranked: Vec<Self::Ranked>) -> Self::Resolved;
}

/// Frame result that can be written to the telemetry store.
///
/// The key set and value layout are a wire contract with the robot code; they
/// never vary with frame content.
pub trait TelemetryReport {
    /// Table path the report is published under.
    fn table(&self) -> &'static str;
    /// Key/value pairs for one frame, every key present on every frame.
    fn entries(&self) -> Vec<(&'static str, TelemetryValue)>;
}
