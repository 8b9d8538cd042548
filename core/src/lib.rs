//! Core geometry and target classification for the Rust vision coprocessor.
//!
//! The modules cover primitive fitting, policy-driven ranking and resolution,
//! range estimation, and the telemetry boundary, keeping the classifier free
//! of camera capture and network transport concerns.

pub mod classify;
pub mod framebuf;
pub mod geometry;
pub mod prelude;
pub mod segmentation;
pub mod telemetry;

pub use prelude::{ClassifyError, ClassifyPolicy, ClassifyResult, TelemetryReport};
