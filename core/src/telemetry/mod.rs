pub mod metrics;
pub mod report;
pub mod store;

pub use metrics::{FrameMetrics, MetricsSnapshot};
pub use report::{CargoReport, TargetReport, CARGO_TABLE, TARGETS_TABLE};
pub use store::{MemorySink, TableSnapshot, TelemetrySink, TelemetryValue};
