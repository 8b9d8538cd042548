pub mod cargo;
pub mod distance;
pub mod engine;
pub mod target;

pub use cargo::{CargoDetection, CargoPolicy};
pub use distance::RangingModel;
pub use engine::{publish_report, Classifier};
pub use target::{ResolvedTarget, TargetClass, TargetParams, TargetPolicy};
