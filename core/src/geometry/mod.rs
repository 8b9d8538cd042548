pub mod circle;
pub mod hull;
pub mod point;
pub mod rect;

pub use circle::{min_enclosing_circle, Circle};
pub use hull::convex_hull;
pub use point::Point2;
pub use rect::{min_area_rect, OrientedRect};
