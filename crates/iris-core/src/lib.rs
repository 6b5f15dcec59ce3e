//! iris-core — 2D value geometry for vision pipelines.
//!
//! Plain value types (`Point`, `Size`, `Rect`, `TransformMatrix`) plus
//! similarity-transform estimation, with no indirection on the hot path.
//! The pixel side lives in `iris-image`.

pub mod estimate;
pub mod point;
pub mod rect;
pub mod size;
pub mod timing;
pub mod trace;
pub mod transform;
pub mod vec;

pub use estimate::{
    similarity_transform_estimate, similarity_transform_estimate_umeyama, EstimateError,
};
pub use point::{apply_transform_to_points, Point, Point2d, Point2f, Point2i};
pub use rect::{apply_transform_to_rect, min_bounding_rect, Rect, Rect2d, Rect2f, Rect2i};
pub use size::{Size, Size2d, Size2f, Size2i};
pub use timing::Stopwatch;
pub use transform::TransformMatrix;
pub use vec::Coord;
