//! iris-image — backend-agnostic image abstraction.
//!
//! One stable `Image` API over a swappable pixel engine: the concrete
//! backend is chosen at build time by cargo feature (`backend-cpu` by
//! default), so detection/recognition pipelines never touch the
//! pixel-level implementation. Geometry stays in `iris-core`.

pub mod backend;
pub mod color;
pub mod draw;
pub mod error;
pub mod image;
pub mod io;
pub mod tensor;
pub mod view;

pub use backend::{Interpolation, MorphOp, PixelBackend, Rotation, ThresholdKind};
pub use error::ImageError;
pub use image::Image;
pub use view::ImageView;
