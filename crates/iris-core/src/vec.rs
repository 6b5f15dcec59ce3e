//! Numeric building blocks: the coordinate scalar trait and fixed-size
//! vector aliases shared by every geometry type.

use num_traits::Num;
use std::fmt;

// Fixed-size numeric tuples.
pub type Vec2<T> = [T; 2];
pub type Vec3<T> = [T; 3];
pub type Vec4<T> = [T; 4];

// Float vectors
pub type Vec2f = Vec2<f32>;
pub type Vec3f = Vec3<f32>;
pub type Vec4f = Vec4<f32>;

// Double vectors
pub type Vec2d = Vec2<f64>;
pub type Vec3d = Vec3<f64>;
pub type Vec4d = Vec4<f64>;

// Integer vectors
pub type Vec2i = Vec2<i32>;
pub type Vec3i = Vec3<i32>;
pub type Vec4i = Vec4<i32>;

/// Scalar usable as a coordinate type: `i32`, `f32` or `f64`.
///
/// Every coordinate converts losslessly into `f64` for metric math;
/// `from_f64` converts back with the target type's `as`-cast semantics
/// (truncation toward zero for `i32`).
pub trait Coord:
    Num + PartialOrd + Copy + fmt::Debug + fmt::Display + Into<f64> + 'static
{
    fn from_f64(v: f64) -> Self;
}

impl Coord for i32 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as i32
    }
}

impl Coord for f32 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl Coord for f64 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}
