//! Width/height pair.

use crate::vec::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D extent. Conceptually non-negative; the type does not enforce it,
/// callers validate before pixel access.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

pub type Size2i = Size<i32>;
pub type Size2f = Size<f32>;
pub type Size2d = Size<f64>;

impl<T: Coord> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Self { width, height }
    }

    /// Convert to another scalar type with `as`-cast semantics.
    pub fn cast<U: Coord>(self) -> Size<U> {
        Size {
            width: U::from_f64(self.width.into()),
            height: U::from_f64(self.height.into()),
        }
    }

    pub fn area(self) -> T {
        self.width * self.height
    }

    /// True when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == T::zero() || self.height == T::zero()
    }

    /// Scale both dimensions in place.
    pub fn scale(&mut self, sx: T, sy: T) {
        self.width = self.width * sx;
        self.height = self.height * sy;
    }
}

impl<T: fmt::Display> fmt::Display for Size<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
