//! 2D point with arithmetic and metric operations.

use crate::transform::TransformMatrix;
use crate::vec::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A 2D coordinate. Equality is exact value equality over both fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

pub type Point2i = Point<i32>;
pub type Point2f = Point<f32>;
pub type Point2d = Point<f64>;

impl<T: Coord> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Convert coordinates to another scalar type with `as`-cast semantics.
    pub fn cast<U: Coord>(self) -> Point<U> {
        Point {
            x: U::from_f64(self.x.into()),
            y: U::from_f64(self.y.into()),
        }
    }

    /// Magnitude of the vector from the origin to this point.
    pub fn length(self) -> f64 {
        let x: f64 = self.x.into();
        let y: f64 = self.y.into();
        (x * x + y * y).sqrt()
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        let dx: f64 = self.x.into() - other.x.into();
        let dy: f64 = self.y.into() - other.y.into();
        (dx * dx + dy * dy).sqrt()
    }

    pub fn dot(self, other: Self) -> T {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (z-component of the 3D cross product).
    pub fn cross(self, other: Self) -> T {
        self.x * other.y - self.y * other.x
    }
}

impl<T: Coord> Add for Point<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Coord> Sub for Point<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: Coord> Mul<T> for Point<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl<T: fmt::Display> fmt::Display for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Apply an affine transform to each point (`p' = M·p`, column-vector
/// convention — see [`TransformMatrix::multiply`]).
pub fn apply_transform_to_points<T: Coord>(
    points: &[Point<T>],
    transform: &TransformMatrix,
) -> Vec<Point<T>> {
    points.iter().map(|p| transform.transform_point(*p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Point::new(3.0f32, 4.0);
        let b = Point::new(1.0f32, -2.0);
        assert_eq!(a + b, Point::new(4.0, 2.0));
        assert_eq!(a - b, Point::new(2.0, 6.0));
        assert_eq!(a * 2.0, Point::new(6.0, 8.0));
    }

    #[test]
    fn test_length_and_distance() {
        let p = Point::new(3i32, 4);
        assert!((p.length() - 5.0).abs() < 1e-9);
        assert!((p.distance(Point::new(0, 0)) - 5.0).abs() < 1e-9);
        assert!((p.distance(p)).abs() < 1e-9);
    }

    #[test]
    fn test_dot_and_cross() {
        let a = Point::new(3.0f64, 4.0);
        let b = Point::new(1.0f64, -2.0);
        assert!((a.dot(b) + 5.0).abs() < 1e-9);
        // cross of a vector with itself is zero
        assert_eq!(a.cross(a), 0.0);
        assert_eq!(Point::new(1, 0).cross(Point::new(0, 1)), 1);
    }

    #[test]
    fn test_cast_truncates() {
        let p = Point::new(3.7f32, -1.2);
        assert_eq!(p.cast::<i32>(), Point::new(3, -1));
        let q = Point::new(2i32, 5).cast::<f64>();
        assert_eq!(q, Point::new(2.0, 5.0));
    }

    #[test]
    fn test_equality_is_exact() {
        assert_eq!(Point::new(1.5f32, 2.5), Point::new(1.5, 2.5));
        assert_ne!(Point::new(1.5f32, 2.5), Point::new(1.5, 2.5000001));
    }

    #[test]
    fn test_apply_transform_identity() {
        let pts = vec![Point::new(1.0f32, 2.0), Point::new(-3.0, 4.0)];
        let out = apply_transform_to_points(&pts, &TransformMatrix::identity());
        assert_eq!(out, pts);
    }

    #[test]
    fn test_apply_transform_translation() {
        let pts = vec![Point::new(1.0f64, 2.0)];
        let m = TransformMatrix::new(1.0, 0.0, 10.0, 0.0, 1.0, -5.0);
        let out = apply_transform_to_points(&pts, &m);
        assert!((out[0].x - 11.0).abs() < 1e-6);
        assert!((out[0].y + 3.0).abs() < 1e-6);
    }
}
