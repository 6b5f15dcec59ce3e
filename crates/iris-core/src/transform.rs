//! 2x3 affine transform.

use crate::point::Point;
use crate::vec::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

/// A 2x3 affine map, row-major `[a11 a12 b1; a21 a22 b2]`:
/// `(x', y') = (a11*x + a12*y + b1, a21*x + a22*y + b2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformMatrix {
    m: [f32; 6],
}

impl TransformMatrix {
    pub fn new(a11: f32, a12: f32, b1: f32, a21: f32, a22: f32, b2: f32) -> Self {
        Self {
            m: [a11, a12, b1, a21, a22, b2],
        }
    }

    pub fn identity() -> Self {
        Self { m: IDENTITY }
    }

    /// Rotation by +90 degrees about the origin: `(x, y) -> (-y, x)`.
    pub fn rotation_90() -> Self {
        Self::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Rotation by 180 degrees about the origin.
    pub fn rotation_180() -> Self {
        Self::new(-1.0, 0.0, 0.0, 0.0, -1.0, 0.0)
    }

    /// Rotation by +270 degrees about the origin: `(x, y) -> (y, -x)`.
    pub fn rotation_270() -> Self {
        Self::new(0.0, 1.0, 0.0, -1.0, 0.0, 0.0)
    }

    /// Element at `(row, col)`, `row < 2`, `col < 3`.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row * 3 + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.m[row * 3 + col] = value;
    }

    /// Elements in row-major order.
    pub fn to_vec(&self) -> Vec<f32> {
        self.m.to_vec()
    }

    pub fn as_slice(&self) -> &[f32; 6] {
        &self.m
    }

    /// Exact comparison against the identity matrix.
    pub fn is_identity(&self) -> bool {
        self.m == IDENTITY
    }

    pub fn set_identity(&mut self) {
        self.m = IDENTITY;
    }

    /// Determinant of the 2x2 linear part.
    fn det(&self) -> f32 {
        self.m[0] * self.m[4] - self.m[1] * self.m[3]
    }

    /// Invert in place.
    ///
    /// Precondition: the 2x2 linear part is non-singular. A singular
    /// matrix is a contract violation and terminates via [`fatal!`];
    /// callers in alignment code must guarantee non-zero scale.
    ///
    /// [`fatal!`]: crate::fatal
    pub fn invert(&mut self) {
        let det = self.det();
        if det.abs() < 1e-12 {
            crate::fatal!("cannot invert singular transform (det = {det})");
        }
        let [a11, a12, b1, a21, a22, b2] = self.m;
        let inv_det = 1.0 / det;
        let i11 = a22 * inv_det;
        let i12 = -a12 * inv_det;
        let i21 = -a21 * inv_det;
        let i22 = a11 * inv_det;
        self.m = [
            i11,
            i12,
            -(i11 * b1 + i12 * b2),
            i21,
            i22,
            -(i21 * b1 + i22 * b2),
        ];
    }

    /// Inverse of this matrix. Same precondition as [`invert`](Self::invert).
    pub fn inverse(&self) -> Self {
        let mut out = *self;
        out.invert();
        out
    }

    /// Post-compose a translation: the shift applies after the map this
    /// matrix already encodes.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.m[2] += dx;
        self.m[5] += dy;
    }

    /// Post-compose an axis scale.
    pub fn scale(&mut self, sx: f32, sy: f32) {
        for i in 0..3 {
            self.m[i] *= sx;
            self.m[3 + i] *= sy;
        }
    }

    /// Post-compose a rotation by `angle` radians about the origin.
    pub fn rotate(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        let [a11, a12, b1, a21, a22, b2] = self.m;
        self.m = [
            cos * a11 - sin * a21,
            cos * a12 - sin * a22,
            cos * b1 - sin * b2,
            sin * a11 + cos * a21,
            sin * a12 + cos * a22,
            sin * b1 + cos * b2,
        ];
    }

    /// Affine composition: `a.multiply(&b)` applies `b` first, then `a`
    /// (the matrix product `A*B` acting on column vectors). Every
    /// transform application in this crate uses the same `p' = M*p`
    /// convention.
    pub fn multiply(&self, other: &TransformMatrix) -> TransformMatrix {
        let a = &self.m;
        let b = &other.m;
        TransformMatrix::new(
            a[0] * b[0] + a[1] * b[3],
            a[0] * b[1] + a[1] * b[4],
            a[0] * b[2] + a[1] * b[5] + a[2],
            a[3] * b[0] + a[4] * b[3],
            a[3] * b[1] + a[4] * b[4],
            a[3] * b[2] + a[4] * b[5] + a[5],
        )
    }

    /// Apply to a single point (`p' = M*p`).
    pub fn transform_point<T: Coord>(&self, p: Point<T>) -> Point<T> {
        let x: f64 = p.x.into();
        let y: f64 = p.y.into();
        let m: Vec<f64> = self.m.iter().map(|&v| v as f64).collect();
        Point {
            x: T::from_f64(m[0] * x + m[1] * y + m[2]),
            y: T::from_f64(m[3] * x + m[4] * y + m[5]),
        }
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Index<usize> for TransformMatrix {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.m[index]
    }
}

impl IndexMut<usize> for TransformMatrix {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.m[index]
    }
}

impl fmt::Display for TransformMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} {}; {} {} {}]",
            self.m[0], self.m[1], self.m[2], self.m[3], self.m[4], self.m[5]
        )
    }
}
