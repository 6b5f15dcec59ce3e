//! Similarity-transform estimation from corresponding point pairs.
//!
//! Two estimators: normal-equations least squares, and the Umeyama
//! closed form (centroid subtraction, covariance SVD). Both recover the
//! 4-DOF map (uniform scale, rotation, translation) minimizing
//! `sum ||dst_i - T(src_i)||^2` and agree within floating-point
//! tolerance on well-conditioned input; Umeyama is the numerically
//! stabler choice near degeneracy.

use crate::point::Point;
use crate::transform::TransformMatrix;
use crate::vec::Coord;
use nalgebra::{Matrix2, Vector2};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    #[error("need at least 2 point pairs, got {got}")]
    TooFewPoints { got: usize },
    #[error("source/destination length mismatch: {src} vs {dst}")]
    LengthMismatch { src: usize, dst: usize },
    #[error("degenerate source points (coincident point cloud)")]
    Degenerate,
}

fn validate<T: Coord>(src: &[Point<T>], dst: &[Point<T>]) -> Result<(), EstimateError> {
    if src.len() != dst.len() {
        return Err(EstimateError::LengthMismatch {
            src: src.len(),
            dst: dst.len(),
        });
    }
    if src.len() < 2 {
        return Err(EstimateError::TooFewPoints { got: src.len() });
    }
    Ok(())
}

/// Estimate a similarity transform by least squares over the normal
/// equations.
///
/// For each pair `(sx, sy) -> (dx, dy)` the unknowns `[a, b, tx, ty]`
/// satisfy
/// ```text
///   sx*a - sy*b + tx = dx
///   sy*a + sx*b + ty = dy
/// ```
/// and the returned matrix is `[a -b tx; b a ty]`.
///
/// A coincident source cloud makes the normal matrix singular and is an
/// unsupported input ([`EstimateError::Degenerate`]) — never a silent
/// identity.
pub fn similarity_transform_estimate<T: Coord>(
    src: &[Point<T>],
    dst: &[Point<T>],
) -> Result<TransformMatrix, EstimateError> {
    validate(src, dst)?;

    // Build A^T*A and A^T*b for the overdetermined system.
    let mut ata = [0.0f64; 16];
    let mut atb = [0.0f64; 4];

    for (s, d) in src.iter().zip(dst.iter()) {
        let sx: f64 = s.x.into();
        let sy: f64 = s.y.into();
        let dx: f64 = d.x.into();
        let dy: f64 = d.y.into();

        let r1 = [sx, -sy, 1.0, 0.0];
        let r2 = [sy, sx, 0.0, 1.0];

        for j in 0..4 {
            for k in 0..4 {
                ata[j * 4 + k] += r1[j] * r1[k] + r2[j] * r2[k];
            }
            atb[j] += r1[j] * dx + r2[j] * dy;
        }
    }

    let x = solve_4x4(&ata, &atb).ok_or(EstimateError::Degenerate)?;
    let (a, b, tx, ty) = (x[0] as f32, x[1] as f32, x[2] as f32, x[3] as f32);

    Ok(TransformMatrix::new(a, -b, tx, b, a, ty))
}

/// Solve a 4x4 linear system via Gaussian elimination with partial
/// pivoting. `None` when a pivot vanishes (singular system).
#[allow(clippy::needless_range_loop)]
fn solve_4x4(ata: &[f64; 16], atb: &[f64; 4]) -> Option<[f64; 4]> {
    // Augmented matrix [A | b] as 4x5
    let mut m = [[0.0f64; 5]; 4];
    for i in 0..4 {
        for j in 0..4 {
            m[i][j] = ata[i * 4 + j];
        }
        m[i][4] = atb[i];
    }

    for col in 0..4 {
        let mut max_row = col;
        let mut max_val = m[col][col].abs();
        for row in (col + 1)..4 {
            if m[row][col].abs() > max_val {
                max_val = m[row][col].abs();
                max_row = row;
            }
        }
        m.swap(col, max_row);

        let pivot = m[col][col];
        if pivot.abs() < 1e-12 {
            return None;
        }

        for row in (col + 1)..4 {
            let factor = m[row][col] / pivot;
            for j in col..5 {
                m[row][j] -= factor * m[col][j];
            }
        }
    }

    let mut x = [0.0f64; 4];
    for i in (0..4).rev() {
        x[i] = m[i][4];
        for j in (i + 1)..4 {
            x[i] -= m[i][j] * x[j];
        }
        x[i] /= m[i][i];
    }

    Some(x)
}

/// Estimate a similarity transform with the Umeyama closed form.
///
/// Subtracts centroids, builds the 2x2 covariance of the demeaned
/// clouds, takes its SVD, corrects the rotation sign from the
/// determinant, and recovers uniform scale from the source variance.
/// No iterative optimization involved.
pub fn similarity_transform_estimate_umeyama<T: Coord>(
    src: &[Point<T>],
    dst: &[Point<T>],
) -> Result<TransformMatrix, EstimateError> {
    validate(src, dst)?;

    let n = src.len() as f64;
    let mut src_mean = Vector2::zeros();
    let mut dst_mean = Vector2::zeros();
    for (s, d) in src.iter().zip(dst.iter()) {
        src_mean += Vector2::new(s.x.into(), s.y.into());
        dst_mean += Vector2::new(d.x.into(), d.y.into());
    }
    src_mean /= n;
    dst_mean /= n;

    let mut cov = Matrix2::zeros();
    let mut src_var = 0.0f64;
    for (s, d) in src.iter().zip(dst.iter()) {
        let sd = Vector2::new(s.x.into(), s.y.into()) - src_mean;
        let dd = Vector2::new(d.x.into(), d.y.into()) - dst_mean;
        cov += dd * sd.transpose();
        src_var += sd.norm_squared();
    }
    cov /= n;
    src_var /= n;

    if src_var < 1e-12 {
        return Err(EstimateError::Degenerate);
    }

    let svd = cov.svd(true, true);
    let u = svd.u.ok_or(EstimateError::Degenerate)?;
    let v_t = svd.v_t.ok_or(EstimateError::Degenerate)?;

    // Reflection guard: force det(R) = +1.
    let mut s = Matrix2::identity();
    if u.determinant() * v_t.determinant() < 0.0 {
        s[(1, 1)] = -1.0;
    }

    let r = u * s * v_t;
    let scale =
        (svd.singular_values[0] * s[(0, 0)] + svd.singular_values[1] * s[(1, 1)]) / src_var;
    let t = dst_mean - scale * r * src_mean;

    Ok(TransformMatrix::new(
        (scale * r[(0, 0)]) as f32,
        (scale * r[(0, 1)]) as f32,
        t[0] as f32,
        (scale * r[(1, 0)]) as f32,
        (scale * r[(1, 1)]) as f32,
        t[1] as f32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Uniform scale recovered from a similarity matrix.
    fn recovered_scale(m: &TransformMatrix) -> f32 {
        (m[0] * m[0] + m[3] * m[3]).sqrt()
    }

    /// Rotation angle in radians recovered from a similarity matrix.
    fn recovered_angle(m: &TransformMatrix) -> f32 {
        m[3].atan2(m[0])
    }

    const LANDMARKS: [Point<f32>; 5] = [
        Point { x: 38.2946, y: 51.6963 },
        Point { x: 73.5318, y: 51.5014 },
        Point { x: 56.0252, y: 71.7366 },
        Point { x: 41.5493, y: 92.3655 },
        Point { x: 70.7299, y: 92.2041 },
    ];

    #[test]
    fn test_lsq_identity_when_src_equals_dst() {
        let m = similarity_transform_estimate(&LANDMARKS, &LANDMARKS).unwrap();
        assert!((m[0] - 1.0).abs() < 1e-4, "a = {}", m[0]);
        assert!(m[1].abs() < 1e-4);
        assert!(m[2].abs() < 1e-3);
        assert!(m[3].abs() < 1e-4);
        assert!((m[4] - 1.0).abs() < 1e-4);
        assert!(m[5].abs() < 1e-3);
    }

    #[test]
    fn test_umeyama_identity_when_src_equals_dst() {
        let m = similarity_transform_estimate_umeyama(&LANDMARKS, &LANDMARKS).unwrap();
        assert!((recovered_scale(&m) - 1.0).abs() < 1e-4);
        assert!(recovered_angle(&m).abs() < 1e-4);
        assert!(m[2].abs() < 1e-3);
        assert!(m[5].abs() < 1e-3);
    }

    #[test]
    fn test_quarter_turn_scenario() {
        // src {(0,0),(1,0)} -> dst {(0,0),(0,1)}: 90 degrees, unit scale,
        // zero translation.
        let src = [Point::new(0.0f32, 0.0), Point::new(1.0, 0.0)];
        let dst = [Point::new(0.0f32, 0.0), Point::new(0.0, 1.0)];

        for m in [
            similarity_transform_estimate(&src, &dst).unwrap(),
            similarity_transform_estimate_umeyama(&src, &dst).unwrap(),
        ] {
            assert!(
                (recovered_angle(&m) - std::f32::consts::FRAC_PI_2).abs() < 1e-3,
                "angle = {}",
                recovered_angle(&m)
            );
            assert!((recovered_scale(&m) - 1.0).abs() < 1e-3);
            assert!(m[2].abs() < 1e-3, "tx = {}", m[2]);
            assert!(m[5].abs() < 1e-3, "ty = {}", m[5]);
        }
    }

    #[test]
    fn test_estimators_agree_on_three_points() {
        // Known similarity: scale 1.5, 30 degrees, translate (2, 3).
        let angle = 30.0f64.to_radians();
        let (sin, cos) = angle.sin_cos();
        let scale = 1.5f64;
        let map = |p: Point<f64>| {
            Point::new(
                scale * (cos * p.x - sin * p.y) + 2.0,
                scale * (sin * p.x + cos * p.y) + 3.0,
            )
        };

        let src = [
            Point::new(0.0f64, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        let dst: Vec<Point<f64>> = src.iter().map(|&p| map(p)).collect();

        let lsq = similarity_transform_estimate(&src, &dst).unwrap();
        let ume = similarity_transform_estimate_umeyama(&src, &dst).unwrap();

        assert!((recovered_scale(&lsq) - recovered_scale(&ume)).abs() < 1e-3);
        assert!((recovered_angle(&lsq) - recovered_angle(&ume)).abs() < 1e-3);
        assert!((lsq[2] - ume[2]).abs() < 1e-3);
        assert!((lsq[5] - ume[5]).abs() < 1e-3);

        // and both recover the ground truth
        assert!((recovered_scale(&lsq) - 1.5).abs() < 1e-3);
        assert!((recovered_angle(&lsq) as f64 - angle).abs() < 1e-3);
        assert!((lsq[2] - 2.0).abs() < 1e-3);
        assert!((lsq[5] - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_estimate_recovers_noisy_fit() {
        // Overdetermined 5-point fit with a small perturbation on one
        // destination point still lands near the unperturbed map.
        let dst: Vec<Point<f32>> = LANDMARKS
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let nudge = if i == 2 { 0.3 } else { 0.0 };
                Point::new(p.x * 0.5 + nudge, p.y * 0.5)
            })
            .collect();
        let m = similarity_transform_estimate(&LANDMARKS, &dst).unwrap();
        assert!((recovered_scale(&m) - 0.5).abs() < 0.01, "scale = {}", recovered_scale(&m));
    }

    #[test]
    fn test_too_few_points() {
        let p = [Point::new(1.0f32, 1.0)];
        assert_eq!(
            similarity_transform_estimate(&p, &p),
            Err(EstimateError::TooFewPoints { got: 1 })
        );
        assert_eq!(
            similarity_transform_estimate_umeyama(&p, &p),
            Err(EstimateError::TooFewPoints { got: 1 })
        );
    }

    #[test]
    fn test_length_mismatch() {
        let src = [Point::new(0.0f32, 0.0), Point::new(1.0, 0.0)];
        let dst = [Point::new(0.0f32, 0.0)];
        assert_eq!(
            similarity_transform_estimate(&src, &dst),
            Err(EstimateError::LengthMismatch { src: 2, dst: 1 })
        );
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let src = [Point::new(5.0f32, 5.0); 4];
        let dst = [
            Point::new(0.0f32, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        ];
        assert_eq!(
            similarity_transform_estimate(&src, &dst),
            Err(EstimateError::Degenerate)
        );
        assert_eq!(
            similarity_transform_estimate_umeyama(&src, &dst),
            Err(EstimateError::Degenerate)
        );
    }
}
