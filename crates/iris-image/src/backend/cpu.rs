//! Portable CPU pixel engine.
//!
//! Reference implementation of [`PixelBackend`]: plain scalar loops,
//! deterministic results on every platform. Resampling aligns pixel
//! centers; filters use replicate borders; `warp_affine` reads 0 outside
//! the source.

use super::{Interpolation, MorphOp, PixelBackend, Rotation, ThresholdKind};
use crate::view::ImageView;
use iris_core::TransformMatrix;

pub struct CpuBackend;

fn clamp_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Separable Gaussian taps. A non-positive sigma derives one from the
/// kernel size (`0.3*((k-1)*0.5 - 1) + 0.8`).
fn gaussian_kernel(kernel_size: usize, sigma: f64) -> Vec<f32> {
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let r = (kernel_size / 2) as i64;
    let mut taps: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f64) / (2.0 * sigma * sigma)).exp() as f32)
        .collect();
    let sum: f32 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps
}

impl PixelBackend for CpuBackend {
    fn resize(
        &self,
        src: ImageView<'_>,
        dst_w: u32,
        dst_h: u32,
        interp: Interpolation,
    ) -> Vec<u8> {
        let (sw, sh, c) = (
            src.width() as usize,
            src.height() as usize,
            src.channels() as usize,
        );
        let (dw, dh) = (dst_w as usize, dst_h as usize);
        let data = src.as_bytes();
        let mut out = vec![0u8; dw * dh * c];
        if sw == 0 || sh == 0 || dw == 0 || dh == 0 {
            return out;
        }

        let x_ratio = sw as f32 / dw as f32;
        let y_ratio = sh as f32 / dh as f32;

        match interp {
            Interpolation::Nearest => {
                for y in 0..dh {
                    let sy = (((y as f32 + 0.5) * y_ratio) as usize).min(sh - 1);
                    for x in 0..dw {
                        let sx = (((x as f32 + 0.5) * x_ratio) as usize).min(sw - 1);
                        let s = (sy * sw + sx) * c;
                        let d = (y * dw + x) * c;
                        out[d..d + c].copy_from_slice(&data[s..s + c]);
                    }
                }
            }
            Interpolation::Bilinear => {
                for y in 0..dh {
                    let src_y = (y as f32 + 0.5) * y_ratio - 0.5;
                    let y0 = (src_y.floor() as i32).clamp(0, sh as i32 - 1) as usize;
                    let y1 = (y0 + 1).min(sh - 1);
                    let fy = (src_y - src_y.floor()).clamp(0.0, 1.0);

                    for x in 0..dw {
                        let src_x = (x as f32 + 0.5) * x_ratio - 0.5;
                        let x0 = (src_x.floor() as i32).clamp(0, sw as i32 - 1) as usize;
                        let x1 = (x0 + 1).min(sw - 1);
                        let fx = (src_x - src_x.floor()).clamp(0.0, 1.0);

                        for ch in 0..c {
                            let tl = data[(y0 * sw + x0) * c + ch] as f32;
                            let tr = data[(y0 * sw + x1) * c + ch] as f32;
                            let bl = data[(y1 * sw + x0) * c + ch] as f32;
                            let br = data[(y1 * sw + x1) * c + ch] as f32;

                            let val = tl * (1.0 - fx) * (1.0 - fy)
                                + tr * fx * (1.0 - fy)
                                + bl * (1.0 - fx) * fy
                                + br * fx * fy;

                            out[(y * dw + x) * c + ch] = val.round().clamp(0.0, 255.0) as u8;
                        }
                    }
                }
            }
        }

        out
    }

    fn extract(&self, src: ImageView<'_>, x: u32, y: u32, w: u32, h: u32) -> Vec<u8> {
        let (sw, c) = (src.width() as usize, src.channels() as usize);
        let (x, y, w, h) = (x as usize, y as usize, w as usize, h as usize);
        let data = src.as_bytes();
        let mut out = Vec::with_capacity(w * h * c);
        for row in y..y + h {
            let start = (row * sw + x) * c;
            out.extend_from_slice(&data[start..start + w * c]);
        }
        out
    }

    fn warp_affine(
        &self,
        src: ImageView<'_>,
        matrix: &TransformMatrix,
        dst_w: u32,
        dst_h: u32,
    ) -> Vec<u8> {
        let (sw, sh, c) = (
            src.width() as usize,
            src.height() as usize,
            src.channels() as usize,
        );
        let (dw, dh) = (dst_w as usize, dst_h as usize);
        let data = src.as_bytes();
        let m = matrix.as_slice();

        // Invert the 2x2 linear part to map output pixels back to source.
        let det = m[0] * m[4] - m[1] * m[3];
        if det.abs() < 1e-12 {
            tracing::warn!(det, "warp_affine: singular matrix, output is all zeros");
            return vec![0u8; dw * dh * c];
        }
        let inv_det = 1.0 / det;
        let i00 = m[4] * inv_det;
        let i01 = -m[1] * inv_det;
        let i10 = -m[3] * inv_det;
        let i11 = m[0] * inv_det;

        let mut out = vec![0u8; dw * dh * c];

        let sample = |x: i32, y: i32, ch: usize| -> f32 {
            if x >= 0 && x < sw as i32 && y >= 0 && y < sh as i32 {
                data[(y as usize * sw + x as usize) * c + ch] as f32
            } else {
                0.0
            }
        };

        for oy in 0..dh {
            for ox in 0..dw {
                let dx = ox as f32 - m[2];
                let dy = oy as f32 - m[5];
                let sx = i00 * dx + i01 * dy;
                let sy = i10 * dx + i11 * dy;

                let x0 = sx.floor() as i32;
                let y0 = sy.floor() as i32;
                let fx = sx - x0 as f32;
                let fy = sy - y0 as f32;

                for ch in 0..c {
                    let val = sample(x0, y0, ch) * (1.0 - fx) * (1.0 - fy)
                        + sample(x0 + 1, y0, ch) * fx * (1.0 - fy)
                        + sample(x0, y0 + 1, ch) * (1.0 - fx) * fy
                        + sample(x0 + 1, y0 + 1, ch) * fx * fy;

                    out[(oy * dw + ox) * c + ch] = val.round().clamp(0.0, 255.0) as u8;
                }
            }
        }

        out
    }

    fn rotate(&self, src: ImageView<'_>, rotation: Rotation) -> Vec<u8> {
        let (w, h, c) = (
            src.width() as usize,
            src.height() as usize,
            src.channels() as usize,
        );
        let data = src.as_bytes();
        let mut out = vec![0u8; data.len()];

        for y in 0..h {
            for x in 0..w {
                // destination coordinates in the rotated frame
                let (dx, dy, dw) = match rotation {
                    Rotation::Cw90 => (h - 1 - y, x, h),
                    Rotation::Cw180 => (w - 1 - x, h - 1 - y, w),
                    Rotation::Cw270 => (y, w - 1 - x, h),
                };
                let s = (y * w + x) * c;
                let d = (dy * dw + dx) * c;
                out[d..d + c].copy_from_slice(&data[s..s + c]);
            }
        }

        out
    }

    fn flip_horizontal(&self, src: ImageView<'_>) -> Vec<u8> {
        let (w, h, c) = (
            src.width() as usize,
            src.height() as usize,
            src.channels() as usize,
        );
        let data = src.as_bytes();
        let mut out = vec![0u8; data.len()];
        for y in 0..h {
            for x in 0..w {
                let s = (y * w + x) * c;
                let d = (y * w + (w - 1 - x)) * c;
                out[d..d + c].copy_from_slice(&data[s..s + c]);
            }
        }
        out
    }

    fn flip_vertical(&self, src: ImageView<'_>) -> Vec<u8> {
        let (w, h, c) = (
            src.width() as usize,
            src.height() as usize,
            src.channels() as usize,
        );
        let data = src.as_bytes();
        let mut out = vec![0u8; data.len()];
        let stride = w * c;
        for y in 0..h {
            let s = y * stride;
            let d = (h - 1 - y) * stride;
            out[d..d + stride].copy_from_slice(&data[s..s + stride]);
        }
        out
    }

    fn pad(
        &self,
        src: ImageView<'_>,
        top: u32,
        bottom: u32,
        left: u32,
        right: u32,
        color: &[f64],
    ) -> Vec<u8> {
        let (sw, sh, c) = (
            src.width() as usize,
            src.height() as usize,
            src.channels() as usize,
        );
        let (top, bottom, left, right) = (
            top as usize,
            bottom as usize,
            left as usize,
            right as usize,
        );
        let dw = sw + left + right;
        let dh = sh + top + bottom;
        let data = src.as_bytes();

        let border: Vec<u8> = (0..c)
            .map(|ch| clamp_u8(color.get(ch).copied().unwrap_or(0.0)))
            .collect();

        let mut out = vec![0u8; dw * dh * c];
        for px in out.chunks_exact_mut(c) {
            px.copy_from_slice(&border);
        }

        for y in 0..sh {
            let s = y * sw * c;
            let d = ((y + top) * dw + left) * c;
            out[d..d + sw * c].copy_from_slice(&data[s..s + sw * c]);
        }

        out
    }

    fn gaussian_blur(&self, src: ImageView<'_>, kernel_size: u32, sigma: f64) -> Vec<u8> {
        let (w, h, c) = (
            src.width() as usize,
            src.height() as usize,
            src.channels() as usize,
        );
        let data = src.as_bytes();
        let taps = gaussian_kernel(kernel_size as usize, sigma);
        let r = (kernel_size / 2) as i32;

        // Horizontal pass into float, vertical pass back to bytes.
        let mut mid = vec![0f32; data.len()];
        for y in 0..h {
            for x in 0..w {
                for ch in 0..c {
                    let mut acc = 0f32;
                    for (k, tap) in taps.iter().enumerate() {
                        let sx = (x as i32 + k as i32 - r).clamp(0, w as i32 - 1) as usize;
                        acc += tap * data[(y * w + sx) * c + ch] as f32;
                    }
                    mid[(y * w + x) * c + ch] = acc;
                }
            }
        }

        let mut out = vec![0u8; data.len()];
        for y in 0..h {
            for x in 0..w {
                for ch in 0..c {
                    let mut acc = 0f32;
                    for (k, tap) in taps.iter().enumerate() {
                        let sy = (y as i32 + k as i32 - r).clamp(0, h as i32 - 1) as usize;
                        acc += tap * mid[(sy * w + x) * c + ch];
                    }
                    out[(y * w + x) * c + ch] = acc.round().clamp(0.0, 255.0) as u8;
                }
            }
        }

        out
    }

    fn morph(
        &self,
        src: ImageView<'_>,
        kernel_size: u32,
        iterations: u32,
        op: MorphOp,
    ) -> Vec<u8> {
        let (w, h) = (src.width() as usize, src.height() as usize);
        let r = (kernel_size / 2) as i32;
        let mut cur = src.as_bytes().to_vec();

        for _ in 0..iterations {
            let mut next = vec![0u8; cur.len()];
            for y in 0..h {
                for x in 0..w {
                    let mut best = match op {
                        MorphOp::Erode => u8::MAX,
                        MorphOp::Dilate => u8::MIN,
                    };
                    for ky in -r..=r {
                        let sy = (y as i32 + ky).clamp(0, h as i32 - 1) as usize;
                        for kx in -r..=r {
                            let sx = (x as i32 + kx).clamp(0, w as i32 - 1) as usize;
                            let v = cur[sy * w + sx];
                            best = match op {
                                MorphOp::Erode => best.min(v),
                                MorphOp::Dilate => best.max(v),
                            };
                        }
                    }
                    next[y * w + x] = best;
                }
            }
            cur = next;
        }

        cur
    }

    fn threshold(
        &self,
        src: ImageView<'_>,
        thresh: f64,
        maxval: f64,
        kind: ThresholdKind,
    ) -> Vec<u8> {
        let maxval = clamp_u8(maxval);
        let thresh_byte = clamp_u8(thresh);
        src.as_bytes()
            .iter()
            .map(|&v| {
                let above = v as f64 > thresh;
                match kind {
                    ThresholdKind::Binary => {
                        if above {
                            maxval
                        } else {
                            0
                        }
                    }
                    ThresholdKind::BinaryInv => {
                        if above {
                            0
                        } else {
                            maxval
                        }
                    }
                    ThresholdKind::Trunc => {
                        if above {
                            thresh_byte
                        } else {
                            v
                        }
                    }
                    ThresholdKind::ToZero => {
                        if above {
                            v
                        } else {
                            0
                        }
                    }
                    ThresholdKind::ToZeroInv => {
                        if above {
                            0
                        } else {
                            v
                        }
                    }
                }
            })
            .collect()
    }

    fn to_gray(&self, src: ImageView<'_>) -> Vec<u8> {
        let c = src.channels() as usize;
        if c == 1 {
            return src.as_bytes().to_vec();
        }
        // BGR storage: luma = 0.299 R + 0.587 G + 0.114 B
        src.as_bytes()
            .chunks_exact(c)
            .map(|px| clamp_u8(0.114 * px[0] as f64 + 0.587 * px[1] as f64 + 0.299 * px[2] as f64))
            .collect()
    }

    fn swap_rb(&self, src: ImageView<'_>) -> Vec<u8> {
        let c = src.channels() as usize;
        let mut out = src.as_bytes().to_vec();
        for px in out.chunks_exact_mut(c) {
            px.swap(0, 2);
        }
        out
    }

    fn scale_values(&self, src: ImageView<'_>, scale: f64) -> Vec<u8> {
        src.as_bytes()
            .iter()
            .map(|&v| clamp_u8(v as f64 * scale))
            .collect()
    }

    fn offset_values(&self, src: ImageView<'_>, value: f64) -> Vec<u8> {
        src.as_bytes()
            .iter()
            .map(|&v| clamp_u8(v as f64 + value))
            .collect()
    }

    fn abs_diff(&self, a: ImageView<'_>, b: ImageView<'_>) -> Vec<u8> {
        a.as_bytes()
            .iter()
            .zip(b.as_bytes())
            .map(|(&x, &y)| (x as i16 - y as i16).unsigned_abs() as u8)
            .collect()
    }

    fn mean_channels(&self, src: ImageView<'_>) -> Vec<u8> {
        let c = src.channels() as usize;
        src.as_bytes()
            .chunks_exact(c)
            .map(|px| (px.iter().map(|&v| v as u32).sum::<u32>() / c as u32) as u8)
            .collect()
    }

    fn blend(&self, a: ImageView<'_>, b: ImageView<'_>, mask: ImageView<'_>) -> Vec<u8> {
        let c = a.channels() as usize;
        let n = a.width() as usize * a.height() as usize;
        let (pa, pb, pm) = (a.as_bytes(), b.as_bytes(), mask.as_bytes());
        let mut out = vec![0u8; pa.len()];
        for i in 0..n {
            let m = pm[i] as u32;
            for ch in 0..c {
                let av = pa[i * c + ch] as u32;
                let bv = pb[i * c + ch] as u32;
                out[i * c + ch] = ((m * av + (255 - m) * bv + 127) / 255) as u8;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(data: &[u8], w: u32, h: u32, c: u8) -> ImageView<'_> {
        ImageView::new(data, w, h, c).unwrap()
    }

    #[test]
    fn test_resize_uniform_stays_uniform() {
        let data = vec![128u8; 10 * 10];
        for interp in [Interpolation::Nearest, Interpolation::Bilinear] {
            let out = CpuBackend.resize(view(&data, 10, 10, 1), 23, 7, interp);
            assert_eq!(out.len(), 23 * 7);
            assert!(out.iter().all(|&v| v == 128));
        }
    }

    #[test]
    fn test_resize_nearest_2x() {
        let data = vec![1u8, 2, 3, 4]; // 2x2
        let out = CpuBackend.resize(view(&data, 2, 2, 1), 4, 4, Interpolation::Nearest);
        assert_eq!(out[0], 1);
        assert_eq!(out[3], 2);
        assert_eq!(out[12], 3);
        assert_eq!(out[15], 4);
    }

    #[test]
    fn test_extract_rows() {
        // 4x3 single channel, values = index
        let data: Vec<u8> = (0..12).collect();
        let out = CpuBackend.extract(view(&data, 4, 3, 1), 1, 1, 2, 2);
        assert_eq!(out, vec![5, 6, 9, 10]);
    }

    #[test]
    fn test_warp_identity_preserves_pixels() {
        let data: Vec<u8> = (0..16).collect();
        let out = CpuBackend.warp_affine(
            view(&data, 4, 4, 1),
            &TransformMatrix::identity(),
            4,
            4,
        );
        assert_eq!(out, data);
    }

    #[test]
    fn test_warp_translation_shifts_and_fills_border() {
        let data = vec![200u8; 4 * 4];
        let m = TransformMatrix::new(1.0, 0.0, 2.0, 0.0, 1.0, 0.0);
        let out = CpuBackend.warp_affine(view(&data, 4, 4, 1), &m, 4, 4);
        // columns 0..2 map from x = -2..0 -> border 0
        assert_eq!(out[0], 0);
        assert_eq!(out[1], 0);
        assert_eq!(out[2], 200);
        assert_eq!(out[3], 200);
    }

    #[test]
    fn test_warp_singular_matrix_is_zeros() {
        let data = vec![255u8; 9];
        let m = TransformMatrix::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let out = CpuBackend.warp_affine(view(&data, 3, 3, 1), &m, 3, 3);
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_rotate_90_cw() {
        // 3x2:
        //   1 2 3
        //   4 5 6
        let data = vec![1u8, 2, 3, 4, 5, 6];
        let out = CpuBackend.rotate(view(&data, 3, 2, 1), Rotation::Cw90);
        // 2x3:
        //   4 1
        //   5 2
        //   6 3
        assert_eq!(out, vec![4, 1, 5, 2, 6, 3]);
    }

    #[test]
    fn test_rotate_180() {
        let data = vec![1u8, 2, 3, 4, 5, 6];
        let out = CpuBackend.rotate(view(&data, 3, 2, 1), Rotation::Cw180);
        assert_eq!(out, vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_rotate_270_cw() {
        let data = vec![1u8, 2, 3, 4, 5, 6];
        let out = CpuBackend.rotate(view(&data, 3, 2, 1), Rotation::Cw270);
        // 2x3:
        //   3 6
        //   2 5
        //   1 4
        assert_eq!(out, vec![3, 6, 2, 5, 1, 4]);
    }

    #[test]
    fn test_rotate_90_then_270_roundtrip() {
        let data: Vec<u8> = (0..24).collect(); // 4x2x3
        let rotated = CpuBackend.rotate(view(&data, 4, 2, 3), Rotation::Cw90);
        let back = CpuBackend.rotate(view(&rotated, 2, 4, 3), Rotation::Cw270);
        assert_eq!(back, data);
    }

    #[test]
    fn test_flips() {
        let data = vec![1u8, 2, 3, 4, 5, 6]; // 3x2
        let h = CpuBackend.flip_horizontal(view(&data, 3, 2, 1));
        assert_eq!(h, vec![3, 2, 1, 6, 5, 4]);
        let v = CpuBackend.flip_vertical(view(&data, 3, 2, 1));
        assert_eq!(v, vec![4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_gaussian_blur_uniform_stays_uniform() {
        let data = vec![77u8; 8 * 8];
        let out = CpuBackend.gaussian_blur(view(&data, 8, 8, 1), 5, 1.2);
        assert!(out.iter().all(|&v| (76..=78).contains(&v)), "{out:?}");
    }

    #[test]
    fn test_gaussian_blur_spreads_impulse() {
        let mut data = vec![0u8; 9 * 9];
        data[4 * 9 + 4] = 255;
        let out = CpuBackend.gaussian_blur(view(&data, 9, 9, 1), 3, 1.0);
        assert!(out[4 * 9 + 4] < 255);
        assert!(out[4 * 9 + 3] > 0);
        assert!(out[3 * 9 + 4] > 0);
    }

    #[test]
    fn test_erode_shrinks_dilate_grows() {
        // single bright pixel in a 5x5 field
        let mut data = vec![0u8; 25];
        data[12] = 255;
        let eroded = CpuBackend.morph(view(&data, 5, 5, 1), 3, 1, MorphOp::Erode);
        assert!(eroded.iter().all(|&v| v == 0));

        let dilated = CpuBackend.morph(view(&data, 5, 5, 1), 3, 1, MorphOp::Dilate);
        let lit = dilated.iter().filter(|&&v| v == 255).count();
        assert_eq!(lit, 9);
    }

    #[test]
    fn test_morph_iterations_compound() {
        let mut data = vec![0u8; 49];
        data[24] = 255; // center of 7x7
        let once = CpuBackend.morph(view(&data, 7, 7, 1), 3, 1, MorphOp::Dilate);
        let twice = CpuBackend.morph(view(&data, 7, 7, 1), 3, 2, MorphOp::Dilate);
        let count = |v: &[u8]| v.iter().filter(|&&p| p == 255).count();
        assert_eq!(count(&once), 9);
        assert_eq!(count(&twice), 25);
    }

    #[test]
    fn test_threshold_kinds() {
        let data = vec![10u8, 100, 200];
        let v = |d: &[u8]| ImageView::new(d, 3, 1, 1).unwrap();
        assert_eq!(
            CpuBackend.threshold(v(&data), 99.0, 255.0, ThresholdKind::Binary),
            vec![0, 255, 255]
        );
        assert_eq!(
            CpuBackend.threshold(v(&data), 99.0, 255.0, ThresholdKind::BinaryInv),
            vec![255, 0, 0]
        );
        assert_eq!(
            CpuBackend.threshold(v(&data), 99.0, 255.0, ThresholdKind::Trunc),
            vec![10, 99, 99]
        );
        assert_eq!(
            CpuBackend.threshold(v(&data), 99.0, 255.0, ThresholdKind::ToZero),
            vec![0, 100, 200]
        );
        assert_eq!(
            CpuBackend.threshold(v(&data), 99.0, 255.0, ThresholdKind::ToZeroInv),
            vec![10, 0, 0]
        );
    }

    #[test]
    fn test_to_gray_bt601() {
        // pure red in BGR is [0, 0, 255] -> 0.299 * 255 ~= 76
        let data = vec![0u8, 0, 255];
        let out = CpuBackend.to_gray(view(&data, 1, 1, 3));
        assert_eq!(out, vec![76]);
        // pure blue -> 0.114 * 255 ~= 29
        let data = vec![255u8, 0, 0];
        assert_eq!(CpuBackend.to_gray(view(&data, 1, 1, 3)), vec![29]);
    }

    #[test]
    fn test_swap_rb() {
        let data = vec![1u8, 2, 3, 4, 5, 6];
        let out = CpuBackend.swap_rb(view(&data, 2, 1, 3));
        assert_eq!(out, vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_scale_and_offset_saturate() {
        let data = vec![100u8, 200];
        let v = |d: &[u8]| ImageView::new(d, 2, 1, 1).unwrap();
        assert_eq!(CpuBackend.scale_values(v(&data), 2.0), vec![200, 255]);
        assert_eq!(CpuBackend.offset_values(v(&data), -150.0), vec![0, 50]);
    }

    #[test]
    fn test_abs_diff() {
        let a = vec![10u8, 250];
        let b = vec![30u8, 100];
        let out = CpuBackend.abs_diff(view(&a, 2, 1, 1), view(&b, 2, 1, 1));
        assert_eq!(out, vec![20, 150]);
    }

    #[test]
    fn test_mean_channels_integer_mean() {
        let data = vec![10u8, 20, 31]; // mean = 61/3 = 20 (integer)
        let out = CpuBackend.mean_channels(view(&data, 1, 1, 3));
        assert_eq!(out, vec![20]);
    }

    #[test]
    fn test_blend_mask_extremes() {
        let a = vec![200u8; 4];
        let b = vec![50u8; 4];
        let full = vec![255u8; 4];
        let none = vec![0u8; 4];
        let out = CpuBackend.blend(
            view(&a, 2, 2, 1),
            view(&b, 2, 2, 1),
            view(&full, 2, 2, 1),
        );
        assert_eq!(out, a);
        let out = CpuBackend.blend(
            view(&a, 2, 2, 1),
            view(&b, 2, 2, 1),
            view(&none, 2, 2, 1),
        );
        assert_eq!(out, b);
    }

    #[test]
    fn test_blend_midpoint() {
        let a = vec![200u8];
        let b = vec![100u8];
        let mask = vec![128u8];
        let out = CpuBackend.blend(
            view(&a, 1, 1, 1),
            view(&b, 1, 1, 1),
            view(&mask, 1, 1, 1),
        );
        // (128*200 + 127*100 + 127) / 255 = 150 (rounded)
        assert_eq!(out, vec![150]);
    }
}
