//! Pixel-engine boundary.
//!
//! [`PixelBackend`] is the capability set every concrete engine must
//! provide; [`Image`](crate::Image) delegates all producing pixel
//! operations through it. The active engine is fixed at build time by
//! cargo feature, so the hot path pays no dynamic dispatch.

use crate::view::ImageView;
use iris_core::TransformMatrix;

#[cfg(feature = "backend-cpu")]
mod cpu;
#[cfg(feature = "backend-cpu")]
pub use cpu::CpuBackend;

#[cfg(not(feature = "backend-cpu"))]
compile_error!("iris-image requires a pixel backend feature (enable `backend-cpu`)");

/// Resampling filter for `resize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
}

/// Quarter-turn rotations, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Cw90,
    Cw180,
    Cw270,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    Erode,
    Dilate,
}

/// Threshold response, matching the usual CV taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdKind {
    /// `v > thresh ? maxval : 0`
    Binary,
    /// `v > thresh ? 0 : maxval`
    BinaryInv,
    /// `v > thresh ? thresh : v`
    Trunc,
    /// `v > thresh ? v : 0`
    ToZero,
    /// `v > thresh ? 0 : v`
    ToZeroInv,
}

/// One concrete pixel engine.
///
/// Inputs arrive as [`ImageView`]s over validated buffers; every method
/// returns a freshly allocated output buffer (callers attach the
/// dimensions, which only `resize`/`warp_affine`/`extract`/`pad`/
/// `rotate` change). Channel-count preconditions are enforced by the
/// `Image` wrapper, not here.
pub trait PixelBackend {
    fn resize(&self, src: ImageView<'_>, dst_w: u32, dst_h: u32, interp: Interpolation)
        -> Vec<u8>;

    /// Copy an in-bounds sub-rectangle. The caller has already clipped.
    fn extract(&self, src: ImageView<'_>, x: u32, y: u32, w: u32, h: u32) -> Vec<u8>;

    /// Sample `src` under the inverse of `matrix` into a `dst_w x dst_h`
    /// buffer; pixels mapping outside the source read as 0.
    fn warp_affine(
        &self,
        src: ImageView<'_>,
        matrix: &TransformMatrix,
        dst_w: u32,
        dst_h: u32,
    ) -> Vec<u8>;

    fn rotate(&self, src: ImageView<'_>, rotation: Rotation) -> Vec<u8>;

    fn flip_horizontal(&self, src: ImageView<'_>) -> Vec<u8>;

    fn flip_vertical(&self, src: ImageView<'_>) -> Vec<u8>;

    fn pad(
        &self,
        src: ImageView<'_>,
        top: u32,
        bottom: u32,
        left: u32,
        right: u32,
        color: &[f64],
    ) -> Vec<u8>;

    fn gaussian_blur(&self, src: ImageView<'_>, kernel_size: u32, sigma: f64) -> Vec<u8>;

    /// Square-kernel erosion/dilation over a single-channel image.
    fn morph(&self, src: ImageView<'_>, kernel_size: u32, iterations: u32, op: MorphOp)
        -> Vec<u8>;

    fn threshold(
        &self,
        src: ImageView<'_>,
        thresh: f64,
        maxval: f64,
        kind: ThresholdKind,
    ) -> Vec<u8>;

    /// BT.601 luma over BGR input.
    fn to_gray(&self, src: ImageView<'_>) -> Vec<u8>;

    fn swap_rb(&self, src: ImageView<'_>) -> Vec<u8>;

    /// Per-byte `v * scale`, saturating.
    fn scale_values(&self, src: ImageView<'_>, scale: f64) -> Vec<u8>;

    /// Per-byte `v + value`, saturating.
    fn offset_values(&self, src: ImageView<'_>, value: f64) -> Vec<u8>;

    fn abs_diff(&self, a: ImageView<'_>, b: ImageView<'_>) -> Vec<u8>;

    /// Integer per-pixel mean across channels, single-channel output.
    fn mean_channels(&self, src: ImageView<'_>) -> Vec<u8>;

    /// `out = (mask*a + (255-mask)*b + 127) / 255`, mask single-channel.
    fn blend(&self, a: ImageView<'_>, b: ImageView<'_>, mask: ImageView<'_>) -> Vec<u8>;
}

/// The engine selected at build time.
#[cfg(feature = "backend-cpu")]
pub(crate) fn active() -> &'static CpuBackend {
    static BACKEND: CpuBackend = CpuBackend;
    &BACKEND
}
