//! Owned image type and its pixel operations.

use crate::backend::{self, Interpolation, MorphOp, PixelBackend, Rotation, ThresholdKind};
use crate::error::ImageError;
use crate::view::ImageView;
use iris_core::{Rect, Size, TransformMatrix};
use std::fmt;

/// Backing storage: a buffer the image owns, or aliased caller memory
/// from [`Image::from_raw_parts`].
enum PixelStore {
    Owned(Vec<u8>),
    Raw { ptr: *const u8, len: usize },
}

/// A row-major `width * height * channels` pixel buffer (8 bits per
/// channel) with an ownership decision made at construction.
///
/// Three-channel images are BGR in memory (the color constants in
/// [`color`](crate::color) follow suit); [`swap_rb`](Image::swap_rb)
/// converts for RGB-expecting consumers.
///
/// Every producing operation (`resize`, `crop`, `warp_affine`, the
/// rotations, ...) returns a fresh owned image that never aliases the
/// receiver's buffer. Only the drawing operations and `fill` mutate in
/// place. `Clone` is the explicit deep-copy escape hatch.
pub struct Image {
    width: u32,
    height: u32,
    channels: u8,
    store: PixelStore,
}

// SAFETY: the owned store is a Vec. The raw store is only reachable via
// `from_raw_parts`, whose contract requires the aliased buffer to stay
// valid and unmodified for the image's entire lifetime; under that
// contract all access is read-only and sound from any thread.
unsafe impl Send for Image {}
unsafe impl Sync for Image {}

impl Image {
    /// An empty image (no buffer, zero dimensions).
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            channels: 0,
            store: PixelStore::Owned(Vec::new()),
        }
    }

    /// Deep-copy caller pixels into an owned image.
    pub fn from_pixels(
        width: u32,
        height: u32,
        channels: u8,
        data: &[u8],
    ) -> Result<Self, ImageError> {
        Self::from_vec(width, height, channels, data.to_vec())
    }

    /// Take ownership of an existing buffer.
    pub fn from_vec(
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(ImageError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            store: PixelStore::Owned(data),
        })
    }

    /// A `width x height x channels` image with every byte set to `value`.
    pub fn filled(width: u32, height: u32, channels: u8, value: u8) -> Self {
        Self {
            width,
            height,
            channels,
            store: PixelStore::Owned(vec![
                value;
                width as usize * height as usize * channels as usize
            ]),
        }
    }

    pub(crate) fn from_view(view: ImageView<'_>) -> Self {
        Self {
            width: view.width(),
            height: view.height(),
            channels: view.channels(),
            store: PixelStore::Owned(view.as_bytes().to_vec()),
        }
    }

    /// Alias externally owned memory without copying.
    ///
    /// A null `ptr` yields an empty image.
    ///
    /// # Safety
    ///
    /// `ptr` must point to at least `width * height * channels` readable
    /// bytes that remain **valid and unmodified for the entire lifetime
    /// of the returned image** (including any clones of the pointer made
    /// by the caller). Writing to or freeing the buffer while the image
    /// lives is undefined behavior the type cannot detect. Prefer
    /// [`ImageView`] when a lifetime can express the relationship; this
    /// constructor exists for FFI handoff where it cannot.
    pub unsafe fn from_raw_parts(ptr: *const u8, width: u32, height: u32, channels: u8) -> Self {
        if ptr.is_null() {
            return Self::new();
        }
        Self {
            width,
            height,
            channels,
            store: PixelStore::Raw {
                ptr,
                len: width as usize * height as usize * channels as usize,
            },
        }
    }

    /// Re-populate in place. `None` data zero-fills the new buffer.
    pub fn reset(
        &mut self,
        width: u32,
        height: u32,
        channels: u8,
        data: Option<&[u8]>,
    ) -> Result<(), ImageError> {
        let expected = width as usize * height as usize * channels as usize;
        let buf = match data {
            Some(d) => {
                if d.len() != expected {
                    return Err(ImageError::BufferSize {
                        expected,
                        actual: d.len(),
                    });
                }
                d.to_vec()
            }
            None => vec![0u8; expected],
        };
        self.width = width;
        self.height = height;
        self.channels = channels;
        self.store = PixelStore::Owned(buf);
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn size(&self) -> Size<i32> {
        Size::new(self.width as i32, self.height as i32)
    }

    /// True when there is no buffer or any dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty() || self.width == 0 || self.height == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.store {
            PixelStore::Owned(v) => v,
            // SAFETY: upheld by the `from_raw_parts` contract.
            PixelStore::Raw { ptr, len } => unsafe { std::slice::from_raw_parts(*ptr, *len) },
        }
    }

    /// Raw pointer to the first byte, for handoff to native consumers.
    pub fn as_ptr(&self) -> *const u8 {
        self.as_bytes().as_ptr()
    }

    /// Consume into the underlying buffer (copies when aliased).
    pub fn into_vec(self) -> Vec<u8> {
        match self.store {
            PixelStore::Owned(v) => v,
            PixelStore::Raw { .. } => self.as_bytes().to_vec(),
        }
    }

    pub fn as_view(&self) -> ImageView<'_> {
        ImageView::raw(self.as_bytes(), self.width, self.height, self.channels)
    }

    /// Value of one channel of one pixel. Panics out of bounds.
    pub fn pixel(&self, x: u32, y: u32, ch: u8) -> u8 {
        self.as_view().pixel(x, y, ch)
    }

    /// Detach from aliased memory; no-op for owned images. Mutating
    /// operations call this first, so drawing on a zero-copy image never
    /// writes through the caller's buffer.
    fn make_owned(&mut self) {
        if let PixelStore::Raw { .. } = self.store {
            self.store = PixelStore::Owned(self.as_bytes().to_vec());
        }
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        self.make_owned();
        match &mut self.store {
            PixelStore::Owned(v) => v,
            PixelStore::Raw { .. } => unreachable!("make_owned converted the store"),
        }
    }

    fn produce(&self, width: u32, height: u32, channels: u8, data: Vec<u8>) -> Image {
        Image {
            width,
            height,
            channels,
            store: PixelStore::Owned(data),
        }
    }

    // --- geometric operations ---

    pub fn resize(&self, width: u32, height: u32, interp: Interpolation) -> Image {
        let data = backend::active().resize(self.as_view(), width, height, interp);
        self.produce(width, height, self.channels, data)
    }

    /// Copy out a sub-rectangle. The rectangle is clipped to the image
    /// bounds first, so out-of-range requests shrink rather than read
    /// past the buffer; a fully outside rectangle yields an empty image.
    pub fn crop(&self, rect: Rect<i32>) -> Image {
        let clipped = rect.safe_rect(self.width as i32, self.height as i32);
        if clipped.is_empty() {
            return Image::new();
        }
        let data = backend::active().extract(
            self.as_view(),
            clipped.x as u32,
            clipped.y as u32,
            clipped.width as u32,
            clipped.height as u32,
        );
        self.produce(clipped.width as u32, clipped.height as u32, self.channels, data)
    }

    /// Sample this image under the inverse of `matrix` into a
    /// `width x height` output. Pixels mapping outside the source are 0.
    pub fn warp_affine(&self, matrix: &TransformMatrix, width: u32, height: u32) -> Image {
        let data = backend::active().warp_affine(self.as_view(), matrix, width, height);
        self.produce(width, height, self.channels, data)
    }

    /// Rotate 90 degrees clockwise.
    pub fn rotate_90(&self) -> Image {
        let data = backend::active().rotate(self.as_view(), Rotation::Cw90);
        self.produce(self.height, self.width, self.channels, data)
    }

    pub fn rotate_180(&self) -> Image {
        let data = backend::active().rotate(self.as_view(), Rotation::Cw180);
        self.produce(self.width, self.height, self.channels, data)
    }

    /// Rotate 270 degrees clockwise.
    pub fn rotate_270(&self) -> Image {
        let data = backend::active().rotate(self.as_view(), Rotation::Cw270);
        self.produce(self.height, self.width, self.channels, data)
    }

    pub fn flip_horizontal(&self) -> Image {
        let data = backend::active().flip_horizontal(self.as_view());
        self.produce(self.width, self.height, self.channels, data)
    }

    pub fn flip_vertical(&self) -> Image {
        let data = backend::active().flip_vertical(self.as_view());
        self.produce(self.width, self.height, self.channels, data)
    }

    /// Add a constant border on each side. `color` is per channel;
    /// missing entries read as 0.
    pub fn pad(&self, top: u32, bottom: u32, left: u32, right: u32, color: &[f64]) -> Image {
        let data = backend::active().pad(self.as_view(), top, bottom, left, right, color);
        self.produce(
            self.width + left + right,
            self.height + top + bottom,
            self.channels,
            data,
        )
    }

    // --- photometric operations ---

    /// Gaussian blur with a square `kernel_size` kernel (odd, >= 1).
    /// A non-positive sigma derives one from the kernel size.
    pub fn gaussian_blur(&self, kernel_size: u32, sigma: f64) -> Image {
        if kernel_size % 2 == 0 || kernel_size == 0 {
            iris_core::fatal!("gaussian_blur kernel size must be odd, got {kernel_size}");
        }
        let data = backend::active().gaussian_blur(self.as_view(), kernel_size, sigma);
        self.produce(self.width, self.height, self.channels, data)
    }

    /// Morphological erosion. Single-channel images only; anything else
    /// is a contract violation.
    pub fn erode(&self, kernel_size: u32, iterations: u32) -> Image {
        self.morph(kernel_size, iterations, MorphOp::Erode)
    }

    /// Morphological dilation. Single-channel images only.
    pub fn dilate(&self, kernel_size: u32, iterations: u32) -> Image {
        self.morph(kernel_size, iterations, MorphOp::Dilate)
    }

    fn morph(&self, kernel_size: u32, iterations: u32, op: MorphOp) -> Image {
        if self.channels != 1 {
            iris_core::fatal!(
                "morphology requires a single-channel image, got {} channels",
                self.channels
            );
        }
        if kernel_size % 2 == 0 || kernel_size == 0 {
            iris_core::fatal!("morphology kernel size must be odd, got {kernel_size}");
        }
        let data = backend::active().morph(self.as_view(), kernel_size, iterations, op);
        self.produce(self.width, self.height, self.channels, data)
    }

    /// Threshold a single-channel image.
    pub fn threshold(&self, thresh: f64, maxval: f64, kind: ThresholdKind) -> Image {
        if self.channels != 1 {
            iris_core::fatal!(
                "threshold requires a single-channel image, got {} channels",
                self.channels
            );
        }
        let data = backend::active().threshold(self.as_view(), thresh, maxval, kind);
        self.produce(self.width, self.height, self.channels, data)
    }

    /// BT.601 grayscale. Accepts 1-channel (copy) or 3-channel input.
    pub fn to_gray(&self) -> Image {
        if self.channels != 1 && self.channels != 3 {
            iris_core::fatal!("to_gray requires 1 or 3 channels, got {}", self.channels);
        }
        let data = backend::active().to_gray(self.as_view());
        self.produce(self.width, self.height, 1, data)
    }

    /// Swap the first and third channels (BGR <-> RGB).
    pub fn swap_rb(&self) -> Image {
        if self.channels != 3 {
            iris_core::fatal!("swap_rb requires a 3-channel image, got {}", self.channels);
        }
        let data = backend::active().swap_rb(self.as_view());
        self.produce(self.width, self.height, self.channels, data)
    }

    /// Multiply every byte by `scale`, saturating.
    pub fn mul(&self, scale: f64) -> Image {
        let data = backend::active().scale_values(self.as_view(), scale);
        self.produce(self.width, self.height, self.channels, data)
    }

    /// Add `value` to every byte, saturating.
    pub fn add(&self, value: f64) -> Image {
        let data = backend::active().offset_values(self.as_view(), value);
        self.produce(self.width, self.height, self.channels, data)
    }

    /// Per-pixel absolute difference. Shapes must match.
    pub fn abs_diff(&self, other: &Image) -> Image {
        if self.width != other.width
            || self.height != other.height
            || self.channels != other.channels
        {
            iris_core::fatal!(
                "abs_diff shape mismatch: {}x{}x{} vs {}x{}x{}",
                self.width,
                self.height,
                self.channels,
                other.width,
                other.height,
                other.channels
            );
        }
        let data = backend::active().abs_diff(self.as_view(), other.as_view());
        self.produce(self.width, self.height, self.channels, data)
    }

    /// Integer per-pixel mean across channels, single-channel output.
    pub fn mean_channels(&self) -> Image {
        if self.channels == 0 {
            iris_core::fatal!("mean_channels on an empty image");
        }
        let data = backend::active().mean_channels(self.as_view());
        self.produce(self.width, self.height, 1, data)
    }

    /// Alpha blend: `out = (mask*self + (255-mask)*other) / 255`,
    /// rounded to nearest. `mask` is single-channel; all three images
    /// share width and height, and `other` shares this image's channel
    /// count.
    pub fn blend(&self, other: &Image, mask: &Image) -> Image {
        if self.width != other.width
            || self.height != other.height
            || self.channels != other.channels
            || self.width != mask.width
            || self.height != mask.height
        {
            iris_core::fatal!(
                "blend shape mismatch: {}x{}x{} vs {}x{}x{} (mask {}x{})",
                self.width,
                self.height,
                self.channels,
                other.width,
                other.height,
                other.channels,
                mask.width,
                mask.height
            );
        }
        if mask.channels != 1 {
            iris_core::fatal!("blend mask must be single-channel, got {}", mask.channels);
        }
        let data = backend::active().blend(self.as_view(), other.as_view(), mask.as_view());
        self.produce(self.width, self.height, self.channels, data)
    }

    /// Set every byte of the image to `value`, in place.
    pub fn fill(&mut self, value: f64) {
        let v = value.round().clamp(0.0, 255.0) as u8;
        self.bytes_mut().fill(v);
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Image {
    /// Deep copy; an aliased (zero-copy) image clones into owned memory.
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            store: PixelStore::Owned(self.as_bytes().to_vec()),
        }
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field(
                "owned",
                &matches!(self.store, PixelStore::Owned(_)),
            )
            .finish()
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image({}x{}x{})", self.width, self.height, self.channels)
    }
}
