//! NCHW float-tensor interchange.
//!
//! The handoff format the detection/recognition collaborator consumes:
//! a `(1, 3, H, W)` tensor normalized as `(pixel - mean) / std`.
//! Grayscale input replicates its single channel across all three
//! planes; 3-channel input maps each channel to its own plane in
//! storage (BGR) order.

use crate::error::ImageError;
use crate::image::Image;
use ndarray::Array4;

impl Image {
    /// Export as a normalized `(1, 3, height, width)` float tensor.
    ///
    /// 1- or 3-channel images only; anything else is a contract
    /// violation.
    pub fn to_tensor_nchw(&self, mean: f32, std: f32) -> Array4<f32> {
        let c = self.channels();
        if c != 1 && c != 3 {
            iris_core::fatal!("to_tensor_nchw requires 1 or 3 channels, got {c}");
        }
        let (w, h) = (self.width() as usize, self.height() as usize);
        let data = self.as_bytes();
        let mut tensor = Array4::<f32>::zeros((1, 3, h, w));

        for y in 0..h {
            for x in 0..w {
                if c == 1 {
                    let normalized = (data[y * w + x] as f32 - mean) / std;
                    tensor[[0, 0, y, x]] = normalized;
                    tensor[[0, 1, y, x]] = normalized;
                    tensor[[0, 2, y, x]] = normalized;
                } else {
                    let px = (y * w + x) * 3;
                    for ch in 0..3 {
                        tensor[[0, ch, y, x]] = (data[px + ch] as f32 - mean) / std;
                    }
                }
            }
        }

        tensor
    }

    /// Rebuild an image from a `(1, c, H, W)` tensor by undoing the
    /// normalization (`pixel = v * std + mean`, rounded and clamped).
    /// `c` must be 1 or 3.
    pub fn from_tensor_nchw(tensor: &Array4<f32>, mean: f32, std: f32) -> Result<Self, ImageError> {
        let shape = tensor.shape();
        let (batch, c, h, w) = (shape[0], shape[1], shape[2], shape[3]);
        if batch != 1 {
            return Err(ImageError::DimensionMismatch(format!(
                "expected batch size 1, got {batch}"
            )));
        }
        if c != 1 && c != 3 {
            return Err(ImageError::UnsupportedChannels(c as u8));
        }

        let mut data = vec![0u8; w * h * c];
        for y in 0..h {
            for x in 0..w {
                for ch in 0..c {
                    let v = tensor[[0, ch, y, x]] * std + mean;
                    data[(y * w + x) * c + ch] = v.round().clamp(0.0, 255.0) as u8;
                }
            }
        }

        Image::from_vec(w as u32, h as u32, c as u8, data)
    }
}
