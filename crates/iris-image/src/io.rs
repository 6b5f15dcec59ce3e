//! Raster file I/O and the display fallback.
//!
//! Formats are chosen by file extension (JPEG/PNG/BMP); decoding goes
//! through the `image` crate. Three-channel data converts between the
//! codec's RGB and the in-memory BGR order at this boundary, so the rest
//! of the crate never sees RGB.

use crate::error::ImageError;
use crate::image::Image;
use std::path::Path;

fn swap_rb_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
}

impl Image {
    /// Decode a raster file into an owned image with the requested
    /// channel count: 1 for grayscale, 3 for BGR.
    ///
    /// File problems come back as [`ImageError::Io`], malformed or
    /// unsupported content as [`ImageError::Codec`].
    pub fn open(path: impl AsRef<Path>, channels: u8) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path.as_ref())?;
        let decoded = image::load_from_memory(&bytes)?;

        let (width, height) = (decoded.width(), decoded.height());
        let data = match channels {
            1 => decoded.to_luma8().into_raw(),
            3 => {
                let mut rgb = decoded.to_rgb8().into_raw();
                swap_rb_in_place(&mut rgb);
                rgb
            }
            other => return Err(ImageError::UnsupportedChannels(other)),
        };

        Image::from_vec(width, height, channels, data)
    }

    /// Encode to a raster file; the format follows the extension
    /// (JPEG/PNG/BMP). Only 1- and 3-channel images are writable.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        if self.is_empty() {
            return Err(ImageError::DimensionMismatch(
                "cannot write an empty image".into(),
            ));
        }
        let path = path.as_ref();
        match self.channels() {
            1 => image::save_buffer(
                path,
                self.as_bytes(),
                self.width(),
                self.height(),
                image::ExtendedColorType::L8,
            )?,
            3 => {
                let mut rgb = self.as_bytes().to_vec();
                swap_rb_in_place(&mut rgb);
                image::save_buffer(
                    path,
                    &rgb,
                    self.width(),
                    self.height(),
                    image::ExtendedColorType::Rgb8,
                )?;
            }
            other => return Err(ImageError::UnsupportedChannels(other)),
        }
        Ok(())
    }

    /// Display the image in a window named `window`.
    ///
    /// No GUI backend is compiled in, so this degrades gracefully: the
    /// image is written as a PNG under the system temp directory (or
    /// `dir` when given) and the path is logged. Never crashes the
    /// calling pipeline; an unwritable fallback location reports the
    /// error instead.
    pub fn show(&self, window: &str, dir: Option<&Path>) -> Result<(), ImageError> {
        let name: String = window
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        let target = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir)
            .join(format!("iris-show-{name}.png"));
        self.write(&target)?;
        tracing::info!(window, path = %target.display(), "no display backend, wrote snapshot");
        Ok(())
    }
}
