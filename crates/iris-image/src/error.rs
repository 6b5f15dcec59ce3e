use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("codec: {0}")]
    Codec(#[from] image::ImageError),
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u8),
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
}
