use thiserror::Error;

/// Why a quantization run produced no color map.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantizeError {
    #[error("no color samples to quantize")]
    EmptyInput,

    #[error("max_colors must be between 2 and 256, got {0}")]
    InvalidMaxColors(u32),

    #[error("sigbits must be between 1 and 8, got {0}")]
    InvalidSigbits(u32),

    #[error("population fraction must be between 0.0 and 1.0, got {0}")]
    InvalidPopulationFraction(f64),
}

/// Failures reading pixel data before it reaches the quantizer.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("RGBA buffer length {len} is not a multiple of 4")]
    BufferLength { len: usize },

    #[error("pixel buffer holds {len} pixels, which does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[cfg(feature = "std")]
    #[error("failed to read image source")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "image")]
    #[error("failed to decode image")]
    Decode(#[from] image::ImageError),

    #[cfg(feature = "http")]
    #[error("failed to fetch image")]
    Fetch(#[from] reqwest::Error),

    #[cfg(feature = "tokio")]
    #[error("image decoding task failed")]
    Join(#[from] tokio::task::JoinError),
}
