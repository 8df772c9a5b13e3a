extern crate alloc;
use alloc::vec::Vec;

use rgb::{RGB8, RGBA8};

use crate::error::ExtractError;

/// Pixels below this alpha are skipped.
pub const MIN_ALPHA: u8 = 125;

/// Pixels with every channel above this are treated as background white.
pub const WHITE_THRESHOLD: u8 = 250;

/// Whether a pixel should feed the quantizer: mostly opaque and not near-white.
#[inline]
pub fn keep_pixel(px: RGBA8) -> bool {
    px.a >= MIN_ALPHA
        && !(px.r > WHITE_THRESHOLD && px.g > WHITE_THRESHOLD && px.b > WHITE_THRESHOLD)
}

/// Walk every `quality`-th pixel and keep the ones [`keep_pixel`] accepts.
///
/// A `quality` of 0 is treated as 1.
pub fn sample_pixels(pixels: &[RGBA8], quality: usize) -> Vec<RGB8> {
    let step = quality.max(1);
    pixels
        .iter()
        .step_by(step)
        .filter(|px| keep_pixel(**px))
        .map(|px| RGB8::new(px.r, px.g, px.b))
        .collect()
}

/// Reinterpret a row-major RGBA byte buffer as pixels.
pub fn rgba_pixels(bytes: &[u8]) -> Result<Vec<RGBA8>, ExtractError> {
    if bytes.len() % 4 != 0 {
        return Err(ExtractError::BufferLength { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| RGBA8::new(c[0], c[1], c[2], c[3]))
        .collect())
}

/// [`sample_pixels`] over a raw RGBA byte buffer.
pub fn sample_rgba_bytes(bytes: &[u8], quality: usize) -> Result<Vec<RGB8>, ExtractError> {
    Ok(sample_pixels(&rgba_pixels(bytes)?, quality))
}
