extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use rgb::{RGB8, RGBA8};

use crate::error::ExtractError;
use crate::sample::{rgba_pixels, sample_pixels};

/// Palette size used when none (or an out-of-range one) is requested.
pub const DEFAULT_COLOR_COUNT: u32 = 5;

/// Sampling stride used when none (or zero) is requested.
pub const DEFAULT_QUALITY: usize = 5;

/// Returned when no pixel survives sampling, e.g. an all-white image.
pub const FALLBACK_COLOR: RGB8 = RGB8 {
    r: 255,
    g: 255,
    b: 255,
};

/// Options for palette extraction from loaded pixels.
///
/// Out-of-range values fall back to the defaults instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteOptions {
    /// Requested palette size (2..=256). The result may be slightly smaller.
    pub color_count: u32,
    /// Sampling stride: 1 visits every pixel, larger is faster and coarser.
    pub quality: usize,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            color_count: DEFAULT_COLOR_COUNT,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl PaletteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_count(mut self, n: u32) -> Self {
        self.color_count = n;
        self
    }

    pub fn quality(mut self, q: usize) -> Self {
        self.quality = q;
        self
    }

    /// Replace out-of-range fields with their defaults.
    pub fn clamped(self) -> Self {
        Self {
            color_count: if (2..=256).contains(&self.color_count) {
                self.color_count
            } else {
                DEFAULT_COLOR_COUNT
            },
            quality: if self.quality < 1 {
                DEFAULT_QUALITY
            } else {
                self.quality
            },
        }
    }
}

/// Extract a palette from RGBA pixels.
///
/// Transparent and near-white pixels are ignored. If nothing is left to
/// quantize the palette is `[FALLBACK_COLOR]`. Colors come out largest
/// region first.
pub fn get_palette(pixels: &[RGBA8], options: PaletteOptions) -> Vec<RGB8> {
    let options = options.clamped();
    let samples = sample_pixels(pixels, options.quality);

    match crate::quantize(&samples, options.color_count) {
        Ok(cmap) => cmap.palette(),
        Err(err) => {
            tracing::debug!(%err, "no palette produced, using fallback color");
            vec![FALLBACK_COLOR]
        }
    }
}

/// The first color of a five-color palette.
pub fn get_color(pixels: &[RGBA8], quality: usize) -> RGB8 {
    let options = PaletteOptions::new().quality(quality);
    get_palette(pixels, options)
        .first()
        .copied()
        .unwrap_or(FALLBACK_COLOR)
}

/// [`get_palette`] over a row-major RGBA byte buffer of known dimensions.
pub fn get_palette_from_rgba_bytes(
    bytes: &[u8],
    width: usize,
    height: usize,
    options: PaletteOptions,
) -> Result<Vec<RGB8>, ExtractError> {
    let pixels = rgba_pixels(bytes)?;
    if pixels.len() != width * height {
        return Err(ExtractError::DimensionMismatch {
            len: pixels.len(),
            width,
            height,
        });
    }
    Ok(get_palette(&pixels, options))
}

/// [`get_color`] over a row-major RGBA byte buffer of known dimensions.
pub fn get_color_from_rgba_bytes(
    bytes: &[u8],
    width: usize,
    height: usize,
    quality: usize,
) -> Result<RGB8, ExtractError> {
    let options = PaletteOptions::new().quality(quality);
    let palette = get_palette_from_rgba_bytes(bytes, width, height, options)?;
    Ok(palette.first().copied().unwrap_or(FALLBACK_COLOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_options() {
        let opts = PaletteOptions::new().color_count(1).quality(0).clamped();
        assert_eq!(opts, PaletteOptions::default());
        let opts = PaletteOptions::new().color_count(257).clamped();
        assert_eq!(opts.color_count, DEFAULT_COLOR_COUNT);
        let opts = PaletteOptions::new().color_count(256).quality(1).clamped();
        assert_eq!(opts.color_count, 256);
        assert_eq!(opts.quality, 1);
    }

    #[test]
    fn all_white_falls_back() {
        let pixels = vec![RGBA8::new(255, 255, 255, 255); 64];
        assert_eq!(get_palette(&pixels, PaletteOptions::new()), vec![FALLBACK_COLOR]);
        assert_eq!(get_color(&pixels, 1), FALLBACK_COLOR);
    }

    #[test]
    fn fully_transparent_falls_back() {
        let pixels = vec![RGBA8::new(10, 20, 30, 0); 64];
        assert_eq!(get_color(&pixels, 1), FALLBACK_COLOR);
    }

    #[test]
    fn solid_color_is_dominant() {
        let pixels = vec![RGBA8::new(200, 100, 50, 255); 256];
        let color = get_color(&pixels, 1);
        assert!(color.r.abs_diff(200) <= 8);
        assert!(color.g.abs_diff(100) <= 8);
        assert!(color.b.abs_diff(50) <= 8);
    }

    #[test]
    fn invalid_color_count_uses_default() {
        let pixels: Vec<RGBA8> = (0..4096u32)
            .map(|i| RGBA8::new((i % 16 * 16) as u8, (i / 16 % 16 * 16) as u8, (i / 256 * 16) as u8, 255))
            .collect();
        let palette = get_palette(&pixels, PaletteOptions::new().color_count(1000).quality(1));
        let default = get_palette(
            &pixels,
            PaletteOptions::new().color_count(DEFAULT_COLOR_COUNT).quality(1),
        );
        assert_eq!(palette, default);
    }

    #[test]
    fn byte_buffer_dimensions_are_checked() {
        let bytes = [0u8; 16];
        assert!(matches!(
            get_palette_from_rgba_bytes(&bytes, 3, 1, PaletteOptions::new()),
            Err(ExtractError::DimensionMismatch { len: 4, width: 3, height: 1 })
        ));
        let color = get_color_from_rgba_bytes(&bytes, 2, 2, 1).unwrap();
        // Fully transparent buffer.
        assert_eq!(color, FALLBACK_COLOR);
    }
}
