//! Dominant color and palette extraction by modified median cut quantization.
//!
//! Samples are counted into a reduced-precision RGB histogram, then the
//! occupied color cube is repeatedly cut along its widest axis at the
//! population midpoint. Splitting runs in two phases: first by population,
//! then by population times volume, so large sparse regions still get
//! their own colors. The average color of each final box is a palette entry.
//!
//! ```
//! use rgb::RGB8;
//!
//! let samples = vec![RGB8::new(200, 100, 50); 1000];
//! let cmap = colorthief::quantize(&samples, 5).unwrap();
//! assert_eq!(cmap.len(), 1);
//! ```
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod color_map;
#[cfg(feature = "image")]
pub mod decode;
pub mod error;
pub mod extract;
pub mod histogram;
pub mod median_cut;
pub mod pqueue;
pub mod sample;
pub mod vbox;

pub use color_map::{ColorMap, ColorMapEntry};
pub use error::{ExtractError, QuantizeError};
pub use extract::{get_color, get_palette, PaletteOptions};
pub use rgb::{RGB8, RGBA8};
pub use vbox::VBox;

use alloc::sync::Arc;

/// Configuration for a quantization run.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizeConfig {
    /// Target palette size (2..=256). The result may miss it by one.
    pub max_colors: u32,
    /// Significant bits kept per channel in the histogram (1..=8).
    pub sigbits: u32,
    /// Upper bound on pop/split cycles per phase.
    pub max_iterations: u32,
    /// Share of `max_colors` produced by the population-ordered phase.
    pub fract_by_population: f64,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            max_colors: extract::DEFAULT_COLOR_COUNT,
            sigbits: histogram::DEFAULT_SIGBITS,
            max_iterations: 1000,
            fract_by_population: 0.75,
        }
    }
}

impl QuantizeConfig {
    /// Default settings: 5 colors, 5 significant bits, 1000 iterations per
    /// phase and a 0.75 population share.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested palette size, `2..=256`.
    pub fn max_colors(mut self, n: u32) -> Self {
        self.max_colors = n;
        self
    }

    /// Bits kept per channel in the histogram, `1..=8`.
    pub fn sigbits(mut self, bits: u32) -> Self {
        self.sigbits = bits;
        self
    }

    /// Upper bound on loop iterations in each splitting phase.
    pub fn max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = n;
        self
    }

    /// Share of `max_colors` produced by the population-ordered first phase,
    /// `0.0..=1.0`.
    pub fn fract_by_population(mut self, fract: f64) -> Self {
        self.fract_by_population = fract;
        self
    }

    fn validate(&self) -> Result<(), QuantizeError> {
        if self.max_colors < 2 || self.max_colors > 256 {
            return Err(QuantizeError::InvalidMaxColors(self.max_colors));
        }
        if !(1..=8).contains(&self.sigbits) {
            return Err(QuantizeError::InvalidSigbits(self.sigbits));
        }
        if !(0.0..=1.0).contains(&self.fract_by_population) {
            return Err(QuantizeError::InvalidPopulationFraction(
                self.fract_by_population,
            ));
        }
        Ok(())
    }
}

/// Quantize RGB samples to about `max_colors` representative colors.
pub fn quantize(samples: &[RGB8], max_colors: u32) -> Result<ColorMap, QuantizeError> {
    quantize_with_config(samples, &QuantizeConfig::new().max_colors(max_colors))
}

/// Quantize RGB samples with explicit settings.
///
/// Fails without doing any work on empty input or an invalid config.
pub fn quantize_with_config(
    samples: &[RGB8],
    config: &QuantizeConfig,
) -> Result<ColorMap, QuantizeError> {
    if samples.is_empty() {
        return Err(QuantizeError::EmptyInput);
    }
    config.validate()?;

    let hist = Arc::new(histogram::Histogram::build(samples, config.sigbits)?);
    let cmap = median_cut::median_cut(hist, config);

    tracing::debug!(
        requested = config.max_colors,
        produced = cmap.len(),
        "quantized samples"
    );
    Ok(cmap)
}
