extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use rgb::RGB8;

use crate::error::QuantizeError;

/// Default number of significant bits kept per channel.
pub const DEFAULT_SIGBITS: u32 = 5;

/// Pixel occupancy over a reduced-precision RGB cube.
///
/// Each channel keeps its top `sigbits` bits, giving `2^sigbits` cells per
/// axis. Cells are stored densely; an unseen cell counts zero.
#[derive(Debug, Clone)]
pub struct Histogram {
    sigbits: u32,
    counts: Vec<u32>,
    occupied: usize,
    bounds: Bounds,
}

/// Inclusive per-axis ranges in quantized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub r1: u8,
    pub r2: u8,
    pub g1: u8,
    pub g2: u8,
    pub b1: u8,
    pub b2: u8,
}

impl Histogram {
    /// Count every sample into its quantized cell.
    pub fn build(samples: &[RGB8], sigbits: u32) -> Result<Self, QuantizeError> {
        if !(1..=8).contains(&sigbits) {
            return Err(QuantizeError::InvalidSigbits(sigbits));
        }
        if samples.is_empty() {
            return Err(QuantizeError::EmptyInput);
        }

        let rshift = 8 - sigbits;
        let mut counts = vec![0u32; 1usize << (3 * sigbits)];
        let mut occupied = 0;
        let mut bounds = Bounds {
            r1: u8::MAX,
            r2: 0,
            g1: u8::MAX,
            g2: 0,
            b1: u8::MAX,
            b2: 0,
        };

        for px in samples {
            let (r, g, b) = (px.r >> rshift, px.g >> rshift, px.b >> rshift);
            let cell = &mut counts[color_index(sigbits, r, g, b)];
            if *cell == 0 {
                occupied += 1;
            }
            *cell = cell.saturating_add(1);

            bounds.r1 = bounds.r1.min(r);
            bounds.r2 = bounds.r2.max(r);
            bounds.g1 = bounds.g1.min(g);
            bounds.g2 = bounds.g2.max(g);
            bounds.b1 = bounds.b1.min(b);
            bounds.b2 = bounds.b2.max(b);
        }

        tracing::debug!(
            samples = samples.len(),
            occupied,
            sigbits,
            "built color histogram"
        );

        Ok(Self {
            sigbits,
            counts,
            occupied,
            bounds,
        })
    }

    pub fn sigbits(&self) -> u32 {
        self.sigbits
    }

    /// Right shift that maps an 8-bit channel into this histogram's space.
    pub fn rshift(&self) -> u32 {
        8 - self.sigbits
    }

    /// Population of the cell at quantized coordinates `(r, g, b)`.
    #[inline]
    pub fn get(&self, r: u8, g: u8, b: u8) -> u32 {
        self.counts[color_index(self.sigbits, r, g, b)]
    }

    /// Number of cells with at least one sample.
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Tightest box around every sample, in quantized coordinates.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Quantize an 8-bit pixel into this histogram's coordinates.
    #[inline]
    pub fn quantize(&self, px: RGB8) -> (u8, u8, u8) {
        let shift = self.rshift();
        (px.r >> shift, px.g >> shift, px.b >> shift)
    }
}

/// Interleave quantized channels into a single cell index.
#[inline]
pub fn color_index(sigbits: u32, r: u8, g: u8, b: u8) -> usize {
    ((r as usize) << (2 * sigbits)) | ((g as usize) << sigbits) | b as usize
}
