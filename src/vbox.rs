extern crate alloc;
use alloc::sync::Arc;

use rgb::RGB8;

use crate::histogram::{Bounds, Histogram};

/// A color channel, used to address one side of a [`VBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Red,
    Green,
    Blue,
}

/// An axis-aligned box in quantized RGB space.
///
/// Population, volume and average color are computed when the box is built
/// and cached; changing a bound goes through [`VBox::with_lower`] or
/// [`VBox::with_upper`], which recompute them. All boxes of one run share
/// the same read-only [`Histogram`].
#[derive(Debug, Clone)]
pub struct VBox {
    bounds: Bounds,
    histogram: Arc<Histogram>,
    count: u64,
    volume: u32,
    average: RGB8,
}

impl VBox {
    /// Build a box over `bounds`. Every axis must satisfy `lo <= hi`.
    pub fn new(bounds: Bounds, histogram: Arc<Histogram>) -> Self {
        debug_assert!(bounds.r1 <= bounds.r2 && bounds.g1 <= bounds.g2 && bounds.b1 <= bounds.b2);
        let mut vbox = Self {
            bounds,
            histogram,
            count: 0,
            volume: 0,
            average: RGB8::new(0, 0, 0),
        };
        vbox.recompute();
        vbox
    }

    /// The box spanning every observed sample.
    pub fn root(histogram: Arc<Histogram>) -> Self {
        let bounds = histogram.bounds();
        Self::new(bounds, histogram)
    }

    /// Refresh the cached count, volume and average from the histogram.
    pub fn recompute(&mut self) {
        let Bounds {
            r1,
            r2,
            g1,
            g2,
            b1,
            b2,
        } = self.bounds;

        self.volume = ((r2 - r1) as u32 + 1) * ((g2 - g1) as u32 + 1) * ((b2 - b1) as u32 + 1);

        let mult = (1u32 << self.histogram.rshift()) as f64;
        let mut total = 0u64;
        let (mut r_sum, mut g_sum, mut b_sum) = (0.0f64, 0.0f64, 0.0f64);

        for r in r1..=r2 {
            for g in g1..=g2 {
                for b in b1..=b2 {
                    let n = self.histogram.get(r, g, b);
                    if n == 0 {
                        continue;
                    }
                    let n64 = n as f64;
                    total += n as u64;
                    r_sum += n64 * (r as f64 + 0.5) * mult;
                    g_sum += n64 * (g as f64 + 0.5) * mult;
                    b_sum += n64 * (b as f64 + 0.5) * mult;
                }
            }
        }

        self.count = total;
        self.average = if total > 0 {
            let t = total as f64;
            RGB8::new(
                channel(r_sum / t),
                channel(g_sum / t),
                channel(b_sum / t),
            )
        } else {
            // Empty box: geometric midpoint.
            RGB8::new(
                channel(mult * (r1 as f64 + r2 as f64 + 1.0) / 2.0),
                channel(mult * (g1 as f64 + g2 as f64 + 1.0) / 2.0),
                channel(mult * (b1 as f64 + b2 as f64 + 1.0) / 2.0),
            )
        };
    }

    /// Number of samples inside the box.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of quantized cells the box spans.
    pub fn volume(&self) -> u32 {
        self.volume
    }

    /// Population-weighted mean color, in 8-bit space.
    pub fn average(&self) -> RGB8 {
        self.average
    }

    /// `count * volume`, the phase-2 and color map ordering key.
    pub fn weighted_volume(&self) -> u64 {
        self.count * self.volume as u64
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn histogram(&self) -> &Arc<Histogram> {
        &self.histogram
    }

    /// Inclusive `(lo, hi)` range along `axis`.
    pub fn range(&self, axis: Axis) -> (u8, u8) {
        let b = &self.bounds;
        match axis {
            Axis::Red => (b.r1, b.r2),
            Axis::Green => (b.g1, b.g2),
            Axis::Blue => (b.b1, b.b2),
        }
    }

    /// Number of cells along `axis`.
    pub fn width(&self, axis: Axis) -> u32 {
        let (lo, hi) = self.range(axis);
        (hi - lo) as u32 + 1
    }

    /// A copy of this box with its upper bound on `axis` moved to `hi`.
    pub fn with_upper(&self, axis: Axis, hi: u8) -> Self {
        let mut bounds = self.bounds;
        match axis {
            Axis::Red => bounds.r2 = hi,
            Axis::Green => bounds.g2 = hi,
            Axis::Blue => bounds.b2 = hi,
        }
        Self::new(bounds, Arc::clone(&self.histogram))
    }

    /// A copy of this box with its lower bound on `axis` moved to `lo`.
    pub fn with_lower(&self, axis: Axis, lo: u8) -> Self {
        let mut bounds = self.bounds;
        match axis {
            Axis::Red => bounds.r1 = lo,
            Axis::Green => bounds.g1 = lo,
            Axis::Blue => bounds.b1 = lo,
        }
        Self::new(bounds, Arc::clone(&self.histogram))
    }

    /// Whether the pixel's quantized coordinates fall inside the box.
    pub fn contains(&self, px: RGB8) -> bool {
        let (r, g, b) = self.histogram.quantize(px);
        let bx = &self.bounds;
        (bx.r1..=bx.r2).contains(&r) && (bx.g1..=bx.g2).contains(&g) && (bx.b1..=bx.b2).contains(&b)
    }
}

#[inline]
fn channel(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}
