extern crate alloc;
use alloc::vec::Vec;
use core::cmp::Ordering;

use rgb::RGB8;

use crate::median_cut::by_weighted_volume;
use crate::pqueue::PQueue;
use crate::vbox::VBox;

/// One palette region and its representative color.
#[derive(Debug, Clone)]
pub struct ColorMapEntry {
    pub vbox: VBox,
    pub color: RGB8,
}

fn entry_order(a: &ColorMapEntry, b: &ColorMapEntry) -> Ordering {
    by_weighted_volume(&a.vbox, &b.vbox)
}

/// The boxes left after quantization, with their average colors.
///
/// Entries keep the order they were pushed in. [`crate::quantize`] pushes
/// them largest `count * volume` first, so [`ColorMap::dominant`] is the
/// biggest region of a fresh map. [`ColorMap::sort`] reorders ascending by
/// the same key.
///
/// Lookups scan entries in their current order and never re-sort.
#[derive(Debug, Clone)]
pub struct ColorMap {
    entries: PQueue<ColorMapEntry>,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorMap {
    pub fn new() -> Self {
        Self {
            entries: PQueue::new(entry_order),
        }
    }

    pub fn push(&mut self, vbox: VBox) {
        let color = vbox.average();
        self.entries.push(ColorMapEntry { vbox, color });
    }

    /// Average colors in current entry order.
    pub fn palette(&self) -> Vec<RGB8> {
        self.entries.iter().map(|e| e.color).collect()
    }

    /// The first palette color.
    pub fn dominant(&self) -> Option<RGB8> {
        self.entries.as_slice().first().map(|e| e.color)
    }

    pub fn entries(&self) -> &[ColorMapEntry] {
        self.entries.as_slice()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reorder entries ascending by `count * volume`.
    pub fn sort(&mut self) {
        self.entries.sort();
    }

    /// Palette color closest to `px` by Euclidean RGB distance.
    /// Ties go to the entry listed first.
    pub fn nearest(&self, px: RGB8) -> Option<RGB8> {
        let mut best: Option<(u32, RGB8)> = None;
        for entry in self.entries.iter() {
            let d = distance_sq(px, entry.color);
            if best.map_or(true, |(best_d, _)| d < best_d) {
                best = Some((d, entry.color));
            }
        }
        best.map(|(_, color)| color)
    }

    /// Color of the first region containing `px`, or the nearest color when
    /// no region does.
    pub fn map(&self, px: RGB8) -> Option<RGB8> {
        self.entries
            .iter()
            .find(|e| e.vbox.contains(px))
            .map(|e| e.color)
            .or_else(|| self.nearest(px))
    }

    /// [`ColorMap::map`] over a slice of pixels. `None` for an empty map.
    pub fn remap(&self, pixels: &[RGB8]) -> Option<Vec<RGB8>> {
        pixels.iter().map(|&px| self.map(px)).collect()
    }
}

impl FromIterator<VBox> for ColorMap {
    fn from_iter<I: IntoIterator<Item = VBox>>(iter: I) -> Self {
        let mut cmap = Self::new();
        cmap.extend(iter);
        cmap
    }
}

impl Extend<VBox> for ColorMap {
    fn extend<I: IntoIterator<Item = VBox>>(&mut self, iter: I) {
        for vbox in iter {
            self.push(vbox);
        }
    }
}

#[inline]
fn distance_sq(a: RGB8, b: RGB8) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}
