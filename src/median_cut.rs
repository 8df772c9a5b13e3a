extern crate alloc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::color_map::ColorMap;
use crate::histogram::{Bounds, Histogram};
use crate::pqueue::{Comparator, PQueue};
use crate::vbox::{Axis, VBox};
use crate::QuantizeConfig;

/// Result of cutting one box.
#[derive(Debug, Clone)]
pub enum Cut {
    /// No balance point was found; the box cannot be split.
    None,
    /// The box is too small or too lopsided to split; carries it unchanged.
    Single(VBox),
    /// Two disjoint children that together span the parent along the cut axis.
    Pair(VBox, VBox),
}

/// Phase-1 ordering: population only.
pub fn by_count(a: &VBox, b: &VBox) -> Ordering {
    a.count().cmp(&b.count())
}

/// Phase-2 and color map ordering: population times volume.
pub fn by_weighted_volume(a: &VBox, b: &VBox) -> Ordering {
    a.weighted_volume().cmp(&b.weighted_volume())
}

/// Pick the widest axis, preferring red, then green, on ties.
fn widest_axis(vbox: &VBox) -> Axis {
    let rw = vbox.width(Axis::Red);
    let gw = vbox.width(Axis::Green);
    let bw = vbox.width(Axis::Blue);
    let max = rw.max(gw).max(bw);
    if rw == max {
        Axis::Red
    } else if gw == max {
        Axis::Green
    } else {
        Axis::Blue
    }
}

fn region_count(hist: &Histogram, r: (u8, u8), g: (u8, u8), b: (u8, u8)) -> u64 {
    let mut sum = 0u64;
    for ri in r.0..=r.1 {
        for gi in g.0..=g.1 {
            for bi in b.0..=b.1 {
                sum += hist.get(ri, gi, bi) as u64;
            }
        }
    }
    sum
}

/// Cumulative population along `axis`, one entry per coordinate from the
/// axis minimum to its maximum. Each step sums the full plane spanned by
/// the other two axes.
fn partial_sums(vbox: &VBox, axis: Axis) -> Vec<u64> {
    let hist = vbox.histogram();
    let Bounds {
        r1,
        r2,
        g1,
        g2,
        b1,
        b2,
    } = vbox.bounds();
    let (lo, hi) = vbox.range(axis);

    let mut sums = Vec::with_capacity((hi - lo) as usize + 1);
    let mut total = 0u64;
    for i in lo..=hi {
        total += match axis {
            Axis::Red => region_count(hist, (i, i), (g1, g2), (b1, b2)),
            Axis::Green => region_count(hist, (r1, r2), (i, i), (b1, b2)),
            Axis::Blue => region_count(hist, (r1, r2), (g1, g2), (i, i)),
        };
        sums.push(total);
    }
    sums
}

/// Median-cut one box along its widest axis.
///
/// The cut lands near the population midpoint, pulled toward the longer
/// side, then nudged so neither child is empty when that can be avoided.
/// Callers must not pass an empty box.
pub fn split_box(vbox: &VBox) -> Cut {
    match vbox.count() {
        0 => return Cut::None,
        1 => return Cut::Single(vbox.clone()),
        _ => {}
    }

    let axis = widest_axis(vbox);
    let (lo, hi) = vbox.range(axis);
    let (lo, hi) = (lo as i32, hi as i32);
    let partial = partial_sums(vbox, axis);
    let total = partial.last().copied().unwrap_or(0);

    // Coordinates outside the box read as empty.
    let partial_at = |d: i32| -> u64 {
        if d < lo || d > hi {
            0
        } else {
            partial[(d - lo) as usize]
        }
    };
    let ahead_at = |d: i32| -> u64 {
        if d < lo || d > hi {
            0
        } else {
            total - partial[(d - lo) as usize]
        }
    };

    let Some(i) = (lo..=hi).find(|&i| partial_at(i) * 2 > total) else {
        return Cut::None;
    };

    let left = i - lo;
    let right = hi - i;
    let mut d2 = if left <= right {
        (hi - 1).min(i + right / 2)
    } else {
        // floor(i - 1 - left / 2) with a real-valued half.
        lo.max((2 * i - 2 - left).div_euclid(2))
    };

    while partial_at(d2) == 0 && d2 < hi {
        d2 += 1;
    }
    let mut count2 = ahead_at(d2);
    while count2 == 0 && partial_at(d2 - 1) != 0 {
        d2 -= 1;
        count2 = ahead_at(d2);
    }

    if d2 >= hi {
        // All of the population sits on the top face; a second box would be inverted.
        return Cut::Single(vbox.clone());
    }

    let d2 = d2 as u8;
    tracing::trace!(?axis, cut = d2, count = vbox.count(), "split box");
    Cut::Pair(vbox.with_upper(axis, d2), vbox.with_lower(axis, d2 + 1))
}

/// Pop, split and push until `target` boxes have been counted.
///
/// Counting starts at 1 whatever the queue already holds, and the target is
/// only checked after a cut, so every call attempts at least one split.
/// Empty boxes are put back and cost an iteration. A box the splitter
/// returns on its own goes straight back into the queue; when it is still
/// the top box the loop spins on it until `max_iterations`.
/// Returns the number of iterations used.
pub fn iterate(queue: &mut PQueue<VBox>, target: usize, max_iterations: u32) -> u32 {
    let mut boxes = 1usize;
    let mut iterations = 0;

    while iterations < max_iterations {
        let Some(vbox) = queue.pop() else {
            break;
        };

        if vbox.count() == 0 {
            queue.push(vbox);
            iterations += 1;
            continue;
        }

        match split_box(&vbox) {
            Cut::None => {
                queue.push(vbox);
                break;
            }
            Cut::Single(only) => queue.push(only),
            Cut::Pair(first, second) => {
                queue.push(first);
                queue.push(second);
                boxes += 1;
            }
        }

        if boxes >= target {
            break;
        }
        iterations += 1;
    }

    if iterations >= max_iterations && boxes < target {
        tracing::warn!(
            boxes,
            target,
            max_iterations,
            "median cut stopped at the iteration limit"
        );
    }
    iterations
}

/// Two-phase modified median cut over a populated histogram.
///
/// Phase 1 splits the most populous boxes until a `fract_by_population`
/// share of `max_colors` is reached. Phase 2 re-ranks by population times
/// volume and asks for `max_colors` minus the phase-1 box count. Both phases
/// count from 1, so a run usually ends one short of `max_colors`; small
/// requests can end one over, and unsplittable regions end it early.
pub fn median_cut(histogram: Arc<Histogram>, config: &QuantizeConfig) -> ColorMap {
    let max_colors = config.max_colors as usize;
    let mut queue = PQueue::with_capacity(max_colors, by_count as Comparator<VBox>);
    queue.push(VBox::root(histogram));

    // Truncation is floor for a non-negative product.
    let first_target = (config.fract_by_population * max_colors as f64) as usize;
    let used = iterate(&mut queue, first_target, config.max_iterations);
    tracing::debug!(boxes = queue.len(), iterations = used, "median cut phase 1");

    let mut queue2 = PQueue::with_capacity(max_colors, by_weighted_volume as Comparator<VBox>);
    for vbox in queue.drain_max_first() {
        queue2.push(vbox);
    }

    let second_target = max_colors.saturating_sub(queue2.len());
    let used = iterate(&mut queue2, second_target, config.max_iterations);
    tracing::debug!(boxes = queue2.len(), iterations = used, "median cut phase 2");

    let cmap: ColorMap = queue2.drain_max_first().collect();
    cmap
}
