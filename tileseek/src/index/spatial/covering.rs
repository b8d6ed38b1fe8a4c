//! Quadtree cell coverings.
//!
//! The world square [`WORLD_MIN`, `WORLD_MAX`]² is recursively split into
//! four quadrants; at scale `s` it consists of `2^s × 2^s` cells addressed by
//! Morton (Z-order) codes, so any quadtree cell owns one contiguous code
//! interval and a covering of a rectangle is a short list of disjoint
//! intervals.

use itertools::Itertools;

use crate::common::constants::{MAX_COVERING_SCALE, WORLD_MAX, WORLD_MIN};
use crate::common::CellInterval;
use crate::geometry::{PointD, RectD};

/// How a viewport is decomposed into cell intervals.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CoveringPolicy {
    /// Stop descending at any cell fully inside the viewport and emit its
    /// whole subtree range. Produces short interval lists; the policy the
    /// retrieval engine uses.
    ViewportWithLowLevels,
    /// Always descend to the target scale. Same covered cell set, one
    /// interval per run of leaf cells; useful for cross-checking.
    LeafOnly,
}

#[inline]
fn cell_side(level: u32) -> f64 {
    (WORLD_MAX - WORLD_MIN) / (1u64 << level) as f64
}

/// Interleaves the bits of `ix` (even positions) and `iy` (odd positions).
fn interleave(ix: u64, iy: u64) -> u64 {
    let mut code = 0u64;
    for bit in 0..MAX_COVERING_SCALE as u64 {
        code |= ((ix >> bit) & 1) << (2 * bit);
        code |= ((iy >> bit) & 1) << (2 * bit + 1);
    }
    code
}

fn cell_rect(level: u32, ix: u64, iy: u64) -> RectD {
    let side = cell_side(level);
    let min_x = WORLD_MIN + ix as f64 * side;
    let min_y = WORLD_MIN + iy as f64 * side;
    RectD::new(min_x, min_y, min_x + side, min_y + side)
}

/// Morton code of the scale-`scale` cell containing `point`. Points outside
/// the world square are clamped onto its border cells.
pub fn cell_of_point(point: PointD, scale: u32) -> u64 {
    debug_assert!(scale <= MAX_COVERING_SCALE);
    let cells = 1i64 << scale;
    let side = cell_side(scale);
    let ix = (((point.x - WORLD_MIN) / side).floor() as i64).clamp(0, cells - 1) as u64;
    let iy = (((point.y - WORLD_MIN) / side).floor() as i64).clamp(0, cells - 1) as u64;
    interleave(ix, iy)
}

/// Computes the disjoint, ascending cell-code intervals at `scale` covering
/// `viewport`.
///
/// Every cell intersecting the viewport is included whole, so the covered
/// region may extend past the viewport by up to one cell on each side; the
/// geometry matcher relies on that slack to catch features sitting just
/// outside a tightly clamped viewport.
pub fn cover_viewport(viewport: &RectD, scale: u32, policy: CoveringPolicy) -> Vec<CellInterval> {
    debug_assert!(scale <= MAX_COVERING_SCALE);
    let mut intervals = Vec::new();
    descend(viewport, scale, policy, 0, 0, 0, &mut intervals);
    intervals
        .into_iter()
        .coalesce(|a, b| {
            if a.1 >= b.0 {
                Ok((a.0, a.1.max(b.1)))
            } else {
                Err((a, b))
            }
        })
        .collect()
}

fn descend(
    viewport: &RectD,
    scale: u32,
    policy: CoveringPolicy,
    level: u32,
    ix: u64,
    iy: u64,
    out: &mut Vec<CellInterval>,
) {
    let cell = cell_rect(level, ix, iy);
    if !viewport.intersects(&cell) {
        return;
    }
    let stop = level == scale
        || (policy == CoveringPolicy::ViewportWithLowLevels && viewport.contains_rect(&cell));
    if stop {
        let shift = 2 * (scale - level);
        let base = interleave(ix, iy) << shift;
        out.push((base, base + (1u64 << shift)));
        return;
    }
    // children in Morton order, so the DFS emits ascending intervals
    for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        descend(viewport, scale, policy, level + 1, 2 * ix + dx, 2 * iy + dy, out);
    }
}
