//! One step's traversal of the fundamental domain.
//!
//! Positions are visited with `v` slowest and `z` fastest. The previous
//! generation is read one `(v, w)` slab at a time. Every neighbour of a
//! canonical position differs from it in exactly one coordinate by one, so the
//! neighbours of slab `(v, w)` lie in slabs `(v, w - 1)`, `(v, w)`, `(v, w + 1)`,
//! `(v - 1, w)` and `(v + 1, w)`. Keeping only those five in memory bounds a
//! step's working set by about `5 (v + 4)^3 / 6` records, independent of how
//! many shells the file holds.

use std::cmp::Ordering;

use super::grid::GridStore;
use super::index::{count_4d, count_5d, index};
use super::lattice::{NeighborhoodCache, Position, REAL_NEIGHBORS};
use super::topple::{topple, Neighbor};
use crate::error::Result;

/// What a full traversal observed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Some position toppled with a non-zero share.
    pub changed: bool,
    /// Some position in shell `max_v` or `max_v + 1` toppled with a non-zero share.
    pub reached_edge: bool,
}

/// Previous-generation values around the slab being toppled.
#[derive(Default)]
struct SlabWindow {
    v: u32,
    w: u32,
    below: Vec<i64>,
    before: Vec<i64>,
    here: Vec<i64>,
    after: Vec<i64>,
    above: Vec<i64>,
}

/// Slab `(v, w)`, or nothing when no canonical position has that prefix.
fn slab(store: &GridStore, v: Option<u32>, w: Option<u32>) -> Result<Vec<i64>> {
    match (v, w) {
        (Some(v), Some(w)) if w <= v => store.read_slab(v, w),
        _ => Ok(Vec::new()),
    }
}

impl SlabWindow {
    /// Move the window onto slab `(v, w)`. Stepping along `w` reuses the slabs
    /// already held for this shell.
    fn focus(&mut self, store: &GridStore, v: u32, w: u32) -> Result<()> {
        if w > 0 && v == self.v && w == self.w + 1 {
            self.before = std::mem::take(&mut self.here);
            self.here = std::mem::take(&mut self.after);
        } else {
            self.before = slab(store, Some(v), w.checked_sub(1))?;
            self.here = store.read_slab(v, w)?;
        }
        self.after = slab(store, Some(v), Some(w + 1))?;
        self.below = slab(store, v.checked_sub(1), Some(w))?;
        self.above = store.read_slab(v + 1, w)?;
        self.v = v;
        self.w = w;
        Ok(())
    }

    #[inline]
    fn get(&self, p: Position) -> i64 {
        let offset = (index(p) - count_5d(p.v()) - count_4d(p.w())) as usize;
        let slab = match (p.v().cmp(&self.v), p.w().cmp(&self.w)) {
            (Ordering::Less, _) => &self.below,
            (Ordering::Greater, _) => &self.above,
            (Ordering::Equal, Ordering::Less) => &self.before,
            (Ordering::Equal, Ordering::Equal) => &self.here,
            (Ordering::Equal, Ordering::Greater) => &self.after,
        };
        slab[offset]
    }
}

/// Topple every canonical position with `v <= max_v + 1` of `current` into `next`.
///
/// `next` must be zeroed and hold every position with `v <= max_v + 2`.
pub fn topple_all(
    current: &GridStore,
    next: &mut GridStore,
    max_v: u32,
    cache: &mut NeighborhoodCache,
) -> Result<StepOutcome> {
    let edge = max_v + 2;
    let mut outcome = StepOutcome::default();
    let mut window = SlabWindow::default();
    let mut neighbors: Vec<Neighbor> = Vec::with_capacity(REAL_NEIGHBORS);

    for v in 0..edge {
        for w in 0..=v {
            window.focus(current, v, w)?;
            for x in 0..=w {
                for y in 0..=x {
                    for z in 0..=y {
                        let p = Position::new(v, w, x, y, z);
                        let value = window.get(p);
                        neighbors.clear();
                        for slot in cache.slots(p) {
                            let q = slot.locate(p);
                            let neighbor_value = window.get(q);
                            if neighbor_value < value {
                                neighbors.push(Neighbor {
                                    position: q,
                                    value: neighbor_value,
                                    multiplier: slot.multiplier,
                                    symmetry_count: slot.symmetry_count,
                                });
                            }
                        }
                        if topple(next, p, value, &mut neighbors)? {
                            outcome.changed = true;
                            if v >= max_v {
                                outcome.reached_edge = true;
                            }
                        }
                    }
                }
            }
        }
    }
    Ok(outcome)
}
