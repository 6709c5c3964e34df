//! Canonical lattice positions and their symmetry-reduced neighbourhoods.
//!
//! The automaton is invariant under permutations and sign flips of the five
//! coordinates, so only the fundamental domain `v >= w >= x >= y >= z >= 0` is
//! stored. A canonical position stands for its whole orbit of real positions.
//!
//! Moving one coordinate of a canonical position by one and canonicalizing
//! again always lands on `p + e_j` or `p - e_j` for some axis `j`, but several
//! of the ten real moves can land on the same canonical neighbour. Each distinct
//! neighbour is described by a [`NeighborSlot`]:
//! - `symmetry_count`: real neighbours of `p` that collapse onto it,
//! - `multiplier`: real neighbours of it that are images of `p`, i.e. how many
//!   real shares one stored share stands for when flow arrives there.

use std::fmt;

/// Number of coordinates.
pub const DIMENSIONS: usize = 5;

/// Real neighbours of any lattice position (one step along each axis, both ways).
pub const REAL_NEIGHBORS: usize = 2 * DIMENSIONS;

/// A position inside the fundamental domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position([u32; DIMENSIONS]);

impl Position {
    pub const ORIGIN: Position = Position([0; DIMENSIONS]);

    /// Build a position from coordinates already in non-increasing order.
    pub const fn new(v: u32, w: u32, x: u32, y: u32, z: u32) -> Self {
        Position([v, w, x, y, z])
    }

    /// Canonical representative of an arbitrary real position.
    pub fn canonicalize(coords: [i32; DIMENSIONS]) -> Self {
        let mut c = coords.map(i32::unsigned_abs);
        c.sort_unstable_by(|a, b| b.cmp(a));
        Position(c)
    }

    fn from_moved(coords: [i64; DIMENSIONS]) -> Self {
        let mut c = coords.map(|c| c.unsigned_abs() as u32);
        c.sort_unstable_by(|a, b| b.cmp(a));
        Position(c)
    }

    #[inline]
    pub fn coords(self) -> [u32; DIMENSIONS] {
        self.0
    }

    #[inline]
    pub fn v(self) -> u32 {
        self.0[0]
    }

    #[inline]
    pub fn w(self) -> u32 {
        self.0[1]
    }

    pub fn is_canonical(self) -> bool {
        self.0.windows(2).all(|pair| pair[0] >= pair[1])
    }

    /// Number of real positions this canonical position stands for.
    pub fn orbit_size(self) -> u64 {
        const FACTORIALS: [u64; DIMENSIONS + 1] = [1, 1, 2, 6, 24, 120];
        let mut permutations = FACTORIALS[DIMENSIONS];
        let mut run = 1;
        for i in 1..=DIMENSIONS {
            if i < DIMENSIONS && self.0[i] == self.0[i - 1] {
                run += 1;
            } else {
                permutations /= FACTORIALS[run];
                run = 1;
            }
        }
        let nonzero = self.0.iter().filter(|&&c| c != 0).count() as u32;
        permutations << nonzero
    }

    /// Canonical forms of the ten real neighbours, in `v+, v-, w+, w-, ...` order.
    pub fn adjacent(self) -> [Position; REAL_NEIGHBORS] {
        let mut out = [Position::ORIGIN; REAL_NEIGHBORS];
        for axis in 0..DIMENSIONS {
            for (k, delta) in [1i64, -1].into_iter().enumerate() {
                let mut moved = self.0.map(i64::from);
                moved[axis] += delta;
                out[axis * 2 + k] = Position::from_moved(moved);
            }
        }
        out
    }

    /// Gaps between consecutive coordinates (and from `z` to 0), clamped at 2.
    ///
    /// Two positions with the same clamped gaps have neighbourhoods of the same
    /// shape, so this keys the neighbourhood cache.
    pub fn shape_key(self) -> usize {
        let mut key = 0;
        for i in 0..DIMENSIONS {
            let next = if i + 1 < DIMENSIONS { self.0[i + 1] } else { 0 };
            key = key * 3 + (self.0[i] - next).min(2) as usize;
        }
        key
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [v, w, x, y, z] = self.0;
        write!(f, "({}, {}, {}, {}, {})", v, w, x, y, z)
    }
}

/// Canonical positions whose first coordinate is `v`, in index order.
pub fn shell(v: u32) -> impl Iterator<Item = Position> {
    (0..=v).flat_map(move |w| {
        (0..=w).flat_map(move |x| {
            (0..=x).flat_map(move |y| (0..=y).map(move |z| Position::new(v, w, x, y, z)))
        })
    })
}

/// One distinct canonical neighbour, relative to the position it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborSlot {
    pub axis: usize,
    /// +1 or -1 along `axis`.
    pub step: i32,
    pub symmetry_count: u32,
    pub multiplier: i64,
}

impl NeighborSlot {
    #[inline]
    pub fn locate(&self, p: Position) -> Position {
        let mut c = p.0;
        c[self.axis] = (c[self.axis] as i64 + self.step as i64) as u32;
        Position(c)
    }
}

/// Distinct canonical neighbours of `p`, in order of first appearance among
/// the ten real moves.
pub fn neighborhood(p: Position) -> Vec<NeighborSlot> {
    let mut slots: Vec<NeighborSlot> = Vec::with_capacity(REAL_NEIGHBORS);
    for q in p.adjacent() {
        if let Some(slot) = slots.iter_mut().find(|s| s.locate(p) == q) {
            slot.symmetry_count += 1;
            continue;
        }
        let axis = (0..DIMENSIONS)
            .find(|&i| q.0[i] != p.0[i])
            .unwrap_or_default();
        let step = (q.0[axis] as i64 - p.0[axis] as i64) as i32;
        slots.push(NeighborSlot {
            axis,
            step,
            symmetry_count: 1,
            multiplier: 0,
        });
    }
    for slot in &mut slots {
        let q = slot.locate(p);
        slot.multiplier = q.adjacent().iter().filter(|&&r| r == p).count() as i64;
    }
    slots
}

/// Neighbourhood shapes computed once per clamped-gap pattern.
pub struct NeighborhoodCache {
    shapes: Vec<Option<Vec<NeighborSlot>>>,
}

impl NeighborhoodCache {
    /// 3^5 clamped-gap patterns.
    const SHAPES: usize = 243;

    pub fn new() -> Self {
        NeighborhoodCache {
            shapes: vec![None; Self::SHAPES],
        }
    }

    pub fn slots(&mut self, p: Position) -> &[NeighborSlot] {
        self.shapes[p.shape_key()].get_or_insert_with(|| neighborhood(p))
    }
}

impl Default for NeighborhoodCache {
    fn default() -> Self {
        Self::new()
    }
}
