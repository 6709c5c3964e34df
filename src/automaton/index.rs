//! Linear layout of canonical positions in a flat record array.
//!
//! Canonical positions `v >= w >= x >= y >= z >= 0` are laid out in the same
//! order the enumerator visits them: `v` slowest, `z` fastest. Each coordinate
//! contributes the number of canonical positions that come before it in its
//! nesting level, so the offset is a sum of simplex counts.

use super::lattice::Position;

/// Bytes per stored value.
pub const POSITION_BYTES: u64 = 8;

/// Canonical 5D positions with `v < side`.
#[inline]
pub fn count_5d(side: u32) -> u64 {
    let n = side as u64;
    n * (n + 1) * (n + 2) * (n + 3) * (n + 4) / 120
}

/// Canonical 4D tails `(w, x, y, z)` with `w < side`.
#[inline]
pub fn count_4d(side: u32) -> u64 {
    let n = side as u64;
    n * (n + 1) * (n + 2) * (n + 3) / 24
}

/// Canonical 3D tails `(x, y, z)` with `x < side`.
#[inline]
pub fn count_3d(side: u32) -> u64 {
    let n = side as u64;
    n * (n + 1) * (n + 2) / 6
}

/// Pairs `(y', z)` with `y' < y`.
#[inline]
pub fn triangular(y: u32) -> u64 {
    let y = y as u64;
    (y * y - y) / 2 + y
}

/// Record index of a canonical position. The tuple is not checked.
#[inline]
pub fn index(p: Position) -> u64 {
    let [v, w, x, y, z] = p.coords();
    count_5d(v) + count_4d(w) + count_3d(x) + triangular(y) + z as u64
}

/// Byte offset of a canonical position inside a generation file.
#[inline]
pub fn byte_offset(p: Position) -> u64 {
    index(p) * POSITION_BYTES
}

/// Number of canonical positions whose first coordinate is exactly `v`.
#[inline]
pub fn shell_len(v: u32) -> u64 {
    count_5d(v + 1) - count_5d(v)
}

/// Number of canonical positions sharing one `(v, w)` prefix.
#[inline]
pub fn slab_len(w: u32) -> u64 {
    count_3d(w + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_match_brute_force() {
        // (y, z) pairs below a fixed x, then nested outwards
        let pairs = |x: u32| -> u64 { (0..=x).map(|y| y as u64 + 1).sum() };
        let tails_3d = |w: u32| -> u64 { (0..=w).map(pairs).sum() };
        let tails_4d = |v: u32| -> u64 { (0..=v).map(tails_3d).sum() };

        for side in 0..9u32 {
            let n5: u64 = (0..side).map(tails_4d).sum();
            let n4: u64 = (0..side).map(tails_3d).sum();
            let n3: u64 = (0..side).map(pairs).sum();
            assert_eq!(count_5d(side), n5, "count_5d({})", side);
            assert_eq!(count_4d(side), n4, "count_4d({})", side);
            assert_eq!(count_3d(side), n3, "count_3d({})", side);
        }
    }

    #[test]
    fn test_index_is_dense_in_traversal_order() {
        let mut expected = 0u64;
        for v in 0..7u32 {
            for w in 0..=v {
                for x in 0..=w {
                    for y in 0..=x {
                        for z in 0..=y {
                            let p = Position::new(v, w, x, y, z);
                            assert_eq!(index(p), expected, "index of {}", p);
                            expected += 1;
                        }
                    }
                }
            }
        }
        assert_eq!(expected, count_5d(7));
    }

    #[test]
    fn test_known_offsets() {
        assert_eq!(index(Position::ORIGIN), 0);
        assert_eq!(index(Position::new(1, 0, 0, 0, 0)), 1);
        assert_eq!(index(Position::new(1, 1, 1, 1, 1)), 5);
        assert_eq!(index(Position::new(2, 0, 0, 0, 0)), 6);
        assert_eq!(byte_offset(Position::new(2, 0, 0, 0, 0)), 48);
    }

    #[test]
    fn test_shell_len() {
        assert_eq!(shell_len(0), 1);
        assert_eq!(shell_len(1), 5);
        assert_eq!(shell_len(2), 15);
        let total: u64 = (0..10).map(shell_len).sum();
        assert_eq!(total, count_5d(10));
    }

    #[test]
    fn test_slabs_tile_each_shell() {
        assert_eq!(slab_len(0), 1);
        assert_eq!(slab_len(1), 4);
        for v in 0..10 {
            let slabs: u64 = (0..=v).map(slab_len).sum();
            assert_eq!(slabs, shell_len(v), "shell {}", v);
            assert_eq!(
                index(Position::new(v, v, 0, 0, 0)),
                count_5d(v) + count_4d(v),
                "slab start in shell {}",
                v
            );
        }
    }
}
