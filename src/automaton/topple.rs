//! Redistribution of a position's value among its lower-valued neighbours.
//!
//! Neighbours are handled in tiers of decreasing value. For each tier the
//! difference between the position's current value and the tier's value is
//! split into `shareCount` equal shares: one stays at the position, one goes
//! to every real neighbour still pending (this tier and all lower ones), and
//! the division remainder stays at the position too. `shareCount` starts at
//! the number of real participating neighbours plus one and drops by each
//! neighbour's symmetry count once it has been passed.

use super::lattice::Position;
use crate::error::Result;

/// Destination of the flow computed by a topple.
pub trait FlowSink {
    /// Add `amount` to whatever is already accumulated at `p`.
    fn deposit(&mut self, p: Position, amount: i64) -> Result<()>;
}

/// A distinct canonical neighbour taking part in a topple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbor {
    pub position: Position,
    pub value: i64,
    pub multiplier: i64,
    pub symmetry_count: u32,
}

/// Topple `position`, whose value is `value`, onto `neighbors`.
///
/// Every neighbour must hold strictly less than `value`. Returns whether any
/// non-zero share left the position.
pub fn topple<S: FlowSink>(
    sink: &mut S,
    position: Position,
    value: i64,
    neighbors: &mut [Neighbor],
) -> Result<bool> {
    debug_assert!(neighbors.iter().all(|n| n.value < value));
    match neighbors.len() {
        0 => {
            sink.deposit(position, value)?;
            Ok(false)
        }
        1 => topple_single(sink, position, value, &neighbors[0]),
        _ => {
            neighbors.sort_unstable_by(|a, b| b.value.cmp(&a.value));
            topple_sorted(sink, position, value, neighbors)
        }
    }
}

fn topple_single<S: FlowSink>(
    sink: &mut S,
    position: Position,
    mut value: i64,
    neighbor: &Neighbor,
) -> Result<bool> {
    let share_count = neighbor.symmetry_count as i64 + 1;
    let to_share = value - neighbor.value;
    let share = to_share / share_count;
    let toppled = share != 0;
    if toppled {
        value = value - to_share + to_share % share_count + share;
        sink.deposit(neighbor.position, share * neighbor.multiplier)?;
    }
    sink.deposit(position, value)?;
    Ok(toppled)
}

/// General case. `neighbors` must be sorted by value, highest first.
pub fn topple_sorted<S: FlowSink>(
    sink: &mut S,
    position: Position,
    mut value: i64,
    neighbors: &[Neighbor],
) -> Result<bool> {
    let mut toppled = false;
    let mut share_count: i64 = neighbors
        .iter()
        .map(|n| n.symmetry_count as i64)
        .sum::<i64>()
        + 1;
    let mut previous_value = None;
    for (i, neighbor) in neighbors.iter().enumerate() {
        if previous_value != Some(neighbor.value) {
            let to_share = value - neighbor.value;
            let share = to_share / share_count;
            if share != 0 {
                toppled = true;
                value = value - to_share + to_share % share_count + share;
                for receiver in &neighbors[i..] {
                    sink.deposit(receiver.position, share * receiver.multiplier)?;
                }
            }
            previous_value = Some(neighbor.value);
        }
        share_count -= neighbor.symmetry_count as i64;
    }
    sink.deposit(position, value)?;
    Ok(toppled)
}
