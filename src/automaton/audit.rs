//! Conservation audit over the committed generation.
//!
//! Every stored value stands for its whole orbit of real positions, so the
//! real total is the sum of each value times its orbit size. Toppling only
//! moves value around, so this total equals the initial value at every step.

use rayon::prelude::*;

use super::grid::GridStore;
use super::index::{count_5d, shell_len};
use super::lattice::shell;
use super::stepping::Aether5D;
use crate::error::Result;

/// Records read per chunk, so each worker holds at most 512 KiB of values.
const AUDIT_CHUNK: u64 = 1 << 16;

/// Orbit-weighted sum of one shell, streamed through the file `chunk_len` records at a time.
fn shell_total(store: &GridStore, v: u32, chunk_len: u64) -> Result<i128> {
    let start = count_5d(v);
    let len = shell_len(v);
    let mut positions = shell(v);
    let mut total = 0i128;
    let mut read = 0;
    while read < len {
        let chunk = chunk_len.min(len - read);
        let values = store.read_range(start + read, chunk)?;
        total += positions
            .by_ref()
            .zip(values)
            .map(|(p, value)| value as i128 * p.orbit_size() as i128)
            .sum::<i128>();
        read += chunk;
    }
    Ok(total)
}

impl Aether5D {
    /// Sum of the values of all real lattice positions.
    ///
    /// Shells are read in parallel, each worker through its own read-only
    /// handle and a bounded chunk buffer.
    pub fn total_real_value(&self) -> Result<i128> {
        let path = self.grid.path().to_path_buf();
        let capacity = self.grid.capacity();
        let mut shells = 0;
        while count_5d(shells) < capacity {
            shells += 1;
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.effective_audit_threads())
            .build()
            .or_else(|_| rayon::ThreadPoolBuilder::new().num_threads(1).build())?;

        pool.install(|| {
            (0..shells)
                .into_par_iter()
                .map(|v| -> Result<i128> {
                    let store = GridStore::open(&path)?;
                    shell_total(&store, v, AUDIT_CHUNK)
                })
                .try_reduce(|| 0, |a, b| Ok(a + b))
        })
    }
}
