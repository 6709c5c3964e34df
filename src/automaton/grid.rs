//! File-backed storage of one grid generation.
//!
//! A generation is a flat file of big-endian `i64` records laid out by
//! [`index`](super::index::index). Files are sized with `File::set_len`, which
//! zero-fills the extension, so every record not yet written reads as 0.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{trace, warn};

use super::index::{byte_offset, count_4d, count_5d, index, shell_len, slab_len, POSITION_BYTES};
use super::lattice::Position;
use super::topple::FlowSink;
use crate::error::{AetherError, Result};

/// One generation's backing file.
pub struct GridStore {
    file: File,
    path: PathBuf,
    capacity: u64,
}

impl GridStore {
    /// Create (or truncate) a zeroed file holding every canonical position with `v < side`.
    pub fn create(path: impl Into<PathBuf>, side: u32) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        let capacity = count_5d(side);
        file.set_len(capacity * POSITION_BYTES)?;
        Ok(GridStore {
            file,
            path,
            capacity,
        })
    }

    /// Open an existing generation read-only.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::open(&path)?;
        let capacity = file.metadata()?.len() / POSITION_BYTES;
        Ok(GridStore {
            file,
            path,
            capacity,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records the file holds.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Value at a canonical position. Positions past the end of the file are 0.
    pub fn get(&self, p: Position) -> Result<i64> {
        debug_assert!(p.is_canonical());
        if index(p) >= self.capacity {
            return Ok(0);
        }
        let mut file = &self.file;
        file.seek(SeekFrom::Start(byte_offset(p)))?;
        let mut buf = [0u8; POSITION_BYTES as usize];
        file.read_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    pub fn set(&mut self, p: Position, value: i64) -> Result<()> {
        self.check_bounds(p)?;
        self.file.seek(SeekFrom::Start(byte_offset(p)))?;
        self.file.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    /// Read-modify-write `delta` onto the value at `p`.
    pub fn accumulate(&mut self, p: Position, delta: i64) -> Result<()> {
        self.check_bounds(p)?;
        let previous = self.get(p)?;
        self.set(p, previous + delta)
    }

    /// Every value whose first coordinate is `v`, in index order.
    pub fn read_shell(&self, v: u32) -> Result<Vec<i64>> {
        self.read_range(count_5d(v), shell_len(v))
    }

    /// Every value whose first two coordinates are `v` and `w`, in index order.
    pub fn read_slab(&self, v: u32, w: u32) -> Result<Vec<i64>> {
        debug_assert!(w <= v);
        self.read_range(count_5d(v) + count_4d(w), slab_len(w))
    }

    /// `len` consecutive records starting at index `start`.
    ///
    /// Records past the end of the file are returned as 0.
    pub fn read_range(&self, start: u64, len: u64) -> Result<Vec<i64>> {
        let mut values = vec![0i64; len as usize];
        if start >= self.capacity {
            return Ok(values);
        }
        let stored = len.min(self.capacity - start) as usize;
        let mut bytes = vec![0u8; stored * POSITION_BYTES as usize];
        let mut file = &self.file;
        file.seek(SeekFrom::Start(start * POSITION_BYTES))?;
        file.read_exact(&mut bytes)?;
        for (value, chunk) in values
            .iter_mut()
            .zip(bytes.chunks_exact(POSITION_BYTES as usize))
        {
            let mut buf = [0u8; POSITION_BYTES as usize];
            buf.copy_from_slice(chunk);
            *value = i64::from_be_bytes(buf);
        }
        Ok(values)
    }

    /// Flush file contents to disk.
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    fn check_bounds(&self, p: Position) -> Result<()> {
        debug_assert!(p.is_canonical());
        if index(p) >= self.capacity {
            return Err(AetherError::OutOfBounds {
                position: p,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl FlowSink for GridStore {
    fn deposit(&mut self, p: Position, amount: i64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        self.accumulate(p, amount)
    }
}

/// Close `current`, make `next` the active generation and optionally delete
/// the file `current` was backed by.
pub fn swap_generation(current: &mut GridStore, next: GridStore, delete_previous: bool) -> Result<()> {
    let GridStore { file, path, .. } = std::mem::replace(current, next);
    drop(file);
    if delete_previous {
        match fs::remove_file(&path) {
            Ok(()) => trace!("deleted generation {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("generation {} was already gone", path.display())
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        trace!("kept generation {}", path.display());
    }
    Ok(())
}

/// Guard over a next generation that is still being written.
///
/// Dropping it without [`commit`](Self::commit) removes the file, so a failed
/// step never leaves a half-written generation behind.
pub struct PendingGeneration {
    path: PathBuf,
    committed: bool,
}

impl PendingGeneration {
    /// Create the next generation's file with the guard already armed over it.
    pub fn create(path: impl Into<PathBuf>, side: u32) -> Result<(Self, GridStore)> {
        let guard = PendingGeneration {
            path: path.into(),
            committed: false,
        };
        let store = GridStore::create(guard.path.clone(), side)?;
        Ok((guard, store))
    }

    /// Mark the generation complete, flushing it first when `sync` is set.
    pub fn commit(mut self, store: &GridStore, sync: bool) -> Result<()> {
        if sync {
            store.sync()?;
        }
        self.committed = true;
        Ok(())
    }
}

impl Drop for PendingGeneration {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => warn!("discarded half-written generation {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "could not discard half-written generation {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
