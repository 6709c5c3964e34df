//! The file-backed 5D Aether automaton and its step driver.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, trace};

use super::enumerator::topple_all;
use super::grid::{swap_generation, GridStore, PendingGeneration};
use super::lattice::{NeighborhoodCache, Position, DIMENSIONS};
use crate::config::Settings;
use crate::error::{AetherError, Result};

/// Below this, redistribution could overflow an `i64`.
pub const MIN_INITIAL_VALUE: i64 = -2_049_638_230_412_172_401;
pub const MAX_INITIAL_VALUE: i64 = i64::MAX;

/// Extent of the grid at step 0.
pub const INITIAL_MAX_V: u32 = 6;

/// Generation files hold every position with `v < max_v + EDGE_HEADROOM`.
pub const EDGE_HEADROOM: u32 = 4;

pub const GRID_FOLDER_NAME: &str = "grid";

pub(crate) const NAME: &str = "Aether";

pub(crate) fn generation_file_name(step: u64) -> String {
    format!("step={}.data", step)
}

pub(crate) fn subfolder_path(initial_value: i64) -> PathBuf {
    Path::new(NAME)
        .join(format!("{}D", DIMENSIONS))
        .join(initial_value.to_string())
}

/// Create a fresh working grid folder under `<folder>/Aether/5D/<initial_value>`.
///
/// Each call claims a new `grid_<n>` folder with `create_dir`, so runs sharing
/// a folder and initial value never touch each other's generations.
pub(crate) fn create_grid_folder(folder: &Path, initial_value: i64) -> Result<PathBuf> {
    let parent = folder.join(subfolder_path(initial_value));
    fs::create_dir_all(&parent)?;
    let mut n: u64 = 0;
    loop {
        let grid_folder = parent.join(format!("{}_{}", GRID_FOLDER_NAME, n));
        match fs::create_dir(&grid_folder) {
            Ok(()) => return Ok(grid_folder),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// The Aether automaton in 5D, started from a single value at the origin.
///
/// Only the fundamental domain `v >= w >= x >= y >= z >= 0` is stored, one file
/// per generation. Each step reads the committed generation and writes a fresh
/// one, which replaces it once complete.
pub struct Aether5D {
    pub(crate) initial_value: i64,
    pub(crate) step: u64,
    pub(crate) max_v: u32,
    pub(crate) changed: Option<bool>,
    pub(crate) grid: GridStore,
    pub(crate) grid_folder: PathBuf,
    /// The committed generation is a backup file that must outlive the next step.
    pub(crate) reading_backup: bool,
    pub(crate) settings: Settings,
    pub(crate) cache: NeighborhoodCache,
}

impl Aether5D {
    /// Start a new automaton whose generations live in its own
    /// `<folder>/Aether/5D/<initial_value>/grid_<n>` folder.
    pub fn new(initial_value: i64, folder: impl AsRef<Path>) -> Result<Self> {
        Self::with_settings(initial_value, folder, Settings::default())
    }

    pub fn with_settings(
        initial_value: i64,
        folder: impl AsRef<Path>,
        settings: Settings,
    ) -> Result<Self> {
        if initial_value < MIN_INITIAL_VALUE {
            return Err(AetherError::InitialValueTooSmall {
                value: initial_value,
                min: MIN_INITIAL_VALUE,
            });
        }
        let grid_folder = create_grid_folder(folder.as_ref(), initial_value)?;
        let mut grid = GridStore::create(
            grid_folder.join(generation_file_name(0)),
            INITIAL_MAX_V + EDGE_HEADROOM,
        )?;
        grid.set(Position::ORIGIN, initial_value)?;
        info!(
            "created {} automaton with initial value {} in {}",
            NAME,
            initial_value,
            grid_folder.display()
        );
        Ok(Aether5D {
            initial_value,
            step: 0,
            max_v: INITIAL_MAX_V,
            changed: None,
            grid,
            grid_folder,
            reading_backup: false,
            settings,
            cache: NeighborhoodCache::new(),
        })
    }

    /// Compute the next generation. Returns whether any position changed.
    ///
    /// On error nothing is committed: the half-written generation is removed
    /// and the automaton stays at its current step, ready to try again. A
    /// caller that gives up can still `close()` it to release the grid folder.
    pub fn next_step(&mut self) -> Result<bool> {
        let next_path = self.grid_folder.join(generation_file_name(self.step + 1));
        let (pending, mut next) =
            PendingGeneration::create(next_path, self.max_v + EDGE_HEADROOM)?;
        let outcome = topple_all(&self.grid, &mut next, self.max_v, &mut self.cache)?;
        pending.commit(&next, self.settings.sync_on_commit)?;

        let delete_previous = !self.reading_backup;
        self.reading_backup = false;
        self.step += 1;
        self.changed = Some(outcome.changed);
        if outcome.reached_edge {
            self.max_v += 1;
            trace!("extent grew to {} at step {}", self.max_v, self.step);
        }
        swap_generation(&mut self.grid, next, delete_previous)?;
        debug!(
            "step {} committed: maxV {}, changed {}",
            self.step, self.max_v, outcome.changed
        );
        Ok(outcome.changed)
    }

    /// Whether the last step changed anything; `None` before the first step.
    pub fn is_changed(&self) -> Option<bool> {
        self.changed
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    /// Largest `v` the automaton's value may have reached.
    pub fn size(&self) -> u32 {
        self.max_v
    }

    pub fn initial_value(&self) -> i64 {
        self.initial_value
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn name(&self) -> &'static str {
        NAME
    }

    /// Relative folder that groups runs of this automaton, `Aether/5D/<initial_value>`.
    pub fn subfolder_path(&self) -> PathBuf {
        subfolder_path(self.initial_value)
    }

    /// Folder where new generations are written.
    pub fn grid_folder(&self) -> &Path {
        &self.grid_folder
    }

    /// Value at a canonical position (`v >= w >= x >= y >= z >= 0`).
    pub fn get_from_position(&self, p: Position) -> Result<i64> {
        self.grid.get(p)
    }

    /// Value at any lattice position, looked up through its canonical representative.
    pub fn get_from_any_position(&self, coords: [i32; DIMENSIONS]) -> Result<i64> {
        self.grid.get(Position::canonicalize(coords))
    }

    /// Release the current generation and remove the working grid folder.
    ///
    /// A generation still being read from a backup is left where it is.
    pub fn close(self) -> Result<()> {
        let Aether5D {
            grid, grid_folder, ..
        } = self;
        drop(grid);
        if grid_folder.exists() {
            fs::remove_dir_all(&grid_folder)?;
        }
        info!("closed automaton in {}", grid_folder.display());
        Ok(())
    }
}
