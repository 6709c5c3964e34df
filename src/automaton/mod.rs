//! Core automaton logic and grid storage.
//!
//! This module contains the actual logic for laying out the fundamental
//! domain on disk, toppling positions, stepping the automaton, and backing it
//! up. The FFI layer in `ffi/` calls into it.

pub mod audit;
pub mod backup;
pub mod enumerator;
pub mod grid;
pub mod index;
pub mod lattice;
pub mod stepping;
pub mod topple;

pub use backup::PROPERTIES_FILE_NAME;
pub use grid::{swap_generation, GridStore, PendingGeneration};
pub use lattice::{neighborhood, NeighborSlot, Position};
pub use stepping::{
    Aether5D, GRID_FOLDER_NAME, INITIAL_MAX_V, MAX_INITIAL_VALUE, MIN_INITIAL_VALUE,
};
pub use topple::{topple, FlowSink, Neighbor};
