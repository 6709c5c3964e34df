//! Aether 5D - a file-backed sandpile-like cellular automaton in five dimensions.
//!
//! A single value is placed at the origin and repeatedly spreads downhill to
//! lower-valued neighbours. The lattice is symmetric under permutations and
//! reflections of its axes, so only the fundamental domain is stored, one file
//! per generation. The library also exports a C ABI in `ffi`.

pub mod automaton;
pub mod config;
pub mod error;
pub mod ffi;
pub mod state;

pub use automaton::{Aether5D, Position};
pub use config::Settings;
pub use error::{AetherError, Result};
pub use state::Properties;
