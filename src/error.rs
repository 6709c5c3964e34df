//! Crate-wide error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::automaton::lattice::Position;

/// Errors raised while building, stepping, backing up or restoring an automaton.
#[derive(Debug, Error)]
pub enum AetherError {
    /// The initial value is low enough that redistribution could overflow an `i64`.
    #[error("initial value {value} is smaller than the minimum of {min}; use a greater initial value")]
    InitialValueTooSmall { value: i64, min: i64 },

    #[error("grid storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A canonical position lies beyond what the generation file was sized for.
    #[error("position {position} is beyond the grid capacity of {capacity} positions")]
    OutOfBounds { position: Position, capacity: u64 },

    #[error("missing grid folder at {}", .0.display())]
    MissingGridFolder(PathBuf),

    #[error("missing grid file at {}", .0.display())]
    MissingGridFile(PathBuf),

    #[error("backup properties are unreadable: {0}")]
    CorruptBackup(#[from] serde_json::Error),

    #[error("settings are invalid: {0}")]
    InvalidSettings(#[from] toml::de::Error),

    #[error("audit thread pool could not start: {0}")]
    AuditPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, AetherError>;
