//! Tuning settings for a file-backed automaton.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Knobs that do not change the automaton's evolution, only how it is run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Threads in the conservation audit pool. 0 is treated as 1.
    pub audit_threads: usize,
    /// Flush the next generation to disk before the previous one is deleted.
    pub sync_on_commit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            audit_threads: 1,
            sync_on_commit: true,
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read settings from a TOML file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Thread count actually handed to the rayon pool builder.
    pub fn effective_audit_threads(&self) -> usize {
        self.audit_threads.max(1)
    }
}
