//! Persisted scalar state of a file-backed automaton.

use serde::{Deserialize, Serialize};

/// The property bag written next to a backed-up grid file.
///
/// Together with the generation file named after `step`, this is everything
/// needed to resume an evolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Properties {
    pub initial_value: i64,
    pub step: u64,
    pub max_v: u32,
    /// Whether the last step changed anything; `None` before the first step.
    pub changed: Option<bool>,
}
