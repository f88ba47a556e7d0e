//! Algorithm enum for selecting how a generation's cell updates are scheduled.
//!
//! Every cell update reads only the previous grid, so both strategies
//! produce identical grids; they differ only in speed.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Row-major, one cell at a time
    #[default]
    Serial,
    /// Rows evolved in parallel with rayon (worth it for large grids)
    Parallel,
}

impl Algorithm {
    /// Get all available algorithms
    pub fn all() -> Vec<Algorithm> {
        vec![Algorithm::Serial, Algorithm::Parallel]
    }

    /// Display name for UI and logs
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Serial => "Serial",
            Algorithm::Parallel => "Parallel",
        }
    }

    /// Short description for tooltips/info
    pub fn description(&self) -> &'static str {
        match self {
            Algorithm::Serial => "Row-major cell-by-cell update",
            Algorithm::Parallel => "Row-parallel update with rayon",
        }
    }
}
