use thiserror::Error;

use crate::domain::{Resource, Weather};

/// Why a placement was declined. The game state is untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementRejected {
    #[error("({row}, {col}) is outside the {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("not enough {resource}: need {required}, have {available}")]
    InsufficientResources { resource: Resource, required: u32, available: u32 },

    #[error("no structure selected")]
    NothingSelected,

    #[error("the colony is lost; retry or reset first")]
    GameOver,
}

/// Why a generation could not be advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdvanceRejected {
    #[error("no turns left this level")]
    OutOfTurns,

    #[error("the colony is lost; retry or reset first")]
    GameOver,
}

/// What happened during one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    pub generation: u64,
    pub weather: Weather,
    pub score_delta: u32,
    /// Score after the generation (zero right after a level-up)
    pub score: u32,
    pub occupied: usize,
    pub turns_left: u32,
    /// New level when this generation completed the previous one
    pub leveled_up: Option<u32>,
    pub game_over: bool,
}
