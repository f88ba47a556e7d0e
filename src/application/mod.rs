mod game_state;
mod outcome;

pub use game_state::{GameState, LEVEL_UP_BONUS, RETRY_PENALTY};
pub use outcome::{AdvanceRejected, GenerationReport, PlacementRejected};
