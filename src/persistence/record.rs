//! The persisted save record.
//!
//! The JSON layout (camelCase keys) is:
//! `{level, score, turnsLeft, grid: Cell[][], resources: {energy, water, oxygen},
//! weather, generation, everColonized}`. Unknown keys are ignored and missing
//! keys fall back to defaults, so older or hand-edited saves still load.

use serde::{Deserialize, Serialize};

use crate::domain::{Cell, Grid, LevelConfig, Resources, Weather, clamp_level};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveRecord {
    pub level: u32,
    pub score: u32,
    /// Missing means a full allowance for the saved level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turns_left: Option<u32>,
    pub grid: Vec<Vec<Cell>>,
    pub resources: Resources,
    pub weather: String,
    pub generation: u64,
    pub ever_colonized: bool,
}

impl Default for SaveRecord {
    fn default() -> Self {
        let config = LevelConfig::for_level(1);
        Self {
            level: config.level,
            score: 0,
            turns_left: Some(config.max_turns),
            grid: Grid::new(config.grid_size).to_rows(),
            resources: Resources::full(),
            weather: Weather::Normal.tag().to_owned(),
            generation: 0,
            ever_colonized: false,
        }
    }
}

/// A save record after validation, ready to install into a game
#[derive(Clone, PartialEq, Debug)]
pub struct Restored {
    pub level: u32,
    pub score: u32,
    pub turns_left: u32,
    pub grid: Grid,
    pub resources: Resources,
    pub weather: Weather,
    pub generation: u64,
    pub ever_colonized: bool,
}

impl SaveRecord {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate and repair into game values.
    ///
    /// The level is clamped, turns are capped at the level's maximum (and
    /// default to it), resources are clamped, and a missing, non-square or
    /// oversized grid is replaced by an empty one of the level's size. A grid
    /// smaller than the level's size is expanded in place.
    pub fn restore(self) -> Restored {
        let config = LevelConfig::for_level(clamp_level(self.level));
        let grid = Grid::from_rows(self.grid)
            .filter(|grid| grid.size() > 0 && grid.size() <= config.grid_size)
            .unwrap_or_else(|| Grid::new(config.grid_size))
            .expanded(config.grid_size);
        let ever_colonized = self.ever_colonized || grid.occupied_count() > 0;

        Restored {
            level: config.level,
            score: self.score,
            turns_left: self.turns_left.map_or(config.max_turns, |turns| turns.min(config.max_turns)),
            grid,
            resources: self.resources.clamped(),
            weather: Weather::from_tag(&self.weather),
            generation: self.generation,
            ever_colonized,
        }
    }
}
