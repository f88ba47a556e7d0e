use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{AdvanceRejected, GenerationReport, PlacementRejected};
use crate::config::{DEFAULT_SPEED_MS, GameConfig};
use crate::domain::{
    Algorithm, Cell, ColonyRules, Grid, LevelConfig, Resources, StructureKind, Weather,
    clamp_level, transition,
};
use crate::persistence::{Restored, SaveRecord, SaveSlot};

/// Resource penalty charged by [`GameState::retry_level`]
pub const RETRY_PENALTY: Resources = Resources::new(20, 15, 15);

/// Flat bonus every resource receives on a level-up
pub const LEVEL_UP_BONUS: i32 = 10;

/// GameState owns the colony and is the only thing that mutates it.
/// Callers read it through the accessors and change it through the commands;
/// each command runs to completion before the next.
pub struct GameState {
    grid: Grid,
    resources: Resources,
    level: u32,
    score: u32,
    turns_left: u32,
    weather: Weather,
    is_running: bool,
    is_game_over: bool,
    generation: u64,
    selected: Option<StructureKind>,
    ever_colonized: bool,
    speed_ms: u64,
    update_timer: Duration,
    rules: ColonyRules,
    algorithm: Algorithm,
    rng: StdRng,
    save_slot: Option<SaveSlot>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Level 1 with stock rules and an OS-seeded random source
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Level 1 with a reproducible hazard sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        let config = LevelConfig::for_level(1);
        Self {
            grid: Grid::new(config.grid_size),
            resources: Resources::full(),
            level: config.level,
            score: 0,
            turns_left: config.max_turns,
            weather: Weather::Normal,
            is_running: false,
            is_game_over: false,
            generation: 0,
            selected: None,
            ever_colonized: false,
            speed_ms: DEFAULT_SPEED_MS,
            update_timer: Duration::ZERO,
            rules: ColonyRules::default(),
            algorithm: Algorithm::default(),
            rng,
            save_slot: None,
        }
    }

    /// Build from configuration; does not touch any save
    pub fn from_config(config: &GameConfig) -> Self {
        let state = match config.seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        };
        state
            .with_rules(config.rules)
            .with_algorithm(config.algorithm)
            .with_speed(config.speed_ms)
    }

    pub fn with_rules(mut self, rules: ColonyRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_speed(mut self, speed_ms: u64) -> Self {
        self.speed_ms = speed_ms;
        self
    }

    /// Attach a save slot and resume from it when it holds a game
    pub fn with_save_slot(mut self, slot: SaveSlot) -> Self {
        self.save_slot = Some(slot);
        self.load_saved();
        self
    }

    // ---- observable state ----

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn level_config(&self) -> LevelConfig {
        LevelConfig::for_level(self.level)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn turns_left(&self) -> u32 {
        self.turns_left
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected_structure(&self) -> Option<StructureKind> {
        self.selected
    }

    pub fn speed(&self) -> u64 {
        self.speed_ms
    }

    pub fn rules(&self) -> &ColonyRules {
        &self.rules
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    // ---- commands ----

    /// Fresh empty colony at `level`
    pub fn initialize(&mut self, level: u32) {
        let config = LevelConfig::for_level(clamp_level(level));
        self.grid = Grid::new(config.grid_size);
        self.resources = Resources::full();
        self.level = config.level;
        self.score = 0;
        self.turns_left = config.max_turns;
        self.weather = Weather::Normal;
        self.is_running = false;
        self.is_game_over = false;
        self.generation = 0;
        self.ever_colonized = false;
        self.update_timer = Duration::ZERO;
    }

    /// Pay for `kind` and build it at (`row`, `col`), replacing whatever was there
    pub fn place_structure(&mut self, row: usize, col: usize, kind: StructureKind) -> Result<(), PlacementRejected> {
        if self.is_game_over {
            return Err(PlacementRejected::GameOver);
        }
        if !self.grid.in_bounds(row, col) {
            return Err(PlacementRejected::OutOfBounds { row, col, size: self.grid.size() });
        }

        let cost = kind.cost();
        self.resources.try_spend(&cost).map_err(|resource| {
            tracing::debug!(?kind, row, col, %resource, "placement rejected");
            PlacementRejected::InsufficientResources {
                resource,
                required: cost.get(resource),
                available: self.resources.get(resource),
            }
        })?;

        self.grid.set(row, col, Cell::built(kind));
        self.ever_colonized = true;
        tracing::debug!(?kind, row, col, "structure placed");
        Ok(())
    }

    /// Place the currently selected structure
    pub fn place_selected(&mut self, row: usize, col: usize) -> Result<(), PlacementRejected> {
        let kind = self.selected.ok_or(PlacementRejected::NothingSelected)?;
        self.place_structure(row, col, kind)
    }

    /// Run one generation: weather, cell updates, score, resources, then
    /// the win and loss checks. Progress is saved afterwards.
    pub fn advance_generation(&mut self) -> Result<GenerationReport, AdvanceRejected> {
        if self.is_game_over {
            return Err(AdvanceRejected::GameOver);
        }
        if self.turns_left == 0 {
            self.is_running = false;
            return Err(AdvanceRejected::OutOfTurns);
        }

        let config = self.level_config();
        let next = transition::step(
            &self.grid,
            self.resources,
            &config,
            &self.rules,
            self.algorithm,
            &mut self.rng,
        );

        self.grid = next.grid;
        self.resources = next.resources;
        self.weather = next.weather;
        self.score = self.score.saturating_add(next.score_delta);
        self.turns_left -= 1;
        self.generation += 1;

        let occupied = self.grid.occupied_count();
        if occupied > 0 {
            self.ever_colonized = true;
        }

        tracing::debug!(
            generation = self.generation,
            weather = %self.weather,
            score = self.score,
            occupied,
            turns_left = self.turns_left,
            "generation advanced"
        );

        let leveled_up = (self.score >= config.required_score).then(|| self.level_up());

        let game_over = occupied == 0 && self.ever_colonized;
        if game_over {
            self.is_game_over = true;
            self.is_running = false;
            tracing::info!(generation = self.generation, level = self.level, "colony lost");
        }

        self.save();

        Ok(GenerationReport {
            generation: self.generation,
            weather: self.weather,
            score_delta: next.score_delta,
            score: self.score,
            occupied,
            turns_left: self.turns_left,
            leveled_up,
            game_over,
        })
    }

    fn level_up(&mut self) -> u32 {
        let next = self.level_config().next();
        self.level = next.level;
        self.score = 0;
        self.turns_left = next.max_turns;
        self.grid = self.grid.expanded(next.grid_size);
        self.resources = self.resources.adjust_all(LEVEL_UP_BONUS);
        self.is_running = false;
        tracing::info!(level = self.level, grid = next.grid_size, "level complete");
        self.level
    }

    /// Advance the run clock by `elapsed`; once `speed` has accumulated, run
    /// one generation. Returns `None` when no generation ran.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Result<GenerationReport, AdvanceRejected>> {
        if !self.is_running {
            return None;
        }

        self.update_timer += elapsed;
        if self.update_timer < Duration::from_millis(self.speed_ms) {
            return None;
        }

        self.update_timer = Duration::ZERO;
        Some(self.advance_generation())
    }

    pub fn set_speed(&mut self, speed_ms: u64) {
        self.speed_ms = speed_ms;
    }

    pub fn set_running(&mut self, running: bool) {
        self.is_running = running;
    }

    /// Toggle play/pause state
    pub fn toggle_running(&mut self) {
        self.is_running = !self.is_running;
    }

    pub fn select_structure(&mut self, kind: Option<StructureKind>) {
        self.selected = kind;
    }

    /// Back to level 1 and forget the saved game
    pub fn reset_game(&mut self) {
        self.initialize(1);
        self.selected = None;
        if let Some(slot) = self.save_slot.as_mut() {
            slot.clear();
        }
        tracing::info!("game reset");
    }

    /// Replay the current level with the structures already built, at a
    /// resource cost. Every structure starts over as thriving.
    pub fn retry_level(&mut self) {
        let config = self.level_config();
        self.resources = Resources::new(
            self.resources.energy.saturating_sub(RETRY_PENALTY.energy),
            self.resources.water.saturating_sub(RETRY_PENALTY.water),
            self.resources.oxygen.saturating_sub(RETRY_PENALTY.oxygen),
        );
        self.score = 0;
        self.turns_left = config.max_turns;
        self.grid
            .map_cells(|cell| cell.structure().map_or(Cell::EMPTY, Cell::built));
        self.weather = Weather::Normal;
        self.is_game_over = false;
        self.is_running = false;
        self.update_timer = Duration::ZERO;
        self.ever_colonized = self.grid.occupied_count() > 0;
        tracing::info!(level = self.level, "retrying level");
        self.save();
    }

    // ---- persistence ----

    /// Snapshot of everything the save record carries
    pub fn to_record(&self) -> SaveRecord {
        SaveRecord {
            level: self.level,
            score: self.score,
            turns_left: Some(self.turns_left),
            grid: self.grid.to_rows(),
            resources: self.resources,
            weather: self.weather.tag().to_owned(),
            generation: self.generation,
            ever_colonized: self.ever_colonized,
        }
    }

    /// Best-effort save to the attached slot; `false` when nothing was written
    pub fn save(&mut self) -> bool {
        let record = self.to_record();
        self.save_slot.as_mut().is_some_and(|slot| slot.save(&record))
    }

    /// Replace the colony with the saved one. Leaves state untouched and
    /// returns `false` when there is no slot or no usable save.
    pub fn load_saved(&mut self) -> bool {
        let Some(record) = self.save_slot.as_ref().and_then(SaveSlot::load) else {
            return false;
        };
        self.install(record.restore());
        tracing::info!(level = self.level, generation = self.generation, "saved colony restored");
        true
    }

    fn install(&mut self, restored: Restored) {
        self.grid = restored.grid;
        self.resources = restored.resources;
        self.level = restored.level;
        self.score = restored.score;
        self.turns_left = restored.turns_left;
        self.weather = restored.weather;
        self.generation = restored.generation;
        self.ever_colonized = restored.ever_colonized;
        self.is_game_over = restored.ever_colonized && self.grid.occupied_count() == 0;
        self.is_running = false;
        self.update_timer = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HazardTable, Status};

    fn calm_game() -> GameState {
        GameState::with_seed(1).with_rules(ColonyRules { hazards: HazardTable::calm(), ..ColonyRules::default() })
    }

    #[test]
    fn test_new_game_defaults() {
        let game = calm_game();
        assert_eq!(game.level(), 1);
        assert_eq!(game.grid().size(), 6);
        assert_eq!(game.turns_left(), 35);
        assert_eq!(*game.resources(), Resources::full());
        assert_eq!(game.weather(), Weather::Normal);
        assert!(!game.is_running());
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_from_config_applies_settings() {
        let config = GameConfig::from_toml_str(
            "speed_ms = 250\nalgorithm = \"parallel\"\nseed = 3\n[rules]\nviable_max = 5\n",
        )
        .unwrap();
        let game = GameState::from_config(&config);
        assert_eq!(game.speed(), 250);
        assert_eq!(game.algorithm(), Algorithm::Parallel);
        assert_eq!(game.rules().viable_max, 5);
        assert_eq!(game.rules().decay, ColonyRules::default().decay);
    }

    #[test]
    fn test_place_structure_deducts_cost() {
        let mut game = calm_game();
        game.place_structure(2, 2, StructureKind::Habitat).unwrap();
        assert_eq!(*game.resources(), Resources::new(80, 90, 85));
        let cell = game.grid().get(2, 2).copied().unwrap();
        assert_eq!(cell, Cell::built(StructureKind::Habitat));
    }

    #[test]
    fn test_place_out_of_bounds_is_rejected() {
        let mut game = calm_game();
        assert_eq!(
            game.place_structure(6, 0, StructureKind::Habitat),
            Err(PlacementRejected::OutOfBounds { row: 6, col: 0, size: 6 })
        );
        assert_eq!(*game.resources(), Resources::full());
    }

    #[test]
    fn test_insufficient_resources_is_noop() {
        let mut game = calm_game();
        game.place_structure(0, 0, StructureKind::Shield).unwrap();
        game.place_structure(0, 1, StructureKind::Shield).unwrap();
        let grid_before = game.grid().clone();
        let resources_before = *game.resources();

        let err = game.place_structure(0, 2, StructureKind::Shield).unwrap_err();
        assert_eq!(
            err,
            PlacementRejected::InsufficientResources { resource: crate::domain::Resource::Energy, required: 40, available: 20 }
        );
        assert_eq!(game.grid(), &grid_before);
        assert_eq!(*game.resources(), resources_before);
    }

    #[test]
    fn test_place_selected() {
        let mut game = calm_game();
        assert_eq!(game.place_selected(0, 0), Err(PlacementRejected::NothingSelected));
        game.select_structure(Some(StructureKind::Water));
        game.place_selected(0, 0).unwrap();
        assert_eq!(game.grid().get(0, 0).and_then(Cell::structure), Some(StructureKind::Water));
    }

    #[test]
    fn test_out_of_turns_stops_run() {
        let mut game = calm_game();
        game.turns_left = 0;
        game.set_running(true);
        let grid_before = game.grid().clone();
        assert_eq!(game.advance_generation(), Err(AdvanceRejected::OutOfTurns));
        assert!(!game.is_running());
        assert_eq!(game.grid(), &grid_before);
    }

    #[test]
    fn test_advance_counts_turns_and_generations() {
        let mut game = calm_game();
        for (r, c) in [(2, 2), (2, 3), (3, 2)] {
            game.place_structure(r, c, StructureKind::Habitat).unwrap();
        }
        let report = game.advance_generation().unwrap();
        assert_eq!(report.generation, 1);
        assert_eq!(game.turns_left(), 34);
        // (3,3) is born; the L becomes a block of four strugglers
        assert_eq!(report.occupied, 4);
        assert_eq!(game.grid().get(3, 3).map(Cell::status), Some(Status::Thriving));
        assert_eq!(report.score_delta, 3 * 5 + 10);
        assert_eq!(game.score(), 25);
    }

    #[test]
    fn test_loss_after_colony_dies() {
        let mut game = calm_game();
        game.place_structure(0, 0, StructureKind::Habitat).unwrap();
        game.set_running(true);
        let report = game.advance_generation().unwrap();
        assert!(report.game_over);
        assert!(game.is_game_over());
        assert!(!game.is_running());
        assert_eq!(game.advance_generation(), Err(AdvanceRejected::GameOver));
        assert_eq!(game.place_structure(1, 1, StructureKind::Habitat), Err(PlacementRejected::GameOver));
    }

    #[test]
    fn test_empty_grid_is_not_a_loss() {
        let mut game = calm_game();
        let report = game.advance_generation().unwrap();
        assert!(!report.game_over);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_win_expands_grid_and_grants_bonus() {
        let mut game = calm_game();
        for (r, c) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            game.place_structure(r, c, StructureKind::Habitat).unwrap();
        }
        game.score = 95;
        game.set_running(true);
        let resources_before = *game.resources();

        let report = game.advance_generation().unwrap();
        assert_eq!(report.leveled_up, Some(2));
        assert_eq!(game.level(), 2);
        assert_eq!(game.score(), 0);
        assert_eq!(game.turns_left(), LevelConfig::for_level(2).max_turns);
        assert_eq!(game.grid().size(), 8);
        assert!(!game.is_running());
        for (r, c) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            assert_eq!(game.grid().get(r, c).and_then(Cell::structure), Some(StructureKind::Habitat));
        }
        // four strugglers cost 4, the bonus adds 10
        assert_eq!(*game.resources(), resources_before.adjust_all(-4).adjust_all(10));
    }

    #[test]
    fn test_win_at_max_level_stays_capped() {
        let mut game = calm_game();
        game.initialize(crate::domain::MAX_LEVEL);
        for (r, c) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            game.place_structure(r, c, StructureKind::Habitat).unwrap();
        }
        game.score = game.level_config().required_score;
        let report = game.advance_generation().unwrap();
        assert_eq!(report.leveled_up, Some(crate::domain::MAX_LEVEL));
        assert_eq!(game.level(), crate::domain::MAX_LEVEL);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_tick_respects_speed_and_run_flag() {
        let mut game = calm_game();
        game.set_speed(100);
        assert!(game.tick(Duration::from_millis(500)).is_none());

        game.set_running(true);
        assert!(game.tick(Duration::from_millis(60)).is_none());
        assert!(game.tick(Duration::from_millis(60)).is_some());
        assert_eq!(game.generation(), 1);
        assert!(game.tick(Duration::from_millis(60)).is_none());
    }

    #[test]
    fn test_retry_applies_penalty_and_keeps_structures() {
        let mut game = calm_game();
        game.place_structure(1, 1, StructureKind::Oxygen).unwrap();
        game.resources = Resources::new(50, 10, 14);
        game.score = 60;
        game.turns_left = 3;
        game.is_game_over = true;

        game.retry_level();

        assert_eq!(*game.resources(), Resources::new(30, 0, 0));
        assert_eq!(game.score(), 0);
        assert_eq!(game.turns_left(), 35);
        assert!(!game.is_game_over());
        assert_eq!(game.grid().get(1, 1).copied(), Some(Cell::built(StructureKind::Oxygen)));
    }

    #[test]
    fn test_reset_clears_save() {
        let mut game = calm_game().with_save_slot(SaveSlot::in_memory());
        game.place_structure(2, 2, StructureKind::Habitat).unwrap();
        assert!(game.save());
        game.reset_game();
        assert_eq!(game.grid().occupied_count(), 0);
        assert!(!game.load_saved());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut game = calm_game().with_save_slot(SaveSlot::in_memory());
        for (r, c) in [(2, 2), (2, 3), (3, 2)] {
            game.place_structure(r, c, StructureKind::Habitat).unwrap();
        }
        game.advance_generation().unwrap();
        let record = game.to_record();

        game.initialize(1);
        assert!(game.load_saved());
        assert_eq!(game.to_record(), record);
    }

    #[test]
    fn test_load_without_slot_is_noop() {
        let mut game = calm_game();
        assert!(!game.load_saved());
        assert!(!game.save());
    }
}
