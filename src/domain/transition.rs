//! One generation of the colony, as a pure function of the previous state
//! plus an injected random source.

use rand::Rng;

use super::{Algorithm, ColonyRules, EvolveParams, Grid, LevelConfig, Resources};
use super::weather::Weather;

/// Everything a single generation produces
#[derive(Clone, PartialEq, Debug)]
pub struct Transition {
    pub grid: Grid,
    pub resources: Resources,
    pub weather: Weather,
    pub score_delta: u32,
}

/// Points earned by the statuses on `grid`
pub fn score_of(grid: &Grid) -> u32 {
    grid.iter_cells().map(|(_, _, cell)| cell.status().score()).sum()
}

/// Net change every colony resource sees from the statuses on `grid`
pub fn resource_impact(grid: &Grid) -> i32 {
    grid.iter_cells()
        .filter(|(_, _, cell)| cell.is_occupied())
        .map(|(_, _, cell)| cell.status().resource_delta())
        .sum()
}

/// Advance one generation.
///
/// The weather is rolled first; the per-cell update then runs against the
/// untouched `grid`, and score and resources are derived from the result.
/// Level-ups, turns and game-over are the caller's concern.
pub fn step<R: Rng + ?Sized>(
    grid: &Grid,
    resources: Resources,
    level: &LevelConfig,
    rules: &ColonyRules,
    algorithm: Algorithm,
    rng: &mut R,
) -> Transition {
    let weather = rules.hazards.roll(rng);
    let params = EvolveParams {
        rules,
        survival_threshold: level.survival_threshold,
        hazard_damage: rules.hazards.damage(weather),
    };

    let grid = match algorithm {
        Algorithm::Serial => grid.evolve(&params),
        Algorithm::Parallel => grid.evolve_parallel(&params),
    };

    let score_delta = score_of(&grid);
    let resources = resources.adjust_all(resource_impact(&grid));

    Transition { grid, resources, weather, score_delta }
}
