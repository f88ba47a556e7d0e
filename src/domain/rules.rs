use serde::{Deserialize, Deserializer, Serialize};

use super::cell::{Cell, Status, Stock, StructureKind};
use super::weather::HazardTable;

/// Tunable colony rules.
/// Defaults reproduce the stock game: oxygen 5 / water 3 / energy 4 decay,
/// double decay when crowded, one-and-a-half when isolated.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyRules {
    /// Per-generation stock loss of an occupied cell
    #[serde(deserialize_with = "decay_over_defaults")]
    pub decay: Stock,
    /// Neighbor count above which decay is multiplied by `crowded_multiplier`
    pub crowded_above: u8,
    pub crowded_multiplier: f32,
    /// Neighbor count below which decay is multiplied by `isolated_multiplier`
    pub isolated_below: u8,
    pub isolated_multiplier: f32,
    /// Inclusive neighbor band a structure needs to stay standing
    pub viable_min: u8,
    pub viable_max: u8,
    pub hazards: HazardTable,
}

impl Default for ColonyRules {
    fn default() -> Self {
        Self {
            decay: Stock { oxygen: 5.0, water: 3.0, energy: 4.0 },
            crowded_above: 5,
            crowded_multiplier: 2.0,
            isolated_below: 2,
            isolated_multiplier: 1.5,
            viable_min: 1,
            viable_max: 6,
            hazards: HazardTable::default(),
        }
    }
}

/// A `[rules.decay]` table; rates it leaves out keep their stock values
#[derive(Default, Deserialize)]
#[serde(default)]
struct DecayOverride {
    oxygen: Option<f32>,
    water: Option<f32>,
    energy: Option<f32>,
}

fn decay_over_defaults<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Stock, D::Error> {
    let rates = DecayOverride::deserialize(deserializer)?;
    let stock = ColonyRules::default().decay;
    Ok(Stock {
        oxygen: rates.oxygen.unwrap_or(stock.oxygen),
        water: rates.water.unwrap_or(stock.water),
        energy: rates.energy.unwrap_or(stock.energy),
    })
}

/// Status of an occupied cell from its neighbor count alone:
/// below the threshold it is dying, at or one above it struggles,
/// anything more thrives.
pub const fn fitness(neighbors: u8, survival_threshold: u8) -> Status {
    if neighbors < survival_threshold {
        Status::Dying
    } else if neighbors <= survival_threshold.saturating_add(1) {
        Status::Struggling
    } else {
        Status::Thriving
    }
}

impl ColonyRules {
    fn decay_multiplier(&self, neighbors: u8) -> f32 {
        if neighbors > self.crowded_above {
            self.crowded_multiplier
        } else if neighbors < self.isolated_below {
            self.isolated_multiplier
        } else {
            1.0
        }
    }

    const fn is_viable(&self, neighbors: u8) -> bool {
        neighbors >= self.viable_min && neighbors <= self.viable_max
    }

    /// Next state of one cell.
    ///
    /// `hazard_damage` is the stock damage of this generation's hazard (zero
    /// in normal weather); shielded cells ignore it.
    pub fn evolve(&self, current: Cell, neighbors: u8, survival_threshold: u8, hazard_damage: f32) -> Cell {
        match (current.structure(), neighbors) {
            (Some(_), n) => {
                let mut stock = current.stock();
                if hazard_damage > 0.0 && !current.shielded() {
                    stock = stock.drain_all(hazard_damage);
                }
                stock = stock.decay(&self.decay, self.decay_multiplier(n));

                if stock.average() <= 0.0 || !self.is_viable(n) {
                    Cell::EMPTY
                } else {
                    current.with_condition(fitness(n, survival_threshold), stock)
                }
            }
            (None, 3) => Cell::built(StructureKind::Habitat),
            (None, _) => Cell::EMPTY,
        }
    }
}
