//! Environmental hazards.
//!
//! At most one hazard strikes per generation. Hazards are checked in a fixed
//! priority order (dust storm, radiation, meteor), each with its own draw, and
//! the first one that triggers wins.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weather observed during the last generation
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Normal,
    DustStorm,
    Radiation,
    Meteor,
}

impl Weather {
    pub fn tag(self) -> &'static str {
        match self {
            Weather::Normal => "normal",
            Weather::DustStorm => "dust_storm",
            Weather::Radiation => "radiation",
            Weather::Meteor => "meteor",
        }
    }

    /// Parse a stored tag; anything unrecognized reads as normal weather
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "dust_storm" => Weather::DustStorm,
            "radiation" => Weather::Radiation,
            "meteor" => Weather::Meteor,
            _ => Weather::Normal,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Trigger chance per generation and stock damage dealt to unshielded cells.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Hazard {
    pub chance: f64,
    pub damage: f32,
}

impl Hazard {
    pub const fn new(chance: f64, damage: f32) -> Self {
        Self { chance, damage }
    }
}

/// Hazard settings. When loaded, each hazard merges over its own defaults,
/// so a table naming only `chance` keeps the stock `damage`.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(from = "HazardTableOverride")]
pub struct HazardTable {
    pub dust_storm: Hazard,
    pub radiation: Hazard,
    pub meteor: Hazard,
}

impl Default for HazardTable {
    fn default() -> Self {
        Self {
            dust_storm: Hazard::new(0.01, 20.0),
            radiation: Hazard::new(0.02, 15.0),
            meteor: Hazard::new(0.005, 50.0),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct HazardOverride {
    chance: Option<f64>,
    damage: Option<f32>,
}

impl HazardOverride {
    fn over(self, base: Hazard) -> Hazard {
        Hazard {
            chance: self.chance.unwrap_or(base.chance),
            damage: self.damage.unwrap_or(base.damage),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct HazardTableOverride {
    dust_storm: HazardOverride,
    radiation: HazardOverride,
    meteor: HazardOverride,
}

impl From<HazardTableOverride> for HazardTable {
    fn from(table: HazardTableOverride) -> Self {
        let base = Self::default();
        Self {
            dust_storm: table.dust_storm.over(base.dust_storm),
            radiation: table.radiation.over(base.radiation),
            meteor: table.meteor.over(base.meteor),
        }
    }
}

impl HazardTable {
    /// A table where no hazard can ever trigger
    pub const fn calm() -> Self {
        Self {
            dust_storm: Hazard::new(0.0, 0.0),
            radiation: Hazard::new(0.0, 0.0),
            meteor: Hazard::new(0.0, 0.0),
        }
    }

    /// Hazards in the order they are checked
    pub fn in_priority_order(&self) -> [(Weather, Hazard); 3] {
        [
            (Weather::DustStorm, self.dust_storm),
            (Weather::Radiation, self.radiation),
            (Weather::Meteor, self.meteor),
        ]
    }

    /// Damage of the hazard behind `weather`, zero for normal weather
    pub fn damage(&self, weather: Weather) -> f32 {
        match weather {
            Weather::Normal => 0.0,
            Weather::DustStorm => self.dust_storm.damage,
            Weather::Radiation => self.radiation.damage,
            Weather::Meteor => self.meteor.damage,
        }
    }

    /// Roll this generation's weather.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Weather {
        self.in_priority_order()
            .into_iter()
            .find(|(_, hazard)| rng.random::<f64>() < hazard.chance)
            .map_or(Weather::Normal, |(weather, _)| weather)
    }
}
