use serde::{Deserialize, Serialize};

use super::resources::StructureCost;

/// Highest value a cell's local stock can hold.
pub const STOCK_MAX: f32 = 100.0;

/// The kinds of structure a player can place on a cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    Habitat,
    Oxygen,
    Water,
    Energy,
    Shield,
}

impl StructureKind {
    pub const ALL: [StructureKind; 5] = [
        StructureKind::Habitat,
        StructureKind::Oxygen,
        StructureKind::Water,
        StructureKind::Energy,
        StructureKind::Shield,
    ];

    /// Display name for UI
    pub fn name(self) -> &'static str {
        match self {
            StructureKind::Habitat => "Habitat Dome",
            StructureKind::Oxygen => "Oxygen Generator",
            StructureKind::Water => "Water Extractor",
            StructureKind::Energy => "Solar Array",
            StructureKind::Shield => "Shield Generator",
        }
    }

    /// Resources deducted from the colony when this structure is placed
    pub const fn cost(self) -> StructureCost {
        match self {
            StructureKind::Habitat => StructureCost::new(20, 10, 15),
            StructureKind::Oxygen => StructureCost::new(30, 5, 0),
            StructureKind::Water => StructureCost::new(25, 0, 10),
            StructureKind::Energy => StructureCost::new(0, 15, 10),
            StructureKind::Shield => StructureCost::new(40, 20, 20),
        }
    }

    /// Only shield generators protect their own cell from hazards.
    pub const fn is_shielded(self) -> bool {
        matches!(self, StructureKind::Shield)
    }

    /// Parse the lowercase tag used by the save format and the CLI
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "habitat" => Some(StructureKind::Habitat),
            "oxygen" => Some(StructureKind::Oxygen),
            "water" => Some(StructureKind::Water),
            "energy" | "solar" => Some(StructureKind::Energy),
            "shield" => Some(StructureKind::Shield),
            _ => None,
        }
    }
}

/// Health classification of a cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Empty,
    Thriving,
    Struggling,
    Dying,
}

impl Status {
    /// Points this status contributes to the score each generation
    pub const fn score(self) -> u32 {
        match self {
            Status::Thriving => 10,
            Status::Struggling => 5,
            Status::Dying | Status::Empty => 0,
        }
    }

    /// Signed change applied to every colony resource per cell with this status
    pub const fn resource_delta(self) -> i32 {
        match self {
            Status::Thriving => 2,
            Status::Struggling => -1,
            Status::Dying => -3,
            Status::Empty => 0,
        }
    }
}

/// Local resource stock carried by an occupied cell.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stock {
    pub oxygen: f32,
    pub water: f32,
    pub energy: f32,
}

impl Stock {
    pub const EMPTY: Stock = Stock { oxygen: 0.0, water: 0.0, energy: 0.0 };
    pub const FULL: Stock = Stock { oxygen: STOCK_MAX, water: STOCK_MAX, energy: STOCK_MAX };

    /// Subtract `amount` from every component, flooring at zero
    pub fn drain_all(self, amount: f32) -> Self {
        Self {
            oxygen: (self.oxygen - amount).max(0.0),
            water: (self.water - amount).max(0.0),
            energy: (self.energy - amount).max(0.0),
        }
    }

    /// Subtract `rates` scaled by `multiplier`, flooring at zero
    pub fn decay(self, rates: &Stock, multiplier: f32) -> Self {
        Self {
            oxygen: (self.oxygen - rates.oxygen * multiplier).max(0.0),
            water: (self.water - rates.water * multiplier).max(0.0),
            energy: (self.energy - rates.energy * multiplier).max(0.0),
        }
    }

    pub fn average(&self) -> f32 {
        (self.oxygen + self.water + self.energy) / 3.0
    }
}

/// One grid position.
///
/// A cell is empty exactly when it holds no structure; the constructors and
/// [`Cell::normalized`] are the only ways to produce one, so the pairing of
/// `structure` and `status` always holds.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cell {
    #[serde(rename = "structureType")]
    structure: Option<StructureKind>,
    status: Status,
    shielded: bool,
    stock: Stock,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        structure: None,
        status: Status::Empty,
        shielded: false,
        stock: Stock::EMPTY,
    };

    /// A freshly placed or born structure: thriving with a full stock
    pub const fn built(kind: StructureKind) -> Self {
        Self {
            structure: Some(kind),
            status: Status::Thriving,
            shielded: kind.is_shielded(),
            stock: Stock::FULL,
        }
    }

    pub const fn structure(&self) -> Option<StructureKind> {
        self.structure
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    pub const fn shielded(&self) -> bool {
        self.shielded
    }

    pub const fn stock(&self) -> Stock {
        self.stock
    }

    pub const fn is_occupied(&self) -> bool {
        self.structure.is_some()
    }

    /// Same structure with a new status and stock
    pub(crate) const fn with_condition(self, status: Status, stock: Stock) -> Self {
        Self { status, stock, ..self }
    }

    /// Repair a cell read from an untrusted source so the empty/occupied
    /// pairing and the shield flag hold again.
    pub fn normalized(self) -> Self {
        match self.structure {
            None => Self::EMPTY,
            Some(kind) => {
                let status = match self.status {
                    Status::Empty => Status::Thriving,
                    other => other,
                };
                let clamp = |v: f32| if v.is_finite() { v.clamp(0.0, STOCK_MAX) } else { 0.0 };
                Self {
                    structure: Some(kind),
                    status,
                    shielded: kind.is_shielded(),
                    stock: Stock {
                        oxygen: clamp(self.stock.oxygen),
                        water: clamp(self.stock.water),
                        energy: clamp(self.stock.energy),
                    },
                }
            }
        }
    }
}
