mod cell;
mod grid;
mod rules;
mod resources;
mod level;
mod weather;
mod algorithm;
pub mod transition;

pub use cell::{Cell, Status, Stock, StructureKind, STOCK_MAX};
pub use grid::{EvolveParams, Grid};
pub use rules::{ColonyRules, fitness};
pub use resources::{Resource, Resources, StructureCost, RESOURCE_MAX};
pub use level::{LevelConfig, MAX_LEVEL, clamp_level};
pub use weather::{Hazard, HazardTable, Weather};
pub use algorithm::Algorithm;
pub use transition::{Transition, step};
