use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of every colony-wide resource.
pub const RESOURCE_MAX: u32 = 100;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Energy,
    Water,
    Oxygen,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Energy, Resource::Water, Resource::Oxygen];
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Energy => "energy",
            Resource::Water => "water",
            Resource::Oxygen => "oxygen",
        })
    }
}

/// Energy/water/oxygen deducted when a structure is placed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StructureCost {
    pub energy: u32,
    pub water: u32,
    pub oxygen: u32,
}

impl StructureCost {
    pub const fn new(energy: u32, water: u32, oxygen: u32) -> Self {
        Self { energy, water, oxygen }
    }

    pub const fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Energy => self.energy,
            Resource::Water => self.water,
            Resource::Oxygen => self.oxygen,
        }
    }
}

/// Colony-wide resource levels, each kept in `0..=RESOURCE_MAX`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub energy: u32,
    pub water: u32,
    pub oxygen: u32,
}

impl Default for Resources {
    fn default() -> Self {
        Self::full()
    }
}

impl Resources {
    pub const fn full() -> Self {
        Self { energy: RESOURCE_MAX, water: RESOURCE_MAX, oxygen: RESOURCE_MAX }
    }

    pub const fn new(energy: u32, water: u32, oxygen: u32) -> Self {
        Self { energy, water, oxygen }
    }

    pub const fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Energy => self.energy,
            Resource::Water => self.water,
            Resource::Oxygen => self.oxygen,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Energy => &mut self.energy,
            Resource::Water => &mut self.water,
            Resource::Oxygen => &mut self.oxygen,
        }
    }

    /// First resource that cannot cover `cost`, if any
    pub fn shortfall(&self, cost: &StructureCost) -> Option<Resource> {
        Resource::ALL
            .into_iter()
            .find(|&r| self.get(r) < cost.get(r))
    }

    /// Deduct `cost` if every resource covers it; otherwise leave self untouched
    pub fn try_spend(&mut self, cost: &StructureCost) -> Result<(), Resource> {
        if let Some(missing) = self.shortfall(cost) {
            return Err(missing);
        }
        Resource::ALL.into_iter().for_each(|r| *self.slot(r) -= cost.get(r));
        Ok(())
    }

    /// Apply a signed change to one resource, clamped to `0..=RESOURCE_MAX`
    pub fn adjust(mut self, resource: Resource, delta: i32) -> Self {
        let slot = self.slot(resource);
        *slot = (*slot).saturating_add_signed(delta).min(RESOURCE_MAX);
        self
    }

    /// Apply the same signed change to every resource
    pub fn adjust_all(self, delta: i32) -> Self {
        Resource::ALL.into_iter().fold(self, |acc, r| acc.adjust(r, delta))
    }

    /// Force every value back into range
    pub fn clamped(self) -> Self {
        Self {
            energy: self.energy.min(RESOURCE_MAX),
            water: self.water.min(RESOURCE_MAX),
            oxygen: self.oxygen.min(RESOURCE_MAX),
        }
    }
}
