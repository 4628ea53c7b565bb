use std::fmt;

use geo::Point;
use serde::{Deserialize, Serialize};

use super::FunctionalType;

/// Stable key of a residential building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HouseId(pub u64);

impl fmt::Display for HouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// A residential building, reduced to its population and a representative point.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub id: HouseId,
    pub people: u32,
    pub location: Point<f64>,
}

impl Building {
    pub fn new(id: HouseId, people: u32, location: Point<f64>) -> Self {
        Self { id, people, location }
    }
}

/// Number of reachable existing sites of each functional type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Provision {
    pub ev: u32,
    pub mf: u32,
    pub ed: u32,
    pub sp: u32,
}

impl Provision {
    /// Get the counter for a functional type.
    #[inline]
    pub fn get(&self, ty: FunctionalType) -> u32 {
        match ty {
            FunctionalType::Event => self.ev,
            FunctionalType::Multifunctional => self.mf,
            FunctionalType::Educational => self.ed,
            FunctionalType::Sports => self.sp,
        }
    }

    /// Increment the counter for a functional type.
    #[inline]
    pub fn increment(&mut self, ty: FunctionalType) {
        match ty {
            FunctionalType::Event => self.ev += 1,
            FunctionalType::Multifunctional => self.mf += 1,
            FunctionalType::Educational => self.ed += 1,
            FunctionalType::Sports => self.sp += 1,
        }
    }

    /// A building is covered by a category when at least one such site is reachable.
    #[inline] pub fn covers(&self, ty: FunctionalType) -> bool { self.get(ty) >= 1 }

    /// Covered by all four categories.
    #[inline]
    pub fn is_full(&self) -> bool { FunctionalType::all().iter().all(|&ty| self.covers(ty)) }
}
