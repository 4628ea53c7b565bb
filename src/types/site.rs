use std::fmt;

use geo::{Centroid, MultiPolygon, Point};
use serde::{Deserialize, Serialize};

use super::{AreaType, ExistenceState, FunctionalType};

/// Stable key of a public-space site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// A public-space site (OPM zone), either existing or a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: SiteId,
    pub area: f64,
    pub area_type: AreaType,
    pub functional_type: Option<FunctionalType>, // None for unclassified candidates
    pub existence: ExistenceState,
    pub city_function: Option<String>, // Source category tag, e.g. "Природа"
    pub geometry: MultiPolygon<f64>,
}

impl Site {
    /// Create an unclassified candidate site.
    pub fn new(id: SiteId, area: f64, area_type: AreaType, geometry: MultiPolygon<f64>) -> Self {
        Self {
            id,
            area,
            area_type,
            functional_type: None,
            existence: ExistenceState::Potential,
            city_function: None,
            geometry,
        }
    }

    /// Point used to anchor the site on the street network.
    #[inline]
    pub fn centroid(&self) -> Option<Point<f64>> { self.geometry.centroid() }

    #[inline] pub fn is_existing(&self) -> bool { self.existence.is_existing() }
}
