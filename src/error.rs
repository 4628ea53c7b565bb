use thiserror::Error;

use crate::types::{HouseId, SiteId, TravelTime};

/// Data-integrity failures raised while building an accessibility graph.
///
/// Any of these aborts the build; no partial graph is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// A containment mapping references a site that is not in the site layer.
    #[error("site {0} is referenced by an isochrone layer but missing from the site layer")]
    MissingSite(SiteId),

    /// A containment mapping references a building that is not in the building layer.
    #[error("building {0} is referenced by an isochrone layer but missing from the building layer")]
    MissingBuilding(HouseId),

    /// A pair reachable within a shorter budget is absent from the 20-minute skeleton.
    #[error("building {house} is within {time} of site {site} but outside its 20 min isochrone")]
    NotNested { site: SiteId, house: HouseId, time: TravelTime },
}

pub type AccessResult<T> = Result<T, AccessError>;
