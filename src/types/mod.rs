mod building;
mod category;
mod service;
mod site;
mod time;

pub use building::{Building, HouseId, Provision};
pub use category::{AreaType, ExistenceState, FunctionalType};
pub use service::Service;
pub use site::{Site, SiteId};
pub use time::TravelTime;
