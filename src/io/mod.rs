//! Reading and writing of site, building, service, isochrone and street-network layers.

mod feature;
mod geojson;
mod layers;
mod network;
mod shp;

pub use feature::Feature;
pub use geojson::{read_geojson, read_geojson_bytes, write_geojson};
pub use layers::{buildings_from_features, read_layer, services_from_features, sites_from_features, sites_to_features};
pub use network::read_street_network;
pub use shp::read_shapefile;
