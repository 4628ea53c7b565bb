#![doc = "Accessibility of public-space sites from residential buildings"]
mod analysis;
mod classify;
mod config;
mod error;
mod export;
mod geom;
mod graph;
mod io;
mod isochrone;
mod join;
mod model;
mod types;

#[doc(inline)]
pub use analysis::{coverage, site_summary, CoverageReport, SiteSummary};

#[doc(inline)]
pub use classify::{classify_sites, Classification, SiteClassification, Tallies};

#[doc(inline)]
pub use config::{ClassifierRules, FieldNames, ModelConfig};

#[doc(inline)]
pub use error::{AccessError, AccessResult};

#[doc(inline)]
pub use export::{enrich_sites, enriched_to_features, render_svg, write_enriched, EnrichedSite, ServicePolicy, UnspecifiedPolicy};

#[doc(inline)]
pub use graph::{max_travel_time, AccessGraph, BuildingNode, GraphBuilder, Node, NodeId, SiteNode};

#[doc(inline)]
pub use io::{
    buildings_from_features, read_geojson, read_geojson_bytes, read_layer, read_shapefile, read_street_network,
    services_from_features, sites_from_features, sites_to_features, write_geojson, Feature,
};

#[doc(inline)]
pub use isochrone::{compute_isochrones, compute_layer, IsochroneLayer, IsochroneProvider, IsochroneSet, NetworkIsochrones, StreetNetwork};

#[doc(inline)]
pub use join::{BuildingIndex, ContainmentJoin, Reach};

#[doc(inline)]
pub use model::AccessModel;

#[doc(inline)]
pub use types::{AreaType, Building, ExistenceState, FunctionalType, HouseId, Provision, Service, Site, SiteId, TravelTime};
