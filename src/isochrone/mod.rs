//! Travel-time isochrones: the three budget layers, their persistence, and how they are computed.

mod layer;
mod network;
mod provider;

pub use layer::{IsochroneLayer, IsochroneSet};
pub use network::StreetNetwork;
pub use provider::{compute_isochrones, compute_layer, IsochroneProvider, NetworkIsochrones};
