//! Outputs derived from the classified sites and the accessibility graph.

mod color;
mod enriched;
mod policy;
mod svg;

pub use enriched::{enrich_sites, enriched_to_features, write_enriched, EnrichedSite};
pub use policy::{ServicePolicy, UnspecifiedPolicy};
pub use svg::render_svg;
