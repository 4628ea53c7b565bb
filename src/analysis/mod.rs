mod coverage;
mod summary;

pub use coverage::{coverage, CoverageReport};
pub use summary::{site_summary, SiteSummary};
