mod classifier;

pub use classifier::{classify_sites, Classification, SiteClassification, Tallies};
