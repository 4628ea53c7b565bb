use ahash::AHashSet;
use geo::{BoundingRect, Closest, ClosestPoint, Intersects, MultiPolygon, Point};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::ClassifierRules,
    geom::PointIndex,
    types::{ExistenceState, FunctionalType, Service, Site, SiteId},
};

/// Order in which tallies are compared; on a tie the earlier category wins.
const TIE_BREAK_ORDER: [FunctionalType; 4] = [
    FunctionalType::Multifunctional,
    FunctionalType::Event,
    FunctionalType::Sports,
    FunctionalType::Educational,
];

/// Number of nearby services counted toward each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Tallies {
    pub multifunctional: u32,
    pub event: u32,
    pub educational: u32,
    pub sports: u32,
}

impl Tallies {
    #[inline]
    pub fn get(&self, ty: FunctionalType) -> u32 {
        match ty {
            FunctionalType::Multifunctional => self.multifunctional,
            FunctionalType::Event => self.event,
            FunctionalType::Educational => self.educational,
            FunctionalType::Sports => self.sports,
        }
    }

    fn increment(&mut self, ty: FunctionalType) {
        match ty {
            FunctionalType::Multifunctional => self.multifunctional += 1,
            FunctionalType::Event => self.event += 1,
            FunctionalType::Educational => self.educational += 1,
            FunctionalType::Sports => self.sports += 1,
        }
    }

    /// Category with the strictly largest tally; Multifunctional when every tally is zero.
    pub fn winner(&self) -> FunctionalType {
        let mut best = (FunctionalType::Multifunctional, 0);
        for ty in TIE_BREAK_ORDER {
            if self.get(ty) > best.1 { best = (ty, self.get(ty)) }
        }
        best.0
    }

    /// Total matches across categories (a service in two lists counts twice).
    #[inline]
    pub fn total(&self) -> u32 { self.multifunctional + self.event + self.educational + self.sports }
}

/// Outcome of classifying one candidate site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteClassification {
    pub site: SiteId,
    pub functional_type: FunctionalType,
    pub tallies: Tallies,
    /// Services of any subtype near the site.
    pub services: usize,
}

impl SiteClassification {
    /// Promoted to existing without a single service of a known subtype nearby.
    #[inline] pub fn is_uncorroborated(&self) -> bool { self.tallies.total() == 0 }
}

/// Classified copy of a site layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub sites: Vec<Site>,
    pub records: Vec<SiteClassification>,
}

/// Distance from a point to a polygon; zero inside or on the boundary.
fn distance_to(geometry: &MultiPolygon<f64>, point: &Point<f64>) -> f64 {
    if geometry.intersects(point) { return 0.0 }
    match geometry.closest_point(point) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => (p.x() - point.x()).hypot(p.y() - point.y()),
        Closest::Indeterminate => f64::INFINITY,
    }
}

/// Classify candidate sites by the services around them.
///
/// Returns a new site collection; the input is left untouched. A candidate with at least
/// one service of any subtype within `rules.radius` is marked existing with the winning
/// category, even when no nearby service matches a category list (it then defaults to
/// Multifunctional and its record reports `is_uncorroborated`). Candidates with no
/// nearby service are not modified.
pub fn classify_sites(sites: &[Site], services: &[Service], rules: &ClassifierRules) -> Classification {
    let lookup = FunctionalType::all().map(|ty| {
        (ty, rules.subtypes(ty).iter().map(String::as_str).collect::<AHashSet<_>>())
    });
    let index = PointIndex::new(services.iter().map(|s| s.location));

    let mut sites = sites.to_vec();
    let mut records = Vec::new();

    for site in sites.iter_mut() {
        if site.city_function.as_deref() != Some(rules.candidate_function.as_str()) { continue }
        let Some(rect) = site.geometry.bounding_rect() else { continue };

        let nearby = index.within_rect(&rect, rules.radius)
            .filter(|entry| distance_to(&site.geometry, entry.point()) <= rules.radius)
            .map(|entry| &services[entry.idx()])
            .collect::<Vec<_>>();
        if nearby.is_empty() { continue }

        let mut tallies = Tallies::default();
        for service_type in nearby.iter().filter_map(|service| service.service_type.as_deref()) {
            for (ty, subtypes) in &lookup {
                if subtypes.contains(service_type) { tallies.increment(*ty) }
            }
        }

        let functional_type = tallies.winner();
        site.functional_type = Some(functional_type);
        site.existence = ExistenceState::Existing;
        records.push(SiteClassification { site: site.id, functional_type, tallies, services: nearby.len() });
    }

    let uncorroborated = records.iter().filter(|r| r.is_uncorroborated()).count();
    if uncorroborated > 0 {
        warn!(uncorroborated, "sites marked existing without a service of a known subtype nearby");
    }
    info!(candidates = records.len(), services = services.len(), "classified sites");

    Classification { sites, records }
}
