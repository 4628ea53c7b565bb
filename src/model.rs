use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::{
    analysis::{coverage, site_summary, CoverageReport, SiteSummary},
    classify::{classify_sites, Classification, SiteClassification},
    config::ModelConfig,
    export::{enrich_sites, render_svg, EnrichedSite, ServicePolicy},
    graph::{AccessGraph, GraphBuilder},
    io::{buildings_from_features, read_layer, services_from_features, sites_from_features},
    isochrone::{compute_isochrones, IsochroneProvider, IsochroneSet},
    join::{BuildingIndex, ContainmentJoin},
    types::{Building, Service, Site},
};

/// Site and building layers together with their isochrones and derived accessibility graph.
///
/// The graph is built on first request and reused afterwards. Replacing the sites
/// (by classifying them) or the isochrones discards it.
#[derive(Debug, Clone)]
pub struct AccessModel {
    config: ModelConfig,
    sites: Vec<Site>,
    buildings: Vec<Building>,
    isochrones: Option<IsochroneSet>,
    graph: Option<AccessGraph>,
}

impl AccessModel {
    pub fn new(sites: Vec<Site>, buildings: Vec<Building>, config: ModelConfig) -> Self {
        Self { config, sites, buildings, isochrones: None, graph: None }
    }

    /// Load the site and building layers (GeoJSON or Shapefile).
    pub fn from_files(sites_path: &Path, buildings_path: &Path, config: ModelConfig) -> Result<Self> {
        let sites = sites_from_features(&read_layer(sites_path)?, &config.fields)
            .with_context(|| format!("[model] Failed to load sites from {}", sites_path.display()))?;
        let buildings = buildings_from_features(&read_layer(buildings_path)?, &config.fields)
            .with_context(|| format!("[model] Failed to load buildings from {}", buildings_path.display()))?;
        info!(sites = sites.len(), buildings = buildings.len(), "loaded model layers");
        Ok(Self::new(sites, buildings, config))
    }

    /// Load a service layer using the configured field names.
    pub fn read_services(&self, path: &Path) -> Result<Vec<Service>> {
        Ok(services_from_features(&read_layer(path)?, &self.config.fields))
    }

    #[inline] pub fn config(&self) -> &ModelConfig { &self.config }

    #[inline] pub fn sites(&self) -> &[Site] { &self.sites }

    #[inline] pub fn buildings(&self) -> &[Building] { &self.buildings }

    #[inline] pub fn isochrones(&self) -> Option<&IsochroneSet> { self.isochrones.as_ref() }

    /// Classify candidate sites by nearby services and adopt the classified layer.
    pub fn classify(&mut self, services: &[Service]) -> Vec<SiteClassification> {
        let Classification { sites, records } = classify_sites(&self.sites, services, &self.config.classifier);
        self.sites = sites;
        self.graph = None;
        records
    }

    /// Compute isochrones for every site with the given provider.
    pub fn compute_isochrones(&mut self, provider: &dyn IsochroneProvider) -> Result<&IsochroneSet> {
        let isochrones = compute_isochrones(provider, &self.sites)?;
        Ok(self.set_isochrones(isochrones))
    }

    /// Load precomputed isochrone layers from `dir`.
    pub fn load_isochrones(&mut self, dir: &Path) -> Result<&IsochroneSet> {
        let isochrones = IsochroneSet::read_dir(dir)?;
        Ok(self.set_isochrones(isochrones))
    }

    pub fn set_isochrones(&mut self, isochrones: IsochroneSet) -> &IsochroneSet {
        self.graph = None;
        self.isochrones.insert(isochrones)
    }

    /// Get the accessibility graph, building it with the default building index on first call.
    pub fn graph(&mut self) -> Result<&AccessGraph> {
        if self.graph.is_none() {
            let index = BuildingIndex::new(&self.buildings);
            return self.graph_with(&index);
        }
        self.graph.as_ref().ok_or_else(|| anyhow!("[model] Graph was not built"))
    }

    /// Get the accessibility graph, building it with a custom join on first call.
    pub fn graph_with(&mut self, join: &dyn ContainmentJoin) -> Result<&AccessGraph> {
        let graph = match self.graph.take() {
            Some(graph) => graph,
            None => {
                let isochrones = self.isochrones.as_ref()
                    .ok_or_else(|| anyhow!("[model] No isochrones loaded; compute or load them first"))?;
                GraphBuilder::new(&self.sites, &self.buildings).build_from_isochrones(join, isochrones)?
            }
        };
        Ok(self.graph.insert(graph))
    }

    /// Count existing sites in the graph by functional type.
    pub fn site_summary(&mut self) -> Result<SiteSummary> { Ok(site_summary(self.graph()?)) }

    /// Building coverage and mean travel time over the graph.
    pub fn coverage(&mut self) -> Result<CoverageReport> { Ok(coverage(self.graph()?)) }

    /// Typed sites with planning attributes from `policy`.
    ///
    /// When isochrones are available the graph is built first, so that types of
    /// existing sites come from the graph.
    pub fn enriched_sites(&mut self, policy: &dyn ServicePolicy) -> Result<Vec<EnrichedSite>> {
        if self.isochrones.is_some() { self.graph()?; }
        Ok(enrich_sites(&self.sites, self.graph.as_ref(), policy))
    }

    /// Render the graph, with site outlines and building points, as an SVG file.
    pub fn render_svg(&mut self, path: &Path) -> Result<()> {
        self.graph()?;
        let graph = self.graph.as_ref().ok_or_else(|| anyhow!("[model] Graph was not built"))?;
        render_svg(graph, &self.sites, &self.buildings, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use geo::{polygon, MultiPolygon, Point};
    use crate::{
        error::AccessError,
        export::UnspecifiedPolicy,
        isochrone::IsochroneLayer,
        types::{AreaType, FunctionalType, HouseId, SiteId, TravelTime},
    };

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x, y: y), (x: x + size, y: y), (x: x + size, y: y + size), (x: x, y: y + size),
        ]])
    }

    fn model() -> AccessModel {
        let mut site = Site::new(SiteId(1), 100.0, AreaType::Small, square(0.0, 0.0, 10.0));
        site.city_function = Some("Природа".into());
        let buildings = vec![
            Building::new(HouseId(1), 40, Point::new(20.0, 5.0)),
            Building::new(HouseId(2), 60, Point::new(80.0, 5.0)),
        ];
        AccessModel::new(vec![site], buildings, ModelConfig::default())
    }

    fn isochrones() -> IsochroneSet {
        let layer = |time, size: f64| {
            let mut layer = IsochroneLayer::new(time);
            layer.insert(SiteId(1), square(-size, -size, 2.0 * size));
            layer
        };
        IsochroneSet::new(
            layer(TravelTime::Five, 30.0),
            layer(TravelTime::Ten, 60.0),
            layer(TravelTime::Twenty, 100.0),
        ).unwrap()
    }

    #[test]
    fn graph_requires_isochrones() {
        assert!(model().graph().is_err());
    }

    #[test]
    fn classify_then_analyze() {
        let mut model = model();
        let records = model.classify(&[Service::new("Стадион", Point::new(5.0, 5.0))]);
        assert_eq!(records.len(), 1);
        assert_eq!(model.sites()[0].functional_type, Some(FunctionalType::Sports));

        model.set_isochrones(isochrones());
        let graph = model.graph().unwrap();
        // Small site: only the 5-minute building survives.
        assert_eq!(graph.site_neighbors(SiteId(1)).collect::<Vec<_>>(), vec![(HouseId(1), TravelTime::Five)]);
        assert_eq!(graph.site(SiteId(1)).unwrap().people_around, 40);

        let summary = model.site_summary().unwrap();
        assert_eq!(summary.sports, 1);
        let report = model.coverage().unwrap();
        assert_eq!(report.total_buildings, 1);
        assert_eq!(report.sports, 1);
        assert_eq!(report.mean_travel_time, Some(5.0));

        let enriched = model.enriched_sites(&UnspecifiedPolicy).unwrap();
        assert_eq!(enriched[0].functional_type, FunctionalType::Sports);
    }

    struct CountingJoin {
        inner: BuildingIndex,
        calls: AtomicUsize,
    }

    impl ContainmentJoin for CountingJoin {
        fn buildings_within(&self, layer: &IsochroneLayer) -> crate::join::Reach {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.buildings_within(layer)
        }
    }

    #[test]
    fn cached_graph_is_served_without_joining() {
        let mut model = model();
        model.set_isochrones(isochrones());
        let join = CountingJoin { inner: BuildingIndex::new(model.buildings()), calls: AtomicUsize::new(0) };
        let first = model.graph_with(&join).unwrap().clone();
        assert_eq!(join.calls.load(Ordering::SeqCst), 3);

        assert_eq!(model.graph().unwrap(), &first);
        model.site_summary().unwrap();
        model.coverage().unwrap();
        assert_eq!(model.graph_with(&join).unwrap(), &first);
        assert_eq!(join.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn graph_is_memoised_until_inputs_change() {
        let mut model = model();
        model.set_isochrones(isochrones());
        let first = model.graph().unwrap().clone();
        assert_eq!(model.graph().unwrap(), &first);

        // Replacing isochrones rebuilds: the 5-minute layer now reaches a building
        // outside the 20-minute one.
        let mut five = IsochroneLayer::new(TravelTime::Five);
        five.insert(SiteId(1), square(-100.0, -100.0, 200.0));
        let mut twenty = IsochroneLayer::new(TravelTime::Twenty);
        twenty.insert(SiteId(1), square(-30.0, -30.0, 60.0));
        let ten = isochrones().get(TravelTime::Ten).clone();
        model.set_isochrones(IsochroneSet::new(five, ten, twenty).unwrap());
        let err = model.graph().unwrap_err();
        assert!(matches!(err.downcast_ref::<AccessError>(), Some(AccessError::NotNested { .. })));
    }
}
