use std::path::Path;

use anyhow::Result;
use geo::{Geometry, MultiPolygon};
use serde_json::{json, Map};
use tracing::info;

use crate::{
    export::ServicePolicy,
    graph::AccessGraph,
    io::{write_geojson, Feature},
    types::{AreaType, FunctionalType, Site, SiteId},
};

/// A typed site with the planning attributes of its policy.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSite {
    pub id: SiteId,
    pub functional_type: FunctionalType,
    pub area_type: AreaType,
    pub area: f64,
    pub geometry: MultiPolygon<f64>,
    pub ratio: Option<f64>,
    pub services: Vec<String>,
}

/// Enrich every site that has a functional type.
///
/// For existing sites present in `graph`, the graph's functional type takes
/// precedence over the one on the site record.
pub fn enrich_sites(sites: &[Site], graph: Option<&AccessGraph>, policy: &dyn ServicePolicy) -> Vec<EnrichedSite> {
    sites.iter()
        .filter_map(|site| {
            let from_graph = graph
                .and_then(|graph| graph.site(site.id))
                .filter(|node| node.is_existing())
                .and_then(|node| node.functional_type);
            let ty = from_graph.or(site.functional_type)?;

            Some(EnrichedSite {
                id: site.id,
                functional_type: ty,
                area_type: site.area_type,
                area: site.area,
                geometry: site.geometry.clone(),
                ratio: policy.ratio(ty, site.area),
                services: policy.recommend_services(ty, site.area),
            })
        })
        .collect()
}

/// Convert enriched sites to features.
pub fn enriched_to_features(sites: &[EnrichedSite]) -> Vec<Feature> {
    sites.iter()
        .map(|site| {
            let mut properties = Map::new();
            properties.insert("id".into(), json!(site.id.0));
            properties.insert("functional_type".into(), json!(site.functional_type.to_str()));
            properties.insert("area_type".into(), json!(site.area_type.to_str()));
            properties.insert("area".into(), json!(site.area));
            properties.insert("ratio".into(), json!(site.ratio));
            properties.insert("services".into(), json!(site.services));
            Feature::new(Some(Geometry::MultiPolygon(site.geometry.clone())), properties)
        })
        .collect()
}

/// Write enriched sites as a GeoJSON FeatureCollection.
pub fn write_enriched(path: &Path, sites: &[EnrichedSite]) -> Result<()> {
    write_geojson(path, &enriched_to_features(sites))?;
    info!(path = %path.display(), sites = sites.len(), "wrote enriched sites");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Point};
    use crate::{
        export::UnspecifiedPolicy,
        graph::GraphBuilder,
        io::read_geojson,
        join::Reach,
        types::{Building, ExistenceState, HouseId},
    };

    struct FixedPolicy;

    impl ServicePolicy for FixedPolicy {
        fn ratio(&self, _: FunctionalType, area: f64) -> Option<f64> { Some(area / 100.0) }

        fn recommend_services(&self, ty: FunctionalType, _: f64) -> Vec<String> {
            match ty {
                FunctionalType::Sports => vec!["Стадион".into()],
                _ => Vec::new(),
            }
        }
    }

    fn sites() -> Vec<Site> {
        let square = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)]]);
        let mut typed = Site::new(SiteId(1), 250.0, AreaType::Medium, square.clone());
        typed.functional_type = Some(FunctionalType::Sports);
        let untyped = Site::new(SiteId(2), 50.0, AreaType::Small, square);
        vec![typed, untyped]
    }

    #[test]
    fn untyped_sites_are_skipped() {
        let enriched = enrich_sites(&sites(), None, &UnspecifiedPolicy);
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].id, SiteId(1));
        assert_eq!(enriched[0].ratio, None);
        assert!(enriched[0].services.is_empty());
    }

    #[test]
    fn policy_fills_ratio_and_services() {
        let enriched = enrich_sites(&sites(), None, &FixedPolicy);
        assert_eq!(enriched[0].ratio, Some(2.5));
        assert_eq!(enriched[0].services, vec!["Стадион".to_string()]);
    }

    #[test]
    fn graph_type_wins_for_existing_sites() {
        let mut graph_sites = sites();
        graph_sites[1].functional_type = Some(FunctionalType::Event);
        graph_sites[1].existence = ExistenceState::Existing;
        let buildings = [Building::new(HouseId(1), 1, Point::new(0.0, 0.0))];
        let reach = Reach::from([(SiteId(2), [HouseId(1)].into())]);
        let graph = GraphBuilder::new(&graph_sites, &buildings).build(&reach, &reach, &reach).unwrap();

        // The record for site 2 is untyped, but the graph knows it as an existing Event site.
        let enriched = enrich_sites(&sites(), Some(&graph), &UnspecifiedPolicy);
        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[1].functional_type, FunctionalType::Event);
    }

    #[test]
    fn writes_feature_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enriched.geojson");
        write_enriched(&path, &enrich_sites(&sites(), None, &FixedPolicy)).unwrap();

        let features = read_geojson(&path).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].get_str("functional_type"), Some("Sports"));
        assert_eq!(features[0].get_str("area_type"), Some("medium"));
        assert_eq!(features[0].get_f64("ratio"), Some(2.5));
    }
}
