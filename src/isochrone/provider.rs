use anyhow::{Context, Result};
use geo::{ConvexHull, MultiPoint, MultiPolygon};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    isochrone::{IsochroneLayer, IsochroneSet, StreetNetwork},
    types::{Site, TravelTime},
};

/// Source of reachable-area polygons for a site and a travel-time budget.
///
/// Implementations must be shareable across threads: layers are computed in
/// parallel over sites.
pub trait IsochroneProvider: Sync {
    /// Reachable area of `site` within `time`, or `None` if the site cannot be placed.
    fn isochrone(&self, site: &Site, time: TravelTime) -> Result<Option<MultiPolygon<f64>>>;
}

/// Isochrones from time-bounded shortest paths over a street network.
///
/// Each site is snapped from its centroid to the nearest network node; the isochrone is the
/// convex hull of every node reachable within the budget.
#[derive(Debug)]
pub struct NetworkIsochrones {
    network: StreetNetwork,
}

impl NetworkIsochrones {
    pub fn new(network: StreetNetwork) -> Self { Self { network } }

    #[inline] pub fn network(&self) -> &StreetNetwork { &self.network }
}

impl IsochroneProvider for NetworkIsochrones {
    fn isochrone(&self, site: &Site, time: TravelTime) -> Result<Option<MultiPolygon<f64>>> {
        let Some(node) = site.centroid().and_then(|c| self.network.nearest_node(&c)) else {
            return Ok(None)
        };

        let reached = self.network.reachable_within(node, time.minutes() as f64);
        let points = MultiPoint::new(reached.into_iter().map(|n| self.network.coord(n)).collect());
        Ok(Some(MultiPolygon::new(vec![points.convex_hull()])))
    }
}

/// Compute one isochrone layer for every site, in parallel.
pub fn compute_layer(provider: &dyn IsochroneProvider, sites: &[Site], time: TravelTime) -> Result<IsochroneLayer> {
    let polygons = sites.par_iter()
        .map(|site| provider.isochrone(site, time)
            .with_context(|| format!("[isochrone] Failed to compute {time} isochrone of site {}", site.id))
            .map(|polygon| (site.id, polygon)))
        .collect::<Result<Vec<_>>>()?;

    let mut layer = IsochroneLayer::new(time);
    for (site, polygon) in polygons {
        match polygon {
            Some(polygon) => layer.insert(site, polygon),
            None => debug!(%site, %time, "no isochrone for site"),
        }
    }
    info!(%time, sites = layer.len(), "computed isochrone layer");
    Ok(layer)
}

/// Compute the 20, 10 and 5 minute layers for every site.
pub fn compute_isochrones(provider: &dyn IsochroneProvider, sites: &[Site]) -> Result<IsochroneSet> {
    let twenty = compute_layer(provider, sites, TravelTime::Twenty)?;
    let ten = compute_layer(provider, sites, TravelTime::Ten)?;
    let five = compute_layer(provider, sites, TravelTime::Five)?;
    IsochroneSet::new(five, ten, twenty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Contains, Point};
    use crate::types::{AreaType, SiteId};

    /// Two rows of five nodes, 100 units apart; every hop costs 5 minutes in both directions.
    fn network() -> StreetNetwork {
        let coords = (0..2)
            .flat_map(|row| (0..5).map(move |col| Point::new(col as f64 * 100.0, row as f64 * 100.0)))
            .collect::<Vec<_>>();
        let mut list = Vec::new();
        for row in 0..2 {
            for col in 0..4 {
                let a = row * 5 + col;
                list.push((a, a + 1, 5.0));
                list.push((a + 1, a, 5.0));
            }
        }
        for col in 0..5 {
            list.push((col, col + 5, 5.0));
            list.push((col + 5, col, 5.0));
        }
        StreetNetwork::from_edge_list(coords, &list).unwrap()
    }

    fn site(id: u64, x: f64) -> Site {
        let geometry = MultiPolygon::new(vec![polygon![
            (x: x - 10.0, y: -10.0), (x: x + 10.0, y: -10.0), (x: x + 10.0, y: 10.0), (x: x - 10.0, y: 10.0),
        ]]);
        Site::new(SiteId(id), 400.0, AreaType::Small, geometry)
    }

    #[test]
    fn isochrones_grow_with_budget() {
        let provider = NetworkIsochrones::new(network());
        let sites = vec![site(1, 0.0), site(2, 400.0)];
        let set = compute_isochrones(&provider, &sites).unwrap();

        let five = set.get(TravelTime::Five).get(SiteId(1)).unwrap();
        let ten = set.get(TravelTime::Ten).get(SiteId(1)).unwrap();
        let twenty = set.get(TravelTime::Twenty).get(SiteId(1)).unwrap();

        // Five minutes reaches one hop along the row and one hop up.
        assert!(five.contains(&Point::new(50.0, 10.0)));
        assert!(!five.contains(&Point::new(150.0, 10.0)));
        assert!(ten.contains(&Point::new(150.0, 10.0)));
        assert!(twenty.contains(&Point::new(300.0, 50.0)));
        assert_eq!(set.get(TravelTime::Twenty).len(), 2);
    }

    #[test]
    fn sites_off_an_empty_network_get_no_isochrone() {
        let provider = NetworkIsochrones::new(StreetNetwork::new(vec![], &[], &[]));
        let layer = compute_layer(&provider, &[site(1, 0.0)], TravelTime::Ten).unwrap();
        assert!(layer.is_empty());
    }
}
