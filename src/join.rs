use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::{
    geom::PointIndex,
    isochrone::IsochroneLayer,
    types::{Building, HouseId, SiteId},
};

/// Containment mapping: for each site, the buildings inside its isochrone.
/// Sites whose isochrone contains no building are absent.
pub type Reach = BTreeMap<SiteId, BTreeSet<HouseId>>;

/// Spatial join between an isochrone layer and the building layer.
///
/// The three budget layers are joined concurrently, so implementations must be `Sync`.
pub trait ContainmentJoin: Sync {
    fn buildings_within(&self, layer: &IsochroneLayer) -> Reach;
}

/// R-tree backed containment join over building points.
///
/// A building is within an isochrone when its point intersects the polygon,
/// so buildings on the boundary count.
#[derive(Debug, Clone)]
pub struct BuildingIndex {
    ids: Vec<HouseId>,
    index: PointIndex,
}

impl BuildingIndex {
    pub fn new(buildings: &[Building]) -> Self {
        Self {
            ids: buildings.iter().map(|b| b.id).collect(),
            index: PointIndex::new(buildings.iter().map(|b| b.location)),
        }
    }

    #[inline] pub fn len(&self) -> usize { self.index.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.index.is_empty() }
}

impl ContainmentJoin for BuildingIndex {
    fn buildings_within(&self, layer: &IsochroneLayer) -> Reach {
        let reach = layer.iter()
            .filter_map(|(site, polygon)| {
                let houses = self.index.intersecting(polygon).into_iter()
                    .map(|i| self.ids[i])
                    .collect::<BTreeSet<_>>();
                (!houses.is_empty()).then_some((site, houses))
            })
            .collect::<Reach>();

        debug!(
            time = %layer.time(),
            sites = reach.len(),
            pairs = reach.values().map(BTreeSet::len).sum::<usize>(),
            "joined isochrones with buildings",
        );
        reach
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Point};
    use crate::types::TravelTime;

    #[test]
    fn joins_buildings_by_containment() {
        let buildings = vec![
            Building::new(HouseId(10), 5, Point::new(1.0, 1.0)),
            Building::new(HouseId(11), 5, Point::new(3.0, 3.0)),
            Building::new(HouseId(12), 5, Point::new(2.0, 0.0)), // on the boundary
            Building::new(HouseId(13), 5, Point::new(50.0, 50.0)),
        ];
        let index = BuildingIndex::new(&buildings);
        assert_eq!(index.len(), 4);

        let mut layer = IsochroneLayer::new(TravelTime::Ten);
        layer.insert(SiteId(1), polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)]);
        layer.insert(SiteId(2), polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)]);
        layer.insert(SiteId(3), polygon![(x: 20.0, y: 20.0), (x: 21.0, y: 20.0), (x: 21.0, y: 21.0)]);

        let reach = index.buildings_within(&layer);
        assert_eq!(reach[&SiteId(1)], BTreeSet::from([HouseId(10), HouseId(12)]));
        assert_eq!(reach[&SiteId(2)], BTreeSet::from([HouseId(10), HouseId(11), HouseId(12)]));
        // Empty joins are not errors; the site is simply absent.
        assert!(!reach.contains_key(&SiteId(3)));
    }

    #[test]
    fn empty_building_layer_yields_empty_reach() {
        let index = BuildingIndex::new(&[]);
        assert!(index.is_empty());

        let mut layer = IsochroneLayer::new(TravelTime::Five);
        layer.insert(SiteId(1), polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0)]);
        assert!(index.buildings_within(&layer).is_empty());
    }
}
