use ahash::AHashMap;
use tracing::{debug, info};

use crate::{
    error::{AccessError, AccessResult},
    graph::{AccessGraph, BuildingNode, Node, NodeId, SiteNode},
    isochrone::IsochroneSet,
    join::{ContainmentJoin, Reach},
    types::{AreaType, Building, HouseId, Provision, Site, SiteId, TravelTime},
};

/// Longest travel time that still counts toward accessibility for a site of this size.
#[inline]
pub fn max_travel_time(area_type: AreaType) -> TravelTime {
    match area_type {
        AreaType::Small => TravelTime::Five,
        AreaType::Medium => TravelTime::Ten,
        AreaType::Large => TravelTime::Twenty,
    }
}

/// Builds accessibility graphs from the site and building layers.
///
/// Building is a pure function of its inputs: the builder holds only lookups into the
/// layers, and every call to [`GraphBuilder::build`] returns a fresh graph.
#[derive(Debug)]
pub struct GraphBuilder<'a> {
    sites: AHashMap<SiteId, &'a Site>,
    buildings: AHashMap<HouseId, &'a Building>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(sites: &'a [Site], buildings: &'a [Building]) -> Self {
        Self {
            sites: sites.iter().map(|site| (site.id, site)).collect(),
            buildings: buildings.iter().map(|building| (building.id, building)).collect(),
        }
    }

    /// Join each isochrone layer with the buildings (in parallel) and build the graph.
    pub fn build_from_isochrones(&self, join: &dyn ContainmentJoin, isochrones: &IsochroneSet) -> AccessResult<AccessGraph> {
        let (reach_5, (reach_10, reach_20)) = rayon::join(
            || join.buildings_within(isochrones.get(TravelTime::Five)),
            || rayon::join(
                || join.buildings_within(isochrones.get(TravelTime::Ten)),
                || join.buildings_within(isochrones.get(TravelTime::Twenty)),
            ),
        );
        self.build(&reach_5, &reach_10, &reach_20)
    }

    /// Build the graph from the containment mappings of the three budgets.
    ///
    /// Edges come from the 20-minute mapping and are then overwritten by the 10- and
    /// 5-minute mappings, so each edge carries the shortest budget reaching the pair.
    /// Edges beyond a site's size limit are pruned, isolated nodes dropped, and
    /// existing sites counted into their buildings' provisioning.
    pub fn build(&self, reach_5: &Reach, reach_10: &Reach, reach_20: &Reach) -> AccessResult<AccessGraph> {
        let mut graph = AccessGraph::default();

        // 1. Skeleton from the 20-minute mapping.
        for (&site, houses) in reach_20 {
            for &house in houses { graph.set_edge(site, house, TravelTime::Twenty) }
        }

        // 2. Attach attributes; every referenced id must exist in its layer.
        for id in graph.adjacency_ids().collect::<Vec<_>>() {
            graph.insert_node(self.node(id)?);
        }

        // 3. Overwrite with shorter budgets, 10 then 5.
        for (time, reach) in [(TravelTime::Ten, reach_10), (TravelTime::Five, reach_5)] {
            for (&site, houses) in reach {
                for &house in houses {
                    if graph.edge(site, house).is_none() {
                        return Err(AccessError::NotNested { site, house, time });
                    }
                    graph.set_edge(site, house, time);
                }
            }
        }
        debug!(nodes = graph.node_count(), edges = graph.edge_count(), "assembled edges");

        // 4. Size-dependent pruning.
        let pruned = prune(&mut graph);

        // 5. Population served by each site.
        let people_around = graph.sites()
            .map(|site| {
                let people = graph.site_neighbors(site.id)
                    .filter_map(|(house, _)| graph.building(house))
                    .map(|building| building.people as u64)
                    .sum::<u64>();
                (site.id, people)
            })
            .collect::<Vec<_>>();
        for (site, people) in people_around {
            if let Some(Node::Site(node)) = graph.node_mut(NodeId::Site(site)) { node.people_around = people }
        }

        // 6. Drop isolated nodes.
        let isolated = graph.nodes()
            .map(Node::id)
            .filter(|&id| graph.degree(id) == 0)
            .collect::<Vec<_>>();
        for &id in &isolated { graph.remove_node(id) }

        // 7. Provisioning from existing sites only.
        let view = &graph;
        let contributions = view.sites()
            .filter(|site| site.is_existing())
            .filter_map(|site| site.functional_type.map(|ty| (site.id, ty)))
            .flat_map(|(site, ty)| view.site_neighbors(site).map(move |(house, _)| (house, ty)))
            .collect::<Vec<_>>();
        for (house, ty) in contributions {
            if let Some(Node::Building(node)) = graph.node_mut(NodeId::Building(house)) { node.provision.increment(ty) }
        }

        info!(
            sites = graph.sites().count(),
            buildings = graph.buildings().count(),
            edges = graph.edge_count(),
            pruned,
            dropped = isolated.len(),
            "built accessibility graph",
        );
        Ok(graph)
    }

    /// Node with attributes copied from the source layers.
    fn node(&self, id: NodeId) -> AccessResult<Node> {
        Ok(match id {
            NodeId::Site(id) => {
                let site = self.sites.get(&id).ok_or(AccessError::MissingSite(id))?;
                Node::Site(SiteNode {
                    id,
                    area_type: site.area_type,
                    area: site.area,
                    functional_type: site.functional_type,
                    existence: site.existence,
                    people_around: 0,
                })
            }
            NodeId::Building(id) => {
                let building = self.buildings.get(&id).ok_or(AccessError::MissingBuilding(id))?;
                Node::Building(BuildingNode { id, people: building.people, provision: Provision::default() })
            }
        })
    }
}

/// Remove edges longer than each site's size allows; returns the number removed.
fn prune(graph: &mut AccessGraph) -> usize {
    let view: &AccessGraph = graph;
    let to_remove = view.sites()
        .flat_map(|site| {
            let limit = max_travel_time(site.area_type);
            view.site_neighbors(site.id)
                .filter(move |&(_, time)| time > limit)
                .map(move |(house, _)| (site.id, house))
        })
        .collect::<Vec<_>>();

    for &(site, house) in &to_remove { graph.remove_edge(site, house); }
    to_remove.len()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use geo::{MultiPolygon, Point};
    use crate::types::{ExistenceState, FunctionalType};

    fn site(id: u64, area_type: AreaType, ty: Option<FunctionalType>, existence: ExistenceState) -> Site {
        let mut site = Site::new(SiteId(id), 100.0, area_type, MultiPolygon::new(vec![]));
        site.functional_type = ty;
        site.existence = existence;
        site
    }

    fn house(id: u64, people: u32) -> Building { Building::new(HouseId(id), people, Point::new(0.0, 0.0)) }

    fn reach(pairs: &[(u64, u64)]) -> Reach {
        let mut reach = Reach::new();
        for &(site, house) in pairs {
            reach.entry(SiteId(site)).or_insert_with(BTreeSet::new).insert(HouseId(house));
        }
        reach
    }

    #[test]
    fn shortest_budget_wins() {
        let sites = [site(1, AreaType::Large, None, ExistenceState::Potential)];
        let buildings = [house(1, 10), house(2, 10), house(3, 10)];
        let graph = GraphBuilder::new(&sites, &buildings).build(
            &reach(&[(1, 1)]),
            &reach(&[(1, 1), (1, 2)]),
            &reach(&[(1, 1), (1, 2), (1, 3)]),
        ).unwrap();

        assert_eq!(graph.edge(SiteId(1), HouseId(1)), Some(TravelTime::Five));
        assert_eq!(graph.edge(SiteId(1), HouseId(2)), Some(TravelTime::Ten));
        assert_eq!(graph.edge(SiteId(1), HouseId(3)), Some(TravelTime::Twenty));
    }

    #[test]
    fn pruning_depends_on_area_type() {
        let sites = [
            site(1, AreaType::Small, None, ExistenceState::Potential),
            site(2, AreaType::Medium, None, ExistenceState::Potential),
            site(3, AreaType::Large, None, ExistenceState::Potential),
        ];
        let buildings = [house(1, 1), house(2, 1), house(3, 1)];
        let all = [(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3), (3, 1), (3, 2), (3, 3)];
        let graph = GraphBuilder::new(&sites, &buildings).build(
            &reach(&[(1, 1), (2, 1), (3, 1)]),
            &reach(&[(1, 1), (1, 2), (2, 1), (2, 2), (3, 1), (3, 2)]),
            &reach(&all),
        ).unwrap();

        let times = |s| graph.site_neighbors(SiteId(s)).map(|(_, t)| t.minutes()).collect::<Vec<_>>();
        assert_eq!(times(1), vec![5]);
        assert_eq!(times(2), vec![5, 10]);
        assert_eq!(times(3), vec![5, 10, 20]);
        assert_eq!(max_travel_time(AreaType::Medium), TravelTime::Ten);
    }

    #[test]
    fn people_around_counts_surviving_neighbors() {
        let sites = [site(1, AreaType::Small, None, ExistenceState::Potential)];
        let buildings = [house(1, 30), house(2, 70)];
        let graph = GraphBuilder::new(&sites, &buildings).build(
            &reach(&[(1, 1)]),
            &reach(&[(1, 1)]),
            &reach(&[(1, 1), (1, 2)]),
        ).unwrap();

        assert_eq!(graph.site(SiteId(1)).unwrap().people_around, 30);
        // Building 2 lost its only edge to pruning and is dropped.
        assert!(graph.building(HouseId(2)).is_none());
    }

    #[test]
    fn isolated_sites_are_dropped() {
        let sites = [
            site(1, AreaType::Small, Some(FunctionalType::Event), ExistenceState::Existing),
            site(2, AreaType::Large, None, ExistenceState::Potential),
        ];
        let buildings = [house(1, 5)];
        let graph = GraphBuilder::new(&sites, &buildings).build(
            &Reach::new(),
            &reach(&[(1, 1)]),
            &reach(&[(1, 1), (2, 1)]),
        ).unwrap();

        assert!(graph.site(SiteId(1)).is_none());
        assert_eq!(graph.node_count(), 2);
        for node in graph.nodes() { assert!(graph.degree(node.id()) >= 1) }
        // The dropped existing site contributes nothing.
        assert_eq!(graph.building(HouseId(1)).unwrap().provision, Provision::default());
    }

    #[test]
    fn only_existing_sites_provision() {
        let sites = [
            site(1, AreaType::Large, Some(FunctionalType::Sports), ExistenceState::Existing),
            site(2, AreaType::Large, Some(FunctionalType::Event), ExistenceState::Potential),
            site(3, AreaType::Large, Some(FunctionalType::Sports), ExistenceState::Existing),
            site(4, AreaType::Large, None, ExistenceState::Existing),
        ];
        let buildings = [house(1, 5)];
        let pairs = reach(&[(1, 1), (2, 1), (3, 1), (4, 1)]);
        let graph = GraphBuilder::new(&sites, &buildings).build(&pairs, &pairs, &pairs).unwrap();

        let provision = graph.building(HouseId(1)).unwrap().provision;
        assert_eq!(provision, Provision { ev: 0, mf: 0, ed: 0, sp: 2 });
    }

    #[test]
    fn missing_records_fail_fast() {
        let sites = [site(1, AreaType::Large, None, ExistenceState::Potential)];
        let buildings = [house(1, 5)];
        let builder = GraphBuilder::new(&sites, &buildings);

        let empty = Reach::new();
        assert_eq!(
            builder.build(&empty, &empty, &reach(&[(1, 1), (9, 1)])),
            Err(AccessError::MissingSite(SiteId(9))),
        );
        assert_eq!(
            builder.build(&empty, &empty, &reach(&[(1, 7)])),
            Err(AccessError::MissingBuilding(HouseId(7))),
        );
    }

    #[test]
    fn shorter_budget_outside_skeleton_is_rejected() {
        let sites = [site(1, AreaType::Large, None, ExistenceState::Potential)];
        let buildings = [house(1, 5), house(2, 5)];
        let result = GraphBuilder::new(&sites, &buildings).build(
            &reach(&[(1, 2)]),
            &Reach::new(),
            &reach(&[(1, 1)]),
        );
        assert_eq!(result, Err(AccessError::NotNested { site: SiteId(1), house: HouseId(2), time: TravelTime::Five }));
    }

    #[test]
    fn building_twice_gives_identical_graphs() {
        let sites = [site(1, AreaType::Medium, Some(FunctionalType::Educational), ExistenceState::Existing)];
        let buildings = [house(1, 5), house(2, 6)];
        let builder = GraphBuilder::new(&sites, &buildings);
        let (r5, r10, r20) = (reach(&[(1, 1)]), reach(&[(1, 1), (1, 2)]), reach(&[(1, 1), (1, 2)]));

        assert_eq!(builder.build(&r5, &r10, &r20).unwrap(), builder.build(&r5, &r10, &r20).unwrap());
    }

    #[test]
    fn empty_mappings_give_empty_graph() {
        let empty = Reach::new();
        let graph = GraphBuilder::new(&[], &[]).build(&empty, &empty, &empty).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }
}
