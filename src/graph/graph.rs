use std::collections::BTreeMap;

use crate::{
    graph::{BuildingNode, Node, NodeId, SiteNode},
    types::{HouseId, SiteId, TravelTime},
};

/// An undirected bipartite graph of sites and buildings, weighted by travel time.
///
/// Every edge joins one site to one building; there is at most one edge per pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessGraph {
    nodes: BTreeMap<NodeId, Node>,
    adjacency: BTreeMap<NodeId, BTreeMap<NodeId, TravelTime>>,
}

impl AccessGraph {
    /// Get the number of nodes in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Get the number of (undirected) edges in the graph.
    #[inline]
    pub fn edge_count(&self) -> usize { self.adjacency.values().map(BTreeMap::len).sum::<usize>() / 2 }

    #[inline] pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    #[inline] pub fn contains(&self, id: NodeId) -> bool { self.nodes.contains_key(&id) }

    /// Get a node by id.
    #[inline] pub fn node(&self, id: NodeId) -> Option<&Node> { self.nodes.get(&id) }

    /// Iterate over all nodes, sites first, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> { self.nodes.values() }

    /// Get a site node by id.
    #[inline]
    pub fn site(&self, id: SiteId) -> Option<&SiteNode> { self.node(NodeId::Site(id)).and_then(Node::as_site) }

    /// Get a building node by id.
    #[inline]
    pub fn building(&self, id: HouseId) -> Option<&BuildingNode> {
        self.node(NodeId::Building(id)).and_then(Node::as_building)
    }

    /// Iterate over site nodes in id order.
    pub fn sites(&self) -> impl Iterator<Item = &SiteNode> { self.nodes.values().filter_map(Node::as_site) }

    /// Iterate over building nodes in id order.
    pub fn buildings(&self) -> impl Iterator<Item = &BuildingNode> {
        self.nodes.values().filter_map(Node::as_building)
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline]
    pub fn degree(&self, id: NodeId) -> usize { self.adjacency.get(&id).map_or(0, BTreeMap::len) }

    /// Get an iterator over the neighbors and edge times of a given node.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, TravelTime)> + '_ {
        self.adjacency.get(&id).into_iter().flatten().map(|(&n, &t)| (n, t))
    }

    /// Get the buildings served by a site, with edge times.
    pub fn site_neighbors(&self, id: SiteId) -> impl Iterator<Item = (HouseId, TravelTime)> + '_ {
        self.neighbors(NodeId::Site(id)).filter_map(|(n, t)| match n {
            NodeId::Building(house) => Some((house, t)),
            NodeId::Site(_) => None,
        })
    }

    /// Get the sites serving a building, with edge times.
    pub fn building_neighbors(&self, id: HouseId) -> impl Iterator<Item = (SiteId, TravelTime)> + '_ {
        self.neighbors(NodeId::Building(id)).filter_map(|(n, t)| match n {
            NodeId::Site(site) => Some((site, t)),
            NodeId::Building(_) => None,
        })
    }

    /// Get the travel time of the edge between a site and a building.
    #[inline]
    pub fn edge(&self, site: SiteId, house: HouseId) -> Option<TravelTime> {
        self.adjacency.get(&NodeId::Site(site))?.get(&NodeId::Building(house)).copied()
    }

    /// Iterate over all edges as (site, building, time), in site order.
    pub fn edges(&self) -> impl Iterator<Item = (SiteId, HouseId, TravelTime)> + '_ {
        self.sites().flat_map(move |site| {
            self.site_neighbors(site.id).map(move |(house, time)| (site.id, house, time))
        })
    }

    /// Insert or replace a node.
    pub(crate) fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id(), node);
    }

    /// Get mutable access to a node.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> { self.nodes.get_mut(&id) }

    /// Add an edge or overwrite its time.
    pub(crate) fn set_edge(&mut self, site: SiteId, house: HouseId, time: TravelTime) {
        let (s, b) = (NodeId::Site(site), NodeId::Building(house));
        self.adjacency.entry(s).or_default().insert(b, time);
        self.adjacency.entry(b).or_default().insert(s, time);
    }

    /// Remove an edge, leaving both endpoints in place.
    pub(crate) fn remove_edge(&mut self, site: SiteId, house: HouseId) -> Option<TravelTime> {
        let (s, b) = (NodeId::Site(site), NodeId::Building(house));
        self.adjacency.get_mut(&b).and_then(|adj| adj.remove(&s));
        self.adjacency.get_mut(&s).and_then(|adj| adj.remove(&b))
    }

    /// Ids of every node with an adjacency entry, whether or not its attributes are attached.
    pub(crate) fn adjacency_ids(&self) -> impl Iterator<Item = NodeId> + '_ { self.adjacency.keys().copied() }

    /// Remove a node and its incident edges.
    pub(crate) fn remove_node(&mut self, id: NodeId) {
        if let Some(neighbors) = self.adjacency.remove(&id) {
            for neighbor in neighbors.keys() {
                if let Some(adj) = self.adjacency.get_mut(neighbor) { adj.remove(&id); }
            }
        }
        self.nodes.remove(&id);
    }
}
