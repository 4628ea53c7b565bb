use std::fmt;

use serde::Serialize;

use crate::types::{AreaType, ExistenceState, FunctionalType, HouseId, Provision, SiteId};

/// Key of a node in the accessibility graph, tagged by node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum NodeId {
    Site(SiteId),
    Building(HouseId),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Site(id) => write!(f, "site:{id}"),
            NodeId::Building(id) => write!(f, "building:{id}"),
        }
    }
}

/// Attributes of a site node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteNode {
    pub id: SiteId,
    pub area_type: AreaType,
    pub area: f64,
    pub functional_type: Option<FunctionalType>,
    pub existence: ExistenceState,
    pub people_around: u64, // Population of the buildings this site serves
}

impl SiteNode {
    #[inline] pub fn is_existing(&self) -> bool { self.existence.is_existing() }
}

/// Attributes of a building node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingNode {
    pub id: HouseId,
    pub people: u32,
    pub provision: Provision, // Counts existing sites only
}

/// A node of the accessibility graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Site(SiteNode),
    Building(BuildingNode),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Site(site) => NodeId::Site(site.id),
            Node::Building(building) => NodeId::Building(building.id),
        }
    }

    pub fn as_site(&self) -> Option<&SiteNode> {
        match self {
            Node::Site(site) => Some(site),
            Node::Building(_) => None,
        }
    }

    pub fn as_building(&self) -> Option<&BuildingNode> {
        match self {
            Node::Building(building) => Some(building),
            Node::Site(_) => None,
        }
    }
}
