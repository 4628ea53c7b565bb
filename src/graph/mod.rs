mod builder;
mod graph;
mod node;

pub use builder::{max_travel_time, GraphBuilder};
pub use graph::AccessGraph;
pub use node::{BuildingNode, Node, NodeId, SiteNode};
