use std::{cmp::Ordering, collections::BinaryHeap};

use anyhow::{bail, Result};
use geo::Point;

use crate::geom::PointIndex;

/// A directed street network in compressed sparse row format, weighted by travel minutes.
#[derive(Debug)]
pub struct StreetNetwork {
    size: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    edge_weights: Vec<f64>,
    coords: Vec<Point<f64>>,
    index: PointIndex,
}

impl StreetNetwork {
    /// Construct a network from node coordinates and per-node outgoing adjacency lists.
    pub(crate) fn new(coords: Vec<Point<f64>>, edges: &[Vec<u32>], edge_weights: &[Vec<f64>]) -> Self {
        let num_nodes = coords.len();
        assert!(edges.len() == num_nodes, "edges.len() must equal coords.len()");
        assert!(edge_weights.len() == num_nodes, "edge_weights.len() must equal coords.len()");
        edges.iter().zip(edge_weights.iter()).enumerate().for_each(|(i, (edges, weights))| {
            assert!(edges.len() == weights.len(), "edges[{i}].len() must equal edge_weights[{i}].len()");
        });

        Self {
            size: num_nodes,
            offsets: std::iter::once(0u32).chain(
                edges.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            edges: edges.iter().flatten().copied().collect(),
            edge_weights: edge_weights.iter().flatten().copied().collect(),
            index: PointIndex::new(coords.iter().copied()),
            coords,
        }
    }

    /// Construct a network from `(source, target, minutes)` triples over node indices.
    pub fn from_edge_list(coords: Vec<Point<f64>>, list: &[(usize, usize, f64)]) -> Result<Self> {
        let mut edges = vec![Vec::new(); coords.len()];
        let mut weights = vec![Vec::new(); coords.len()];
        for &(u, v, minutes) in list {
            if u >= coords.len() || v >= coords.len() {
                bail!("[network] Edge ({u}, {v}) references a node outside 0..{}", coords.len());
            }
            if !minutes.is_finite() || minutes < 0.0 {
                bail!("[network] Edge ({u}, {v}) has invalid travel time {minutes}");
            }
            edges[u].push(v as u32);
            weights[u].push(minutes);
        }
        Ok(Self::new(coords, &edges, &weights))
    }

    /// Get the number of nodes in the network.
    #[inline] pub fn node_count(&self) -> usize { self.size }

    /// Get the number of directed edges in the network.
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Get the location of a node.
    #[inline] pub fn coord(&self, node: usize) -> Point<f64> { self.coords[node] }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the out-degree of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get an iterator over the successors and edge minutes of a given node.
    #[inline]
    pub fn edges_with_weights(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.range(node).map(move |v| (self.edges[v] as usize, self.edge_weights[v]))
    }

    /// Find the node closest to a point.
    #[inline]
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<usize> { self.index.nearest(point) }

    /// All nodes whose shortest travel time from `source` is at most `radius` minutes,
    /// including `source` itself, in ascending node order.
    pub fn reachable_within(&self, source: usize, radius: f64) -> Vec<usize> {
        // Min-heap entry keyed on travel time.
        #[derive(Copy, Clone, PartialEq)]
        struct Entry {
            time: f64,
            node: usize,
        }

        impl Eq for Entry {}

        impl Ord for Entry {
            fn cmp(&self, other: &Self) -> Ordering {
                // Reverse so the shortest time pops first.
                other.time.total_cmp(&self.time)
                    .then_with(|| other.node.cmp(&self.node))
            }
        }

        impl PartialOrd for Entry {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
        }

        let mut best = vec![f64::INFINITY; self.size];
        let mut heap = BinaryHeap::new();
        best[source] = 0.0;
        heap.push(Entry { time: 0.0, node: source });

        while let Some(Entry { time, node }) = heap.pop() {
            if time > best[node] { continue }
            for (next, minutes) in self.edges_with_weights(node) {
                let candidate = time + minutes;
                if candidate <= radius && candidate < best[next] {
                    best[next] = candidate;
                    heap.push(Entry { time: candidate, node: next });
                }
            }
        }

        (0..self.size).filter(|&node| best[node] <= radius).collect()
    }
}
