use std::{fs::File, path::Path};

use ahash::AHashMap;
use anyhow::{anyhow, Context, Result};
use geo::Point;
use polars::{
    frame::DataFrame,
    io::SerReader,
    prelude::{CsvReader, DataType},
};
use tracing::info;

use crate::isochrone::StreetNetwork;

/// Reads a CSV file from `path` into a Polars DataFrame.
fn read_from_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::network] Failed to open {}", path.display()))?;
    let df = CsvReader::new(file)
        .finish()
        .with_context(|| format!("[io::network] Failed to parse {}", path.display()))?;
    Ok(df)
}

/// Read a column as u64 values, rejecting nulls.
fn column_u64(df: &DataFrame, name: &str) -> Result<Vec<u64>> {
    let column = df.column(name)?.cast(&DataType::UInt64)?;
    column.u64()?.into_iter()
        .enumerate()
        .map(|(row, value)| value.ok_or_else(|| anyhow!("[io::network] Null or invalid {name:?} at row {row}")))
        .collect()
}

/// Read a column as f64 values, rejecting nulls.
fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    column.f64()?.into_iter()
        .enumerate()
        .map(|(row, value)| value.ok_or_else(|| anyhow!("[io::network] Null or invalid {name:?} at row {row}")))
        .collect()
}

/// Read a street network from a node table (`id,x,y`) and an edge table (`u,v,time`).
///
/// Edges are directed; two-way streets are expected to appear in both directions.
/// `time` is the traversal time in minutes.
pub fn read_street_network(nodes_path: &Path, edges_path: &Path) -> Result<StreetNetwork> {
    let nodes = read_from_csv(nodes_path)?;
    let ids = column_u64(&nodes, "id")?;
    let xs = column_f64(&nodes, "x")?;
    let ys = column_f64(&nodes, "y")?;

    let mut index = AHashMap::with_capacity(ids.len());
    for (i, &id) in ids.iter().enumerate() {
        if index.insert(id, i).is_some() {
            return Err(anyhow!("[io::network] Duplicate node id {id}"));
        }
    }

    let edges = read_from_csv(edges_path)?;
    let lookup = |id: u64| index.get(&id).copied()
        .ok_or_else(|| anyhow!("[io::network] Edge references unknown node {id}"));
    let list = column_u64(&edges, "u")?.into_iter()
        .zip(column_u64(&edges, "v")?)
        .zip(column_f64(&edges, "time")?)
        .map(|((u, v), time)| Ok((lookup(u)?, lookup(v)?, time)))
        .collect::<Result<Vec<_>>>()?;

    let coords = xs.into_iter().zip(ys).map(|(x, y)| Point::new(x, y)).collect();
    let network = StreetNetwork::from_edge_list(coords, &list)?;
    info!(nodes = network.node_count(), edges = network.edge_count(), "read street network");
    Ok(network)
}
