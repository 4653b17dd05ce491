//! Reads a road graph from a pair of CSV files.
//!
//! `nodes.csv` has the columns `id,lat,lon`, `edges.csv` has
//! `source,target,weight` where `source` and `target` refer to node ids.
//! Node ids may be arbitrary, they are mapped to dense indices in file order.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::info;
use route_core::{
    constants::{OsmId, Weight},
    graph::{node_index, Edge, Graph, Node},
};
use rustc_hash::FxHashMap;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    source: OsmId,
    target: OsmId,
    weight: Weight,
}

pub fn from_csv(path_to_nodes: &Path, path_to_edges: &Path) -> Result<Graph> {
    let mut nodes = Vec::new();
    let mut dense: FxHashMap<OsmId, usize> = FxHashMap::default();

    let mut reader = csv::Reader::from_path(path_to_nodes)
        .with_context(|| format!("Cannot open file `{path_to_nodes:?}`"))?;
    for (i, result) in reader.deserialize().enumerate() {
        let node: Node = result.with_context(|| format!("Failed to parse node in row {}", i + 1))?;
        if dense.insert(node.id, i).is_some() {
            return Err(anyhow!("Duplicate node id {} in row {}", node.id, i + 1));
        }
        nodes.push(node);
    }

    let lookup = |id: OsmId, row: usize| {
        dense
            .get(&id)
            .map(|idx| node_index(*idx))
            .ok_or_else(|| anyhow!("Edge in row {} refers to unknown node {}", row, id))
    };

    let mut edges = Vec::new();
    let mut reader = csv::Reader::from_path(path_to_edges)
        .with_context(|| format!("Cannot open file `{path_to_edges:?}`"))?;
    for (i, result) in reader.deserialize().enumerate() {
        let record: EdgeRecord =
            result.with_context(|| format!("Failed to parse edge in row {}", i + 1))?;
        edges.push(Edge::new(
            lookup(record.source, i + 1)?,
            lookup(record.target, i + 1)?,
            record.weight,
        ));
    }

    let g = Graph::from_parts(nodes, edges).context("Invalid graph")?;
    info!(
        "Loaded {} nodes and {} edges from {:?}",
        g.num_nodes(),
        g.num_edges(),
        path_to_nodes.parent().unwrap_or(path_to_nodes)
    );
    Ok(g)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use tempfile::TempDir;

    use super::*;

    fn write_files(nodes: &str, edges: &str) -> (TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let nodes_path = dir.path().join("nodes.csv");
        let edges_path = dir.path().join("edges.csv");
        fs::write(&nodes_path, nodes).unwrap();
        fs::write(&edges_path, edges).unwrap();
        (dir, nodes_path, edges_path)
    }

    #[test]
    fn sparse_ids_are_mapped_to_dense_indices() {
        let (_dir, nodes, edges) = write_files(
            "id,lat,lon\n100,48.1,11.5\n7,48.2,11.6\n55,48.3,11.7\n",
            "source,target,weight\n100,7,1.5\n7,55,2.0\n",
        );

        let g = from_csv(&nodes, &edges).unwrap();
        assert_eq!(3, g.num_nodes());
        assert_eq!(2, g.num_edges());

        let (_, edge) = g.neighbors_outgoing(node_index(1)).next().unwrap();
        assert_eq!(node_index(2), edge.target);
        assert_eq!(2.0, edge.weight);
        assert_eq!(7, g.node(node_index(1)).unwrap().id);
    }

    #[test]
    fn unknown_node_is_reported() {
        let (_dir, nodes, edges) = write_files(
            "id,lat,lon\n1,0.0,0.0\n",
            "source,target,weight\n1,2,1.0\n",
        );

        let err = from_csv(&nodes, &edges).unwrap_err();
        assert!(err.to_string().contains("unknown node 2"), "{err}");
    }

    #[test]
    fn negative_weight_is_rejected() {
        let (_dir, nodes, edges) = write_files(
            "id,lat,lon\n1,0.0,0.0\n2,0.0,0.0\n",
            "source,target,weight\n1,2,-1.0\n",
        );

        assert!(from_csv(&nodes, &edges).is_err());
    }
}
