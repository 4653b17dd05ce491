//! Error types of `route_core`.
use thiserror::Error;

use crate::{constants::Weight, graph::NodeIndex};

/// Violations detected while building a [`Graph`](crate::graph::Graph).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("node {node:?} is out of bounds (graph has {num_nodes} nodes)")]
    NodeOutOfBounds { node: NodeIndex, num_nodes: usize },

    #[error("edge {from:?} -> {to:?} has invalid weight {weight}")]
    InvalidWeight {
        from: NodeIndex,
        to: NodeIndex,
        weight: Weight,
    },
}

/// Preprocessing artifacts a query strategy may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Artifact {
    #[error("landmark table")]
    LandmarkTable,
    #[error("contraction hierarchy")]
    ContractionHierarchy,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("node {node:?} is out of bounds (graph has {num_nodes} nodes)")]
    NodeOutOfBounds { node: NodeIndex, num_nodes: usize },

    #[error("{0} is required by the selected algorithm but was not provided")]
    MissingArtifact(Artifact),

    #[error("{artifact} was built for {expected_nodes} nodes / {expected_edges} edges, graph has {found_nodes} / {found_edges}")]
    StaleArtifact {
        artifact: Artifact,
        expected_nodes: usize,
        expected_edges: usize,
        found_nodes: usize,
        found_edges: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreprocessError {
    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("requested {requested} landmarks but only {available} nodes are available")]
    InvalidLandmarkCount { requested: usize, available: usize },

    #[error("landmark {node:?} is out of bounds (graph has {num_nodes} nodes)")]
    LandmarkOutOfBounds { node: NodeIndex, num_nodes: usize },

    #[error("fixed contraction order has {found} nodes, graph has {expected}")]
    InvalidOrder { expected: usize, found: usize },

    #[error("preprocessing was cancelled")]
    Cancelled,

    #[error(transparent)]
    Search(#[from] SearchError),
}
