use serde::{Deserialize, Serialize};

use crate::{
    constants::Weight,
    graph::{EdgeIndex, Graph, NodeIndex},
    statistics::SearchStats,
};

/// Per-query edge annotations for visualisation front-ends. Kept out of the
/// graph so concurrent queries never write to shared state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeOverlay {
    /// Edges relaxed during the search, in scan order
    pub visited: Vec<EdgeIndex>,
    /// Original graph edges of the returned path
    pub on_path: Vec<EdgeIndex>,
}

#[derive(Debug, Clone, Default)]
pub struct ShortestPathResult {
    /// `None` if the target cannot be reached
    pub distance: Option<Weight>,
    /// Nodes from source to target, empty if unreachable
    pub path: Vec<NodeIndex>,
    pub settled_fwd: Vec<NodeIndex>,
    pub settled_bwd: Vec<NodeIndex>,
    /// Full distance vector of one-to-all searches
    pub distances: Option<Vec<Weight>>,
    pub overlay: Option<EdgeOverlay>,
    pub stats: SearchStats,
}

impl ShortestPathResult {
    pub(crate) fn trivial(node: NodeIndex, stats: SearchStats) -> Self {
        Self {
            distance: Some(0.0),
            path: vec![node],
            settled_fwd: vec![node],
            stats,
            ..Default::default()
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.distance.is_some()
    }

    /// Shortest distance or `+∞` if unreachable.
    pub fn weight(&self) -> Weight {
        self.distance.unwrap_or(Weight::INFINITY)
    }

    /// Number of settled nodes over both directions.
    pub fn nodes_settled(&self) -> usize {
        self.settled_fwd.len() + self.settled_bwd.len()
    }

    /// Sums the cheapest original edge between consecutive path nodes.
    /// Returns `None` if two consecutive nodes are not connected.
    pub fn path_weight(&self, graph: &Graph) -> Option<Weight> {
        let mut total = 0.0;
        for pair in self.path.windows(2) {
            let weight = graph
                .neighbors_outgoing(pair[0])
                .filter(|(edge_idx, edge)| edge.target == pair[1] && !graph.is_shortcut(*edge_idx))
                .map(|(_, edge)| edge.weight)
                .min_by(|a, b| a.total_cmp(b))?;
            total += weight;
        }
        Some(total)
    }
}

#[cfg(test)]
pub(crate) fn assert_path(
    expected_path: Vec<usize>,
    expected_weight: Weight,
    actual: ShortestPathResult,
) {
    let path: Vec<usize> = actual.path.iter().map(|n| n.index()).collect();
    assert_eq!(expected_path, path, "unexpected path");
    approx::assert_abs_diff_eq!(expected_weight, actual.weight(), epsilon = 1e-9);
}

#[cfg(test)]
pub(crate) fn assert_no_path(actual: ShortestPathResult) {
    assert_eq!(None, actual.distance);
    assert!(actual.path.is_empty());
}
