//! Shortest path queries.
//!
//! All algorithms share the loop in [`engine`]; they differ only in the
//! [`SearchStrategy`] they plug into it. The free functions below are thin
//! wrappers for the common cases, [`Router`] picks the strategy at runtime.
use log::info;

use crate::{
    error::SearchError,
    graph::{Graph, NodeIndex},
    overlay_graph::ContractionArtifacts,
};

pub mod engine;
pub mod frontier;
pub mod heuristic;
pub mod router;
pub mod shortest_path;
pub mod state;
pub mod strategy;

pub use engine::{one_to_all, search};
pub use heuristic::{Heuristic, StraightLine, ZeroHeuristic};
pub use router::{Algorithm, Router};
pub use shortest_path::{EdgeOverlay, ShortestPathResult};
pub use strategy::{
    AStarStrategy, Alternation, BidirAStarStrategy, BidirDijkstraStrategy, ChStrategy,
    DijkstraStrategy, SearchStrategy,
};

#[cfg(test)]
pub(crate) use shortest_path::{assert_no_path, assert_path};

/// What a query does when the selected algorithm needs an artifact that was not built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingArtifactPolicy {
    /// Return [`SearchError::MissingArtifact`]
    #[default]
    Fail,
    /// Log a warning and answer the query with plain Dijkstra
    FallbackToDijkstra,
}

/// Per-query options shared by all algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub alternation: Alternation,
    /// Record relaxed and on-path edges in [`ShortestPathResult::overlay`]
    pub record_edges: bool,
    pub missing_artifact: MissingArtifactPolicy,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alternation(mut self, alternation: Alternation) -> Self {
        self.alternation = alternation;
        self
    }

    pub fn record_edges(mut self, record_edges: bool) -> Self {
        self.record_edges = record_edges;
        self
    }

    pub fn missing_artifact(mut self, policy: MissingArtifactPolicy) -> Self {
        self.missing_artifact = policy;
        self
    }
}

pub fn dijkstra_search(
    graph: &Graph,
    source: NodeIndex,
    target: NodeIndex,
    options: &SearchOptions,
) -> Result<ShortestPathResult, SearchError> {
    info!("BEGIN DIJKSTRA SEARCH from {:?} to {:?}", source, target);
    search(graph, source, target, &DijkstraStrategy, options)
}

pub fn bidir_dijkstra_search(
    graph: &Graph,
    source: NodeIndex,
    target: NodeIndex,
    options: &SearchOptions,
) -> Result<ShortestPathResult, SearchError> {
    info!("BEGIN BIDIR DIJKSTRA SEARCH from {:?} to {:?}", source, target);
    let strategy = BidirDijkstraStrategy::new(options.alternation);
    search(graph, source, target, &strategy, options)
}

pub fn astar_search<H: Heuristic>(
    graph: &Graph,
    source: NodeIndex,
    target: NodeIndex,
    heuristic: H,
    options: &SearchOptions,
) -> Result<ShortestPathResult, SearchError> {
    info!("BEGIN A* SEARCH from {:?} to {:?}", source, target);
    heuristic.ensure_valid_for(graph)?;
    search(graph, source, target, &AStarStrategy::new(heuristic), options)
}

pub fn bidir_astar_search<H: Heuristic>(
    graph: &Graph,
    source: NodeIndex,
    target: NodeIndex,
    heuristic: H,
    options: &SearchOptions,
) -> Result<ShortestPathResult, SearchError> {
    info!("BEGIN BIDIR A* SEARCH from {:?} to {:?}", source, target);
    heuristic.ensure_valid_for(graph)?;
    let strategy = BidirAStarStrategy::new(heuristic, options.alternation);
    search(graph, source, target, &strategy, options)
}

/// Query on the augmented graph of a contraction hierarchy.
pub fn ch_search(
    artifacts: &ContractionArtifacts,
    source: NodeIndex,
    target: NodeIndex,
    options: &SearchOptions,
) -> Result<ShortestPathResult, SearchError> {
    info!("BEGIN CH SEARCH from {:?} to {:?}", source, target);
    let strategy = ChStrategy::new(artifacts);
    search(artifacts.graph(), source, target, &strategy, options)
}
