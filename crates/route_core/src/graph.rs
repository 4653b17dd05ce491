use crate::{
    constants::{OsmId, Weight},
    error::{Artifact, GraphError, SearchError},
};
use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash, sync::OnceLock};

/// Default integer typer for node and edge indices
/// Needs to be increased vor very large graphs > u32::max
pub type DefaultIdx = u32;

pub trait IndexType: Copy + Default + Hash + Ord + fmt::Debug {
    fn new(idx: usize) -> Self;
    fn index(&self) -> usize;
    fn max() -> Self;
}

impl IndexType for u32 {
    #[inline(always)]
    fn new(x: usize) -> Self {
        x as u32
    }
    #[inline(always)]
    fn index(&self) -> usize {
        *self as usize
    }
    #[inline(always)]
    fn max() -> Self {
        u32::MAX
    }
}

/// Node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct NodeIndex<Idx = DefaultIdx>(Idx);

impl NodeIndex {
    #[inline]
    pub fn new(x: usize) -> Self {
        NodeIndex(IndexType::new(x))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0.index()
    }

    #[inline]
    pub fn end() -> Self {
        NodeIndex(IndexType::max())
    }
}

impl<Idx: IndexType> From<Idx> for NodeIndex<Idx> {
    fn from(ix: Idx) -> Self {
        NodeIndex(ix)
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Short version of `NodeIndex::new`
pub fn node_index(index: usize) -> NodeIndex {
    NodeIndex::new(index)
}

/// Edge identifier.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash, Deserialize, Serialize,
)]
pub struct EdgeIndex<Idx = DefaultIdx>(Idx);

impl<Idx: IndexType> From<Idx> for EdgeIndex<Idx> {
    fn from(ix: Idx) -> Self {
        EdgeIndex(ix)
    }
}

impl<Idx: IndexType> EdgeIndex<Idx> {
    #[inline]
    pub fn new(x: usize) -> Self {
        EdgeIndex(IndexType::new(x))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0.index()
    }

    /// An invalid `EdgeIndex` used to denote absence of an edge, for example
    /// to end an adjacency list.
    #[inline]
    pub fn end() -> Self {
        EdgeIndex(IndexType::max())
    }
}

/// Search direction. Backward searches run on the reverse graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Represents OSM Node type (https://wiki.openstreetmap.org/wiki/Node)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Node {
    pub id: OsmId,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    pub fn new(id: OsmId, lat: f64, lon: f64) -> Self {
        Node { id, lat, lon }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Edge<Idx = DefaultIdx> {
    pub source: NodeIndex<Idx>,
    pub target: NodeIndex<Idx>,
    pub weight: Weight,
}

impl Edge {
    pub fn new(
        source: NodeIndex<DefaultIdx>,
        target: NodeIndex<DefaultIdx>,
        weight: Weight,
    ) -> Self {
        Edge {
            source,
            target,
            weight,
        }
    }
}

/// A single edge seen from the node it is scanned from. `head` is the target
/// for forward scans and the source for backward scans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hop {
    pub edge: EdgeIndex,
    pub head: NodeIndex,
    pub weight: Weight,
}

/// Directed, weighted road graph.
///
/// Shortcut edges added by the contraction are always appended after the
/// original edges, so `edges[..edges.len() - num_shortcuts]` are the input edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) edges_out: Vec<Vec<EdgeIndex>>,
    /// Reverse adjacency, built on first use and dropped on every mutation.
    #[serde(skip)]
    edges_in: OnceLock<Vec<Vec<EdgeIndex>>>,
    pub num_shortcuts: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(num_nodes: usize, num_edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(num_nodes),
            edges: Vec::with_capacity(num_edges),
            edges_out: Vec::with_capacity(num_nodes),
            ..Default::default()
        }
    }

    /// Builds a graph from a node list and an edge list, validating every edge.
    pub fn from_parts(
        nodes: Vec<Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, GraphError> {
        let edges = edges.into_iter();
        let mut g = Graph::with_capacity(nodes.len(), edges.size_hint().0);
        for node in nodes {
            g.add_node(node);
        }
        for edge in edges {
            g.add_edge(edge)?;
        }

        info!(
            "Graph has {} nodes and {} edges",
            g.num_nodes(),
            g.num_edges()
        );
        Ok(g)
    }

    /// Add a new `edge` to the graph.
    ///
    /// Fails if the source or target node does not exist or if the weight is
    /// negative, infinite or NaN.
    ///
    /// Returns the index of the new created edge.
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeIndex, GraphError> {
        for node in [edge.source, edge.target] {
            if node.index() >= self.nodes.len() {
                return Err(GraphError::NodeOutOfBounds {
                    node,
                    num_nodes: self.nodes.len(),
                });
            }
        }

        if !edge.weight.is_finite() || edge.weight < 0.0 {
            return Err(GraphError::InvalidWeight {
                from: edge.source,
                to: edge.target,
                weight: edge.weight,
            });
        }

        Ok(self.push_edge(edge))
    }

    pub fn add_edges(&mut self, edges: Vec<Edge>) -> Result<(), GraphError> {
        for edge in edges {
            self.add_edge(edge)?;
        }
        Ok(())
    }

    /// Appends a shortcut edge. The caller guarantees valid endpoints and weight.
    pub(crate) fn add_shortcut(&mut self, edge: Edge) -> EdgeIndex {
        self.num_shortcuts += 1;
        self.push_edge(edge)
    }

    pub(crate) fn set_weight(&mut self, edge_idx: EdgeIndex, weight: Weight) {
        self.edges[edge_idx.index()].weight = weight;
    }

    fn push_edge(&mut self, edge: Edge) -> EdgeIndex {
        let edge_idx = EdgeIndex::new(self.edges.len());

        assert!(
            EdgeIndex::end() != edge_idx,
            "Maximum number of edges for index type {} exceeded",
            std::any::type_name::<DefaultIdx>()
        );

        self.edges_out[edge.source.index()].push(edge_idx);
        self.edges.push(edge);
        self.edges_in.take();

        edge_idx
    }

    /// Adds a new node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        let node_idx: NodeIndex = NodeIndex::new(self.nodes.len());

        assert!(
            NodeIndex::end() != node_idx,
            "Maximum number of nodes for index type {} exceeded",
            std::any::type_name::<DefaultIdx>()
        );

        // Create new entry in adjacency list for new node
        self.edges_out.push(Vec::new());
        self.nodes.push(node);
        self.edges_in.take();

        node_idx
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges including shortcuts
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_original_edges(&self) -> usize {
        self.edges.len() - self.num_shortcuts
    }

    /// Fails with [`SearchError::StaleArtifact`] unless `built_for` is this
    /// graph's node and original edge count.
    pub fn ensure_built_for(
        &self,
        artifact: Artifact,
        built_for: (usize, usize),
    ) -> Result<(), SearchError> {
        let (nodes, edges) = built_for;
        if nodes == self.num_nodes() && edges == self.num_original_edges() {
            return Ok(());
        }
        Err(SearchError::StaleArtifact {
            artifact,
            expected_nodes: nodes,
            expected_edges: edges,
            found_nodes: self.num_nodes(),
            found_edges: self.num_original_edges(),
        })
    }

    pub fn contains(&self, node_idx: NodeIndex) -> bool {
        node_idx.index() < self.nodes.len()
    }

    pub fn is_shortcut(&self, edge_idx: EdgeIndex) -> bool {
        edge_idx.index() >= self.num_original_edges()
    }

    pub fn node(&self, node_idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(node_idx.index())
    }

    pub fn edge(&self, edge_idx: EdgeIndex) -> &Edge {
        &self.edges[edge_idx.index()]
    }

    /// Returns an iterator over all nodes of the graph
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns an iterator over all edges of the graph
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> {
        (0..self.edges.len()).map(EdgeIndex::new)
    }

    pub fn out_degree(&self, node_idx: NodeIndex) -> usize {
        self.edges_out[node_idx.index()].len()
    }

    pub fn in_degree(&self, node_idx: NodeIndex) -> usize {
        self.reverse_adjacency()[node_idx.index()].len()
    }

    pub fn neighbors_outgoing(
        &self,
        node_idx: NodeIndex,
    ) -> impl Iterator<Item = (EdgeIndex, &Edge)> + '_ {
        self.edges_out[node_idx.index()]
            .iter()
            .map(|edge_idx| (*edge_idx, &self.edges[edge_idx.index()]))
    }

    pub fn neighbors_incoming(
        &self,
        node_idx: NodeIndex,
    ) -> impl Iterator<Item = (EdgeIndex, &Edge)> + '_ {
        self.reverse_adjacency()[node_idx.index()]
            .iter()
            .map(|edge_idx| (*edge_idx, &self.edges[edge_idx.index()]))
    }

    /// Edges scanned from `node_idx` in the given direction.
    pub fn hops(&self, node_idx: NodeIndex, dir: Direction) -> impl Iterator<Item = Hop> + '_ {
        let list = match dir {
            Direction::Forward => &self.edges_out[node_idx.index()],
            Direction::Backward => &self.reverse_adjacency()[node_idx.index()],
        };

        list.iter().map(move |edge_idx| {
            let edge = &self.edges[edge_idx.index()];
            Hop {
                edge: *edge_idx,
                head: match dir {
                    Direction::Forward => edge.target,
                    Direction::Backward => edge.source,
                },
                weight: edge.weight,
            }
        })
    }

    /// Reverse adjacency view: for every node the indices of its incoming edges.
    pub fn reverse_adjacency(&self) -> &[Vec<EdgeIndex>] {
        self.edges_in.get_or_init(|| {
            debug!("Building reverse adjacency for {} nodes", self.nodes.len());
            let mut edges_in = vec![Vec::new(); self.nodes.len()];
            for (i, edge) in self.edges.iter().enumerate() {
                edges_in[edge.target.index()].push(EdgeIndex::new(i));
            }
            edges_in
        })
    }

    /// Keeps only the cheapest edge per (source, target) pair and drops self-loops.
    ///
    /// Must run before shortcuts are added. Returns the number of removed edges.
    pub fn remove_duplicate_edges(&mut self) -> usize {
        if self.num_shortcuts > 0 {
            warn!("Graph already contains shortcuts, skipping duplicate removal");
            return 0;
        }

        let mut cheapest: FxHashMap<(NodeIndex, NodeIndex), usize> = FxHashMap::default();
        let mut kept: Vec<Edge> = Vec::with_capacity(self.edges.len());

        for edge in self.edges.drain(..) {
            if edge.source == edge.target {
                continue;
            }

            match cheapest.get(&(edge.source, edge.target)) {
                Some(&pos) => {
                    if edge.weight < kept[pos].weight {
                        kept[pos].weight = edge.weight;
                    }
                }
                None => {
                    cheapest.insert((edge.source, edge.target), kept.len());
                    kept.push(edge);
                }
            }
        }

        let num_before = self.edges_out.iter().map(Vec::len).sum::<usize>();
        for list in self.edges_out.iter_mut() {
            list.clear();
        }
        self.edges_in.take();

        for edge in kept {
            self.push_edge(edge);
        }

        let removed = num_before - self.edges.len();
        debug!("Removed {} parallel edges and self-loops", removed);
        removed
    }

    pub fn print_info(&self) {
        println!(
            "Graph:\t#Nodes: {}, #Edges: {}, #Shortcuts: {}",
            self.nodes.len(),
            self.num_original_edges(),
            self.num_shortcuts
        );
    }
}

/// Macro to create a edge from source to target with a weight
///
/// edge!(0 , 1, 3.0) Returns edge in both directions
///
/// edge!(0 => 1, 3.0) Returns directed edge
#[macro_export]
macro_rules! edge {
    ($source:expr => $target:expr, $weight:expr) => {
        $crate::graph::Edge::new($source.into(), $target.into(), $weight)
    };
    ($source:expr , $target:expr, $weight:expr) => {
        vec![
            $crate::graph::Edge::new($source.into(), $target.into(), $weight),
            $crate::graph::Edge::new($target.into(), $source.into(), $weight),
        ]
    };
}

/// Macro to create a node with a given id, lat, lon
/// node!(0, 1.0, 1.0)
#[macro_export]
macro_rules! node {
    ($id:expr, $lat:expr, $lon:expr) => {
        $crate::graph::Node::new($id.into(), $lat, $lon)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_nodes(n: usize) -> Graph {
        let mut g = Graph::new();
        for i in 0..n {
            g.add_node(Node::new(i, 0.0, 0.0));
        }
        g
    }

    #[test]
    fn add_edge_rejects_invalid_weights() {
        let mut g = graph_with_nodes(2);
        let a = node_index(0);
        let b = node_index(1);

        assert!(matches!(
            g.add_edge(edge!(a => b, -1.0)),
            Err(GraphError::InvalidWeight { .. })
        ));
        assert!(matches!(
            g.add_edge(edge!(a => b, f64::NAN)),
            Err(GraphError::InvalidWeight { .. })
        ));
        assert!(g.add_edge(edge!(a => b, 0.0)).is_ok());
        assert_eq!(g.num_edges(), 1);
    }

    #[test]
    fn add_edge_rejects_unknown_nodes() {
        let mut g = graph_with_nodes(2);

        let res = g.add_edge(edge!(node_index(0) => node_index(5), 1.0));
        assert_eq!(
            res,
            Err(GraphError::NodeOutOfBounds {
                node: node_index(5),
                num_nodes: 2
            })
        );
    }

    #[test]
    fn reverse_adjacency_is_rebuilt_after_mutation() {
        let mut g = graph_with_nodes(3);
        g.add_edge(edge!(node_index(0) => node_index(2), 1.0)).unwrap();

        assert_eq!(g.in_degree(node_index(2)), 1);

        g.add_edge(edge!(node_index(1) => node_index(2), 1.0)).unwrap();
        assert_eq!(g.in_degree(node_index(2)), 2);

        let sources: Vec<_> = g
            .hops(node_index(2), Direction::Backward)
            .map(|hop| hop.head)
            .collect();
        assert_eq!(sources, vec![node_index(0), node_index(1)]);
    }

    #[test]
    fn remove_duplicate_edges() {
        let mut g = graph_with_nodes(3);
        let a = node_index(0);
        let b = node_index(1);
        let c = node_index(2);

        g.add_edge(edge!(a => b, 2.0)).unwrap();
        g.add_edge(edge!(a => b, 1.0)).unwrap();
        g.add_edge(edge!(a => b, 3.0)).unwrap();
        g.add_edge(edge!(b => b, 1.0)).unwrap();
        g.add_edge(edge!(b => c, 1.0)).unwrap();

        assert_eq!(g.remove_duplicate_edges(), 3);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.out_degree(a), 1);
        assert_eq!(g.neighbors_outgoing(a).next().unwrap().1.weight, 1.0);
        assert_eq!(g.in_degree(b), 1);
    }
}
