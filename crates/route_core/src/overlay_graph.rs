use std::fmt::Display;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    constants::Weight,
    graph::{Edge, EdgeIndex, Graph, NodeIndex},
    statistics::ContractionStats,
};

/// Shortcut edge inserted while contracting `middle`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shortcut {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub middle: NodeIndex,
    /// `source -> middle` and `middle -> target`, either may be a shortcut itself
    pub replaces: [EdgeIndex; 2],
}

/// Result of
///     - NodeContractor::run
///     - NodeContractor::run_with_order
///
/// Holds the graph augmented with shortcuts, the contraction rank of every
/// node and the index needed to unpack shortcuts. CH queries run on this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractionArtifacts {
    graph: Graph,
    ranks: Vec<usize>,
    shortcuts: FxHashMap<EdgeIndex, Shortcut>,
    /// Node and edge count of the input graph before the cleanup pass
    built_for: (usize, usize),
    #[serde(skip)]
    stats: ContractionStats,
}

impl ContractionArtifacts {
    pub(crate) fn new(
        graph: Graph,
        ranks: Vec<usize>,
        shortcuts: FxHashMap<EdgeIndex, Shortcut>,
        built_for: (usize, usize),
        stats: ContractionStats,
    ) -> Self {
        ContractionArtifacts {
            graph,
            ranks,
            shortcuts,
            built_for,
            stats,
        }
    }

    /// The augmented graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Position of `node` in the contraction order, 0 was contracted first.
    pub fn rank(&self, node: NodeIndex) -> usize {
        self.ranks[node.index()]
    }

    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    pub fn shortcut(&self, edge_idx: EdgeIndex) -> Option<&Shortcut> {
        self.shortcuts.get(&edge_idx)
    }

    pub fn num_shortcuts(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn shortcut_indices(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.shortcuts.keys().copied()
    }

    pub fn stats(&self) -> &ContractionStats {
        &self.stats
    }

    /// Node and original edge count of the graph this hierarchy was built for.
    pub fn built_for(&self) -> (usize, usize) {
        self.built_for
    }

    /// Middle node of the cheapest shortcut `u -> v`, if there is one.
    pub fn bypassed_node(&self, u: NodeIndex, v: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_outgoing(u)
            .filter(|(_, edge)| edge.target == v)
            .filter_map(|(idx, edge)| Some((self.shortcuts.get(&idx)?, edge.weight)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(shortcut, _)| shortcut.middle)
    }

    /// Original edges `edge_idx` stands for, in path order.
    pub fn unpack_edge(&self, edge_idx: EdgeIndex) -> Vec<EdgeIndex> {
        let mut unpacked = Vec::new();
        self.unpack_edge_into(edge_idx, &mut unpacked);
        unpacked
    }

    /// Same as [`Self::unpack_edge`] but appends to `out`. Nested shortcuts are
    /// expanded with an explicit stack.
    pub fn unpack_edge_into(&self, edge_idx: EdgeIndex, out: &mut Vec<EdgeIndex>) {
        let mut stack = vec![edge_idx];
        while let Some(edge_idx) = stack.pop() {
            match self.shortcuts.get(&edge_idx) {
                Some(Shortcut {
                    replaces: [first, second],
                    ..
                }) => {
                    stack.push(*second);
                    stack.push(*first);
                }
                None => out.push(edge_idx),
            }
        }
    }

    /// Every node has a rank and the ranks are a permutation of `0..n`.
    pub fn validate_ranks(&self) -> bool {
        let n = self.graph.num_nodes();
        if self.ranks.len() != n {
            return false;
        }

        let mut seen = vec![false; n];
        for rank in &self.ranks {
            if *rank >= n || seen[*rank] {
                return false;
            }
            seen[*rank] = true;
        }
        true
    }

    /// Summed weight of the original edges behind `edge_idx`.
    pub fn unpacked_weight(&self, edge_idx: EdgeIndex) -> Weight {
        self.unpack_edge(edge_idx)
            .iter()
            .map(|e| self.graph.edge(*e).weight)
            .sum()
    }

    /// Outgoing edges of `node` leading upwards in the hierarchy.
    pub fn edges_up(&self, node: NodeIndex) -> impl Iterator<Item = (EdgeIndex, &Edge)> {
        let rank = self.rank(node);
        self.graph
            .neighbors_outgoing(node)
            .filter(move |(_, edge)| self.rank(edge.target) > rank)
    }

    pub fn print_info(&self) {
        println!(
            "Hierarchy:\t#Nodes: {}, #Edges: {}, #Shortcuts: {}",
            self.graph.num_nodes(),
            self.graph.num_original_edges(),
            self.shortcuts.len()
        );
    }
}

impl Display for ContractionArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Hierarchy: #Nodes: {}, #Shortcuts: {}",
            self.graph.num_nodes(),
            self.shortcuts.len()
        )?;
        for node in 0..self.graph.num_nodes() {
            let node = NodeIndex::new(node);
            write!(f, "  {} (rank {}):", node.index(), self.rank(node))?;
            for (edge_idx, edge) in self.edges_up(node) {
                let marker = if self.shortcuts.contains_key(&edge_idx) {
                    "*"
                } else {
                    ""
                };
                write!(f, " {}->{}{}", edge.source.index(), edge.target.index(), marker)?;
            }
            writeln!(f)?;
        }

        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        control::Control,
        graph::*,
        node_contraction::NodeContractor,
        util::test_graphs::{generate_complex_graph, generate_simple_graph},
    };

    fn simple_order() -> Vec<NodeIndex> {
        // A,E,D,C,B
        vec![
            node_index(0),
            node_index(4),
            node_index(3),
            node_index(2),
            node_index(1),
        ]
    }

    #[test]
    fn test_unpacking_edges() {
        //           B
        //           |
        // E -> A -> C
        //      |  /
        //      D
        let g = generate_simple_graph();
        let ac = EdgeIndex::new(0);
        let ea = EdgeIndex::new(2);

        let artifacts = NodeContractor::new(g, Default::default())
            .run_with_order(&simple_order(), &mut Control::new())
            .unwrap();

        assert_eq!(vec![ea, ac], artifacts.unpack_edge(EdgeIndex::new(7)));
        assert_eq!(Some(node_index(0)), artifacts.bypassed_node(node_index(4), node_index(2)));
        assert_eq!(None, artifacts.bypassed_node(node_index(0), node_index(2)));
        assert_eq!(vec![ac], artifacts.unpack_edge(ac));
    }

    #[test]
    fn nested_shortcuts_unpack_to_a_path() {
        // 0 -> 1 -> 2 -> 3 -> 4 contracted from the inside out
        let mut g = Graph::new();
        for i in 0..5 {
            g.add_node(Node::new(i, 0.0, 0.0));
        }
        for i in 0..4 {
            g.add_edge(Edge::new(node_index(i), node_index(i + 1), (i + 1) as f64))
                .unwrap();
        }
        let order: Vec<NodeIndex> = [2, 1, 3, 0, 4].into_iter().map(node_index).collect();

        let artifacts = NodeContractor::new(g, Default::default())
            .run_with_order(&order, &mut Control::new())
            .unwrap();

        // 1 -> 3 over 2, 0 -> 3 over 1, 0 -> 4 over 3
        assert_eq!(3, artifacts.num_shortcuts());
        let top = artifacts
            .graph()
            .neighbors_outgoing(node_index(0))
            .find(|(_, e)| e.target == node_index(4))
            .map(|(idx, _)| idx)
            .unwrap();

        let unpacked = artifacts.unpack_edge(top);
        assert_eq!(
            (0..4).map(EdgeIndex::new).collect::<Vec<_>>(),
            unpacked
        );
        approx::assert_abs_diff_eq!(10.0, artifacts.unpacked_weight(top), epsilon = 1e-9);
        assert_eq!(Some(node_index(3)), artifacts.bypassed_node(node_index(0), node_index(4)));
    }

    #[test]
    fn test_print_graph() {
        let artifacts = NodeContractor::new(generate_complex_graph(), Default::default())
            .run(&mut Control::new())
            .unwrap();

        let printed = artifacts.to_string();
        assert!(printed.starts_with("Hierarchy: #Nodes: 11"));
        assert_eq!(11 + 2, printed.lines().count());
    }
}
