use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    constants::{Weight, EPSILON},
    graph::{EdgeIndex, Graph, NodeIndex},
    search::frontier::Frontier,
};

/// Bounded Dijkstra used during contraction to find paths that make a
/// shortcut unnecessary.
pub(crate) struct WitnessSearch<'a> {
    g: &'a Graph,
    edges_out: &'a [Vec<EdgeIndex>],
    contracted: &'a [bool],
    settle_limit: Option<usize>,
}

impl<'a> WitnessSearch<'a> {
    pub(crate) fn new(
        g: &'a Graph,
        edges_out: &'a [Vec<EdgeIndex>],
        contracted: &'a [bool],
        settle_limit: Option<usize>,
    ) -> Self {
        Self {
            g,
            edges_out,
            contracted,
            settle_limit,
        }
    }

    /// Tentative distances from `start` to the nodes it reached without
    /// passing `avoid` or an already contracted node.
    ///
    /// Stops once every target is settled, the cheapest queued node is more
    /// expensive than `max_weight`, or the settle limit is hit. Every returned
    /// distance belongs to a real path, so it is an upper bound on the true
    /// distance.
    pub(crate) fn search(
        &self,
        start: NodeIndex,
        targets: &[NodeIndex],
        avoid: NodeIndex,
        max_weight: Weight,
    ) -> FxHashMap<NodeIndex, Weight> {
        let mut node_data: FxHashMap<NodeIndex, Weight> = FxHashMap::default();
        let mut settled = FxHashSet::default();
        let mut queue = Frontier::new();

        let mut targets_left: FxHashSet<NodeIndex> = targets.iter().copied().collect();

        node_data.insert(start, 0.0);
        queue.push(start, 0.0);

        while let Some((node, weight)) = queue.pop_min() {
            if weight > max_weight {
                break;
            }
            if self.settle_limit.is_some_and(|limit| settled.len() >= limit) {
                break;
            }

            settled.insert(node);
            targets_left.remove(&node);
            if targets_left.is_empty() {
                break;
            }

            for edge_idx in &self.edges_out[node.index()] {
                let edge = self.g.edge(*edge_idx);
                if edge.target == avoid || self.contracted[edge.target.index()] {
                    continue;
                }

                let new_distance = weight + edge.weight;
                let known = node_data
                    .get(&edge.target)
                    .copied()
                    .unwrap_or(Weight::INFINITY);
                if new_distance < known - EPSILON {
                    node_data.insert(edge.target, new_distance);
                    queue.push(edge.target, new_distance);
                }
            }
        }

        node_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::node_index, util::test_graphs::generate_complex_graph};

    fn adjacency(g: &Graph) -> Vec<Vec<EdgeIndex>> {
        (0..g.num_nodes())
            .map(|v| g.neighbors_outgoing(node_index(v)).map(|(e, _)| e).collect())
            .collect()
    }

    #[test]
    fn witness_avoids_the_contracted_node() {
        let g = generate_complex_graph();
        let edges_out = adjacency(&g);
        let contracted = vec![false; g.num_nodes()];
        let ws = WitnessSearch::new(&g, &edges_out, &contracted, None);

        // C -> J -> H costs 4 and is the only cheap way around B from C
        let res = ws.search(node_index(2), &[node_index(7)], node_index(9), 4.0);
        assert!(res.get(&node_index(7)).map_or(true, |d| *d > 4.0));

        let res = ws.search(node_index(2), &[node_index(7)], node_index(1), 4.0);
        assert_eq!(Some(&4.0), res.get(&node_index(7)));
    }

    #[test]
    fn search_respects_cost_and_settle_limit() {
        let g = generate_complex_graph();
        let edges_out = adjacency(&g);
        let mut contracted = vec![false; g.num_nodes()];

        let ws = WitnessSearch::new(&g, &edges_out, &contracted, Some(1));
        let res = ws.search(node_index(0), &[node_index(9)], node_index(4), 100.0);
        assert!(!res.contains_key(&node_index(9)));

        // K is contracted: A -> K -> J is not a witness anymore
        contracted[10] = true;
        let ws = WitnessSearch::new(&g, &edges_out, &contracted, None);
        let res = ws.search(node_index(0), &[node_index(9)], node_index(2), 6.0);
        assert!(res.get(&node_index(9)).map_or(true, |d| *d > 6.0));
    }
}
