//! Module to build contraction hierarchies from a given [`Graph`].
//!
//! # Examples
//! ```ignore
//! use route_core::prelude::*;
//!
//! let g = generate_simple_graph();
//!
//! // Consumes the graph, shortcuts are added to it
//! let contractor = NodeContractor::new(g, ContractionParams::default());
//!
//! let artifacts = contractor.run(&mut Control::new())?;
//! assert!(artifacts.validate_ranks());
//!```
//! [`Graph`]: crate::graph::Graph
use std::{
    cmp::{max, Reverse},
    time::Instant,
};

use log::{debug, info, trace};
use priority_queue::PriorityQueue;
use rustc_hash::FxHashMap;

use crate::{
    contraction_params::ContractionParams,
    contraction_strategy::ContractionStrategy,
    control::{Control, ProgressLog},
    error::PreprocessError,
    graph::{node_index, Edge, EdgeIndex, Graph, NodeIndex},
    overlay_graph::{ContractionArtifacts, Shortcut},
    statistics::ContractionStats,
    witness_search::WitnessSearch,
};

type ImportanceQueue = PriorityQueue<NodeIndex, Reverse<(i32, NodeIndex)>>;

/// Shortcut found by simulating a contraction, not yet inserted.
#[derive(Debug, Clone)]
struct PendingShortcut {
    edge: Edge,
    replaces: [EdgeIndex; 2],
}

/// Contracts the nodes of a graph one by one and inserts the shortcuts that
/// keep all shortest path distances among the remaining nodes intact.
///
/// Importance of a node `v`, smaller is contracted earlier:
/// `I(v) = ed * ED(v) + cn * CN(v) + lvl * L(v)` with
/// - ED: shortcuts contracting `v` would add minus its uncontracted in- and out-degree
/// - CN: number of already contracted neighbours
/// - L: level, one above the highest level of a contracted neighbour
pub struct NodeContractor {
    g: Graph,
    params: ContractionParams,
    /// Incoming edges per node, kept up to date while shortcuts are added
    edges_in: Vec<Vec<EdgeIndex>>,
    contracted: Vec<bool>,
    contracted_neighbors: Vec<usize>,
    levels: Vec<usize>,
    ranks: Vec<usize>,
    shortcuts: FxHashMap<EdgeIndex, Shortcut>,
    stats: ContractionStats,
}

impl NodeContractor {
    pub fn new(g: Graph, params: ContractionParams) -> Self {
        let num_nodes = g.num_nodes();
        let num_edges = g.num_edges();
        let edges_in = g.reverse_adjacency().to_vec();
        NodeContractor {
            g,
            params,
            edges_in,
            contracted: vec![false; num_nodes],
            contracted_neighbors: vec![0; num_nodes],
            levels: vec![0; num_nodes],
            ranks: vec![0; num_nodes],
            shortcuts: FxHashMap::with_capacity_and_hasher(num_edges, Default::default()),
            stats: ContractionStats::default(),
        }
    }

    pub fn run(self, control: &mut Control) -> Result<ContractionArtifacts, PreprocessError> {
        self.run_with_strategy(ContractionStrategy::LazyUpdate, control)
    }

    pub fn run_with_order(
        self,
        node_order: &[NodeIndex],
        control: &mut Control,
    ) -> Result<ContractionArtifacts, PreprocessError> {
        self.run_with_strategy(ContractionStrategy::FixedOrder(node_order), control)
    }

    pub fn run_with_strategy(
        mut self,
        strategy: ContractionStrategy,
        control: &mut Control,
    ) -> Result<ContractionArtifacts, PreprocessError> {
        let num_nodes = self.g.num_nodes();
        if num_nodes == 0 {
            return Err(PreprocessError::EmptyGraph);
        }
        if let ContractionStrategy::FixedOrder(order) = strategy {
            validate_order(order, num_nodes)?;
        }

        let now = Instant::now();
        let built_for = (num_nodes, self.g.num_original_edges());

        self.stats.edges_removed_by_cleanup = self.g.remove_duplicate_edges();
        self.edges_in = self.g.reverse_adjacency().to_vec();
        info!(
            "Cleanup removed {} parallel edges and self-loops",
            self.stats.edges_removed_by_cleanup
        );

        let mut queue: ImportanceQueue = match strategy {
            ContractionStrategy::FixedOrder(order) => order
                .iter()
                .enumerate()
                .map(|(priority, node)| (*node, Reverse((priority as i32, *node))))
                .collect(),
            ContractionStrategy::LazyUpdate | ContractionStrategy::LazyUpdateSelf => {
                self.calc_initial_node_order(control)?
            }
        };

        let mut progress = ProgressLog::new("Contraction", self.params.progress_step);
        let mut next_rank = 0;

        while let Some((node, Reverse((priority, _)))) = queue.pop() {
            if control.is_cancelled() {
                info!("Contraction cancelled after {} nodes", next_rank);
                return Err(PreprocessError::Cancelled);
            }

            if strategy.is_lazy() {
                // Lazy Update: a node whose importance grew goes back into the queue
                let importance = self.calc_importance(node);
                if let Some((_, Reverse((min, _)))) = queue.peek() {
                    if importance > *min {
                        trace!(
                            "[Lazy] {} importance {} -> {}",
                            node.index(),
                            priority,
                            importance
                        );
                        queue.push(node, Reverse((importance, node)));
                        self.stats.lazy_updates += 1;
                        continue;
                    }
                }
            }

            debug!("=> Contracting node: {} ({})", node.index(), priority);
            let neighbors = self.contract_node(node);
            self.ranks[node.index()] = next_rank;
            next_rank += 1;

            for neighbor in neighbors {
                self.contracted_neighbors[neighbor.index()] += 1;
                self.levels[neighbor.index()] = max(
                    self.levels[neighbor.index()],
                    self.levels[node.index()] + 1,
                );

                if strategy.updates_neighbors() {
                    let importance = self.calc_importance(neighbor);
                    queue.change_priority(&neighbor, Reverse((importance, neighbor)));
                }
            }

            control.report(next_rank, num_nodes);
            progress.tick(next_rank, num_nodes);
        }

        self.stats.nodes_contracted = next_rank;
        self.stats.shortcuts_added = self.g.num_shortcuts;
        self.stats.duration = Some(now.elapsed());

        info!("Contracting nodes took {:?}", now.elapsed());
        info!("Added shortcuts: {}", self.g.num_shortcuts);
        info!("{}", self.stats);

        self.shortcuts.shrink_to_fit();
        Ok(ContractionArtifacts::new(
            self.g,
            self.ranks,
            self.shortcuts,
            built_for,
            self.stats,
        ))
    }

    /// Outgoing edges of `node` to uncontracted nodes
    fn neighbors_outgoing(
        &self,
        node: NodeIndex,
    ) -> impl Iterator<Item = (EdgeIndex, &Edge)> + '_ {
        self.g
            .neighbors_outgoing(node)
            .filter(move |(_, edge)| !self.contracted[edge.target.index()])
    }

    /// Incoming edges of `node` from uncontracted nodes
    fn neighbors_incoming(
        &self,
        node: NodeIndex,
    ) -> impl Iterator<Item = (EdgeIndex, &Edge)> + '_ {
        self.edges_in[node.index()]
            .iter()
            .map(|edge_idx| (*edge_idx, self.g.edge(*edge_idx)))
            .filter(move |(_, edge)| !self.contracted[edge.source.index()])
    }

    fn uncontracted_neighbors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self
            .neighbors_incoming(node)
            .map(|(_, edge)| edge.source)
            .chain(self.neighbors_outgoing(node).map(|(_, edge)| edge.target))
            .filter(|neighbor| *neighbor != node)
            .collect();
        neighbors.sort();
        neighbors.dedup();
        neighbors
    }

    /// Shortcuts needed if `node` were contracted now, plus its uncontracted
    /// in- and out-degree.
    fn simulate_contraction(&self, node: NodeIndex) -> (Vec<PendingShortcut>, usize, usize) {
        let edges_in: Vec<(EdgeIndex, Edge)> = self
            .neighbors_incoming(node)
            .map(|(i, e)| (i, e.clone()))
            .collect();
        let edges_out: Vec<(EdgeIndex, Edge)> = self
            .neighbors_outgoing(node)
            .map(|(i, e)| (i, e.clone()))
            .collect();

        let ws = WitnessSearch::new(
            &self.g,
            &self.g.edges_out,
            &self.contracted,
            self.params.witness_settle_limit,
        );

        let mut pending = Vec::new();
        for (uv_idx, uv) in edges_in.iter() {
            let mut max_weight = 0.0;
            let mut target_nodes = Vec::new();
            for (_, vw) in edges_out.iter() {
                if uv.source == vw.target {
                    continue;
                }
                max_weight = f64::max(max_weight, uv.weight + vw.weight);
                target_nodes.push(vw.target);
            }
            if target_nodes.is_empty() {
                continue;
            }

            let witnesses = ws.search(uv.source, &target_nodes, node, max_weight);

            for (vw_idx, vw) in edges_out.iter() {
                if uv.source == vw.target {
                    continue;
                }

                let weight = uv.weight + vw.weight;
                if witnesses.get(&vw.target).is_some_and(|w| *w <= weight) {
                    continue;
                }

                pending.push(PendingShortcut {
                    edge: Edge::new(uv.source, vw.target, weight),
                    replaces: [*uv_idx, *vw_idx],
                });
            }
        }

        (pending, edges_in.len(), edges_out.len())
    }

    /// Contracts `node` and returns its uncontracted neighbours.
    fn contract_node(&mut self, node: NodeIndex) -> Vec<NodeIndex> {
        let neighbors = self.uncontracted_neighbors(node);
        let (pending, _, _) = self.simulate_contraction(node);

        for shortcut in pending {
            self.insert_shortcut(shortcut, node);
        }

        self.contracted[node.index()] = true;
        neighbors
    }

    /// Adds the shortcut or, if a more expensive shortcut between the same
    /// nodes exists, lowers its weight and points it to the new middle node.
    fn insert_shortcut(&mut self, pending: PendingShortcut, middle: NodeIndex) {
        let PendingShortcut { edge, replaces } = pending;
        let shortcut = Shortcut {
            source: edge.source,
            target: edge.target,
            middle,
            replaces,
        };

        let existing = self
            .g
            .neighbors_outgoing(edge.source)
            .find(|(idx, e)| e.target == edge.target && self.shortcuts.contains_key(idx))
            .map(|(idx, e)| (idx, e.weight));

        match existing {
            Some((idx, weight)) if weight > edge.weight => {
                debug!(
                    "Replacing shortcut {}->{} ({} -> {})",
                    edge.source.index(),
                    edge.target.index(),
                    weight,
                    edge.weight
                );
                self.g.set_weight(idx, edge.weight);
                self.shortcuts.insert(idx, shortcut);
                self.stats.shortcuts_replaced += 1;
            }
            Some(_) => {}
            None => {
                let target = edge.target;
                let idx = self.g.add_shortcut(edge);
                self.edges_in[target.index()].push(idx);
                self.shortcuts.insert(idx, shortcut);
            }
        }
    }

    fn calc_initial_node_order(&self, control: &Control) -> Result<ImportanceQueue, PreprocessError> {
        let mut pq = PriorityQueue::with_capacity(self.g.num_nodes());

        for v in 0..self.g.num_nodes() {
            if control.is_cancelled() {
                return Err(PreprocessError::Cancelled);
            }
            let v = node_index(v);
            pq.push(v, Reverse((self.calc_importance(v), v)));
        }

        Ok(pq)
    }

    fn calc_importance(&self, v: NodeIndex) -> i32 {
        let params = self.params.priority_params;
        let (shortcuts, in_degree, out_degree) = self.simulate_contraction(v);
        let edge_difference = shortcuts.len() as i32 - in_degree as i32 - out_degree as i32;

        edge_difference * params.edge_difference_coeff
            + self.contracted_neighbors[v.index()] as i32 * params.contracted_neighbors_coeff
            + self.levels[v.index()] as i32 * params.level_coeff
    }
}

/// A fixed order must list every node exactly once.
fn validate_order(order: &[NodeIndex], num_nodes: usize) -> Result<(), PreprocessError> {
    let mut seen = vec![false; num_nodes];
    let mut distinct = 0;
    for node in order {
        if node.index() < num_nodes && !seen[node.index()] {
            seen[node.index()] = true;
            distinct += 1;
        }
    }

    if order.len() != num_nodes || distinct != num_nodes {
        return Err(PreprocessError::InvalidOrder {
            expected: num_nodes,
            found: distinct,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::test_runner::TestRunner;

    use crate::{
        contraction_params::PriorityParams,
        control::CancellationToken,
        edge,
        graph::{Direction, Node},
        search::{ch_search, dijkstra_search, one_to_all, SearchOptions},
        util::test_graphs::{
            generate_complex_graph, generate_example_graph, generate_grid_graph,
            generate_simple_graph,
        },
    };

    use super::*;

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn order(nodes: &[usize]) -> Vec<NodeIndex> {
        nodes.iter().copied().map(node_index).collect()
    }

    fn contract(g: Graph) -> ContractionArtifacts {
        NodeContractor::new(g, ContractionParams::default())
            .run(&mut Control::new())
            .unwrap()
    }

    /// Every shortcut unpacks to a connected chain of original edges whose
    /// weights add up to the shortcut weight.
    fn assert_shortcuts_unpack(artifacts: &ContractionArtifacts) {
        let g = artifacts.graph();
        for idx in artifacts.shortcut_indices() {
            let shortcut = g.edge(idx);
            let unpacked = artifacts.unpack_edge(idx);

            assert!(unpacked.iter().all(|e| !g.is_shortcut(*e)));
            assert_eq!(shortcut.source, g.edge(unpacked[0]).source);
            assert_eq!(shortcut.target, g.edge(*unpacked.last().unwrap()).target);
            for pair in unpacked.windows(2) {
                assert_eq!(g.edge(pair[0]).target, g.edge(pair[1]).source);
            }
            assert_abs_diff_eq!(
                shortcut.weight,
                artifacts.unpacked_weight(idx),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn contract_simple_graph_with_order() {
        //           B
        //           |
        // E -> A -> C
        //      |  /
        //      D
        init_log();
        let g = generate_simple_graph();

        // A,E,D,C,B
        let artifacts = NodeContractor::new(g, Default::default())
            .run_with_order(&order(&[0, 4, 3, 2, 1]), &mut Control::new())
            .unwrap();

        assert_eq!(2, artifacts.graph().num_shortcuts);
        assert_eq!(&[0, 4, 3, 2, 1], artifacts.ranks());
        assert_shortcuts_unpack(&artifacts);
    }

    #[test]
    fn contract_straight_line_of_nodes() {
        // 0 -> 1 -> 2 -> 3 -> 4 -> 5 -> 6 -> 7
        let mut g = Graph::new();

        for i in 0..8 {
            g.add_node(Node::new(i, 0.0, 0.0));
        }

        for i in 0..7 {
            g.add_edge(edge!(node_index(i) => node_index(i + 1), 1.0))
                .unwrap();
        }

        let artifacts = contract(g);

        assert_eq!(3, artifacts.graph().num_shortcuts);
        assert!(artifacts.validate_ranks());
        assert_shortcuts_unpack(&artifacts);
    }

    #[test]
    // https://jlazarsfeld.github.io/ch.150.project/sections/8-contraction/
    fn contract_complex_graph_with_order() {
        let g = generate_complex_graph();

        // [B, E, I, K, D, G, C, J, H, F, A]
        let artifacts = NodeContractor::new(g, Default::default())
            .run_with_order(&order(&[1, 4, 8, 10, 3, 6, 2, 9, 7, 5, 0]), &mut Control::new())
            .unwrap();

        assert_eq!(3 * 2, artifacts.graph().num_shortcuts);
        assert_shortcuts_unpack(&artifacts);
    }

    #[test]
    fn contract_complex_graph_with_optimal_order() {
        let g = generate_complex_graph();

        // [D, I, F, G, E, B, C, A, K, H, J]
        let artifacts = NodeContractor::new(g, Default::default())
            .run_with_order(&order(&[3, 8, 5, 6, 4, 1, 2, 0, 10, 7, 9]), &mut Control::new())
            .unwrap();

        assert_eq!(0, artifacts.graph().num_shortcuts);
    }

    #[test]
    fn contract_complex_graph() {
        init_log();
        let artifacts = contract(generate_complex_graph());

        assert!(artifacts.validate_ranks());
        assert_eq!(11, artifacts.stats().nodes_contracted);
        assert_shortcuts_unpack(&artifacts);

        for s in 0..11 {
            let expected = one_to_all(artifacts.graph(), node_index(s), Direction::Forward)
                .unwrap()
                .distances
                .unwrap();
            for t in 0..11 {
                let res = ch_search(&artifacts, node_index(s), node_index(t), &Default::default())
                    .unwrap();
                assert_abs_diff_eq!(expected[t], res.weight(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn ch_query_on_example_graph() {
        let artifacts = contract(generate_example_graph());
        let res = ch_search(&artifacts, node_index(0), node_index(4), &Default::default()).unwrap();

        let path: Vec<usize> = res.path.iter().map(|n| n.index()).collect();
        assert_eq!(vec![0, 2, 1, 3, 4], path);
        assert_abs_diff_eq!(7.0, res.weight(), epsilon = 1e-9);

        let res = ch_search(&artifacts, node_index(4), node_index(0), &Default::default()).unwrap();
        assert!(!res.is_reachable());
        assert!(res.path.is_empty());
    }

    #[test]
    fn ch_agrees_with_dijkstra_on_random_grid() {
        init_log();
        let g = generate_grid_graph(14, 14, 21);
        let artifacts = contract(g.clone());
        assert!(artifacts.validate_ranks());
        assert_shortcuts_unpack(&artifacts);

        let options = SearchOptions::default().record_edges(true);
        let n = g.num_nodes();
        let mut runner = TestRunner::default();
        runner
            .run(&(0..n, 0..n), |(s, t)| {
                let (s, t) = (node_index(s), node_index(t));
                let dijkstra = dijkstra_search(&g, s, t, &options).unwrap();
                let ch = ch_search(&artifacts, s, t, &options).unwrap();

                assert_eq!(dijkstra.is_reachable(), ch.is_reachable());
                if let Some(d) = dijkstra.distance {
                    assert_abs_diff_eq!(d, ch.weight(), epsilon = 1e-9);
                    assert_abs_diff_eq!(d, ch.path_weight(&g).unwrap(), epsilon = 1e-9);
                    assert_eq!(Some(&s), ch.path.first());
                    assert_eq!(Some(&t), ch.path.last());

                    let on_path = ch.overlay.unwrap().on_path;
                    assert!(on_path.iter().all(|e| !artifacts.graph().is_shortcut(*e)));
                    assert_eq!(ch.path.len() - 1, on_path.len());
                }
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn stale_keys_are_recomputed_on_pop() {
        // 0 <=> 1 <=> 2 <=> 3 <=> 4 <=> 5 <=> 6 <=> 7
        init_log();
        let mut g = Graph::new();
        for i in 0..8 {
            g.add_node(Node::new(i, 0.0, 0.0));
        }
        for i in 0..7 {
            g.add_edge(edge!(node_index(i) => node_index(i + 1), 1.0))
                .unwrap();
            g.add_edge(edge!(node_index(i + 1) => node_index(i), 1.0))
                .unwrap();
        }

        // Contracting 0 raises the importance of 1 from -2 to 0 while its key stays -2
        let artifacts = NodeContractor::new(g, ContractionParams::default())
            .run_with_strategy(ContractionStrategy::LazyUpdateSelf, &mut Control::new())
            .unwrap();

        assert!(artifacts.stats().lazy_updates > 0);
        assert_eq!(8, artifacts.stats().nodes_contracted);
        assert!(artifacts.validate_ranks());
        assert_shortcuts_unpack(&artifacts);
        for s in 0..8 {
            for t in 0..8 {
                let res = ch_search(&artifacts, node_index(s), node_index(t), &Default::default())
                    .unwrap();
                assert_eq!(Some((s as f64 - t as f64).abs()), res.distance);
            }
        }
    }

    #[test]
    fn lazy_update_self_agrees_with_dijkstra_on_random_grid() {
        let g = generate_grid_graph(12, 12, 8);
        let artifacts = NodeContractor::new(g.clone(), ContractionParams::default())
            .run_with_strategy(ContractionStrategy::LazyUpdateSelf, &mut Control::new())
            .unwrap();
        assert!(artifacts.validate_ranks());
        assert_shortcuts_unpack(&artifacts);

        let n = g.num_nodes();
        let mut runner = TestRunner::default();
        runner
            .run(&(0..n, 0..n), |(s, t)| {
                let (s, t) = (node_index(s), node_index(t));
                let expected = dijkstra_search(&g, s, t, &Default::default()).unwrap();
                let res = ch_search(&artifacts, s, t, &Default::default()).unwrap();
                assert_eq!(expected.is_reachable(), res.is_reachable());
                if let Some(d) = expected.distance {
                    assert_abs_diff_eq!(d, res.weight(), epsilon = 1e-9);
                }
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn settle_limit_only_adds_shortcuts() {
        let g = generate_grid_graph(10, 10, 5);
        let exact = contract(g.clone());
        let limited = NodeContractor::new(
            g.clone(),
            ContractionParams::default().witness_settle_limit(Some(1)),
        )
        .run(&mut Control::new())
        .unwrap();

        assert!(limited.validate_ranks());
        assert_shortcuts_unpack(&limited);
        assert!(exact.stats().shortcuts_added > 0);

        for (s, t) in [(0, 99), (99, 0), (45, 54), (9, 90)] {
            let (s, t) = (node_index(s), node_index(t));
            let expected = dijkstra_search(&g, s, t, &Default::default()).unwrap();
            let res = ch_search(&limited, s, t, &Default::default()).unwrap();
            assert_eq!(expected.distance.is_some(), res.distance.is_some());
            assert_abs_diff_eq!(
                expected.distance.unwrap_or(0.0),
                res.distance.unwrap_or(0.0),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn cleanup_runs_before_contraction() {
        let mut g = generate_example_graph();
        g.add_edge(edge!(node_index(0) => node_index(2), 9.0)).unwrap();
        g.add_edge(edge!(node_index(3) => node_index(3), 1.0)).unwrap();

        let artifacts = contract(g);
        assert_eq!(2, artifacts.stats().edges_removed_by_cleanup);
        assert_eq!((5, 8), artifacts.built_for());

        let res = ch_search(&artifacts, node_index(0), node_index(4), &Default::default()).unwrap();
        assert_eq!(Some(7.0), res.distance);
    }

    #[test]
    fn priority_params_change_the_order() {
        let g = generate_grid_graph(6, 6, 13);
        let level_only = PriorityParams::new(0, 0, 1);
        let artifacts = NodeContractor::new(
            g,
            ContractionParams::default().priority_params(level_only),
        )
        .run(&mut Control::new())
        .unwrap();

        // With only the level term every importance starts at 0, ties go to the lowest id
        assert_eq!(0, artifacts.rank(node_index(0)));
        assert!(artifacts.validate_ranks());
    }

    #[test]
    fn invalid_input_is_rejected() {
        let err = NodeContractor::new(Graph::new(), Default::default())
            .run(&mut Control::new())
            .unwrap_err();
        assert_eq!(PreprocessError::EmptyGraph, err);

        let err = NodeContractor::new(generate_simple_graph(), Default::default())
            .run_with_order(&order(&[0, 1, 1, 2, 3]), &mut Control::new())
            .unwrap_err();
        assert_eq!(
            PreprocessError::InvalidOrder {
                expected: 5,
                found: 4
            },
            err
        );
    }

    #[test]
    fn cancellation_stops_contraction() {
        let token = CancellationToken::new();
        token.cancel();
        let mut control = Control::new().with_token(token);

        let err = NodeContractor::new(generate_complex_graph(), Default::default())
            .run(&mut control)
            .unwrap_err();
        assert_eq!(PreprocessError::Cancelled, err);
    }

    #[test]
    fn progress_reaches_all_nodes() {
        let mut last = (0, 0);
        let mut observer = |done: usize, total: usize| last = (done, total);
        {
            let mut control = Control::new().with_observer(&mut observer);
            contract_with(&mut control);
        }
        assert_eq!((11, 11), last);

        fn contract_with(control: &mut Control) {
            NodeContractor::new(generate_complex_graph(), Default::default())
                .run(control)
                .unwrap();
        }
    }

    #[test]
    fn disconnect_node() {
        let mut g = Graph::new();
        let a = g.add_node(Node::new(0, 0.0, 0.0));
        let b = g.add_node(Node::new(1, 0.0, 0.0));
        let c = g.add_node(Node::new(2, 0.0, 0.0));
        let u = g.add_node(Node::new(3, 0.0, 0.0));

        g.add_edge(edge!(a => u, 1.0)).unwrap();
        g.add_edge(edge!(u => c, 1.0)).unwrap();
        g.add_edge(edge!(c => b, 1.0)).unwrap();
        g.add_edge(edge!(u => b, 1.0)).unwrap();

        let mut contractor = NodeContractor::new(g, Default::default());
        contractor.contracted[u.index()] = true;

        assert_eq!(contractor.neighbors_outgoing(a).count(), 0);
        assert_eq!(contractor.neighbors_outgoing(b).count(), 0);
        assert_eq!(contractor.neighbors_outgoing(c).count(), 1);

        assert_eq!(contractor.neighbors_incoming(a).count(), 0);
        assert_eq!(contractor.neighbors_incoming(b).count(), 1);
        assert_eq!(contractor.neighbors_incoming(c).count(), 0);
    }
}
