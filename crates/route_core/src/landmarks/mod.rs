//! Landmark selection and the ALT heuristic.
//!
//! A [`LandmarkTable`] stores, for every landmark `L`, the distances
//! `d(L, ·)` and `d(·, L)`. By the triangle inequality both give lower bounds
//! on `d(u, t)`, which [`LandmarkHeuristic`] combines into an admissible and
//! consistent A* potential.
//!
//! # Examples
//! ```ignore
//! let params = LandmarkParams::new(16).policy(SelectionPolicy::MaxCover).seed(7);
//! let table = select_landmarks(&graph, &params, &mut Control::new())?;
//! let res = Router::new(&graph).with_landmarks(&table).search(Algorithm::BidirAlt, s, t)?;
//! ```
use std::time::Instant;

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    constants::Weight,
    control::{Control, ProgressLog},
    error::{Artifact, PreprocessError, SearchError},
    graph::{Direction, Graph, NodeIndex},
    search::{engine::one_to_all, heuristic::Heuristic},
};

mod avoid;
mod maxcover;
mod selection;

pub use maxcover::{coverage, Coverage};

/// How landmarks are picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SelectionPolicy {
    /// Uniform sample of distinct nodes
    Random,
    /// Farthest point selection on hop distances
    Farthest,
    /// Leaves of shortest path trees that the current landmarks explain badly
    #[default]
    Avoid,
    /// Local search over a pool of `avoid` candidates maximizing covered edges
    MaxCover,
}

/// Parameters for [`select_landmarks`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkParams {
    pub count: usize,
    pub policy: SelectionPolicy,
    /// Seed of the only randomness source, equal seeds give equal landmarks
    pub seed: u64,
    /// MaxCover: the candidate pool holds about `pool_factor * count` nodes
    pub pool_factor: usize,
    /// MaxCover: slack when testing whether a landmark covers an edge
    pub cover_tolerance: Weight,
    /// MaxCover: upper bound on prune/regrow rounds while filling the pool
    pub max_pool_attempts: usize,
}

impl LandmarkParams {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    pub fn policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn pool_factor(mut self, factor: usize) -> Self {
        self.pool_factor = factor;
        self
    }

    pub fn cover_tolerance(mut self, tolerance: Weight) -> Self {
        self.cover_tolerance = tolerance;
        self
    }

    pub fn max_pool_attempts(mut self, attempts: usize) -> Self {
        self.max_pool_attempts = attempts;
        self
    }
}

impl Default for LandmarkParams {
    fn default() -> Self {
        Self {
            count: 16,
            policy: SelectionPolicy::default(),
            seed: 0,
            pool_factor: 4,
            cover_tolerance: 1e-9,
            max_pool_attempts: 100,
        }
    }
}

/// Distances from and to every landmark, built for one graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkTable {
    landmarks: Vec<NodeIndex>,
    /// `forward[i][v] = d(landmarks[i], v)`
    forward: Vec<Vec<Weight>>,
    /// `backward[i][v] = d(v, landmarks[i])`
    backward: Vec<Vec<Weight>>,
    num_nodes: usize,
    num_edges: usize,
}

impl LandmarkTable {
    /// Table without landmarks for `graph`. Its heuristic is always 0.
    pub fn empty(graph: &Graph) -> Self {
        Self {
            num_nodes: graph.num_nodes(),
            num_edges: graph.num_original_edges(),
            ..Default::default()
        }
    }

    /// Runs a forward and a backward one-to-all search per landmark.
    pub fn compute(
        graph: &Graph,
        landmarks: &[NodeIndex],
        control: &mut Control,
    ) -> Result<Self, PreprocessError> {
        if graph.num_nodes() == 0 {
            return Err(PreprocessError::EmptyGraph);
        }

        let mut table = Self::empty(graph);
        let mut progress = ProgressLog::new("Landmark table", 5.0);
        for (i, landmark) in landmarks.iter().enumerate() {
            if control.is_cancelled() {
                return Err(PreprocessError::Cancelled);
            }
            table.push(graph, *landmark)?;
            control.report(i + 1, landmarks.len());
            progress.tick(i + 1, landmarks.len());
        }

        Ok(table)
    }

    /// Adds `landmark` and its distance vectors.
    pub(crate) fn push(&mut self, graph: &Graph, landmark: NodeIndex) -> Result<(), PreprocessError> {
        if !graph.contains(landmark) {
            return Err(PreprocessError::LandmarkOutOfBounds {
                node: landmark,
                num_nodes: graph.num_nodes(),
            });
        }

        let forward = one_to_all(graph, landmark, Direction::Forward)?;
        let backward = one_to_all(graph, landmark, Direction::Backward)?;

        self.landmarks.push(landmark);
        self.forward.push(forward.distances.unwrap_or_default());
        self.backward.push(backward.distances.unwrap_or_default());
        Ok(())
    }

    /// Takes over landmark `i` of `other` without recomputing its distances.
    pub(crate) fn push_computed(&mut self, other: &LandmarkTable, i: usize) {
        self.landmarks.push(other.landmarks[i]);
        self.forward.push(other.forward[i].clone());
        self.backward.push(other.backward[i].clone());
    }

    /// Copy holding only the landmarks at `indices`, in that order.
    pub(crate) fn subset(&self, indices: &[usize]) -> Self {
        Self {
            landmarks: indices.iter().map(|i| self.landmarks[*i]).collect(),
            forward: indices.iter().map(|i| self.forward[*i].clone()).collect(),
            backward: indices.iter().map(|i| self.backward[*i].clone()).collect(),
            num_nodes: self.num_nodes,
            num_edges: self.num_edges,
        }
    }

    pub fn landmarks(&self) -> &[NodeIndex] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.landmarks.contains(&node)
    }

    /// `d(landmarks[i], v)` for all `v`
    pub fn distances_from(&self, i: usize) -> &[Weight] {
        &self.forward[i]
    }

    /// `d(v, landmarks[i])` for all `v`
    pub fn distances_to(&self, i: usize) -> &[Weight] {
        &self.backward[i]
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Node and original edge count of the graph this table was built for.
    pub fn built_for(&self) -> (usize, usize) {
        (self.num_nodes, self.num_edges)
    }

    pub fn heuristic(&self) -> LandmarkHeuristic<'_> {
        LandmarkHeuristic { table: self }
    }

    /// Heuristic for queries on `graph`, which must be the graph the table was built for.
    pub fn heuristic_for(&self, graph: &Graph) -> Result<LandmarkHeuristic<'_>, SearchError> {
        graph.ensure_built_for(Artifact::LandmarkTable, self.built_for())?;
        Ok(self.heuristic())
    }
}

/// `h(u, t) = max_L max(d(L, t) - d(L, u), d(u, L) - d(t, L))`.
///
/// Entries that are `+∞` carry no information and are skipped.
#[derive(Debug, Clone, Copy)]
pub struct LandmarkHeuristic<'a> {
    table: &'a LandmarkTable,
}

impl Heuristic for LandmarkHeuristic<'_> {
    fn estimate(&self, from: NodeIndex, to: NodeIndex) -> Weight {
        let (u, t) = (from.index(), to.index());
        let mut best: Weight = 0.0;

        for (fwd, bwd) in self.table.forward.iter().zip(&self.table.backward) {
            if fwd[u].is_finite() && fwd[t].is_finite() {
                best = best.max(fwd[t] - fwd[u]);
            }
            if bwd[u].is_finite() && bwd[t].is_finite() {
                best = best.max(bwd[u] - bwd[t]);
            }
        }

        best
    }

    fn ensure_valid_for(&self, graph: &Graph) -> Result<(), SearchError> {
        graph.ensure_built_for(Artifact::LandmarkTable, self.table.built_for())
    }
}

/// Picks `params.count` landmarks with the selected policy and builds their table.
pub fn select_landmarks(
    graph: &Graph,
    params: &LandmarkParams,
    control: &mut Control,
) -> Result<LandmarkTable, PreprocessError> {
    let n = graph.num_nodes();
    if n == 0 {
        return Err(PreprocessError::EmptyGraph);
    }
    if params.count == 0 || params.count > n {
        return Err(PreprocessError::InvalidLandmarkCount {
            requested: params.count,
            available: n,
        });
    }

    info!(
        "Selecting {} landmarks with policy {:?} (seed {})",
        params.count, params.policy, params.seed
    );
    let now = Instant::now();
    let mut rng = StdRng::seed_from_u64(params.seed);

    let table = match params.policy {
        SelectionPolicy::Random => {
            let landmarks = selection::random(n, params.count, &mut rng);
            LandmarkTable::compute(graph, &landmarks, control)?
        }
        SelectionPolicy::Farthest => {
            let landmarks = selection::farthest(graph, params.count, &mut rng, control)?;
            LandmarkTable::compute(graph, &landmarks, control)?
        }
        SelectionPolicy::Avoid => {
            avoid::select(graph, LandmarkTable::empty(graph), params.count, &mut rng, control)?
        }
        SelectionPolicy::MaxCover => maxcover::select(graph, params, &mut rng, control)?,
    };

    debug!("Landmarks: {:?}", table.landmarks());
    info!(
        "Selected {} landmarks in {:?}",
        table.len(),
        now.elapsed()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use proptest::test_runner::TestRunner;

    use super::*;
    use crate::{
        control::CancellationToken,
        graph::node_index,
        search::{astar_search, bidir_astar_search, dijkstra_search, SearchOptions},
        util::test_graphs::{
            generate_complex_graph, generate_disconnected_graph, generate_example_graph,
            generate_grid_graph, generate_line_metric_graph,
        },
    };

    const POLICIES: [SelectionPolicy; 4] = [
        SelectionPolicy::Random,
        SelectionPolicy::Farthest,
        SelectionPolicy::Avoid,
        SelectionPolicy::MaxCover,
    ];

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn select(graph: &Graph, count: usize, policy: SelectionPolicy, seed: u64) -> LandmarkTable {
        let params = LandmarkParams::new(count).policy(policy).seed(seed);
        select_landmarks(graph, &params, &mut Control::new()).unwrap()
    }

    #[test]
    fn every_policy_returns_distinct_landmarks() {
        init_log();
        let g = generate_grid_graph(8, 8, 1);
        for policy in POLICIES {
            let table = select(&g, 5, policy, 11);
            let mut landmarks = table.landmarks().to_vec();
            landmarks.sort();
            landmarks.dedup();
            assert_eq!(5, landmarks.len(), "{policy:?}");
            assert_eq!((64, g.num_original_edges()), table.built_for());
        }
    }

    #[test]
    fn equal_seeds_give_equal_landmarks() {
        let g = generate_grid_graph(8, 8, 2);
        for policy in POLICIES {
            let a = select(&g, 4, policy, 5);
            let b = select(&g, 4, policy, 5);
            assert_eq!(a.landmarks(), b.landmarks(), "{policy:?}");
        }
    }

    #[test]
    fn heuristic_is_admissible() {
        let g = generate_grid_graph(10, 8, 3);
        let n = g.num_nodes();

        for policy in POLICIES {
            let table = select(&g, 4, policy, 9);
            let h = table.heuristic();

            for t in 0..n {
                let exact = one_to_all(&g, node_index(t), Direction::Backward)
                    .unwrap()
                    .distances
                    .unwrap();
                for u in 0..n {
                    let estimate = h.estimate(node_index(u), node_index(t));
                    assert!(estimate >= 0.0);
                    assert!(
                        estimate <= exact[u] + 1e-9,
                        "{policy:?}: h({u}, {t}) = {estimate} > {}",
                        exact[u]
                    );
                }
            }
        }
    }

    #[test]
    fn heuristic_is_exact_for_landmark_targets() {
        let g = generate_complex_graph();
        let table = LandmarkTable::compute(&g, &[node_index(4)], &mut Control::new()).unwrap();
        let exact = one_to_all(&g, node_index(4), Direction::Backward)
            .unwrap()
            .distances
            .unwrap();

        for u in 0..g.num_nodes() {
            let h = table.heuristic().estimate(node_index(u), node_index(4));
            approx::assert_abs_diff_eq!(exact[u], h, epsilon = 1e-9);
        }
    }

    #[test]
    fn infinite_entries_are_skipped() {
        let g = generate_disconnected_graph();
        let table = LandmarkTable::compute(&g, &[node_index(0)], &mut Control::new()).unwrap();
        let h = table.heuristic();

        assert_eq!(0.0, h.estimate(node_index(3), node_index(5)));
        assert_eq!(0.0, h.estimate(node_index(0), node_index(4)));
        assert_eq!(2.0, h.estimate(node_index(0), node_index(2)));
    }

    #[test]
    fn alt_agrees_with_dijkstra() {
        let g = generate_grid_graph(14, 12, 4);
        let table = select(&g, 6, SelectionPolicy::Avoid, 1);
        let n = g.num_nodes();
        let options = SearchOptions::default();

        let mut runner = TestRunner::default();
        runner
            .run(&(0..n, 0..n), |(s, t)| {
                let (s, t) = (node_index(s), node_index(t));
                let dijkstra = dijkstra_search(&g, s, t, &options).unwrap();
                let alt = astar_search(&g, s, t, table.heuristic(), &options).unwrap();
                let bidir = bidir_astar_search(&g, s, t, table.heuristic(), &options).unwrap();

                assert!(alt.stats.nodes_settled <= dijkstra.stats.nodes_settled);
                for res in [alt, bidir] {
                    assert_eq!(dijkstra.is_reachable(), res.is_reachable());
                    if let Some(d) = dijkstra.distance {
                        approx::assert_abs_diff_eq!(d, res.weight(), epsilon = 1e-9);
                        approx::assert_abs_diff_eq!(
                            d,
                            res.path_weight(&g).unwrap(),
                            epsilon = 1e-9
                        );
                    }
                }
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let g = generate_line_metric_graph(4);
        let mut control = Control::new();

        assert_eq!(
            Err(PreprocessError::InvalidLandmarkCount {
                requested: 5,
                available: 4
            }),
            select_landmarks(&g, &LandmarkParams::new(5), &mut control)
        );
        assert_eq!(
            Err(PreprocessError::InvalidLandmarkCount {
                requested: 0,
                available: 4
            }),
            select_landmarks(&g, &LandmarkParams::new(0), &mut control)
        );
        assert_eq!(
            Err(PreprocessError::EmptyGraph),
            select_landmarks(&Graph::new(), &LandmarkParams::new(1), &mut control)
        );
        assert_eq!(
            Err(PreprocessError::LandmarkOutOfBounds {
                node: node_index(9),
                num_nodes: 4
            }),
            LandmarkTable::compute(&g, &[node_index(9)], &mut control)
        );
    }

    #[test]
    fn cancelled_selection_fails() {
        let g = generate_grid_graph(6, 6, 5);
        let token = CancellationToken::new();
        token.cancel();

        for policy in POLICIES {
            let params = LandmarkParams::new(3).policy(policy);
            let mut control = Control::new().with_token(token.clone());
            assert_eq!(
                Err(PreprocessError::Cancelled),
                select_landmarks(&g, &params, &mut control),
                "{policy:?}"
            );
        }
    }

    #[test]
    fn progress_is_reported() {
        let g = generate_complex_graph();
        let mut reports = Vec::new();
        let mut observer = |done: usize, total: usize| reports.push((done, total));
        {
            let mut control = Control::new().with_observer(&mut observer);
            LandmarkTable::compute(&g, &[node_index(0), node_index(5)], &mut control).unwrap();
        }
        assert_eq!(vec![(1, 2), (2, 2)], reports);
    }

    #[test]
    fn table_of_another_graph_is_rejected() {
        let small = generate_example_graph();
        let g = generate_complex_graph();
        let table = select(&small, 2, SelectionPolicy::Farthest, 1);
        let (s, t) = (node_index(0), node_index(9));

        let options = SearchOptions::default();
        let stale = |res: Result<(), SearchError>| {
            matches!(
                res,
                Err(SearchError::StaleArtifact {
                    artifact: Artifact::LandmarkTable,
                    expected_nodes: 5,
                    found_nodes: 11,
                    ..
                })
            )
        };

        assert!(stale(table.heuristic_for(&g).map(|_| ())));
        assert!(stale(astar_search(&g, s, t, table.heuristic(), &options).map(|_| ())));
        assert!(stale(
            bidir_astar_search(&g, s, t, table.heuristic(), &options).map(|_| ())
        ));

        let heuristic = table.heuristic_for(&small).unwrap();
        let res = astar_search(&small, node_index(0), node_index(4), heuristic, &options).unwrap();
        assert_eq!(Some(7.0), res.distance);
    }
}
