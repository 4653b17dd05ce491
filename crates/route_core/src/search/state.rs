//! Per-query search state. Nothing in here outlives a single query.
use log::debug;
use rustc_hash::FxHashMap;

use crate::{
    constants::{Weight, EPSILON},
    graph::{Direction, EdgeIndex, Graph, Hop, NodeIndex},
};

use super::{frontier::Frontier, shortest_path::EdgeOverlay, strategy::SearchStrategy};

/// Distances, predecessors, settled set and frontier of one search direction.
#[derive(Debug, Default, Clone)]
pub struct SearchState {
    distance: Vec<Weight>,
    predecessor: Vec<Option<(NodeIndex, EdgeIndex)>>,
    settled: Vec<bool>,
    settle_order: Vec<NodeIndex>,
    pub(crate) frontier: Frontier,
    /// Cached heuristic values, only filled by the A* family
    estimates: FxHashMap<NodeIndex, Weight>,
}

impl SearchState {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            distance: vec![Weight::INFINITY; num_nodes],
            predecessor: vec![None; num_nodes],
            settled: vec![false; num_nodes],
            ..Default::default()
        }
    }

    /// Best known distance from the root of this direction, `+∞` if unreached.
    pub fn distance(&self, node: NodeIndex) -> Weight {
        self.distance
            .get(node.index())
            .copied()
            .unwrap_or(Weight::INFINITY)
    }

    /// Preceding node and the edge used to reach `node`. For backward searches
    /// the edge points from `node` to the returned node.
    pub fn predecessor(&self, node: NodeIndex) -> Option<(NodeIndex, EdgeIndex)> {
        self.predecessor.get(node.index()).copied().flatten()
    }

    pub fn is_settled(&self, node: NodeIndex) -> bool {
        self.settled.get(node.index()).copied().unwrap_or(false)
    }

    /// Settled nodes in the order they were settled.
    pub fn settled(&self) -> &[NodeIndex] {
        &self.settle_order
    }

    pub fn num_settled(&self) -> usize {
        self.settle_order.len()
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub(crate) fn set_root(&mut self, root: NodeIndex) {
        self.distance[root.index()] = 0.0;
        self.predecessor[root.index()] = None;
    }

    pub(crate) fn update(&mut self, node: NodeIndex, distance: Weight, pred: (NodeIndex, EdgeIndex)) {
        self.distance[node.index()] = distance;
        self.predecessor[node.index()] = Some(pred);
    }

    /// Marks `node` as settled. Returns `false` if it already was.
    pub(crate) fn settle(&mut self, node: NodeIndex) -> bool {
        if self.settled[node.index()] {
            return false;
        }
        self.settled[node.index()] = true;
        self.settle_order.push(node);
        true
    }

    pub(crate) fn into_distances(self) -> Vec<Weight> {
        self.distance
    }

    pub(crate) fn into_settled(self) -> Vec<NodeIndex> {
        self.settle_order
    }
}

/// Everything a single query needs, passed explicitly through the engine and
/// the strategy callbacks.
pub struct QueryContext<'a> {
    pub graph: &'a Graph,
    pub source: NodeIndex,
    pub target: NodeIndex,
    states: [SearchState; 2],
    bidirectional: bool,
    /// Length of the best complete path seen so far
    pub(crate) best: Weight,
    pub(crate) meeting: Option<NodeIndex>,
    pub(crate) last_direction: Direction,
    pub(crate) overlay: Option<EdgeOverlay>,
}

impl<'a> QueryContext<'a> {
    pub(crate) fn new(
        graph: &'a Graph,
        source: NodeIndex,
        target: NodeIndex,
        directions: &[Direction],
        record_edges: bool,
    ) -> Self {
        let n = graph.num_nodes();
        let state_for = |dir| {
            if directions.contains(&dir) {
                SearchState::new(n)
            } else {
                SearchState::default()
            }
        };

        QueryContext {
            graph,
            source,
            target,
            states: [state_for(Direction::Forward), state_for(Direction::Backward)],
            bidirectional: directions.len() == 2,
            best: Weight::INFINITY,
            meeting: None,
            last_direction: Direction::Backward,
            overlay: record_edges.then(EdgeOverlay::default),
        }
    }

    pub fn state(&self, dir: Direction) -> &SearchState {
        &self.states[dir as usize]
    }

    pub(crate) fn state_mut(&mut self, dir: Direction) -> &mut SearchState {
        &mut self.states[dir as usize]
    }

    pub fn is_bidirectional(&self) -> bool {
        self.bidirectional
    }

    pub fn best(&self) -> Weight {
        self.best
    }

    pub fn meeting_node(&self) -> Option<NodeIndex> {
        self.meeting
    }

    pub fn last_direction(&self) -> Direction {
        self.last_direction
    }

    /// Smallest frontier key in `dir`, `+∞` if that frontier is exhausted.
    pub fn min_key(&self, dir: Direction) -> Weight {
        self.state(dir).frontier.min_key()
    }

    /// Heuristic estimate of `node` in `dir`, computed once per query and node.
    pub fn estimate<S: SearchStrategy + ?Sized>(
        &mut self,
        strategy: &S,
        node: NodeIndex,
        dir: Direction,
    ) -> Weight {
        if let Some(estimate) = self.state(dir).estimates.get(&node) {
            return *estimate;
        }
        let estimate = strategy.heuristic(self, node, dir);
        self.state_mut(dir).estimates.insert(node, estimate);
        estimate
    }

    pub(crate) fn init_root<S: SearchStrategy + ?Sized>(
        &mut self,
        strategy: &S,
        root: NodeIndex,
        dir: Direction,
    ) {
        self.state_mut(dir).set_root(root);
        let key = strategy.priority_key(self, root, dir);
        self.state_mut(dir).frontier.push(root, key);
    }

    /// Standard edge relaxation: lowers the distance of `hop.head` if the path
    /// over `from` is shorter and, in bidirectional mode, checks whether the
    /// edge closes a better complete path.
    pub fn relax<S: SearchStrategy + ?Sized>(
        &mut self,
        strategy: &S,
        from: NodeIndex,
        hop: Hop,
        dir: Direction,
    ) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.visited.push(hop.edge);
        }

        let tentative = self.state(dir).distance(from) + hop.weight;
        if tentative < self.state(dir).distance(hop.head) - EPSILON {
            self.state_mut(dir).update(hop.head, tentative, (from, hop.edge));
            let key = strategy.priority_key(self, hop.head, dir);
            self.state_mut(dir).frontier.push(hop.head, key);
        }

        if self.bidirectional {
            let other = self.state(dir.opposite()).distance(hop.head);
            if other.is_finite() {
                let own = self.state(dir).distance(hop.head);
                self.offer_meeting(hop.head, own + other);
            }
        }
    }

    pub(crate) fn offer_meeting(&mut self, node: NodeIndex, length: Weight) {
        if length < self.best - EPSILON {
            debug!("New best path of length {} via {:?}", length, node);
            self.best = length;
            self.meeting = Some(node);
        }
    }

    pub(crate) fn into_states(self) -> (SearchState, SearchState, Option<EdgeOverlay>) {
        let [fwd, bwd] = self.states;
        (fwd, bwd, self.overlay)
    }
}
