//! Strategy bundles plugged into the generic search engine.
//!
//! Every algorithm is a type implementing [`SearchStrategy`]. The engine is
//! generic over the strategy, so the callbacks are resolved when the strategy
//! is constructed and get inlined into the search loop.
use crate::{
    constants::Weight,
    graph::{Direction, EdgeIndex, Hop, NodeIndex},
    overlay_graph::ContractionArtifacts,
};

use super::{heuristic::Heuristic, state::QueryContext};

pub trait SearchStrategy {
    /// Whether a backward search rooted at the target runs alongside the forward search.
    fn is_bidirectional(&self) -> bool;

    /// Whether shortcut edges of an augmented graph may be relaxed.
    fn uses_shortcuts(&self) -> bool {
        false
    }

    /// Lower bound estimate used for the frontier key of `node` in `dir`.
    fn heuristic(&self, _ctx: &QueryContext<'_>, _node: NodeIndex, _dir: Direction) -> Weight {
        0.0
    }

    /// Frontier ordering key of `node`. Called after its distance changed.
    fn priority_key(&self, ctx: &mut QueryContext<'_>, node: NodeIndex, dir: Direction) -> Weight {
        ctx.state(dir).distance(node) + ctx.estimate(self, node, dir)
    }

    fn relax(&self, ctx: &mut QueryContext<'_>, from: NodeIndex, hop: Hop, dir: Direction) {
        ctx.relax(self, from, hop, dir);
    }

    /// Evaluated once per loop iteration.
    fn terminate(&self, ctx: &QueryContext<'_>) -> bool;

    /// Frontier to advance next in bidirectional mode.
    fn alternate(&self, _ctx: &QueryContext<'_>) -> Direction {
        Direction::Forward
    }

    /// Expands `edge` into edges of the original graph.
    fn unpack(&self, edge: EdgeIndex, out: &mut Vec<EdgeIndex>) {
        out.push(edge);
    }
}

/// Rule for picking the frontier a bidirectional search advances next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alternation {
    /// Strictly alternate between forward and backward
    #[default]
    RoundRobin,
    /// Advance the side with fewer queued nodes
    SmallerFrontier,
    /// Advance the side that settled fewer nodes so far
    FewerSettled,
}

impl Alternation {
    pub fn choose(self, ctx: &QueryContext<'_>) -> Direction {
        let fwd = ctx.state(Direction::Forward);
        let bwd = ctx.state(Direction::Backward);
        match self {
            Alternation::RoundRobin => ctx.last_direction().opposite(),
            Alternation::SmallerFrontier => {
                if fwd.frontier().len() <= bwd.frontier().len() {
                    Direction::Forward
                } else {
                    Direction::Backward
                }
            }
            Alternation::FewerSettled => {
                if fwd.num_settled() <= bwd.num_settled() {
                    Direction::Forward
                } else {
                    Direction::Backward
                }
            }
        }
    }
}

/// Plain Dijkstra. Stops as soon as the target is popped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraStrategy;

impl SearchStrategy for DijkstraStrategy {
    fn is_bidirectional(&self) -> bool {
        false
    }

    fn priority_key(&self, ctx: &mut QueryContext<'_>, node: NodeIndex, dir: Direction) -> Weight {
        ctx.state(dir).distance(node)
    }

    fn terminate(&self, _ctx: &QueryContext<'_>) -> bool {
        false
    }
}

/// Goal directed search ordering nodes by `distance + h(node, target)`.
#[derive(Debug, Clone)]
pub struct AStarStrategy<H> {
    heuristic: H,
}

impl<H: Heuristic> AStarStrategy<H> {
    pub fn new(heuristic: H) -> Self {
        Self { heuristic }
    }
}

impl<H: Heuristic> SearchStrategy for AStarStrategy<H> {
    fn is_bidirectional(&self) -> bool {
        false
    }

    fn heuristic(&self, ctx: &QueryContext<'_>, node: NodeIndex, dir: Direction) -> Weight {
        match dir {
            Direction::Forward => self.heuristic.estimate(node, ctx.target),
            Direction::Backward => self.heuristic.estimate(ctx.source, node),
        }
    }

    fn terminate(&self, _ctx: &QueryContext<'_>) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BidirDijkstraStrategy {
    alternation: Alternation,
}

impl BidirDijkstraStrategy {
    pub fn new(alternation: Alternation) -> Self {
        Self { alternation }
    }
}

impl SearchStrategy for BidirDijkstraStrategy {
    fn is_bidirectional(&self) -> bool {
        true
    }

    fn priority_key(&self, ctx: &mut QueryContext<'_>, node: NodeIndex, dir: Direction) -> Weight {
        ctx.state(dir).distance(node)
    }

    fn terminate(&self, ctx: &QueryContext<'_>) -> bool {
        ctx.min_key(Direction::Forward) + ctx.min_key(Direction::Backward) >= ctx.best()
    }

    fn alternate(&self, ctx: &QueryContext<'_>) -> Direction {
        self.alternation.choose(ctx)
    }
}

/// Bidirectional A* with average potentials:
/// `p_f(v) = (h(v, t) - h(s, v)) / 2` and `p_b(v) = -p_f(v)`.
///
/// Both sides then see the same reduced edge costs, so the search stops once
/// the two smallest frontier keys add up to the best path found.
#[derive(Debug, Clone)]
pub struct BidirAStarStrategy<H> {
    heuristic: H,
    alternation: Alternation,
}

impl<H: Heuristic> BidirAStarStrategy<H> {
    pub fn new(heuristic: H, alternation: Alternation) -> Self {
        Self {
            heuristic,
            alternation,
        }
    }

    fn forward_potential(&self, ctx: &QueryContext<'_>, node: NodeIndex) -> Weight {
        let to_target = self.heuristic.estimate(node, ctx.target);
        let from_source = self.heuristic.estimate(ctx.source, node);
        (to_target - from_source) / 2.0
    }
}

impl<H: Heuristic> SearchStrategy for BidirAStarStrategy<H> {
    fn is_bidirectional(&self) -> bool {
        true
    }

    fn heuristic(&self, ctx: &QueryContext<'_>, node: NodeIndex, dir: Direction) -> Weight {
        match dir {
            Direction::Forward => self.forward_potential(ctx, node),
            Direction::Backward => -self.forward_potential(ctx, node),
        }
    }

    fn terminate(&self, ctx: &QueryContext<'_>) -> bool {
        ctx.min_key(Direction::Forward) + ctx.min_key(Direction::Backward) >= ctx.best()
    }

    fn alternate(&self, ctx: &QueryContext<'_>) -> Direction {
        self.alternation.choose(ctx)
    }
}

/// Query on a contraction hierarchy: both sides only relax edges leading to
/// nodes of strictly higher rank.
#[derive(Debug, Clone, Copy)]
pub struct ChStrategy<'a> {
    artifacts: &'a ContractionArtifacts,
}

impl<'a> ChStrategy<'a> {
    pub fn new(artifacts: &'a ContractionArtifacts) -> Self {
        Self { artifacts }
    }

    fn is_upward(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.artifacts.rank(to) > self.artifacts.rank(from)
    }
}

impl SearchStrategy for ChStrategy<'_> {
    fn is_bidirectional(&self) -> bool {
        true
    }

    fn uses_shortcuts(&self) -> bool {
        true
    }

    fn priority_key(&self, ctx: &mut QueryContext<'_>, node: NodeIndex, dir: Direction) -> Weight {
        ctx.state(dir).distance(node)
    }

    fn relax(&self, ctx: &mut QueryContext<'_>, from: NodeIndex, hop: Hop, dir: Direction) {
        if self.is_upward(from, hop.head) {
            ctx.relax(self, from, hop, dir);
        }
    }

    /// Upward searches cannot stop at the first meeting, only once neither
    /// side can improve the best path anymore.
    fn terminate(&self, ctx: &QueryContext<'_>) -> bool {
        ctx.min_key(Direction::Forward) >= ctx.best()
            && ctx.min_key(Direction::Backward) >= ctx.best()
    }

    fn alternate(&self, ctx: &QueryContext<'_>) -> Direction {
        if ctx.min_key(Direction::Forward) >= ctx.best() {
            Direction::Backward
        } else if ctx.min_key(Direction::Backward) >= ctx.best() {
            Direction::Forward
        } else {
            ctx.last_direction().opposite()
        }
    }

    fn unpack(&self, edge: EdgeIndex, out: &mut Vec<EdgeIndex>) {
        self.artifacts.unpack_edge_into(edge, out);
    }
}
