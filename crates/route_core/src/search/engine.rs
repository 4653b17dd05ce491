//! Generic one- and two-directional search loop.
use log::{debug, info};

use crate::{
    error::SearchError,
    graph::{Direction, EdgeIndex, Graph, NodeIndex},
    statistics::SearchStats,
};

use super::{
    shortest_path::ShortestPathResult,
    state::{QueryContext, SearchState},
    strategy::{DijkstraStrategy, SearchStrategy},
    SearchOptions,
};

fn check_bounds(graph: &Graph, node: NodeIndex) -> Result<(), SearchError> {
    if graph.contains(node) {
        Ok(())
    } else {
        Err(SearchError::NodeOutOfBounds {
            node,
            num_nodes: graph.num_nodes(),
        })
    }
}

/// Runs a shortest path query from `source` to `target` driven by `strategy`.
pub fn search<S: SearchStrategy>(
    graph: &Graph,
    source: NodeIndex,
    target: NodeIndex,
    strategy: &S,
    options: &SearchOptions,
) -> Result<ShortestPathResult, SearchError> {
    check_bounds(graph, source)?;
    check_bounds(graph, target)?;

    let mut stats = SearchStats::default();
    stats.init();

    if source == target {
        stats.nodes_settled = 1;
        stats.finish();
        return Ok(ShortestPathResult::trivial(source, stats));
    }

    let directions: &[Direction] = if strategy.is_bidirectional() {
        &[Direction::Forward, Direction::Backward]
    } else {
        &[Direction::Forward]
    };

    let mut ctx = QueryContext::new(graph, source, target, directions, options.record_edges);

    if strategy.is_bidirectional() {
        run_bidirectional(&mut ctx, strategy);
    } else {
        run_unidirectional(&mut ctx, strategy, Direction::Forward, Some(target));
    }

    let unpacked_edges = ctx.meeting.map(|meeting| {
        let mut unpacked = Vec::new();
        for edge in path_edges(&ctx, meeting) {
            strategy.unpack(edge, &mut unpacked);
        }
        unpacked
    });

    let distance = ctx.meeting.map(|_| ctx.best);
    let (fwd, bwd, mut overlay) = ctx.into_states();

    let path = match &unpacked_edges {
        Some(edges) => std::iter::once(source)
            .chain(edges.iter().map(|e| graph.edge(*e).target))
            .collect(),
        None => Vec::new(),
    };

    if let (Some(overlay), Some(edges)) = (overlay.as_mut(), unpacked_edges) {
        overlay.on_path = edges;
    }

    stats.nodes_settled = fwd.num_settled() + bwd.num_settled();
    stats.finish();

    match distance {
        Some(weight) => {
            debug!("Path found: {:?}", path);
            info!("{}, weight: {}", stats, weight);
        }
        None => info!("No path found: {}", stats),
    }

    Ok(ShortestPathResult {
        distance,
        path,
        settled_fwd: fwd.into_settled(),
        settled_bwd: bwd.into_settled(),
        distances: None,
        overlay,
        stats,
    })
}

/// Dijkstra from `source` to every node. `Direction::Backward` runs on the
/// reverse graph and yields the distances of all nodes *to* `source`.
pub fn one_to_all(
    graph: &Graph,
    source: NodeIndex,
    dir: Direction,
) -> Result<ShortestPathResult, SearchError> {
    let mut stats = SearchStats::default();
    stats.init();

    let tree = shortest_path_tree(graph, source, dir)?;
    let settled = tree.settled().to_vec();

    stats.nodes_settled = settled.len();
    stats.finish();
    debug!("One-to-all {:?} from {:?}: {}", dir, source, stats);

    let (settled_fwd, settled_bwd) = match dir {
        Direction::Forward => (settled, Vec::new()),
        Direction::Backward => (Vec::new(), settled),
    };

    Ok(ShortestPathResult {
        distance: None,
        path: Vec::new(),
        settled_fwd,
        settled_bwd,
        distances: Some(tree.into_distances()),
        overlay: None,
        stats,
    })
}

/// Exhaustive Dijkstra from `root`. The returned state holds the distances,
/// the tree predecessors and the settle order, so parents always come before
/// their children.
pub(crate) fn shortest_path_tree(
    graph: &Graph,
    root: NodeIndex,
    dir: Direction,
) -> Result<SearchState, SearchError> {
    check_bounds(graph, root)?;

    let mut ctx = QueryContext::new(graph, root, root, &[dir], false);
    run_unidirectional(&mut ctx, &DijkstraStrategy, dir, None);

    let (fwd, bwd, _) = ctx.into_states();
    Ok(match dir {
        Direction::Forward => fwd,
        Direction::Backward => bwd,
    })
}

fn run_unidirectional<S: SearchStrategy + ?Sized>(
    ctx: &mut QueryContext<'_>,
    strategy: &S,
    dir: Direction,
    target: Option<NodeIndex>,
) {
    let root = match dir {
        Direction::Forward => ctx.source,
        Direction::Backward => ctx.target,
    };
    ctx.init_root(strategy, root, dir);

    while let Some((node, _)) = ctx.state_mut(dir).frontier.pop_min() {
        ctx.state_mut(dir).settle(node);

        if Some(node) == target {
            ctx.best = ctx.state(dir).distance(node);
            ctx.meeting = Some(node);
            break;
        }

        scan(ctx, strategy, node, dir);

        if strategy.terminate(ctx) {
            break;
        }
    }
}

fn run_bidirectional<S: SearchStrategy + ?Sized>(ctx: &mut QueryContext<'_>, strategy: &S) {
    let (source, target) = (ctx.source, ctx.target);
    ctx.init_root(strategy, source, Direction::Forward);
    ctx.init_root(strategy, target, Direction::Backward);

    loop {
        if ctx.state(Direction::Forward).frontier.is_empty()
            && ctx.state(Direction::Backward).frontier.is_empty()
        {
            break;
        }

        if strategy.terminate(ctx) {
            break;
        }

        let mut dir = strategy.alternate(ctx);
        if ctx.state(dir).frontier.is_empty() {
            dir = dir.opposite();
        }

        let Some((node, _)) = ctx.state_mut(dir).frontier.pop_min() else {
            break;
        };
        ctx.last_direction = dir;
        ctx.state_mut(dir).settle(node);

        let other = ctx.state(dir.opposite()).distance(node);
        if other.is_finite() {
            let length = ctx.state(dir).distance(node) + other;
            ctx.offer_meeting(node, length);
        }

        scan(ctx, strategy, node, dir);
    }
}

fn scan<S: SearchStrategy + ?Sized>(
    ctx: &mut QueryContext<'_>,
    strategy: &S,
    node: NodeIndex,
    dir: Direction,
) {
    let graph = ctx.graph;
    for hop in graph.hops(node, dir) {
        if !strategy.uses_shortcuts() && graph.is_shortcut(hop.edge) {
            continue;
        }
        strategy.relax(ctx, node, hop, dir);
    }
}

/// Edges of the found path in travel order: the forward predecessor chain up
/// to the meeting node followed by the backward chain down to the target.
fn path_edges(ctx: &QueryContext<'_>, meeting: NodeIndex) -> Vec<EdgeIndex> {
    let mut edges = Vec::new();

    let mut node = meeting;
    while let Some((prev, edge)) = ctx.state(Direction::Forward).predecessor(node) {
        edges.push(edge);
        node = prev;
    }
    edges.reverse();

    let mut node = meeting;
    while let Some((next, edge)) = ctx.state(Direction::Backward).predecessor(node) {
        edges.push(edge);
        node = next;
    }

    edges
}
