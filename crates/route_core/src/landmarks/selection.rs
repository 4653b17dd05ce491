use std::collections::VecDeque;

use log::debug;
use rand::{rngs::StdRng, seq::index::sample, Rng};

use crate::{
    control::Control,
    error::PreprocessError,
    graph::{node_index, Graph, NodeIndex},
};

pub(super) fn random(num_nodes: usize, count: usize, rng: &mut StdRng) -> Vec<NodeIndex> {
    sample(rng, num_nodes, count)
        .into_iter()
        .map(node_index)
        .collect()
}

/// Farthest point selection on unweighted hop distances, edges are followed
/// in both directions. The first landmark is the node farthest from a random
/// start node, every further one maximizes its minimum hop distance to the
/// landmarks chosen so far. Unreachable nodes count as infinitely far away, so
/// every component gets a landmark before any component gets a second one.
pub(super) fn farthest(
    graph: &Graph,
    count: usize,
    rng: &mut StdRng,
    control: &mut Control,
) -> Result<Vec<NodeIndex>, PreprocessError> {
    let n = graph.num_nodes();
    let start = node_index(rng.gen_range(0..n));

    let mut min_hops = bfs_hops(graph, start);
    let mut selected = vec![false; n];
    let mut landmarks = Vec::with_capacity(count);

    while landmarks.len() < count {
        if control.is_cancelled() {
            return Err(PreprocessError::Cancelled);
        }

        // Ties go to the smallest node id
        let Some(next) = (0..n)
            .filter(|v| !selected[*v])
            .max_by(|a, b| min_hops[*a].cmp(&min_hops[*b]).then(b.cmp(a)))
        else {
            break;
        };

        debug!("Farthest landmark {} at {} hops", next, min_hops[next]);
        selected[next] = true;
        landmarks.push(node_index(next));
        control.report(landmarks.len(), count);

        let hops = bfs_hops(graph, node_index(next));
        // The start node is not a landmark, distances to it are dropped
        if landmarks.len() == 1 {
            min_hops = hops;
        } else {
            for (current, h) in min_hops.iter_mut().zip(hops) {
                *current = (*current).min(h);
            }
        }
    }

    Ok(landmarks)
}

/// Hop distance from `root` to every node, `usize::MAX` if unreachable.
fn bfs_hops(graph: &Graph, root: NodeIndex) -> Vec<usize> {
    let mut hops = vec![usize::MAX; graph.num_nodes()];
    let mut queue = VecDeque::new();

    hops[root.index()] = 0;
    queue.push_back(root);

    while let Some(node) = queue.pop_front() {
        let next = hops[node.index()] + 1;
        let outgoing = graph.neighbors_outgoing(node).map(|(_, e)| e.target);
        let incoming = graph.neighbors_incoming(node).map(|(_, e)| e.source);

        for neighbor in outgoing.chain(incoming) {
            if hops[neighbor.index()] == usize::MAX {
                hops[neighbor.index()] = next;
                queue.push_back(neighbor);
            }
        }
    }

    hops
}
