use log::debug;
use rand::{rngs::StdRng, Rng};

use crate::{
    constants::Weight,
    control::{Control, ProgressLog},
    error::PreprocessError,
    graph::{node_index, Direction, Graph, NodeIndex},
    search::{engine::shortest_path_tree, heuristic::Heuristic},
};

use super::LandmarkTable;

/// Grows `table` to `count` landmarks with the avoid policy.
///
/// Each round builds the shortest path tree of a random root and weighs every
/// node by how badly the current landmarks bound its tree distance. Subtrees
/// containing a landmark weigh nothing. The next landmark is the leaf reached
/// by walking from the heaviest node down the heaviest children.
pub(super) fn select(
    graph: &Graph,
    mut table: LandmarkTable,
    count: usize,
    rng: &mut StdRng,
    control: &mut Control,
) -> Result<LandmarkTable, PreprocessError> {
    let n = graph.num_nodes();
    let mut progress = ProgressLog::new("Avoid", 5.0);

    while table.len() < count {
        if control.is_cancelled() {
            return Err(PreprocessError::Cancelled);
        }

        let root = node_index(rng.gen_range(0..n));
        let landmark = match deepest_unexplained_leaf(graph, &table, root)? {
            Some(leaf) if !table.contains(leaf) => leaf,
            _ => random_unselected(&table, n, rng),
        };

        debug!("Avoid landmark {:?} from root {:?}", landmark, root);
        table.push(graph, landmark)?;
        control.report(table.len(), count);
        progress.tick(table.len(), count);
    }

    Ok(table)
}

fn deepest_unexplained_leaf(
    graph: &Graph,
    table: &LandmarkTable,
    root: NodeIndex,
) -> Result<Option<NodeIndex>, PreprocessError> {
    let n = graph.num_nodes();
    let tree = shortest_path_tree(graph, root, Direction::Forward)?;
    let order = tree.settled();
    let h = table.heuristic();

    let mut children: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    for node in order {
        if let Some((parent, _)) = tree.predecessor(*node) {
            children[parent.index()].push(*node);
        }
    }

    // Settle order lists parents before children, walking it backwards is a
    // post-order over the tree.
    let mut size: Vec<Weight> = vec![0.0; n];
    let mut has_landmark = vec![false; n];
    for node in order.iter().rev() {
        let v = node.index();
        let gap = (tree.distance(*node) - h.estimate(root, *node)).max(0.0);
        size[v] += gap;
        has_landmark[v] |= table.contains(*node);

        if has_landmark[v] {
            size[v] = 0.0;
        }

        if let Some((parent, _)) = tree.predecessor(*node) {
            size[parent.index()] += size[v];
            has_landmark[parent.index()] |= has_landmark[v];
        }
    }

    let Some(mut node) = order
        .iter()
        .copied()
        .filter(|v| size[v.index()] > 0.0)
        .max_by(|a, b| size[a.index()].total_cmp(&size[b.index()]).then(b.cmp(a)))
    else {
        return Ok(None);
    };

    while let Some(child) = children[node.index()]
        .iter()
        .copied()
        .filter(|c| !has_landmark[c.index()])
        .max_by(|a, b| size[a.index()].total_cmp(&size[b.index()]).then(b.cmp(a)))
    {
        node = child;
    }

    Ok(Some(node))
}

fn random_unselected(table: &LandmarkTable, n: usize, rng: &mut StdRng) -> NodeIndex {
    loop {
        let candidate = node_index(rng.gen_range(0..n));
        if !table.contains(candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::util::test_graphs::generate_grid_graph;

    #[test]
    fn chain_leaf_is_the_far_end() {
        // 0 -> 1 -> 2 -> 3
        let mut g = Graph::new();
        for i in 0..4 {
            g.add_node(crate::graph::Node::new(i, 0.0, 0.0));
        }
        for i in 0..3 {
            g.add_edge(crate::graph::Edge::new(node_index(i), node_index(i + 1), 1.0))
                .unwrap();
        }

        let table = LandmarkTable::empty(&g);
        let leaf = deepest_unexplained_leaf(&g, &table, node_index(0)).unwrap();
        assert_eq!(Some(node_index(3)), leaf);
    }

    #[test]
    fn explained_tree_yields_no_leaf() {
        // With a landmark at the root every tree distance is bounded exactly.
        let g = generate_grid_graph(5, 5, 8);
        let mut table = LandmarkTable::empty(&g);
        table.push(&g, node_index(12)).unwrap();

        let leaf = deepest_unexplained_leaf(&g, &table, node_index(12)).unwrap();
        assert_eq!(None, leaf);
    }

    #[test]
    fn select_extends_an_existing_table() {
        let g = generate_grid_graph(6, 6, 9);
        let mut table = LandmarkTable::empty(&g);
        table.push(&g, node_index(0)).unwrap();

        let mut rng = StdRng::seed_from_u64(2);
        let table = select(&g, table, 4, &mut rng, &mut Control::new()).unwrap();
        assert_eq!(4, table.len());
        assert_eq!(node_index(0), table.landmarks()[0]);
    }
}
