use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    edge,
    graph::{node_index, Graph, Node},
    util::math::haversine_km,
};

// Test fixtures only ever use valid endpoints and weights.
fn add(g: &mut Graph, edges: Vec<crate::graph::Edge>) {
    g.add_edges(edges).expect("fixture edges are valid");
}

pub fn generate_complex_graph() -> Graph {
    let mut graph = Graph::new();

    let a = graph.add_node(Node::new(0, 6.0, 2.0));
    let b = graph.add_node(Node::new(1, 3.0, 3.0));
    let c = graph.add_node(Node::new(2, 4.0, 6.0));
    let d = graph.add_node(Node::new(3, 2.0, 7.0));
    let e = graph.add_node(Node::new(4, 3.0, 10.0));
    let f = graph.add_node(Node::new(5, 2.0, 13.0));
    let g = graph.add_node(Node::new(6, 7.0, 15.0));
    let h = graph.add_node(Node::new(7, 5.0, 12.0));
    let i = graph.add_node(Node::new(8, 7.0, 11.0));
    let j = graph.add_node(Node::new(9, 5.0, 9.0));
    let k = graph.add_node(Node::new(10, 7.0, 7.0));

    add(&mut graph, edge!(a, b, 3.0)); // A <=> B
    add(&mut graph, edge!(a, c, 5.0)); // A <=> C
    add(&mut graph, edge!(a, k, 3.0)); // A <=> K

    add(&mut graph, edge!(b, d, 5.0)); // B <=> D
    add(&mut graph, edge!(b, c, 3.0)); // B <=> C

    add(&mut graph, edge!(c, d, 2.0)); // C <=> D
    add(&mut graph, edge!(c, j, 2.0)); // C <=> J

    add(&mut graph, edge!(d, j, 4.0)); // D <=> J
    add(&mut graph, edge!(d, e, 7.0)); // D <=> E

    add(&mut graph, edge!(e, j, 3.0)); // E <=> J
    add(&mut graph, edge!(e, f, 6.0)); // E <=> F

    add(&mut graph, edge!(f, h, 2.0)); // F <=> H
    add(&mut graph, edge!(f, g, 4.0)); // F <=> G

    add(&mut graph, edge!(g, h, 3.0)); // G <=> H
    add(&mut graph, edge!(g, i, 5.0)); // G <=> I

    add(&mut graph, edge!(h, i, 3.0)); // H <=> I
    add(&mut graph, edge!(h, j, 2.0)); // H <=> J

    add(&mut graph, edge!(i, j, 4.0)); // I <=> J
    add(&mut graph, edge!(i, k, 6.0)); // I <=> K

    add(&mut graph, edge!(j, k, 3.0)); // J <=> K

    graph
}

pub fn generate_simple_graph() -> Graph {
    //           B
    //           |
    // E -> A -> C
    //      |  /
    //      D
    let mut g = Graph::new();

    let a = g.add_node(Node::new(0, 0.0, 0.0));
    let b = g.add_node(Node::new(1, 0.0, 0.0));
    let c = g.add_node(Node::new(2, 0.0, 0.0));
    let d = g.add_node(Node::new(3, 0.0, 0.0));
    let e = g.add_node(Node::new(4, 0.0, 0.0));

    add(&mut g, vec![edge!(a => c, 1.0)]);
    add(&mut g, vec![edge!(a => d, 1.0)]);
    add(&mut g, vec![edge!(e => a, 1.0)]);
    add(&mut g, edge!(c, b, 1.0));
    add(&mut g, edge!(c, d, 1.0));

    g
}

/// Five node example with the unique shortest path 0 -> 2 -> 1 -> 3 -> 4 of length 7.
pub fn generate_example_graph() -> Graph {
    let mut g = Graph::new();
    for i in 0..5 {
        g.add_node(Node::new(i, 0.0, 0.0));
    }

    let edges = [
        (0, 1, 4.0),
        (0, 2, 1.0),
        (2, 1, 2.0),
        (1, 3, 1.0),
        (2, 3, 5.0),
        (3, 4, 3.0),
    ];
    for (s, t, w) in edges {
        add(&mut g, vec![edge!(node_index(s) => node_index(t), w)]);
    }

    g
}

/// Two disconnected chains: 0 -> 1 -> 2 and 3 -> 4 -> 5
pub fn generate_disconnected_graph() -> Graph {
    let mut g = Graph::new();
    for i in 0..6 {
        g.add_node(Node::new(i, 0.0, 0.0));
    }

    add(&mut g, vec![edge!(node_index(0) => node_index(1), 1.0)]);
    add(&mut g, vec![edge!(node_index(1) => node_index(2), 1.0)]);
    add(&mut g, vec![edge!(node_index(3) => node_index(4), 3.0)]);
    add(&mut g, vec![edge!(node_index(4) => node_index(5), 1.0)]);

    g
}

/// Complete graph on `n` nodes placed on a line, `w(i, j) = |i - j|`.
/// Every landmark at one end of the line covers every edge.
pub fn generate_line_metric_graph(n: usize) -> Graph {
    let mut g = Graph::new();
    for i in 0..n {
        g.add_node(Node::new(i, 0.0, i as f64));
    }

    for i in 0..n {
        for j in 0..n {
            if i != j {
                let w = (i as f64 - j as f64).abs();
                add(&mut g, vec![edge!(node_index(i) => node_index(j), w)]);
            }
        }
    }

    g
}

/// Directed `width x height` grid around Munich. Each direction of a grid
/// edge gets its own weight of at least the great circle distance in km, so
/// `StraightLine::new(&g, 1.0)` is admissible. About 10 % of the directed
/// edges are dropped to make the graph asymmetric.
pub fn generate_grid_graph(width: usize, height: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = Graph::with_capacity(width * height, 4 * width * height);

    for row in 0..height {
        for col in 0..width {
            g.add_node(Node::new(
                row * width + col,
                48.0 + row as f64 * 0.01,
                11.0 + col as f64 * 0.01,
            ));
        }
    }

    let connect = |g: &mut Graph, a: usize, b: usize, rng: &mut StdRng| {
        let km = haversine_km(&g.nodes[a], &g.nodes[b]);
        for (s, t) in [(a, b), (b, a)] {
            if rng.gen_bool(0.1) {
                continue;
            }
            let w = km * rng.gen_range(1.0..3.0);
            add(g, vec![edge!(node_index(s) => node_index(t), w)]);
        }
    };

    for row in 0..height {
        for col in 0..width {
            let v = row * width + col;
            if col + 1 < width {
                connect(&mut g, v, v + 1, &mut rng);
            }
            if row + 1 < height {
                connect(&mut g, v, v + width, &mut rng);
            }
        }
    }

    g
}
