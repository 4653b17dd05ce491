//! Lower bound estimates for goal directed search.
use crate::{
    constants::Weight,
    error::SearchError,
    graph::{Graph, NodeIndex},
    util::math::haversine_km,
};

/// Lower bound on the shortest path distance between two nodes.
pub trait Heuristic {
    fn estimate(&self, from: NodeIndex, to: NodeIndex) -> Weight;

    /// Checked once before a query on `graph` starts.
    fn ensure_valid_for(&self, _graph: &Graph) -> Result<(), SearchError> {
        Ok(())
    }
}

impl<H: Heuristic + ?Sized> Heuristic for &H {
    fn estimate(&self, from: NodeIndex, to: NodeIndex) -> Weight {
        (**self).estimate(from, to)
    }

    fn ensure_valid_for(&self, graph: &Graph) -> Result<(), SearchError> {
        (**self).ensure_valid_for(graph)
    }
}

/// Always 0, turns A* into Dijkstra.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _from: NodeIndex, _to: NodeIndex) -> Weight {
        0.0
    }
}

/// Great circle distance scaled to edge weight units.
///
/// Admissible as long as no edge is cheaper than `weight_per_km` times the
/// great circle distance between its endpoints, e.g. travel times in seconds
/// with `weight_per_km = 3600 / max_speed_kmh`.
#[derive(Debug, Clone, Copy)]
pub struct StraightLine<'a> {
    graph: &'a Graph,
    weight_per_km: Weight,
}

impl<'a> StraightLine<'a> {
    pub fn new(graph: &'a Graph, weight_per_km: Weight) -> Self {
        Self {
            graph,
            weight_per_km,
        }
    }

    /// Travel time in seconds at the given top speed.
    pub fn travel_time(graph: &'a Graph, max_speed_kmh: f64) -> Self {
        Self::new(graph, 3600.0 / max_speed_kmh)
    }
}

impl Heuristic for StraightLine<'_> {
    fn estimate(&self, from: NodeIndex, to: NodeIndex) -> Weight {
        match (self.graph.node(from), self.graph.node(to)) {
            (Some(a), Some(b)) => haversine_km(a, b) * self.weight_per_km,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{node_index, Node};

    use super::*;

    #[test]
    fn straight_line_scales_distance() {
        let mut g = Graph::new();
        g.add_node(Node::new(0, 48.0, 11.0));
        g.add_node(Node::new(1, 49.0, 11.0));

        let km = StraightLine::new(&g, 1.0).estimate(node_index(0), node_index(1));
        let secs =
            StraightLine::travel_time(&g, 100.0).estimate(node_index(0), node_index(1));

        assert!((km - 111.19).abs() < 0.01);
        assert!((secs - km * 36.0).abs() < 1e-9);
        assert_eq!(ZeroHeuristic.estimate(node_index(0), node_index(1)), 0.0);
    }
}
