//! Indexed min-priority queue over node ids.
use std::cmp::{Ordering, Reverse};

use priority_queue::PriorityQueue;

use crate::{
    constants::{Weight, EPSILON},
    graph::NodeIndex,
};

/// Priority of a frontier entry. Keys closer than [`EPSILON`] compare equal and
/// fall back to the node id, so pops are deterministic across runs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrontierKey {
    key: Weight,
    node: NodeIndex,
}

impl PartialEq for FrontierKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierKey {}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_key = if (self.key - other.key).abs() <= EPSILON {
            Ordering::Equal
        } else {
            self.key.total_cmp(&other.key)
        };
        by_key.then_with(|| self.node.cmp(&other.node))
    }
}

/// Min-priority frontier supporting arbitrary re-keying of queued nodes.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    queue: PriorityQueue<NodeIndex, Reverse<FrontierKey>>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node` or changes its key, whether the new key is lower or higher.
    pub fn push(&mut self, node: NodeIndex, key: Weight) {
        self.queue.push(node, Reverse(FrontierKey { key, node }));
    }

    /// Lowers the key of `node`, inserting it if absent. Returns `false` if
    /// the node was queued with a key that is not larger.
    pub fn decrease_key(&mut self, node: NodeIndex, key: Weight) -> bool {
        match self.key_of(node) {
            Some(old) if old <= key => false,
            _ => {
                self.push(node, key);
                true
            }
        }
    }

    pub fn pop_min(&mut self) -> Option<(NodeIndex, Weight)> {
        self.queue
            .pop()
            .map(|(node, Reverse(FrontierKey { key, .. }))| (node, key))
    }

    pub fn peek_min(&self) -> Option<(NodeIndex, Weight)> {
        self.queue
            .peek()
            .map(|(node, Reverse(FrontierKey { key, .. }))| (*node, *key))
    }

    /// Smallest queued key, `+∞` if the frontier is empty.
    pub fn min_key(&self) -> Weight {
        self.peek_min().map_or(Weight::INFINITY, |(_, key)| key)
    }

    pub fn key_of(&self, node: NodeIndex) -> Option<Weight> {
        self.queue
            .get_priority(&node)
            .map(|Reverse(FrontierKey { key, .. })| *key)
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.queue.get_priority(&node).is_some()
    }

    pub fn remove(&mut self, node: NodeIndex) -> Option<Weight> {
        self.queue
            .remove(&node)
            .map(|(_, Reverse(FrontierKey { key, .. }))| key)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::node_index;

    use super::*;

    #[test]
    fn pops_in_key_order() {
        let mut frontier = Frontier::new();
        frontier.push(node_index(0), 3.0);
        frontier.push(node_index(1), 1.0);
        frontier.push(node_index(2), 2.0);

        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.pop_min(), Some((node_index(1), 1.0)));
        assert_eq!(frontier.pop_min(), Some((node_index(2), 2.0)));
        assert_eq!(frontier.pop_min(), Some((node_index(0), 3.0)));
        assert_eq!(frontier.pop_min(), None);
        assert_eq!(frontier.min_key(), Weight::INFINITY);
    }

    #[test]
    fn rekey_in_both_directions() {
        let mut frontier = Frontier::new();
        frontier.push(node_index(0), 5.0);
        frontier.push(node_index(1), 4.0);

        // decrease
        frontier.push(node_index(0), 1.0);
        assert_eq!(frontier.peek_min(), Some((node_index(0), 1.0)));

        // increase
        frontier.push(node_index(0), 10.0);
        assert_eq!(frontier.peek_min(), Some((node_index(1), 4.0)));
        assert_eq!(frontier.key_of(node_index(0)), Some(10.0));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn decrease_key_never_raises() {
        let mut frontier = Frontier::new();
        assert!(frontier.decrease_key(node_index(3), 2.0));
        assert!(!frontier.decrease_key(node_index(3), 7.0));
        assert_eq!(frontier.key_of(node_index(3)), Some(2.0));
        assert!(frontier.decrease_key(node_index(3), 1.5));
        assert_eq!(frontier.key_of(node_index(3)), Some(1.5));
    }

    #[test]
    fn ties_break_by_node_id() {
        let mut frontier = Frontier::new();
        frontier.push(node_index(7), 1.0);
        frontier.push(node_index(2), 1.0 + 1e-16);
        frontier.push(node_index(5), 1.0);

        assert_eq!(frontier.pop_min().map(|(n, _)| n), Some(node_index(2)));
        assert_eq!(frontier.pop_min().map(|(n, _)| n), Some(node_index(5)));
        assert_eq!(frontier.pop_min().map(|(n, _)| n), Some(node_index(7)));
    }

    #[test]
    fn remove_and_contains() {
        let mut frontier = Frontier::new();
        frontier.push(node_index(1), 1.0);
        assert!(frontier.contains(node_index(1)));
        assert_eq!(frontier.remove(node_index(1)), Some(1.0));
        assert!(!frontier.contains(node_index(1)));
        assert!(frontier.is_empty());
    }
}
