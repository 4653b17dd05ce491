use crate::graph::NodeIndex;

/// Order in which [`NodeContractor`](crate::node_contraction::NodeContractor) contracts nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContractionStrategy<'a> {
    /// Contract in exactly this order, importances are never computed
    FixedOrder(&'a [NodeIndex]),
    /// Pop the least important node, recompute its importance and only
    /// contract it if it is still the minimum. Neighbours are re-keyed after
    /// every contraction.
    #[default]
    LazyUpdate,
    /// Like [`LazyUpdate`](Self::LazyUpdate) but neighbours keep their old
    /// keys, so the popped node's recomputation is the only correction.
    LazyUpdateSelf,
}

impl ContractionStrategy<'_> {
    pub fn is_lazy(&self) -> bool {
        matches!(
            self,
            ContractionStrategy::LazyUpdate | ContractionStrategy::LazyUpdateSelf
        )
    }

    pub fn updates_neighbors(&self) -> bool {
        matches!(self, ContractionStrategy::LazyUpdate)
    }
}
