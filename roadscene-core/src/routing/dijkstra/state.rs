use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use petgraph::graph::NodeIndex;

#[derive(Copy, Clone, Eq, PartialEq)]
pub(super) struct State {
    pub(super) cost: OrderedFloat<f64>,
    pub(super) node: NodeIndex,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost, lowest node index first on equal cost
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
