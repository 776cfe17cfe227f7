use std::collections::BinaryHeap;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use ordered_float::OrderedFloat;
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use super::state::State;
use crate::Error;
use crate::model::RoadNetwork;
use crate::routing::Route;

/// Minimum-total-weight path from `source` to `target` over directed edges.
///
/// Ties between equal-cost paths are broken by node index, so the same inputs
/// always give the same node sequence.
///
/// # Errors
///
/// - [`Error::InvalidNodeIndex`] if either index is outside the network
/// - [`Error::NoPath`] if `target` is unreachable from `source`
pub fn shortest_path(
    network: &RoadNetwork,
    source: NodeIndex,
    target: NodeIndex,
) -> Result<Route, Error> {
    check_index(network, source)?;
    check_index(network, target)?;

    if source == target {
        return Ok(Route::new(vec![source], 0.0));
    }

    let estimated_nodes = network.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, OrderedFloat<f64>> =
        HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    distances.insert(source, OrderedFloat(0.0));
    heap.push(State {
        cost: OrderedFloat(0.0),
        node: source,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if node == target {
            return Ok(Route::new(
                reconstruct(&predecessors, source, target),
                cost.into_inner(),
            ));
        }

        // Stale heap entry
        if distances.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }

        relax(network, node, cost, &mut distances, &mut heap, Some(&mut predecessors));
    }

    Err(Error::NoPath {
        from: network.node_label(source),
        to: network.node_label(target),
    })
}

/// Shortest-path weights from `source` to every reachable node
///
/// # Errors
///
/// Returns [`Error::InvalidNodeIndex`] if `source` is outside the network.
pub fn shortest_path_weights(
    network: &RoadNetwork,
    source: NodeIndex,
) -> Result<HashMap<NodeIndex, f64>, Error> {
    check_index(network, source)?;

    let mut distances: HashMap<NodeIndex, OrderedFloat<f64>> =
        HashMap::with_capacity(network.node_count());
    let mut heap = BinaryHeap::new();

    distances.insert(source, OrderedFloat(0.0));
    heap.push(State {
        cost: OrderedFloat(0.0),
        node: source,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if distances.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }
        relax(network, node, cost, &mut distances, &mut heap, None);
    }

    Ok(distances
        .into_iter()
        .map(|(node, cost)| (node, cost.into_inner()))
        .collect())
}

fn relax(
    network: &RoadNetwork,
    node: NodeIndex,
    cost: OrderedFloat<f64>,
    distances: &mut HashMap<NodeIndex, OrderedFloat<f64>>,
    heap: &mut BinaryHeap<State>,
    mut predecessors: Option<&mut HashMap<NodeIndex, NodeIndex>>,
) {
    for edge in network.graph.edges(node) {
        let next = edge.target();
        let next_cost = cost + edge.weight().weight;

        let improved = match distances.entry(next) {
            Entry::Vacant(entry) => {
                entry.insert(next_cost);
                true
            }
            Entry::Occupied(mut entry) => {
                if next_cost < *entry.get() {
                    *entry.get_mut() = next_cost;
                    true
                } else {
                    false
                }
            }
        };

        if improved {
            heap.push(State {
                cost: next_cost,
                node: next,
            });
            if let Some(predecessors) = predecessors.as_deref_mut() {
                predecessors.insert(next, node);
            }
        }
    }
}

fn reconstruct(
    predecessors: &HashMap<NodeIndex, NodeIndex>,
    source: NodeIndex,
    target: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = vec![target];
    let mut current = target;
    while current != source {
        match predecessors.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

fn check_index(network: &RoadNetwork, index: NodeIndex) -> Result<(), Error> {
    if index.index() < network.node_count() {
        Ok(())
    } else {
        Err(Error::InvalidNodeIndex)
    }
}
