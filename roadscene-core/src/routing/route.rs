use geo::{LineString, Point};
use petgraph::graph::NodeIndex;

use crate::Error;
use crate::model::RoadNetwork;

/// Relative tolerance when re-summing edge weights along a route
const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Node sequence of a shortest path together with its total weight
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    nodes: Vec<NodeIndex>,
    total_weight: f64,
}

impl Route {
    pub(crate) fn new(nodes: Vec<NodeIndex>, total_weight: f64) -> Self {
        Self {
            nodes,
            total_weight,
        }
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Number of nodes on the route
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn source(&self) -> Option<NodeIndex> {
        self.nodes.first().copied()
    }

    pub fn target(&self) -> Option<NodeIndex> {
        self.nodes.last().copied()
    }

    /// Node identifiers as they appear in the graph file
    pub fn node_ids(&self, network: &RoadNetwork) -> Vec<String> {
        self.nodes
            .iter()
            .map(|&node| network.node_label(node))
            .collect()
    }

    /// Node positions in route order
    pub fn points(&self, network: &RoadNetwork) -> Vec<Point<f64>> {
        self.nodes
            .iter()
            .filter_map(|&node| network.node(node).map(|n| n.geometry))
            .collect()
    }

    pub fn line_string(&self, network: &RoadNetwork) -> LineString<f64> {
        self.points(network).into_iter().collect()
    }

    /// Checks that consecutive nodes are joined by an edge and that the
    /// cheapest of those edges sum to the reported weight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] describing the first violation found.
    pub fn validate(&self, network: &RoadNetwork) -> Result<(), Error> {
        if self.nodes.is_empty() {
            return Err(Error::InvalidData("route has no nodes".to_string()));
        }

        let mut sum = 0.0;
        for pair in self.nodes.windows(2) {
            let weight = network.edge_weight(pair[0], pair[1]).ok_or_else(|| {
                Error::InvalidData(format!(
                    "no edge from {} to {}",
                    network.node_label(pair[0]),
                    network.node_label(pair[1])
                ))
            })?;
            sum += weight;
        }

        if (sum - self.total_weight).abs() > WEIGHT_TOLERANCE * self.total_weight.abs().max(1.0) {
            return Err(Error::InvalidData(format!(
                "route weight {} does not match edge sum {sum}",
                self.total_weight
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoadNetworkBuilder;

    fn line() -> (RoadNetwork, NodeIndex, NodeIndex, NodeIndex) {
        let mut builder = RoadNetworkBuilder::new();
        let a = builder.add_node("a", 40.0, -74.0).unwrap();
        let b = builder.add_node("b", 40.001, -74.0).unwrap();
        let c = builder.add_node("c", 40.002, -74.0).unwrap();
        builder.add_edge(a, b, 1.5).unwrap();
        builder.add_edge(a, b, 0.5).unwrap();
        builder.add_edge(b, c, 2.0).unwrap();
        (builder.build(), a, b, c)
    }

    #[test]
    fn validate_uses_cheapest_parallel_edge() {
        let (network, a, b, c) = line();
        Route::new(vec![a, b, c], 2.5).validate(&network).unwrap();
        assert!(Route::new(vec![a, b, c], 3.5).validate(&network).is_err());
    }

    #[test]
    fn validate_rejects_missing_edges() {
        let (network, a, _, c) = line();
        let err = Route::new(vec![a, c], 0.0).validate(&network).unwrap_err();
        assert!(err.to_string().contains("no edge from a to c"));
        assert!(Route::new(vec![], 0.0).validate(&network).is_err());
    }

    #[test]
    fn exposes_ids_and_geometry() {
        let (network, a, b, c) = line();
        let route = Route::new(vec![a, b, c], 2.5);
        assert_eq!(route.node_ids(&network), ["a", "b", "c"]);
        assert_eq!(route.line_string(&network).0.len(), 3);
        assert_eq!(route.source(), Some(a));
        assert_eq!(route.target(), Some(c));
    }
}
