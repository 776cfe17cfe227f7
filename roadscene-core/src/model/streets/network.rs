//! Road graph with a spatial index for nearest-node lookup

use geo::{Distance, Haversine, Point};
use hashbrown::HashMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use rstar::{RTree, primitives::GeomWithData};

use super::components::{RoadEdge, RoadNode};
use crate::Error;

/// R-tree entry: node position on the unit sphere (earth-centred x, y, z),
/// tagged with its index
pub type IndexedPoint = GeomWithData<[f64; 3], NodeIndex>;

/// Result of snapping an arbitrary point to the road network
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappedNode {
    pub node: NodeIndex,
    /// Great-circle distance from the query point to the node, metres
    pub distance_m: f64,
}

/// Directed road graph, loaded once and never mutated afterwards.
///
/// Nodes are indexed as unit-sphere vectors. Chord length grows strictly with
/// great-circle distance, so the R-tree's Euclidean search returns the node
/// nearest by haversine distance on any extent.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    pub graph: DiGraph<RoadNode, RoadEdge>,
    rtree: RTree<IndexedPoint>,
    id_index: HashMap<String, NodeIndex>,
}

impl RoadNetwork {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node(&self, index: NodeIndex) -> Option<&RoadNode> {
        self.graph.node_weight(index)
    }

    pub fn node_by_id(&self, id: &str) -> Option<NodeIndex> {
        self.id_index.get(id).copied()
    }

    /// Node identifier as written in the graph file, or the raw index for
    /// out-of-range inputs
    pub fn node_label(&self, index: NodeIndex) -> String {
        self.node(index)
            .map_or_else(|| format!("#{}", index.index()), |n| n.id.clone())
    }

    /// Finds the node closest to `point`. Returns `None` only for an empty network.
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<SnappedNode> {
        let query = unit_vector(point);
        self.rtree.nearest_neighbor(&query).map(|entry| {
            let node = entry.data;
            let distance_m = Haversine.distance(*point, self.graph[node].geometry);
            SnappedNode { node, distance_m }
        })
    }

    /// Cheapest weight among the (possibly parallel) edges from `from` to `to`
    pub fn edge_weight(&self, from: NodeIndex, to: NodeIndex) -> Option<f64> {
        self.graph
            .edges_connecting(from, to)
            .map(|edge| edge.weight().weight)
            .min_by(f64::total_cmp)
    }

    /// Iterates over all edges as (source, target) node pairs, in edge order
    pub fn segments(&self) -> impl Iterator<Item = (&RoadNode, &RoadNode)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (&self.graph[edge.source()], &self.graph[edge.target()]))
    }
}

fn unit_vector(point: &Point<f64>) -> [f64; 3] {
    let (lat, lon) = (point.y().to_radians(), point.x().to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Builds a [`RoadNetwork`] node by node, validating ids and weights
#[derive(Debug, Default)]
pub struct RoadNetworkBuilder {
    graph: DiGraph<RoadNode, RoadEdge>,
    id_index: HashMap<String, NodeIndex>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate id or on coordinates outside the WGS-84 range.
    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Result<NodeIndex, Error> {
        let id = id.into();
        if !crate::geocoding::is_valid_coordinate(lat, lon) {
            return Err(Error::InvalidData(format!(
                "node {id} has invalid coordinates ({lat}, {lon})"
            )));
        }
        if self.id_index.contains_key(&id) {
            return Err(Error::InvalidData(format!("duplicate node id {id}")));
        }

        let index = self.graph.add_node(RoadNode {
            id: id.clone(),
            geometry: Point::new(lon, lat),
        });
        self.id_index.insert(id, index);
        Ok(index)
    }

    /// Adds a directed edge.
    ///
    /// # Errors
    ///
    /// Fails if either endpoint is unknown or the weight is negative or not finite.
    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        weight: f64,
    ) -> Result<EdgeIndex, Error> {
        if from.index() >= self.graph.node_count() || to.index() >= self.graph.node_count() {
            return Err(Error::InvalidNodeIndex);
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidData(format!(
                "edge {} -> {} has unusable weight {weight}",
                self.graph[from].id, self.graph[to].id
            )));
        }
        Ok(self.graph.add_edge(from, to, RoadEdge { weight }))
    }

    pub fn node_by_id(&self, id: &str) -> Option<NodeIndex> {
        self.id_index.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn build(self) -> RoadNetwork {
        let entries: Vec<IndexedPoint> = self
            .graph
            .node_indices()
            .map(|index| GeomWithData::new(unit_vector(&self.graph[index].geometry), index))
            .collect();

        RoadNetwork {
            rtree: RTree::bulk_load(entries),
            graph: self.graph,
            id_index: self.id_index,
        }
    }
}
