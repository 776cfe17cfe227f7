//! Road network components - nodes and edges

use geo::Point;

/// Road graph node (an intersection or a shape point of a segment)
#[derive(Debug, Clone, PartialEq)]
pub struct RoadNode {
    /// Identifier assigned by the graph file (OSM id for osmnx exports)
    pub id: String,
    /// Node coordinates, x = longitude, y = latitude
    pub geometry: Point<f64>,
}

impl RoadNode {
    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }
}

/// Road graph edge (street segment)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadEdge {
    /// Non-negative, finite traversal cost as read from the graph file
    pub weight: f64,
}
