//! The immutable context shared by every request

use super::datasets::Datasets;
use super::incidents::IncidentLayers;
use super::streets::RoadNetwork;

/// Road network, source datasets and prebuilt incident layers.
///
/// Built once by [`crate::create_city_model`] before the server starts
/// accepting requests; nothing mutates it afterwards, so it is shared between
/// handlers without locking.
#[derive(Debug, Clone)]
pub struct CityModel {
    pub road_network: RoadNetwork,
    pub datasets: Datasets,
    pub layers: IncidentLayers,
}

impl CityModel {
    pub fn new(road_network: RoadNetwork, datasets: Datasets, layers: IncidentLayers) -> Self {
        Self {
            road_network,
            datasets,
            layers,
        }
    }

    pub fn node_count(&self) -> usize {
        self.road_network.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.road_network.edge_count()
    }

    pub fn summary(&self) -> String {
        format!(
            "CityModel with {} nodes, {} edges, {} traffic, {} construction and {} collision markers",
            self.node_count(),
            self.edge_count(),
            self.layers.traffic.len(),
            self.layers.construction.len(),
            self.layers.collision.len()
        )
    }
}
