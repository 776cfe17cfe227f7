//! Data model for route planning over a city road network
//!
//! Contains the road graph, the incident layers and the source datasets.

pub mod city_model;
pub mod datasets;
pub mod incidents;
pub mod streets;

pub use city_model::CityModel;
pub use datasets::{CasualtyCounts, CollisionReport, ConstructionProject, Datasets, TrafficCount};
pub use incidents::{IncidentLayer, IncidentLayers, IncidentRecord};
pub use streets::{RoadEdge, RoadNetwork, RoadNetworkBuilder, RoadNode, SnappedNode};
