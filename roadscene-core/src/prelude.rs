// Re-export key components
pub use crate::analytics::{DashboardOverview, dashboard_overview};
pub use crate::error::Error;
pub use crate::geocoding::{GeocodeResult, GeocodeStatus, UnresolvedReason};
pub use crate::loading::{CityModelConfig, build_incident_layers, create_city_model};
pub use crate::model::{
    CityModel, Datasets, IncidentLayer, IncidentLayers, IncidentRecord, RoadNetwork,
    RoadNetworkBuilder, SnappedNode,
};
pub use crate::routing::{PlannedRoute, Route, RouteEndpoint, plan_route, shortest_path};
pub use crate::scene::{LayerId, Scene, SceneOptions, StyleTable, compose_scene};
