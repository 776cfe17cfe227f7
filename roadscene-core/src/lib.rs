//! Road routing over a city street graph, with incident overlays and
//! dashboard aggregates for the traffic, construction and collision datasets.

pub mod analytics;
pub mod error;
pub mod geocoding;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod scene;

pub use error::Error;
pub use geocoding::{GeocodeResult, GeocodeStatus, UnresolvedReason};
pub use loading::{CityModelConfig, create_city_model};
pub use model::{CityModel, RoadNetwork, RoadNetworkBuilder};
pub use routing::{PlannedRoute, Route, plan_route, shortest_path};
pub use scene::{Scene, SceneOptions};
