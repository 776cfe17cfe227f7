//! Shortest-path routing over the road network

mod dijkstra;
mod planner;
mod route;

pub use dijkstra::{shortest_path, shortest_path_weights};
pub use planner::{PlannedRoute, RouteEndpoint, plan_route};
pub use route::Route;
