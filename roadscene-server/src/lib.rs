//! HTTP front end for the route finder and the incident dashboard

pub mod config;
pub mod error;
pub mod geocoder;
pub mod render;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use routes::build_router;
pub use state::AppState;
