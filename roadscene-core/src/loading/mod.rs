//! This module is responsible for loading the road graph and the incident
//! datasets and building the city model from them.

pub mod boroughs;
mod builder;
mod config;
pub mod datasets;
pub mod graphml;
pub mod layers;

pub use boroughs::BoroughBoundaries;
pub use builder::create_city_model;
pub use config::CityModelConfig;
pub use datasets::IngestStats;
pub use layers::build_incident_layers;
