use std::path::PathBuf;

use serde::Deserialize;

/// Locations of the read-only inputs the city model is built from
#[derive(Debug, Clone, Deserialize)]
pub struct CityModelConfig {
    /// Weighted road graph in GraphML format
    pub graph_path: PathBuf,
    pub traffic_path: PathBuf,
    pub construction_path: PathBuf,
    pub collision_path: PathBuf,
    /// Optional borough boundaries (GeoJSON polygons) used to place traffic counts
    #[serde(default)]
    pub boroughs_path: Option<PathBuf>,
    #[serde(default = "default_borough_name_property")]
    pub borough_name_property: String,
    /// Edge attribute holding the traversal cost
    #[serde(default = "default_weight_attribute")]
    pub weight_attribute: String,
}

impl CityModelConfig {
    pub fn new(
        graph_path: impl Into<PathBuf>,
        traffic_path: impl Into<PathBuf>,
        construction_path: impl Into<PathBuf>,
        collision_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            graph_path: graph_path.into(),
            traffic_path: traffic_path.into(),
            construction_path: construction_path.into(),
            collision_path: collision_path.into(),
            boroughs_path: None,
            borough_name_property: default_borough_name_property(),
            weight_attribute: default_weight_attribute(),
        }
    }

    #[must_use]
    pub fn with_boroughs(mut self, path: impl Into<PathBuf>) -> Self {
        self.boroughs_path = Some(path.into());
        self
    }
}

fn default_borough_name_property() -> String {
    "name".to_string()
}

fn default_weight_attribute() -> String {
    "weight".to_string()
}
