use std::sync::Arc;

use geo::Point;
use geojson::FeatureCollection;
use roadscene_core::analytics::{DashboardOverview, dashboard_overview};
use roadscene_core::loading::build_incident_layers;
use roadscene_core::scene::{DEFAULT_CENTER, SceneOptions, StyleTable, compose_incident_scene};
use roadscene_core::{CityModel, Error};

use crate::config::AppConfig;
use crate::geocoder::Geocoder;

/// Everything the handlers share. Built once at startup and read-only after.
pub struct AppState {
    pub model: CityModel,
    pub geocoder: Arc<dyn Geocoder>,
    pub scene_options: SceneOptions,
    pub dashboard: DashboardState,
}

pub struct DashboardState {
    pub year: i32,
    pub overview: DashboardOverview,
    /// Year-filtered incident markers
    pub map: FeatureCollection,
}

impl AppState {
    /// # Errors
    ///
    /// Fails if the dashboard map cannot be encoded as `GeoJSON`.
    pub fn new(
        model: CityModel,
        geocoder: Arc<dyn Geocoder>,
        config: &AppConfig,
    ) -> Result<Self, Error> {
        let dashboard = DashboardState::build(&model, config.dashboard.year)?;
        Ok(Self {
            model,
            geocoder,
            scene_options: SceneOptions {
                draw_road_network: config.scene.draw_road_network,
                styles: StyleTable::default(),
            },
            dashboard,
        })
    }
}

impl DashboardState {
    fn build(model: &CityModel, year: i32) -> Result<Self, Error> {
        let layers = build_incident_layers(&model.datasets, Some(year));
        tracing::info!(
            "Dashboard map for {year}: {} traffic, {} construction, {} collision markers",
            layers.traffic.len(),
            layers.construction.len(),
            layers.collision.len()
        );
        let center = Point::new(DEFAULT_CENTER.1, DEFAULT_CENTER.0);
        let map = compose_incident_scene(&layers, center, &StyleTable::default()).to_geojson()?;

        Ok(Self {
            year,
            overview: dashboard_overview(&model.datasets),
            map,
        })
    }
}
