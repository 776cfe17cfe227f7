//! Server configuration, read from a TOML file

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use roadscene_core::CityModelConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub data: CityModelConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
    /// Requests handled at once; further requests wait for a free slot
    pub max_concurrent_requests: usize,
    /// Default `tracing` filter; `RUST_LOG` takes precedence
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            request_timeout_secs: 60,
            max_concurrent_requests: 1,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderProvider {
    #[default]
    Nominatim,
    /// Fixed address table from `[geocoder.places]`, for offline use
    Static,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub provider: GeocoderProvider,
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Comma-separated ISO 3166-1 alpha-2 codes limiting Nominatim results
    pub country_codes: Option<String>,
    /// Preferred search area as `[min_lon, min_lat, max_lon, max_lat]`
    pub viewbox: Option<[f64; 4]>,
    /// Only accept results inside `viewbox`
    pub bounded: bool,
    /// Address -> `[lat, lon]`
    pub places: BTreeMap<String, [f64; 2]>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            provider: GeocoderProvider::Nominatim,
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("roadscene/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
            country_codes: None,
            viewbox: None,
            bounded: false,
            places: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub draw_road_network: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            draw_road_network: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Calendar year of the traffic counts and collisions on the dashboard map
    pub year: i32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { year: 2022 }
    }
}

impl AppConfig {
    /// Reads the configuration file. Relative data paths are resolved against
    /// the directory containing it.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        let data = &mut self.data;
        resolve(&mut data.graph_path);
        resolve(&mut data.traffic_path);
        resolve(&mut data.construction_path);
        resolve(&mut data.collision_path);
        if let Some(path) = data.boroughs_path.as_mut() {
            resolve(path);
        }
    }
}
