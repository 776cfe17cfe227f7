use geo::{ConvexHull, Intersects, MultiPoint};
use log::info;

use super::boroughs::BoroughBoundaries;
use super::config::CityModelConfig;
use super::datasets::{load_collisions, load_construction, load_traffic};
use super::graphml::load_graphml;
use super::layers::build_incident_layers;
use crate::Error;
use crate::model::{CityModel, Datasets, IncidentLayers, RoadNetwork};

/// Creates the city model based on the provided configuration
///
/// # Errors
///
/// Returns an error if any input is missing or cannot be parsed. A partially
/// loaded model is never returned.
pub fn create_city_model(config: &CityModelConfig) -> Result<CityModel, Error> {
    validate_config(config)?;

    info!("Processing road network (GraphML): {}", config.graph_path.display());

    // The graph file is the largest input; parse it while the CSVs are read
    let graph_path = config.graph_path.clone();
    let weight_attribute = config.weight_attribute.clone();
    let graph_handle = std::thread::spawn(move || load_graphml(&graph_path, &weight_attribute));

    info!("Processing incident datasets (CSV)");
    let datasets = load_datasets(config)?;

    let road_network = graph_handle
        .join()
        .map_err(|_| Error::InvalidData("graph loading thread panicked".to_string()))??;

    let layers = build_incident_layers(&datasets, None);
    validate_network_incident_overlap(&road_network, &layers);

    let model = CityModel::new(road_network, datasets, layers);
    info!("{}", model.summary());

    // Parsing the GraphML document allocates far more than the model keeps.
    // Hand the freed tail of the heap back to the system.
    //
    // # Safety
    //
    // This call is safe to use on linux with glibc implementation
    // which is checked by the cfg attribute in compile time.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    unsafe {
        if libc::malloc_trim(0) == 0 {
            log::warn!("Memory trimming failed - continuing anyway");
        } else {
            log::debug!("Successfully trimmed unused heap memory");
        }
    }
    Ok(model)
}

fn load_datasets(config: &CityModelConfig) -> Result<Datasets, Error> {
    let boundaries = config
        .boroughs_path
        .as_deref()
        .map(|path| BoroughBoundaries::load(path, &config.borough_name_property))
        .transpose()?;

    let (traffic, (construction, collisions)) = rayon::join(
        || load_traffic(&config.traffic_path, boundaries.as_ref()),
        || {
            rayon::join(
                || load_construction(&config.construction_path),
                || load_collisions(&config.collision_path),
            )
        },
    );

    Ok(Datasets {
        traffic: traffic?,
        construction: construction?,
        collisions: collisions?,
    })
}

fn validate_config(config: &CityModelConfig) -> Result<(), Error> {
    let required = [
        ("Graph file", &config.graph_path),
        ("Traffic dataset", &config.traffic_path),
        ("Construction dataset", &config.construction_path),
        ("Collision dataset", &config.collision_path),
    ];

    for (label, path) in required.into_iter().chain(
        config
            .boroughs_path
            .as_ref()
            .map(|path| ("Borough boundaries", path)),
    ) {
        if !path.exists() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{label} not found: {}", path.display()),
            )));
        }
    }

    if config.weight_attribute.trim().is_empty() {
        return Err(Error::InvalidData(
            "weight_attribute must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn validate_network_incident_overlap(network: &RoadNetwork, layers: &IncidentLayers) {
    if network.is_empty() || layers.is_empty() {
        return;
    }

    let network_nodes: MultiPoint = network
        .graph
        .node_weights()
        .map(|node| node.geometry)
        .collect();
    let network_hull = network_nodes.convex_hull();

    let markers_outside_hull = layers
        .iter()
        .flat_map(|(_, records)| records.iter())
        .filter(|record| !record.location.intersects(&network_hull))
        .count();

    let total_markers = layers.len();

    let percentage = (markers_outside_hull as f64 / total_markers as f64) * 100.0;
    if markers_outside_hull > 0 {
        log::warn!(
            "{markers_outside_hull} of {total_markers} incident markers ({percentage:.1}%) \
             are outside the road network coverage area. They will be drawn, but no route \
             can pass near them."
        );
    }
}
