use std::path::PathBuf;

use roadscene_core::analytics::{
    collisions_per_borough, contributing_factor_frequencies, dashboard_overview,
    street_collision_count,
};
use roadscene_core::loading::build_incident_layers;
use roadscene_core::prelude::*;
use roadscene_core::scene::{LayerId, Shape};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn model() -> CityModel {
    let config = CityModelConfig::new(
        fixture("graph.graphml"),
        fixture("traffic.csv"),
        fixture("constructions.csv"),
        fixture("collisions.csv"),
    )
    .with_boroughs(fixture("boroughs.geojson"));
    create_city_model(&config).unwrap()
}

fn times_square() -> GeocodeResult {
    GeocodeResult::resolved("Times Square, NY", 40.7580, -73.9855)
}

fn central_park() -> GeocodeResult {
    GeocodeResult::resolved("Central Park, NY", 40.7829, -73.9654)
}

#[test]
fn loads_every_input() {
    let model = model();
    assert_eq!(model.node_count(), 6);
    assert_eq!(model.edge_count(), 8);

    assert_eq!(model.datasets.traffic.len(), 4);
    assert_eq!(model.datasets.construction.len(), 3);
    assert_eq!(model.datasets.collisions.len(), 5);

    assert_eq!(model.layers.traffic.len(), 3);
    assert_eq!(model.layers.construction.len(), 3);
    // the collision without a borough cannot be grouped
    assert_eq!(model.layers.collision.len(), 3);
}

#[test]
fn traffic_boroughs_come_from_boundaries() {
    let model = model();
    let boroughs: Vec<Option<&str>> = model
        .datasets
        .traffic
        .iter()
        .map(|count| count.borough.as_deref())
        .collect();
    assert_eq!(
        boroughs,
        [Some("Manhattan"), Some("Manhattan"), Some("Brooklyn"), Some("Manhattan")]
    );
}

#[test]
fn routes_between_connected_addresses() {
    let model = model();
    let planned = plan_route(&model, &times_square(), &central_park(), &SceneOptions::default())
        .unwrap();

    assert_eq!(
        planned.route.node_ids(&model.road_network),
        ["100", "101", "102"]
    );
    assert_eq!(planned.route.total_weight(), 10.0);
    planned.route.validate(&model.road_network).unwrap();

    let scene = &planned.scene;
    assert!(scene.is_layer_ordered());
    assert_eq!(scene.count(LayerId::RoadNetwork), 8);
    assert_eq!(scene.count(LayerId::Route), 1);
    assert_eq!(scene.count(LayerId::Endpoint), 2);
    assert_eq!(scene.len(), 20);

    let collection = scene.to_geojson().unwrap();
    assert_eq!(collection.features.len(), 20);
}

#[test]
fn collision_marker_sums_category_means() {
    let model = model();
    let manhattan = model
        .layers
        .collision
        .iter()
        .find(|record| record.borough.as_deref() == Some("MANHATTAN"))
        .unwrap();
    assert_eq!(manhattan.metric, Some(2.5));

    let scene = plan_route(&model, &times_square(), &central_park(), &SceneOptions::default())
        .unwrap()
        .scene;
    let popups: Vec<&str> = scene
        .drawables()
        .iter()
        .filter(|d| d.layer == LayerId::Collision)
        .filter_map(|d| match &d.shape {
            Shape::Marker { popup, .. } => Some(popup.as_str()),
            _ => None,
        })
        .collect();
    assert!(popups.contains(&"Total Collision Casualty 2.5"));
}

#[test]
fn disconnected_components_report_no_path() {
    let model = model();
    let brooklyn = GeocodeResult::resolved("Brooklyn Museum, NY", 40.6782, -73.9442);
    let err = plan_route(&model, &times_square(), &brooklyn, &SceneOptions::default()).unwrap_err();
    assert!(matches!(err, Error::NoPath { ref from, ref to } if from == "100" && to == "200"));
}

#[test]
fn unresolved_address_is_refused() {
    let model = model();
    let missing =
        GeocodeResult::unresolved("zzzqqqnonexistentplace123", UnresolvedReason::NotFound);
    let err = plan_route(&model, &missing, &central_park(), &SceneOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not locate address: zzzqqqnonexistentplace123"
    );
}

#[test]
fn year_filtered_layers() {
    let model = model();
    let layers = build_incident_layers(&model.datasets, Some(2022));
    assert_eq!(layers.traffic.len(), 2);
    assert_eq!(layers.construction.len(), 3);
    assert_eq!(layers.collision.len(), 2);
}

#[test]
fn dashboard_aggregates() {
    let model = model();
    let collisions = &model.datasets.collisions;

    let per_borough = collisions_per_borough(collisions);
    let names: Vec<&str> = per_borough.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["MANHATTAN", "BROOKLYN", "QUEENS", "Unknown"]);
    // the blank-borough row only; the "0" placeholder row never loads
    assert_eq!(per_borough[3].count, 1);

    let factors = contributing_factor_frequencies(collisions);
    assert_eq!(factors[0].name, "Driver Inattention/Distraction");
    assert_eq!(factors[0].count, 3);
    assert_eq!(factors.len(), 4);

    assert_eq!(street_collision_count(collisions, "broadway").count, 2);

    let overview = dashboard_overview(&model.datasets);
    assert_eq!(overview.projects_per_borough[0].name, "M");
    assert!(overview.project_types.iter().all(|t| t.name != "Sidewalk Repair"));
    assert_eq!(overview.project_types.len(), 2);
    assert_eq!(overview.fatalities_by_borough[0].name, "BROOKLYN");
    assert_eq!(overview.fatalities_by_borough[0].percent, 100.0);
    assert_eq!(overview.traffic_volume_heatmap.get(0, 0), Some(100.0));
    assert_eq!(overview.traffic_volume_heatmap.get(1, 0), Some(162.0));

    let brooklyn = overview
        .average_volume_by_borough
        .iter()
        .find(|b| b.name == "Brooklyn")
        .unwrap();
    assert_eq!(brooklyn.value, 48.0);
}
