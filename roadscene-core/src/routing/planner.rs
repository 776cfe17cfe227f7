use geo::Point;
use log::{debug, info};

use super::Route;
use super::dijkstra::shortest_path;
use crate::Error;
use crate::geocoding::GeocodeResult;
use crate::model::{CityModel, SnappedNode};
use crate::scene::{Scene, SceneOptions, compose_scene};

/// A geocoded address together with the network node it was snapped to
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEndpoint {
    pub address: String,
    pub location: Point<f64>,
    pub snapped: SnappedNode,
}

#[derive(Debug, Clone)]
pub struct PlannedRoute {
    pub start: RouteEndpoint,
    pub end: RouteEndpoint,
    pub route: Route,
    pub scene: Scene,
}

/// Plans a route between two geocoded addresses and composes its scene.
///
/// Both endpoints must be resolved before the network is consulted at all.
///
/// # Errors
///
/// - [`Error::UnresolvedAddress`] if either geocode is unresolved
/// - [`Error::EmptyNetwork`] if the network has no nodes
/// - [`Error::NoPath`] if the end node is unreachable from the start node
pub fn plan_route(
    model: &CityModel,
    start: &GeocodeResult,
    end: &GeocodeResult,
    options: &SceneOptions,
) -> Result<PlannedRoute, Error> {
    let start_location = start.require_location()?;
    let end_location = end.require_location()?;

    let start = snap(model, &start.address, start_location)?;
    let end = snap(model, &end.address, end_location)?;

    let route = shortest_path(&model.road_network, start.snapped.node, end.snapped.node)?;
    info!(
        "Route from '{}' to '{}': {} nodes, total weight {:.2}",
        start.address,
        end.address,
        route.len(),
        route.total_weight()
    );

    let scene = compose_scene(
        &model.road_network,
        &route,
        &model.layers,
        start_location,
        end_location,
        options,
    );

    Ok(PlannedRoute {
        start,
        end,
        route,
        scene,
    })
}

fn snap(model: &CityModel, address: &str, location: Point<f64>) -> Result<RouteEndpoint, Error> {
    let snapped = model
        .road_network
        .nearest_node(&location)
        .ok_or(Error::EmptyNetwork)?;
    debug!(
        "Snapped '{address}' to node {} ({:.0} m away)",
        model.road_network.node_label(snapped.node),
        snapped.distance_m
    );
    Ok(RouteEndpoint {
        address: address.to_string(),
        location,
        snapped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::UnresolvedReason;
    use crate::model::{Datasets, IncidentLayers, RoadNetwork, RoadNetworkBuilder};
    use crate::scene::LayerId;

    fn model(network: RoadNetwork) -> CityModel {
        CityModel::new(network, Datasets::default(), IncidentLayers::default())
    }

    fn two_islands() -> CityModel {
        let mut builder = RoadNetworkBuilder::new();
        let a = builder.add_node("a", 40.7580, -73.9855).unwrap();
        let b = builder.add_node("b", 40.7680, -73.9800).unwrap();
        let c = builder.add_node("c", 40.7829, -73.9654).unwrap();
        builder.add_edge(a, b, 1.0).unwrap();
        builder.add_edge(b, c, 1.0).unwrap();
        let far = builder.add_node("far", 40.6000, -73.7500).unwrap();
        let farther = builder.add_node("farther", 40.6010, -73.7510).unwrap();
        builder.add_edge(far, farther, 1.0).unwrap();
        model(builder.build())
    }

    #[test]
    fn unresolved_address_wins_over_empty_network() {
        let empty = model(RoadNetworkBuilder::new().build());
        let start =
            GeocodeResult::unresolved("zzzqqqnonexistentplace123", UnresolvedReason::NotFound);
        let end = GeocodeResult::resolved("Central Park, NY", 40.7829, -73.9654);

        let err = plan_route(&empty, &start, &end, &SceneOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnresolvedAddress { ref address } if address == "zzzqqqnonexistentplace123"
        ));

        let err = plan_route(&empty, &end, &start, &SceneOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnresolvedAddress { .. }));
    }

    #[test]
    fn resolved_addresses_on_empty_network() {
        let empty = model(RoadNetworkBuilder::new().build());
        let start = GeocodeResult::resolved("Times Square, NY", 40.7580, -73.9855);
        let err = plan_route(&empty, &start, &start, &SceneOptions::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyNetwork));
    }

    #[test]
    fn plans_and_composes_scene() {
        let model = two_islands();
        let start = GeocodeResult::resolved("Times Square, NY", 40.7581, -73.9856);
        let end = GeocodeResult::resolved("Central Park, NY", 40.7830, -73.9650);
        let planned = plan_route(&model, &start, &end, &SceneOptions::default()).unwrap();

        assert_eq!(planned.route.node_ids(&model.road_network), ["a", "b", "c"]);
        assert_eq!(planned.route.total_weight(), 2.0);
        assert!(planned.start.snapped.distance_m < 20.0);
        assert_eq!(planned.scene.count(LayerId::Route), 1);
        assert_eq!(planned.scene.count(LayerId::Endpoint), 2);
        assert!(planned.scene.is_layer_ordered());
    }

    #[test]
    fn disconnected_endpoints_have_no_path() {
        let model = two_islands();
        let start = GeocodeResult::resolved("Times Square, NY", 40.7580, -73.9855);
        let end = GeocodeResult::resolved("JFK, NY", 40.6005, -73.7505);
        let err = plan_route(&model, &start, &end, &SceneOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NoPath { ref from, .. } if from == "a"));
    }

    #[test]
    fn same_address_gives_single_node_route() {
        let model = two_islands();
        let start = GeocodeResult::resolved("Times Square, NY", 40.7580, -73.9855);
        let planned = plan_route(&model, &start, &start, &SceneOptions::default()).unwrap();
        assert_eq!(planned.route.len(), 1);
        assert_eq!(planned.route.total_weight(), 0.0);
        assert_eq!(planned.scene.count(LayerId::Route), 0);
        assert_eq!(planned.scene.count(LayerId::Endpoint), 2);
    }
}
