use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use geojson::FeatureCollection;
use roadscene_core::routing::{PlannedRoute, RouteEndpoint};
use roadscene_core::scene::LayerCount;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::render;
use crate::state::AppState;

/// Missing fields read as blank so they reach the error page as unresolved
#[derive(Debug, Deserialize)]
pub struct RouteForm {
    #[serde(default)]
    pub start_location: String,
    #[serde(default)]
    pub end_location: String,
}

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub start_location: String,
    pub end_location: String,
}

#[derive(Debug, Serialize)]
pub struct EndpointView {
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub node: String,
    pub snap_distance_m: f64,
}

#[derive(Debug, Serialize)]
pub struct RouteView {
    pub nodes: Vec<String>,
    pub total_weight: f64,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// `[lat, lon]` of the map centre
    pub center: [f64; 2],
    pub route: RouteView,
    pub start: EndpointView,
    pub end: EndpointView,
    pub layers: Vec<LayerCount>,
    pub scene: FeatureCollection,
}

pub(super) async fn index() -> Html<String> {
    Html(render::index_page())
}

pub(super) async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RouteForm>,
) -> Response {
    let planned = match plan(&state, &form.start_location, &form.end_location).await {
        Ok(planned) => planned,
        Err(e) => {
            return (
                e.status,
                Html(render::error_page(&form.start_location, &form.end_location, &e.message)),
            )
                .into_response();
        }
    };

    match planned.scene.to_geojson_string() {
        Ok(geojson) => Html(render::route_page(&planned, &geojson)).into_response(),
        Err(e) => {
            let e = ApiError::from(e);
            (
                e.status,
                Html(render::error_page(&form.start_location, &form.end_location, &e.message)),
            )
                .into_response()
        }
    }
}

pub(super) async fn api_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let planned = plan(&state, &request.start_location, &request.end_location).await?;
    let network = &state.model.road_network;

    let endpoint = |endpoint: &RouteEndpoint| EndpointView {
        address: endpoint.address.clone(),
        lat: endpoint.location.y(),
        lon: endpoint.location.x(),
        node: network.node_label(endpoint.snapped.node),
        snap_distance_m: endpoint.snapped.distance_m,
    };

    let center = planned.scene.center;
    Ok(Json(RouteResponse {
        center: [center.y(), center.x()],
        route: RouteView {
            nodes: planned.route.node_ids(network),
            total_weight: planned.route.total_weight(),
        },
        start: endpoint(&planned.start),
        end: endpoint(&planned.end),
        layers: planned.scene.layer_counts(),
        scene: planned.scene.to_geojson()?,
    }))
}

/// Geocodes the start address, then the end address, one call at a time.
/// Route planning then runs off the async runtime.
async fn plan(state: &Arc<AppState>, start: &str, end: &str) -> Result<PlannedRoute, ApiError> {
    let start = state.geocoder.geocode(start).await;
    let end = state.geocoder.geocode(end).await;
    info!(
        "Planning route from '{}' ({:?}) to '{}' ({:?})",
        start.address, start.status, end.address, end.status
    );

    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || {
        roadscene_core::plan_route(&state.model, &start, &end, &state.scene_options)
    })
    .await
    .map_err(|e| ApiError::internal(e.to_string()))?
    .map_err(ApiError::from)
}
