//! Read-only dashboard endpoints. Aggregates are computed once at startup.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use geojson::FeatureCollection;
use roadscene_core::analytics::{
    BoroughCasualties, CategoryCount, CategoryShare, CategoryValue, CrossTab, DashboardOverview,
    HourlyVolume, StreetCollisions, VolumeHeatmap, street_collision_count,
};
use serde::Deserialize;

use crate::state::AppState;

type Shared = State<Arc<AppState>>;

pub(super) fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(overview))
        .route("/map", get(map))
        .route("/construction/projects-per-borough", get(projects_per_borough))
        .route("/construction/project-types", get(project_types))
        .route("/construction/types-by-borough", get(types_by_borough))
        .route("/construction/starts-per-month", get(starts_per_month))
        .route("/construction/award-by-borough", get(award_by_borough))
        .route("/collisions/per-borough", get(collisions_per_borough))
        .route("/collisions/casualties-by-borough", get(casualties_by_borough))
        .route("/collisions/fatalities-by-borough", get(fatalities_by_borough))
        .route("/collisions/contributing-factors", get(contributing_factors))
        .route("/collisions/street", get(street_collisions))
        .route("/traffic/heatmap", get(traffic_heatmap))
        .route("/traffic/hourly-average", get(hourly_average))
        .route("/traffic/borough-average", get(borough_average))
}

async fn overview(State(state): Shared) -> Json<DashboardOverview> {
    Json(state.dashboard.overview.clone())
}

async fn map(State(state): Shared) -> Json<FeatureCollection> {
    Json(state.dashboard.map.clone())
}

async fn projects_per_borough(State(state): Shared) -> Json<Vec<CategoryCount>> {
    Json(state.dashboard.overview.projects_per_borough.clone())
}

async fn project_types(State(state): Shared) -> Json<Vec<CategoryShare>> {
    Json(state.dashboard.overview.project_types.clone())
}

async fn types_by_borough(State(state): Shared) -> Json<CrossTab> {
    Json(state.dashboard.overview.construction_types_by_borough.clone())
}

async fn starts_per_month(State(state): Shared) -> Json<Vec<CategoryCount>> {
    Json(state.dashboard.overview.construction_starts_per_month.clone())
}

async fn award_by_borough(State(state): Shared) -> Json<Vec<CategoryValue>> {
    Json(state.dashboard.overview.normalized_award_by_borough.clone())
}

async fn collisions_per_borough(State(state): Shared) -> Json<Vec<CategoryCount>> {
    Json(state.dashboard.overview.collisions_per_borough.clone())
}

async fn casualties_by_borough(State(state): Shared) -> Json<Vec<BoroughCasualties>> {
    Json(state.dashboard.overview.casualties_by_borough.clone())
}

async fn fatalities_by_borough(State(state): Shared) -> Json<Vec<CategoryShare>> {
    Json(state.dashboard.overview.fatalities_by_borough.clone())
}

async fn contributing_factors(State(state): Shared) -> Json<Vec<CategoryCount>> {
    Json(state.dashboard.overview.contributing_factors.clone())
}

#[derive(Debug, Deserialize)]
struct StreetQuery {
    #[serde(default)]
    name: String,
}

async fn street_collisions(
    State(state): Shared,
    Query(query): Query<StreetQuery>,
) -> Json<StreetCollisions> {
    Json(street_collision_count(
        &state.model.datasets.collisions,
        &query.name,
    ))
}

async fn traffic_heatmap(State(state): Shared) -> Json<VolumeHeatmap> {
    Json(state.dashboard.overview.traffic_volume_heatmap.clone())
}

async fn hourly_average(State(state): Shared) -> Json<Vec<HourlyVolume>> {
    Json(state.dashboard.overview.average_volume_per_hour.clone())
}

async fn borough_average(State(state): Shared) -> Json<Vec<CategoryValue>> {
    Json(state.dashboard.overview.average_volume_by_borough.clone())
}
