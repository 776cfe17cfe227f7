use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use futures::FutureExt;
use futures::future::BoxFuture;
use roadscene_core::{GeocodeResult, create_city_model};
use roadscene_server::geocoder::{Geocoder, StaticGeocoder};
use roadscene_server::{AppConfig, AppState, build_router};
use serde_json::Value;
use tower::ServiceExt;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("roadscene-core")
        .join("tests")
        .join("fixtures")
}

fn places() -> StaticGeocoder {
    StaticGeocoder::new([
        ("Times Square, NY", (40.7580, -73.9855)),
        ("Central Park, NY", (40.7829, -73.9654)),
        ("Brooklyn Museum, NY", (40.6782, -73.9442)),
    ])
}

fn app() -> Router {
    app_with(Arc::new(places()))
}

fn app_with(geocoder: Arc<dyn Geocoder>) -> Router {
    let dir = fixtures();
    let text = format!(
        r#"
[data]
graph_path = '{graph}'
traffic_path = '{traffic}'
construction_path = '{construction}'
collision_path = '{collision}'
boroughs_path = '{boroughs}'

[dashboard]
year = 2022
"#,
        graph = dir.join("graph.graphml").display(),
        traffic = dir.join("traffic.csv").display(),
        construction = dir.join("constructions.csv").display(),
        collision = dir.join("collisions.csv").display(),
        boroughs = dir.join("boroughs.geojson").display(),
    );
    let config = AppConfig::from_toml_str(&text).unwrap();
    let model = create_city_model(&config.data).unwrap();
    let state = AppState::new(model, geocoder, &config).unwrap();
    build_router(Arc::new(state), &config.server)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn post(app: Router, uri: &str, content_type: &str, body: String) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn route_json(start: &str, end: &str) -> (StatusCode, Value) {
    let body = serde_json::json!({ "start_location": start, "end_location": end }).to_string();
    let (status, bytes) = post(app(), "/api/route", "application/json", body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Records the order of calls and the most calls ever in flight at once
#[derive(Default)]
struct RecordingGeocoder {
    places: StaticGeocoder,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl Geocoder for RecordingGeocoder {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, GeocodeResult> {
        async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.calls.lock().unwrap().push(address.to_string());
            tokio::task::yield_now().await;
            let result = self.places.geocode(address).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
        .boxed()
    }
}

#[tokio::test]
async fn health_reports_network_size() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["nodes"], 6);
    assert_eq!(body["edges"], 8);
}

#[tokio::test]
async fn index_serves_the_form() {
    let (status, body) = get(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Find Route"));
}

#[tokio::test]
async fn api_route_between_known_places() {
    let (status, body) = route_json("Times Square, NY", "Central Park, NY").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["route"]["nodes"], serde_json::json!(["100", "101", "102"]));
    assert_eq!(body["route"]["total_weight"], 10.0);
    assert_eq!(body["center"][0], (40.7580 + 40.7829) / 2.0);
    assert_eq!(body["start"]["node"], "100");
    assert_eq!(body["end"]["node"], "102");
    assert_eq!(body["scene"]["type"], "FeatureCollection");
    assert_eq!(body["scene"]["features"].as_array().unwrap().len(), 20);

    let layers = body["layers"].as_array().unwrap();
    assert_eq!(layers[0]["layer"], "road_network");
    assert_eq!(layers[5]["layer"], "endpoint");
    assert_eq!(layers[5]["count"], 2);
}

#[tokio::test]
async fn api_route_rejects_unknown_address() {
    let (status, body) = route_json("zzzqqqnonexistentplace123", "Central Park, NY").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "Could not locate address: zzzqqqnonexistentplace123"
    );
}

#[tokio::test]
async fn api_route_rejects_blank_address() {
    let (status, _) = route_json("   ", "Central Park, NY").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn api_route_reports_missing_path() {
    let (status, body) = route_json("Times Square, NY", "Brooklyn Museum, NY").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No path exists between node 100 and node 200");
}

#[tokio::test]
async fn addresses_are_geocoded_one_after_another() {
    let geocoder = Arc::new(RecordingGeocoder {
        places: places(),
        ..RecordingGeocoder::default()
    });
    let body = serde_json::json!({
        "start_location": "Times Square, NY",
        "end_location": "Central Park, NY",
    })
    .to_string();
    let app = app_with(geocoder.clone());
    let (status, _) = post(app, "/api/route", "application/json", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(geocoder.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(
        *geocoder.calls.lock().unwrap(),
        ["Times Square, NY", "Central Park, NY"]
    );
}

#[tokio::test]
async fn form_submission_renders_map() {
    let (status, body) = post(
        app(),
        "/",
        "application/x-www-form-urlencoded",
        "start_location=Times+Square%2C+NY&end_location=Central+Park%2C+NY".to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("L.map"));
    assert!(html.contains("Start Location"));
    assert!(html.contains("value=\"Times Square, NY\""));
}

#[tokio::test]
async fn form_submission_shows_error_page() {
    let (status, body) = post(
        app(),
        "/",
        "application/x-www-form-urlencoded",
        "start_location=zzzqqqnonexistentplace123&end_location=Central+Park%2C+NY".to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Could not locate address: zzzqqqnonexistentplace123"));
    assert!(!html.contains("L.map"));
}

#[tokio::test]
async fn form_without_end_location_shows_error_page() {
    let (status, body) = post(
        app(),
        "/",
        "application/x-www-form-urlencoded",
        "start_location=Times+Square%2C+NY".to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<html"));
    assert!(html.contains("value=\"Times Square, NY\""));
    assert!(!html.contains("L.map"));
}

#[tokio::test]
async fn dashboard_collision_endpoints() {
    let (status, body) = get(app(), "/dashboard/collisions/per-borough").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body[0]["name"], "MANHATTAN");
    assert_eq!(body[0]["count"], 2);

    let (status, body) = get(app(), "/dashboard/collisions/street?name=broadway").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["count"], 2);

    let (_, body) = get(app(), "/dashboard/collisions/street").await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn dashboard_map_is_filtered_by_year() {
    let (status, body) = get(app(), "/dashboard/map").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    let features = body["features"].as_array().unwrap();
    // 2022 only: two traffic segments, three projects, two collision groups
    assert_eq!(features.len(), 7);

    let groups: Vec<&str> = features
        .iter()
        .filter_map(|f| f["properties"]["group"].as_str())
        .collect();
    assert_eq!(groups.iter().filter(|g| **g == "Traffic Projects").count(), 2);
    assert_eq!(groups.iter().filter(|g| **g == "Construction Projects").count(), 3);
    assert_eq!(groups.iter().filter(|g| **g == "Vehicle Collisions").count(), 2);
}

#[tokio::test]
async fn dashboard_overview_bundles_every_aggregate() {
    let (status, body) = get(app(), "/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    for key in [
        "projects_per_borough",
        "project_types",
        "construction_types_by_borough",
        "construction_starts_per_month",
        "normalized_award_by_borough",
        "collisions_per_borough",
        "casualties_by_borough",
        "fatalities_by_borough",
        "contributing_factors",
        "traffic_volume_heatmap",
        "average_volume_per_hour",
        "average_volume_by_borough",
    ] {
        assert!(body.get(key).is_some(), "missing {key}");
    }

    let (status, body) = get(app(), "/dashboard/traffic/heatmap").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["days"][0], "Monday");
    assert_eq!(body["values"][0][0], 100.0);
}
