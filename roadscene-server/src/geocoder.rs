//! Address geocoding providers

use std::collections::HashMap;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use roadscene_core::geocoding::{GeocodeResult, UnresolvedReason, is_blank_address};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GeocoderConfig;

/// Turns a free-text address into coordinates.
///
/// Providers never fail: every problem is reported as an unresolved
/// [`GeocodeResult`] which the route planner refuses later.
pub trait Geocoder: Send + Sync {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, GeocodeResult>;
}

/// OpenStreetMap Nominatim search API, first match only
pub struct NominatimGeocoder {
    client: reqwest::Client,
    search_url: String,
    /// Fixed query parameters appended to every search
    bias: Vec<(&'static str, String)>,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
            bias: search_bias(config),
        })
    }

    async fn search(&self, address: &str) -> GeocodeResult {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .query(&self.bias)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        let places = match response {
            Ok(response) => response.json::<Vec<NominatimPlace>>().await,
            Err(e) => Err(e),
        };

        match places {
            Ok(places) => match places.first() {
                Some(place) => match (place.lat.parse::<f64>(), place.lon.parse::<f64>()) {
                    (Ok(lat), Ok(lon)) => GeocodeResult::resolved(address, lat, lon),
                    _ => GeocodeResult::unresolved(
                        address,
                        UnresolvedReason::Provider(format!(
                            "unparseable coordinates '{}', '{}'",
                            place.lat, place.lon
                        )),
                    ),
                },
                None => GeocodeResult::unresolved(address, UnresolvedReason::NotFound),
            },
            Err(e) if e.is_timeout() => {
                warn!("Geocoding '{address}' timed out");
                GeocodeResult::unresolved(address, UnresolvedReason::Timeout)
            }
            Err(e) => {
                warn!("Geocoding '{address}' failed: {e}");
                GeocodeResult::unresolved(address, UnresolvedReason::Provider(e.to_string()))
            }
        }
    }
}

fn search_bias(config: &GeocoderConfig) -> Vec<(&'static str, String)> {
    let mut bias = Vec::new();
    if let Some(codes) = config.country_codes.as_deref().filter(|c| !c.trim().is_empty()) {
        bias.push(("countrycodes", codes.trim().to_string()));
    }
    if let Some([min_lon, min_lat, max_lon, max_lat]) = config.viewbox {
        bias.push(("viewbox", format!("{min_lon},{min_lat},{max_lon},{max_lat}")));
        if config.bounded {
            bias.push(("bounded", "1".to_string()));
        }
    }
    bias
}

impl Geocoder for NominatimGeocoder {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, GeocodeResult> {
        async move {
            if is_blank_address(address) {
                return GeocodeResult::unresolved(address, UnresolvedReason::EmptyAddress);
            }
            let result = self.search(address.trim()).await;
            debug!("Geocoded '{address}': {:?}", result.status);
            result
        }
        .boxed()
    }
}

/// Fixed table of known places, matched ignoring case and surrounding spaces
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    places: HashMap<String, (f64, f64)>,
}

impl StaticGeocoder {
    pub fn new<I, S>(places: I) -> Self
    where
        I: IntoIterator<Item = (S, (f64, f64))>,
        S: AsRef<str>,
    {
        Self {
            places: places
                .into_iter()
                .map(|(address, location)| (normalize(address.as_ref()), location))
                .collect(),
        }
    }

    pub fn from_config(config: &GeocoderConfig) -> Self {
        Self::new(
            config
                .places
                .iter()
                .map(|(address, [lat, lon])| (address, (*lat, *lon))),
        )
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

impl Geocoder for StaticGeocoder {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, GeocodeResult> {
        let result = if is_blank_address(address) {
            GeocodeResult::unresolved(address, UnresolvedReason::EmptyAddress)
        } else {
            match self.places.get(&normalize(address)) {
                Some(&(lat, lon)) => GeocodeResult::resolved(address, lat, lon),
                None => GeocodeResult::unresolved(address, UnresolvedReason::NotFound),
            }
        };
        futures::future::ready(result).boxed()
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::response::{Html, IntoResponse};
    use axum::routing::get;
    use roadscene_core::GeocodeStatus;
    use serde_json::json;

    use super::*;

    /// Serves one canned Nominatim behaviour per path prefix
    async fn stub_nominatim() -> String {
        let app = Router::new()
            .route(
                "/error/search",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
            )
            .route(
                "/html/search",
                get(|| async { Html("<html><body>maintenance</body></html>") }),
            )
            .route("/empty/search", get(|| async { axum::Json(json!([])) }))
            .route(
                "/garbled/search",
                get(|| async { axum::Json(json!([{ "lat": "north", "lon": "west" }])) }),
            )
            .route(
                "/slow/search",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    axum::Json(json!([]))
                }),
            )
            .route(
                "/found/search",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    let matches = params.get("q").map(String::as_str) == Some("Times Square")
                        && params.get("format").map(String::as_str) == Some("json")
                        && params.get("limit").map(String::as_str) == Some("1")
                        && params.get("countrycodes").map(String::as_str) == Some("us");
                    if matches {
                        axum::Json(json!([{ "lat": "40.7580", "lon": "-73.9855" }]))
                    } else {
                        axum::Json(json!([]))
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn geocoder(base_url: &str, case: &str) -> NominatimGeocoder {
        NominatimGeocoder::new(&GeocoderConfig {
            base_url: format!("{base_url}/{case}"),
            timeout_secs: 1,
            country_codes: Some("us".to_string()),
            ..GeocoderConfig::default()
        })
        .unwrap()
    }

    fn reason(result: &GeocodeResult) -> &UnresolvedReason {
        match &result.status {
            GeocodeStatus::Unresolved(reason) => reason,
            GeocodeStatus::Resolved(point) => panic!("unexpectedly resolved to {point:?}"),
        }
    }

    #[tokio::test]
    async fn nominatim_first_match_is_used() {
        let base = stub_nominatim().await;
        let result = geocoder(&base, "found").geocode(" Times Square ").await;
        let point = result.location().unwrap();
        assert_eq!((point.y(), point.x()), (40.7580, -73.9855));
        assert_eq!(result.address, "Times Square");
    }

    #[tokio::test]
    async fn nominatim_failures_become_unresolved() {
        let base = stub_nominatim().await;

        let server_error = geocoder(&base, "error").geocode("Times Square").await;
        assert!(matches!(reason(&server_error), UnresolvedReason::Provider(_)));

        let not_json = geocoder(&base, "html").geocode("Times Square").await;
        assert!(matches!(reason(&not_json), UnresolvedReason::Provider(_)));

        let garbled = geocoder(&base, "garbled").geocode("Times Square").await;
        assert!(matches!(reason(&garbled), UnresolvedReason::Provider(_)));

        let empty = geocoder(&base, "empty").geocode("Times Square").await;
        assert_eq!(reason(&empty), &UnresolvedReason::NotFound);
    }

    #[tokio::test]
    async fn nominatim_timeout_is_unresolved() {
        let base = stub_nominatim().await;
        let result = geocoder(&base, "slow").geocode("Times Square").await;
        assert_eq!(reason(&result), &UnresolvedReason::Timeout);
    }

    #[tokio::test]
    async fn static_lookup_ignores_case() {
        let geocoder = StaticGeocoder::new([("Times Square, NY", (40.7580, -73.9855))]);
        let result = geocoder.geocode("  times square, ny ").await;
        assert!(result.is_resolved());

        let missing = geocoder.geocode("zzzqqqnonexistentplace123").await;
        assert!(!missing.is_resolved());
        assert_eq!(missing.address, "zzzqqqnonexistentplace123");
    }

    #[tokio::test]
    async fn blank_addresses_are_never_sent() {
        let config = GeocoderConfig {
            // unroutable address; the request must not be attempted
            base_url: "http://127.0.0.1:9".to_string(),
            ..GeocoderConfig::default()
        };
        let geocoder = NominatimGeocoder::new(&config).unwrap();
        let result = geocoder.geocode("   ").await;
        assert_eq!(
            result.status,
            GeocodeStatus::Unresolved(UnresolvedReason::EmptyAddress)
        );
    }

    #[test]
    fn bias_parameters_follow_config() {
        assert!(search_bias(&GeocoderConfig::default()).is_empty());

        let config = GeocoderConfig {
            country_codes: Some("us".to_string()),
            viewbox: Some([-74.26, 40.49, -73.7, 40.92]),
            bounded: true,
            ..GeocoderConfig::default()
        };
        assert_eq!(
            search_bias(&config),
            [
                ("countrycodes", "us".to_string()),
                ("viewbox", "-74.26,40.49,-73.7,40.92".to_string()),
                ("bounded", "1".to_string()),
            ]
        );
    }

    #[test]
    fn search_url_has_no_double_slash() {
        let config = GeocoderConfig {
            base_url: "https://nominatim.example.org/".to_string(),
            ..GeocoderConfig::default()
        };
        let geocoder = NominatimGeocoder::new(&config).unwrap();
        assert_eq!(geocoder.search_url, "https://nominatim.example.org/search");
    }
}
