//! HTML pages for the browser front end.
//!
//! The map page hands the scene to Leaflet as `GeoJSON`; styling comes from the
//! feature properties written by the core crate.

use html_escape::{encode_double_quoted_attribute, encode_text};
use roadscene_core::PlannedRoute;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

fn page(title: &str, head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{head}
<style>
body {{ font-family: sans-serif; margin: 0; }}
form {{ padding: 1em; display: flex; gap: 0.5em; flex-wrap: wrap; align-items: center; }}
input[type=text] {{ width: 22em; padding: 0.3em; }}
#map {{ height: calc(100vh - 9em); }}
.summary, .error {{ padding: 0 1em; }}
.error {{ color: #b00020; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = encode_text(title),
    )
}

fn route_form(start: &str, end: &str) -> String {
    format!(
        r#"<form method="post" action="/">
<label>Start address <input type="text" name="start_location" value="{start}" required></label>
<label>End address <input type="text" name="end_location" value="{end}" required></label>
<button type="submit">Find Route</button>
</form>"#,
        start = encode_double_quoted_attribute(start),
        end = encode_double_quoted_attribute(end),
    )
}

pub fn index_page() -> String {
    page("Route Finder", "", &route_form("", ""))
}

pub fn error_page(start: &str, end: &str, message: &str) -> String {
    let body = format!(
        "{}\n<p class=\"error\">{}</p>",
        route_form(start, end),
        encode_text(message)
    );
    page("Route Finder", "", &body)
}

/// Makes JSON safe to embed inside a `<script>` element
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

pub fn route_page(planned: &PlannedRoute, scene_geojson: &str) -> String {
    let head = format!(
        r#"<link rel="stylesheet" href="{LEAFLET_CSS}">
<script src="{LEAFLET_JS}"></script>"#
    );
    let center = planned.scene.center;
    let body = format!(
        r#"{form}
<p class="summary">{nodes} nodes, total weight {weight:.2}</p>
<div id="map"></div>
<script>
const scene = {scene};
const map = L.map("map").setView([{lat}, {lon}], 14);
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
const groups = {{}};
L.geoJSON(scene, {{
  style: f => ({{ color: f.properties.color, weight: f.properties.weight }}),
  pointToLayer: (f, latlng) => f.properties.layer === "endpoint"
    ? L.marker(latlng)
    : L.circleMarker(latlng, {{ radius: 5, color: f.properties.color, weight: f.properties.weight }}),
  onEachFeature: (f, layer) => {{
    if (f.properties.popup) layer.bindPopup(f.properties.popup);
    const name = f.properties.group;
    (groups[name] = groups[name] || L.layerGroup().addTo(map)).addLayer(layer);
  }}
}});
L.control.layers(null, groups).addTo(map);
</script>"#,
        form = route_form(&planned.start.address, &planned.end.address),
        nodes = planned.route.len(),
        weight = planned.route.total_weight(),
        scene = script_json(scene_geojson),
        lat = center.y(),
        lon = center.x(),
    );
    page("Route Finder", &head, &body)
}
