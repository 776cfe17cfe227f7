use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::composer::{Drawable, Scene, Shape};
use super::style::LayerId;
use crate::Error;
use crate::model::IncidentLayer;

impl Scene {
    /// Converts the scene to a `GeoJSON` `FeatureCollection`, one feature per
    /// drawable, preserving drawing order in the `order` property.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let features = self
            .drawables()
            .iter()
            .enumerate()
            .map(|(order, drawable)| drawable.to_feature(order))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

impl Drawable {
    fn to_feature(&self, order: usize) -> Result<Feature, Error> {
        let (geometry, popup) = match &self.shape {
            Shape::Segment(line) => {
                let line_string = LineString::from(vec![line.start, line.end]);
                (GeoJsonValue::from(&line_string), None)
            }
            Shape::Polyline(line_string) => (GeoJsonValue::from(line_string), None),
            Shape::Marker { location, popup } => (GeoJsonValue::from(location), Some(popup)),
        };

        let feature = json!({
            "type": "Feature",
            "geometry": Geometry::new(geometry),
            "properties": {
                "layer": self.layer,
                "group": group_name(self.layer),
                "order": order,
                "color": self.style.color,
                "weight": self.style.weight,
                "popup": popup,
            }
        });

        serde_json::from_value::<Feature>(feature).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn group_name(layer: LayerId) -> &'static str {
    match layer {
        LayerId::RoadNetwork => "Road Network",
        LayerId::Route => "Route",
        LayerId::Traffic => IncidentLayer::Traffic.group_name(),
        LayerId::Construction => IncidentLayer::Construction.group_name(),
        LayerId::Collision => IncidentLayer::Collision.group_name(),
        LayerId::Endpoint => "Endpoints",
    }
}
