//! Borough boundary polygons for point-in-polygon borough assignment

use std::path::Path;

use geo::{Contains, MultiPolygon, Point};
use geojson::{FeatureCollection, GeoJson};
use log::{info, warn};

use crate::Error;

#[derive(Debug, Clone, Default)]
pub struct BoroughBoundaries {
    boroughs: Vec<(String, MultiPolygon<f64>)>,
}

impl BoroughBoundaries {
    pub fn from_polygons(boroughs: Vec<(String, MultiPolygon<f64>)>) -> Self {
        Self { boroughs }
    }

    /// Reads a GeoJSON `FeatureCollection` of (multi)polygons named by `name_property`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a feature collection.
    pub fn load(path: &Path, name_property: &str) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to read borough boundaries '{}': {}", path.display(), e),
            )
        })?;
        let boundaries = Self::from_geojson_str(&text, name_property)?;
        info!(
            "Loaded {} borough boundaries from {}",
            boundaries.len(),
            path.display()
        );
        Ok(boundaries)
    }

    /// # Errors
    ///
    /// Fails if `text` is not a GeoJSON feature collection.
    pub fn from_geojson_str(text: &str, name_property: &str) -> Result<Self, Error> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e: geojson::Error| Error::GeoJsonError(e.to_string()))?;
        let collection =
            FeatureCollection::try_from(geojson).map_err(|e| Error::GeoJsonError(e.to_string()))?;

        let mut boroughs = Vec::new();
        let mut skipped = 0usize;
        for feature in collection.features {
            let name = feature
                .property(name_property)
                .and_then(|value| value.as_str())
                .map(str::to_string);
            let shape = feature
                .geometry
                .and_then(|geometry| geo::Geometry::<f64>::try_from(geometry).ok())
                .and_then(|geometry| match geometry {
                    geo::Geometry::Polygon(polygon) => Some(MultiPolygon::from(polygon)),
                    geo::Geometry::MultiPolygon(multi) => Some(multi),
                    _ => None,
                });

            match (name, shape) {
                (Some(name), Some(shape)) => boroughs.push((name, shape)),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(
                "Skipped {skipped} borough features without a '{name_property}' or polygon geometry"
            );
        }

        Ok(Self { boroughs })
    }

    /// First borough whose boundary contains `point`
    pub fn borough_at(&self, point: &Point<f64>) -> Option<&str> {
        self.boroughs
            .iter()
            .find(|(_, shape)| shape.contains(point))
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.boroughs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boroughs.is_empty()
    }
}
