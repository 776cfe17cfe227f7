//! Incident layers overlaid on the road network

use geo::Point;
use serde::Serialize;

/// One of the three independent datasets contributing map markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentLayer {
    Traffic,
    Construction,
    Collision,
}

impl IncidentLayer {
    /// Layers in the order their markers are drawn
    pub const ALL: [IncidentLayer; 3] = [Self::Traffic, Self::Construction, Self::Collision];

    /// Human-readable name of the metric carried by this layer
    pub fn metric_label(self) -> &'static str {
        match self {
            Self::Traffic => "Traffic Volume",
            Self::Construction => "Construction Award",
            Self::Collision => "Total Collision Casualty",
        }
    }

    /// Name of the toggleable feature group on the dashboard map
    pub fn group_name(self) -> &'static str {
        match self {
            Self::Traffic => "Traffic Projects",
            Self::Construction => "Construction Projects",
            Self::Collision => "Vehicle Collisions",
        }
    }
}

/// A located incident with a single summary value
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentRecord {
    pub layer: IncidentLayer,
    pub borough: Option<String>,
    pub location: Point<f64>,
    /// Average volume, award amount or casualty total depending on the layer
    pub metric: Option<f64>,
}

impl IncidentRecord {
    pub fn popup(&self) -> String {
        match self.metric {
            Some(value) => format!("{} {value}", self.layer.metric_label()),
            None => format!("{} n/a", self.layer.metric_label()),
        }
    }
}

/// The three marker collections, each homogeneous in its layer tag
#[derive(Debug, Clone, Default)]
pub struct IncidentLayers {
    pub traffic: Vec<IncidentRecord>,
    pub construction: Vec<IncidentRecord>,
    pub collision: Vec<IncidentRecord>,
}

impl IncidentLayers {
    pub fn layer(&self, layer: IncidentLayer) -> &[IncidentRecord] {
        match layer {
            IncidentLayer::Traffic => &self.traffic,
            IncidentLayer::Construction => &self.construction,
            IncidentLayer::Collision => &self.collision,
        }
    }

    /// Collections in drawing order
    pub fn iter(&self) -> impl Iterator<Item = (IncidentLayer, &[IncidentRecord])> + '_ {
        IncidentLayer::ALL
            .into_iter()
            .map(move |layer| (layer, self.layer(layer)))
    }

    pub fn len(&self) -> usize {
        self.traffic.len() + self.construction.len() + self.collision.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
