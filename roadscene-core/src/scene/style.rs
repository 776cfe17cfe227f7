//! Rendering styles, one entry per drawable layer

use serde::Serialize;

use crate::model::IncidentLayer;

/// Every kind of element a scene can contain, in drawing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerId {
    RoadNetwork,
    Route,
    Traffic,
    Construction,
    Collision,
    Endpoint,
}

impl LayerId {
    pub const ALL: [LayerId; 6] = [
        Self::RoadNetwork,
        Self::Route,
        Self::Traffic,
        Self::Construction,
        Self::Collision,
        Self::Endpoint,
    ];

    /// Position of the layer in the drawable list; later layers are drawn on top
    pub fn draw_rank(self) -> u8 {
        match self {
            Self::RoadNetwork => 0,
            Self::Route => 1,
            Self::Traffic => 2,
            Self::Construction => 3,
            Self::Collision => 4,
            Self::Endpoint => 5,
        }
    }
}

impl From<IncidentLayer> for LayerId {
    fn from(layer: IncidentLayer) -> Self {
        match layer {
            IncidentLayer::Traffic => Self::Traffic,
            IncidentLayer::Construction => Self::Construction,
            IncidentLayer::Collision => Self::Collision,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Style {
    pub color: &'static str,
    /// Stroke width in pixels
    pub weight: f64,
}

/// Layer -> style lookup consulted by the scene composer
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    entries: [(LayerId, Style); 6],
}

impl StyleTable {
    pub fn style(&self, layer: LayerId) -> Style {
        self.entries
            .iter()
            .find(|(id, _)| *id == layer)
            .map_or(DEFAULT_STYLE, |(_, style)| *style)
    }

    #[must_use]
    pub fn with_style(mut self, layer: LayerId, style: Style) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|(id, _)| *id == layer) {
            entry.1 = style;
        }
        self
    }
}

const DEFAULT_STYLE: Style = Style {
    color: "gray",
    weight: 1.0,
};

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            entries: [
                (LayerId::RoadNetwork, DEFAULT_STYLE),
                (LayerId::Route, Style { color: "red", weight: 3.0 }),
                (LayerId::Traffic, Style { color: "blue", weight: 1.0 }),
                (LayerId::Construction, Style { color: "green", weight: 1.0 }),
                (LayerId::Collision, Style { color: "red", weight: 1.0 }),
                (LayerId::Endpoint, Style { color: "black", weight: 1.0 }),
            ],
        }
    }
}
