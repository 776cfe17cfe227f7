use geo::{Line, LineString, Point};
use serde::Serialize;

use super::style::{LayerId, Style, StyleTable};
use crate::model::{IncidentLayers, RoadNetwork};
use crate::routing::Route;

pub const START_LABEL: &str = "Start Location";
pub const END_LABEL: &str = "End Location";

/// Used as the dashboard map centre when nothing else is known
pub const DEFAULT_CENTER: (f64, f64) = (40.7128, -74.0060);

#[derive(Debug, Clone)]
pub struct SceneOptions {
    /// Draw every road segment underneath the route
    pub draw_road_network: bool,
    pub styles: StyleTable,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            draw_road_network: true,
            styles: StyleTable::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Segment(Line<f64>),
    Polyline(LineString<f64>),
    Marker { location: Point<f64>, popup: String },
}

/// One styled element of a [`Scene`]
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub layer: LayerId,
    pub style: Style,
    pub shape: Shape,
}

/// Renderer-agnostic description of a map: a centre and drawables in
/// drawing order
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub center: Point<f64>,
    drawables: Vec<Drawable>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayerCount {
    pub layer: LayerId,
    pub count: usize,
}

impl Scene {
    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn count(&self, layer: LayerId) -> usize {
        self.drawables.iter().filter(|d| d.layer == layer).count()
    }

    /// Drawable count per layer, in drawing order
    pub fn layer_counts(&self) -> Vec<LayerCount> {
        LayerId::ALL
            .into_iter()
            .map(|layer| LayerCount {
                layer,
                count: self.count(layer),
            })
            .collect()
    }

    /// True if no drawable of a lower layer follows one of a higher layer
    pub fn is_layer_ordered(&self) -> bool {
        self.drawables
            .windows(2)
            .all(|pair| pair[0].layer.draw_rank() <= pair[1].layer.draw_rank())
    }
}

/// Composes the road network, the route, the incident layers and the two
/// endpoint markers into a single scene.
///
/// The scene is centred on the midpoint of the two geocoded endpoints, not on
/// the snapped nodes. A route of a single node has no line to draw and is
/// represented by the endpoint markers alone.
pub fn compose_scene(
    network: &RoadNetwork,
    route: &Route,
    layers: &IncidentLayers,
    start: Point<f64>,
    end: Point<f64>,
    options: &SceneOptions,
) -> Scene {
    let styles = &options.styles;
    let mut drawables = Vec::with_capacity(
        layers.len() + 3 + if options.draw_road_network { network.edge_count() } else { 0 },
    );

    if options.draw_road_network {
        let style = styles.style(LayerId::RoadNetwork);
        drawables.extend(network.segments().map(|(from, to)| Drawable {
            layer: LayerId::RoadNetwork,
            style,
            shape: Shape::Segment(Line::new(from.geometry, to.geometry)),
        }));
    }

    if route.len() >= 2 {
        drawables.push(Drawable {
            layer: LayerId::Route,
            style: styles.style(LayerId::Route),
            shape: Shape::Polyline(route.line_string(network)),
        });
    }

    push_incidents(&mut drawables, layers, styles);

    let endpoint_style = styles.style(LayerId::Endpoint);
    for (location, label) in [(start, START_LABEL), (end, END_LABEL)] {
        drawables.push(Drawable {
            layer: LayerId::Endpoint,
            style: endpoint_style,
            shape: Shape::Marker {
                location,
                popup: label.to_string(),
            },
        });
    }

    Scene {
        center: midpoint(start, end),
        drawables,
    }
}

/// Scene holding the incident markers only
pub fn compose_incident_scene(
    layers: &IncidentLayers,
    center: Point<f64>,
    styles: &StyleTable,
) -> Scene {
    let mut drawables = Vec::with_capacity(layers.len());
    push_incidents(&mut drawables, layers, styles);
    Scene { center, drawables }
}

fn push_incidents(drawables: &mut Vec<Drawable>, layers: &IncidentLayers, styles: &StyleTable) {
    for (layer, records) in layers.iter() {
        let layer = LayerId::from(layer);
        let style = styles.style(layer);
        drawables.extend(records.iter().map(|record| Drawable {
            layer,
            style,
            shape: Shape::Marker {
                location: record.location,
                popup: record.popup(),
            },
        }));
    }
}

fn midpoint(a: Point<f64>, b: Point<f64>) -> Point<f64> {
    Point::new((a.x() + b.x()) / 2.0, (a.y() + b.y()) / 2.0)
}
