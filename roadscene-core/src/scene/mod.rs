//! Map scene composition.
//!
//! A [`Scene`] is an ordered list of styled drawables that any map renderer
//! can consume; the server turns it into a Leaflet page or `GeoJSON`.

mod composer;
mod style;
mod to_geojson;

pub use composer::{
    DEFAULT_CENTER, Drawable, END_LABEL, LayerCount, START_LABEL, Scene, SceneOptions, Shape,
    compose_incident_scene, compose_scene,
};
pub use style::{LayerId, Style, StyleTable};
