//! Reading weighted road graphs from GraphML (as written by osmnx)
//!
//! Attribute values in GraphML are text; coordinates and the configured weight
//! attribute are parsed to `f64` here, once, at load time.

use std::path::Path;

use hashbrown::HashMap;
use log::{debug, info, warn};
use roxmltree::{Document, Node};

use crate::Error;
use crate::model::{RoadNetwork, RoadNetworkBuilder};

/// Weight given to edges that carry no weight attribute (shortest path by hops)
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Reads and parses a GraphML road graph.
///
/// # Errors
///
/// Fails if the file cannot be read, is not GraphML, or contains nodes without
/// coordinates or edges with unusable weights.
pub fn load_graphml(path: &Path, weight_attribute: &str) -> Result<RoadNetwork, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to read graph file '{}': {}", path.display(), e),
        )
    })?;
    let network = parse_graphml(&text, weight_attribute)?;
    info!(
        "Loaded road network from {}: {} nodes, {} edges",
        path.display(),
        network.node_count(),
        network.edge_count()
    );
    Ok(network)
}

/// Parses GraphML text into a [`RoadNetwork`].
///
/// # Errors
///
/// See [`load_graphml`].
pub fn parse_graphml(text: &str, weight_attribute: &str) -> Result<RoadNetwork, Error> {
    let document = Document::parse(text).map_err(|e| Error::GraphFormat(e.to_string()))?;

    let keys = KeyTable::from_document(&document);
    let graph = document
        .descendants()
        .find(|n| n.has_tag_name("graph"))
        .ok_or_else(|| Error::GraphFormat("missing <graph> element".to_string()))?;
    let directed = graph.attribute("edgedefault") != Some("undirected");

    let mut builder = RoadNetworkBuilder::new();

    for node in graph.children().filter(|n| n.has_tag_name("node")) {
        let id = node
            .attribute("id")
            .ok_or_else(|| Error::GraphFormat("node without id".to_string()))?;
        let data = data_values(node, &keys.node);
        let lon = parse_coordinate(id, "x", data.get("x").copied())?;
        let lat = parse_coordinate(id, "y", data.get("y").copied())?;
        builder.add_node(id, lat, lon)?;
    }

    let mut defaulted = 0usize;
    let mut edge_elements = 0usize;
    for edge in graph.children().filter(|n| n.has_tag_name("edge")) {
        edge_elements += 1;
        let from = endpoint(&builder, edge, "source")?;
        let to = endpoint(&builder, edge, "target")?;

        let data = data_values(edge, &keys.edge);
        let weight = match data.get(weight_attribute) {
            Some(text) => coerce_weight(text).ok_or_else(|| {
                Error::InvalidData(format!(
                    "edge {} -> {} has non-numeric {weight_attribute} '{text}'",
                    edge.attribute("source").unwrap_or_default(),
                    edge.attribute("target").unwrap_or_default()
                ))
            })?,
            None => {
                defaulted += 1;
                DEFAULT_EDGE_WEIGHT
            }
        };

        builder.add_edge(from, to, weight)?;
        let edge_directed = edge.attribute("directed").map_or(directed, |v| v == "true");
        if !edge_directed && from != to {
            builder.add_edge(to, from, weight)?;
        }
    }

    if defaulted > 0 {
        warn!(
            "{defaulted} of {edge_elements} edges have no '{weight_attribute}' attribute, \
            using weight {DEFAULT_EDGE_WEIGHT}"
        );
    }
    debug!(
        "Parsed GraphML: {} nodes, {edge_elements} edge elements, directed = {directed}",
        builder.node_count()
    );

    Ok(builder.build())
}

/// Parses a textual weight, accepting only finite non-negative numbers
pub fn coerce_weight(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|weight| weight.is_finite() && *weight >= 0.0)
}

/// `<key>` declarations: key id -> attribute name, per element kind
#[derive(Debug, Default)]
struct KeyTable<'a> {
    node: HashMap<&'a str, &'a str>,
    edge: HashMap<&'a str, &'a str>,
}

impl<'a> KeyTable<'a> {
    fn from_document<'input>(document: &'a Document<'input>) -> Self {
        let mut table = KeyTable::default();
        for key in document.descendants().filter(|n| n.has_tag_name("key")) {
            let (Some(id), Some(name)) = (key.attribute("id"), key.attribute("attr.name")) else {
                continue;
            };
            match key.attribute("for").unwrap_or("all") {
                "node" => {
                    table.node.insert(id, name);
                }
                "edge" => {
                    table.edge.insert(id, name);
                }
                "all" => {
                    table.node.insert(id, name);
                    table.edge.insert(id, name);
                }
                _ => {}
            }
        }
        table
    }
}

/// Attribute name -> raw text for the `<data>` children of an element.
/// Keys without a declaration are addressed by their id.
fn data_values<'a>(
    element: Node<'a, '_>,
    keys: &HashMap<&'a str, &'a str>,
) -> HashMap<&'a str, &'a str> {
    element
        .children()
        .filter(|n| n.has_tag_name("data"))
        .filter_map(|data| {
            let key = data.attribute("key")?;
            let name = keys.get(key).copied().unwrap_or(key);
            Some((name, data.text().unwrap_or_default()))
        })
        .collect()
}

fn parse_coordinate(node_id: &str, attribute: &str, text: Option<&str>) -> Result<f64, Error> {
    let text = text.ok_or_else(|| {
        Error::GraphFormat(format!("node {node_id} has no '{attribute}' attribute"))
    })?;
    text.trim().parse::<f64>().map_err(|_| {
        Error::GraphFormat(format!(
            "node {node_id} has non-numeric '{attribute}' value '{text}'"
        ))
    })
}

fn endpoint(
    builder: &RoadNetworkBuilder,
    edge: Node<'_, '_>,
    attribute: &str,
) -> Result<petgraph::graph::NodeIndex, Error> {
    let id = edge
        .attribute(attribute)
        .ok_or_else(|| Error::GraphFormat(format!("edge without {attribute}")))?;
    builder
        .node_by_id(id)
        .ok_or_else(|| Error::GraphFormat(format!("edge references unknown node {id}")))
}
