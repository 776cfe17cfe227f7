use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not locate address: {address}")]
    UnresolvedAddress { address: String },
    #[error("Road network has no nodes to snap to")]
    EmptyNetwork,
    #[error("No path exists between node {from} and node {to}")]
    NoPath { from: String, to: String },
    #[error("Invalid node index")]
    InvalidNodeIndex,
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Graph format error: {0}")]
    GraphFormat(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
