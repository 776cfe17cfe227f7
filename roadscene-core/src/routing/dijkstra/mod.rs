mod shortest_path;
mod state;

pub use shortest_path::{shortest_path, shortest_path_weights};
