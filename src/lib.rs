//! Two-dimensional coordinate assignment for finite graphs: an undirected
//! force-directed engine (serial, parallel chunked, Barnes–Hut quadtree)
//! and a directed Sugiyama engine (cycle removal, layering, ordering,
//! coordinate assignment).

pub mod bucket_queue;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod quadtree;
pub mod types;

pub use error::LayoutError;
pub use geometry::Point;
pub use graph::DenseGraph;
pub use layout::{layout, layout_graph, Algorithm, LayoutEngine, LayoutRequest};
pub use layout::force_directed::ForceDirectedOptions;
pub use layout::sugiyama::SugiyamaOptions;
pub use types::{Edge, Graph, GraphFile, Id, MetadataValue, Node};
