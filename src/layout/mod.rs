//! Layout façade: selects an engine variant, validates the request against
//! the graph's directedness, and returns positions indexed by vertex.

pub mod force_directed;
pub mod sugiyama;

use crate::error::LayoutError;
use crate::geometry::Point;
use crate::graph::DenseGraph;
use crate::types::Graph;
use force_directed::{BarnesHutEngine, ForceDirectedOptions, ParallelEngine, SerialEngine};
use serde::{Deserialize, Serialize};
use sugiyama::{SugiyamaEngine, SugiyamaOptions};

/// Common trait for all layout algorithms.
pub trait LayoutEngine {
    /// Apply the layout algorithm to a graph, producing one point per
    /// vertex, indexed by vertex.
    fn layout(&self, graph: &DenseGraph) -> Result<Vec<Point>, LayoutError>;

    /// Name of the layout algorithm.
    fn name(&self) -> &'static str;

    /// Description of the layout algorithm.
    fn description(&self) -> &'static str;
}

/// Which engine variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    /// Serial all-pairs force-directed.
    Seq,
    /// Parallel chunked all-pairs force-directed.
    Parallel,
    /// Barnes–Hut quadtree-approximated force-directed.
    Quadtree,
    /// Sugiyama layered layout.
    Sugiyama,
}

/// The façade's single configuration surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub algorithm: Algorithm,
    #[serde(default)]
    pub force_directed: ForceDirectedOptions,
    #[serde(default)]
    pub sugiyama: SugiyamaOptions,
}

impl Default for LayoutRequest {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Seq,
            force_directed: ForceDirectedOptions::default(),
            sugiyama: SugiyamaOptions::default(),
        }
    }
}

/// Runs the requested engine over a dense graph, validating directedness
/// and configuration first.
pub fn layout(graph: &DenseGraph, request: &LayoutRequest) -> Result<Vec<Point>, LayoutError> {
    match request.algorithm {
        Algorithm::Seq | Algorithm::Parallel | Algorithm::Quadtree => {
            if graph.directed {
                return Err(LayoutError::WrongGraphKind(
                    "force-directed engines require an undirected graph".to_string(),
                ));
            }
        }
        Algorithm::Sugiyama => {
            if !graph.directed {
                return Err(LayoutError::WrongGraphKind(
                    "the Sugiyama engine requires a directed graph".to_string(),
                ));
            }
        }
    }

    match request.algorithm {
        Algorithm::Seq => SerialEngine::new(request.force_directed.clone()).layout(graph),
        Algorithm::Parallel => ParallelEngine::new(request.force_directed.clone()).layout(graph),
        Algorithm::Quadtree => BarnesHutEngine::new(request.force_directed.clone()).layout(graph),
        Algorithm::Sugiyama => SugiyamaEngine::new(request.sugiyama.clone()).layout(graph),
    }
}

/// Convenience wrapper over the caller-facing [`Graph`] type: converts to a
/// dense graph, runs [`layout`], and writes resulting positions back onto
/// each node by id.
pub fn layout_graph(graph: &mut Graph, request: &LayoutRequest) -> Result<(), LayoutError> {
    let (dense, ids) = graph.to_dense()?;
    let positions = layout(&dense, request)?;

    for (id, p) in ids.iter().zip(positions.iter()) {
        if let Some(node) = graph.nodes.get_mut(id) {
            node.position = Some((p.x, p.y));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, Node};

    #[test]
    fn rejects_directed_graph_for_force_directed_algorithm() {
        let dense = DenseGraph::from_edges(2, &[(0, 1)], true).unwrap();
        let request = LayoutRequest {
            algorithm: Algorithm::Seq,
            ..Default::default()
        };
        assert!(matches!(layout(&dense, &request), Err(LayoutError::WrongGraphKind(_))));
    }

    #[test]
    fn rejects_undirected_graph_for_sugiyama() {
        let dense = DenseGraph::from_edges(2, &[(0, 1), (1, 0)], false).unwrap();
        let request = LayoutRequest {
            algorithm: Algorithm::Sugiyama,
            ..Default::default()
        };
        assert!(matches!(layout(&dense, &request), Err(LayoutError::WrongGraphKind(_))));
    }

    #[test]
    fn layout_graph_writes_positions_back_onto_nodes() {
        let mut g = Graph::new();
        g.add_node(Node::new("a")).add_node(Node::new("b"));
        g.add_edge(Edge::new("e1", "a", "b"));

        let request = LayoutRequest {
            algorithm: Algorithm::Seq,
            force_directed: ForceDirectedOptions {
                width: 100.0,
                height: 100.0,
                iterations: 10,
                ..Default::default()
            },
            ..Default::default()
        };

        layout_graph(&mut g, &request).unwrap();
        assert!(g.nodes["a"].position.is_some());
        assert!(g.nodes["b"].position.is_some());
    }
}
