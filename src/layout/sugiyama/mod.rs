//! Directed Sugiyama layout: cycle removal, layer assignment, within-layer
//! ordering, coordinate assignment, in that order.

pub mod coordinates;
pub mod cycle_removal;
pub mod layering;
pub mod ordering;

use crate::error::LayoutError;
use crate::geometry::Point;
use crate::graph::DenseGraph;
use crate::layout::LayoutEngine;
use serde::{Deserialize, Serialize};

/// Sugiyama-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SugiyamaOptions {
    /// Worker count for the parallel layer-assignment scan. Kept distinct
    /// from the force-directed engines' `iterations`: the two options
    /// control unrelated things (a worker count vs. a loop count) and
    /// sharing one name between them was a recurring source of confusion.
    pub layering_workers: usize,
}

impl Default for SugiyamaOptions {
    fn default() -> Self {
        Self { layering_workers: 4 }
    }
}

pub struct SugiyamaEngine {
    options: SugiyamaOptions,
}

impl SugiyamaEngine {
    pub fn new(options: SugiyamaOptions) -> Self {
        Self { options }
    }
}

impl LayoutEngine for SugiyamaEngine {
    fn layout(&self, graph: &DenseGraph) -> Result<Vec<Point>, LayoutError> {
        if graph.n() == 0 {
            return Ok(Vec::new());
        }

        log::debug!("sugiyama: removing cycles over {} vertices", graph.n());
        let removal = cycle_removal::remove_cycles(graph)?;
        log::debug!("sugiyama: {} feedback arcs reversed", removal.feedback_arcs.len());

        let (mut levels, _) =
            layering::assign_layers_with_workers(&removal.dag, self.options.layering_workers);
        log::debug!("sugiyama: assigned {} layers", levels.len());

        ordering::order_layers(&mut levels, &removal.dag);

        let levelmap = rebuild_levelmap(&levels, graph.n());
        Ok(coordinates::assign_coordinates(&levels, &levelmap))
    }

    fn name(&self) -> &'static str {
        "sugiyama"
    }

    fn description(&self) -> &'static str {
        "Directed layered (Sugiyama-style) layout"
    }
}

fn rebuild_levelmap(levels: &[Vec<usize>], n: usize) -> Vec<(usize, usize)> {
    let mut levelmap = vec![(0usize, 0usize); n];
    for (layer_idx, layer) in levels.iter().enumerate() {
        for (idx, &v) in layer.iter().enumerate() {
            levelmap[v] = (layer_idx, idx);
        }
    }
    levelmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_cycle_yields_two_layers() {
        let g = DenseGraph::from_edges(3, &[(0, 1), (1, 2), (2, 0)], true).unwrap();
        let engine = SugiyamaEngine::new(SugiyamaOptions::default());
        let positions = engine.layout(&g).unwrap();
        assert_eq!(positions.len(), 3);

        let mut xs: Vec<i64> = positions.iter().map(|p| p.x.round() as i64).collect();
        xs.sort();
        xs.dedup();
        assert_eq!(xs.len(), 2, "expected exactly two distinct layers");
    }

    #[test]
    fn single_vertex_graph_returns_one_point() {
        let g = DenseGraph::new(vec![Vec::new()], true).unwrap();
        let engine = SugiyamaEngine::new(SugiyamaOptions::default());
        let positions = engine.layout(&g).unwrap();
        assert_eq!(positions.len(), 1);
    }

    #[test]
    fn empty_graph_returns_empty() {
        let g = DenseGraph::new(Vec::new(), true).unwrap();
        let engine = SugiyamaEngine::new(SugiyamaOptions::default());
        assert!(engine.layout(&g).unwrap().is_empty());
    }

    #[test]
    fn binary_tree_produces_four_layers() {
        let mut edges = vec![(0, 1), (0, 2)];
        for (i, parent) in [1, 1, 2, 2].into_iter().enumerate() {
            edges.push((parent, 3 + i));
        }
        for (i, parent) in [3, 3, 4, 4, 5, 5, 6, 6].into_iter().enumerate() {
            edges.push((parent, 7 + i));
        }
        let g = DenseGraph::from_edges(15, &edges, true).unwrap();
        let engine = SugiyamaEngine::new(SugiyamaOptions::default());
        let positions = engine.layout(&g).unwrap();

        let mut xs: Vec<i64> = positions.iter().map(|p| p.x.round() as i64).collect();
        xs.sort();
        xs.dedup();
        assert_eq!(xs.len(), 4);
    }
}
