//! Longest-path layer assignment over the acyclic graph cycle removal
//! produced. Layer 0 holds the sinks; layer numbers increase toward the
//! sources, so every edge `(u -> v)` satisfies `layer(u) > layer(v)`.

use crate::graph::DenseGraph;
use rayon::prelude::*;

/// `levelmap[v] = (layer, position_in_layer)`.
pub type LevelMap = Vec<(usize, usize)>;

/// Sequential longest-path layering: repeatedly extracts the set of
/// not-yet-placed vertices all of whose successors are already placed.
pub fn assign_layers(dag: &DenseGraph) -> (Vec<Vec<usize>>, LevelMap) {
    assign_layers_with_workers(dag, 1)
}

/// As [`assign_layers`], but the per-sweep eligibility scan is partitioned
/// across `workers` chunks and computed concurrently; candidates found in
/// the same pass are still serialized into the layer in vertex-index
/// order, keeping the result identical to the sequential variant.
pub fn assign_layers_with_workers(dag: &DenseGraph, workers: usize) -> (Vec<Vec<usize>>, LevelMap) {
    let n = dag.n();
    let mut levels: Vec<Vec<usize>> = Vec::new();
    if n == 0 {
        return (levels, Vec::new());
    }

    let mut placed = vec![false; n];
    let workers = workers.max(1);

    loop {
        let remaining: Vec<usize> = (0..n).filter(|&v| !placed[v]).collect();
        if remaining.is_empty() {
            break;
        }

        let chunk_size = remaining.len().div_ceil(workers).max(1);
        let eligible: Vec<bool> = remaining
            .par_chunks(chunk_size)
            .flat_map(|chunk| {
                chunk
                    .iter()
                    .map(|&v| dag.adj[v].iter().all(|&w| placed[w]))
                    .collect::<Vec<_>>()
            })
            .collect();

        let layer: Vec<usize> = remaining
            .into_iter()
            .zip(eligible)
            .filter_map(|(v, ok)| ok.then_some(v))
            .collect();

        if layer.is_empty() {
            log::debug!("layering stalled with {} vertices unplaced (non-DAG input?)", n - placed.iter().filter(|&&p| p).count());
            break;
        }

        for &v in &layer {
            placed[v] = true;
        }
        levels.push(layer);
    }

    let mut levelmap = vec![(0usize, 0usize); n];
    for (layer_idx, layer) in levels.iter().enumerate() {
        for (idx, &v) in layer.iter().enumerate() {
            levelmap[v] = (layer_idx, idx);
        }
    }

    (levels, levelmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diamond_dag_layers_match_expected() {
        let g = DenseGraph::from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)], true).unwrap();
        let (_, levelmap) = assign_layers(&g);
        assert_eq!(levelmap[3].0, 0);
        assert_eq!(levelmap[1].0, 1);
        assert_eq!(levelmap[2].0, 1);
        assert_eq!(levelmap[0].0, 2);
    }

    #[test]
    fn every_vertex_in_exactly_one_layer_no_empty_layers() {
        let g = DenseGraph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)], true).unwrap();
        let (levels, levelmap) = assign_layers(&g);
        assert!(levels.iter().all(|l| !l.is_empty()));
        let total: usize = levels.iter().map(|l| l.len()).sum();
        assert_eq!(total, 5);
        assert_eq!(levelmap.len(), 5);
    }

    #[test]
    fn binary_tree_depth_three_has_four_layers_of_expected_sizes() {
        // root 0; children 1,2; grandchildren 3..6; leaves 7..14.
        let mut edges = Vec::new();
        edges.push((0, 1));
        edges.push((0, 2));
        for (i, parent) in [1, 1, 2, 2].into_iter().enumerate() {
            edges.push((parent, 3 + i));
        }
        for (i, parent) in [3, 3, 4, 4, 5, 5, 6, 6].into_iter().enumerate() {
            edges.push((parent, 7 + i));
        }
        let g = DenseGraph::from_edges(15, &edges, true).unwrap();
        let (levels, _) = assign_layers(&g);

        let mut sizes: Vec<usize> = levels.iter().map(|l| l.len()).collect();
        sizes.reverse();
        assert_eq!(sizes, vec![1, 2, 4, 8]);
    }

    #[test]
    fn parallel_variant_matches_sequential() {
        let g = DenseGraph::from_edges(6, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (3, 5)], true).unwrap();
        let (seq_levels, _) = assign_layers_with_workers(&g, 1);
        let (par_levels, _) = assign_layers_with_workers(&g, 4);
        assert_eq!(seq_levels, par_levels);
    }

    #[test]
    fn layer_property_holds_for_every_edge() {
        let g = DenseGraph::from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)], true).unwrap();
        let (_, levelmap) = assign_layers(&g);
        for (u, v) in g.edges() {
            assert!(levelmap[u].0 > levelmap[v].0);
        }
    }
}
