//! Within-layer ordering: barycentric averaging (Stage A, sequential
//! top-down) followed by source reinsertion (Stage B, parallel across
//! layers).
//!
//! Stage B reads each layer's *finished* Stage A order for the layer below
//! it, so it only runs once Stage A has ordered every layer — not
//! interleaved per layer. That is what makes "naturally parallel across
//! layers" (spec wording) actually true: Stage B's input per layer is
//! read-only by the time it runs.

use crate::graph::DenseGraph;
use rayon::prelude::*;

const NEG_INF: f64 = f64::NEG_INFINITY;

/// Orders every layer in place. `dag` must be the same graph `levels` was
/// derived from.
pub fn order_layers(levels: &mut [Vec<usize>], dag: &DenseGraph) {
    let n = dag.n();
    let incoming = dag.incoming();
    let is_source: Vec<bool> = (0..n).map(|v| incoming[v].is_empty()).collect();

    let mut rank = vec![0.0f64; n];
    let mut num_sources = vec![0usize; levels.len()];

    // Stage A: strictly sequential, highest layer index first.
    for i in (0..levels.len()).rev() {
        let layer = &mut levels[i];
        let mut barycenter: Vec<(usize, f64)> = layer
            .iter()
            .map(|&v| {
                if is_source[v] {
                    (v, NEG_INF)
                } else {
                    let preds = &incoming[v];
                    let sum: f64 = preds.iter().map(|&u| rank[u]).sum();
                    (v, sum / preds.len() as f64)
                }
            })
            .collect();
        barycenter.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)));
        *layer = barycenter.iter().map(|&(v, _)| v).collect();

        let sources_here = layer.iter().filter(|&&v| is_source[v]).count();
        num_sources[i] = sources_here;
        let nonsource_count = layer.len() - sources_here;

        for (pos, &v) in layer.iter().enumerate() {
            rank[v] = if pos < sources_here {
                0.0
            } else {
                ((pos - sources_here + 1) as f64) / (nonsource_count as f64)
            };
        }
    }

    // Stage B: each layer's reinsertion only reads the (now fixed) layer
    // below it, so layers are processed independently and in parallel.
    let finished_layers = levels.to_vec();
    let reordered: Vec<Vec<usize>> = levels
        .par_iter()
        .enumerate()
        .map(|(i, layer)| {
            let sources_here = num_sources[i];
            if layer.len() <= 1 || sources_here == 0 || i == 0 {
                return layer.clone();
            }
            reinsert_sources(layer, sources_here, &finished_layers[i - 1], dag)
        })
        .collect();

    levels.clone_from_slice(&reordered);
}

/// Average index of `v`'s successors within `below` (the already-finalized
/// layer directly beneath it), or `None` if none of `v`'s successors land
/// there (it reaches further down, skipping a layer).
fn down_index(v: usize, below: &[usize], dag: &DenseGraph) -> Option<f64> {
    let position_in_below: std::collections::HashMap<usize, usize> =
        below.iter().enumerate().map(|(i, &w)| (w, i)).collect();

    let hits: Vec<usize> = dag.adj[v]
        .iter()
        .filter_map(|w| position_in_below.get(w).copied())
        .collect();

    if hits.is_empty() {
        None
    } else {
        Some(hits.iter().sum::<usize>() as f64 / hits.len() as f64)
    }
}

fn reinsert_sources(layer: &[usize], sources_here: usize, below: &[usize], dag: &DenseGraph) -> Vec<usize> {
    let sources: Vec<usize> = layer[..sources_here].to_vec();
    let suffix: Vec<usize> = layer[sources_here..].to_vec();

    let suffix_index: Vec<Option<f64>> = suffix.iter().map(|&o| down_index(o, below, dag)).collect();

    // For each source, the slot (0..=suffix.len()) minimizing crossings
    // against the fixed, read-only `suffix` — never against other sources.
    let mut placements: Vec<(usize, usize)> = Vec::with_capacity(sources.len());
    for &s in &sources {
        let Some(si) = down_index(s, below, dag) else {
            // No endpoint in the layer below: leave it at the front, its
            // Stage A position.
            placements.push((s, 0));
            continue;
        };

        let mut best_slot = 0;
        let mut best_cost = usize::MAX;
        for slot in 0..=suffix.len() {
            let mut cost = 0;
            for (j, oi) in suffix_index.iter().enumerate() {
                let Some(oi) = oi else { continue };
                if j < slot {
                    if si < *oi {
                        cost += 1;
                    }
                } else if si > *oi {
                    cost += 1;
                }
            }
            if cost < best_cost {
                best_cost = cost;
                best_slot = slot;
            }
        }
        placements.push((s, best_slot));
    }

    let mut result = Vec::with_capacity(layer.len());
    for slot in 0..=suffix.len() {
        for &(s, chosen) in &placements {
            if chosen == slot {
                result.push(s);
            }
        }
        if slot < suffix.len() {
            result.push(suffix[slot]);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::sugiyama::layering::assign_layers;

    #[test]
    fn stable_on_already_ordered_input() {
        let g = DenseGraph::from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)], true).unwrap();
        let (mut levels, _) = assign_layers(&g);
        order_layers(&mut levels, &g);
        let first_pass = levels.clone();
        order_layers(&mut levels, &g);
        assert_eq!(first_pass, levels);
    }

    #[test]
    fn diamond_places_one_and_two_deterministically() {
        let g = DenseGraph::from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)], true).unwrap();
        let (mut levels, levelmap) = assign_layers(&g);
        order_layers(&mut levels, &g);
        let middle_layer = &levels[levelmap[1].0];
        assert!(middle_layer.contains(&1));
        assert!(middle_layer.contains(&2));
    }

    #[test]
    fn every_vertex_still_present_after_reordering() {
        let g = DenseGraph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (0, 4)], true).unwrap();
        let (mut levels, _) = assign_layers(&g);
        let before: usize = levels.iter().map(|l| l.len()).sum();
        order_layers(&mut levels, &g);
        let after: usize = levels.iter().map(|l| l.len()).sum();
        assert_eq!(before, after);
    }
}
