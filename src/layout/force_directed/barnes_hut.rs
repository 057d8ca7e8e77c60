//! Barnes–Hut quadtree-approximated force-directed layout. Replaces the
//! O(n^2) repulsive phase with an O(n log n) tree evaluation; attraction
//! and integration are identical to the parallel variant.

use super::{init_positions, integrate_vertex, ForceDirectedOptions};
use crate::error::LayoutError;
use crate::geometry::{Point, EPSILON};
use crate::graph::DenseGraph;
use crate::layout::LayoutEngine;
use crate::quadtree::Quadtree;
use rayon::prelude::*;

pub struct BarnesHutEngine {
    options: ForceDirectedOptions,
}

impl BarnesHutEngine {
    pub fn new(options: ForceDirectedOptions) -> Self {
        Self { options }
    }
}

impl LayoutEngine for BarnesHutEngine {
    fn layout(&self, graph: &DenseGraph) -> Result<Vec<Point>, LayoutError> {
        self.options.validate()?;
        let n = graph.n();
        if n == 0 {
            return Ok(Vec::new());
        }

        let opts = &self.options;
        let k = opts.k(n);
        let mut t = opts.t0();
        let mut positions = init_positions(n, opts.width, opts.height);
        let edges = graph.edges();

        for _ in 0..opts.iterations {
            log::trace!("barnes-hut iteration, temperature = {t}, theta = {}", opts.theta);
            let tree = Quadtree::build_with_depth(&positions, opts.width, opts.height, opts.max_depth);

            let mut disp: Vec<Point> = (0..n)
                .into_par_iter()
                .map(|v| tree.force_on(positions[v], k, opts.theta))
                .collect();

            for &(u, v) in &edges {
                if u < v {
                    let delta = positions[v].sub(positions[u]);
                    let d = delta.norm().max(EPSILON);
                    let f = delta.scale(d / k);
                    disp[u] += f;
                    disp[v] -= f;
                }
            }

            for v in 0..n {
                positions[v] = integrate_vertex(positions[v], disp[v], t, opts.width, opts.height);
            }

            t -= opts.cooling_rate();
        }

        Ok(positions)
    }

    fn name(&self) -> &'static str {
        "force-directed-barnes-hut"
    }

    fn description(&self) -> &'static str {
        "Barnes-Hut quadtree-approximated force-directed layout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn large_random_graph_completes_without_nans() {
        let n = 1000;
        let mut rng = rand::thread_rng();
        let mut edges = Vec::new();
        for u in 0..n {
            let v = rng.gen_range(0..n);
            if u != v {
                edges.push((u.min(v), u.max(v)));
            }
        }
        edges.sort();
        edges.dedup();

        let g = DenseGraph::from_edges(n, &edges, false).unwrap();
        let options = ForceDirectedOptions {
            width: 1000.0,
            height: 1000.0,
            iterations: 50,
            theta: 0.5,
            ..ForceDirectedOptions::default()
        };
        let engine = BarnesHutEngine::new(options);
        let positions = engine.layout(&g).unwrap();

        assert_eq!(positions.len(), n);
        let mut min_dist = f64::MAX;
        for i in 0..n {
            assert!(positions[i].x.is_finite() && positions[i].y.is_finite());
            for j in (i + 1)..n.min(i + 20) {
                let d = positions[i].sub(positions[j]).norm();
                min_dist = min_dist.min(d);
            }
        }
        assert!(min_dist > EPSILON);
    }

    #[test]
    fn empty_graph_returns_empty_positions() {
        let g = DenseGraph::new(Vec::new(), false).unwrap();
        let engine = BarnesHutEngine::new(ForceDirectedOptions::default());
        assert!(engine.layout(&g).unwrap().is_empty());
    }
}
