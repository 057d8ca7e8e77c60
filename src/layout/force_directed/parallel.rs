//! Parallel chunked all-pairs force-directed layout. Same semantics as the
//! serial variant; only scheduling differs — each phase is a fork-join
//! barrier over tiles of the index range.

use super::{init_positions, integrate_vertex, ForceDirectedOptions};
use crate::error::LayoutError;
use crate::geometry::{Point, EPSILON};
use crate::graph::DenseGraph;
use crate::layout::LayoutEngine;
use rayon::prelude::*;

pub struct ParallelEngine {
    options: ForceDirectedOptions,
}

impl ParallelEngine {
    pub fn new(options: ForceDirectedOptions) -> Self {
        Self { options }
    }
}

impl LayoutEngine for ParallelEngine {
    fn layout(&self, graph: &DenseGraph) -> Result<Vec<Point>, LayoutError> {
        self.options.validate()?;
        let n = graph.n();
        if n == 0 {
            return Ok(Vec::new());
        }

        let opts = &self.options;
        let k = opts.k(n);
        let chunk_size = opts.chunk_size.max(1);
        let mut t = opts.t0();
        let mut positions = init_positions(n, opts.width, opts.height);
        let adj = &graph.adj;

        for _ in 0..opts.iterations {
            log::trace!("parallel force-directed iteration, temperature = {t}");
            let mut disp = vec![Point::zero(); n];

            repulsive_phase(&positions, &mut disp, k, chunk_size);
            attractive_phase(&positions, &mut disp, adj, k, chunk_size);
            integration_phase(&mut positions, &disp, t, opts.width, opts.height, chunk_size);

            t -= opts.cooling_rate();
        }

        Ok(positions)
    }

    fn name(&self) -> &'static str {
        "force-directed-parallel"
    }

    fn description(&self) -> &'static str {
        "Parallel chunked all-pairs force-directed layout"
    }
}

/// For each anchor `i`, the pairs `(i, j)` with `j in (i, n)` are tiled and
/// computed concurrently. Each tile writes directly into its disjoint slice
/// of `disp[i+1..n]` (safe via `split_at_mut`-style chunking) and returns a
/// partial sum for `disp[i]`, which the driver folds in after join.
fn repulsive_phase(positions: &[Point], disp: &mut [Point], k: f64, chunk_size: usize) {
    let n = positions.len();
    for i in 0..n {
        let start = i + 1;
        if start >= n {
            continue;
        }
        let pos_i = positions[i];
        let slice = &mut disp[start..n];

        let partial_i: Point = slice
            .par_chunks_mut(chunk_size)
            .enumerate()
            .map(|(chunk_index, chunk)| {
                let base = start + chunk_index * chunk_size;
                let mut partial = Point::zero();
                for (offset, d) in chunk.iter_mut().enumerate() {
                    let j = base + offset;
                    let delta = pos_i.sub(positions[j]);
                    let dist = delta.norm().max(EPSILON);
                    let f = delta.scale(k * k / (dist * dist));
                    *d -= f;
                    partial += f;
                }
                partial
            })
            .reduce(Point::zero, |a, b| a + b);

        disp[i] += partial_i;
    }
}

/// Each anchor `u` partitions its neighbor list into tiles. Per-tile
/// `(v, force)` contributions are computed in parallel and merged serially
/// after join, so no tile ever shares a mutable accumulator with another.
fn attractive_phase(positions: &[Point], disp: &mut [Point], adj: &[Vec<usize>], k: f64, chunk_size: usize) {
    for (u, neighbors) in adj.iter().enumerate() {
        let targets: Vec<usize> = neighbors.iter().copied().filter(|&v| u < v).collect();
        if targets.is_empty() {
            continue;
        }
        let pos_u = positions[u];

        let results: Vec<(Point, Vec<(usize, Point)>)> = targets
            .par_chunks(chunk_size)
            .map(|chunk| {
                let mut partial_u = Point::zero();
                let mut contributions = Vec::with_capacity(chunk.len());
                for &v in chunk {
                    let delta = positions[v].sub(pos_u);
                    let dist = delta.norm().max(EPSILON);
                    let f = delta.scale(dist / k);
                    partial_u += f;
                    contributions.push((v, f));
                }
                (partial_u, contributions)
            })
            .collect();

        for (partial_u, contributions) in results {
            disp[u] += partial_u;
            for (v, f) in contributions {
                disp[v] -= f;
            }
        }
    }
}

/// Parallelized by row-tiles of the position array; no cross-tile sharing.
fn integration_phase(positions: &mut [Point], disp: &[Point], t: f64, width: f64, height: f64, chunk_size: usize) {
    positions
        .par_chunks_mut(chunk_size)
        .enumerate()
        .for_each(|(chunk_index, chunk)| {
            let base = chunk_index * chunk_size;
            for (offset, p) in chunk.iter_mut().enumerate() {
                let v = base + offset;
                *p = integrate_vertex(*p, disp[v], t, width, height);
            }
        });
}
