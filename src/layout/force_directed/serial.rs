//! Serial all-pairs force-directed layout.

use super::{init_positions, integrate_vertex, ForceDirectedOptions};
use crate::error::LayoutError;
use crate::geometry::{Point, EPSILON};
use crate::graph::DenseGraph;
use crate::layout::LayoutEngine;

pub struct SerialEngine {
    options: ForceDirectedOptions,
}

impl SerialEngine {
    pub fn new(options: ForceDirectedOptions) -> Self {
        Self { options }
    }
}

impl LayoutEngine for SerialEngine {
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
            log::trace!("serial force-directed iteration, temperature = {t}");
            let mut disp = vec![Point::zero(); n];

            for u in 0..n {
                for v in (u + 1)..n {
                    let delta = positions[u].sub(positions[v]);
                    let d = delta.norm().max(EPSILON);
                    let f = delta.scale(k * k / (d * d));
                    disp[u] += f;
                    disp[v] -= f;
                }
            }

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
        "force-directed-serial"
    }

    fn description(&self) -> &'static str {
        "Serial all-pairs force-directed layout with linear cooling"
    }
}
