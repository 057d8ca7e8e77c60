//! Force-directed layout: three execution variants sharing one physical
//! model (repulsion + attraction + a linearly cooling temperature cap).

pub mod barnes_hut;
pub mod parallel;
pub mod serial;

pub use barnes_hut::BarnesHutEngine;
pub use parallel::ParallelEngine;
pub use serial::SerialEngine;

use crate::error::LayoutError;
use crate::geometry::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shared configuration for all three force-directed variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceDirectedOptions {
    pub width: f64,
    pub height: f64,
    pub iterations: usize,
    /// Tile width for the parallel variant's fork-join phases.
    pub chunk_size: usize,
    /// Barnes–Hut opening angle.
    pub theta: f64,
    /// Quadtree recursion cap (parallel construction threshold for the
    /// Barnes–Hut variant).
    pub max_depth: u32,
}

impl Default for ForceDirectedOptions {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            iterations: 100,
            chunk_size: 64,
            theta: 0.5,
            max_depth: crate::quadtree::MAX_DEPTH,
        }
    }
}

impl ForceDirectedOptions {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.iterations == 0 {
            return Err(LayoutError::DegenerateConfig(
                "iterations must be positive".to_string(),
            ));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(LayoutError::DegenerateConfig(
                "width and height must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Ideal edge length `k = sqrt(width * height / n)`.
    pub fn k(&self, n: usize) -> f64 {
        if n == 0 {
            return 0.0;
        }
        (self.width * self.height / n as f64).sqrt()
    }

    /// Initial temperature `t0 = width / 10`.
    pub fn t0(&self) -> f64 {
        self.width / 10.0
    }

    /// Per-iteration linear cooling subtracted from the temperature.
    pub fn cooling_rate(&self) -> f64 {
        self.t0() / self.iterations as f64
    }
}

/// Draws `n` uniformly random positions in `[0, width) x [0, height)`.
pub fn init_positions(n: usize, width: f64, height: f64) -> Vec<Point> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)))
        .collect()
}

/// Caps `disp` at the current temperature and writes the clamped new
/// position into `positions[v]`. Shared by all three variants' integration
/// step.
pub fn integrate_vertex(pos: Point, disp: Point, temperature: f64, width: f64, height: f64) -> Point {
    let m = disp.norm();
    let bounded = if m > 0.0 {
        disp.scale(m.min(temperature) / m)
    } else {
        disp
    };
    crate::geometry::clamp_to_rect(pos + bounded, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k_is_zero_for_empty_graph() {
        let opts = ForceDirectedOptions::default();
        assert_eq!(opts.k(0), 0.0);
    }

    #[test]
    fn validate_rejects_zero_iterations() {
        let mut opts = ForceDirectedOptions::default();
        opts.iterations = 0;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_dimensions() {
        let mut opts = ForceDirectedOptions::default();
        opts.width = 0.0;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn integrate_vertex_clamps_to_rect() {
        let pos = Point::new(99.0, 1.0);
        let disp = Point::new(50.0, 0.0);
        let result = integrate_vertex(pos, disp, 1000.0, 100.0, 100.0);
        assert_eq!(result.x, 100.0);
    }

    #[test]
    fn init_positions_are_within_bounds() {
        let positions = init_positions(50, 80.0, 60.0);
        for p in positions {
            assert!(p.x >= 0.0 && p.x < 80.0);
            assert!(p.y >= 0.0 && p.y < 60.0);
        }
    }
}
