//! The dense-index graph representation the layout engines operate on.

use crate::error::LayoutError;

/// An ordered sequence of adjacency lists over dense vertex indices
/// `0..n`. For undirected graphs each edge `{u, v}` appears once in each
/// endpoint's list. For directed graphs only outgoing edges are stored;
/// incoming lists are derived on demand by [`DenseGraph::incoming`].
#[derive(Debug, Clone)]
pub struct DenseGraph {
    pub adj: Vec<Vec<usize>>,
    pub directed: bool,
}

impl DenseGraph {
    /// Validates `adj` before accepting it: every neighbor index must be a
    /// valid vertex, and an undirected graph's adjacency must be symmetric.
    pub fn new(adj: Vec<Vec<usize>>, directed: bool) -> Result<Self, LayoutError> {
        let n = adj.len();
        for (u, neighbors) in adj.iter().enumerate() {
            for &v in neighbors {
                if v >= n {
                    return Err(LayoutError::InvalidGraph(format!(
                        "vertex {u} has dangling neighbor index {v} (n = {n})"
                    )));
                }
            }
        }

        if !directed {
            for (u, neighbors) in adj.iter().enumerate() {
                for &v in neighbors {
                    if !adj[v].contains(&u) {
                        return Err(LayoutError::InvalidGraph(format!(
                            "undirected graph is not symmetric: {u} -> {v} has no matching {v} -> {u}"
                        )));
                    }
                }
            }
        }

        Ok(Self { adj, directed })
    }

    /// Builds a graph directly from an edge list, mostly useful for tests
    /// and small hand-built fixtures. Isolated vertices must still appear
    /// via `n`.
    pub fn from_edges(n: usize, edges: &[(usize, usize)], directed: bool) -> Result<Self, LayoutError> {
        let mut adj = vec![Vec::new(); n];
        for &(u, v) in edges {
            adj[u].push(v);
            if !directed && u != v {
                adj[v].push(u);
            }
        }
        Self::new(adj, directed)
    }

    pub fn n(&self) -> usize {
        self.adj.len()
    }

    /// Reverse adjacency: `incoming()[v]` lists every `u` with an edge
    /// `u -> v`. For undirected graphs this is identical to `adj`.
    pub fn incoming(&self) -> Vec<Vec<usize>> {
        if !self.directed {
            return self.adj.clone();
        }
        let mut incoming = vec![Vec::new(); self.n()];
        for (u, neighbors) in self.adj.iter().enumerate() {
            for &v in neighbors {
                incoming[v].push(u);
            }
        }
        incoming
    }

    pub fn in_degree(&self, incoming: &[Vec<usize>], v: usize) -> usize {
        incoming[v].len()
    }

    pub fn out_degree(&self, v: usize) -> usize {
        self.adj[v].len()
    }

    /// All edges as `(u, v)` pairs. For undirected graphs each `{u, v}`
    /// pair is yielded once, with `u < v`.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (u, neighbors) in self.adj.iter().enumerate() {
            for &v in neighbors {
                if self.directed || u < v {
                    out.push((u, v));
                }
            }
        }
        out
    }
}
