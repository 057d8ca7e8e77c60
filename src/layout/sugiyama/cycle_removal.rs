//! Eades-Lin-Smyth greedy cycle removal: produces a linear vertex ordering
//! from which feedback arcs are derived, rather than searching for a
//! minimum feedback arc set (NP-hard in general).

use crate::bucket_queue::BucketQueue;
use crate::error::LayoutError;
use crate::graph::DenseGraph;

pub struct CycleRemoval {
    pub dag: DenseGraph,
    pub feedback_arcs: Vec<(usize, usize)>,
}

/// Removes cycles from a directed graph by the greedy linear-ordering
/// heuristic, then reverses every edge that violates the resulting order.
pub fn remove_cycles(graph: &DenseGraph) -> Result<CycleRemoval, LayoutError> {
    let n = graph.n();
    let original_edges = graph.edges();

    if n == 0 {
        return Ok(CycleRemoval {
            dag: DenseGraph::new(Vec::new(), true)?,
            feedback_arcs: Vec::new(),
        });
    }

    let incoming = graph.incoming();
    let mut outdeg: Vec<i64> = (0..n).map(|v| graph.adj[v].len() as i64).collect();
    let mut indeg: Vec<i64> = (0..n).map(|v| incoming[v].len() as i64).collect();
    let mut alive = vec![true; n];

    let mut sinks: Vec<usize> = Vec::new();
    let mut sources: Vec<usize> = Vec::new();
    let mut queue = BucketQueue::new(n);

    for v in 0..n {
        if outdeg[v] == 0 {
            sinks.push(v);
        } else if indeg[v] == 0 {
            sources.push(v);
        } else {
            queue.push(v, outdeg[v] - indeg[v]);
        }
    }

    let mut s1: Vec<usize> = Vec::new();
    let mut s2: Vec<usize> = Vec::new();
    let mut cur_max = n as i64 - 1;

    let mut remaining = n;
    while remaining > 0 {
        let v = if let Some(v) = sinks.pop() {
            s2.push(v);
            v
        } else if let Some(v) = sources.pop() {
            s1.push(v);
            v
        } else {
            let (delta, v) = queue
                .max_nonempty_at_or_below(cur_max)
                .expect("bucket queue non-empty while vertices remain");
            cur_max = delta;
            queue.pop(v);
            s1.push(v);
            v
        };

        alive[v] = false;
        remaining -= 1;

        for &u in &incoming[v] {
            if u == v || !alive[u] {
                continue;
            }
            outdeg[u] -= 1;
            if outdeg[u] == 0 {
                if queue.is_resident(u) {
                    queue.pop(u);
                }
                sinks.push(u);
            } else if queue.is_resident(u) {
                queue.update(u, outdeg[u] - indeg[u]);
            }
        }

        for &w in &graph.adj[v] {
            if w == v || !alive[w] {
                continue;
            }
            indeg[w] -= 1;
            if indeg[w] == 0 {
                if outdeg[w] == 0 {
                    // already a sink; leave it there, sink priority wins.
                    continue;
                }
                if queue.is_resident(w) {
                    queue.pop(w);
                }
                sources.push(w);
            } else if queue.is_resident(w) {
                queue.update(w, outdeg[w] - indeg[w]);
            }
        }
    }

    let ordering: Vec<usize> = s1.into_iter().chain(s2.into_iter().rev()).collect();
    let mut pos = vec![0usize; n];
    for (i, &v) in ordering.iter().enumerate() {
        pos[v] = i;
    }

    let mut adj = vec![Vec::new(); n];
    let mut feedback_arcs = Vec::new();
    for (u, v) in original_edges {
        if pos[u] > pos[v] {
            adj[v].push(u);
            feedback_arcs.push((u, v));
        } else {
            adj[u].push(v);
        }
    }

    let dag = DenseGraph::new(adj, true)?;
    Ok(CycleRemoval { dag, feedback_arcs })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_cycle_reverses_exactly_one_edge() {
        let g = DenseGraph::from_edges(3, &[(0, 1), (1, 2), (2, 0)], true).unwrap();
        let result = remove_cycles(&g).unwrap();
        assert_eq!(result.feedback_arcs.len(), 1);
        assert_eq!(result.dag.edges().len(), 3);
    }

    #[test]
    fn acyclic_graph_has_no_feedback_arcs() {
        let g = DenseGraph::from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)], true).unwrap();
        let result = remove_cycles(&g).unwrap();
        assert!(result.feedback_arcs.is_empty());
        assert_eq!(result.dag.edges().len(), 4);
    }

    #[test]
    fn empty_graph_has_no_feedback_arcs() {
        let g = DenseGraph::new(Vec::new(), true).unwrap();
        let result = remove_cycles(&g).unwrap();
        assert!(result.feedback_arcs.is_empty());
    }

    #[test]
    fn output_is_acyclic_for_dense_cycle() {
        let edges: Vec<(usize, usize)> = (0..6).map(|i| (i, (i + 1) % 6)).collect();
        let g = DenseGraph::from_edges(6, &edges, true).unwrap();
        let result = remove_cycles(&g).unwrap();

        // simple topological-sort check: repeatedly remove zero-indegree vertices.
        let n = result.dag.n();
        let mut indeg = vec![0i64; n];
        for (_, v) in result.dag.edges() {
            indeg[v] += 1;
        }
        let mut queue: Vec<usize> = (0..n).filter(|&v| indeg[v] == 0).collect();
        let mut visited = 0;
        let adj = &result.dag.adj;
        while let Some(v) = queue.pop() {
            visited += 1;
            for &w in &adj[v] {
                indeg[w] -= 1;
                if indeg[w] == 0 {
                    queue.push(w);
                }
            }
        }
        assert_eq!(visited, n, "cycle-removed graph must be acyclic");
    }
}
