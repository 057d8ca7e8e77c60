use crate::error::LayoutError;
use crate::graph::DenseGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for nodes and edges
pub type Id = String;

/// Key-value pair for metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

/// Node in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: Id,
    pub position: Option<(f64, f64)>,
    #[serde(default)]
    pub metadata: HashMap<String, MetadataValue>,
    #[serde(default)]
    pub label: String,
}

impl Node {
    pub fn new(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            position: None,
            metadata: HashMap::new(),
            label: String::new(),
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some((x, y));
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Edge in the graph. For directed graphs, `source -> target`. For
/// undirected graphs the orientation is arbitrary but each pair should
/// appear only once; `Graph::to_dense` mirrors it onto both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default = "generate_edge_id")]
    pub id: Id,
    pub source: Id,
    pub target: Id,
    #[serde(default)]
    pub metadata: HashMap<String, MetadataValue>,
}

fn generate_edge_id() -> String {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    format!("e{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

impl Edge {
    pub fn new(id: impl Into<Id>, source: impl Into<Id>, target: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Complete graph structure as a caller assembles it, before the dense
/// remapping the core requires.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Graph {
    pub nodes: HashMap<Id, Node>,
    pub edges: HashMap<Id, Edge>,
    /// Whether `edges` should be read as directed (Sugiyama) or undirected
    /// (force-directed family). Checked against the requested algorithm at
    /// the façade (`LayoutError::WrongGraphKind` on mismatch).
    #[serde(default)]
    pub directed: bool,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Self::default()
        }
    }

    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.insert(node.id.clone(), node);
        self
    }

    pub fn add_edge(&mut self, edge: Edge) -> &mut Self {
        self.edges.insert(edge.id.clone(), edge);
        self
    }

    pub fn remove_node(&mut self, id: &Id) -> Option<Node> {
        let edges_to_remove: Vec<Id> = self
            .edges
            .values()
            .filter(|e| e.source == *id || e.target == *id)
            .map(|e| e.id.clone())
            .collect();

        for edge_id in edges_to_remove {
            self.edges.remove(&edge_id);
        }

        self.nodes.remove(id)
    }

    pub fn remove_edge(&mut self, id: &Id) -> Option<Edge> {
        self.edges.remove(id)
    }

    /// Maps arbitrary ids to dense `0..n` indices, first-seen order over the
    /// sorted id sequence (ids sort lexically since `Id = String`, giving a
    /// deterministic mapping independent of `HashMap` iteration order).
    ///
    /// Returns the dense graph plus the `index -> Id` table so callers can
    /// translate layout output back onto node ids.
    pub fn to_dense(&self) -> Result<(DenseGraph, Vec<Id>), LayoutError> {
        let mut ids: Vec<&Id> = self.nodes.keys().collect();
        ids.sort();

        let index_of: HashMap<&Id, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let n = ids.len();
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];

        for edge in self.edges.values() {
            let u = *index_of.get(&edge.source).ok_or_else(|| {
                LayoutError::InvalidGraph(format!(
                    "edge {} references unknown source {}",
                    edge.id, edge.source
                ))
            })?;
            let v = *index_of.get(&edge.target).ok_or_else(|| {
                LayoutError::InvalidGraph(format!(
                    "edge {} references unknown target {}",
                    edge.id, edge.target
                ))
            })?;

            adj[u].push(v);
            if !self.directed && u != v {
                adj[v].push(u);
            }
        }

        let dense = DenseGraph::new(adj, self.directed)?;
        let ids: Vec<Id> = ids.into_iter().cloned().collect();
        Ok((dense, ids))
    }
}

/// Helper struct for deserializing graph JSON (array-of-nodes,
/// array-of-edges shape rather than the id-keyed maps `Graph` uses
/// internally). Producing a `GraphFile` from a file on disk is the file
/// parser's job and stays out of scope; this is only the data shape.
#[derive(Debug, Deserialize)]
pub struct GraphFile {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub directed: bool,
}

impl From<GraphFile> for Graph {
    fn from(file: GraphFile) -> Self {
        let mut graph = Graph {
            directed: file.directed,
            ..Graph::default()
        };
        for node in file.nodes {
            graph.nodes.insert(node.id.clone(), node);
        }
        for edge in file.edges {
            graph.edges.insert(edge.id.clone(), edge);
        }
        graph
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::String(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_string())
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Number(value)
    }
}

impl From<i32> for MetadataValue {
    fn from(value: i32) -> Self {
        MetadataValue::Number(value as f64)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_node_and_edge() {
        let mut g = Graph::new();
        g.add_node(Node::new("a")).add_node(Node::new("b"));
        g.add_edge(Edge::new("e1", "a", "b"));

        assert_eq!(g.nodes.len(), 2);
        assert_eq!(g.edges.len(), 1);
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut g = Graph::new();
        g.add_node(Node::new("a")).add_node(Node::new("b"));
        g.add_edge(Edge::new("e1", "a", "b"));

        g.remove_node(&"a".to_string());
        assert!(g.nodes.get("a").is_none());
        assert!(g.edges.is_empty());
    }

    #[test]
    fn to_dense_maps_ids_lexically_and_mirrors_undirected_edges() {
        let mut g = Graph::new();
        g.add_node(Node::new("b")).add_node(Node::new("a"));
        g.add_edge(Edge::new("e1", "a", "b"));

        let (dense, ids) = g.to_dense().unwrap();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(dense.n(), 2);
        assert_eq!(dense.adj[0], vec![1]);
        assert_eq!(dense.adj[1], vec![0]);
    }

    #[test]
    fn to_dense_directed_keeps_single_direction() {
        let mut g = Graph::directed();
        g.add_node(Node::new("a")).add_node(Node::new("b"));
        g.add_edge(Edge::new("e1", "a", "b"));

        let (dense, _) = g.to_dense().unwrap();
        assert_eq!(dense.adj[0], vec![1]);
        assert!(dense.adj[1].is_empty());
    }

    #[test]
    fn to_dense_rejects_dangling_edge() {
        let mut g = Graph::new();
        g.add_node(Node::new("a"));
        g.add_edge(Edge::new("e1", "a", "ghost"));

        assert!(g.to_dense().is_err());
    }
}
