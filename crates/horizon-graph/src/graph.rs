//! Immutable graph of nodes and weighted directed edges.
//!
//! A [`Graph`] is a value: `add_node` and `add_edge` leave the receiver
//! untouched and return a new graph, so any number of earlier versions
//! can be held and read concurrently.

use std::collections::HashMap;

use thiserror::Error;

/// Graph construction errors.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// An edge endpoint names a node that is not in the graph
    #[error("no node with id \"{0}\" exists")]
    UnknownNode(String),

    /// An edge weight is negative
    #[error("{field} must be non-negative, got {value}")]
    NegativeWeight {
        /// Which weight was rejected
        field: &'static str,
        /// The rejected value
        value: f64,
    },
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Directed edge to a target node.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    length: f64,
    rate: f64,
    target: String,
}

impl Edge {
    /// Creates an edge; `length` and `rate` must be non-negative.
    pub fn new(length: f64, rate: f64, target: impl Into<String>) -> GraphResult<Self> {
        if length < 0.0 {
            return Err(GraphError::NegativeWeight {
                field: "length",
                value: length,
            });
        }
        if rate < 0.0 {
            return Err(GraphError::NegativeWeight {
                field: "rate",
                value: rate,
            });
        }

        Ok(Self {
            length,
            rate,
            target: target.into(),
        })
    }

    /// Edge length.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Traversal rate along the edge.
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// Id of the target node.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Graph node with outgoing edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    edges: Vec<Edge>,
}

impl Node {
    /// Creates a node with no outgoing edges.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            edges: Vec::new(),
        }
    }

    /// The node id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Outgoing edges.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// Immutable graph with copy-on-write updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: HashMap<String, Node>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new graph with an additional (or replaced) empty node.
    #[must_use]
    pub fn add_node(&self, id: impl Into<String>) -> Self {
        let id = id.into();
        let mut nodes = self.nodes.clone();
        nodes.insert(id.clone(), Node::new(id));

        Self { nodes }
    }

    /// Returns a new graph with an edge from `start` to `end`.
    ///
    /// Both endpoints must already be nodes of the graph.
    pub fn add_edge(&self, start: &str, end: &str, length: f64, rate: f64) -> GraphResult<Self> {
        if !self.nodes.contains_key(start) {
            return Err(GraphError::UnknownNode(start.to_owned()));
        }
        if !self.nodes.contains_key(end) {
            return Err(GraphError::UnknownNode(end.to_owned()));
        }

        let edge = Edge::new(length, rate, end)?;

        let mut nodes = self.nodes.clone();
        if let Some(node) = nodes.get_mut(start) {
            node.edges.push(edge);
        }

        Ok(Self { nodes })
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Whether a node with the given id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over `(id, node)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_nodes_leaves_earlier_graphs_unchanged() {
        let graph0 = Graph::new();
        let graph1 = graph0.add_node("one");
        let graph2 = graph1.add_node("two");

        assert!(graph0.is_empty());

        assert_eq!(graph1.len(), 1);
        assert!(graph1.contains("one"));
        assert_eq!(graph1.get("one").map(Node::id), Some("one"));

        assert_eq!(graph2.len(), 2);
        assert!(graph2.contains("one"));
        assert!(graph2.contains("two"));
    }

    #[test]
    fn test_add_edges_accumulate_per_version() {
        let graph0 = Graph::new().add_node("one").add_node("two").add_node("three");
        let graph1 = graph0.add_edge("one", "two", 1.0, 1.0).expect("add edge");
        let graph2 = graph1.add_edge("two", "three", 2.0, 2.0).expect("add edge");

        let edge_total = |g: &Graph| -> usize { g.iter().map(|(_, n)| n.edges().len()).sum() };
        let length_total =
            |g: &Graph| -> f64 { g.iter().flat_map(|(_, n)| n.edges()).map(Edge::length).sum() };

        assert_eq!(edge_total(&graph0), 0);

        assert_eq!(graph1.get("one").expect("node").edges().len(), 1);
        assert_eq!(graph1.get("two").expect("node").edges().len(), 0);
        assert!((length_total(&graph1) - 1.0).abs() < f64::EPSILON);

        assert_eq!(graph2.get("one").expect("node").edges().len(), 1);
        assert_eq!(graph2.get("two").expect("node").edges().len(), 1);
        assert_eq!(graph2.get("three").expect("node").edges().len(), 0);
        assert!((length_total(&graph2) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_edge_rejects_unknown_endpoints() {
        let graph = Graph::new().add_node("one");

        assert_eq!(
            graph.add_edge("one", "ghost", 1.0, 1.0),
            Err(GraphError::UnknownNode("ghost".into()))
        );
        assert_eq!(
            graph.add_edge("ghost", "one", 1.0, 1.0),
            Err(GraphError::UnknownNode("ghost".into()))
        );
    }

    #[test]
    fn test_negative_weights_rejected() {
        let graph = Graph::new().add_node("one").add_node("two");

        assert!(matches!(
            graph.add_edge("one", "two", -1.0, 1.0),
            Err(GraphError::NegativeWeight { field: "length", .. })
        ));
        assert!(matches!(
            graph.add_edge("one", "two", 1.0, -1.0),
            Err(GraphError::NegativeWeight { field: "rate", .. })
        ));
    }
}
