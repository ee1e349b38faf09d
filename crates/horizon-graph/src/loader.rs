//! Declarative graph loading.
//!
//! Graphs are described as RON documents listing nodes and edges:
//!
//! ```ron
//! (
//!     nodes: [(id: "one"), (id: "two")],
//!     edges: [(start: "one", end: "two", length: 3.0, rate: 1.0)],
//! )
//! ```
//!
//! Loading folds the edge list through [`Graph::add_edge`], so a document
//! with a dangling edge endpoint fails the same way manual construction
//! does.

use serde::Deserialize;
use thiserror::Error;

use crate::graph::{Graph, GraphError};

/// Errors from loading a graph document.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The document is not valid RON for the graph schema
    #[error("graph document parse failed: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The document describes an invalid graph
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Deserialize)]
struct NodeDoc {
    id: String,
}

#[derive(Debug, Deserialize)]
struct EdgeDoc {
    start: String,
    end: String,
    length: f64,
    rate: f64,
}

#[derive(Debug, Deserialize)]
struct GraphDoc {
    nodes: Vec<NodeDoc>,
    #[serde(default)]
    edges: Vec<EdgeDoc>,
}

/// Loads a graph from a RON document.
pub fn load_graph(source: &str) -> Result<Graph, LoaderError> {
    let doc: GraphDoc = ron::from_str(source)?;

    let graph = doc
        .nodes
        .iter()
        .fold(Graph::new(), |graph, node| graph.add_node(&node.id));

    let graph = doc.edges.iter().try_fold(graph, |graph, edge| {
        graph.add_edge(&edge.start, &edge.end, edge.length, edge.rate)
    })?;

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nodes() {
        let graph = load_graph(
            r#"(
                nodes: [(id: "one"), (id: "two"), (id: "three")],
            )"#,
        )
        .expect("load");

        assert!(graph.contains("one"));
        assert!(graph.contains("two"));
        assert!(graph.contains("three"));
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_load_edges() {
        let graph = load_graph(
            r#"(
                nodes: [(id: "one"), (id: "two"), (id: "three")],
                edges: [
                    (start: "one", end: "two", length: 3.0, rate: 1.0),
                    (start: "two", end: "three", length: 5.0, rate: 2.0),
                    (start: "three", end: "one", length: 4.0, rate: 3.0),
                    (start: "one", end: "three", length: 4.0, rate: 4.0),
                ],
            )"#,
        )
        .expect("load");

        assert_eq!(graph.get("one").expect("node").edges().len(), 2);
        assert_eq!(graph.get("two").expect("node").edges().len(), 1);
        assert_eq!(graph.get("three").expect("node").edges().len(), 1);
    }

    #[test]
    fn test_load_rejects_dangling_edge() {
        let result = load_graph(
            r#"(
                nodes: [(id: "one")],
                edges: [(start: "one", end: "missing", length: 1.0, rate: 1.0)],
            )"#,
        );

        assert!(matches!(result, Err(LoaderError::Graph(GraphError::UnknownNode(_)))));
    }

    #[test]
    fn test_load_rejects_malformed_document() {
        assert!(matches!(
            load_graph("this is not ron"),
            Err(LoaderError::Parse(_))
        ));
    }
}
