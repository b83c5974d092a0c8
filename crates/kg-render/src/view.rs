//! Graph view derived from a triple set.

use kg_types::Triple;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Name given to the emitted `digraph`.
pub const GRAPH_NAME: &str = "AtomSpaceGraph";

/// Directed multigraph over a triple set.
///
/// One node per distinct subject/object label, in first-appearance order; one
/// edge per triple, labeled with the relation. Duplicate triples become
/// parallel edges.
///
/// # Example
///
/// ```rust
/// use kg_render::GraphView;
/// use kg_types::Triple;
///
/// let view = GraphView::from_triples(&[
///     Triple::new("Alice", "knows", "Bob"),
///     Triple::new("Alice", "knows", "Bob"),
/// ]);
/// assert_eq!(view.node_count(), 2);
/// assert_eq!(view.edge_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    graph: DiGraph<String, String>,
    index: HashMap<String, NodeIndex>,
}

impl GraphView {
    pub fn from_triples(triples: &[Triple]) -> Self {
        let mut view = Self {
            graph: DiGraph::with_capacity(triples.len() * 2, triples.len()),
            index: HashMap::new(),
        };
        for t in triples {
            let from = view.get_or_create_node(&t.subject);
            let to = view.get_or_create_node(&t.object);
            view.graph.add_edge(from, to, t.relation.clone());
        }
        view
    }

    fn get_or_create_node(&mut self, label: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }
        let idx = self.graph.add_node(label.to_string());
        self.index.insert(label.to_string(), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node labels in first-appearance order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// `(from, relation, to)` for every edge, in insertion order.
    pub fn edges(&self) -> Vec<(&str, &str, &str)> {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| {
                (
                    self.graph[e.source()].as_str(),
                    e.weight.as_str(),
                    self.graph[e.target()].as_str(),
                )
            })
            .collect()
    }

    /// Graphviz DOT source for a `digraph` named [`GRAPH_NAME`]. Labels are
    /// escaped by petgraph's DOT writer.
    pub fn to_dot(&self) -> String {
        let dot = Dot::new(&self.graph).to_string();
        match dot.strip_prefix("digraph {") {
            Some(body) => format!("digraph {} {{{}", GRAPH_NAME, body),
            None => dot,
        }
    }

    /// Get the underlying petgraph for advanced operations.
    pub fn as_petgraph(&self) -> &DiGraph<String, String> {
        &self.graph
    }
}
