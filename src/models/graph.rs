//! S-graph model: nodes plus weighted precedence edges.
//!
//! The graph owns its nodes (keyed case-insensitively) and an ordered edge
//! list. Edge order matters only for deterministic tie-breaking in the
//! analysis passes. Parallel edges between the same pair are kept.
//!
//! # Reference
//! Sanmartí et al. (2002), "Combinatorial framework for effective scheduling
//! of multipurpose batch plants", AIChE Journal 48(11)

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

use super::node::{node_key, Node};

/// A precedence relation `from → to` with a non-negative delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
    /// Delay between the source's finish and the target's start.
    pub cost: f64,
}

impl Edge {
    /// Creates an edge. Negative costs are clamped to 0.
    pub fn new(from: impl Into<String>, to: impl Into<String>, cost: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            cost: cost.max(0.0),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct GraphData {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

/// Directed task graph.
///
/// # Example
/// ```
/// use u_sgraph::models::{Graph, Node};
///
/// let mut g = Graph::new();
/// g.add_node(Node::new("J1_M1").with_duration(3.0));
/// g.add_node(Node::new("P1"));
/// assert!(g.add_edge("J1_M1", "P1", 0.0));
/// assert!(!g.add_edge("J1_M1", "missing", 0.0));
/// assert_eq!(g.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphData", into = "GraphData")]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
}

impl From<GraphData> for Graph {
    fn from(data: GraphData) -> Self {
        let mut graph = Graph::new();
        for node in data.nodes {
            graph.add_node(node);
        }
        for edge in data.edges {
            graph.add_edge(&edge.from, &edge.to, edge.cost);
        }
        graph
    }
}

impl From<Graph> for GraphData {
    fn from(graph: Graph) -> Self {
        GraphData {
            nodes: graph.nodes,
            edges: graph.edges,
        }
    }
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. Returns `false` (and leaves the graph unchanged) if a
    /// node with the same key already exists.
    pub fn add_node(&mut self, node: Node) -> bool {
        let key = node.key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Adds an edge between two existing nodes.
    ///
    /// Returns `false` without modifying the graph if either endpoint is
    /// unknown.
    pub fn add_edge(&mut self, from: &str, to: &str, cost: f64) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        self.edges.push(Edge::new(from, to, cost));
        true
    }

    /// Adds an edge even if an endpoint is unknown, logging a warning.
    ///
    /// Dangling edges are ignored by topological ordering; a node whose only
    /// predecessor is unknown stays unreachable in critical-path analysis.
    pub fn add_edge_allow_dangling(&mut self, from: &str, to: &str, cost: f64) {
        if !self.contains(from) || !self.contains(to) {
            warn!(from, to, "adding edge with unknown endpoint");
        }
        self.edges.push(Edge::new(from, to, cost));
    }

    /// Removes every edge, keeping the nodes.
    pub fn clear_edges(&mut self) {
        self.edges.clear();
    }

    /// Returns a copy of this graph's nodes combined with a new edge set.
    pub fn with_edge_set(&self, edges: Vec<Edge>) -> Graph {
        Graph {
            nodes: self.nodes.clone(),
            index: self.index.clone(),
            edges,
        }
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(&node_key(id))
    }

    /// Position of a node in insertion order.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(&node_key(id)).copied()
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolves an edge to `(from, to)` node indices.
    ///
    /// Returns `None` for dangling edges.
    pub fn endpoints(&self, edge: &Edge) -> Option<(usize, usize)> {
        Some((self.index_of(&edge.from)?, self.index_of(&edge.to)?))
    }

    /// Whether at least one edge `from → to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        let (from, to) = (node_key(from), node_key(to));
        self.edges
            .iter()
            .any(|e| node_key(&e.from) == from && node_key(&e.to) == to)
    }

    /// Indices of the designated sink nodes.
    ///
    /// Product nodes (not machine-qualified) are the sinks. A graph with no
    /// product nodes falls back to nodes without outgoing edges.
    pub fn sink_indices(&self) -> Vec<usize> {
        let products: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_product())
            .map(|(i, _)| i)
            .collect();
        if !products.is_empty() {
            return products;
        }

        let mut has_out = vec![false; self.nodes.len()];
        for edge in &self.edges {
            if let Some((u, _)) = self.endpoints(edge) {
                has_out[u] = true;
            }
        }
        (0..self.nodes.len()).filter(|&i| !has_out[i]).collect()
    }

    /// Distinct machine indices among machine-qualified nodes, ascending.
    pub fn machine_indices(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .filter_map(|n| n.machine_ref().map(|(_, m)| m))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of distinct machines.
    pub fn machine_count(&self) -> usize {
        self.machine_indices().len()
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}
