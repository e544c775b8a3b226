//! Input validation for S-graphs.
//!
//! Checks structural integrity of node and edge records before scheduling.
//! Detects:
//! - Duplicate node IDs (case-insensitive)
//! - Edges referencing unknown nodes
//! - Negative durations or edge costs
//! - Self-loops and circular precedence (DAG validation)
//!
//! [`Graph`] already rejects duplicates and clamps negative values on
//! insertion, so the record-level checks matter mostly for data assembled
//! by hand or deserialized without going through the graph API.
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks", CACM 5(11)

use std::collections::{HashMap, VecDeque};

use crate::models::{node_key, Edge, Graph, Node};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two nodes share the same ID.
    DuplicateId,
    /// An edge references a node that doesn't exist.
    DanglingEdge,
    /// A node has a negative duration entry.
    NegativeDuration,
    /// An edge has a negative cost.
    NegativeCost,
    /// An edge starts and ends at the same node.
    SelfLoop,
    /// Precedence graph contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a graph.
pub fn validate_graph(graph: &Graph) -> ValidationResult {
    validate_parts(graph.nodes(), graph.edges())
}

/// Validates raw node and edge records.
///
/// Checks:
/// 1. No duplicate node IDs
/// 2. No negative durations
/// 3. Every edge endpoint exists
/// 4. No negative costs, no self-loops
/// 5. No circular precedence
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_parts(nodes: &[Node], edges: &[Edge]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut distinct: Vec<&Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if index.contains_key(&node.key()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate node ID: {}", node.id),
            ));
            continue;
        }
        index.insert(node.key(), distinct.len());
        distinct.push(node);

        if node.durations.iter().any(|&d| d < 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeDuration,
                format!("Node '{}' has a negative duration", node.id),
            ));
        }
    }

    let mut resolved = Vec::with_capacity(edges.len());
    for edge in edges {
        let from = index.get(&node_key(&edge.from));
        let to = index.get(&node_key(&edge.to));
        for (id, found) in [(&edge.from, from), (&edge.to, to)] {
            if found.is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DanglingEdge,
                    format!("Edge '{}' -> '{}' references unknown node '{}'", edge.from, edge.to, id),
                ));
            }
        }
        if edge.cost < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeCost,
                format!("Edge '{}' -> '{}' has negative cost {}", edge.from, edge.to, edge.cost),
            ));
        }
        if let (Some(&u), Some(&v)) = (from, to) {
            if u == v {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfLoop,
                    format!("Edge '{}' -> '{}' is a self-loop", edge.from, edge.to),
                ));
            } else {
                resolved.push((u, v));
            }
        }
    }

    if let Some(stuck) = first_cyclic_node(distinct.len(), &resolved) {
        errors.push(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!(
                "Circular dependency detected involving node '{}'",
                distinct[stuck].id
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Runs Kahn's algorithm and returns the lowest-index node left with a
/// positive in-degree, if any.
fn first_cyclic_node(n: usize, edges: &[(usize, usize)]) -> Option<usize> {
    let mut adj = vec![Vec::new(); n];
    let mut indegree = vec![0usize; n];
    for &(u, v) in edges {
        adj[u].push(v);
        indegree[v] += 1;
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    while let Some(u) = queue.pop_front() {
        for &v in &adj[u] {
            indegree[v] -= 1;
            if indegree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    (0..n).find(|&i| indegree[i] > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, d: f64) -> Node {
        Node::new(id).with_duration(d)
    }

    #[test]
    fn test_valid_graph() {
        let mut g = Graph::new();
        g.add_node(node("J1_M1", 3.0));
        g.add_node(Node::new("P1"));
        g.add_edge("J1_M1", "P1", 0.0);
        assert!(validate_graph(&g).is_ok());
    }

    #[test]
    fn test_duplicate_ids_case_insensitive() {
        let nodes = vec![node("A", 1.0), node("a", 2.0)];
        let errors = validate_parts(&nodes, &[]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);
    }

    #[test]
    fn test_dangling_edge() {
        let nodes = vec![node("A", 1.0)];
        let errors = validate_parts(&nodes, &[Edge::new("A", "B", 0.0)]).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::DanglingEdge);
        assert!(errors[0].message.contains("'B'"));
    }

    #[test]
    fn test_negative_values() {
        let mut a = node("A", 1.0);
        a.durations.push(-2.0);
        let mut edge = Edge::new("A", "B", 0.0);
        edge.cost = -1.0;
        let errors = validate_parts(&[a, node("B", 1.0)], &[edge]).unwrap_err();
        let kinds: Vec<_> = errors.iter().map(|e| e.kind.clone()).collect();
        assert!(kinds.contains(&ValidationErrorKind::NegativeDuration));
        assert!(kinds.contains(&ValidationErrorKind::NegativeCost));
    }

    #[test]
    fn test_cycle_detected() {
        let mut g = Graph::new();
        for id in ["A", "B", "C"] {
            g.add_node(node(id, 1.0));
        }
        g.add_edge("A", "B", 0.0);
        g.add_edge("B", "C", 0.0);
        g.add_edge("C", "B", 0.0);
        let errors = validate_graph(&g).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::CyclicDependency);
        assert!(errors[0].message.contains("'B'"));
    }

    #[test]
    fn test_self_loop() {
        let mut g = Graph::new();
        g.add_node(node("A", 1.0));
        g.add_edge("A", "A", 0.0);
        let errors = validate_graph(&g).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::SelfLoop);
    }

    #[test]
    fn test_reports_all_errors() {
        let nodes = vec![node("A", 1.0), node("A", 1.0)];
        let edges = vec![Edge::new("A", "X", 0.0), Edge::new("Y", "A", 0.0)];
        let errors = validate_parts(&nodes, &edges).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
