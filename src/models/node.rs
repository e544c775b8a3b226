//! Node (task) model.
//!
//! A node is one task of a batch recipe: a job's step on a specific
//! machine (`J1_M2`) or a product node that collects a finished job (`P1`).
//!
//! # Naming Convention
//! Machine-qualified nodes are named `"<baseID>_M<m>"` with a 1-based
//! machine index. Every other node is treated as a product (sink) node.

use serde::{Deserialize, Serialize};

/// A task in the S-graph.
///
/// Durations are stored per machine. A duration of 0 means the task is not
/// processed on that machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier (matched case-insensitively).
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Processing duration per machine (index 0 = machine 1).
    pub durations: Vec<f64>,
}

impl Node {
    /// Creates a node with no description and no durations.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            durations: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the full per-machine duration vector.
    ///
    /// Negative values are clamped to 0.
    pub fn with_durations(mut self, durations: Vec<f64>) -> Self {
        self.durations = durations.into_iter().map(|d| d.max(0.0)).collect();
        self
    }

    /// Sets a single processing duration.
    pub fn with_duration(self, duration: f64) -> Self {
        self.with_durations(vec![duration])
    }

    /// Effective processing duration: first positive entry, 0 if none.
    pub fn duration(&self) -> f64 {
        self.durations
            .iter()
            .copied()
            .find(|&d| d > 0.0)
            .unwrap_or(0.0)
    }

    /// Duration on a 1-based machine index (0 if absent).
    pub fn duration_on(&self, machine: usize) -> f64 {
        machine
            .checked_sub(1)
            .and_then(|i| self.durations.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Lookup key (case-insensitive identity).
    pub fn key(&self) -> String {
        node_key(&self.id)
    }

    /// Splits a machine-qualified id into `(base, machine)`.
    pub fn machine_ref(&self) -> Option<(&str, usize)> {
        parse_machine_id(&self.id)
    }

    /// Whether this node is a product (not machine-qualified).
    pub fn is_product(&self) -> bool {
        self.machine_ref().is_none()
    }
}

/// Normalizes an identifier into its lookup key.
pub fn node_key(id: &str) -> String {
    id.to_ascii_lowercase()
}

/// Builds the machine-qualified id `"<base>_M<machine>"`.
pub fn machine_node_id(base: &str, machine: usize) -> String {
    format!("{base}_M{machine}")
}

/// Parses `"<base>_M<m>"` (case-insensitive `M`, `m` ≥ 1).
pub fn parse_machine_id(id: &str) -> Option<(&str, usize)> {
    let split = id.rfind('_')?;
    let (base, rest) = (&id[..split], &id[split + 1..]);
    let digits = rest.strip_prefix('M').or_else(|| rest.strip_prefix('m'))?;
    if base.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<usize>() {
        Ok(m) if m >= 1 => Some((base, m)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let n = Node::new("J1_M1")
            .with_description("Mix batch 1")
            .with_durations(vec![0.0, 3.0, -2.0]);
        assert_eq!(n.id, "J1_M1");
        assert_eq!(n.description, "Mix batch 1");
        assert_eq!(n.durations, vec![0.0, 3.0, 0.0]);
    }

    #[test]
    fn test_effective_duration_is_first_positive() {
        assert_eq!(Node::new("a").with_durations(vec![0.0, 4.0, 2.0]).duration(), 4.0);
        assert_eq!(Node::new("a").duration(), 0.0);
        assert_eq!(Node::new("a").with_durations(vec![0.0, 0.0]).duration(), 0.0);
    }

    #[test]
    fn test_duration_on_machine() {
        let n = Node::new("J1").with_durations(vec![5.0, 2.0]);
        assert_eq!(n.duration_on(1), 5.0);
        assert_eq!(n.duration_on(2), 2.0);
        assert_eq!(n.duration_on(3), 0.0);
        assert_eq!(n.duration_on(0), 0.0);
    }

    #[test]
    fn test_parse_machine_id() {
        assert_eq!(parse_machine_id("J1_M2"), Some(("J1", 2)));
        assert_eq!(parse_machine_id("batch_a_m10"), Some(("batch_a", 10)));
        assert_eq!(parse_machine_id("P1"), None);
        assert_eq!(parse_machine_id("_M1"), None);
        assert_eq!(parse_machine_id("J1_M0"), None);
        assert_eq!(parse_machine_id("J1_Mx"), None);
        assert_eq!(parse_machine_id("J1_X1"), None);
    }

    #[test]
    fn test_product_detection() {
        assert!(Node::new("P1").is_product());
        assert!(!Node::new("J3_M1").is_product());
        assert_eq!(machine_node_id("J3", 1), "J3_M1");
    }

    #[test]
    fn test_key_is_case_insensitive() {
        assert_eq!(Node::new("J1_M1").key(), Node::new("j1_m1").key());
    }
}
