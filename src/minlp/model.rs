//! Mathematical-programming formulation of an S-graph.
//!
//! # Formulation
//!
//! ```text
//! minimize   T
//! subject to t_to − t_from ≥ cost          for every edge from → to
//!            T − t_id      ≥ duration(id)  for every node
//!            0 ≤ t_id ≤ 1000,  0 ≤ T ≤ 10000
//! ```
//!
//! The model is written in AMPL-style text so that any solver front end
//! accepting that syntax can consume it.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::models::Graph;

/// Prefix of per-node start-time variables.
pub const START_PREFIX: &str = "t_";
/// Name of the makespan variable.
pub const MAKESPAN_VAR: &str = "T";
/// Upper bound of start-time variables.
pub const START_UPPER: f64 = 1000.0;
/// Upper bound of the makespan variable.
pub const MAKESPAN_UPPER: f64 = 10000.0;

/// A bounded continuous variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

/// `plus − minus ≥ rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceConstraint {
    pub name: String,
    pub plus: String,
    pub minus: String,
    pub rhs: f64,
}

/// Makespan-minimization model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinlpModel {
    variables: Vec<Variable>,
    constraints: Vec<DifferenceConstraint>,
}

impl MinlpModel {
    /// Builds the model for a graph. Dangling edges are skipped.
    pub fn from_graph(graph: &Graph) -> Self {
        let mut variables: Vec<Variable> = graph
            .nodes()
            .iter()
            .map(|n| Variable {
                name: start_var(&n.id),
                lower: 0.0,
                upper: START_UPPER,
            })
            .collect();
        variables.push(Variable {
            name: MAKESPAN_VAR.to_string(),
            lower: 0.0,
            upper: MAKESPAN_UPPER,
        });

        let mut constraints = Vec::with_capacity(graph.edge_count() + graph.node_count());
        for (k, edge) in graph.edges().iter().enumerate() {
            let Some((u, v)) = graph.endpoints(edge) else {
                continue;
            };
            constraints.push(DifferenceConstraint {
                name: format!("edge_{k}"),
                plus: start_var(&graph.nodes()[v].id),
                minus: start_var(&graph.nodes()[u].id),
                rhs: edge.cost,
            });
        }
        for (i, node) in graph.nodes().iter().enumerate() {
            constraints.push(DifferenceConstraint {
                name: format!("finish_{i}"),
                plus: MAKESPAN_VAR.to_string(),
                minus: start_var(&node.id),
                rhs: node.duration(),
            });
        }

        Self {
            variables,
            constraints,
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[DifferenceConstraint] {
        &self.constraints
    }

    /// Renders the model as AMPL-style text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for var in &self.variables {
            let _ = writeln!(out, "var {} >= {}, <= {};", var.name, var.lower, var.upper);
        }
        let _ = writeln!(out, "minimize makespan: {MAKESPAN_VAR};");
        for c in &self.constraints {
            let _ = writeln!(out, "subject to {}: {} - {} >= {};", c.name, c.plus, c.minus, c.rhs);
        }
        out
    }
}

/// Start-time variable name for a node id.
pub fn start_var(id: &str) -> String {
    format!("{START_PREFIX}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    fn sample() -> Graph {
        let mut g = Graph::new();
        g.add_node(Node::new("A_M1").with_duration(3.0));
        g.add_node(Node::new("P1"));
        g.add_edge("A_M1", "P1", 2.0);
        g.add_edge_allow_dangling("A_M1", "GONE", 1.0);
        g
    }

    #[test]
    fn test_variables_and_bounds() {
        let model = MinlpModel::from_graph(&sample());
        let names: Vec<&str> = model.variables().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["t_A_M1", "t_P1", "T"]);
        assert_eq!(model.variables()[0].upper, 1000.0);
        assert_eq!(model.variables()[2].upper, 10000.0);
    }

    #[test]
    fn test_constraints_include_duration() {
        let model = MinlpModel::from_graph(&sample());
        // One edge constraint (dangling skipped) plus one per node.
        assert_eq!(model.constraints().len(), 3);
        let edge = &model.constraints()[0];
        assert_eq!((edge.plus.as_str(), edge.minus.as_str(), edge.rhs), ("t_P1", "t_A_M1", 2.0));
        let finish = &model.constraints()[1];
        assert_eq!((finish.plus.as_str(), finish.minus.as_str(), finish.rhs), ("T", "t_A_M1", 3.0));
    }

    #[test]
    fn test_text_rendering() {
        let text = MinlpModel::from_graph(&sample()).to_text();
        assert!(text.contains("var t_A_M1 >= 0, <= 1000;\n"));
        assert!(text.contains("minimize makespan: T;\n"));
        assert!(text.contains("subject to edge_0: t_P1 - t_A_M1 >= 2;\n"));
        assert!(text.contains("subject to finish_1: T - t_P1 >= 0;\n"));
    }
}
