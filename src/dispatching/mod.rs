//! Ready-node dispatching rules for list scheduling.
//!
//! When several nodes are ready during a topological pass, a dispatching
//! rule decides which one is released first.
//!
//! # Usage
//!
//! ```
//! use u_sgraph::dispatching::{DispatchContext, DispatchingRule, RuleKind};
//! use u_sgraph::models::{Graph, Node};
//!
//! let mut g = Graph::new();
//! g.add_node(Node::new("A_M1").with_duration(4.0));
//! let ctx = DispatchContext::from_graph(&g).unwrap();
//! let rule = RuleKind::Spt.rule();
//! assert_eq!(rule.evaluate(0, &g, &ctx), 4.0);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
pub mod rules;

pub use context::DispatchContext;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::str::FromStr;

use crate::models::Graph;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (released first).
pub type RuleScore = f64;

/// A dispatching rule that scores a ready node.
///
/// # Score Convention
/// **Lower score = higher priority.** Ties are broken by node insertion
/// order in the caller.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT").
    fn name(&self) -> &'static str;

    /// Scores the node at `node` (index into `graph.nodes()`).
    fn evaluate(&self, node: usize, graph: &Graph, context: &DispatchContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Selectable built-in rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RuleKind {
    /// Insertion order.
    Fifo,
    /// Shortest processing time.
    #[default]
    Spt,
    /// Longest processing time.
    Lpt,
    /// Most work remaining (longest tail).
    Mwkr,
    /// Least work remaining (shortest tail).
    Lwkr,
}

impl RuleKind {
    /// Instantiates the rule.
    pub fn rule(self) -> Box<dyn DispatchingRule> {
        match self {
            RuleKind::Fifo => Box::new(rules::Fifo),
            RuleKind::Spt => Box::new(rules::Spt),
            RuleKind::Lpt => Box::new(rules::Lpt),
            RuleKind::Mwkr => Box::new(rules::Mwkr),
            RuleKind::Lwkr => Box::new(rules::Lwkr),
        }
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(RuleKind::Fifo),
            "spt" => Ok(RuleKind::Spt),
            "lpt" => Ok(RuleKind::Lpt),
            "mwkr" => Ok(RuleKind::Mwkr),
            "lwkr" => Ok(RuleKind::Lwkr),
            other => Err(format!("unknown dispatching rule '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_kind_parse() {
        assert_eq!("SPT".parse::<RuleKind>().unwrap(), RuleKind::Spt);
        assert_eq!("mwkr".parse::<RuleKind>().unwrap(), RuleKind::Mwkr);
        assert!("edd".parse::<RuleKind>().is_err());
        assert_eq!(RuleKind::default(), RuleKind::Spt);
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(RuleKind::Fifo.rule().name(), "FIFO");
        assert_eq!(RuleKind::Lpt.rule().description(), "Longest Processing Time");
    }
}
