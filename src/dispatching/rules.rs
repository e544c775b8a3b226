//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Time-based**: SPT, LPT
//! - **Work-remaining**: MWKR, LWKR
//! - **Queue**: FIFO
//!
//! # Score Convention
//! All rules return lower scores for nodes that should be released first.

use super::{DispatchContext, DispatchingRule, RuleScore};
use crate::models::Graph;

// ======================== Time-based rules ========================

/// Shortest Processing Time.
///
/// Releases the ready node with the shortest duration first. On the first
/// machine this favours jobs that free the bottleneck early.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, node: usize, graph: &Graph, _context: &DispatchContext) -> RuleScore {
        graph.nodes()[node].duration()
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Longest Processing Time.
#[derive(Debug, Clone, Copy)]
pub struct Lpt;

impl DispatchingRule for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn evaluate(&self, node: usize, graph: &Graph, _context: &DispatchContext) -> RuleScore {
        -graph.nodes()[node].duration()
    }

    fn description(&self) -> &'static str {
        "Longest Processing Time"
    }
}

// ======================== Work-remaining rules ========================

/// Most Work Remaining.
///
/// Releases the node heading the longest remaining chain, i.e. the node
/// on the critical path.
#[derive(Debug, Clone, Copy)]
pub struct Mwkr;

impl DispatchingRule for Mwkr {
    fn name(&self) -> &'static str {
        "MWKR"
    }

    fn evaluate(&self, node: usize, _graph: &Graph, context: &DispatchContext) -> RuleScore {
        -context.tail(node)
    }

    fn description(&self) -> &'static str {
        "Most Work Remaining"
    }
}

/// Least Work Remaining.
#[derive(Debug, Clone, Copy)]
pub struct Lwkr;

impl DispatchingRule for Lwkr {
    fn name(&self) -> &'static str {
        "LWKR"
    }

    fn evaluate(&self, node: usize, _graph: &Graph, context: &DispatchContext) -> RuleScore {
        context.tail(node)
    }

    fn description(&self) -> &'static str {
        "Least Work Remaining"
    }
}

// ======================== Queue rules ========================

/// First In, First Out: every node scores the same, insertion order decides.
#[derive(Debug, Clone, Copy)]
pub struct Fifo;

impl DispatchingRule for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn evaluate(&self, _node: usize, _graph: &Graph, _context: &DispatchContext) -> RuleScore {
        0.0
    }

    fn description(&self) -> &'static str {
        "First In First Out"
    }
}
