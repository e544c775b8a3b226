//! List scheduling over the technological recipe.
//!
//! # Algorithm
//! 1. Run a prioritized topological pass over the recipe. Whenever several
//!    nodes are ready, the dispatching rule picks the one released first.
//! 2. The job order is the order in which jobs first appear in that pass.
//! 3. Build the candidate schedule for that order (same-job edges,
//!    per-machine sequencing edges, product edges) and propagate earliest
//!    finish times.
//!
//! With the default SPT rule the first machine releases its shortest job
//! first, which on small two-machine instances usually coincides with
//! Johnson's order.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{CandidateSchedule, FlowShop};
use crate::analysis::topological_order_by;
use crate::dispatching::{DispatchContext, RuleKind};
use crate::error::Result;
use crate::models::Schedule;

/// List scheduling configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Ready-node priority rule.
    pub rule: RuleKind,
}

impl ListConfig {
    /// Sets the priority rule.
    pub fn with_rule(mut self, rule: RuleKind) -> Self {
        self.rule = rule;
        self
    }

    /// Always valid; kept for symmetry with the other solver configs.
    pub fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Result of a list scheduling run.
#[derive(Debug, Clone)]
pub struct ListOutcome {
    /// Job order (indices into `shop.jobs()`).
    pub order: Vec<usize>,
    /// Node indices of the recipe in release order.
    pub release_order: Vec<usize>,
    /// Gantt-ready schedule with makespan.
    pub schedule: Schedule,
}

impl ListOutcome {
    /// Makespan of the produced schedule.
    pub fn makespan(&self) -> f64 {
        self.schedule.makespan.unwrap_or(0.0)
    }
}

/// Derives a job order from a prioritized topological pass.
///
/// Jobs whose nodes never show up (none in practice) are appended in
/// extraction order.
pub fn list_order(shop: &FlowShop, config: &ListConfig) -> Result<(Vec<usize>, Vec<usize>)> {
    let recipe = shop.recipe();
    let context = DispatchContext::from_graph(recipe)?;
    let rule = config.rule.rule();
    let release_order = topological_order_by(recipe, |i| rule.evaluate(i, recipe, &context))?;

    let mut job_of_node = vec![None; recipe.node_count()];
    for j in 0..shop.job_count() {
        for m in 1..=shop.machines() {
            if let Some(i) = shop.stage(j, m).and_then(|id| recipe.index_of(id)) {
                job_of_node[i] = Some(j);
            }
        }
    }

    let mut seen = vec![false; shop.job_count()];
    let mut order = Vec::with_capacity(shop.job_count());
    for &i in &release_order {
        if let Some(j) = job_of_node[i] {
            if !seen[j] {
                seen[j] = true;
                order.push(j);
            }
        }
    }
    order.extend((0..shop.job_count()).filter(|&j| !seen[j]));

    debug!(rule = rule.name(), order = ?shop.job_ids(&order), "list order");
    Ok((order, release_order))
}

/// Runs list scheduling and evaluates the resulting order.
///
/// # Errors
/// - [`crate::SchedError::InfeasibleGraph`] if the recipe has a cycle
/// - [`crate::SchedError::Unbounded`] if a product cannot be reached
pub fn list_schedule(shop: &FlowShop, config: &ListConfig) -> Result<ListOutcome> {
    let (order, release_order) = list_order(shop, config)?;
    let schedule = CandidateSchedule::build(shop, &order).to_schedule("list")?;
    info!(rule = ?config.rule, makespan = ?schedule.makespan, "list scheduling done");
    Ok(ListOutcome {
        order,
        release_order,
        schedule,
    })
}
