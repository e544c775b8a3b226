//! Candidate schedule: a job order plus the edge set it implies.
//!
//! Solvers never touch the caller's graph. To evaluate a job order they
//! build a `CandidateSchedule`, which copies the recipe's nodes and edges
//! and adds:
//!
//! - (a) same-job edges `J_Mm → J_Mm+1` missing from the recipe,
//! - (b) sequencing edges `A_Mm → B_Mm` for consecutive jobs on machine m,
//! - (c) terminating edges from each job's last stage into its product.
//!
//! The makespan then follows from one topological pass and one
//! critical-path pass.

use tracing::warn;

use super::FlowShop;
use crate::analysis::{topological_order, CriticalPath};
use crate::error::Result;
use crate::models::{Edge, Graph, Schedule, ScheduledNode};

/// A job order and the working graph derived from it.
#[derive(Debug, Clone)]
pub struct CandidateSchedule {
    order: Vec<usize>,
    job_ids: Vec<String>,
    graph: Graph,
    sinks: Vec<usize>,
    /// Machine index per node (0 for products).
    machine_of: Vec<usize>,
}

impl CandidateSchedule {
    /// Builds the working graph for `order` (indices into `shop.jobs()`).
    pub fn build(shop: &FlowShop, order: &[usize]) -> Self {
        let recipe = shop.recipe();
        let mut edges: Vec<Edge> = recipe.edges().to_vec();
        let mut missing_products = Vec::new();

        for (j, job) in shop.jobs().iter().enumerate() {
            let mut previous: Option<&str> = None;
            for m in 1..=shop.machines() {
                let Some(stage) = shop.stage(j, m) else {
                    continue;
                };
                if let Some(prev) = previous {
                    if !recipe.has_edge(prev, stage) {
                        edges.push(Edge::new(prev, stage, 0.0));
                    }
                }
                previous = Some(stage);
            }

            match (previous, job.product.as_deref()) {
                (Some(last), Some(product)) => {
                    if !recipe.contains(product) {
                        warn!(job = %job.id, product, "product node missing, edge left dangling");
                        missing_products.push(last.to_string());
                    }
                    if !recipe.has_edge(last, product) {
                        edges.push(Edge::new(last, product, 0.0));
                    }
                }
                (Some(last), None) => missing_products.push(last.to_string()),
                _ => {}
            }
        }

        for m in 1..=shop.machines() {
            let mut previous: Option<&str> = None;
            for &j in order {
                let Some(stage) = shop.stage(j, m) else {
                    continue;
                };
                if let Some(prev) = previous {
                    edges.push(Edge::new(prev, stage, 0.0));
                }
                previous = Some(stage);
            }
        }

        let graph = recipe.with_edge_set(edges);

        let mut sinks = graph.sink_indices();
        for id in &missing_products {
            if let Some(i) = graph.index_of(id) {
                if !sinks.contains(&i) {
                    sinks.push(i);
                }
            }
        }

        let machine_of = graph
            .nodes()
            .iter()
            .map(|n| n.machine_ref().map_or(0, |(_, m)| m))
            .collect();

        Self {
            order: order.to_vec(),
            job_ids: shop.job_ids(order),
            graph,
            sinks,
            machine_of,
        }
    }

    /// Job indices in sequence order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Job ids in sequence order.
    pub fn job_ids(&self) -> &[String] {
        &self.job_ids
    }

    /// The derived working graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Runs topological ordering and critical-path propagation.
    ///
    /// # Errors
    /// [`crate::SchedError::InfeasibleGraph`] if the recipe plus the
    /// sequencing edges contain a cycle.
    pub fn evaluate(&self) -> Result<CriticalPath> {
        let topo = topological_order(&self.graph)?;
        Ok(CriticalPath::compute_with_sinks(&self.graph, &topo, &self.sinks))
    }

    /// Makespan of this order; `None` if a sink is unreachable.
    pub fn makespan(&self) -> Result<Option<f64>> {
        Ok(self.evaluate()?.makespan())
    }

    /// Gantt-ready path: machine nodes with positive duration, ordered by
    /// start time, then job position, then machine.
    ///
    /// Product and zero-duration nodes are left out; unreachable nodes are
    /// skipped.
    pub fn gantt(&self, cp: &CriticalPath) -> Vec<ScheduledNode> {
        let position = |id: &str| {
            let base = crate::models::parse_machine_id(id).map(|(b, _)| b);
            base.and_then(|b| self.job_ids.iter().position(|j| j.eq_ignore_ascii_case(b)))
                .unwrap_or(usize::MAX)
        };

        let mut entries: Vec<(f64, usize, usize, ScheduledNode)> = self
            .graph
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.is_product() && node.duration() > 0.0)
            .filter_map(|(i, node)| {
                let (start, finish) = (cp.start(i)?, cp.finish(i)?);
                Some((
                    start,
                    position(&node.id),
                    self.machine_of[i],
                    ScheduledNode::timed(&node.id, start, finish),
                ))
            })
            .collect();

        entries.sort_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then(a.1.cmp(&b.1))
                .then(a.2.cmp(&b.2))
        });
        entries.into_iter().map(|(_, _, _, node)| node).collect()
    }

    /// Evaluates the candidate and packages it as a [`Schedule`].
    pub fn to_schedule(&self, solver: &str) -> Result<Schedule> {
        let cp = self.evaluate()?;
        let makespan = cp.require_makespan(&self.graph)?;
        let mut schedule = Schedule::new(solver)
            .with_job_order(self.job_ids.clone())
            .with_makespan(makespan);
        schedule.nodes = self.gantt(&cp);
        Ok(schedule)
    }
}

/// Makespan of a job order, `None` when unbounded.
pub fn order_makespan(shop: &FlowShop, order: &[usize]) -> Result<Option<f64>> {
    CandidateSchedule::build(shop, order).makespan()
}
