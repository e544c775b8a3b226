//! Schedule (solution) model.
//!
//! A schedule is the ordered node sequence returned by a solver. Solvers
//! that run a critical-path pass also attach start/finish times, the base
//! job order and the makespan, which makes the result Gantt-ready.

use serde::{Deserialize, Serialize};

/// An ordered execution sequence produced by one solve call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Name of the solver that produced this schedule.
    pub solver: String,
    /// Scheduled nodes in execution order.
    pub nodes: Vec<ScheduledNode>,
    /// Base job order for flow-shop solvers (empty for permutation solvers).
    pub job_order: Vec<String>,
    /// Completion time of the whole schedule, when known.
    pub makespan: Option<f64>,
}

/// One entry of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNode {
    /// Node id.
    pub id: String,
    /// Earliest start time, if timing was computed.
    pub start: Option<f64>,
    /// Earliest finish time, if timing was computed.
    pub finish: Option<f64>,
}

impl ScheduledNode {
    /// Creates an untimed entry.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start: None,
            finish: None,
        }
    }

    /// Creates a timed entry.
    pub fn timed(id: impl Into<String>, start: f64, finish: f64) -> Self {
        Self {
            id: id.into(),
            start: Some(start),
            finish: Some(finish),
        }
    }

    /// Processing time covered by this entry (0 when untimed).
    #[inline]
    pub fn duration(&self) -> f64 {
        match (self.start, self.finish) {
            (Some(s), Some(f)) => f - s,
            _ => 0.0,
        }
    }
}

impl Schedule {
    /// Creates an empty schedule for the named solver.
    pub fn new(solver: impl Into<String>) -> Self {
        Self {
            solver: solver.into(),
            ..Self::default()
        }
    }

    /// Creates an untimed schedule from an id sequence.
    pub fn from_sequence<S: AsRef<str>>(solver: impl Into<String>, ids: &[S]) -> Self {
        let mut schedule = Self::new(solver);
        schedule.nodes = ids.iter().map(|id| ScheduledNode::new(id.as_ref())).collect();
        schedule
    }

    /// Sets the makespan.
    pub fn with_makespan(mut self, makespan: f64) -> Self {
        self.makespan = Some(makespan);
        self
    }

    /// Sets the base job order.
    pub fn with_job_order(mut self, order: Vec<String>) -> Self {
        self.job_order = order;
        self
    }

    /// Appends an entry.
    pub fn push(&mut self, node: ScheduledNode) {
        self.nodes.push(node);
    }

    /// Node ids in schedule order.
    pub fn ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Position of a node in the sequence.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id.eq_ignore_ascii_case(id))
    }

    /// Finds the entry for a node.
    pub fn entry(&self, id: &str) -> Option<&ScheduledNode> {
        self.nodes.iter().find(|n| n.id.eq_ignore_ascii_case(id))
    }

    /// Number of scheduled nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing was scheduled.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
