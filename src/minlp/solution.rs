//! Solver output parsing.

use tracing::debug;

use super::model::{MAKESPAN_VAR, START_PREFIX};
use crate::error::{Result, SchedError};
use crate::models::{Graph, Schedule, ScheduledNode};

/// Start times reported by an external solver, sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct MinlpSolution {
    starts: Vec<(String, f64)>,
    makespan: Option<f64>,
}

impl MinlpSolution {
    /// Parses `<name> <value>` lines.
    ///
    /// `t_<id>` entries become node start times (prefix stripped), `T` is the
    /// makespan, everything else is ignored. Ties in start time keep file
    /// order.
    ///
    /// # Errors
    /// [`SchedError::EmptySolution`] if no start time was found.
    pub fn parse(text: &str) -> Result<Self> {
        let mut starts = Vec::new();
        let mut makespan = None;

        for line in text.lines() {
            let mut tokens = line.split_whitespace();
            let (Some(name), Some(value)) = (tokens.next(), tokens.next()) else {
                continue;
            };
            let Ok(value) = value.parse::<f64>() else {
                debug!(line, "unparsable solution line skipped");
                continue;
            };
            if let Some(id) = name.strip_prefix(START_PREFIX) {
                starts.push((id.to_string(), value));
            } else if name == MAKESPAN_VAR {
                makespan = Some(value);
            }
        }

        if starts.is_empty() {
            return Err(SchedError::EmptySolution);
        }
        starts.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(Self { starts, makespan })
    }

    /// Node ids in start-time order.
    pub fn order(&self) -> Vec<&str> {
        self.starts.iter().map(|(id, _)| id.as_str()).collect()
    }

    /// `(id, start)` pairs in start-time order.
    pub fn starts(&self) -> &[(String, f64)] {
        &self.starts
    }

    /// Reported makespan, if the solver wrote `T`.
    pub fn makespan(&self) -> Option<f64> {
        self.makespan
    }

    /// Timed schedule. Finish = start + duration for nodes known to `graph`;
    /// unknown ids stay untimed.
    pub fn to_schedule(&self, graph: &Graph, solver: &str) -> Schedule {
        let mut schedule = Schedule::new(solver);
        for (id, start) in &self.starts {
            match graph.node(id) {
                Some(node) => schedule.push(ScheduledNode::timed(&node.id, *start, start + node.duration())),
                None => schedule.push(ScheduledNode::new(id)),
            }
        }
        schedule.makespan = self.makespan;
        schedule
    }
}
