//! Error types shared by every solver.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SchedError>;

/// Errors raised while analysing a graph or solving a schedule.
#[derive(Debug, Error)]
pub enum SchedError {
    /// The edge set contains a cycle; no topological order exists.
    #[error("infeasible graph: precedence cycle detected ({ordered} of {total} nodes ordered)")]
    InfeasibleGraph {
        /// Nodes placed before the cycle blocked progress.
        ordered: usize,
        /// Total node count.
        total: usize,
    },

    /// A node required for the makespan was never reached by propagation.
    #[error("unbounded schedule: node '{node}' is unreachable")]
    Unbounded {
        /// The unreachable node.
        node: String,
    },

    /// The branch-and-bound upper-bound seed has no finite makespan.
    #[error("infeasible seed: initial schedule has no finite makespan")]
    InfeasibleSeed,

    /// Multi-machine solvers need at least two machines.
    #[error("insufficient machines: found {found}, need at least 2")]
    InsufficientMachines {
        /// Number of machines found in the instance.
        found: usize,
    },

    /// No candidate produced a finite makespan.
    #[error("no feasible schedule found")]
    NoFeasibleSchedule,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The external solver executable could not be started.
    #[error("external solver '{program}' unavailable: {source}")]
    SolverUnavailable {
        /// Program that was invoked.
        program: String,
        /// Spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The external solver exited with a failure status.
    #[error("external solver failed with exit code {code:?}")]
    SolverFailed {
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
    },

    /// The external solver produced no usable assignment.
    #[error("external solver returned an empty solution")]
    EmptySolution,

    /// The external solver did not finish in time and was killed.
    #[error("external solver timed out after {secs}s")]
    Timeout {
        /// Timeout that expired, in seconds.
        secs: u64,
    },

    /// I/O failure while reading or writing exchange files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
