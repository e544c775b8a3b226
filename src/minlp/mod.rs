//! Bridge to an external mixed-integer nonlinear programming solver.
//!
//! The S-graph is expressed as a makespan-minimization model over start
//! times, handed to an external executable through files, and the reported
//! start times are read back as a node order.
//!
//! - [`MinlpModel`]: variables, difference constraints, text rendering
//! - [`MinlpBridge`]: process invocation with timeout
//! - [`MinlpSolution`]: solution-file parser

mod bridge;
mod model;
mod solution;

pub use bridge::{MinlpBridge, MinlpConfig};
pub use model::{start_var, DifferenceConstraint, MinlpModel, Variable, MAKESPAN_VAR, START_PREFIX};
pub use solution::MinlpSolution;
