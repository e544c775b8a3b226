//! Graph analysis shared by every solver.
//!
//! - **Topological ordering**: Kahn's algorithm, FIFO or prioritized ready set
//! - **Critical path**: earliest start/finish propagation and makespan
//!
//! Every solver that evaluates a candidate sequence funnels through these
//! two passes; longest paths are never computed any other way.

mod critical_path;
mod topo;

pub use critical_path::CriticalPath;
pub use topo::{topological_order, topological_order_by};

pub(crate) use topo::successors;
