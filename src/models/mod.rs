//! S-graph domain models.
//!
//! Provides the data types every solver reads: the task graph and the
//! schedule a solver returns.
//!
//! # Domain Mappings
//!
//! | u-sgraph | Batch plant | Flow shop |
//! |----------|-------------|-----------|
//! | Node (`J_Mm`) | Recipe step on a unit | Job on machine m |
//! | Node (product) | Product / batch end | Job completion |
//! | Edge | Transfer / setup delay | Precedence |
//! | Schedule | Production sequence | Job permutation |

mod graph;
mod node;
mod schedule;

pub use graph::{Edge, Graph};
pub use node::{machine_node_id, node_key, parse_machine_id, Node};
pub use schedule::{Schedule, ScheduledNode};
