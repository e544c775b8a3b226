//! Permutation flow-shop solvers on top of the S-graph.
//!
//! Every solver here produces a job order. Orders are evaluated by building
//! a [`CandidateSchedule`] (recipe edges plus sequencing edges) and running
//! the critical-path pass on it, so transfer costs on recipe edges are
//! always honoured.
//!
//! # Solvers
//!
//! | Solver | Machines | Result |
//! |--------|----------|--------|
//! | [`johnson_shop_order`] | 2 | optimal |
//! | [`cds`] | ≥ 2 | heuristic, best of m-1 Johnson sub-problems |
//! | [`list_schedule`] | any | heuristic, dispatching-rule driven |
//! | [`branch_and_bound`] | ≥ 2 | exact unless the expansion cap is hit |
//! | [`exhaustive_best`] | any | exact, small instances only |

mod branch_bound;
mod candidate;
mod cds;
mod exhaustive;
mod instance;
mod johnson;
mod list;

pub use branch_bound::{branch_and_bound, BranchBoundConfig, BranchBoundOutcome, SearchStats};
pub use candidate::{order_makespan, CandidateSchedule};
pub use cds::{cds, CdsCandidate, CdsOutcome};
pub use exhaustive::{exhaustive_best, MAX_EXHAUSTIVE_JOBS};
pub use instance::{FlowShop, Job};
pub use johnson::{johnson_order, johnson_shop_order};
pub use list::{list_order, list_schedule, ListConfig, ListOutcome};

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{Graph, Node};

    /// Two jobs on two machines: J1 (3, 2), J2 (1, 4), products P1 and P2.
    pub(crate) fn scenario_graph() -> Graph {
        let mut g = Graph::new();
        g.add_node(Node::new("J1_M1").with_duration(3.0));
        g.add_node(Node::new("J1_M2").with_durations(vec![0.0, 2.0]));
        g.add_node(Node::new("J2_M1").with_duration(1.0));
        g.add_node(Node::new("J2_M2").with_durations(vec![0.0, 4.0]));
        g.add_node(Node::new("P1"));
        g.add_node(Node::new("P2"));
        g.add_edge("J1_M1", "J1_M2", 0.0);
        g.add_edge("J2_M1", "J2_M2", 0.0);
        g.add_edge("J1_M2", "P1", 0.0);
        g.add_edge("J2_M2", "P2", 0.0);
        g
    }
}
