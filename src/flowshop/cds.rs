//! Campbell–Dudek–Smith (CDS) heuristic for the m-machine flow shop.
//!
//! # Algorithm
//! For each split `k = 1..m-1` build a virtual two-machine problem:
//!
//! ```text
//! p1'(j) = Σ_{i=1..k}       p(j, i)
//! p2'(j) = Σ_{i=m-k+1..m}   p(j, i)
//! ```
//!
//! Order it with Johnson's rule, evaluate the order on the real m-machine
//! instance, and keep the best makespan. A split whose order makes the
//! candidate graph cyclic is recorded without a makespan.
//!
//! # Complexity
//! O(m · (n log n + evaluation)).
//!
//! # Reference
//! Campbell, Dudek & Smith (1970), "A Heuristic Algorithm for the n Job,
//! m Machine Sequencing Problem", Management Science 16(10)

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{johnson_order, order_makespan, FlowShop};
use crate::error::{Result, SchedError};

/// One virtual two-machine sub-problem and its evaluated order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdsCandidate {
    /// Split point `k`.
    pub split: usize,
    /// Job order produced by Johnson's rule on the virtual problem.
    pub order: Vec<usize>,
    /// Makespan on the real instance (`None` = unbounded or cyclic).
    pub makespan: Option<f64>,
}

/// Result of a CDS run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdsOutcome {
    /// Best job order.
    pub order: Vec<usize>,
    /// Its makespan.
    pub makespan: f64,
    /// Every evaluated candidate, by split.
    pub candidates: Vec<CdsCandidate>,
}

/// Runs the CDS heuristic.
///
/// # Errors
/// - [`SchedError::InsufficientMachines`] for fewer than two machines
/// - [`SchedError::NoFeasibleSchedule`] if no split yields a finite makespan
pub fn cds(shop: &FlowShop) -> Result<CdsOutcome> {
    let m = shop.machines();
    if m < 2 {
        return Err(SchedError::InsufficientMachines { found: m });
    }

    let mut candidates = Vec::with_capacity(m - 1);
    let mut best: Option<(usize, f64)> = None;

    for k in 1..m {
        let virtual_times: Vec<(f64, f64)> = shop
            .jobs()
            .iter()
            .map(|job| (job.time_range(1, k), job.time_range(m - k + 1, m)))
            .collect();
        let order = johnson_order(&virtual_times);
        let makespan = match order_makespan(shop, &order) {
            Ok(makespan) => makespan,
            Err(SchedError::InfeasibleGraph { .. }) => {
                debug!(split = k, order = ?shop.job_ids(&order), "cds candidate is cyclic");
                None
            }
            Err(e) => return Err(e),
        };
        debug!(split = k, ?makespan, "cds candidate");

        if let Some(value) = makespan {
            if best.is_none_or(|(_, b)| value < b) {
                best = Some((candidates.len(), value));
            }
        }
        candidates.push(CdsCandidate {
            split: k,
            order,
            makespan,
        });
    }

    let (index, makespan) = best.ok_or(SchedError::NoFeasibleSchedule)?;
    info!(split = candidates[index].split, makespan, "cds selected");
    Ok(CdsOutcome {
        order: candidates[index].order.clone(),
        makespan,
        candidates,
    })
}
