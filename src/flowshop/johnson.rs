//! Johnson's rule for the two-machine flow shop.
//!
//! # Algorithm
//! 1. Set A = jobs with `p1 ≤ p2`, sorted ascending by `p1`.
//! 2. Set B = jobs with `p1 > p2`, sorted descending by `p2`.
//! 3. Sequence = A followed by B.
//!
//! Both sorts are stable, so equal keys keep their input order.
//!
//! # Complexity
//! O(n log n).
//!
//! # Reference
//! Johnson (1954), "Optimal two- and three-stage production schedules with
//! setup times included", Naval Research Logistics Quarterly 1(1)

use tracing::debug;

use super::FlowShop;
use crate::error::{Result, SchedError};

/// Orders `(p1, p2)` pairs by Johnson's rule, returning input indices.
pub fn johnson_order(times: &[(f64, f64)]) -> Vec<usize> {
    let (mut first, mut second): (Vec<usize>, Vec<usize>) =
        (0..times.len()).partition(|&i| times[i].0 <= times[i].1);

    first.sort_by(|&a, &b| times[a].0.total_cmp(&times[b].0));
    second.sort_by(|&a, &b| times[b].1.total_cmp(&times[a].1));

    first.extend(second);
    first
}

/// Two-machine rule applied to machines 1 and 2 of a flow shop.
///
/// Exact when the shop has exactly two machines. With more machines the
/// remaining stages are ignored while ordering.
///
/// # Errors
/// [`SchedError::InsufficientMachines`] if the shop has fewer than two
/// machines.
pub fn johnson_shop_order(shop: &FlowShop) -> Result<Vec<usize>> {
    if shop.machines() < 2 {
        return Err(SchedError::InsufficientMachines {
            found: shop.machines(),
        });
    }
    let times: Vec<(f64, f64)> = shop.jobs().iter().map(|j| (j.time(1), j.time(2))).collect();
    let order = johnson_order(&times);
    debug!(order = ?shop.job_ids(&order), "johnson order");
    Ok(order)
}
