//! Exhaustive permutation search for small instances.
//!
//! Enumerates every job order with the iterative form of Heap's algorithm
//! (explicit counter array, no recursion) and evaluates each through a
//! candidate schedule. Used as an optimality oracle.
//!
//! # Reference
//! Heap (1963), "Permutations by Interchanges", The Computer Journal 6(3)

use super::{order_makespan, FlowShop};
use crate::error::{Result, SchedError};

/// Largest instance accepted (10! ≈ 3.6M evaluations).
pub const MAX_EXHAUSTIVE_JOBS: usize = 10;

/// Returns the best order and its makespan over all `n!` permutations.
///
/// Ties keep the first permutation found. Orders whose candidate graph has
/// a cycle are skipped.
///
/// # Errors
/// - [`SchedError::InvalidConfig`] for more than [`MAX_EXHAUSTIVE_JOBS`] jobs
/// - [`SchedError::NoFeasibleSchedule`] if no order has a finite makespan
pub fn exhaustive_best(shop: &FlowShop) -> Result<(Vec<usize>, f64)> {
    let n = shop.job_count();
    if n > MAX_EXHAUSTIVE_JOBS {
        return Err(SchedError::InvalidConfig(format!(
            "exhaustive search limited to {MAX_EXHAUSTIVE_JOBS} jobs, got {n}"
        )));
    }

    let mut perm: Vec<usize> = (0..n).collect();
    let mut best: Option<(Vec<usize>, f64)> = None;
    let mut consider = |perm: &[usize]| -> Result<()> {
        match order_makespan(shop, perm) {
            Ok(Some(makespan)) if best.as_ref().is_none_or(|(_, b)| makespan < *b) => {
                best = Some((perm.to_vec(), makespan));
            }
            Ok(_) | Err(SchedError::InfeasibleGraph { .. }) => {}
            Err(e) => return Err(e),
        }
        Ok(())
    };

    consider(&perm)?;
    let mut counters = vec![0usize; n];
    let mut i = 1;
    while i < n {
        if counters[i] < i {
            let swap_with = if i % 2 == 0 { 0 } else { counters[i] };
            perm.swap(swap_with, i);
            consider(&perm)?;
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }

    best.ok_or(SchedError::NoFeasibleSchedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowshop::Job;

    #[test]
    fn test_visits_all_permutations() {
        // Every order ends with one job alone on M2 after M1 is done.
        let shop = FlowShop::from_jobs(vec![
            Job::new("A", vec![1.0, 1.0]),
            Job::new("B", vec![2.0, 2.0]),
            Job::new("C", vec![3.0, 3.0]),
        ]);
        let (order, makespan) = exhaustive_best(&shop).unwrap();
        assert_eq!(order.len(), 3);
        assert!(makespan >= 7.0);
    }

    #[test]
    fn test_finds_known_optimum() {
        let shop = FlowShop::from_jobs(vec![
            Job::new("J1", vec![3.0, 2.0]),
            Job::new("J2", vec![1.0, 4.0]),
        ]);
        let (order, makespan) = exhaustive_best(&shop).unwrap();
        assert_eq!(order, vec![1, 0]);
        assert_eq!(makespan, 7.0);
    }

    #[test]
    fn test_skips_cyclic_orders() {
        let mut recipe = FlowShop::from_jobs(vec![
            Job::new("J1", vec![1.0, 6.0]),
            Job::new("J2", vec![5.0, 2.0]),
        ])
        .recipe()
        .clone();
        recipe.add_edge("J1_M2", "J2_M1", 0.0);
        let (order, makespan) = exhaustive_best(&FlowShop::from_graph(&recipe)).unwrap();
        assert_eq!(order, vec![0, 1]);
        assert_eq!(makespan, 14.0);
    }

    #[test]
    fn test_empty_shop() {
        let shop = FlowShop::from_jobs(Vec::new());
        let (order, makespan) = exhaustive_best(&shop).unwrap();
        assert!(order.is_empty());
        assert_eq!(makespan, 0.0);
    }

    #[test]
    fn test_rejects_large_instances() {
        let jobs = (0..11).map(|i| Job::new(format!("J{i}"), vec![1.0, 1.0])).collect();
        let shop = FlowShop::from_jobs(jobs);
        assert!(matches!(exhaustive_best(&shop), Err(SchedError::InvalidConfig(_))));
    }
}
