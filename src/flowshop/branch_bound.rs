//! Best-first branch and bound over job permutations.
//!
//! # Algorithm
//! - Incumbent seeded with Johnson's order on machines 1 and 2.
//! - Frontier: binary heap keyed on the smallest lower bound, FIFO among
//!   equal bounds (insertion counter).
//! - A partial sequence carries its completion times `(C1, C2)` on
//!   machines 1 and 2. Its bound is
//!
//! ```text
//! LB = max(C1 + Σ_remaining p1 + min_remaining p2,  C2 + Σ_remaining p2)
//! ```
//!
//! - Children with `LB ≥ UB` are pruned; complete sequences are evaluated
//!   through a full critical-path pass and replace the incumbent only when
//!   strictly better. A complete sequence whose candidate graph has a cycle
//!   (recipe edges between jobs against the sequence) is counted and skipped.
//!
//! The bound ignores transfer costs and machines beyond the second, so it
//! stays admissible on any instance. The search is exact unless the
//! expansion cap stops it early.
//!
//! # Reference
//! Ignall & Schrage (1965), "Application of the Branch and Bound Technique
//! to Some Flow-Shop Scheduling Problems", Operations Research 13(3)

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{johnson_shop_order, order_makespan, FlowShop};
use crate::error::{Result, SchedError};

/// Branch-and-bound configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchBoundConfig {
    /// Maximum number of frontier nodes expanded before giving up and
    /// returning the incumbent.
    pub max_expansions: usize,
}

impl Default for BranchBoundConfig {
    fn default() -> Self {
        Self {
            max_expansions: 2_000_000,
        }
    }
}

impl BranchBoundConfig {
    /// Sets the expansion cap.
    pub fn with_max_expansions(mut self, n: usize) -> Self {
        self.max_expansions = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_expansions == 0 {
            return Err("max_expansions must be positive".into());
        }
        Ok(())
    }
}

/// Search counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Frontier nodes popped and branched.
    pub expanded: usize,
    /// Children or frontier nodes discarded by the bound.
    pub pruned: usize,
    /// Strict incumbent improvements.
    pub improvements: usize,
    /// Complete sequences skipped because their candidate graph is cyclic.
    pub infeasible: usize,
    /// Whether the expansion cap stopped the search.
    pub truncated: bool,
}

/// Result of a branch-and-bound run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchBoundOutcome {
    /// Best job order found.
    pub order: Vec<usize>,
    /// Its makespan.
    pub makespan: f64,
    /// Makespan of the Johnson seed.
    pub seed_makespan: f64,
    /// Search counters.
    pub stats: SearchStats,
}

#[derive(Debug)]
struct Frontier {
    bound: f64,
    seq: u64,
    sequence: Vec<usize>,
    c1: f64,
    c2: f64,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // BinaryHeap is a max-heap: smaller bound, then earlier insertion, ranks higher.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .bound
            .total_cmp(&self.bound)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn lower_bound(c1: f64, c2: f64, remaining: &[usize], p1: &[f64], p2: &[f64]) -> f64 {
    if remaining.is_empty() {
        return c1.max(c2);
    }
    let rem1: f64 = remaining.iter().map(|&j| p1[j]).sum();
    let rem2: f64 = remaining.iter().map(|&j| p2[j]).sum();
    let min2 = remaining.iter().map(|&j| p2[j]).fold(f64::INFINITY, f64::min);
    (c1 + rem1 + min2).max(c2 + rem2)
}

/// Runs best-first branch and bound.
///
/// # Errors
/// - [`SchedError::InsufficientMachines`] for fewer than two machines
/// - [`SchedError::InfeasibleSeed`] if the Johnson seed is unbounded
/// - [`SchedError::InfeasibleGraph`] if the Johnson seed's candidate graph is cyclic
/// - [`SchedError::InvalidConfig`] if the configuration is invalid
pub fn branch_and_bound(shop: &FlowShop, config: &BranchBoundConfig) -> Result<BranchBoundOutcome> {
    config.validate().map_err(SchedError::InvalidConfig)?;

    let seed = johnson_shop_order(shop)?;
    let seed_makespan = order_makespan(shop, &seed)?.ok_or(SchedError::InfeasibleSeed)?;
    debug!(seed_makespan, "branch and bound seeded");

    let n = shop.job_count();
    let p1: Vec<f64> = shop.jobs().iter().map(|j| j.time(1)).collect();
    let p2: Vec<f64> = shop.jobs().iter().map(|j| j.time(2)).collect();

    let mut best_order = seed;
    let mut best = seed_makespan;
    let mut stats = SearchStats::default();

    let mut frontier = BinaryHeap::new();
    let mut counter = 0u64;
    let all: Vec<usize> = (0..n).collect();
    frontier.push(Frontier {
        bound: lower_bound(0.0, 0.0, &all, &p1, &p2),
        seq: counter,
        sequence: Vec::new(),
        c1: 0.0,
        c2: 0.0,
    });

    while let Some(node) = frontier.pop() {
        if node.bound >= best {
            stats.pruned += 1;
            continue;
        }
        if stats.expanded >= config.max_expansions {
            stats.truncated = true;
            break;
        }
        stats.expanded += 1;

        let mut placed = vec![false; n];
        for &j in &node.sequence {
            placed[j] = true;
        }
        let remaining: Vec<usize> = (0..n).filter(|&j| !placed[j]).collect();

        for &j in &remaining {
            let mut sequence = node.sequence.clone();
            sequence.push(j);
            let c1 = node.c1 + p1[j];
            let c2 = node.c2.max(c1) + p2[j];

            if sequence.len() == n {
                match order_makespan(shop, &sequence) {
                    Ok(Some(makespan)) if makespan < best => {
                        debug!(makespan, order = ?shop.job_ids(&sequence), "incumbent improved");
                        best = makespan;
                        best_order = sequence;
                        stats.improvements += 1;
                    }
                    Ok(_) => {}
                    Err(SchedError::InfeasibleGraph { .. }) => {
                        debug!(order = ?shop.job_ids(&sequence), "cyclic sequence skipped");
                        stats.infeasible += 1;
                    }
                    Err(e) => return Err(e),
                }
                continue;
            }

            let rest: Vec<usize> = remaining.iter().copied().filter(|&r| r != j).collect();
            let bound = lower_bound(c1, c2, &rest, &p1, &p2);
            if bound >= best {
                stats.pruned += 1;
                continue;
            }
            counter += 1;
            frontier.push(Frontier {
                bound,
                seq: counter,
                sequence,
                c1,
                c2,
            });
        }
    }

    info!(
        makespan = best,
        seed_makespan,
        expanded = stats.expanded,
        pruned = stats.pruned,
        improvements = stats.improvements,
        infeasible = stats.infeasible,
        "branch and bound done"
    );

    Ok(BranchBoundOutcome {
        order: best_order,
        makespan: best,
        seed_makespan,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowshop::fixtures::scenario_graph;
    use crate::flowshop::{exhaustive_best, Job};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scenario() {
        let shop = FlowShop::from_graph(&scenario_graph());
        let outcome = branch_and_bound(&shop, &BranchBoundConfig::default()).unwrap();
        assert_eq!(outcome.makespan, 7.0);
        assert_eq!(outcome.order, vec![1, 0]);
        assert!(!outcome.stats.truncated);
    }

    #[test]
    fn test_matches_exhaustive_on_two_machines() {
        let mut rng = StdRng::seed_from_u64(11);
        for jobs in 2..=7 {
            let shop = FlowShop::random(jobs, 2, &mut rng);
            let outcome = branch_and_bound(&shop, &BranchBoundConfig::default()).unwrap();
            let (_, optimum) = exhaustive_best(&shop).unwrap();
            assert_eq!(outcome.makespan, optimum);
            assert!(outcome.makespan <= outcome.seed_makespan);
        }
    }

    #[test]
    fn test_matches_exhaustive_on_three_machines() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..4 {
            let shop = FlowShop::random(6, 3, &mut rng);
            let outcome = branch_and_bound(&shop, &BranchBoundConfig::default()).unwrap();
            let (_, optimum) = exhaustive_best(&shop).unwrap();
            assert!((outcome.makespan - optimum).abs() < 1e-9);
        }
    }

    #[test]
    fn test_never_worse_than_seed_when_truncated() {
        let mut rng = StdRng::seed_from_u64(2);
        let shop = FlowShop::random(8, 3, &mut rng);
        let config = BranchBoundConfig::default().with_max_expansions(3);
        let outcome = branch_and_bound(&shop, &config).unwrap();
        assert!(outcome.makespan <= outcome.seed_makespan);
        assert!(outcome.stats.expanded <= 3);
    }

    /// J1(1, 6), J2(5, 2) with `J1_M2 → J2_M1`: only J1 before J2 is acyclic.
    fn linked_jobs() -> FlowShop {
        let mut recipe = FlowShop::from_jobs(vec![
            Job::new("J1", vec![1.0, 6.0]),
            Job::new("J2", vec![5.0, 2.0]),
        ])
        .recipe()
        .clone();
        recipe.add_edge("J1_M2", "J2_M1", 0.0);
        FlowShop::from_graph(&recipe)
    }

    #[test]
    fn test_cyclic_sequence_keeps_incumbent() {
        let shop = linked_jobs();
        let outcome = branch_and_bound(&shop, &BranchBoundConfig::default()).unwrap();
        // J1_M1 [0,1], J1_M2 [1,7], J2_M1 [7,12], J2_M2 [12,14]
        assert_eq!(outcome.order, vec![0, 1]);
        assert_eq!(outcome.makespan, 14.0);
        assert_eq!(outcome.seed_makespan, 14.0);
        assert_eq!(outcome.stats.infeasible, 1);
        assert_eq!(outcome.stats.improvements, 0);
    }

    #[test]
    fn test_single_machine_rejected() {
        let shop = FlowShop::from_jobs(vec![Job::new("A", vec![1.0])]);
        assert!(matches!(
            branch_and_bound(&shop, &BranchBoundConfig::default()),
            Err(SchedError::InsufficientMachines { found: 1 })
        ));
    }

    #[test]
    fn test_frontier_orders_by_bound_then_fifo() {
        let mut heap = BinaryHeap::new();
        for (seq, bound) in [(0, 5.0), (1, 3.0), (2, 3.0), (3, 4.0)] {
            heap.push(Frontier {
                bound,
                seq,
                sequence: Vec::new(),
                c1: 0.0,
                c2: 0.0,
            });
        }
        let popped: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|f| f.seq)).collect();
        assert_eq!(popped, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_invalid_config() {
        let shop = FlowShop::from_graph(&scenario_graph());
        let config = BranchBoundConfig::default().with_max_expansions(0);
        assert!(matches!(
            branch_and_bound(&shop, &config),
            Err(SchedError::InvalidConfig(_))
        ));
    }
}
