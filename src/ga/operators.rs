//! Permutation operators.
//!
//! # Usage
//!
//! ```
//! use u_sgraph::ga::operators::order_crossover_at;
//!
//! let child = order_crossover_at(&[0, 1, 2, 3], &[3, 2, 1, 0], 2);
//! assert_eq!(child, vec![0, 1, 3, 2]);
//! ```

use rand::Rng;


/// Prefix-cut order crossover at a fixed cut point.
///
/// The child takes `first[..cut]`, then the remaining elements in the order
/// they appear in `second`.
pub fn order_crossover_at(first: &[usize], second: &[usize], cut: usize) -> Vec<usize> {
    let cut = cut.min(first.len());
    let size = first.iter().chain(second).copied().max().map_or(0, |m| m + 1);
    let mut taken = vec![false; size];
    let mut child = Vec::with_capacity(first.len());

    for &gene in &first[..cut] {
        taken[gene] = true;
        child.push(gene);
    }
    for &gene in second {
        if !taken[gene] {
            taken[gene] = true;
            child.push(gene);
        }
    }
    child
}

/// Prefix-cut order crossover with a uniformly random cut in `0..=len`.
pub fn order_crossover<R: Rng>(first: &[usize], second: &[usize], rng: &mut R) -> Vec<usize> {
    let cut = rng.random_range(0..=first.len());
    order_crossover_at(first, second, cut)
}

/// Applies `u-metaheur`'s swap mutation with probability `rate`.
pub fn swap_mutation<R: Rng>(perm: &mut [usize], rate: f64, rng: &mut R) {
    if rng.random_bool(rate.clamp(0.0, 1.0)) {
        u_metaheur::ga::operators::swap_mutation(perm, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permutation::random_permutation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cut_extremes() {
        let a = [2, 0, 1, 3];
        let b = [3, 1, 0, 2];
        assert_eq!(order_crossover_at(&a, &b, 0), b.to_vec());
        assert_eq!(order_crossover_at(&a, &b, 4), a.to_vec());
        assert_eq!(order_crossover_at(&a, &b, 10), a.to_vec());
    }

    #[test]
    fn test_child_is_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let a = random_permutation(9, &mut rng);
            let b = random_permutation(9, &mut rng);
            let mut child = order_crossover(&a, &b, &mut rng);
            child.sort_unstable();
            assert_eq!(child, (0..9).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_mutation_rate_zero_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut perm = vec![0, 1, 2, 3, 4];
        for _ in 0..20 {
            swap_mutation(&mut perm, 0.0, &mut rng);
        }
        assert_eq!(perm, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_mutation_keeps_permutation() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut perm = random_permutation(6, &mut rng);
        for _ in 0..50 {
            swap_mutation(&mut perm, 1.0, &mut rng);
            let mut sorted = perm.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..6).collect::<Vec<_>>());
        }
    }
}
