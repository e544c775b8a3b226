//! SA execution loop.
//!
//! The annealing itself is `u_metaheur::sa::SaRunner`; this module adapts a
//! [`PermutationObjective`] (maximized) into an `SaProblem` (minimized).

use rand::Rng;
use tracing::info;
use u_metaheur::ga::operators::swap_mutation;
use u_metaheur::sa::{SaProblem, SaRunner as Annealer};

use super::config::SaConfig;
use crate::permutation::{random_permutation, PermutationObjective};

/// Result of a simulated annealing run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// Best permutation found.
    pub best: Vec<usize>,

    /// Fitness of the best permutation.
    pub best_fitness: f64,

    /// Neighbor evaluations performed.
    pub iterations: usize,

    /// Temperature when the loop stopped.
    pub final_temperature: f64,

    /// Accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Best-so-far fitness, sampled from the start through the final value.
    pub fitness_history: Vec<f64>,
}

/// Permutations of `0..len()` scored by cost = -fitness.
struct PermutationAnnealing<'a, P> {
    objective: &'a P,
}

impl<P: PermutationObjective> SaProblem for PermutationAnnealing<'_, P> {
    type Solution = Vec<usize>;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        random_permutation(self.objective.len(), rng)
    }

    fn cost(&self, solution: &Vec<usize>) -> f64 {
        -self.objective.fitness(solution)
    }

    fn neighbor<R: Rng>(&self, solution: &Vec<usize>, rng: &mut R) -> Vec<usize> {
        let mut next = solution.clone();
        swap_mutation(&mut next, rng);
        next
    }
}

/// Executes simulated annealing.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA, maximizing the objective.
    ///
    /// With at most one element the identity permutation is returned.
    ///
    /// # Errors
    /// Returns the validation message for an invalid configuration.
    pub fn run<P: PermutationObjective>(problem: &P, config: &SaConfig) -> Result<SaResult, String> {
        config.validate()?;

        let n = problem.len();
        if n <= 1 {
            let best: Vec<usize> = (0..n).collect();
            return Ok(SaResult {
                best_fitness: problem.fitness(&best),
                best,
                iterations: 0,
                final_temperature: config.initial_temperature,
                accepted_moves: 0,
                fitness_history: Vec::new(),
            });
        }

        let annealing = PermutationAnnealing { objective: problem };
        let result = Annealer::run(&annealing, &config.to_annealing());
        let best_fitness = -result.best_cost;

        info!(
            best_fitness,
            iterations = result.iterations,
            accepted_moves = result.accepted_moves,
            final_temperature = result.final_temperature,
            "sa finished"
        );

        Ok(SaResult {
            best: result.best,
            best_fitness,
            iterations: result.iterations,
            final_temperature: result.final_temperature,
            accepted_moves: result.accepted_moves,
            fitness_history: result.cost_history.iter().map(|c| -c).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Graph, Node};
    use crate::permutation::PrecedenceFitness;

    fn chain(len: usize) -> Graph {
        let mut g = Graph::new();
        for i in 0..len {
            g.add_node(Node::new(format!("N{i}")).with_duration(1.0));
        }
        for i in 1..len {
            g.add_edge(&format!("N{}", i - 1), &format!("N{i}"), 2.0);
        }
        g
    }

    #[test]
    fn test_history_non_decreasing() {
        let fitness = PrecedenceFitness::new(&chain(7));
        let config = SaConfig::default().with_max_iterations(3_000).with_seed(42);
        let result = SaRunner::run(&fitness, &config).unwrap();
        assert!(result.fitness_history.len() >= 2);
        assert!(result.fitness_history.windows(2).all(|w| w[0] <= w[1]));
        let last = *result.fitness_history.last().unwrap();
        assert!((result.best_fitness - last).abs() < 1e-9);
    }

    #[test]
    fn test_stops_at_min_temperature() {
        let fitness = PrecedenceFitness::new(&chain(5));
        let config = SaConfig::default()
            .with_initial_temperature(1.0)
            .with_cool_rate(0.5)
            .with_max_iterations(1_000)
            .with_seed(1);
        let result = SaRunner::run(&fitness, &config).unwrap();
        // 1.0 * 0.5^k > 1e-3 holds for k = 0..=9.
        assert_eq!(result.iterations, 10);
        assert!(result.final_temperature < 1e-3);
    }

    #[test]
    fn test_iteration_cap() {
        let fitness = PrecedenceFitness::new(&chain(5));
        let config = SaConfig::default().with_max_iterations(25).with_seed(9);
        let result = SaRunner::run(&fitness, &config).unwrap();
        assert_eq!(result.iterations, 25);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let fitness = PrecedenceFitness::new(&chain(6));
        let config = SaConfig::default().with_max_iterations(500).with_seed(77);
        let a = SaRunner::run(&fitness, &config).unwrap();
        let b = SaRunner::run(&fitness, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_single_node_is_trivial() {
        let fitness = PrecedenceFitness::new(&chain(1));
        let result = SaRunner::run(&fitness, &SaConfig::default()).unwrap();
        assert_eq!(result.best, vec![0]);
        assert_eq!(result.iterations, 0);
    }
}
