//! GA execution loop.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::config::GaConfig;
use super::operators::{order_crossover, swap_mutation};
use crate::permutation::{random_permutation, PermutationObjective};

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Best permutation found during the entire run.
    pub best: Vec<usize>,

    /// Fitness of `best`.
    pub best_fitness: f64,

    /// Generations executed.
    pub generations: usize,

    /// Best-so-far fitness at the end of each generation (non-decreasing).
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```
/// use u_sgraph::ga::{GaConfig, GaRunner};
/// use u_sgraph::models::{Graph, Node};
/// use u_sgraph::permutation::PrecedenceFitness;
///
/// let mut g = Graph::new();
/// g.add_node(Node::new("A"));
/// g.add_node(Node::new("B"));
/// g.add_edge("A", "B", 1.0);
/// let fitness = PrecedenceFitness::new(&g);
/// let result = GaRunner::run(&fitness, &GaConfig::default().with_seed(1)).unwrap();
/// assert_eq!(result.best, vec![0, 1]);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA.
    ///
    /// With at most one element the identity permutation is returned without
    /// searching.
    ///
    /// # Errors
    /// Returns the validation message for an invalid configuration.
    pub fn run<P: PermutationObjective>(problem: &P, config: &GaConfig) -> Result<GaResult, String> {
        config.validate()?;

        let n = problem.len();
        if n <= 1 {
            let best: Vec<usize> = (0..n).collect();
            return Ok(GaResult {
                best_fitness: problem.fitness(&best),
                best,
                generations: 0,
                fitness_history: Vec::new(),
            });
        }

        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let mut population: Vec<Vec<usize>> = (0..config.population_size)
            .map(|_| random_permutation(n, &mut rng))
            .collect();

        let parent_count = config.parent_count().min(config.population_size);
        let mut best: Option<(Vec<usize>, f64)> = None;
        let mut fitness_history = Vec::with_capacity(config.generations);

        for generation in 0..config.generations {
            let mut scored: Vec<(f64, Vec<usize>)> = population
                .into_iter()
                .map(|perm| (problem.fitness(&perm), perm))
                .collect();
            scored.sort_by(|a, b| b.0.total_cmp(&a.0));

            let (top_fitness, top) = (&scored[0].0, &scored[0].1);
            if best.as_ref().is_none_or(|(_, f)| *top_fitness > *f) {
                best = Some((top.clone(), *top_fitness));
            }
            let best_fitness = best.as_ref().map_or(f64::NEG_INFINITY, |(_, f)| *f);
            fitness_history.push(best_fitness);
            debug!(generation, best_fitness, "ga generation");

            let parents: Vec<Vec<usize>> = scored
                .into_iter()
                .take(parent_count)
                .map(|(_, perm)| perm)
                .collect();

            population = parents.clone();
            while population.len() < config.population_size {
                let a = &parents[rng.random_range(0..parents.len())];
                let b = &parents[rng.random_range(0..parents.len())];
                let mut child = order_crossover(a, b, &mut rng);
                swap_mutation(&mut child, config.mutation_rate, &mut rng);
                population.push(child);
            }
        }

        // Zero generations still returns a scored individual.
        let (best, best_fitness) = match best {
            Some(found) => found,
            None => {
                let perm = population.swap_remove(0);
                let fitness = problem.fitness(&perm);
                (perm, fitness)
            }
        };

        info!(
            best_fitness,
            generations = config.generations,
            "ga finished"
        );

        Ok(GaResult {
            best,
            best_fitness,
            generations: config.generations,
            fitness_history,
        })
    }
}
