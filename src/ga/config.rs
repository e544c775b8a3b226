//! GA configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the genetic algorithm.
///
/// # Builder Pattern
///
/// ```
/// use u_sgraph::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(80)
///     .with_generations(300)
///     .with_mutation_rate(0.2)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    /// Number of individuals per generation.
    pub population_size: usize,

    /// Number of generations (fixed; no early stopping).
    pub generations: usize,

    /// Fraction of the ranked population kept as parents (at least one).
    pub parent_ratio: f64,

    /// Probability of applying swap mutation to a child (0.0–1.0).
    pub mutation_rate: f64,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 200,
            parent_ratio: 0.2,
            mutation_rate: 0.1,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the parent ratio.
    pub fn with_parent_ratio(mut self, ratio: f64) -> Self {
        self.parent_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of parents kept from a ranked population.
    pub fn parent_count(&self) -> usize {
        ((self.population_size as f64 * self.parent_ratio) as usize).max(1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size == 0 {
            return Err("population_size must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            ));
        }
        if self.parent_ratio <= 0.0 || self.parent_ratio > 1.0 {
            return Err(format!(
                "parent_ratio must be in (0, 1], got {}",
                self.parent_ratio
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.parent_count(), 10);
    }

    #[test]
    fn test_parent_count_at_least_one() {
        let config = GaConfig::default().with_population_size(3);
        assert_eq!(config.parent_count(), 1);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(GaConfig::default().with_population_size(0).validate().is_err());
        let mut config = GaConfig::default();
        config.mutation_rate = 1.5;
        assert!(config.validate().is_err());
    }
}
