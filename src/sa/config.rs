//! SA configuration.

use serde::{Deserialize, Serialize};
use u_metaheur::sa::{CoolingSchedule, SaConfig as AnnealingConfig};

/// Configuration for simulated annealing.
///
/// Cooling is geometric: `T_{k+1} = cool_rate * T_k`, one neighbor per
/// temperature step. The run ends after `max_iterations` neighbors or once
/// the temperature is no longer above `min_temperature`.
///
/// # Examples
///
/// ```
/// use u_sgraph::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(500.0)
///     .with_cool_rate(0.99)
///     .with_max_iterations(2_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Cooling factor in (0, 1). Higher = slower cooling.
    pub cool_rate: f64,

    /// Maximum number of neighbor evaluations.
    pub max_iterations: usize,

    /// The run stops once the temperature drops below this.
    pub min_temperature: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cool_rate: 0.995,
            max_iterations: 10_000,
            min_temperature: 1e-3,
            seed: None,
        }
    }
}

impl SaConfig {
    /// Sets the starting temperature.
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    /// Sets the geometric cooling factor.
    pub fn with_cool_rate(mut self, rate: f64) -> Self {
        self.cool_rate = rate;
        self
    }

    /// Sets the neighbor-evaluation budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the temperature floor.
    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// `max_iterations` must be positive; the annealing runner reads zero as
    /// "no limit".
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be positive".into());
        }
        if self.cool_rate <= 0.0 || self.cool_rate >= 1.0 {
            return Err(format!("cool_rate must be in (0, 1), got {}", self.cool_rate));
        }
        self.to_annealing().validate()
    }

    /// The equivalent `u-metaheur` configuration: geometric cooling with
    /// one neighbor per temperature step.
    pub fn to_annealing(&self) -> AnnealingConfig {
        let mut config = AnnealingConfig::default()
            .with_initial_temperature(self.initial_temperature)
            .with_min_temperature(self.min_temperature)
            .with_cooling(CoolingSchedule::Geometric {
                alpha: self.cool_rate,
            })
            .with_iterations_per_temperature(1)
            .with_max_iterations(self.max_iterations);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}
