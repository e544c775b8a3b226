//! Simulated annealing over node permutations.
//!
//! Maximizes a [`PermutationObjective`](crate::permutation::PermutationObjective)
//! with random pairwise swaps, Metropolis acceptance and geometric cooling.
//! The annealing loop is `u_metaheur::sa::SaRunner`.
//!
//! # Key Types
//!
//! - [`SaConfig`]: temperatures, cooling rate, iteration cap
//! - [`SaRunner`]: executes the annealing loop
//! - [`SaResult`]: best permutation and best-fitness history
//!
//! # References
//!
//! Kirkpatrick et al. (1983), Cerny (1985)

mod config;
mod runner;

pub use config::SaConfig;
pub use runner::{SaResult, SaRunner};
