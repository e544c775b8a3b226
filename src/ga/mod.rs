//! Genetic algorithm over node permutations.
//!
//! Individuals are permutations of every node in the graph, scored by a
//! [`PermutationObjective`](crate::permutation::PermutationObjective)
//! (maximized). Truncation selection keeps the top fraction as parents;
//! the rest of each generation is refilled with prefix-cut order crossover
//! and swap mutation.
//!
//! # Key Types
//!
//! - [`GaConfig`]: population size, generations, parent ratio, mutation rate
//! - [`GaRunner`]: executes the evolutionary loop
//! - [`GaResult`]: best permutation and per-generation best-fitness history
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains" (order crossover)

mod config;
pub mod operators;
mod runner;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
