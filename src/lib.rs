//! S-graph scheduling for batch process recipes.
//!
//! A recipe is a directed graph of machine-qualified steps (`<job>_M<m>`)
//! and product nodes. Edges carry transfer or setup delays. Solvers read
//! the graph and return an ordered [`models::Schedule`] that minimizes or
//! approximates the makespan.
//!
//! # Modules
//!
//! - **`models`**: `Node`, `Edge`, `Graph`, `Schedule`
//! - **`validation`**: input integrity checks (duplicate IDs, dangling edges, cycles)
//! - **`analysis`**: Kahn topological ordering, critical-path propagation
//! - **`flowshop`**: job view of a recipe, Johnson, CDS, list scheduling,
//!   branch and bound
//! - **`dispatching`**: priority rules for list scheduling
//! - **`permutation`**, **`ga`**, **`sa`**: permutation metaheuristics
//! - **`minlp`**: exchange model and external solver bridge
//! - **`solver`**: the [`solver::Solver`] capability and one adapter per strategy
//! - **`io`**: text import/export
//! - **`kpi`**: schedule metrics
//!
//! # Example
//!
//! ```
//! use u_sgraph::flowshop::{FlowShop, Job};
//! use u_sgraph::solver::{JohnsonSolver, Solver};
//!
//! let shop = FlowShop::from_jobs(vec![
//!     Job::new("J1", vec![3.0, 2.0]),
//!     Job::new("J2", vec![1.0, 4.0]),
//! ]);
//! let schedule = JohnsonSolver.solve(shop.recipe()).unwrap();
//! assert_eq!(schedule.job_order, vec!["J2", "J1"]);
//! assert_eq!(schedule.makespan, Some(7.0));
//! ```
//!
//! # References
//!
//! - Sanmartí et al. (2002), "Combinatorial framework for effective scheduling
//!   of multipurpose batch plants", AIChE Journal 48(11)
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod analysis;
pub mod dispatching;
pub mod error;
pub mod flowshop;
pub mod ga;
pub mod io;
pub mod kpi;
pub mod minlp;
pub mod models;
pub mod permutation;
pub mod sa;
pub mod solver;
pub mod validation;

pub use error::{Result, SchedError};
