//! Solver adapters.
//!
//! Every strategy is exposed through one capability: [`Solver::solve`]
//! turns a graph into an ordered [`Schedule`]. Adapters never modify the
//! caller's graph; flow-shop solvers build a private
//! [`CandidateSchedule`] for the order they pick.
//!
//! | Adapter | Strategy | Output |
//! |---------|----------|--------|
//! | [`JohnsonSolver`] | Two-machine rule | Timed, Gantt-ready |
//! | [`CdsSolver`] | Campbell–Dudek–Smith | Timed, Gantt-ready |
//! | [`ListSolver`] | Prioritized list scheduling | Timed, Gantt-ready |
//! | [`BranchBoundSolver`] | Best-first branch and bound | Timed, Gantt-ready |
//! | [`GaSolver`] | Genetic algorithm | Node permutation |
//! | [`SaSolver`] | Simulated annealing | Precedence-feasible prefix |
//! | [`MinlpSolver`] | External MINLP solver | Reported start times |

use tracing::{info, info_span};

use crate::error::{Result, SchedError};
use crate::flowshop::{
    branch_and_bound, cds, johnson_shop_order, list_schedule, BranchBoundConfig, CandidateSchedule,
    FlowShop, ListConfig,
};
use crate::ga::{GaConfig, GaRunner};
use crate::minlp::{MinlpBridge, MinlpConfig};
use crate::models::{Graph, Schedule};
use crate::permutation::{node_ids, PrecedenceFitness};
use crate::sa::{SaConfig, SaRunner};

/// Produces an ordered node sequence from a graph.
pub trait Solver: Send + Sync {
    /// Short solver name, used in schedules and traces.
    fn name(&self) -> &'static str;

    /// Solves `graph`.
    fn solve(&self, graph: &Graph) -> Result<Schedule>;
}

/// Johnson's rule on machines 1 and 2.
#[derive(Debug, Clone, Copy, Default)]
pub struct JohnsonSolver;

impl Solver for JohnsonSolver {
    fn name(&self) -> &'static str {
        "johnson"
    }

    fn solve(&self, graph: &Graph) -> Result<Schedule> {
        let _span = info_span!("solve", solver = self.name()).entered();
        let shop = FlowShop::from_graph(graph);
        let order = johnson_shop_order(&shop)?;
        let schedule = CandidateSchedule::build(&shop, &order).to_schedule(self.name())?;
        info!(makespan = ?schedule.makespan, "johnson done");
        Ok(schedule)
    }
}

/// Campbell–Dudek–Smith heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct CdsSolver;

impl Solver for CdsSolver {
    fn name(&self) -> &'static str {
        "cds"
    }

    fn solve(&self, graph: &Graph) -> Result<Schedule> {
        let _span = info_span!("solve", solver = self.name()).entered();
        let shop = FlowShop::from_graph(graph);
        let outcome = cds(&shop)?;
        CandidateSchedule::build(&shop, &outcome.order).to_schedule(self.name())
    }
}

/// List scheduling with a dispatching rule.
#[derive(Debug, Clone, Default)]
pub struct ListSolver {
    config: ListConfig,
}

impl ListSolver {
    /// Creates the solver with the given list-scheduling configuration.
    pub fn new(config: ListConfig) -> Self {
        Self { config }
    }
}

impl Solver for ListSolver {
    fn name(&self) -> &'static str {
        "list"
    }

    fn solve(&self, graph: &Graph) -> Result<Schedule> {
        let _span = info_span!("solve", solver = self.name()).entered();
        self.config.validate().map_err(SchedError::InvalidConfig)?;
        let shop = FlowShop::from_graph(graph);
        Ok(list_schedule(&shop, &self.config)?.schedule)
    }
}

/// Exact best-first branch and bound (two machines).
#[derive(Debug, Clone, Default)]
pub struct BranchBoundSolver {
    config: BranchBoundConfig,
}

impl BranchBoundSolver {
    /// Creates the solver with the given search configuration.
    pub fn new(config: BranchBoundConfig) -> Self {
        Self { config }
    }
}

impl Solver for BranchBoundSolver {
    fn name(&self) -> &'static str {
        "bnb"
    }

    fn solve(&self, graph: &Graph) -> Result<Schedule> {
        let _span = info_span!("solve", solver = self.name()).entered();
        let shop = FlowShop::from_graph(graph);
        let outcome = branch_and_bound(&shop, &self.config)?;
        info!(
            makespan = outcome.makespan,
            seed_makespan = outcome.seed_makespan,
            expanded = outcome.stats.expanded,
            truncated = outcome.stats.truncated,
            "branch and bound done"
        );
        CandidateSchedule::build(&shop, &outcome.order).to_schedule(self.name())
    }
}

/// Genetic algorithm over all nodes.
#[derive(Debug, Clone, Default)]
pub struct GaSolver {
    config: GaConfig,
}

impl GaSolver {
    /// Creates the solver with the given GA configuration.
    pub fn new(config: GaConfig) -> Self {
        Self { config }
    }
}

impl Solver for GaSolver {
    fn name(&self) -> &'static str {
        "ga"
    }

    fn solve(&self, graph: &Graph) -> Result<Schedule> {
        let _span = info_span!("solve", solver = self.name()).entered();
        let fitness = PrecedenceFitness::new(graph);
        let result = GaRunner::run(&fitness, &self.config).map_err(SchedError::InvalidConfig)?;
        Ok(Schedule::from_sequence(self.name(), &node_ids(graph, &result.best)))
    }
}

/// Simulated annealing over all nodes.
///
/// The best permutation is cut to its longest precedence-feasible prefix,
/// so nodes may be missing from the result.
#[derive(Debug, Clone, Default)]
pub struct SaSolver {
    config: SaConfig,
}

impl SaSolver {
    /// Creates the solver with the given annealing configuration.
    pub fn new(config: SaConfig) -> Self {
        Self { config }
    }
}

impl Solver for SaSolver {
    fn name(&self) -> &'static str {
        "sa"
    }

    fn solve(&self, graph: &Graph) -> Result<Schedule> {
        let _span = info_span!("solve", solver = self.name()).entered();
        let fitness = PrecedenceFitness::new(graph);
        let result = SaRunner::run(&fitness, &self.config).map_err(SchedError::InvalidConfig)?;
        let accepted = fitness.precedence_prefix(&result.best);
        if accepted.len() < result.best.len() {
            info!(
                kept = accepted.len(),
                dropped = result.best.len() - accepted.len(),
                "sa result cut at first unsatisfied predecessor"
            );
        }
        Ok(Schedule::from_sequence(self.name(), &node_ids(graph, &accepted)))
    }
}

/// External MINLP solver.
#[derive(Debug, Clone, Default)]
pub struct MinlpSolver {
    bridge: MinlpBridge,
}

impl MinlpSolver {
    /// Creates the solver with the given external solver configuration.
    pub fn new(config: MinlpConfig) -> Self {
        Self {
            bridge: MinlpBridge::new(config),
        }
    }
}

impl Solver for MinlpSolver {
    fn name(&self) -> &'static str {
        "minlp"
    }

    fn solve(&self, graph: &Graph) -> Result<Schedule> {
        let _span = info_span!("solve", solver = self.name()).entered();
        let solution = self.bridge.solve(graph)?;
        Ok(solution.to_schedule(graph, self.name()))
    }
}
