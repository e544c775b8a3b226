//! sgraph: solve an S-graph recipe from the command line.
//!
//! Reads the text graph format (`NODE`, `EDGE`, `TIME` lines) from `--input`
//! or stdin and prints the schedule as `NODE <id>` lines on stdout.
//! Diagnostics go to stderr; `-s/--silent_mode` turns them off.
//!
//! Usage:
//!   sgraph johnson --input recipe.txt
//!   sgraph sa 500 0.99 20000 < recipe.txt
//!   sgraph generate 8 3 42 > recipe.txt

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use u_sgraph::dispatching::RuleKind;
use u_sgraph::flowshop::{BranchBoundConfig, FlowShop, ListConfig};
use u_sgraph::ga::GaConfig;
use u_sgraph::io::{read_graph, write_graph, write_schedule};
use u_sgraph::kpi::ScheduleKpi;
use u_sgraph::minlp::MinlpConfig;
use u_sgraph::models::Graph;
use u_sgraph::sa::SaConfig;
use u_sgraph::solver::{
    BranchBoundSolver, CdsSolver, GaSolver, JohnsonSolver, ListSolver, MinlpSolver, SaSolver, Solver,
};
use u_sgraph::validation::validate_graph;

/// S-graph scheduler for batch process recipes.
#[derive(Parser, Debug)]
#[command(name = "sgraph", version, about)]
struct Cli {
    /// Suppress all diagnostic output.
    #[arg(short = 's', long = "silent_mode", global = true)]
    silent_mode: bool,

    /// Graph file to read (stdin when omitted).
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Johnson's two-machine rule.
    Johnson,
    /// Campbell–Dudek–Smith heuristic.
    Cds,
    /// List scheduling with a dispatching rule.
    List {
        /// SPT, LPT, MWKR, LWKR or FIFO.
        rule: Option<String>,
    },
    /// Exact best-first branch and bound.
    Bnb {
        /// Node-expansion cap.
        max_expansions: Option<String>,
    },
    /// Genetic algorithm.
    Ga {
        population: Option<String>,
        generations: Option<String>,
        mutation_rate: Option<String>,
    },
    /// Simulated annealing.
    Sa {
        initial_temperature: Option<String>,
        cool_rate: Option<String>,
        max_iterations: Option<String>,
    },
    /// External MINLP solver.
    Minlp {
        /// Solver executable.
        solver: PathBuf,
        timeout_secs: Option<String>,
    },
    /// Print a random flow-shop recipe.
    Generate {
        jobs: Option<String>,
        machines: Option<String>,
        seed: Option<String>,
    },
}

/// Parses an optional positional value, falling back to `default` when it
/// is missing or unparsable.
fn param<T: FromStr>(value: Option<&str>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn read_input(path: Option<&PathBuf>) -> Result<Graph> {
    let graph = match path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            read_graph(BufReader::new(file)).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => read_graph(io::stdin().lock()).context("failed to read graph from stdin")?,
    };
    Ok(graph)
}

fn sa_config(initial_temperature: Option<&str>, cool_rate: Option<&str>, max_iterations: Option<&str>) -> SaConfig {
    let d = SaConfig::default();
    SaConfig::default()
        .with_initial_temperature(param(initial_temperature, d.initial_temperature))
        .with_cool_rate(param(cool_rate, d.cool_rate))
        .with_max_iterations(param(max_iterations, d.max_iterations))
}

/// Maps a solve subcommand onto its solver; `None` for `generate`.
fn build_solver(command: &Command) -> Option<Box<dyn Solver>> {
    let solver: Box<dyn Solver> = match command {
        Command::Johnson => Box::new(JohnsonSolver),
        Command::Cds => Box::new(CdsSolver),
        Command::List { rule } => {
            let rule = param(rule.as_deref(), RuleKind::default());
            Box::new(ListSolver::new(ListConfig::default().with_rule(rule)))
        }
        Command::Bnb { max_expansions } => {
            let defaults = BranchBoundConfig::default();
            let cap = param(max_expansions.as_deref(), defaults.max_expansions);
            Box::new(BranchBoundSolver::new(defaults.with_max_expansions(cap)))
        }
        Command::Ga {
            population,
            generations,
            mutation_rate,
        } => {
            let d = GaConfig::default();
            let config = GaConfig::default()
                .with_population_size(param(population.as_deref(), d.population_size))
                .with_generations(param(generations.as_deref(), d.generations))
                .with_mutation_rate(param(mutation_rate.as_deref(), d.mutation_rate));
            Box::new(GaSolver::new(config))
        }
        Command::Sa {
            initial_temperature,
            cool_rate,
            max_iterations,
        } => Box::new(SaSolver::new(sa_config(
            initial_temperature.as_deref(),
            cool_rate.as_deref(),
            max_iterations.as_deref(),
        ))),
        Command::Minlp {
            solver,
            timeout_secs,
        } => {
            let d = MinlpConfig::default();
            let config =
                MinlpConfig::new(solver.clone()).with_timeout_secs(param(timeout_secs.as_deref(), d.timeout_secs));
            Box::new(MinlpSolver::new(config))
        }
        Command::Generate { .. } => return None,
    };
    Some(solver)
}

fn generate(jobs: Option<&str>, machines: Option<&str>, seed: Option<&str>) -> Result<()> {
    let jobs = param(jobs, 5usize);
    let machines = param(machines, 2usize);
    let mut rng = StdRng::seed_from_u64(param(seed, rand::random()));
    let shop = FlowShop::random(jobs, machines, &mut rng);
    info!(jobs, machines, "random recipe generated");
    write_graph(shop.recipe(), io::stdout().lock()).context("failed to write graph")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.silent_mode {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_writer(io::stderr)
            .init();
    }

    let Some(solver) = build_solver(&cli.command) else {
        if let Command::Generate { jobs, machines, seed } = &cli.command {
            generate(jobs.as_deref(), machines.as_deref(), seed.as_deref())?;
        }
        return Ok(());
    };

    let graph = read_input(cli.input.as_ref())?;
    if let Err(issues) = validate_graph(&graph) {
        for issue in &issues {
            warn!(kind = ?issue.kind, "{}", issue.message);
        }
    }
    info!(nodes = graph.node_count(), edges = graph.edge_count(), "graph loaded");

    let schedule = solver
        .solve(&graph)
        .with_context(|| format!("{} solver failed", solver.name()))?;

    if schedule.makespan.is_some() {
        let kpi = ScheduleKpi::calculate(&schedule);
        info!(
            makespan = kpi.makespan,
            avg_utilization = kpi.avg_utilization,
            avg_flow_time = kpi.avg_flow_time,
            "schedule kpi"
        );
    }

    write_schedule(&schedule, io::stdout().lock()).context("failed to write schedule")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_param_falls_back_to_default() {
        assert_eq!(param(Some("abc"), 5usize), 5);
        assert_eq!(param(None, 5usize), 5);
        assert_eq!(param(Some("12"), 5usize), 12);
        assert_eq!(param(Some("0.5"), 0.9f64), 0.5);
    }

    #[test]
    fn test_sa_positionals_with_long_silent_flag() {
        let cli = Cli::try_parse_from(["sgraph", "sa", "x", "0.9", "--silent_mode"]).unwrap();
        assert!(cli.silent_mode);
        let Command::Sa {
            initial_temperature,
            cool_rate,
            max_iterations,
        } = &cli.command
        else {
            panic!("expected sa, got {:?}", cli.command);
        };
        let config = sa_config(
            initial_temperature.as_deref(),
            cool_rate.as_deref(),
            max_iterations.as_deref(),
        );
        let defaults = SaConfig::default();
        assert_eq!(config.initial_temperature, defaults.initial_temperature);
        assert_eq!(config.cool_rate, 0.9);
        assert_eq!(config.max_iterations, defaults.max_iterations);
    }

    #[test]
    fn test_short_silent_flag_anywhere() {
        let cli = Cli::try_parse_from(["sgraph", "-s", "johnson"]).unwrap();
        assert!(cli.silent_mode);

        let cli = Cli::try_parse_from(["sgraph", "bnb", "-s"]).unwrap();
        assert!(cli.silent_mode);
        assert!(matches!(cli.command, Command::Bnb { max_expansions: None }));

        let cli = Cli::try_parse_from(["sgraph", "cds"]).unwrap();
        assert!(!cli.silent_mode);
    }

    #[test]
    fn test_input_and_minlp_arguments() {
        let cli = Cli::try_parse_from(["sgraph", "minlp", "couenne", "--input", "recipe.txt"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("recipe.txt")));
        assert!(matches!(
            &cli.command,
            Command::Minlp { solver, timeout_secs: None } if solver == &PathBuf::from("couenne")
        ));
        assert!(Cli::try_parse_from(["sgraph", "minlp"]).is_err());
    }

    #[test]
    fn test_build_solver_names() {
        let cases = [
            (Command::Johnson, "johnson"),
            (Command::Cds, "cds"),
            (Command::List { rule: Some("lpt".into()) }, "list"),
            (Command::Bnb { max_expansions: None }, "bnb"),
        ];
        for (command, name) in cases {
            assert_eq!(build_solver(&command).unwrap().name(), name);
        }
        let generate = Command::Generate {
            jobs: None,
            machines: None,
            seed: None,
        };
        assert!(build_solver(&generate).is_none());
    }
}
