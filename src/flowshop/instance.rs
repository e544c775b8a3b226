//! Flow-shop view of an S-graph.
//!
//! Groups machine-qualified nodes (`J1_M1`, `J1_M2`, ...) into jobs with a
//! per-machine processing time vector, and remembers the product node each
//! job finishes into. The original graph is kept as the technological
//! recipe that every candidate schedule starts from.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{machine_node_id, node_key, Graph, Node};

/// A job: one batch that visits machines 1..m in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Base identifier (`J1` for nodes `J1_M1`, `J1_M2`, ...).
    pub id: String,
    /// Processing time per machine (index 0 = machine 1).
    pub times: Vec<f64>,
    /// Product node this job finishes into.
    pub product: Option<String>,
}

impl Job {
    /// Creates a job with the given processing times.
    pub fn new(id: impl Into<String>, times: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            times: times.into_iter().map(|t| t.max(0.0)).collect(),
            product: None,
        }
    }

    /// Sets the product node.
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// Processing time on a 1-based machine index (0 if absent).
    pub fn time(&self, machine: usize) -> f64 {
        machine
            .checked_sub(1)
            .and_then(|i| self.times.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of processing times on machines `from..=to` (1-based).
    pub fn time_range(&self, from: usize, to: usize) -> f64 {
        (from..=to).map(|m| self.time(m)).sum()
    }
}

/// A permutation flow-shop instance backed by its S-graph recipe.
#[derive(Debug, Clone)]
pub struct FlowShop {
    jobs: Vec<Job>,
    /// `stages[j][m-1]` = node id of job `j` on machine `m`, if present.
    stages: Vec<Vec<Option<String>>>,
    machines: usize,
    recipe: Graph,
}

impl FlowShop {
    /// Extracts jobs from a machine-qualified S-graph.
    ///
    /// Jobs appear in the order their first node was inserted. A job's
    /// product is the first non-machine node reached by an edge from one of
    /// its machine nodes.
    ///
    /// Machine suffixes are compacted into consecutive positions in
    /// ascending order, so `J_M1` and `J_M7` form a two-machine shop.
    pub fn from_graph(graph: &Graph) -> Self {
        let indices = graph.machine_indices();
        let machines = indices.len();
        let column: HashMap<usize, usize> = indices.iter().enumerate().map(|(c, &m)| (m, c)).collect();
        let mut jobs: Vec<Job> = Vec::new();
        let mut stages: Vec<Vec<Option<String>>> = Vec::new();
        let mut job_index: HashMap<String, usize> = HashMap::new();

        for node in graph.nodes() {
            let Some((base, machine)) = node.machine_ref() else {
                continue;
            };
            let Some(&c) = column.get(&machine) else {
                continue;
            };
            let j = *job_index.entry(node_key(base)).or_insert_with(|| {
                jobs.push(Job::new(base, vec![0.0; machines]));
                stages.push(vec![None; machines]);
                jobs.len() - 1
            });
            jobs[j].times[c] = node.duration();
            stages[j][c] = Some(node.id.clone());
        }

        for edge in graph.edges() {
            let (Some(from), Some(to)) = (graph.node(&edge.from), graph.node(&edge.to)) else {
                continue;
            };
            let (Some((base, _)), true) = (from.machine_ref(), to.is_product()) else {
                continue;
            };
            if let Some(&j) = job_index.get(&node_key(base)) {
                if jobs[j].product.is_none() {
                    jobs[j].product = Some(to.id.clone());
                }
            }
        }

        Self {
            jobs,
            stages,
            machines,
            recipe: graph.clone(),
        }
    }

    /// Builds the S-graph for a job table.
    ///
    /// Creates one node per job and machine (`<job>_M<m>`), one product node
    /// per job (`P<k>` unless the job names its own) and the technological
    /// edges `J_Mm → J_Mm+1 → ... → product`, all with zero cost.
    pub fn from_jobs(jobs: Vec<Job>) -> Self {
        let machines = jobs.iter().map(|j| j.times.len()).max().unwrap_or(0);
        let mut graph = Graph::new();

        for (k, job) in jobs.iter().enumerate() {
            let mut previous: Option<String> = None;
            for m in 1..=machines {
                let id = machine_node_id(&job.id, m);
                let mut durations = vec![0.0; m];
                durations[m - 1] = job.time(m);
                graph.add_node(Node::new(&id).with_durations(durations));
                if let Some(prev) = previous {
                    graph.add_edge(&prev, &id, 0.0);
                }
                previous = Some(id);
            }
            let product = job.product.clone().unwrap_or_else(|| format!("P{}", k + 1));
            graph.add_node(Node::new(&product).with_description(format!("product of {}", job.id)));
            if let Some(last) = previous {
                graph.add_edge(&last, &product, 0.0);
            }
        }

        Self::from_graph(&graph)
    }

    /// Generates a random instance with integer processing times in `1..=20`.
    pub fn random<R: Rng>(jobs: usize, machines: usize, rng: &mut R) -> Self {
        let jobs = (1..=jobs)
            .map(|j| {
                let times = (0..machines)
                    .map(|_| rng.random_range(1..=20) as f64)
                    .collect();
                Job::new(format!("J{j}"), times)
            })
            .collect();
        Self::from_jobs(jobs)
    }

    /// Jobs in extraction order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Number of machines.
    pub fn machines(&self) -> usize {
        self.machines
    }

    /// The technological recipe graph.
    pub fn recipe(&self) -> &Graph {
        &self.recipe
    }

    /// Node id of job `j` on the 1-based machine position `m`.
    pub fn stage(&self, job: usize, machine: usize) -> Option<&str> {
        self.stages
            .get(job)?
            .get(machine.checked_sub(1)?)?
            .as_deref()
    }

    /// Last machine node of a job.
    pub fn last_stage(&self, job: usize) -> Option<&str> {
        (1..=self.machines).rev().find_map(|m| self.stage(job, m))
    }

    /// Routes a job into a different product node.
    ///
    /// The product does not have to exist in the recipe; candidate schedules
    /// then keep a dangling edge and log a warning. Returns `false` if the
    /// job is unknown.
    pub fn set_product(&mut self, job_id: &str, product: impl Into<String>) -> bool {
        match self.jobs.iter_mut().find(|j| j.id.eq_ignore_ascii_case(job_id)) {
            Some(job) => {
                job.product = Some(product.into());
                true
            }
            None => false,
        }
    }

    /// Job ids for a sequence of job indices.
    pub fn job_ids(&self, order: &[usize]) -> Vec<String> {
        order.iter().map(|&j| self.jobs[j].id.clone()).collect()
    }
}
