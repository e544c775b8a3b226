//! Critical-path (earliest finish time) propagation.
//!
//! # Algorithm
//! Walk the nodes in topological order and relax every outgoing edge
//! `u → v` with cost `c`:
//!
//! ```text
//! start(v) = max(start(v), start(u) + duration(u) + c)
//! ```
//!
//! Nodes without an incoming edge start at 0. A node whose predecessors are
//! never reached (e.g. its only predecessor is a dangling reference) stays
//! unreachable and is reported as `None`.
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-Path Planning and Scheduling"

use tracing::warn;

use super::topo::{successors, topological_order};
use crate::error::{Result, SchedError};
use crate::models::Graph;

/// Earliest start/finish times for every node of a graph.
#[derive(Debug, Clone)]
pub struct CriticalPath {
    start: Vec<Option<f64>>,
    finish: Vec<Option<f64>>,
    sinks: Vec<usize>,
    makespan: Option<f64>,
}

impl CriticalPath {
    /// Runs topological ordering and propagation in one step, using the
    /// graph's designated sinks for the makespan.
    ///
    /// # Errors
    /// [`SchedError::InfeasibleGraph`] if the graph has a cycle.
    pub fn analyze(graph: &Graph) -> Result<Self> {
        let order = topological_order(graph)?;
        Ok(Self::compute(graph, &order))
    }

    /// Propagates earliest times along a precomputed topological order.
    pub fn compute(graph: &Graph, order: &[usize]) -> Self {
        Self::compute_with_sinks(graph, order, &graph.sink_indices())
    }

    /// Propagates earliest times; the makespan is taken over `sinks`.
    pub fn compute_with_sinks(graph: &Graph, order: &[usize], sinks: &[usize]) -> Self {
        let n = graph.node_count();
        let durations: Vec<f64> = graph.nodes().iter().map(|node| node.duration()).collect();

        let mut has_incoming = vec![false; n];
        for edge in graph.edges() {
            if let Some(v) = graph.index_of(&edge.to) {
                has_incoming[v] = true;
            }
        }

        let mut start: Vec<Option<f64>> = has_incoming
            .iter()
            .map(|&incoming| if incoming { None } else { Some(0.0) })
            .collect();

        let adj = successors(graph);
        for &u in order {
            let Some(start_u) = start[u] else {
                continue;
            };
            let finish_u = start_u + durations[u];
            for &(v, cost) in &adj[u] {
                let candidate = finish_u + cost;
                start[v] = Some(start[v].map_or(candidate, |s| s.max(candidate)));
            }
        }

        let finish: Vec<Option<f64>> = start
            .iter()
            .zip(&durations)
            .map(|(s, d)| s.map(|s| s + d))
            .collect();

        let mut makespan = Some(0.0f64);
        for &sink in sinks {
            match (makespan, finish[sink]) {
                (Some(m), Some(f)) => makespan = Some(m.max(f)),
                _ => {
                    if makespan.is_some() {
                        warn!(node = %graph.nodes()[sink].id, "sink unreachable, makespan unbounded");
                    }
                    makespan = None;
                }
            }
        }

        Self {
            start,
            finish,
            sinks: sinks.to_vec(),
            makespan,
        }
    }

    /// Earliest start of a node (`None` = unreachable).
    pub fn start(&self, node: usize) -> Option<f64> {
        self.start.get(node).copied().flatten()
    }

    /// Earliest finish of a node (`None` = unreachable).
    pub fn finish(&self, node: usize) -> Option<f64> {
        self.finish.get(node).copied().flatten()
    }

    /// Maximum finish time over the sinks; `None` if any sink is unreachable.
    pub fn makespan(&self) -> Option<f64> {
        self.makespan
    }

    /// Makespan, failing with [`SchedError::Unbounded`] naming the first
    /// unreachable sink.
    pub fn require_makespan(&self, graph: &Graph) -> Result<f64> {
        self.makespan.ok_or_else(|| {
            let node = self
                .sinks
                .iter()
                .find(|&&s| self.finish[s].is_none())
                .map(|&s| graph.nodes()[s].id.clone())
                .unwrap_or_default();
            SchedError::Unbounded { node }
        })
    }

    /// Indices of nodes that were never reached.
    pub fn unreachable(&self) -> Vec<usize> {
        (0..self.start.len())
            .filter(|&i| self.start[i].is_none())
            .collect()
    }

    /// One critical chain, from a source to the latest-finishing sink.
    ///
    /// Follows tight edges (`finish(u) + cost == start(v)`) backwards.
    pub fn critical_chain(&self, graph: &Graph) -> Vec<usize> {
        let Some(mut current) = self
            .sinks
            .iter()
            .copied()
            .filter(|&s| self.finish[s].is_some())
            .max_by(|&a, &b| {
                self.finish[a]
                    .partial_cmp(&self.finish[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        else {
            return Vec::new();
        };

        let mut chain = vec![current];
        loop {
            let Some(start_v) = self.start[current] else {
                break;
            };
            let predecessor = graph.edges().iter().find_map(|edge| {
                let (u, v) = graph.endpoints(edge)?;
                let tight = v == current
                    && self.finish[u].is_some_and(|f| (f + edge.cost - start_v).abs() < 1e-9);
                tight.then_some(u)
            });
            match predecessor {
                Some(u) if !chain.contains(&u) => {
                    chain.push(u);
                    current = u;
                }
                _ => break,
            }
        }
        chain.reverse();
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;
    use proptest::prelude::*;

    fn two_job_graph() -> Graph {
        let mut g = Graph::new();
        g.add_node(Node::new("J1_M1").with_duration(3.0));
        g.add_node(Node::new("J1_M2").with_duration(2.0));
        g.add_node(Node::new("P1"));
        g.add_edge("J1_M1", "J1_M2", 1.0);
        g.add_edge("J1_M2", "P1", 0.0);
        g
    }

    #[test]
    fn test_chain_times() {
        let g = two_job_graph();
        let cp = CriticalPath::analyze(&g).unwrap();
        assert_eq!(cp.start(0), Some(0.0));
        assert_eq!(cp.finish(0), Some(3.0));
        assert_eq!(cp.start(1), Some(4.0));
        assert_eq!(cp.finish(1), Some(6.0));
        assert_eq!(cp.finish(2), Some(6.0));
        assert_eq!(cp.makespan(), Some(6.0));
    }

    #[test]
    fn test_longest_predecessor_wins() {
        let mut g = Graph::new();
        g.add_node(Node::new("A_M1").with_duration(2.0));
        g.add_node(Node::new("B_M1").with_duration(7.0));
        g.add_node(Node::new("C_M1").with_duration(1.0));
        g.add_node(Node::new("P"));
        g.add_edge("A_M1", "C_M1", 0.0);
        g.add_edge("B_M1", "C_M1", 0.5);
        g.add_edge("C_M1", "P", 0.0);

        let cp = CriticalPath::analyze(&g).unwrap();
        assert_eq!(cp.start(2), Some(7.5));
        assert_eq!(cp.makespan(), Some(8.5));
        assert_eq!(cp.critical_chain(&g), vec![1, 2, 3]);
    }

    #[test]
    fn test_unreachable_through_dangling_predecessor() {
        let mut g = two_job_graph();
        g.add_node(Node::new("J2_M1").with_duration(1.0));
        g.add_node(Node::new("P2"));
        g.add_edge("J2_M1", "P2", 0.0);
        g.add_edge_allow_dangling("ghost", "J2_M1", 0.0);

        let cp = CriticalPath::analyze(&g).unwrap();
        assert_eq!(cp.start(3), None);
        assert_eq!(cp.finish(4), None);
        assert_eq!(cp.makespan(), None);
        assert_eq!(cp.unreachable(), vec![3, 4]);
        match cp.require_makespan(&g) {
            Err(SchedError::Unbounded { node }) => assert_eq!(node, "P2"),
            other => panic!("expected Unbounded, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_is_error() {
        let mut g = two_job_graph();
        g.add_edge("P1", "J1_M1", 0.0);
        assert!(matches!(
            CriticalPath::analyze(&g),
            Err(SchedError::InfeasibleGraph { .. })
        ));
    }

    #[test]
    fn test_empty_graph() {
        let cp = CriticalPath::analyze(&Graph::new()).unwrap();
        assert_eq!(cp.makespan(), Some(0.0));
        assert!(cp.critical_chain(&Graph::new()).is_empty());
    }

    fn random_dag(durations: &[f64], edges: &[(usize, usize, f64)]) -> Graph {
        let n = durations.len();
        let mut g = Graph::new();
        for (i, &d) in durations.iter().enumerate() {
            g.add_node(Node::new(format!("N{i}_M1")).with_duration(d));
        }
        for &(a, b, c) in edges {
            let (a, b) = (a % n, b % n);
            if a < b {
                g.add_edge(&format!("N{a}_M1"), &format!("N{b}_M1"), c);
            }
        }
        g
    }

    proptest! {
        #[test]
        fn prop_makespan_at_least_longest_duration(
            durations in proptest::collection::vec(0.0f64..50.0, 1..10),
            edges in proptest::collection::vec((0usize..10, 0usize..10, 0.0f64..10.0), 0..20),
        ) {
            let g = random_dag(&durations, &edges);
            let makespan = CriticalPath::analyze(&g).unwrap().makespan().unwrap();
            let longest = durations.iter().copied().fold(0.0, f64::max);
            prop_assert!(makespan + 1e-9 >= longest);
        }

        #[test]
        fn prop_makespan_monotone_in_costs_and_durations(
            durations in proptest::collection::vec(0.0f64..50.0, 2..10),
            edges in proptest::collection::vec((0usize..10, 0usize..10, 0.0f64..10.0), 1..20),
            bump in 0.0f64..20.0,
            which in 0usize..20,
        ) {
            let g = random_dag(&durations, &edges);
            let base = CriticalPath::analyze(&g).unwrap().makespan().unwrap();

            let mut longer = durations.clone();
            let idx = which % longer.len();
            longer[idx] += bump;
            let g2 = random_dag(&longer, &edges);
            let m2 = CriticalPath::analyze(&g2).unwrap().makespan().unwrap();
            prop_assert!(m2 + 1e-9 >= base);

            let mut costlier = edges.clone();
            let e = which % costlier.len();
            costlier[e].2 += bump;
            let g3 = random_dag(&durations, &costlier);
            let m3 = CriticalPath::analyze(&g3).unwrap().makespan().unwrap();
            prop_assert!(m3 + 1e-9 >= base);
        }
    }
}
