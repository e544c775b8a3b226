//! Topological ordering (Kahn's algorithm).
//!
//! # Algorithm
//! 1. Count the in-degree of every node (edges with an unknown endpoint are
//!    ignored).
//! 2. Seed the ready set with all zero in-degree nodes.
//! 3. Repeatedly remove a ready node, append it to the order and decrement
//!    the in-degree of its successors, readying those that reach zero.
//! 4. If fewer than `n` nodes were ordered, the graph contains a cycle.
//!
//! # Complexity
//! O(V + E) for the FIFO variant; O(V² + E) for the prioritized variant.
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks", CACM 5(11)

use std::collections::VecDeque;

use tracing::debug;

use crate::error::{Result, SchedError};
use crate::models::Graph;

/// Successor lists `(target, cost)` per node, in edge insertion order.
pub(crate) fn successors(graph: &Graph) -> Vec<Vec<(usize, f64)>> {
    let mut adj = vec![Vec::new(); graph.node_count()];
    for edge in graph.edges() {
        if let Some((u, v)) = graph.endpoints(edge) {
            adj[u].push((v, edge.cost));
        }
    }
    adj
}

fn in_degrees(graph: &Graph, adj: &[Vec<(usize, f64)>]) -> Vec<usize> {
    let mut indegree = vec![0usize; graph.node_count()];
    for targets in adj {
        for &(v, _) in targets {
            indegree[v] += 1;
        }
    }
    indegree
}

fn check_complete(order: &[usize], total: usize) -> Result<()> {
    if order.len() < total {
        debug!(ordered = order.len(), total, "topological order incomplete");
        return Err(SchedError::InfeasibleGraph {
            ordered: order.len(),
            total,
        });
    }
    Ok(())
}

/// Computes a topological order of node indices.
///
/// Zero in-degree nodes are processed FIFO, seeded in node insertion order.
///
/// # Errors
/// [`SchedError::InfeasibleGraph`] if the edges induce a cycle.
pub fn topological_order(graph: &Graph) -> Result<Vec<usize>> {
    let adj = successors(graph);
    let mut indegree = in_degrees(graph, &adj);

    let mut queue: VecDeque<usize> = (0..graph.node_count())
        .filter(|&i| indegree[i] == 0)
        .collect();
    let mut order = Vec::with_capacity(graph.node_count());

    while let Some(u) = queue.pop_front() {
        order.push(u);
        for &(v, _) in &adj[u] {
            indegree[v] -= 1;
            if indegree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    check_complete(&order, graph.node_count())?;
    Ok(order)
}

/// Computes a topological order choosing, at every step, the ready node with
/// the smallest `priority`. Ties go to the lower node index.
///
/// # Errors
/// [`SchedError::InfeasibleGraph`] if the edges induce a cycle.
pub fn topological_order_by<F>(graph: &Graph, mut priority: F) -> Result<Vec<usize>>
where
    F: FnMut(usize) -> f64,
{
    let adj = successors(graph);
    let mut indegree = in_degrees(graph, &adj);

    let mut ready: Vec<usize> = (0..graph.node_count())
        .filter(|&i| indegree[i] == 0)
        .collect();
    let mut order = Vec::with_capacity(graph.node_count());

    while !ready.is_empty() {
        let mut best = 0;
        let mut best_score = priority(ready[0]);
        for (pos, &candidate) in ready.iter().enumerate().skip(1) {
            let score = priority(candidate);
            if score < best_score || (score == best_score && candidate < ready[best]) {
                best = pos;
                best_score = score;
            }
        }
        let u = ready.swap_remove(best);
        order.push(u);
        for &(v, _) in &adj[u] {
            indegree[v] -= 1;
            if indegree[v] == 0 {
                ready.push(v);
            }
        }
    }

    check_complete(&order, graph.node_count())?;
    Ok(order)
}
