//! Node permutations scored against the graph's precedence edges.
//!
//! The metaheuristics search over orderings of *all* nodes. A permutation
//! is rewarded for every adjacent pair `(a, b)` that follows a real edge
//! `a → b` (by that edge's cost) and penalized heavily for every adjacent
//! pair that runs against one.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

use crate::models::Graph;

/// Penalty subtracted for each adjacent pair `(a, b)` with an edge `b → a`.
pub const REVERSE_EDGE_PENALTY: f64 = 1e6;

/// An objective over permutations of `0..len()`. Higher is better.
pub trait PermutationObjective: Send + Sync {
    /// Number of elements in a permutation.
    fn len(&self) -> usize;

    /// Whether permutations are empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fitness of a permutation (maximized).
    fn fitness(&self, permutation: &[usize]) -> f64;
}

/// Adjacent-pair precedence fitness for a graph.
#[derive(Debug, Clone)]
pub struct PrecedenceFitness {
    n: usize,
    /// Largest cost among parallel edges `u → v`.
    forward: HashMap<(usize, usize), f64>,
    predecessors: Vec<Vec<usize>>,
}

impl PrecedenceFitness {
    /// Indexes the graph's edges. Edges with an unknown endpoint are ignored.
    pub fn new(graph: &Graph) -> Self {
        let n = graph.node_count();
        let mut forward = HashMap::new();
        let mut predecessors = vec![Vec::new(); n];
        for edge in graph.edges() {
            let Some((u, v)) = graph.endpoints(edge) else {
                continue;
            };
            forward
                .entry((u, v))
                .and_modify(|c: &mut f64| *c = c.max(edge.cost))
                .or_insert(edge.cost);
            if !predecessors[v].contains(&u) {
                predecessors[v].push(u);
            }
        }
        Self {
            n,
            forward,
            predecessors,
        }
    }

    /// Cost of the edge `u → v`, if any.
    pub fn edge_cost(&self, u: usize, v: usize) -> Option<f64> {
        self.forward.get(&(u, v)).copied()
    }

    /// Longest prefix of `permutation` in which every node's predecessors
    /// appear earlier. Stops at the first node that violates this, so nodes
    /// after it are dropped even if they would be valid.
    pub fn precedence_prefix(&self, permutation: &[usize]) -> Vec<usize> {
        let mut accepted = vec![false; self.n];
        let mut prefix = Vec::with_capacity(permutation.len());
        for &node in permutation {
            if !self.predecessors[node].iter().all(|&p| accepted[p]) {
                break;
            }
            accepted[node] = true;
            prefix.push(node);
        }
        prefix
    }
}

impl PermutationObjective for PrecedenceFitness {
    fn len(&self) -> usize {
        self.n
    }

    fn fitness(&self, permutation: &[usize]) -> f64 {
        permutation
            .windows(2)
            .map(|pair| {
                let (a, b) = (pair[0], pair[1]);
                let mut score = self.edge_cost(a, b).unwrap_or(0.0);
                if self.forward.contains_key(&(b, a)) {
                    score -= REVERSE_EDGE_PENALTY;
                }
                score
            })
            .sum()
    }
}

/// Uniformly random permutation of `0..n`.
pub fn random_permutation<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(rng);
    perm
}

/// Node ids for a permutation of node indices.
pub fn node_ids(graph: &Graph, permutation: &[usize]) -> Vec<String> {
    permutation
        .iter()
        .map(|&i| graph.nodes()[i].id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn chain() -> Graph {
        let mut g = Graph::new();
        for id in ["A", "B", "C"] {
            g.add_node(Node::new(id).with_duration(1.0));
        }
        g.add_edge("A", "B", 2.0);
        g.add_edge("B", "C", 3.0);
        g
    }

    #[test]
    fn test_fitness_rewards_forward_pairs() {
        let f = PrecedenceFitness::new(&chain());
        assert_eq!(f.fitness(&[0, 1, 2]), 5.0);
        assert_eq!(f.fitness(&[0, 2, 1]), -REVERSE_EDGE_PENALTY);
        assert_eq!(f.fitness(&[2, 1, 0]), -2.0 * REVERSE_EDGE_PENALTY);
        assert_eq!(f.fitness(&[1]), 0.0);
    }

    #[test]
    fn test_parallel_edges_use_largest_cost() {
        let mut g = chain();
        g.add_edge("A", "B", 7.0);
        let f = PrecedenceFitness::new(&g);
        assert_eq!(f.edge_cost(0, 1), Some(7.0));
    }

    #[test]
    fn test_precedence_prefix_stops_at_first_violation() {
        let f = PrecedenceFitness::new(&chain());
        assert_eq!(f.precedence_prefix(&[0, 1, 2]), vec![0, 1, 2]);
        // C needs B; A would be fine but comes after the violation.
        assert_eq!(f.precedence_prefix(&[2, 0, 1]), Vec::<usize>::new());
        assert_eq!(f.precedence_prefix(&[0, 2, 1]), vec![0]);
    }

    #[test]
    fn test_random_permutation_is_permutation() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut perm = random_permutation(10, &mut rng);
        perm.sort_unstable();
        assert_eq!(perm, (0..10).collect::<Vec<_>>());
    }
}
