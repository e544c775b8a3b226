//! Graph-derived state passed to dispatching rules.

use crate::analysis::{successors, topological_order};
use crate::error::Result;
use crate::models::Graph;

/// Per-node quantities needed by context-aware rules.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    /// Longest remaining path from each node's start to the end of the
    /// graph, including the node's own duration and edge costs.
    pub tail_work: Vec<f64>,
}

impl DispatchContext {
    /// Computes tail work by a reverse topological sweep.
    ///
    /// # Errors
    /// [`crate::SchedError::InfeasibleGraph`] if the graph has a cycle.
    pub fn from_graph(graph: &Graph) -> Result<Self> {
        let order = topological_order(graph)?;
        let adj = successors(graph);
        let mut tail_work = vec![0.0; graph.node_count()];

        for &u in order.iter().rev() {
            let downstream = adj[u]
                .iter()
                .map(|&(v, cost)| cost + tail_work[v])
                .fold(0.0, f64::max);
            tail_work[u] = graph.nodes()[u].duration() + downstream;
        }

        Ok(Self { tail_work })
    }

    /// Tail work of a node (0 if out of range).
    pub fn tail(&self, node: usize) -> f64 {
        self.tail_work.get(node).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    #[test]
    fn test_tail_work() {
        let mut g = Graph::new();
        g.add_node(Node::new("A_M1").with_duration(2.0));
        g.add_node(Node::new("A_M2").with_duration(3.0));
        g.add_node(Node::new("B_M2").with_duration(1.0));
        g.add_node(Node::new("P"));
        g.add_edge("A_M1", "A_M2", 1.0);
        g.add_edge("A_M1", "B_M2", 0.0);
        g.add_edge("A_M2", "P", 0.0);

        let ctx = DispatchContext::from_graph(&g).unwrap();
        assert_eq!(ctx.tail(3), 0.0);
        assert_eq!(ctx.tail(1), 3.0);
        assert_eq!(ctx.tail(2), 1.0);
        assert_eq!(ctx.tail(0), 6.0);
        assert_eq!(ctx.tail(99), 0.0);
    }
}
