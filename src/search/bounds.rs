//! Bound oracle: wraps the clique and coloring heuristics

use super::{ConstraintSet, Partition, SearchNode};
use crate::graph::{color_count, Graph};
use crate::heuristics::Strategies;
use std::sync::Arc;

/// A node's bound pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Clique size
    pub lower: usize,
    /// Colors used by the heuristic coloring
    pub upper: usize,
}

/// Computes bounds and colorings for one graph
///
/// Cloning is cheap; every worker holds its own handle.
#[derive(Debug, Clone)]
pub struct BoundOracle {
    graph: Arc<Graph>,
    strategies: Strategies,
}

impl BoundOracle {
    /// Create an oracle over `graph`
    pub fn new(graph: Arc<Graph>, strategies: Strategies) -> Self {
        Self { graph, strategies }
    }

    /// The instance being solved
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The heuristics in use
    pub fn strategies(&self) -> &Strategies {
        &self.strategies
    }

    /// Clique size and coloring size for the given state
    pub fn bounds(&self, partition: &Partition, constraints: &ConstraintSet) -> Bounds {
        let clique = self.strategies.clique.clique(&self.graph, partition, constraints);
        let coloring = self.coloring(partition, constraints);
        Bounds {
            lower: clique.len(),
            upper: color_count(&coloring),
        }
    }

    /// A coloring consistent with the given state
    pub fn coloring(&self, partition: &Partition, constraints: &ConstraintSet) -> Vec<usize> {
        self.strategies.coloring.color(&self.graph, partition, constraints)
    }

    /// Evaluate bounds and package the state as a node
    pub fn evaluate(
        &self,
        partition: Partition,
        constraints: ConstraintSet,
        depth: u32,
    ) -> SearchNode {
        let Bounds { lower, upper } = self.bounds(&partition, &constraints);
        SearchNode::new(partition, constraints, lower, upper, depth)
    }

    /// Root node from the discrete partition, plus the coloring that sets its
    /// upper bound
    pub fn root(&self) -> (SearchNode, Vec<usize>) {
        let partition = Partition::new(self.graph.len());
        let constraints = ConstraintSet::new();

        let lower = self
            .strategies
            .clique
            .clique(&self.graph, &partition, &constraints)
            .len();
        let coloring = self.coloring(&partition, &constraints);
        let upper = color_count(&coloring);

        (
            SearchNode::new(partition, constraints, lower, upper, 0),
            coloring,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle(graph: Graph) -> BoundOracle {
        BoundOracle::new(Arc::new(graph), Strategies::default())
    }

    #[test]
    fn test_root_bounds() {
        let (root, coloring) = oracle(Graph::cycle(4)).root();
        assert_eq!((root.lower_bound(), root.upper_bound()), (2, 2));
        assert_eq!(color_count(&coloring), 2);

        let (root, _) = oracle(Graph::complete(4)).root();
        assert_eq!((root.lower_bound(), root.upper_bound()), (4, 4));

        let (root, _) = oracle(Graph::cycle(5)).root();
        assert_eq!((root.lower_bound(), root.upper_bound()), (2, 3));
    }

    #[test]
    fn test_evaluate_keeps_state() {
        let o = oracle(Graph::cycle(5));
        let mut p = Partition::new(5);
        p.union(0, 2);
        let node = o.evaluate(p.clone(), ConstraintSet::new(), 1);
        assert_eq!(node.partition(), &p);
        assert_eq!(node.lower_bound(), 3);
        assert_eq!(node.upper_bound(), 3);
    }
}
