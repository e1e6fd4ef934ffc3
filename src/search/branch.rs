//! Branching operator
//!
//! Splits a node on a vertex pair `(u, v)` chosen by the pair selector:
//! - same color: merge the two classes (only if no neighbour of one endpoint
//!   already sits in the other endpoint's class)
//! - different color: forbid the two classes from ever merging
//!
//! Every coloring consistent with the parent either gives `u` and `v` the
//! same color or not, so the two children cover the parent exactly.

use super::{BoundOracle, ConstraintSet, Partition, SearchNode};
use tracing::trace;

/// Expands nodes into children
#[derive(Debug, Clone)]
pub struct Brancher {
    oracle: BoundOracle,
}

impl Brancher {
    /// Create a brancher that evaluates children with `oracle`
    pub fn new(oracle: BoundOracle) -> Self {
        Self { oracle }
    }

    /// The oracle used for child bounds
    pub fn oracle(&self) -> &BoundOracle {
        &self.oracle
    }

    /// Children of `node`: empty for a leaf, otherwise the different-color
    /// child, preceded by the same-color child when merging is feasible
    pub fn branch(&self, node: &SearchNode) -> Vec<SearchNode> {
        let graph = self.oracle.graph();
        let strategies = self.oracle.strategies();

        let Some((u, v)) =
            strategies
                .branching
                .next_pair(graph, node.partition(), node.constraints())
        else {
            trace!(depth = node.depth(), ub = node.upper_bound(), "Leaf node");
            return Vec::new();
        };

        let depth = node.depth() + 1;
        let mut children = Vec::with_capacity(2);

        if self.can_merge(node.partition(), node.constraints(), u, v) {
            let mut partition = node.partition().clone();
            partition.union(u, v);
            children.push(self.oracle.evaluate(partition, node.constraints().clone(), depth));
        }

        let partition = node.partition().clone();
        let mut constraints = node.constraints().clone();
        constraints.insert(partition.find(u), partition.find(v));
        children.push(self.oracle.evaluate(partition, constraints, depth));

        children
    }

    /// True if `u` and `v` can share a color: no neighbour of either sits in
    /// the other's class, and their classes are not forced apart
    pub fn can_merge(
        &self,
        partition: &Partition,
        constraints: &ConstraintSet,
        u: usize,
        v: usize,
    ) -> bool {
        let graph = self.oracle.graph();
        let (cu, cv) = (partition.find(u), partition.find(v));

        let clash = graph.neighbors(u).iter().any(|&n| partition.find(n) == cv)
            || graph.neighbors(v).iter().any(|&n| partition.find(n) == cu);

        !clash && !constraints.forbids(partition, u, v)
    }
}
