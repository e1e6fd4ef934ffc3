//! Search-tree nodes

use super::{ConstraintSet, Partition};

/// One node of the branch-and-bound tree
///
/// Immutable once built. `lower_bound <= upper_bound` is expected but not
/// guaranteed: heuristics may be imperfect and callers must tolerate either
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode {
    partition: Partition,
    constraints: ConstraintSet,
    lower_bound: usize,
    upper_bound: usize,
    depth: u32,
}

impl SearchNode {
    /// Build a node from its state and precomputed bounds
    pub fn new(
        partition: Partition,
        constraints: ConstraintSet,
        lower_bound: usize,
        upper_bound: usize,
        depth: u32,
    ) -> Self {
        Self {
            partition,
            constraints,
            lower_bound,
            upper_bound,
            depth,
        }
    }

    /// Forced-same classes
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Forced-different class pairs
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Clique size consistent with this node
    pub fn lower_bound(&self) -> usize {
        self.lower_bound
    }

    /// Colors used by a coloring consistent with this node
    pub fn upper_bound(&self) -> usize {
        self.upper_bound
    }

    /// Distance from the root (0 = root)
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerates_inverted_bounds() {
        let node = SearchNode::new(Partition::new(3), ConstraintSet::new(), 3, 2, 1);
        assert_eq!(node.lower_bound(), 3);
        assert_eq!(node.upper_bound(), 2);
        assert_eq!(node.depth(), 1);
    }
}
