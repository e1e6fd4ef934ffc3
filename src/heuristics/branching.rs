//! Branching pair selection

use super::{PairSelector, QuotientGraph};
use crate::graph::Graph;
use crate::search::{ConstraintSet, Partition};

/// Picks the highest-degree class that still has a non-adjacent partner, then
/// the partner sharing the most neighbours with it
///
/// Merging classes with many common neighbours tends to keep the clique
/// bound tight on the same-color branch, while the different-color branch
/// adds an edge next to dense neighbourhoods.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonNeighborBranching;

impl CommonNeighborBranching {
    /// Branching pair as class indices of the view
    pub fn select_classes(view: &QuotientGraph) -> Option<(usize, usize)> {
        let k = view.len();
        let u = (0..k)
            .filter(|&i| view.degree(i) + 1 < k)
            .max_by_key(|&i| (view.degree(i), std::cmp::Reverse(i)))?;

        let v = (0..k)
            .filter(|&j| j != u && !view.is_adjacent(u, j))
            .max_by_key(|&j| {
                let common = view
                    .neighbors(u)
                    .iter()
                    .filter(|&&w| view.is_adjacent(j, w))
                    .count();
                (common, view.degree(j), std::cmp::Reverse(j))
            })?;

        Some((u, v))
    }
}

impl PairSelector for CommonNeighborBranching {
    fn name(&self) -> &'static str {
        "common-neighbor"
    }

    fn next_pair(
        &self,
        graph: &Graph,
        partition: &Partition,
        constraints: &ConstraintSet,
    ) -> Option<(usize, usize)> {
        let view = QuotientGraph::build(graph, partition, constraints);
        Self::select_classes(&view).map(|(u, v)| (view.rep(u), view.rep(v)))
    }
}
