//! Greedy clique search on the quotient view

use super::{CliqueStrategy, QuotientGraph};
use crate::graph::Graph;
use crate::search::{ConstraintSet, Partition};

/// Default number of seed classes tried per call
pub const DEFAULT_SEEDS: usize = 32;

/// Grows a clique from each of the highest-degree classes, always adding the
/// candidate with the most neighbours among the remaining candidates, and
/// keeps the largest
#[derive(Debug, Clone, Copy)]
pub struct GreedyClique {
    /// How many seed classes to try (highest degree first)
    pub seeds: usize,
}

impl Default for GreedyClique {
    fn default() -> Self {
        Self {
            seeds: DEFAULT_SEEDS,
        }
    }
}

impl GreedyClique {
    /// Largest clique found, as class indices
    pub fn clique_classes(&self, view: &QuotientGraph) -> Vec<usize> {
        let mut order: Vec<usize> = (0..view.len()).collect();
        order.sort_by_key(|&i| (std::cmp::Reverse(view.degree(i)), i));

        let mut best: Vec<usize> = Vec::new();
        for &seed in order.iter().take(self.seeds.max(1)) {
            // A seed of degree d cannot grow past d + 1
            if view.degree(seed) < best.len() {
                continue;
            }
            let clique = grow(view, seed);
            if clique.len() > best.len() {
                best = clique;
            }
        }
        best
    }
}

fn grow(view: &QuotientGraph, seed: usize) -> Vec<usize> {
    let mut clique = vec![seed];
    let mut candidates: Vec<usize> = view.neighbors(seed).to_vec();

    while !candidates.is_empty() {
        let next = candidates
            .iter()
            .copied()
            .max_by_key(|&c| {
                let inner = candidates
                    .iter()
                    .filter(|&&o| view.is_adjacent(c, o))
                    .count();
                (inner, std::cmp::Reverse(c))
            })
            .unwrap_or(candidates[0]);

        clique.push(next);
        candidates.retain(|&o| o != next && view.is_adjacent(next, o));
    }
    clique
}

impl CliqueStrategy for GreedyClique {
    fn name(&self) -> &'static str {
        "greedy-clique"
    }

    fn clique(
        &self,
        graph: &Graph,
        partition: &Partition,
        constraints: &ConstraintSet,
    ) -> Vec<usize> {
        let view = QuotientGraph::build(graph, partition, constraints);
        self.clique_classes(&view)
            .into_iter()
            .map(|i| view.rep(i))
            .collect()
    }
}
