//! DSatur coloring on the quotient view
//!
//! Repeatedly colors the uncolored class with the most distinct neighbour
//! colors (ties: higher degree, then lower index) with the smallest color it
//! can take. Exact on bipartite graphs, which covers even cycles.

use super::{ColoringStrategy, QuotientGraph};
use crate::graph::Graph;
use crate::search::{ConstraintSet, Partition};

/// Saturation-degree greedy coloring
#[derive(Debug, Clone, Copy, Default)]
pub struct DSatur;

impl DSatur {
    /// Color the classes of a quotient view; returns one color per class
    pub fn color_classes(view: &QuotientGraph) -> Vec<usize> {
        let k = view.len();
        let mut colors: Vec<Option<usize>> = vec![None; k];
        // seen[i][c]: class i has a neighbour colored c
        let mut seen: Vec<Vec<bool>> = vec![Vec::new(); k];
        let mut saturation = vec![0usize; k];

        for _ in 0..k {
            let Some(next) = (0..k)
                .filter(|&i| colors[i].is_none())
                .max_by_key(|&i| (saturation[i], view.degree(i), std::cmp::Reverse(i)))
            else {
                break;
            };

            let color = (0..)
                .find(|&c| !seen[next].get(c).copied().unwrap_or(false))
                .unwrap_or(0);
            colors[next] = Some(color);

            for &nb in view.neighbors(next) {
                let row = &mut seen[nb];
                if row.len() <= color {
                    row.resize(color + 1, false);
                }
                if !row[color] {
                    row[color] = true;
                    saturation[nb] += 1;
                }
            }
        }

        colors.into_iter().map(|c| c.unwrap_or(0)).collect()
    }
}

impl ColoringStrategy for DSatur {
    fn name(&self) -> &'static str {
        "dsatur"
    }

    fn color(
        &self,
        graph: &Graph,
        partition: &Partition,
        constraints: &ConstraintSet,
    ) -> Vec<usize> {
        let view = QuotientGraph::build(graph, partition, constraints);
        view.lift(&Self::color_classes(&view))
    }
}
