//! Quotient view of a graph under a partition and forced-different pairs
//!
//! Each class becomes one vertex. Two classes are adjacent when an original
//! edge joins them or a forced-different pair maps onto them. Any proper
//! coloring of the view lifts to a coloring of the graph that honours both
//! the forced-same and the forced-different constraints.

use crate::graph::Graph;
use crate::search::{ConstraintSet, Partition};

/// Classes of a partition as the vertices of a simple graph
#[derive(Debug, Clone)]
pub struct QuotientGraph {
    /// Representative vertex of each class
    reps: Vec<usize>,

    /// Class index of each original vertex
    class_of: Vec<usize>,

    /// Row-major k×k adjacency
    matrix: Vec<bool>,

    /// Neighbour lists per class
    neighbors: Vec<Vec<usize>>,
}

impl QuotientGraph {
    /// Build the view for one search node
    pub fn build(graph: &Graph, partition: &Partition, constraints: &ConstraintSet) -> Self {
        let reps: Vec<usize> = partition.representatives().collect();
        let k = reps.len();

        let mut index_of_rep = vec![usize::MAX; graph.len()];
        for (i, &r) in reps.iter().enumerate() {
            index_of_rep[r] = i;
        }
        let class_of: Vec<usize> = (0..graph.len())
            .map(|v| index_of_rep[partition.find(v)])
            .collect();

        let mut view = Self {
            reps,
            class_of,
            matrix: vec![false; k * k],
            neighbors: vec![Vec::new(); k],
        };

        for (u, v) in graph.edges() {
            let (i, j) = (view.class_of[u], view.class_of[v]);
            view.connect(i, j);
        }
        for (a, b) in constraints.resolved(partition) {
            view.connect(index_of_rep[a], index_of_rep[b]);
        }
        view
    }

    fn connect(&mut self, i: usize, j: usize) {
        // i == j only if a class already holds adjacent vertices; branching
        // never produces that, and a loop has no meaning in the view
        if i == j || self.is_adjacent(i, j) {
            return;
        }
        let k = self.len();
        self.matrix[i * k + j] = true;
        self.matrix[j * k + i] = true;
        self.neighbors[i].push(j);
        self.neighbors[j].push(i);
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.reps.len()
    }

    /// True if there are no classes
    pub fn is_empty(&self) -> bool {
        self.reps.is_empty()
    }

    /// Representative vertex of class `i`
    #[inline]
    pub fn rep(&self, i: usize) -> usize {
        self.reps[i]
    }

    /// Class index of original vertex `v`
    #[inline]
    pub fn class_of(&self, v: usize) -> usize {
        self.class_of[v]
    }

    /// True if classes `i` and `j` may not share a color
    #[inline]
    pub fn is_adjacent(&self, i: usize, j: usize) -> bool {
        self.matrix[i * self.len() + j]
    }

    /// Adjacent classes of `i`
    #[inline]
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }

    /// Number of adjacent classes
    #[inline]
    pub fn degree(&self, i: usize) -> usize {
        self.neighbors[i].len()
    }

    /// Lift a per-class coloring to a per-vertex coloring
    pub fn lift(&self, class_colors: &[usize]) -> Vec<usize> {
        self.class_of.iter().map(|&c| class_colors[c]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discrete_partition_mirrors_graph() {
        let g = Graph::cycle(5);
        let q = QuotientGraph::build(&g, &Partition::new(5), &ConstraintSet::new());
        assert_eq!(q.len(), 5);
        for u in 0..5 {
            for v in 0..5 {
                assert_eq!(q.is_adjacent(u, v), g.is_adjacent(u, v));
            }
        }
    }

    #[test]
    fn test_merge_and_constraint_edges() {
        let g = Graph::cycle(5);
        let mut p = Partition::new(5);
        p.union(0, 2);
        let mut c = ConstraintSet::new();
        c.insert(1, 3);

        let q = QuotientGraph::build(&g, &p, &c);
        assert_eq!(q.len(), 4);
        assert_eq!(q.class_of(0), q.class_of(2));

        let merged = q.class_of(0);
        // 0-1, 2-3 and 0-4 all land on the merged class
        assert_eq!(q.degree(merged), 3);
        // The forced-different pair becomes an edge
        assert!(q.is_adjacent(q.class_of(1), q.class_of(3)));
    }

    #[test]
    fn test_lift() {
        let g = Graph::new(3);
        let mut p = Partition::new(3);
        p.union(0, 2);
        let q = QuotientGraph::build(&g, &p, &ConstraintSet::new());
        let colors: Vec<usize> = (0..q.len()).collect();
        let lifted = q.lift(&colors);
        assert_eq!(lifted[0], lifted[2]);
        assert_ne!(lifted[0], lifted[1]);
    }
}
