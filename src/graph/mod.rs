//! Undirected simple graphs and instance ingestion
//!
//! The solver only ever reads a [`Graph`]; every worker holds the same
//! immutable instance behind an `Arc`.

pub mod dimacs;

pub use dimacs::{parse_col_file, parse_col_str};

use std::collections::BTreeSet;

/// Largest vertex count accepted from an instance file; the adjacency
/// bitset grows with the square of it
pub const MAX_VERTICES: usize = 32_768;

/// An undirected simple graph on vertices `0..n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    /// Sorted neighbour lists
    adjacency: Vec<Vec<usize>>,

    /// Adjacency bitset rows, `words` u64s per vertex
    matrix: Vec<u64>,

    /// Words per bitset row
    words: usize,

    /// Number of undirected edges
    edges: usize,
}

impl Graph {
    /// Create an edgeless graph on `n` vertices
    pub fn new(n: usize) -> Self {
        let words = n.div_ceil(64);
        Self {
            adjacency: vec![Vec::new(); n],
            matrix: vec![0; n * words],
            words,
            edges: 0,
        }
    }

    /// Build a graph from an edge list; duplicates are ignored
    ///
    /// # Panics
    /// Panics if an endpoint is out of range or an edge is a self loop.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut graph = Self::new(n);
        for &(u, v) in edges {
            graph.add_edge(u, v);
        }
        graph
    }

    /// Complete graph K_n
    pub fn complete(n: usize) -> Self {
        let mut graph = Self::new(n);
        for u in 0..n {
            for v in (u + 1)..n {
                graph.add_edge(u, v);
            }
        }
        graph
    }

    /// Cycle C_n
    pub fn cycle(n: usize) -> Self {
        let mut graph = Self::new(n);
        for u in 0..n {
            graph.add_edge(u, (u + 1) % n);
        }
        graph
    }

    /// Add an undirected edge. Returns false if it already existed.
    ///
    /// # Panics
    /// Panics if an endpoint is out of range or `u == v`.
    pub fn add_edge(&mut self, u: usize, v: usize) -> bool {
        assert!(u < self.len() && v < self.len(), "edge ({u},{v}) out of range");
        assert_ne!(u, v, "self loop at vertex {u}");

        if self.is_adjacent(u, v) {
            return false;
        }

        self.matrix[u * self.words + v / 64] |= 1u64 << (v % 64);
        self.matrix[v * self.words + u / 64] |= 1u64 << (u % 64);

        let pos = self.adjacency[u].binary_search(&v).unwrap_or_else(|p| p);
        self.adjacency[u].insert(pos, v);
        let pos = self.adjacency[v].binary_search(&u).unwrap_or_else(|p| p);
        self.adjacency[v].insert(pos, u);

        self.edges += 1;
        true
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// True if the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Neighbours of `v`, sorted ascending
    #[inline]
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.adjacency[v]
    }

    /// Degree of `v`
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    /// O(1) adjacency test
    #[inline]
    pub fn is_adjacent(&self, u: usize, v: usize) -> bool {
        (self.matrix[u * self.words + v / 64] >> (v % 64)) & 1 == 1
    }

    /// Iterate over every edge once as `(u, v)` with `u < v`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, ns)| ns.iter().filter(move |&&v| u < v).map(move |&v| (u, v)))
    }

    /// Check that `coloring` assigns a color to every vertex and that no edge
    /// has both endpoints the same color
    pub fn validate(&self, coloring: &[usize]) -> bool {
        coloring.len() == self.len() && self.edges().all(|(u, v)| coloring[u] != coloring[v])
    }
}

/// Number of distinct colors used by a coloring
pub fn color_count(coloring: &[usize]) -> usize {
    coloring.iter().collect::<BTreeSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_symmetric() {
        let mut g = Graph::new(70);
        assert!(g.add_edge(3, 68));
        assert!(!g.add_edge(68, 3));
        assert!(g.is_adjacent(3, 68));
        assert!(g.is_adjacent(68, 3));
        assert!(!g.is_adjacent(3, 67));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.neighbors(68), &[3]);
    }

    #[test]
    fn test_complete_and_cycle() {
        let k4 = Graph::complete(4);
        assert_eq!(k4.edge_count(), 6);
        assert!(k4.neighbors(0).len() == 3);

        let c5 = Graph::cycle(5);
        assert_eq!(c5.edge_count(), 5);
        assert!(c5.is_adjacent(4, 0));
        assert!(!c5.is_adjacent(0, 2));
    }

    #[test]
    fn test_edges_listed_once() {
        let g = Graph::cycle(4);
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges, vec![(0, 1), (0, 3), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_validate() {
        let g = Graph::cycle(4);
        assert!(g.validate(&[0, 1, 0, 1]));
        assert!(!g.validate(&[0, 0, 1, 1]));
        // Wrong length is never valid
        assert!(!g.validate(&[0, 1, 0]));
    }

    #[test]
    fn test_color_count() {
        assert_eq!(color_count(&[]), 0);
        assert_eq!(color_count(&[2, 2, 7, 0, 7]), 3);
    }
}
