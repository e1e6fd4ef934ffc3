//! Bound heuristics and the branching pair selector
//!
//! The search engine only depends on the three traits below. Every
//! implementation must honour the node's forced-same classes and its
//! forced-different pairs; the bundled ones do so by working on the
//! [`QuotientGraph`] view.

pub mod branching;
pub mod clique;
pub mod dsatur;
pub mod quotient;

pub use branching::CommonNeighborBranching;
pub use clique::GreedyClique;
pub use dsatur::DSatur;
pub use quotient::QuotientGraph;

use crate::graph::Graph;
use crate::search::{ConstraintSet, Partition};
use std::fmt;
use std::sync::Arc;

/// Produces a proper coloring consistent with the node's constraints
pub trait ColoringStrategy: Send + Sync {
    /// Short identifier used in logs and result records
    fn name(&self) -> &'static str;

    /// Color id per vertex; adjacent vertices differ, vertices of one class
    /// share a color, forced-different classes differ
    fn color(
        &self,
        graph: &Graph,
        partition: &Partition,
        constraints: &ConstraintSet,
    ) -> Vec<usize>;
}

/// Finds a clique consistent with the node's constraints
pub trait CliqueStrategy: Send + Sync {
    /// Short identifier used in logs and result records
    fn name(&self) -> &'static str;

    /// Vertices whose classes are pairwise adjacent in the quotient view
    fn clique(
        &self,
        graph: &Graph,
        partition: &Partition,
        constraints: &ConstraintSet,
    ) -> Vec<usize>;
}

/// Chooses the vertex pair to branch on
pub trait PairSelector: Send + Sync {
    /// Short identifier used in logs and result records
    fn name(&self) -> &'static str;

    /// A pair in different classes that are not forced apart, or `None` if
    /// the node is a leaf
    fn next_pair(
        &self,
        graph: &Graph,
        partition: &Partition,
        constraints: &ConstraintSet,
    ) -> Option<(usize, usize)>;
}

/// The three collaborators the search needs, cheap to clone across threads
#[derive(Clone)]
pub struct Strategies {
    pub coloring: Arc<dyn ColoringStrategy>,
    pub clique: Arc<dyn CliqueStrategy>,
    pub branching: Arc<dyn PairSelector>,
}

impl Strategies {
    /// Bundle custom strategies
    pub fn new(
        coloring: Arc<dyn ColoringStrategy>,
        clique: Arc<dyn CliqueStrategy>,
        branching: Arc<dyn PairSelector>,
    ) -> Self {
        Self {
            coloring,
            clique,
            branching,
        }
    }

    /// Identifier combining the strategy names, e.g. `dsatur+greedy-clique`
    pub fn label(&self) -> String {
        format!("{}+{}", self.coloring.name(), self.clique.name())
    }
}

impl Default for Strategies {
    fn default() -> Self {
        Self::new(
            Arc::new(DSatur),
            Arc::new(GreedyClique::default()),
            Arc::new(CommonNeighborBranching),
        )
    }
}

impl fmt::Debug for Strategies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategies")
            .field("coloring", &self.coloring.name())
            .field("clique", &self.clique.name())
            .field("branching", &self.branching.name())
            .finish()
    }
}
