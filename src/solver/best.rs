//! Global best-bound register
//!
//! Holds the incumbent upper bound and the coloring that witnesses it. All
//! reads and updates go through compound operations that take the lock once,
//! so a bound and its coloring are always observed together. The bound only
//! ever decreases.

use super::cancel::CancelFlags;
use crate::search::{BoundOracle, SearchNode};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
struct Incumbent {
    upper_bound: usize,
    coloring: Vec<usize>,
}

/// Result of screening a batch against the incumbent
#[derive(Debug)]
pub enum Screening {
    /// Nodes worth expanding (possibly none)
    Forward {
        survivors: Vec<SearchNode>,
        pruned: usize,
        /// New incumbent bound if this batch improved it
        improved: Option<usize>,
    },

    /// A node's lower bound met the incumbent; `optimal_found` is now set
    Optimal { upper_bound: usize },

    /// A cancellation signal was already set; nothing was inspected
    Cancelled,
}

/// Incumbent upper bound and coloring
#[derive(Debug)]
pub struct BestBound {
    state: Mutex<Incumbent>,
    improvements: AtomicU64,
}

impl BestBound {
    /// Start from an initial bound and its coloring
    pub fn new(upper_bound: usize, coloring: Vec<usize>) -> Self {
        Self {
            state: Mutex::new(Incumbent {
                upper_bound,
                coloring,
            }),
            improvements: AtomicU64::new(0),
        }
    }

    /// Current incumbent bound
    pub fn upper_bound(&self) -> usize {
        self.state.lock().upper_bound
    }

    /// Bound and coloring, read together
    pub fn snapshot(&self) -> (usize, Vec<usize>) {
        let state = self.state.lock();
        (state.upper_bound, state.coloring.clone())
    }

    /// Number of strict improvements installed
    pub fn improvements(&self) -> u64 {
        self.improvements.load(Ordering::Relaxed)
    }

    /// Install `coloring` if `upper_bound` is strictly better
    pub fn try_improve(&self, upper_bound: usize, coloring: Vec<usize>) -> bool {
        let mut state = self.state.lock();
        self.install(&mut state, upper_bound, || coloring)
    }

    fn install(
        &self,
        state: &mut Incumbent,
        upper_bound: usize,
        coloring: impl FnOnce() -> Vec<usize>,
    ) -> bool {
        if upper_bound >= state.upper_bound {
            return false;
        }
        state.upper_bound = upper_bound;
        state.coloring = coloring();
        self.improvements.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Screen a batch under one lock acquisition.
    ///
    /// For each node in order: a node whose lower bound reaches the incumbent
    /// is pruned; a node whose upper bound beats the incumbent installs a
    /// freshly computed coloring; a node whose lower bound equals the
    /// (possibly just lowered) incumbent proves optimality, sets
    /// `optimal_found` and stops the scan.
    pub fn screen(
        &self,
        nodes: Vec<SearchNode>,
        oracle: &BoundOracle,
        cancel: &CancelFlags,
    ) -> Screening {
        let mut state = self.state.lock();
        if cancel.is_cancelled() {
            return Screening::Cancelled;
        }

        let mut survivors = Vec::with_capacity(nodes.len());
        let mut pruned = 0;
        let mut improved = None;

        for node in nodes {
            let prune = node.lower_bound() >= state.upper_bound;

            if self.install(&mut state, node.upper_bound(), || {
                oracle.coloring(node.partition(), node.constraints())
            }) {
                improved = Some(state.upper_bound);
            }

            if node.lower_bound() == state.upper_bound {
                cancel.optimal_found.fire();
                return Screening::Optimal {
                    upper_bound: state.upper_bound,
                };
            }

            if prune {
                pruned += 1;
            } else {
                survivors.push(node);
            }
        }

        Screening::Forward {
            survivors,
            pruned,
            improved,
        }
    }
}
