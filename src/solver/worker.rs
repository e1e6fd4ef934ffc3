//! Worker thread: the node expansion loop
//!
//! Each worker:
//! - Owns a brancher (and through it a handle on the graph and heuristics)
//! - Waits for a command from its paired dispatch thread
//! - Expands every node of a batch and replies with all children at once
//! - Acknowledges a termination command and exits
//!
//! A worker always finishes a batch it has started, even if cancellation
//! fires meanwhile.

use super::protocol::{WorkerCommand, WorkerEndpoint, WorkerReply};
use crate::error::{ProtocolError, Result, WorkerError};
use crate::search::Brancher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Batches expanded
    pub batches: AtomicU64,

    /// Nodes expanded
    pub expanded: AtomicU64,

    /// Children produced
    pub children: AtomicU64,

    /// Expanded nodes that turned out to be leaves
    pub leaves: AtomicU64,
}

impl WorkerStats {
    fn record_batch(&self, nodes: u64) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.expanded.fetch_add(nodes, Ordering::Relaxed);
    }

    fn record_children(&self, count: u64) {
        self.children.fetch_add(count, Ordering::Relaxed);
    }

    fn record_leaf(&self) {
        self.leaves.fetch_add(1, Ordering::Relaxed);
    }
}

/// A worker thread that expands search nodes
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<std::result::Result<(), ProtocolError>>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(id: usize, brancher: Brancher, endpoint: WorkerEndpoint) -> Result<Self> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("worker-{}", id))
            .spawn(move || worker_loop(id, brancher, endpoint, stats_clone))
            .map_err(|e| WorkerError::SpawnFailed {
                role: "worker",
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// Wait for the worker to finish
    pub fn join(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(result) => result.map_err(Into::into),
                Err(_) => Err(WorkerError::Panicked {
                    id: self.id,
                    message: "Worker thread panicked".into(),
                }
                .into()),
            }
        } else {
            Ok(())
        }
    }
}

/// Main worker loop
fn worker_loop(
    id: usize,
    brancher: Brancher,
    endpoint: WorkerEndpoint,
    stats: Arc<WorkerStats>,
) -> std::result::Result<(), ProtocolError> {
    debug!(worker = id, "Worker starting");

    loop {
        match endpoint.recv()? {
            WorkerCommand::Terminate => {
                endpoint.reply(WorkerReply::Terminated)?;
                break;
            }
            WorkerCommand::Expand(batch) => {
                stats.record_batch(batch.len() as u64);

                let mut children = Vec::with_capacity(batch.len() * 2);
                for node in &batch {
                    let produced = brancher.branch(node);
                    if produced.is_empty() {
                        stats.record_leaf();
                    }
                    children.extend(produced);
                }

                trace!(
                    worker = id,
                    nodes = batch.len(),
                    children = children.len(),
                    "Batch expanded"
                );
                stats.record_children(children.len() as u64);
                endpoint.reply(WorkerReply::Children(children))?;
            }
        }
    }

    debug!(
        worker = id,
        batches = stats.batches.load(Ordering::Relaxed),
        expanded = stats.expanded.load(Ordering::Relaxed),
        "Worker terminated"
    );

    Ok(())
}

/// Aggregate statistics from multiple workers: (batches, expanded, children, leaves)
pub fn aggregate_stats(workers: &[Worker]) -> (u64, u64, u64, u64) {
    let mut batches = 0u64;
    let mut expanded = 0u64;
    let mut children = 0u64;
    let mut leaves = 0u64;

    for worker in workers {
        batches += worker.stats.batches.load(Ordering::Relaxed);
        expanded += worker.stats.expanded.load(Ordering::Relaxed);
        children += worker.stats.children.load(Ordering::Relaxed);
        leaves += worker.stats.leaves.load(Ordering::Relaxed);
    }

    (batches, expanded, children, leaves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;
    use crate::graph::Graph;
    use crate::heuristics::Strategies;
    use crate::search::BoundOracle;
    use crate::solver::protocol::link;

    fn brancher(graph: Graph) -> Brancher {
        Brancher::new(BoundOracle::new(Arc::new(graph), Strategies::default()))
    }

    #[test]
    fn test_worker_stats() {
        let stats = WorkerStats::default();

        stats.record_batch(3);
        stats.record_children(4);
        stats.record_leaf();

        assert_eq!(stats.batches.load(Ordering::Relaxed), 1);
        assert_eq!(stats.expanded.load(Ordering::Relaxed), 3);
        assert_eq!(stats.children.load(Ordering::Relaxed), 4);
        assert_eq!(stats.leaves.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_expands_batch_then_terminates() {
        let b = brancher(Graph::cycle(5));
        let (root, _) = b.oracle().root();
        let expected = b.branch(&root).len() * 2;

        let (link, endpoint) = link(0);
        let mut worker = Worker::spawn(0, b, endpoint).unwrap();

        match link.expand(vec![root.clone(), root]).unwrap() {
            WorkerReply::Children(children) => assert_eq!(children.len(), expected),
            other => panic!("unexpected {other:?}"),
        }

        link.terminate().unwrap();
        assert_eq!(worker.stats().batches.load(Ordering::Relaxed), 1);
        assert_eq!(worker.stats().expanded.load(Ordering::Relaxed), 2);
        worker.join().unwrap();
    }

    #[test]
    fn test_leaf_batch_returns_no_children() {
        let b = brancher(Graph::complete(3));
        let (root, _) = b.oracle().root();

        let (link, endpoint) = link(1);
        let mut worker = Worker::spawn(1, b, endpoint).unwrap();

        match link.expand(vec![root]).unwrap() {
            WorkerReply::Children(children) => assert!(children.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
        link.terminate().unwrap();
        assert_eq!(worker.stats().leaves.load(Ordering::Relaxed), 1);
        worker.join().unwrap();
    }

    #[test]
    fn test_lost_coordinator_surfaces_on_join() {
        let (link, endpoint) = link(2);
        let mut worker = Worker::spawn(2, brancher(Graph::cycle(4)), endpoint).unwrap();
        drop(link);
        assert!(matches!(
            worker.join(),
            Err(SolverError::Protocol(ProtocolError::CoordinatorGone { id: 2 }))
        ));
    }
}
