//! Shared task queue of pending search nodes
//!
//! FIFO monitor shared by every dispatch thread. Consumers take batches and
//! block for at most one poll slice, so a thread parked on an empty queue still
//! notices a cancellation signal in bounded time. Batches taken and not yet
//! completed are counted as in flight; an empty queue with nothing in flight
//! means the tree is exhausted.

use super::cancel::CancelFlags;
use crate::search::SearchNode;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Statistics for the task queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total nodes enqueued (root included)
    pub enqueued: AtomicU64,

    /// Total nodes dequeued
    pub dequeued: AtomicU64,

    /// Total batches handed out
    pub batches: AtomicU64,
}

impl QueueStats {
    /// Nodes dequeued so far
    pub fn throughput(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }

    /// Batches handed out so far
    pub fn batch_count(&self) -> u64 {
        self.batches.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
struct QueueState {
    nodes: VecDeque<SearchNode>,
    in_flight: usize,
}

/// FIFO of search nodes with blocking batch retrieval
#[derive(Debug, Default)]
pub struct TaskQueue {
    state: Mutex<QueueState>,
    available: Condvar,
    stats: QueueStats,
}

impl TaskQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the queue with the root node
    pub fn seed(&self, root: SearchNode) {
        let mut state = self.state.lock();
        state.nodes.push_back(root);
        self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
        self.available.notify_one();
    }

    /// Take up to `max` nodes. If the queue is empty, waits at most one
    /// `poll` slice for work to arrive.
    ///
    /// Returns `None` if a cancellation signal is set or the queue is still
    /// empty after the wait. A returned batch counts as in flight until
    /// [`complete_batch`] is called.
    ///
    /// [`complete_batch`]: TaskQueue::complete_batch
    pub fn take_batch(
        &self,
        max: usize,
        poll: Duration,
        cancel: &CancelFlags,
    ) -> Option<Vec<SearchNode>> {
        let mut state = self.state.lock();
        if state.nodes.is_empty() && !cancel.is_cancelled() {
            self.available.wait_for(&mut state, poll);
        }
        if cancel.is_cancelled() || state.nodes.is_empty() {
            return None;
        }

        let count = max.min(state.nodes.len());
        let batch: Vec<SearchNode> = state.nodes.drain(..count).collect();
        state.in_flight += 1;

        self.stats.dequeued.fetch_add(count as u64, Ordering::Relaxed);
        self.stats.batches.fetch_add(1, Ordering::Relaxed);
        Some(batch)
    }

    /// Append the children produced from a batch and release the batch.
    /// Wakes one waiter per child.
    pub fn complete_batch(&self, children: Vec<SearchNode>) {
        let mut state = self.state.lock();
        let added = children.len();
        state.nodes.extend(children);
        state.in_flight = state.in_flight.saturating_sub(1);
        self.stats.enqueued.fetch_add(added as u64, Ordering::Relaxed);

        if state.nodes.is_empty() && state.in_flight == 0 {
            // Exhausted: let every waiter re-check
            self.available.notify_all();
        } else {
            for _ in 0..added {
                self.available.notify_one();
            }
        }
    }

    /// Wake every waiting consumer (after a cancellation signal fires)
    pub fn wake_all(&self) {
        let _state = self.state.lock();
        self.available.notify_all();
    }

    /// Nothing queued and nothing in flight
    pub fn is_exhausted(&self) -> bool {
        let state = self.state.lock();
        state.nodes.is_empty() && state.in_flight == 0
    }

    /// Current number of queued nodes
    pub fn len(&self) -> usize {
        self.state.lock().nodes.len()
    }

    /// True if no nodes are queued
    pub fn is_empty(&self) -> bool {
        self.state.lock().nodes.is_empty()
    }

    /// Number of batches taken but not completed
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight
    }

    /// Queue statistics
    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }
}
