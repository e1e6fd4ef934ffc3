//! Per-worker dispatch loop
//!
//! Each dispatch thread drives one worker through a small state machine:
//!
//! ```text
//! Polling -> Dispatching -> AwaitingResult -> Merging -> Polling
//!    |            |                |
//!    +------------+----------------+--> Draining -> Terminated
//! ```
//!
//! - Polling: check the cancellation signals and the time budget, then take
//!   a batch from the shared queue (bounded wait)
//! - Dispatching: screen the batch against the incumbent (prune, improve,
//!   detect optimality)
//! - AwaitingResult: hand the survivors to the worker and block for its reply
//! - Merging: push the children back onto the shared queue
//! - Draining: tell the worker to stop and wait for its acknowledgement

use super::best::{BestBound, Screening};
use super::cancel::CancelFlags;
use super::protocol::{WorkerLink, WorkerReply};
use super::queue::TaskQueue;
use crate::config::SolverConfig;
use crate::error::{ProtocolError, Result, WorkerError};
use crate::search::{BoundOracle, SearchNode};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// State shared by the orchestrator and every dispatch thread
#[derive(Debug)]
pub struct SearchContext {
    pub config: SolverConfig,
    pub queue: TaskQueue,
    pub best: BestBound,
    pub cancel: CancelFlags,
    pub oracle: BoundOracle,
    /// Raised by the Ctrl-C handler
    pub interrupt: Arc<AtomicBool>,
    pub started: Instant,
}

impl SearchContext {
    /// True once the time budget is spent or the run was interrupted
    pub fn out_of_time(&self) -> bool {
        self.started.elapsed() >= self.config.time_limit || self.interrupt.load(Ordering::Relaxed)
    }

    /// Raise `timed_out` and wake every thread parked on the queue
    pub fn expire(&self) {
        if self.cancel.timed_out.fire() {
            if self.interrupt.load(Ordering::Relaxed) {
                info!("Interrupted, stopping search");
            } else {
                info!(
                    limit_secs = self.config.time_limit.as_secs_f64(),
                    "Time budget exhausted"
                );
            }
        }
        self.queue.wake_all();
    }
}

/// Statistics collected by a dispatch thread
#[derive(Debug, Default)]
pub struct DispatchStats {
    /// Batches sent to the worker
    pub dispatched: AtomicU64,

    /// Nodes sent to the worker
    pub forwarded: AtomicU64,

    /// Nodes discarded by the bound test
    pub pruned: AtomicU64,

    /// Children merged back into the queue
    pub merged: AtomicU64,

    /// Incumbent improvements made by this thread
    pub improvements: AtomicU64,
}

/// Dispatch states
#[derive(Debug)]
enum Phase {
    Polling,
    Dispatching(Vec<SearchNode>),
    AwaitingResult(Vec<SearchNode>),
    Merging(Vec<SearchNode>),
    Draining,
    Terminated,
}

/// A dispatch thread paired with one worker
pub struct Dispatcher {
    id: usize,
    handle: Option<JoinHandle<std::result::Result<(), ProtocolError>>>,
    stats: Arc<DispatchStats>,
}

impl Dispatcher {
    /// Spawn the dispatch thread for worker `id`
    pub fn spawn(id: usize, link: WorkerLink, ctx: Arc<SearchContext>) -> Result<Self> {
        let stats = Arc::new(DispatchStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("dispatch-{}", id))
            .spawn(move || {
                let result = dispatch_loop(id, &link, &ctx, &stats_clone);
                if let Err(e) = &result {
                    warn!(worker = id, error = %e, "Dispatch failed, cancelling search");
                    ctx.expire();
                }
                result
            })
            .map_err(|e| WorkerError::SpawnFailed {
                role: "dispatcher",
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Worker ID this thread drives
    pub fn id(&self) -> usize {
        self.id
    }

    /// Dispatch statistics
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Wait for the thread to finish its drain
    pub fn join(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(result) => result.map_err(Into::into),
                Err(_) => Err(WorkerError::Panicked {
                    id: self.id,
                    message: "Dispatch thread panicked".into(),
                }
                .into()),
            }
        } else {
            Ok(())
        }
    }
}

fn dispatch_loop(
    id: usize,
    link: &WorkerLink,
    ctx: &SearchContext,
    stats: &DispatchStats,
) -> std::result::Result<(), ProtocolError> {
    let mut phase = Phase::Polling;

    loop {
        phase = match phase {
            Phase::Polling => poll(ctx),

            Phase::Dispatching(batch) => match ctx.best.screen(batch, &ctx.oracle, &ctx.cancel) {
                Screening::Forward {
                    survivors,
                    pruned,
                    improved,
                } => {
                    stats.pruned.fetch_add(pruned as u64, Ordering::Relaxed);
                    if let Some(upper_bound) = improved {
                        stats.improvements.fetch_add(1, Ordering::Relaxed);
                        info!(worker = id, upper_bound, "Improved upper bound");
                    }
                    if survivors.is_empty() {
                        ctx.queue.complete_batch(Vec::new());
                        Phase::Polling
                    } else {
                        Phase::AwaitingResult(survivors)
                    }
                }
                Screening::Optimal { upper_bound } => {
                    info!(worker = id, upper_bound, "Optimality proven");
                    ctx.queue.complete_batch(Vec::new());
                    ctx.queue.wake_all();
                    Phase::Draining
                }
                Screening::Cancelled => {
                    ctx.queue.complete_batch(Vec::new());
                    Phase::Draining
                }
            },

            Phase::AwaitingResult(survivors) => {
                stats.dispatched.fetch_add(1, Ordering::Relaxed);
                stats
                    .forwarded
                    .fetch_add(survivors.len() as u64, Ordering::Relaxed);

                match link.expand(survivors)? {
                    WorkerReply::Children(children) => Phase::Merging(children),
                    WorkerReply::Terminated => {
                        debug!(worker = id, "Worker acknowledged shutdown early");
                        ctx.queue.complete_batch(Vec::new());
                        Phase::Terminated
                    }
                }
            }

            Phase::Merging(children) => {
                trace!(worker = id, children = children.len(), "Merging children");
                stats
                    .merged
                    .fetch_add(children.len() as u64, Ordering::Relaxed);
                ctx.queue.complete_batch(children);
                Phase::Polling
            }

            Phase::Draining => {
                link.terminate()?;
                Phase::Terminated
            }

            Phase::Terminated => {
                debug!(
                    worker = id,
                    batches = stats.dispatched.load(Ordering::Relaxed),
                    pruned = stats.pruned.load(Ordering::Relaxed),
                    "Dispatch terminated"
                );
                return Ok(());
            }
        };
    }
}

fn poll(ctx: &SearchContext) -> Phase {
    if ctx.cancel.is_cancelled() {
        return Phase::Draining;
    }

    if ctx.out_of_time() {
        ctx.expire();
        return Phase::Draining;
    }

    match ctx
        .queue
        .take_batch(ctx.config.batch_size, ctx.config.poll_interval, &ctx.cancel)
    {
        Some(batch) => Phase::Dispatching(batch),
        // Cancelled or still empty; the next poll re-checks both
        None => Phase::Polling,
    }
}

/// Aggregate statistics from multiple dispatch threads:
/// (dispatched, forwarded, pruned, merged)
pub fn aggregate_stats(dispatchers: &[Dispatcher]) -> (u64, u64, u64, u64) {
    let mut dispatched = 0u64;
    let mut forwarded = 0u64;
    let mut pruned = 0u64;
    let mut merged = 0u64;

    for d in dispatchers {
        dispatched += d.stats.dispatched.load(Ordering::Relaxed);
        forwarded += d.stats.forwarded.load(Ordering::Relaxed);
        pruned += d.stats.pruned.load(Ordering::Relaxed);
        merged += d.stats.merged.load(Ordering::Relaxed);
    }

    (dispatched, forwarded, pruned, merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::heuristics::Strategies;
    use crate::search::{Brancher, ConstraintSet, Partition};
    use crate::solver::protocol::link;
    use crate::solver::worker::Worker;
    use std::time::Duration;

    fn context(graph: Graph, time_limit: Duration) -> Arc<SearchContext> {
        seeded_context(graph, time_limit, |root| vec![root])
    }

    /// Incumbent from the root bounds, queue seeded with `seeds(root)`
    fn seeded_context(
        graph: Graph,
        time_limit: Duration,
        seeds: impl FnOnce(SearchNode) -> Vec<SearchNode>,
    ) -> Arc<SearchContext> {
        let oracle = BoundOracle::new(Arc::new(graph), Strategies::default());
        let (root, coloring) = oracle.root();
        let best = BestBound::new(root.upper_bound(), coloring);
        let queue = TaskQueue::new();
        for node in seeds(root) {
            queue.seed(node);
        }
        Arc::new(SearchContext {
            config: SolverConfig {
                workers: 1,
                batch_size: 5,
                time_limit,
                poll_interval: Duration::from_millis(10),
            },
            queue,
            best,
            cancel: CancelFlags::new(),
            oracle,
            interrupt: Arc::new(AtomicBool::new(false)),
            started: Instant::now(),
        })
    }

    fn run_pair(ctx: &Arc<SearchContext>) -> (Dispatcher, Worker) {
        let (link, endpoint) = link(0);
        let worker = Worker::spawn(0, Brancher::new(ctx.oracle.clone()), endpoint).unwrap();
        let dispatcher = Dispatcher::spawn(0, link, Arc::clone(ctx)).unwrap();
        (dispatcher, worker)
    }

    #[test]
    fn test_proves_odd_cycle() {
        let ctx = context(Graph::cycle(5), Duration::from_secs(60));
        let (mut dispatcher, mut worker) = run_pair(&ctx);

        assert!(ctx.cancel.optimal_found.wait_timeout(Duration::from_secs(30)));
        dispatcher.join().unwrap();
        worker.join().unwrap();

        assert_eq!(ctx.best.upper_bound(), 3);
        assert!(!ctx.cancel.timed_out.is_set());
    }

    #[test]
    fn test_root_already_optimal() {
        let ctx = context(Graph::cycle(4), Duration::from_secs(60));
        let (mut dispatcher, mut worker) = run_pair(&ctx);

        assert!(ctx.cancel.optimal_found.wait_timeout(Duration::from_secs(30)));
        dispatcher.join().unwrap();
        worker.join().unwrap();

        // The root was never forwarded
        assert_eq!(ctx.best.upper_bound(), 2);
        assert_eq!(ctx.queue.in_flight(), 0);
        assert_eq!(dispatcher.stats().dispatched.load(Ordering::Relaxed), 0);
        assert_eq!(worker.stats().batches.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_fully_pruned_batch_skips_worker() {
        // Root incumbent of C5 is 3; every seeded node is bounded above it
        let ctx = seeded_context(Graph::cycle(5), Duration::from_secs(60), |_| {
            (0..3)
                .map(|_| SearchNode::new(Partition::new(5), ConstraintSet::new(), 4, 5, 1))
                .collect()
        });
        assert_eq!(ctx.best.upper_bound(), 3);
        let (mut dispatcher, mut worker) = run_pair(&ctx);

        let deadline = Instant::now() + Duration::from_secs(30);
        while !ctx.queue.is_exhausted() {
            assert!(Instant::now() < deadline, "queue never drained");
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!ctx.cancel.optimal_found.is_set());

        ctx.expire();
        dispatcher.join().unwrap();
        worker.join().unwrap();

        assert_eq!(dispatcher.stats().pruned.load(Ordering::Relaxed), 3);
        assert_eq!(dispatcher.stats().dispatched.load(Ordering::Relaxed), 0);
        assert_eq!(worker.stats().batches.load(Ordering::Relaxed), 0);
        assert_eq!(ctx.queue.in_flight(), 0);
        assert_eq!(ctx.best.upper_bound(), 3);
        assert!(!ctx.cancel.optimal_found.is_set());
    }

    #[test]
    fn test_interrupt_drains() {
        let ctx = context(Graph::cycle(5), Duration::from_secs(60));
        ctx.interrupt.store(true, Ordering::SeqCst);
        let (mut dispatcher, mut worker) = run_pair(&ctx);

        dispatcher.join().unwrap();
        worker.join().unwrap();
        assert!(ctx.cancel.timed_out.is_set());
        assert!(!ctx.cancel.optimal_found.is_set());
    }

    #[test]
    fn test_lost_worker_cancels_search() {
        let ctx = context(Graph::cycle(5), Duration::from_secs(60));
        let (link, endpoint) = link(0);
        drop(endpoint);
        let mut dispatcher = Dispatcher::spawn(0, link, Arc::clone(&ctx)).unwrap();

        assert!(dispatcher.join().is_err());
        assert!(ctx.cancel.timed_out.is_set());
    }
}
