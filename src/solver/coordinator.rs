//! Search coordinator - orchestrates one instance solve
//!
//! The coordinator is responsible for:
//! - Computing the root bounds and seeding the shared queue
//! - Starting one worker and one paired dispatch thread per worker slot
//! - Waiting for optimality, exhaustion of the tree or the time budget
//! - Draining every worker and reporting the incumbent

use super::best::BestBound;
use super::cancel::CancelFlags;
use super::dispatch::{self, Dispatcher, SearchContext};
use super::protocol::link;
use super::queue::TaskQueue;
use super::worker::{self, Worker};
use crate::config::SolverConfig;
use crate::error::Result;
use crate::graph::Graph;
use crate::heuristics::Strategies;
use crate::search::{BoundOracle, Brancher};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Longest the wait loop sleeps between progress updates
const MAX_TICK: Duration = Duration::from_millis(100);

/// Counters gathered over a solve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Batches sent to workers
    pub batches: u64,

    /// Nodes sent to workers
    pub nodes_forwarded: u64,

    /// Nodes discarded by the bound test
    pub nodes_pruned: u64,

    /// Nodes expanded by workers
    pub nodes_expanded: u64,

    /// Children produced by workers
    pub children: u64,

    /// Expanded nodes with no children
    pub leaves: u64,

    /// Strict incumbent improvements after the root
    pub improvements: u64,
}

/// Result of a completed solve
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Best number of colors found
    pub best_upper_bound: usize,

    /// Coloring achieving `best_upper_bound`
    pub coloring: Vec<usize>,

    /// Clique bound at the root
    pub root_lower_bound: usize,

    /// Heuristic coloring size at the root
    pub root_upper_bound: usize,

    /// Optimality was proven (bound met, or tree exhausted)
    pub proven_optimal: bool,

    /// The time budget ran out (or the run was interrupted) first
    pub timed_out: bool,

    /// Wall time of the solve
    pub elapsed: Duration,

    /// Search counters
    pub stats: SolveStats,
}

/// Progress information for display
#[derive(Debug, Clone)]
pub struct SolveProgress {
    /// Current incumbent
    pub best_upper_bound: usize,

    /// Clique bound at the root
    pub root_lower_bound: usize,

    /// Nodes waiting in the queue
    pub queue_len: usize,

    /// Batches currently with a worker
    pub in_flight: usize,

    /// Batches sent so far
    pub dispatched: u64,

    /// Nodes pruned so far
    pub pruned: u64,

    /// Elapsed time
    pub elapsed: Duration,
}

impl SolveProgress {
    /// Batches per second
    pub fn batches_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.dispatched as f64 / secs
        } else {
            0.0
        }
    }
}

/// Coordinates a parallel branch-and-bound solve
pub struct Coordinator {
    /// Solver knobs
    config: SolverConfig,

    /// Bound and branching heuristics
    strategies: Strategies,

    /// Interrupt signal
    interrupt: Arc<AtomicBool>,
}

impl Coordinator {
    /// Create a coordinator with the default heuristics
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            strategies: Strategies::default(),
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the heuristics
    pub fn with_strategies(mut self, strategies: Strategies) -> Self {
        self.strategies = strategies;
        self
    }

    /// Share an externally owned interrupt flag
    pub fn with_interrupt(mut self, interrupt: Arc<AtomicBool>) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Get a clone of the interrupt flag (for signal handlers)
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Solver knobs in use
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve one instance
    pub fn solve(&self, graph: Arc<Graph>) -> Result<SolveOutcome> {
        self.solve_with_progress(graph, |_| {})
    }

    /// Solve one instance, reporting progress from the wait loop
    pub fn solve_with_progress<F>(
        &self,
        graph: Arc<Graph>,
        mut on_progress: F,
    ) -> Result<SolveOutcome>
    where
        F: FnMut(&SolveProgress),
    {
        self.config.validate()?;
        let started = Instant::now();

        let oracle = BoundOracle::new(Arc::clone(&graph), self.strategies.clone());
        let (root, root_coloring) = oracle.root();
        let root_lower_bound = root.lower_bound();
        let root_upper_bound = root.upper_bound();

        info!(
            vertices = graph.len(),
            edges = graph.edge_count(),
            workers = self.config.workers,
            strategies = %self.strategies.label(),
            lower_bound = root_lower_bound,
            upper_bound = root_upper_bound,
            "Starting search"
        );

        let queue = TaskQueue::new();
        queue.seed(root);

        let ctx = Arc::new(SearchContext {
            config: self.config,
            queue,
            best: BestBound::new(root_upper_bound, root_coloring),
            cancel: CancelFlags::new(),
            oracle,
            interrupt: Arc::clone(&self.interrupt),
            started,
        });

        let mut workers = Vec::with_capacity(self.config.workers);
        let mut dispatchers = Vec::with_capacity(self.config.workers);
        if let Err(e) = spawn_pairs(&ctx, &mut workers, &mut dispatchers) {
            ctx.expire();
            join_all(&mut dispatchers, &mut workers);
            return Err(e);
        }
        debug!(count = workers.len(), "Workers spawned");

        self.wait_for_completion(&ctx, &dispatchers, root_lower_bound, &mut on_progress);

        // Wake anything still parked on the queue
        ctx.queue.wake_all();
        let failure = join_all(&mut dispatchers, &mut workers);

        let (batches, nodes_forwarded, nodes_pruned, _) = dispatch::aggregate_stats(&dispatchers);
        let (_, nodes_expanded, children, leaves) = worker::aggregate_stats(&workers);
        let stats = SolveStats {
            batches,
            nodes_forwarded,
            nodes_pruned,
            nodes_expanded,
            children,
            leaves,
            improvements: ctx.best.improvements(),
        };

        if let Some(e) = failure {
            return Err(e);
        }

        let (best_upper_bound, coloring) = ctx.best.snapshot();
        let proven_optimal = ctx.cancel.optimal_found.is_set();
        let timed_out = !proven_optimal && ctx.cancel.timed_out.is_set();
        let elapsed = started.elapsed();

        info!(
            colors = best_upper_bound,
            proven = proven_optimal,
            nodes = stats.nodes_expanded,
            pruned = stats.nodes_pruned,
            elapsed_secs = elapsed.as_secs_f64(),
            "Search finished"
        );

        Ok(SolveOutcome {
            best_upper_bound,
            coloring,
            root_lower_bound,
            root_upper_bound,
            proven_optimal,
            timed_out,
            elapsed,
            stats,
        })
    }

    /// Block until a cancellation signal fires, the tree is exhausted or the
    /// time budget runs out
    fn wait_for_completion<F>(
        &self,
        ctx: &SearchContext,
        dispatchers: &[Dispatcher],
        root_lower_bound: usize,
        on_progress: &mut F,
    )
    where
        F: FnMut(&SolveProgress),
    {
        let tick = self.config.poll_interval.min(MAX_TICK);

        loop {
            if ctx.cancel.optimal_found.wait_timeout(tick) {
                return;
            }

            if ctx.cancel.timed_out.is_set() {
                return;
            }

            // Nothing queued and nothing in flight: every open node was
            // pruned, so the incumbent is optimal
            if ctx.queue.is_exhausted() {
                if ctx.cancel.optimal_found.fire() {
                    info!(colors = ctx.best.upper_bound(), "Search tree exhausted");
                }
                ctx.queue.wake_all();
                return;
            }

            if ctx.out_of_time() {
                ctx.expire();
                return;
            }

            let (dispatched, _, pruned, _) = dispatch::aggregate_stats(dispatchers);
            on_progress(&SolveProgress {
                best_upper_bound: ctx.best.upper_bound(),
                root_lower_bound,
                queue_len: ctx.queue.len(),
                in_flight: ctx.queue.in_flight(),
                dispatched,
                pruned,
                elapsed: ctx.started.elapsed(),
            });
        }
    }
}

fn spawn_pairs(
    ctx: &Arc<SearchContext>,
    workers: &mut Vec<Worker>,
    dispatchers: &mut Vec<Dispatcher>,
) -> Result<()> {
    for id in 0..ctx.config.workers {
        let (link, endpoint) = link(id);
        let worker = Worker::spawn(id, Brancher::new(ctx.oracle.clone()), endpoint)?;
        workers.push(worker);
        dispatchers.push(Dispatcher::spawn(id, link, Arc::clone(ctx))?);
    }
    Ok(())
}

/// Join every dispatch thread (each drains its worker), then every worker.
/// Returns the first failure.
fn join_all(
    dispatchers: &mut [Dispatcher],
    workers: &mut [Worker],
) -> Option<crate::error::SolverError> {
    let mut failure = None;

    for d in dispatchers.iter_mut() {
        if let Err(e) = d.join() {
            warn!(worker = d.id(), error = %e, "Dispatch thread failed");
            failure.get_or_insert(e);
        }
    }

    for w in workers.iter_mut() {
        if let Err(e) = w.join() {
            warn!(worker = w.id(), error = %e, "Worker failed to join cleanly");
            failure.get_or_insert(e);
        }
    }

    failure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::color_count;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn config(workers: usize) -> SolverConfig {
        SolverConfig {
            workers,
            batch_size: 5,
            time_limit: Duration::from_secs(60),
            poll_interval: Duration::from_millis(20),
        }
    }

    fn check(graph: Graph, expected: usize) {
        let graph = Arc::new(graph);
        for workers in [1, 2, 4] {
            let outcome = Coordinator::new(config(workers))
                .solve(Arc::clone(&graph))
                .unwrap();
            assert_eq!(outcome.best_upper_bound, expected, "{workers} workers");
            assert!(outcome.proven_optimal);
            assert!(!outcome.timed_out);
            assert!(graph.validate(&outcome.coloring));
            assert_eq!(color_count(&outcome.coloring), expected);
        }
    }

    #[test]
    fn test_even_cycle() {
        check(Graph::cycle(4), 2);
    }

    #[test]
    fn test_complete_graph() {
        check(Graph::complete(4), 4);
    }

    #[test]
    fn test_odd_cycle() {
        check(Graph::cycle(5), 3);
    }

    #[test]
    fn test_empty_and_edgeless() {
        check(Graph::new(0), 0);
        check(Graph::new(3), 1);
    }

    #[test]
    fn test_petersen() {
        let mut edges = Vec::new();
        for i in 0..5 {
            edges.push((i, (i + 1) % 5));
            edges.push((i, i + 5));
            edges.push((5 + i, 5 + (i + 2) % 5));
        }
        check(Graph::from_edges(10, &edges), 3);
    }

    #[test]
    fn test_interrupt_times_out() {
        let interrupt = Arc::new(AtomicBool::new(true));
        let outcome = Coordinator::new(config(2))
            .with_interrupt(Arc::clone(&interrupt))
            .solve(Arc::new(Graph::cycle(7)))
            .unwrap();

        assert!(outcome.timed_out);
        assert!(!outcome.proven_optimal);
        // The root coloring is still reported
        assert_eq!(outcome.best_upper_bound, outcome.root_upper_bound);
        assert!(Graph::cycle(7).validate(&outcome.coloring));
    }

    #[test]
    fn test_progress_callback_sees_incumbent() {
        let seen = AtomicUsize::new(usize::MAX);
        let outcome = Coordinator::new(config(1))
            .solve_with_progress(Arc::new(Graph::cycle(9)), |p| {
                seen.fetch_min(p.best_upper_bound, Ordering::Relaxed);
            })
            .unwrap();
        assert_eq!(outcome.best_upper_bound, 3);
        let seen = seen.load(Ordering::Relaxed);
        assert!(seen == usize::MAX || seen >= 3);
    }

    #[test]
    fn test_rejects_bad_config() {
        let bad = SolverConfig {
            workers: 0,
            ..config(1)
        };
        assert!(Coordinator::new(bad).solve(Arc::new(Graph::cycle(3))).is_err());
    }

    #[test]
    fn test_progress_rate() {
        let progress = SolveProgress {
            best_upper_bound: 5,
            root_lower_bound: 3,
            queue_len: 10,
            in_flight: 2,
            dispatched: 100,
            pruned: 40,
            elapsed: Duration::from_secs(10),
        };
        assert!((progress.batches_per_second() - 10.0).abs() < 0.01);
    }
}
