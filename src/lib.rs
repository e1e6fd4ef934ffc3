//! bnb-color - Exact Graph Coloring by Parallel Branch-and-Bound
//!
//! Computes the chromatic number of a graph by exploring a tree of partial
//! decisions ("these two vertices share a color" / "these two vertices do
//! not"), bounding every node with a clique (lower) and a heuristic coloring
//! (upper), and pruning nodes that cannot beat the best coloring found so far.
//!
//! # Features
//!
//! - **Zykov-style branching**: a node is a vertex partition plus a set of
//!   classes forced apart; children merge or separate one pair of classes.
//!
//! - **Pluggable heuristics**: DSatur coloring, greedy clique search and the
//!   pair selector sit behind traits and can be swapped per solve.
//!
//! - **Parallel search**: one dispatch thread per worker pulls batches from a
//!   shared queue, prunes them against the incumbent and hands survivors to
//!   its worker for expansion.
//!
//! - **Clean shutdown**: optimality, exhaustion of the tree, the time budget
//!   and Ctrl-C all end in every worker acknowledging termination.
//!
//! # Architecture
//!
//! ```text
//!                    ┌──────────────────────────┐
//!                    │       Coordinator        │
//!                    │  root bounds, seed queue │
//!                    │  wait: optimal / timeout │
//!                    └────────────┬─────────────┘
//!                                 │
//!        ┌────────────────────────┼───────────────────────┐
//!        ▼                        ▼                       ▼
//! ┌──────────────┐  ┌──────────────────────────┐  ┌──────────────┐
//! │  Task Queue  │◄─┤   Dispatch Threads       ├─►│  Best Bound  │
//! │ FIFO, batches│  │ poll → screen → send →   │  │ UB + coloring│
//! │ in-flight cnt│─►│ await → merge            │  │ (one lock)   │
//! └──────────────┘  └──┬─────────┬─────────┬───┘  └──────────────┘
//!                      │ channel │ channel │ channel
//!                      ▼         ▼         ▼
//!                 ┌────────┐┌────────┐┌────────┐
//!                 │Worker 0││Worker 1││Worker N│  branch + bound
//!                 └────────┘└────────┘└────────┘
//! ```
//!
//! # Example
//!
//! ```bash
//! # Solve every instance in a directory, smallest first
//! bnb-color instances/ -w 8 -t 600 -o results.db
//!
//! # Query results
//! sqlite3 results.db "SELECT instance_name, colors, proven_optimal FROM results"
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod heuristics;
pub mod progress;
pub mod report;
pub mod search;
pub mod solver;

pub use config::{CliArgs, RunConfig, SolverConfig};
pub use error::{Result, SolverError};
pub use graph::Graph;
pub use solver::{Coordinator, SolveOutcome};
