//! Parallel search machinery
//!
//! - `cancel`: the two one-shot cancellation signals
//! - `queue`: shared FIFO of open nodes with in-flight accounting
//! - `best`: incumbent bound and coloring
//! - `protocol`: per-worker command/reply channels
//! - `worker`: node expansion threads
//! - `dispatch`: per-worker state machine between the queue and a worker
//! - `coordinator`: one-instance orchestration

pub mod best;
pub mod cancel;
pub mod coordinator;
pub mod dispatch;
pub mod protocol;
pub mod queue;
pub mod worker;

pub use best::{BestBound, Screening};
pub use cancel::{CancelFlags, OneShot};
pub use coordinator::{Coordinator, SolveOutcome, SolveProgress, SolveStats};
pub use protocol::{WorkerCommand, WorkerReply};
pub use queue::TaskQueue;
