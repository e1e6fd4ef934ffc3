//! One-shot cancellation signals
//!
//! A signal goes from unset to set exactly once and never resets. Readers
//! poll it with a plain atomic load; the orchestrator can also block on it
//! with a timeout.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Sticky broadcast flag
#[derive(Debug, Default)]
pub struct OneShot {
    fired: AtomicBool,
    lock: Mutex<()>,
    cond: Condvar,
}

impl OneShot {
    /// New unset signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signal and wake every waiter. Returns true for the call that
    /// actually set it.
    pub fn fire(&self) -> bool {
        let _guard = self.lock.lock();
        let first = !self.fired.swap(true, Ordering::SeqCst);
        self.cond.notify_all();
        first
    }

    /// True once fired
    #[inline]
    pub fn is_set(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Block until fired or `timeout` elapses; returns whether it is set
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock.lock();
        while !self.is_set() {
            if self.cond.wait_until(&mut guard, deadline).timed_out() {
                break;
            }
        }
        self.is_set()
    }
}

/// The two run-wide cancellation signals
#[derive(Debug, Default)]
pub struct CancelFlags {
    /// A node's lower bound met the incumbent, or the tree was exhausted
    pub optimal_found: OneShot,

    /// The time budget ran out (or the run was interrupted)
    pub timed_out: OneShot,
}

impl CancelFlags {
    /// Both flags unset
    pub fn new() -> Self {
        Self::default()
    }

    /// True if either flag is set
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.optimal_found.is_set() || self.timed_out.is_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_fire_once() {
        let signal = OneShot::new();
        assert!(!signal.is_set());
        assert!(signal.fire());
        assert!(!signal.fire());
        assert!(signal.is_set());
    }

    #[test]
    fn test_wait_timeout_expires() {
        let signal = OneShot::new();
        let start = Instant::now();
        assert!(!signal.wait_timeout(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_wait_wakes_on_fire() {
        let signal = Arc::new(OneShot::new());
        let firer = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                signal.fire();
            })
        };
        assert!(signal.wait_timeout(Duration::from_secs(10)));
        firer.join().unwrap();
    }

    #[test]
    fn test_flags_independent() {
        let flags = CancelFlags::new();
        assert!(!flags.is_cancelled());
        flags.timed_out.fire();
        assert!(flags.is_cancelled());
        assert!(!flags.optimal_found.is_set());
    }
}
