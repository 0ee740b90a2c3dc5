//! Shutdown token and termination coordinator.
//!
//! The [`ShutdownToken`] is the single cancellation channel: the signal
//! watcher cancels it, and every blocking point (clock sleeps, motion
//! waits) observes it and fails with `Error::Interrupted`.
//!
//! The [`TerminationCoordinator`] owns the process's cleanup routine behind
//! a run-once guard. Whichever path gets there first runs it:
//!
//! 1. The loop itself, after observing the interruption (SIGINT).
//! 2. The signal watcher on SIGTERM, which then exits the process with 0.
//!
//! A second caller blocks until the first has finished, so the process
//! never exits with actuators half-cleaned.

use std::sync::{Arc, Once};
use std::time::{Duration, Instant};

use log::info;
use parking_lot::{Condvar, Mutex};

// ───────────────────────────────────────────────────────────────
// ShutdownToken
// ───────────────────────────────────────────────────────────────

/// Cloneable cancellation flag that wakes blocked sleepers.
#[derive(Clone, Default)]
pub struct ShutdownToken {
    inner: Arc<TokenInner>,
}

#[derive(Default)]
struct TokenInner {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every waiter. Idempotent.
    pub fn cancel(&self) {
        let mut cancelled = self.inner.cancelled.lock();
        *cancelled = true;
        self.inner.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock()
    }

    /// Block for up to `timeout`. Returns `true` if shutdown was requested
    /// before or during the wait.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut cancelled = self.inner.cancelled.lock();
        while !*cancelled {
            if self
                .inner
                .wake
                .wait_until(&mut cancelled, deadline)
                .timed_out()
            {
                break;
            }
        }
        *cancelled
    }
}

impl core::fmt::Debug for ShutdownToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShutdownToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

// ───────────────────────────────────────────────────────────────
// TerminationCoordinator
// ───────────────────────────────────────────────────────────────

type Cleanup = Box<dyn Fn() + Send + Sync>;
type ExitHook = Box<dyn Fn(i32) + Send + Sync>;

fn exit_process(code: i32) {
    std::process::exit(code);
}

pub struct TerminationCoordinator {
    token: ShutdownToken,
    cleanup: Cleanup,
    guard: Once,
    exit: ExitHook,
}

impl TerminationCoordinator {
    /// Coordinator that exits the real process on [`terminate`](Self::terminate).
    pub fn new(token: ShutdownToken, cleanup: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            token,
            cleanup: Box::new(cleanup),
            guard: Once::new(),
            exit: Box::new(exit_process),
        }
    }

    /// Replace the process exit (tests observe the exit code instead).
    #[must_use]
    pub fn with_exit_hook(mut self, exit: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.exit = Box::new(exit);
        self
    }

    pub fn token(&self) -> &ShutdownToken {
        &self.token
    }

    /// Run the cleanup routine unless it already ran.
    pub fn shutdown(&self) {
        self.guard.call_once(|| {
            info!("SHUTDOWN | returning actuators to safe state");
            (self.cleanup)();
        });
    }

    /// True once the cleanup routine has completed.
    pub fn is_shut_down(&self) -> bool {
        self.guard.is_completed()
    }

    /// External termination request: cancel, clean up, exit with status 0.
    pub fn terminate(&self) {
        info!("Received termination request");
        self.token.cancel();
        self.shutdown();
        (self.exit)(0);
    }
}
