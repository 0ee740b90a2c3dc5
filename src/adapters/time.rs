//! Wall-clock time adapter.
//!
//! Monotonic time comes from `std::time::Instant`. Sleeping waits on the
//! [`ShutdownToken`] rather than `thread::sleep`, so a pending SIGINT wakes
//! the loop immediately instead of after the current poll interval.

use std::time::{Duration, Instant};

use crate::app::ports::Clock;
use crate::error::{Error, Result};
use crate::termination::ShutdownToken;

pub struct SystemClock {
    start: Instant,
    token: ShutdownToken,
}

impl SystemClock {
    pub fn new(token: ShutdownToken) -> Self {
        Self {
            start: Instant::now(),
            token,
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) -> Result<()> {
        if self.token.wait_timeout(duration) {
            return Err(Error::Interrupted);
        }
        Ok(())
    }
}
