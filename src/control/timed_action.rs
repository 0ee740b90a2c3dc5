//! Timed toggling of a digital output.
//!
//! Used for the arming flash (fast, bounded) and the degraded-mode
//! heartbeat (slow, unbounded). Each toggle drives the pin HIGH, sleeps one
//! interval, drives it LOW and sleeps again. The elapsed-time check runs
//! before every toggle, so a bounded action overshoots its duration by at
//! most one toggle.

use core::time::Duration;

use crate::app::ports::{Clock, DigitalIoPort, PinLevel};
use crate::error::Result;

/// Periodic on/off pattern with an optional total duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedAction {
    interval: Duration,
    duration: Option<Duration>,
}

impl TimedAction {
    /// Toggle every `interval` until `duration` has elapsed.
    pub fn bounded(interval: Duration, duration: Duration) -> Self {
        Self {
            interval,
            duration: Some(duration),
        }
    }

    /// Toggle every `interval` until interrupted.
    pub fn forever(interval: Duration) -> Self {
        Self {
            interval,
            duration: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Run the pattern on `pin` and return the number of full toggles.
    ///
    /// Returns early only with an error; `Error::Interrupted` from the clock
    /// propagates untouched and the pin is left wherever the interruption
    /// found it (the caller's cleanup forces it LOW).
    pub fn run(
        &self,
        port: &mut impl DigitalIoPort,
        pin: u8,
        clock: &mut impl Clock,
    ) -> Result<u32> {
        let started = clock.now();
        let mut toggles = 0u32;

        loop {
            if let Some(total) = self.duration {
                if clock.now().saturating_sub(started) >= total {
                    return Ok(toggles);
                }
            }

            port.write(pin, PinLevel::High)?;
            clock.sleep(self.interval)?;
            port.write(pin, PinLevel::Low)?;
            clock.sleep(self.interval)?;
            toggles = toggles.saturating_add(1);
        }
    }
}
