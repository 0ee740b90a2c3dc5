//! Port traits — the hexagonal boundary between the control loops and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ServiceSupervisor / SirenLoop (domain)
//! ```
//!
//! Driven adapters (GPIO, motion device, service manager, clock, event sinks)
//! implement these traits. The loops consume them via generics, so the
//! domain core never touches hardware, processes or wall-clock time directly.
//!
//! ## Blocking points
//!
//! Every method that can block for a noticeable time ([`Clock::sleep`],
//! [`MotionPort::next_event`]) returns [`Error::Interrupted`] once the
//! shutdown token is cancelled. That is the only cancellation channel.
//!
//! [`Error::Interrupted`]: crate::error::Error::Interrupted

use core::time::Duration;

use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// Digital I/O port (driven adapter: domain ↔ GPIO header)
// ───────────────────────────────────────────────────────────────

/// Logic level of a single digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl From<bool> for PinLevel {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

impl From<PinLevel> for embedded_hal::digital::PinState {
    fn from(level: PinLevel) -> Self {
        match level {
            PinLevel::Low => Self::Low,
            PinLevel::High => Self::High,
        }
    }
}

impl From<embedded_hal::digital::PinState> for PinLevel {
    fn from(state: embedded_hal::digital::PinState) -> Self {
        match state {
            embedded_hal::digital::PinState::Low => Self::Low,
            embedded_hal::digital::PinState::High => Self::High,
        }
    }
}

/// Line direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

/// Internal bias resistor for inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    Up,
    None,
}

/// Pin-numbered digital I/O, addressed by board (header) pin number.
pub trait DigitalIoPort {
    /// Claim `pin` with the given direction. `initial` is the level an
    /// output is driven to immediately; it is ignored for inputs.
    fn configure(&mut self, pin: u8, direction: Direction, pull: Pull, initial: PinLevel) -> Result<()>;

    /// Sample the current level of `pin`.
    fn read(&mut self, pin: u8) -> Result<PinLevel>;

    /// Drive an output pin.
    fn write(&mut self, pin: u8, level: PinLevel) -> Result<()>;

    /// Release every claimed pin. Must be safe to call repeatedly.
    fn release_all(&mut self) -> Result<()>;
}

impl<T: DigitalIoPort + ?Sized> DigitalIoPort for Box<T> {
    fn configure(&mut self, pin: u8, direction: Direction, pull: Pull, initial: PinLevel) -> Result<()> {
        (**self).configure(pin, direction, pull, initial)
    }

    fn read(&mut self, pin: u8) -> Result<PinLevel> {
        (**self).read(pin)
    }

    fn write(&mut self, pin: u8, level: PinLevel) -> Result<()> {
        (**self).write(pin, level)
    }

    fn release_all(&mut self) -> Result<()> {
        (**self).release_all()
    }
}

// ───────────────────────────────────────────────────────────────
// Motion sensor port (driven adapter: input device → domain)
// ───────────────────────────────────────────────────────────────

/// A single event from the motion input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionEvent {
    /// Raw magnitude reported by the device. Zero carries no motion.
    pub value: i32,
}

impl MotionEvent {
    pub fn is_motion(&self) -> bool {
        self.value != 0
    }
}

/// Blocking source of motion events.
///
/// The underlying device is opened lazily on the first call; a missing
/// device yields [`MotionError::DeviceNotFound`](crate::error::MotionError::DeviceNotFound).
pub trait MotionPort {
    /// Block until the next event arrives.
    fn next_event(&mut self) -> Result<MotionEvent>;

    /// Drop any events buffered since the last wait.
    fn discard_pending(&mut self) {}
}

impl<T: MotionPort + ?Sized> MotionPort for Box<T> {
    fn next_event(&mut self) -> Result<MotionEvent> {
        (**self).next_event()
    }

    fn discard_pending(&mut self) {
        (**self).discard_pending();
    }
}

// ───────────────────────────────────────────────────────────────
// Service port (driven adapter: domain → service manager)
// ───────────────────────────────────────────────────────────────

/// Control of the externally managed alarm service.
pub trait ServicePort {
    /// Ask the service manager to (re)start the service.
    fn start_service(&mut self) -> Result<()>;

    /// Ask the service manager to stop the service.
    fn stop_service(&mut self) -> Result<()>;

    /// Exit code of the status query; zero means running.
    fn service_status(&mut self) -> Result<i32>;

    fn is_running(&mut self) -> Result<bool> {
        Ok(self.service_status()? == 0)
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: domain ↔ monotonic time)
// ───────────────────────────────────────────────────────────────

/// Monotonic time plus interruptible sleeping.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn now(&self) -> Duration;

    /// Sleep for `duration`, or fail with `Error::Interrupted` as soon as
    /// shutdown is requested.
    fn sleep(&mut self, duration: Duration) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The loops emit structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
