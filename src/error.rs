//! Unified error types for the alarm control loops.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! loop-level handling uniform: `Interrupted` is the normal shutdown path,
//! everything else is surfaced to the binary.

use core::fmt;

use crate::app::ports::PinLevel;
use crate::app::supervisor::ServiceState;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// The shutdown token was cancelled while blocked (SIGINT / SIGTERM).
    Interrupted,
    /// A GPIO operation failed.
    Gpio(GpioError),
    /// The motion sensor could not be read.
    Motion(MotionError),
    /// The alarm service could not be driven into the requested state.
    Service(ServiceError),
    /// Configuration is invalid.
    Config(String),
}

impl Error {
    /// True for the cancellation path, which is a shutdown trigger rather
    /// than a failure.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupted => write!(f, "interrupted"),
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Motion(e) => write!(f, "motion: {e}"),
            Self::Service(e) => write!(f, "service: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// The pin was used before `configure` (or after `release_all`).
    NotConfigured(u8),
    /// A write was issued to an input pin, or a read of an unknown direction.
    WrongDirection(u8),
    /// The board pin has no GPIO line behind it.
    InvalidPin(u8),
    /// Setting a level failed in the backend.
    WriteFailed { pin: u8, level: PinLevel },
    /// Reading a level failed in the backend.
    ReadFailed(u8),
    /// The GPIO peripheral could not be opened.
    Backend(String),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured(pin) => write!(f, "pin {pin} not configured"),
            Self::WrongDirection(pin) => write!(f, "pin {pin} configured for the other direction"),
            Self::InvalidPin(pin) => write!(f, "board pin {pin} is not a GPIO line"),
            Self::WriteFailed { pin, level } => write!(f, "write {level:?} to pin {pin} failed"),
            Self::ReadFailed(pin) => write!(f, "read of pin {pin} failed"),
            Self::Backend(msg) => write!(f, "backend: {msg}"),
        }
    }
}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ---------------------------------------------------------------------------
// Motion sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum MotionError {
    /// The device path did not exist when the sensor was opened.
    DeviceNotFound(String),
    /// The device exists but could not be opened or read.
    Io(std::io::Error),
    /// The reader thread exited and no more events will arrive.
    Disconnected,
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotFound(path) => write!(f, "device not found: {path}"),
            Self::Io(e) => write!(f, "device I/O: {e}"),
            Self::Disconnected => write!(f, "event reader disconnected"),
        }
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Self::Motion(e)
    }
}

// ---------------------------------------------------------------------------
// Service supervisor errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ServiceError {
    /// The service manager command could not be spawned.
    CommandFailed {
        command: &'static str,
        source: std::io::Error,
    },
    /// After action + settle the service did not report the expected state.
    StateAssertion { expected: ServiceState },
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandFailed { command, source } => {
                write!(f, "systemctl {command} could not be run: {source}")
            }
            Self::StateAssertion { expected } => {
                write!(f, "service did not reach {expected:?} after settle interval")
            }
        }
    }
}

impl From<ServiceError> for Error {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
