//! Outbound application events.
//!
//! The control loops emit these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them: the binaries log them, the tests
//! record them.

use super::siren::SirenState;
use super::supervisor::ServiceState;

/// Structured events emitted by the control loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The supervisor queried the service once and starts from this state.
    SupervisorStarted(ServiceState),

    /// The control pin asks for a state the service is not in.
    ServiceRequested(ServiceState),

    /// A start/stop action was issued and confirmed after the settle interval.
    ServiceChanged { from: ServiceState, to: ServiceState },

    /// The siren loop moved between states.
    SirenChanged { from: SirenState, to: SirenState },

    /// Arming finished; the indicator is latched on.
    Armed,

    /// The motion device is missing; the indicator runs the slow heartbeat.
    DegradedMode { device: String },

    /// Raw event read from the motion device (zero values included).
    MotionEvent { value: i32 },

    /// A non-zero motion event ended the wait.
    MotionDetected { value: i32 },

    /// The siren relay was energised.
    SirenOn,

    /// The siren relay was released.
    SirenOff,

    /// The loop observed the shutdown request and is cleaning up.
    Interrupted,
}
