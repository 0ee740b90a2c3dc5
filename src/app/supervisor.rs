//! Service supervisor loop.
//!
//! Keeps the externally managed alarm service in step with the control pin.
//! The decision table is a pure function ([`decide`]); the loop around it
//! owns the confirmed [`ServiceState`] and the polling cadence.
//!
//! ```text
//!  state    pin   action                         next
//!  Stopped  LOW   idle wait (idle_poll)           Stopped
//!  Running  LOW   stop, settle, verify stopped    Stopped
//!  Stopped  HIGH  start, settle, verify running   Running
//!  Running  HIGH  steady wait (steady_poll)       Running
//! ```
//!
//! A failed verification is fatal: the loop returns the error after cleanup
//! and never retries.

use core::time::Duration;

use log::{debug, info};

use crate::config::SystemConfig;
use crate::error::{Error, Result, ServiceError};
use crate::termination::TerminationCoordinator;

use super::events::AppEvent;
use super::ports::{Clock, DigitalIoPort, Direction, EventSink, PinLevel, Pull, ServicePort};

/// Last confirmed state of the alarm service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceState {
    Running,
    Stopped,
}

impl ServiceState {
    pub fn from_running(running: bool) -> Self {
        if running { Self::Running } else { Self::Stopped }
    }
}

/// What one poll of the control pin calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Stopped and not requested: sleep the idle interval.
    Idle,
    /// Running but no longer requested.
    Stop,
    /// Requested but not running.
    Start,
    /// Running and requested: sleep the steady interval.
    Steady,
}

/// The supervisor's transition table.
pub fn decide(state: ServiceState, pin: PinLevel) -> Decision {
    match (state, pin) {
        (ServiceState::Stopped, PinLevel::Low) => Decision::Idle,
        (ServiceState::Running, PinLevel::Low) => Decision::Stop,
        (ServiceState::Stopped, PinLevel::High) => Decision::Start,
        (ServiceState::Running, PinLevel::High) => Decision::Steady,
    }
}

/// Polling and settle intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorTiming {
    pub idle_poll: Duration,
    pub steady_poll: Duration,
    pub settle: Duration,
}

impl From<&SystemConfig> for SupervisorTiming {
    fn from(config: &SystemConfig) -> Self {
        Self {
            idle_poll: Duration::from_millis(config.idle_poll_ms),
            steady_poll: Duration::from_millis(config.steady_poll_ms),
            settle: Duration::from_millis(config.settle_ms),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ServiceSupervisor
// ───────────────────────────────────────────────────────────────

pub struct ServiceSupervisor {
    control_pin: u8,
    timing: SupervisorTiming,
    state: ServiceState,
}

impl ServiceSupervisor {
    /// Construct with a known initial state.
    pub fn new(config: &SystemConfig, initial: ServiceState) -> Self {
        Self {
            control_pin: config.control_pin,
            timing: SupervisorTiming::from(config),
            state: initial,
        }
    }

    /// Construct by querying the service once.
    pub fn from_service(config: &SystemConfig, service: &mut impl ServicePort) -> Result<Self> {
        let initial = ServiceState::from_running(service.is_running()?);
        Ok(Self::new(config, initial))
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn timing(&self) -> SupervisorTiming {
        self.timing
    }

    /// Claim the control pin as a pulled-up input.
    pub fn set_up(&self, port: &mut impl DigitalIoPort) -> Result<()> {
        debug!("Setting up GPIO input on pin {}", self.control_pin);
        port.configure(self.control_pin, Direction::In, Pull::Up, PinLevel::Low)
    }

    // ── Main loop ─────────────────────────────────────────────

    /// Poll until interrupted.
    ///
    /// Interruption runs the coordinator's cleanup and returns `Ok(())`.
    /// Any other error also runs cleanup, then is returned to the caller.
    pub fn run(
        &mut self,
        port: &mut impl DigitalIoPort,
        service: &mut impl ServicePort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
        coordinator: &TerminationCoordinator,
    ) -> Result<()> {
        sink.emit(&AppEvent::SupervisorStarted(self.state));

        loop {
            match self.step(port, service, clock, sink) {
                Ok(_) => {}
                Err(Error::Interrupted) => {
                    sink.emit(&AppEvent::Interrupted);
                    coordinator.shutdown();
                    return Ok(());
                }
                Err(e) => {
                    coordinator.shutdown();
                    return Err(e);
                }
            }
        }
    }

    /// One poll of the control pin plus whatever it calls for.
    pub fn step(
        &mut self,
        port: &mut impl DigitalIoPort,
        service: &mut impl ServicePort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<Decision> {
        let level = port.read(self.control_pin)?;
        let decision = decide(self.state, level);

        match decision {
            Decision::Idle => clock.sleep(self.timing.idle_poll)?,
            Decision::Steady => clock.sleep(self.timing.steady_poll)?,
            Decision::Start => {
                info!("Received signal to start alarm service");
                sink.emit(&AppEvent::ServiceRequested(ServiceState::Running));
                self.start(service, clock)?;
                self.confirm(ServiceState::Running, sink);
            }
            Decision::Stop => {
                info!("Received signal to stop alarm service");
                sink.emit(&AppEvent::ServiceRequested(ServiceState::Stopped));
                self.stop(service, clock)?;
                self.confirm(ServiceState::Stopped, sink);
            }
        }

        Ok(decision)
    }

    // ── Actions ───────────────────────────────────────────────

    fn start(&self, service: &mut impl ServicePort, clock: &mut impl Clock) -> Result<()> {
        info!("Starting alarm service");
        service.start_service()?;
        clock.sleep(self.timing.settle)?;
        if !service.is_running()? {
            return Err(ServiceError::StateAssertion {
                expected: ServiceState::Running,
            }
            .into());
        }
        debug!("Alarm service started successfully");
        Ok(())
    }

    fn stop(&self, service: &mut impl ServicePort, clock: &mut impl Clock) -> Result<()> {
        info!("Stopping alarm service");
        service.stop_service()?;
        clock.sleep(self.timing.settle)?;
        if service.is_running()? {
            return Err(ServiceError::StateAssertion {
                expected: ServiceState::Stopped,
            }
            .into());
        }
        debug!("Alarm service stopped successfully");
        Ok(())
    }

    fn confirm(&mut self, to: ServiceState, sink: &mut impl EventSink) {
        let from = self.state;
        self.state = to;
        sink.emit(&AppEvent::ServiceChanged { from, to });
    }
}

/// Port cleanup for the supervisor process: release every claimed line.
pub fn release_port<P: DigitalIoPort + ?Sized>(port: &mut P) {
    if let Err(e) = port.release_all() {
        debug!("GPIO release during cleanup failed: {}", e);
    }
    debug!("Cleaning up GPIO inputs");
}
