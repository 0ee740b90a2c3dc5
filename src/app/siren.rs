//! Siren control loop.
//!
//! One cycle: arm (fast indicator flash, then latched on) → wait for a
//! non-zero motion event → snooze → siren relay on for a fixed time → off →
//! re-arm. A missing motion device turns the wait into an endless slow
//! heartbeat on the indicator instead of a crash.
//!
//! ```text
//!   Idle ──▶ Arming ──▶ Armed ──motion──▶ Triggered ──▶ Arming ...
//!                         │
//!                         └─no device──▶ heartbeat until interrupted
//! ```
//!
//! Interruption anywhere in the cycle ends in the same safe state: relay
//! LOW, indicator LOW, port released ([`safe_state`]).

use core::time::Duration;

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::control::timed_action::TimedAction;
use crate::error::{Error, MotionError, Result};
use crate::termination::TerminationCoordinator;

use super::events::AppEvent;
use super::ports::{Clock, DigitalIoPort, Direction, EventSink, MotionPort, PinLevel, Pull};

/// Where the siren loop is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SirenState {
    Idle,
    Arming,
    Armed,
    Triggered,
}

/// Outcome of waiting for motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// A non-zero event ended the wait.
    Motion(i32),
    /// The device was missing and the heartbeat ran instead.
    Degraded,
}

/// Arming, heartbeat and siren timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SirenTiming {
    pub arm_duration: Duration,
    pub fast_flash: Duration,
    pub slow_flash: Duration,
    pub snooze: Duration,
    pub siren_duration: Duration,
}

impl From<&SystemConfig> for SirenTiming {
    fn from(config: &SystemConfig) -> Self {
        Self {
            arm_duration: Duration::from_millis(config.arm_duration_ms),
            fast_flash: Duration::from_millis(config.fast_flash_ms),
            slow_flash: Duration::from_millis(config.slow_flash_ms),
            snooze: Duration::from_millis(config.snooze_ms),
            siren_duration: Duration::from_millis(config.siren_duration_ms),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// SirenLoop
// ───────────────────────────────────────────────────────────────

pub struct SirenLoop {
    relay_pin: u8,
    led_pin: u8,
    timing: SirenTiming,
    state: SirenState,
}

impl SirenLoop {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            relay_pin: config.relay_pin,
            led_pin: config.led_pin,
            timing: SirenTiming::from(config),
            state: SirenState::Idle,
        }
    }

    pub fn state(&self) -> SirenState {
        self.state
    }

    pub fn timing(&self) -> SirenTiming {
        self.timing
    }

    /// Claim relay and indicator as outputs, both starting LOW.
    pub fn set_up(&self, port: &mut impl DigitalIoPort) -> Result<()> {
        port.configure(self.relay_pin, Direction::Out, Pull::None, PinLevel::Low)?;
        port.configure(self.led_pin, Direction::Out, Pull::None, PinLevel::Low)
    }

    // ── Main loop ─────────────────────────────────────────────

    /// Arm, detect, trigger, repeat until interrupted.
    ///
    /// Interruption runs the coordinator's cleanup and returns `Ok(())`.
    /// Any other error also runs cleanup, then is returned.
    pub fn run(
        &mut self,
        port: &mut impl DigitalIoPort,
        motion: &mut impl MotionPort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
        coordinator: &TerminationCoordinator,
    ) -> Result<()> {
        loop {
            match self.cycle(port, motion, clock, sink) {
                Ok(_) => {}
                Err(e) => {
                    let interrupted = e.is_interrupted();
                    if interrupted {
                        sink.emit(&AppEvent::Interrupted);
                    }
                    self.transition(SirenState::Idle, sink);
                    coordinator.shutdown();
                    return if interrupted { Ok(()) } else { Err(e) };
                }
            }
        }
    }

    /// One full arm → detect → trigger cycle.
    pub fn cycle(
        &mut self,
        port: &mut impl DigitalIoPort,
        motion: &mut impl MotionPort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<Detection> {
        self.arm(port, clock, sink)?;
        let detection = self.detect_motion(port, motion, clock, sink)?;
        if let Detection::Motion(_) = detection {
            self.trigger(port, clock, sink)?;
        }
        Ok(detection)
    }

    // ── Phases ────────────────────────────────────────────────

    /// Flash the indicator for the arming window, then latch it on.
    pub fn arm(
        &mut self,
        port: &mut impl DigitalIoPort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.transition(SirenState::Arming, sink);
        TimedAction::bounded(self.timing.fast_flash, self.timing.arm_duration).run(
            port,
            self.led_pin,
            clock,
        )?;
        port.write(self.led_pin, PinLevel::High)?;
        self.transition(SirenState::Armed, sink);
        sink.emit(&AppEvent::Armed);
        Ok(())
    }

    /// Block until a non-zero motion event arrives.
    ///
    /// Zero-valued events are logged and skipped. A missing device runs
    /// the slow heartbeat on the indicator, which only ends on interruption.
    pub fn detect_motion(
        &mut self,
        port: &mut impl DigitalIoPort,
        motion: &mut impl MotionPort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<Detection> {
        motion.discard_pending();

        loop {
            match motion.next_event() {
                Ok(event) => {
                    sink.emit(&AppEvent::MotionEvent { value: event.value });
                    if event.is_motion() {
                        sink.emit(&AppEvent::MotionDetected { value: event.value });
                        return Ok(Detection::Motion(event.value));
                    }
                }
                Err(Error::Motion(MotionError::DeviceNotFound(device))) => {
                    warn!("Motion device {} not found, running heartbeat", device);
                    sink.emit(&AppEvent::DegradedMode { device });
                    TimedAction::forever(self.timing.slow_flash).run(port, self.led_pin, clock)?;
                    return Ok(Detection::Degraded);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Snooze, then sound the siren for its fixed duration.
    pub fn trigger(
        &mut self,
        port: &mut impl DigitalIoPort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.transition(SirenState::Triggered, sink);
        clock.sleep(self.timing.snooze)?;

        debug!("Setting relay pin to HIGH");
        port.write(self.relay_pin, PinLevel::High)?;
        sink.emit(&AppEvent::SirenOn);
        clock.sleep(self.timing.siren_duration)?;

        debug!("Setting relay pin to LOW");
        port.write(self.relay_pin, PinLevel::Low)?;
        sink.emit(&AppEvent::SirenOff);
        Ok(())
    }

    fn transition(&mut self, to: SirenState, sink: &mut impl EventSink) {
        if self.state != to {
            let from = self.state;
            self.state = to;
            sink.emit(&AppEvent::SirenChanged { from, to });
        }
    }
}

/// Force relay and indicator LOW and release the port.
///
/// Best effort: individual failures are logged and skipped so the sequence
/// always runs to the end. Safe to call any number of times.
pub fn safe_state<P: DigitalIoPort + ?Sized>(port: &mut P, relay_pin: u8, led_pin: u8) {
    for pin in [relay_pin, led_pin] {
        if let Err(e) = port.write(pin, PinLevel::Low) {
            debug!("Cleanup: forcing pin {} LOW failed: {}", pin, e);
        }
    }
    if let Err(e) = port.release_all() {
        debug!("Cleanup: GPIO release failed: {}", e);
    }
    info!("Siren outputs returned to safe state");
}
