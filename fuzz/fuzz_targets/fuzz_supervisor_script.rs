//! Fuzz target: service supervisor
//!
//! Byte 0 picks the initial service state; every following byte is one
//! poll (bit 0 = control pin level, bit 1 = service ignores the action).
//! Drives `ServiceSupervisor::step` once per poll and verifies:
//! - No panics
//! - The only error is a state assertion raised by an ignored action
//! - The confirmed state always matches the service after a successful step
//!
//! cargo fuzz run fuzz_supervisor_script

#![no_main]

use std::time::Duration;

use homealarm::app::events::AppEvent;
use homealarm::app::ports::{Clock, DigitalIoPort, Direction, EventSink, PinLevel, Pull, ServicePort};
use homealarm::app::supervisor::{ServiceState, ServiceSupervisor};
use homealarm::config::SystemConfig;
use homealarm::error::{Error, Result, ServiceError};
use libfuzzer_sys::fuzz_target;

/// Control pin that reports one level, then the end of the script.
struct OnePoll(Option<PinLevel>);

impl DigitalIoPort for OnePoll {
    fn configure(&mut self, _: u8, _: Direction, _: Pull, _: PinLevel) -> Result<()> {
        Ok(())
    }

    fn read(&mut self, _pin: u8) -> Result<PinLevel> {
        self.0.take().ok_or(Error::Interrupted)
    }

    fn write(&mut self, _: u8, _: PinLevel) -> Result<()> {
        Ok(())
    }

    fn release_all(&mut self) -> Result<()> {
        Ok(())
    }
}

struct Service {
    running: bool,
    ignore: bool,
}

impl ServicePort for Service {
    fn start_service(&mut self) -> Result<()> {
        if !self.ignore {
            self.running = true;
        }
        Ok(())
    }

    fn stop_service(&mut self) -> Result<()> {
        if !self.ignore {
            self.running = false;
        }
        Ok(())
    }

    fn service_status(&mut self) -> Result<i32> {
        Ok(if self.running { 0 } else { 3 })
    }
}

struct NoWait;

impl Clock for NoWait {
    fn now(&self) -> Duration {
        Duration::ZERO
    }

    fn sleep(&mut self, _: Duration) -> Result<()> {
        Ok(())
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let config = SystemConfig::default();
    let initial = ServiceState::from_running(first & 1 != 0);
    let mut supervisor = ServiceSupervisor::new(&config, initial);
    let mut running = initial == ServiceState::Running;

    for &byte in rest {
        let mut port = OnePoll(Some(PinLevel::from(byte & 1 != 0)));
        let mut service = Service {
            running,
            ignore: byte & 0b10 != 0,
        };

        match supervisor.step(&mut port, &mut service, &mut NoWait, &mut Discard) {
            Ok(_) => {
                running = service.running;
                assert_eq!(supervisor.state(), ServiceState::from_running(running));
            }
            Err(Error::Service(ServiceError::StateAssertion { .. })) => {
                assert!(service.ignore);
                return;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
});
