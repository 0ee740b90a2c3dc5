//! Service supervisor loop against scripted pins and a mock service manager.

use std::time::Duration;

use homealarm::app::events::AppEvent;
use homealarm::app::ports::PinLevel::{High, Low};
use homealarm::app::supervisor::{ServiceState, ServiceSupervisor, release_port};
use homealarm::config::SystemConfig;
use homealarm::error::{Error, ServiceError};
use homealarm::termination::ShutdownToken;

use crate::mock_hw::{FakeClock, Harness, MockService, RecordingSink, ScriptedPort};

const IDLE: Duration = Duration::from_secs(5);
const STEADY: Duration = Duration::from_millis(250);
const SETTLE: Duration = Duration::from_secs(1);

struct Outcome {
    result: homealarm::error::Result<()>,
    supervisor: ServiceSupervisor,
    service: MockService,
    clock: FakeClock,
    sink: RecordingSink,
    harness: Harness<ScriptedPort>,
}

fn run_supervisor(
    script: Vec<homealarm::app::ports::PinLevel>,
    mut service: MockService,
    mut clock: FakeClock,
) -> Outcome {
    let config = SystemConfig::default();
    let port = ScriptedPort::new().with_input(config.control_pin, script);
    let harness = Harness::new(port, ShutdownToken::new(), |p: &mut ScriptedPort| release_port(p));

    let mut supervisor = ServiceSupervisor::from_service(&config, &mut service).unwrap();
    let mut port = harness.port.clone();
    supervisor.set_up(&mut port).unwrap();

    let mut sink = RecordingSink::new();
    let result = supervisor.run(&mut port, &mut service, &mut clock, &mut sink, &harness.coordinator);

    Outcome {
        result,
        supervisor,
        service,
        clock,
        sink,
        harness,
    }
}

// ── Stopped service, pin goes HIGH ────────────────────────────

#[test]
fn low_then_high_starts_service_once() {
    let script = [vec![Low; 5], vec![High; 6]].concat();
    let out = run_supervisor(script, MockService::new(false), FakeClock::new());

    assert!(out.result.is_ok(), "interrupt must end the loop cleanly");
    assert_eq!(out.service.starts, 1);
    assert_eq!(out.service.stops, 0);
    assert_eq!(out.supervisor.state(), ServiceState::Running);

    let expected = [vec![IDLE; 5], vec![SETTLE], vec![STEADY; 5]].concat();
    assert_eq!(out.clock.sleeps, expected);

    let polls: Vec<_> = out.clock.sleeps.iter().copied().filter(|d| *d != SETTLE).collect();
    assert_eq!(polls, [vec![IDLE; 5], vec![STEADY; 5]].concat());
}

#[test]
fn low_then_high_emits_start_sequence() {
    let script = [vec![Low; 5], vec![High; 6]].concat();
    let out = run_supervisor(script, MockService::new(false), FakeClock::new());

    assert_eq!(
        out.sink.events,
        vec![
            AppEvent::SupervisorStarted(ServiceState::Stopped),
            AppEvent::ServiceRequested(ServiceState::Running),
            AppEvent::ServiceChanged {
                from: ServiceState::Stopped,
                to: ServiceState::Running,
            },
            AppEvent::Interrupted,
        ]
    );
}

// ── Running service, pin goes LOW ─────────────────────────────

#[test]
fn high_then_low_stops_service_once() {
    let script = [vec![High; 5], vec![Low; 6]].concat();
    let out = run_supervisor(script, MockService::new(true), FakeClock::new());

    assert!(out.result.is_ok());
    assert_eq!(out.service.starts, 0);
    assert_eq!(out.service.stops, 1);
    assert!(!out.service.running());
    assert_eq!(out.supervisor.state(), ServiceState::Stopped);

    let expected = [vec![STEADY; 5], vec![SETTLE], vec![IDLE; 5]].concat();
    assert_eq!(out.clock.sleeps, expected);
}

#[test]
fn steady_high_never_touches_service() {
    let out = run_supervisor(vec![High; 20], MockService::new(true), FakeClock::new());

    assert_eq!(out.service.starts + out.service.stops, 0);
    assert_eq!(out.clock.sleeps, vec![STEADY; 20]);
    // One query at construction, none while steady.
    assert_eq!(out.service.status_queries, 1);
}

#[test]
fn flapping_pin_alternates_actions() {
    let script = vec![High, Low, High, Low];
    let out = run_supervisor(script, MockService::new(false), FakeClock::new());

    assert_eq!(out.service.starts, 2);
    assert_eq!(out.service.stops, 2);
    assert_eq!(out.clock.sleeps, vec![SETTLE; 4]);
}

// ── Verification failures ─────────────────────────────────────

#[test]
fn service_that_will_not_start_is_fatal() {
    let script = [vec![Low; 2], vec![High; 10]].concat();
    let out = run_supervisor(script, MockService::stuck(false), FakeClock::new());

    let err = out.result.unwrap_err();
    assert!(matches!(
        err,
        Error::Service(ServiceError::StateAssertion {
            expected: ServiceState::Running
        })
    ));
    // No retry after the failed verification.
    assert_eq!(out.service.starts, 1);
    assert_eq!(out.supervisor.state(), ServiceState::Stopped);
    assert_eq!(out.clock.sleeps, vec![IDLE, IDLE, SETTLE]);
    assert_eq!(out.harness.cleanup_count(), 1);
}

#[test]
fn service_that_will_not_stop_is_fatal() {
    let out = run_supervisor(vec![Low; 3], MockService::stuck(true), FakeClock::new());

    let err = out.result.unwrap_err();
    assert!(matches!(
        err,
        Error::Service(ServiceError::StateAssertion {
            expected: ServiceState::Stopped
        })
    ));
    assert_eq!(out.service.stops, 1);
    assert_eq!(out.harness.cleanup_count(), 1);
}

// ── Interruption and cleanup ──────────────────────────────────

#[test]
fn interrupt_during_settle_skips_verification() {
    let script = vec![High; 3];
    // The first sleep is the settle after the start request.
    let out = run_supervisor(script, MockService::new(false), FakeClock::interrupt_after(0));

    assert!(out.result.is_ok());
    assert_eq!(out.service.starts, 1);
    // Construction only; the interrupted settle never reaches the status check.
    assert_eq!(out.service.status_queries, 1);
    assert_eq!(out.supervisor.state(), ServiceState::Stopped);
    assert_eq!(out.harness.cleanup_count(), 1);
}

#[test]
fn cleanup_runs_exactly_once_and_releases_port() {
    let script = [vec![Low; 5], vec![High; 6]].concat();
    let out = run_supervisor(script, MockService::new(false), FakeClock::new());

    assert_eq!(out.harness.cleanup_count(), 1);
    assert_eq!(out.harness.inspect(|p| p.releases), 1);

    // A late SIGTERM still exits 0 without a second cleanup.
    out.harness.coordinator.terminate();
    assert_eq!(out.harness.cleanup_count(), 1);
    assert_eq!(out.harness.exit_code(), 0);
}

#[test]
fn supervisor_never_drives_outputs() {
    let config = SystemConfig::default();
    let out = run_supervisor(vec![Low], MockService::new(false), FakeClock::new());

    // Released by cleanup, and never written.
    assert!(!out.harness.inspect(|p| p.is_configured(config.control_pin)));
    assert!(out.harness.inspect(|p| p.writes.is_empty()));
}
