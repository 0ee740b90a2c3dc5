//! Alarm service supervisor.
//!
//! Keeps `alarm.service` in step with the control input: pin HIGH means the
//! service should run, LOW means it should not.
//!
//! ```text
//!   control pin ──► ServiceSupervisor ──► systemctl restart/stop/status
//!                        │
//!              SystemClock (5 s idle / 0.25 s steady poll)
//! ```
//!
//! Exits 0 on SIGINT/SIGTERM, non-zero when the service does not reach
//! the requested state.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};

use homealarm::adapters::log_sink::{LogEventSink, init_logger};
use homealarm::adapters::shared_port::SharedPort;
use homealarm::adapters::systemctl::SystemctlAdapter;
use homealarm::adapters::time::SystemClock;
use homealarm::adapters::{BoxedPort, open_port, signals};
use homealarm::app::supervisor::{ServiceSupervisor, release_port};
use homealarm::config::SystemConfig;
use homealarm::termination::{ShutdownToken, TerminationCoordinator};

/// Query the service once, then claim the control input.
fn set_up(
    config: &SystemConfig,
    port: &mut SharedPort<BoxedPort>,
    service: &mut SystemctlAdapter,
) -> homealarm::error::Result<ServiceSupervisor> {
    let supervisor = ServiceSupervisor::from_service(config, service)?;
    supervisor.set_up(port)?;
    Ok(supervisor)
}

fn main() -> Result<()> {
    // ── 1. Config + logging ───────────────────────────────────
    let config = SystemConfig::from_env().context("invalid configuration")?;
    init_logger(config.log_level);
    info!("alarm-controller v{}", env!("CARGO_PKG_VERSION"));
    debug!("config: {}", serde_json::to_string(&config)?);

    // ── 2. Port + termination path ────────────────────────────
    let token = ShutdownToken::new();
    let mut port = SharedPort::new(open_port(&config).context("opening GPIO")?);
    let cleanup_port = port.clone();
    let coordinator = Arc::new(TerminationCoordinator::new(token.clone(), move || {
        cleanup_port.with(|p| release_port(p));
    }));
    signals::install(Arc::clone(&coordinator)).context("installing signal watcher")?;

    // ── 3. Supervisor ─────────────────────────────────────────
    let mut service = SystemctlAdapter::new(config.service_unit.clone());
    let mut supervisor = match set_up(&config, &mut port, &mut service) {
        Ok(supervisor) => supervisor,
        Err(e) => {
            coordinator.shutdown();
            return Err(e).context("supervisor setup");
        }
    };
    info!(
        "Supervising {} on pin {} (service {:?})",
        config.service_unit,
        config.control_pin,
        supervisor.state()
    );

    // ── 4. Run until interrupted ──────────────────────────────
    let mut clock = SystemClock::new(token);
    let mut sink = LogEventSink::new();
    supervisor.run(&mut port, &mut service, &mut clock, &mut sink, &coordinator)?;

    info!("alarm-controller stopped");
    Ok(())
}
