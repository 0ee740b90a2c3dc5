//! Motion siren.
//!
//! ```text
//!   ┌──────────┐ 30 s fast flash ┌───────┐ motion ≠ 0 ┌───────────┐
//!   │  Arming  │────────────────►│ Armed │───────────►│ Triggered │
//!   └──────────┘                 └───────┘            └───────────┘
//!        ▲        1 s snooze, relay HIGH 5 s, relay LOW     │
//!        └──────────────────────────────────────────────────┘
//! ```
//!
//! With no motion device the indicator runs a slow heartbeat until the
//! process is stopped. Relay and indicator are forced LOW on exit.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};

use homealarm::adapters::log_sink::{LogEventSink, init_logger};
use homealarm::adapters::shared_port::SharedPort;
use homealarm::adapters::time::SystemClock;
use homealarm::adapters::{open_motion, open_port, signals};
use homealarm::app::siren::{SirenLoop, safe_state};
use homealarm::config::SystemConfig;
use homealarm::termination::{ShutdownToken, TerminationCoordinator};

fn main() -> Result<()> {
    // ── 1. Config + logging ───────────────────────────────────
    let config = SystemConfig::from_env().context("invalid configuration")?;
    init_logger(config.log_level);
    info!("alarm-siren v{}", env!("CARGO_PKG_VERSION"));
    debug!("config: {}", serde_json::to_string(&config)?);

    // ── 2. Port + termination path ────────────────────────────
    let token = ShutdownToken::new();
    let mut port = SharedPort::new(open_port(&config).context("opening GPIO")?);
    let cleanup_port = port.clone();
    let (relay_pin, led_pin) = (config.relay_pin, config.led_pin);
    let coordinator = Arc::new(TerminationCoordinator::new(token.clone(), move || {
        cleanup_port.with(|p| safe_state(p, relay_pin, led_pin));
    }));
    signals::install(Arc::clone(&coordinator)).context("installing signal watcher")?;

    // ── 3. Siren loop ─────────────────────────────────────────
    let mut siren = SirenLoop::new(&config);
    if let Err(e) = siren.set_up(&mut port) {
        coordinator.shutdown();
        return Err(e).context("siren setup");
    }
    info!(
        "Relay on pin {}, indicator on pin {}, motion from {}",
        relay_pin,
        led_pin,
        config.motion_device.display()
    );

    // ── 4. Run until interrupted ──────────────────────────────
    let mut motion = open_motion(&config, &token);
    let mut clock = SystemClock::new(token);
    let mut sink = LogEventSink::new();
    siren.run(&mut port, &mut motion, &mut clock, &mut sink, &coordinator)?;

    info!("alarm-siren stopped");
    Ok(())
}
