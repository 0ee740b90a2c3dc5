//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events through the `log`
//! facade, and owns the process logger setup (`env_logger` to stderr, which
//! journald captures when the binaries run under systemd).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::config::LogLevel;

/// Install the global logger at `level`. Later calls are ignored.
pub fn init_logger(level: LogLevel) {
    let _ = env_logger::Builder::new()
        .filter_level(level.filter())
        .format_timestamp_millis()
        .try_init();
}

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::SupervisorStarted(state) => {
                info!("START | service={:?}", state);
            }
            AppEvent::ServiceRequested(state) => {
                info!("SERVICE | control pin requests {:?}", state);
            }
            AppEvent::ServiceChanged { from, to } => {
                info!("SERVICE | {:?} -> {:?}", from, to);
            }
            AppEvent::SirenChanged { from, to } => {
                debug!("SIREN | {:?} -> {:?}", from, to);
            }
            AppEvent::Armed => {
                info!("SIREN | armed");
            }
            AppEvent::DegradedMode { device } => {
                warn!("SIREN | motion device {} missing, heartbeat only", device);
            }
            AppEvent::MotionEvent { value } => {
                debug!("MOTION | event value={}", value);
            }
            AppEvent::MotionDetected { value } => {
                info!("MOTION | detected value={}", value);
            }
            AppEvent::SirenOn => {
                info!("SIREN | on");
            }
            AppEvent::SirenOff => {
                info!("SIREN | off");
            }
            AppEvent::Interrupted => {
                info!("SHUTDOWN | interrupted");
            }
        }
    }
}
