//! System configuration parameters
//!
//! All tunable parameters for both alarm loops. There is no configuration
//! file: values start from [`SystemConfig::default`] and a handful can be
//! overridden from the environment (see [`SystemConfig::from_env`]).

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::pins;

/// Environment variable selecting the log level.
pub const ENV_LOG_LEVEL: &str = "ALARM_LOG_LEVEL";
/// Environment variable selecting the GPIO backend.
pub const ENV_GPIO_BACKEND: &str = "ALARM_GPIO_BACKEND";
/// Environment variable overriding the motion input device path.
pub const ENV_MOTION_DEVICE: &str = "ALARM_MOTION_DEVICE";
/// Environment variable overriding the supervised systemd unit.
pub const ENV_SERVICE_UNIT: &str = "ALARM_SERVICE_UNIT";

/// Default motion input device (a USB optical mouse used as a tripwire).
pub const DEFAULT_MOTION_DEVICE: &str = "/dev/input/by-id/usb-1bcf_USB_Optical_Mouse-event-mouse";
/// Default systemd unit controlled by the supervisor.
pub const DEFAULT_SERVICE_UNIT: &str = "alarm.service";

// ---------------------------------------------------------------------------
// Log level
// ---------------------------------------------------------------------------

/// Log level names accepted in `ALARM_LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Case-insensitive parse of the level name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARNING" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }

    /// `log` has no critical level; it collapses onto `Error`.
    pub fn filter(self) -> log::LevelFilter {
        match self {
            Self::Debug => log::LevelFilter::Debug,
            Self::Info => log::LevelFilter::Info,
            Self::Warning => log::LevelFilter::Warn,
            Self::Error | Self::Critical => log::LevelFilter::Error,
        }
    }
}

// ---------------------------------------------------------------------------
// GPIO backend
// ---------------------------------------------------------------------------

/// Which [`DigitalIoPort`](crate::app::ports::DigitalIoPort) implementation
/// the binaries compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GpioBackend {
    /// Raspberry Pi header via `rppal` (requires the `hardware` feature).
    Hardware,
    /// In-memory pins for development machines.
    Simulated,
}

impl GpioBackend {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "hardware" => Some(Self::Hardware),
            "simulated" => Some(Self::Simulated),
            _ => None,
        }
    }
}

impl Default for GpioBackend {
    fn default() -> Self {
        if cfg!(feature = "hardware") {
            Self::Hardware
        } else {
            Self::Simulated
        }
    }
}

// ---------------------------------------------------------------------------
// System configuration
// ---------------------------------------------------------------------------

/// Core system configuration
#[derive(Debug, Clone, Serialize)]
pub struct SystemConfig {
    // --- Pins (board numbering) ---
    /// Supervisor control input
    pub control_pin: u8,
    /// Siren relay output
    pub relay_pin: u8,
    /// Arm indicator output
    pub led_pin: u8,

    // --- Service supervisor timing ---
    /// Poll interval while stopped and the pin is LOW (milliseconds)
    pub idle_poll_ms: u64,
    /// Poll interval while running and the pin is HIGH (milliseconds)
    pub steady_poll_ms: u64,
    /// Wait between issuing start/stop and verifying it (milliseconds)
    pub settle_ms: u64,

    // --- Siren timing ---
    /// Total arming time with the indicator flashing (milliseconds)
    pub arm_duration_ms: u64,
    /// Half-period of the arming flash (milliseconds)
    pub fast_flash_ms: u64,
    /// Half-period of the degraded-mode heartbeat (milliseconds)
    pub slow_flash_ms: u64,
    /// Grace period between motion and siren (milliseconds)
    pub snooze_ms: u64,
    /// How long the siren sounds (milliseconds)
    pub siren_duration_ms: u64,

    // --- Adapters ---
    pub motion_device: PathBuf,
    pub service_unit: String,
    pub gpio_backend: GpioBackend,
    pub log_level: LogLevel,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Pins
            control_pin: pins::ALARM_CONTROL_PIN,
            relay_pin: pins::RELAY_PIN,
            led_pin: pins::LED_PIN,

            // Supervisor
            idle_poll_ms: 5_000,
            steady_poll_ms: 250,
            settle_ms: 1_000,

            // Siren
            arm_duration_ms: 30_000,
            fast_flash_ms: 250,
            slow_flash_ms: 650,
            snooze_ms: 1_000,
            siren_duration_ms: 5_000,

            // Adapters
            motion_device: PathBuf::from(DEFAULT_MOTION_DEVICE),
            service_unit: DEFAULT_SERVICE_UNIT.to_owned(),
            gpio_backend: GpioBackend::default(),
            log_level: LogLevel::Info,
        }
    }
}

impl SystemConfig {
    /// Defaults overridden by the process environment, validated.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through an arbitrary key lookup, validated.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            config.log_level = LogLevel::parse(&raw)
                .ok_or_else(|| Error::Config(format!("{ENV_LOG_LEVEL}: unknown level '{raw}'")))?;
        }
        if let Some(raw) = lookup(ENV_GPIO_BACKEND) {
            config.gpio_backend = GpioBackend::parse(&raw)
                .ok_or_else(|| Error::Config(format!("{ENV_GPIO_BACKEND}: unknown backend '{raw}'")))?;
        }
        if let Some(raw) = lookup(ENV_MOTION_DEVICE) {
            config.motion_device = PathBuf::from(raw);
        }
        if let Some(raw) = lookup(ENV_SERVICE_UNIT) {
            if raw.trim().is_empty() {
                return Err(Error::Config(format!("{ENV_SERVICE_UNIT}: empty unit name")));
            }
            config.service_unit = raw;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the loops cannot run with.
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("idle_poll_ms", self.idle_poll_ms),
            ("steady_poll_ms", self.steady_poll_ms),
            ("settle_ms", self.settle_ms),
            ("arm_duration_ms", self.arm_duration_ms),
            ("fast_flash_ms", self.fast_flash_ms),
            ("slow_flash_ms", self.slow_flash_ms),
            ("snooze_ms", self.snooze_ms),
            ("siren_duration_ms", self.siren_duration_ms),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, ms)| *ms == 0) {
            return Err(Error::Config(format!("{name} must be non-zero")));
        }
        if self.relay_pin == self.led_pin {
            return Err(Error::Config("relay and indicator share a pin".into()));
        }
        if self.control_pin == self.relay_pin || self.control_pin == self.led_pin {
            return Err(Error::Config("control input shares a pin with an output".into()));
        }
        if self.slow_flash_ms <= self.fast_flash_ms {
            return Err(Error::Config(
                "degraded heartbeat must be slower than the arming flash".into(),
            ));
        }
        Ok(())
    }
}
