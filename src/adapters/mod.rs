//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements      | Connects to                    |
//! |----------------|-----------------|--------------------------------|
//! | `gpio_rpi`     | DigitalIoPort   | Raspberry Pi header (`rppal`)  |
//! | `gpio_sim`     | DigitalIoPort   | In-memory pin levels           |
//! | `shared_port`  | DigitalIoPort   | Any port, behind a mutex       |
//! | `motion`       | MotionPort      | Linux evdev input device       |
//! | `systemctl`    | ServicePort     | systemd via `systemctl`        |
//! | `time`         | Clock           | `Instant` + shutdown token     |
//! | `log_sink`     | EventSink       | `log` facade / `env_logger`    |
//! | `signals`      | —               | SIGINT / SIGTERM watcher       |

#[cfg(feature = "hardware")]
pub mod gpio_rpi;
pub mod gpio_sim;
pub mod log_sink;
pub mod motion;
pub mod shared_port;
pub mod signals;
pub mod systemctl;
pub mod time;

use crate::app::ports::{DigitalIoPort, MotionPort};
use crate::config::{GpioBackend, SystemConfig};
use crate::error::Result;
use crate::termination::ShutdownToken;

/// Boxed GPIO port selected by configuration.
pub type BoxedPort = Box<dyn DigitalIoPort + Send>;

/// Boxed motion sensor selected by build features.
pub type BoxedMotion = Box<dyn MotionPort + Send>;

/// Open the GPIO backend named in `config`.
pub fn open_port(config: &SystemConfig) -> Result<BoxedPort> {
    match config.gpio_backend {
        #[cfg(feature = "hardware")]
        GpioBackend::Hardware => Ok(Box::new(gpio_rpi::RpiPort::open()?)),
        #[cfg(not(feature = "hardware"))]
        GpioBackend::Hardware => Err(crate::error::Error::Config(
            "hardware GPIO requested but this build has no hardware support".into(),
        )),
        GpioBackend::Simulated => {
            log::warn!("gpio: using simulated backend, no pins will move");
            Ok(Box::new(gpio_sim::SimulatedPort::new()))
        }
    }
}

/// Motion sensor for `config.motion_device`. The device itself is opened
/// on the first wait.
pub fn open_motion(config: &SystemConfig, token: &ShutdownToken) -> BoxedMotion {
    #[cfg(feature = "hardware")]
    {
        Box::new(motion::EvdevMotionSensor::new(&config.motion_device, token.clone()))
    }
    #[cfg(not(feature = "hardware"))]
    {
        let _ = token;
        Box::new(motion::UnavailableMotionSensor::new(&config.motion_device))
    }
}
