//! Motion sensor adapters.
//!
//! | Adapter                    | Build                 | Behaviour                        |
//! |----------------------------|-----------------------|----------------------------------|
//! | `EvdevMotionSensor`        | `hardware` feature    | Linux input device via `evdev`   |
//! | `UnavailableMotionSensor`  | always                | reports the device as missing    |
//!
//! The evdev adapter opens the device on the first wait. A reader thread
//! blocks on the device and forwards event values over a channel; the
//! control loop waits on that channel in short slices so the shutdown
//! token is observed even when no events arrive.

use std::path::{Path, PathBuf};

use crate::app::ports::{MotionEvent, MotionPort};
use crate::error::{MotionError, Result};

/// Stand-in used when the crate is built without device support.
#[derive(Debug, Clone)]
pub struct UnavailableMotionSensor {
    device: PathBuf,
}

impl UnavailableMotionSensor {
    pub fn new(device: impl AsRef<Path>) -> Self {
        Self {
            device: device.as_ref().to_path_buf(),
        }
    }
}

impl MotionPort for UnavailableMotionSensor {
    fn next_event(&mut self) -> Result<MotionEvent> {
        Err(MotionError::DeviceNotFound(self.device.display().to_string()).into())
    }
}

#[cfg(feature = "hardware")]
pub use evdev_sensor::EvdevMotionSensor;

#[cfg(feature = "hardware")]
mod evdev_sensor {
    use std::io;
    use std::path::{Path, PathBuf};
    use std::thread;
    use std::time::Duration;

    use flume::{Receiver, RecvTimeoutError, Sender};
    use log::{debug, info, warn};

    use crate::app::ports::{MotionEvent, MotionPort};
    use crate::error::{Error, MotionError, Result};
    use crate::termination::ShutdownToken;

    /// How long one channel wait lasts before the token is re-checked.
    const WAIT_SLICE: Duration = Duration::from_millis(100);

    pub struct EvdevMotionSensor {
        device: PathBuf,
        token: ShutdownToken,
        events: Option<Receiver<io::Result<i32>>>,
    }

    impl EvdevMotionSensor {
        pub fn new(device: impl AsRef<Path>, token: ShutdownToken) -> Self {
            Self {
                device: device.as_ref().to_path_buf(),
                token,
                events: None,
            }
        }

        fn open(&mut self) -> Result<&Receiver<io::Result<i32>>> {
            if self.events.is_none() {
                let name = self.device.display().to_string();
                if !self.device.exists() {
                    return Err(MotionError::DeviceNotFound(name).into());
                }
                let device = evdev::Device::open(&self.device).map_err(|e| match e.kind() {
                    io::ErrorKind::NotFound => MotionError::DeviceNotFound(name.clone()),
                    _ => MotionError::Io(e),
                })?;
                info!("motion: opened {}", name);

                let (tx, rx) = flume::unbounded();
                thread::Builder::new()
                    .name("motion-reader".into())
                    .spawn(move || read_events(device, &tx))
                    .map_err(MotionError::Io)?;
                self.events = Some(rx);
            }
            self.events
                .as_ref()
                .ok_or_else(|| MotionError::Disconnected.into())
        }
    }

    /// Reader thread body: forward every event value until the device
    /// fails or the receiving side is gone.
    fn read_events(mut device: evdev::Device, tx: &Sender<io::Result<i32>>) {
        loop {
            match device.fetch_events() {
                Ok(events) => {
                    for event in events {
                        if tx.send(Ok(event.value())).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => {
                    warn!("motion: device read failed: {}", e);
                    let _ = tx.send(Err(e));
                    return;
                }
            }
        }
    }

    impl MotionPort for EvdevMotionSensor {
        fn next_event(&mut self) -> Result<MotionEvent> {
            let token = self.token.clone();
            let events = self.open()?;

            loop {
                if token.is_cancelled() {
                    return Err(Error::Interrupted);
                }
                match events.recv_timeout(WAIT_SLICE) {
                    Ok(Ok(value)) => return Ok(MotionEvent { value }),
                    Ok(Err(e)) => return Err(MotionError::Io(e).into()),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => {
                        return Err(MotionError::Disconnected.into());
                    }
                }
            }
        }

        fn discard_pending(&mut self) {
            if let Some(events) = &self.events {
                let stale = events.drain().count();
                if stale > 0 {
                    debug!("motion: discarded {} buffered event(s)", stale);
                }
            }
        }
    }
}
