//! Application core — the two control loops, no direct I/O.
//!
//! The service supervisor keeps `alarm.service` in step with the control
//! pin; the siren loop arms, waits for motion and sounds the relay. All
//! interaction with hardware, systemd and time happens through the **port
//! traits** in [`ports`], keeping this layer testable without a Pi.

pub mod events;
pub mod ports;
pub mod siren;
pub mod supervisor;
