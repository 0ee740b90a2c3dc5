//! Home alarm control library.
//!
//! Exposes the control loops, their ports and the concrete adapters so the
//! two binaries stay thin and the integration tests can drive the loops
//! with scripted hardware. Raspberry Pi and evdev code is gated behind the
//! `hardware` feature.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod termination;

pub mod adapters;
pub mod control;
