//! Cloneable handle to a single GPIO port.
//!
//! The control loop and the termination path both need the port: the loop
//! to drive pins, the SIGTERM handler to force them safe. Each clone locks
//! the same underlying port for the duration of one call.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::app::ports::{DigitalIoPort, Direction, PinLevel, Pull};
use crate::error::Result;

pub struct SharedPort<P> {
    inner: Arc<Mutex<P>>,
}

impl<P> SharedPort<P> {
    pub fn new(port: P) -> Self {
        Self {
            inner: Arc::new(Mutex::new(port)),
        }
    }

    /// Run `f` with exclusive access to the port.
    pub fn with<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<P> Clone for SharedPort<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: DigitalIoPort> DigitalIoPort for SharedPort<P> {
    fn configure(&mut self, pin: u8, direction: Direction, pull: Pull, initial: PinLevel) -> Result<()> {
        self.inner.lock().configure(pin, direction, pull, initial)
    }

    fn read(&mut self, pin: u8) -> Result<PinLevel> {
        self.inner.lock().read(pin)
    }

    fn write(&mut self, pin: u8, level: PinLevel) -> Result<()> {
        self.inner.lock().write(pin, level)
    }

    fn release_all(&mut self) -> Result<()> {
        self.inner.lock().release_all()
    }
}
