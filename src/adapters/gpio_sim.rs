//! Simulated GPIO port.
//!
//! In-memory stand-in for the Raspberry Pi header, selected with
//! `ALARM_GPIO_BACKEND=simulated` and used by the crate's own tests.
//! Inputs read LOW unless driven with [`SimulatedPort::drive_input`];
//! outputs remember the last level written. The last level of every line
//! survives [`release_all`](DigitalIoPort::release_all) so a caller can
//! inspect where cleanup left the pins.

use std::collections::HashMap;

use log::debug;

use crate::app::ports::{DigitalIoPort, Direction, PinLevel, Pull};
use crate::error::{GpioError, Result};

#[derive(Debug, Default)]
pub struct SimulatedPort {
    directions: HashMap<u8, Direction>,
    levels: HashMap<u8, PinLevel>,
    releases: usize,
}

impl SimulatedPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level an input pin reports, as external wiring would.
    pub fn drive_input(&mut self, pin: u8, level: PinLevel) {
        self.levels.insert(pin, level);
    }

    /// Last level seen on `pin`, if it was ever configured or driven.
    pub fn level(&self, pin: u8) -> Option<PinLevel> {
        self.levels.get(&pin).copied()
    }

    pub fn is_configured(&self, pin: u8) -> bool {
        self.directions.contains_key(&pin)
    }

    /// How many times `release_all` was called.
    pub fn releases(&self) -> usize {
        self.releases
    }
}

impl DigitalIoPort for SimulatedPort {
    fn configure(&mut self, pin: u8, direction: Direction, _pull: Pull, initial: PinLevel) -> Result<()> {
        self.directions.insert(pin, direction);
        match direction {
            Direction::Out => {
                self.levels.insert(pin, initial);
            }
            Direction::In => {
                self.levels.entry(pin).or_insert(PinLevel::Low);
            }
        }
        debug!("gpio(sim): pin {} configured as {:?}", pin, direction);
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<PinLevel> {
        if !self.directions.contains_key(&pin) {
            return Err(GpioError::NotConfigured(pin).into());
        }
        Ok(self.levels.get(&pin).copied().unwrap_or(PinLevel::Low))
    }

    fn write(&mut self, pin: u8, level: PinLevel) -> Result<()> {
        match self.directions.get(&pin) {
            Some(Direction::Out) => {
                self.levels.insert(pin, level);
                Ok(())
            }
            Some(Direction::In) => Err(GpioError::WrongDirection(pin).into()),
            None => Err(GpioError::NotConfigured(pin).into()),
        }
    }

    fn release_all(&mut self) -> Result<()> {
        self.directions.clear();
        self.releases += 1;
        Ok(())
    }
}
