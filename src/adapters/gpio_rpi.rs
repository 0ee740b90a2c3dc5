//! Raspberry Pi GPIO port.
//!
//! Drives the 40-pin header through `rppal`. Callers address pins by board
//! number; this adapter translates to BCM lines via [`pins::board_to_bcm`].
//! Outputs are driven through the `embedded-hal` digital traits that
//! `rppal` implements, inputs are sampled the same way.
//!
//! Dropping a claimed pin restores its previous mode, so
//! [`release_all`](DigitalIoPort::release_all) simply forgets every line.

use std::collections::HashMap;

use embedded_hal::digital::{OutputPin as _, PinState};
use log::{debug, info};
use rppal::gpio::{Gpio, InputPin, OutputPin};

use crate::app::ports::{DigitalIoPort, Direction, PinLevel, Pull};
use crate::error::{Error, GpioError, Result};
use crate::pins;

enum Line {
    Input(InputPin),
    Output(OutputPin),
}

pub struct RpiPort {
    gpio: Gpio,
    lines: HashMap<u8, Line>,
}

impl RpiPort {
    /// Open the GPIO peripheral (`/dev/gpiomem`).
    pub fn open() -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| GpioError::Backend(e.to_string()))?;
        info!("gpio: Raspberry Pi header opened");
        Ok(Self {
            gpio,
            lines: HashMap::new(),
        })
    }
}

impl DigitalIoPort for RpiPort {
    fn configure(&mut self, pin: u8, direction: Direction, pull: Pull, initial: PinLevel) -> Result<()> {
        let bcm = pins::board_to_bcm(pin).ok_or(GpioError::InvalidPin(pin))?;

        // Drop any previous claim first; rppal refuses to hand out a line twice.
        self.lines.remove(&pin);
        let raw = self
            .gpio
            .get(bcm)
            .map_err(|e| GpioError::Backend(format!("board pin {pin} (BCM {bcm}): {e}")))?;

        let line = match (direction, pull) {
            (Direction::In, Pull::Up) => Line::Input(raw.into_input_pullup()),
            (Direction::In, Pull::None) => Line::Input(raw.into_input()),
            (Direction::Out, _) => Line::Output(match initial {
                PinLevel::High => raw.into_output_high(),
                PinLevel::Low => raw.into_output_low(),
            }),
        };
        self.lines.insert(pin, line);
        debug!("gpio: board pin {} (BCM {}) configured as {:?}", pin, bcm, direction);
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<PinLevel> {
        match self.lines.get_mut(&pin) {
            Some(Line::Input(line)) => embedded_hal::digital::InputPin::is_high(line)
                .map(PinLevel::from)
                .map_err(|_| Error::from(GpioError::ReadFailed(pin))),
            Some(Line::Output(line)) => Ok(PinLevel::from(line.is_set_high())),
            None => Err(GpioError::NotConfigured(pin).into()),
        }
    }

    fn write(&mut self, pin: u8, level: PinLevel) -> Result<()> {
        match self.lines.get_mut(&pin) {
            Some(Line::Output(line)) => line
                .set_state(PinState::from(level))
                .map_err(|_| Error::from(GpioError::WriteFailed { pin, level })),
            Some(Line::Input(_)) => Err(GpioError::WrongDirection(pin).into()),
            None => Err(GpioError::NotConfigured(pin).into()),
        }
    }

    fn release_all(&mut self) -> Result<()> {
        if !self.lines.is_empty() {
            debug!("gpio: releasing {} line(s)", self.lines.len());
        }
        self.lines.clear();
        Ok(())
    }
}
