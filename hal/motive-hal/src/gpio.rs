//! Digital and PWM pin abstractions
//!
//! Pins are addressed by number on the transport, the way a firmata-style
//! board exposes them, rather than by owned pin types.

use crate::TransportError;

/// Logic level of a digital line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Level as the 0/1 value put on the wire
    pub fn as_u8(self) -> u8 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }

    /// The opposite level
    pub fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Digital output by pin number
pub trait DigitalOutput {
    /// Drive `pin` to `level`
    fn digital_write(&mut self, pin: u8, level: Level) -> Result<(), TransportError>;

    /// Drive `pin` high (logic 1)
    fn set_high(&mut self, pin: u8) -> Result<(), TransportError> {
        self.digital_write(pin, Level::High)
    }

    /// Drive `pin` low (logic 0)
    fn set_low(&mut self, pin: u8) -> Result<(), TransportError> {
        self.digital_write(pin, Level::Low)
    }
}

/// 8-bit PWM output by pin number
pub trait PwmOutput {
    /// Set the duty cycle of `pin` (0 = off, 255 = fully on)
    fn analog_write(&mut self, pin: u8, duty: u8) -> Result<(), TransportError>;
}
