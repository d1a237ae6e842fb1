//! embedded-hal bridges
//!
//! Lets a chip HAL's blocking I2C bus serve as the [`I2cWrite`] part of a
//! transport.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use heapless::Vec;
use motive_hal::{I2cWrite, TransportError};

/// Longest burst the motor drivers send (register + two 16-bit ticks)
pub const MAX_BURST: usize = 8;

/// [`I2cWrite`] over an embedded-hal I2C bus
///
/// Each word is narrowed to its low byte on the way out, which is what the
/// PCA9685 expects for the unmasked low halves of its tick counts.
pub struct I2cBus<I> {
    bus: I,
}

impl<I> I2cBus<I> {
    pub fn new(bus: I) -> Self {
        Self { bus }
    }

    pub fn release(self) -> I {
        self.bus
    }
}

fn map_error(kind: ErrorKind, address: u8) -> TransportError {
    match kind {
        ErrorKind::NoAcknowledge(_) => TransportError::Nack(address),
        _ => TransportError::Bus,
    }
}

impl<I: I2c> I2cWrite for I2cBus<I> {
    fn i2c_write(&mut self, address: u8, words: &[u16]) -> Result<(), TransportError> {
        let mut bytes: Vec<u8, MAX_BURST> = Vec::new();
        for word in words {
            bytes
                .push(*word as u8)
                .map_err(|_| TransportError::Bus)?;
        }
        self.bus
            .write(address, &bytes)
            .map_err(|e| map_error(e.kind(), address))
    }
}
