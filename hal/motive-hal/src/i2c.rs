//! I2C bus abstractions
//!
//! Provides the write side of an I2C master, which is all the PWM-chip
//! backend needs.

use crate::TransportError;

/// I2C register-burst writer
///
/// The payload is a sequence of 16-bit words rather than bytes. Element 0
/// is the register address; the remaining words are the burst payload.
/// Tick values are passed through unmasked and the transport narrows them
/// to bus bytes, so implementations over a byte-oriented bus must keep only
/// the low byte of each word.
pub trait I2cWrite {
    /// Write `words` to the device at `address` in a single transaction
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `words` - Register address followed by the burst payload
    fn i2c_write(&mut self, address: u8, words: &[u16]) -> Result<(), TransportError>;
}
