//! Analog input abstraction

use crate::TransportError;

/// Analog input by channel number
///
/// Channel numbers are the `n` of an `A<n>` pin name.
pub trait AnalogInput {
    /// Sample the raw value of analog channel `channel`
    fn analog_read(&mut self, channel: u8) -> Result<u16, TransportError>;
}
