//! Shift register clocking
//!
//! Serial-in/parallel-out registers (74HC595 style) are driven by clocking
//! one byte out on a data/clock pin pair. Latching is left to the caller,
//! which toggles the latch pin with [`crate::DigitalOutput`].

use crate::TransportError;

/// Order in which the bits of a byte are clocked out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Bit 7 first
    #[default]
    MsbFirst,
    /// Bit 0 first
    LsbFirst,
}

/// Bit-banged shift-out
pub trait ShiftOut {
    /// Clock `value` out on `data_pin`/`clock_pin`
    fn shift_out(
        &mut self,
        data_pin: u8,
        clock_pin: u8,
        order: BitOrder,
        value: u8,
    ) -> Result<(), TransportError>;
}
