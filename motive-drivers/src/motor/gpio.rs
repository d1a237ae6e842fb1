//! Direct GPIO/PWM backend

use motive_core::MotorError;
use motive_hal::{DigitalOutput, Level, PwmOutput, Transport};

use super::encoder::Encoder;
use crate::board::Board;

/// Motor pins wired straight to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GpioEncoder;

impl Encoder for GpioEncoder {
    fn write_duty<T: Transport>(
        &self,
        board: &mut Board<T>,
        pin: u8,
        duty: u8,
    ) -> Result<(), MotorError> {
        trace!("analog_write pin={} duty={}", pin, duty);
        board.io_mut().analog_write(pin, duty)?;
        Ok(())
    }

    fn write_line<T: Transport>(
        &self,
        board: &mut Board<T>,
        pin: u8,
        level: Level,
    ) -> Result<(), MotorError> {
        trace!("digital_write pin={} level={}", pin, level.as_u8());
        board.io_mut().digital_write(pin, level)?;
        Ok(())
    }
}
