//! Shift-register direction backend
//!
//! Boards like the Adafruit motor shield v1 route every H-bridge's
//! direction inputs through one 74HC595. Each motor owns two bits: `a` is
//! set for forward and `b` for reverse. Several motors share the latched
//! byte, so every update starts from the board's cached value and only
//! touches the motor's own bits. Speed stays on a plain PWM pin.

use motive_core::config::{BitPositions, RegisterPins};
use motive_core::{Direction, MotorError, PinMap};
use motive_hal::{BitOrder, DigitalOutput, Level, PwmOutput, ShiftOut, Transport};

use super::encoder::Encoder;
use crate::board::Board;

/// Mask for bit `n`; positions past bit 7 select nothing
fn bit(n: u8) -> u8 {
    1u8.checked_shl(u32::from(n)).unwrap_or(0)
}

/// Byte to latch for `direction`, keeping every other motor's bits
pub fn register_byte(current: u8, bits: BitPositions, direction: Direction) -> u8 {
    let mask = bit(bits.a) | bit(bits.b);
    let set = match direction {
        Direction::Forward => bits.a,
        Direction::Reverse => bits.b,
    };
    (current & !mask) | bit(set)
}

/// Motor whose direction lines sit behind a shift register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftRegisterEncoder {
    register: RegisterPins,
    bits: BitPositions,
}

impl ShiftRegisterEncoder {
    pub fn new(register: RegisterPins, bits: BitPositions) -> Self {
        Self { register, bits }
    }

    pub fn register(&self) -> RegisterPins {
        self.register
    }

    pub fn bits(&self) -> BitPositions {
        self.bits
    }

    /// Latch `value` into the register
    fn latch<T: Transport>(&self, board: &mut Board<T>, value: u8) -> Result<(), MotorError> {
        let RegisterPins { data, clock, latch } = self.register;
        let io = board.io_mut();
        io.digital_write(latch, Level::Low)?;
        io.shift_out(data, clock, BitOrder::MsbFirst, value)?;
        io.digital_write(latch, Level::High)?;
        Ok(())
    }
}

impl Encoder for ShiftRegisterEncoder {
    fn write_duty<T: Transport>(
        &self,
        board: &mut Board<T>,
        pin: u8,
        duty: u8,
    ) -> Result<(), MotorError> {
        board.io_mut().analog_write(pin, duty)?;
        Ok(())
    }

    fn write_line<T: Transport>(
        &self,
        board: &mut Board<T>,
        pin: u8,
        level: Level,
    ) -> Result<(), MotorError> {
        board.io_mut().digital_write(pin, level)?;
        Ok(())
    }

    fn write_direction<T: Transport>(
        &self,
        board: &mut Board<T>,
        _pins: &PinMap,
        direction: Direction,
    ) -> Result<(), MotorError> {
        let value = register_byte(board.register_value(self.register), self.bits, direction);
        trace!("shift register latch={} value={:#x}", self.register.latch, value);
        // Cached even if the latch below fails
        board.store_register_value(self.register, value)?;
        self.latch(board, value)
    }

    fn has_direction(&self, _pins: &PinMap) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, MockTransport};

    const REGISTER: RegisterPins = RegisterPins {
        data: 8,
        clock: 4,
        latch: 12,
    };
    const M1: BitPositions = BitPositions { a: 2, b: 3 };
    const M2: BitPositions = BitPositions { a: 1, b: 4 };

    #[test]
    fn test_register_byte() {
        assert_eq!(register_byte(0, M1, Direction::Forward), 0x04);
        assert_eq!(register_byte(0, M1, Direction::Reverse), 0x08);
        assert_eq!(register_byte(0x04, M1, Direction::Reverse), 0x08);
        // Other motor's bits survive
        assert_eq!(register_byte(0x12, M1, Direction::Forward), 0x16);
    }

    #[test]
    fn test_register_byte_ignores_bits_past_seven() {
        let wide = BitPositions { a: 8, b: 3 };
        assert_eq!(register_byte(0x0C, wide, Direction::Forward), 0x04);
        assert_eq!(register_byte(0x00, wide, Direction::Reverse), 0x08);
    }

    #[test]
    fn test_latch_sequence() {
        let mut board = Board::new(MockTransport::new());
        let enc = ShiftRegisterEncoder::new(REGISTER, M1);
        let pins = PinMap::NonDirectional { pwm: 11 };
        enc.write_direction(&mut board, &pins, Direction::Forward)
            .unwrap();
        assert_eq!(
            board.io().calls,
            [
                Call::Digital(12, 0),
                Call::Shift {
                    data: 8,
                    clock: 4,
                    order: BitOrder::MsbFirst,
                    value: 0x04
                },
                Call::Digital(12, 1),
            ]
        );
    }

    #[test]
    fn test_shared_register() {
        let mut board = Board::new(MockTransport::new());
        let pins = PinMap::NonDirectional { pwm: 11 };
        let one = ShiftRegisterEncoder::new(REGISTER, M1);
        let two = ShiftRegisterEncoder::new(REGISTER, M2);

        one.write_direction(&mut board, &pins, Direction::Forward)
            .unwrap();
        two.write_direction(&mut board, &pins, Direction::Reverse)
            .unwrap();
        one.write_direction(&mut board, &pins, Direction::Reverse)
            .unwrap();

        assert_eq!(board.io().shifts(), [0x04, 0x14, 0x18]);
        assert_eq!(board.register_value(REGISTER), 0x18);
    }

    #[test]
    fn test_always_has_direction() {
        let enc = ShiftRegisterEncoder::new(REGISTER, M1);
        assert!(enc.has_direction(&PinMap::NonDirectional { pwm: 11 }));
    }
}
