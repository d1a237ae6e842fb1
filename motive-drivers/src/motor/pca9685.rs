//! PCA9685 16-channel I2C PWM backend
//!
//! Each channel has a 12-bit on/off window (0-4095 ticks). An 8-bit duty
//! maps to `on = 0, off = duty * 16`, so full duty (255) lands on 4080
//! rather than the chip's dedicated full-on bit.
//!
//! Words handed to the transport are the register address followed by the
//! raw low/high halves of each tick count. The low half is not masked; the
//! I2C layer narrows every word to a byte.
//!
//! A chip is brought up the first time any motor writes to it.

use motive_core::MotorError;
use motive_hal::{I2cWrite, Level, Transport};

use super::encoder::Encoder;
use crate::board::Board;

/// Register addresses
pub mod reg {
    /// Mode register 1
    pub const MODE1: u16 = 0x00;
    /// PWM frequency prescaler
    pub const PRESCALE: u16 = 0xFE;
    /// First channel's ON_L register; channel `c` starts at `LED0_ON_L + 4c`
    pub const LED0_ON_L: u16 = 0x06;
}

/// Ticks per unit of 8-bit duty
pub const TICKS_PER_DUTY: u16 = 16;

/// Duty used to split the brake window between the two direction channels
pub const BRAKE_SPLIT_DUTY: u8 = 127;

/// Chip bring-up: reset, sleep, set the prescaler, wake, restart with
/// auto-increment
const INIT_SEQUENCE: [[u16; 2]; 5] = [
    [reg::MODE1, 0x00],
    [reg::MODE1, 0x10],
    [reg::PRESCALE, 0x70],
    [reg::MODE1, 0x00],
    [reg::MODE1, 0xA1],
];

/// First register of `channel`'s on/off window
pub fn channel_register(channel: u8) -> u16 {
    reg::LED0_ON_L + 4 * channel as u16
}

/// Tick count for an 8-bit duty
pub fn duty_ticks(duty: u8) -> u16 {
    duty as u16 * TICKS_PER_DUTY
}

/// Register burst setting `channel`'s on/off window
pub fn channel_burst(channel: u8, on: u16, off: u16) -> [u16; 5] {
    [channel_register(channel), on, on >> 8, off, off >> 8]
}

/// Motor channels on a PCA9685
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pca9685Encoder {
    address: u8,
}

impl Pca9685Encoder {
    pub fn new(address: u8) -> Self {
        Self { address }
    }

    /// 7-bit I2C address of the chip
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Set a channel's window from two 8-bit duty points
    pub fn write_window<T: Transport>(
        &self,
        board: &mut Board<T>,
        channel: u8,
        on_duty: u8,
        off_duty: u8,
    ) -> Result<(), MotorError> {
        self.init(board)?;
        let burst = channel_burst(channel, duty_ticks(on_duty), duty_ticks(off_duty));
        trace!("pca9685 {:#x} channel={} burst={}", self.address, channel, burst);
        board.io_mut().i2c_write(self.address, &burst)?;
        Ok(())
    }
}

impl Encoder for Pca9685Encoder {
    fn write_duty<T: Transport>(
        &self,
        board: &mut Board<T>,
        pin: u8,
        duty: u8,
    ) -> Result<(), MotorError> {
        self.write_window(board, pin, 0, duty)
    }

    fn write_line<T: Transport>(
        &self,
        board: &mut Board<T>,
        pin: u8,
        level: Level,
    ) -> Result<(), MotorError> {
        let duty = match level {
            Level::High => u8::MAX,
            Level::Low => 0,
        };
        self.write_duty(board, pin, duty)
    }

    /// Overlapping windows on the two direction channels
    fn write_brake_lines<T: Transport>(
        &self,
        board: &mut Board<T>,
        dir: u8,
        cdir: u8,
    ) -> Result<(), MotorError> {
        self.write_window(board, dir, 0, BRAKE_SPLIT_DUTY)?;
        self.write_window(board, cdir, BRAKE_SPLIT_DUTY, u8::MAX)
    }

    fn init<T: Transport>(&self, board: &mut Board<T>) -> Result<(), MotorError> {
        if !board.mark_chip_initialized(self.address)? {
            return Ok(());
        }
        debug!("pca9685 {:#x} init", self.address);
        for words in INIT_SEQUENCE.iter() {
            board.io_mut().i2c_write(self.address, words)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use alloc::vec;

    #[test]
    fn test_channel_register() {
        assert_eq!(channel_register(0), 0x06);
        assert_eq!(channel_register(8), 38);
        assert_eq!(channel_register(15), 66);
    }

    #[test]
    fn test_full_duty_burst() {
        // 255 * 16 = 4080: low word unmasked, high byte 15
        assert_eq!(channel_burst(8, 0, duty_ticks(255)), [38, 0, 0, 4080, 15]);
    }

    #[test]
    fn test_mid_duty_burst() {
        assert_eq!(channel_burst(8, 0, duty_ticks(128)), [38, 0, 0, 2048, 8]);
    }

    fn ready_board(pca: &Pca9685Encoder) -> Board<MockTransport> {
        let mut board = Board::new(MockTransport::new());
        pca.init(&mut board).unwrap();
        board.io_mut().clear();
        board
    }

    #[test]
    fn test_line_levels() {
        let pca = Pca9685Encoder::new(0x60);
        let mut board = ready_board(&pca);
        pca.write_line(&mut board, 9, Level::High).unwrap();
        pca.write_line(&mut board, 9, Level::Low).unwrap();
        assert_eq!(
            board.io().i2c(),
            [
                (0x60, vec![42, 0, 0, 4080, 15]),
                (0x60, vec![42, 0, 0, 0, 0]),
            ]
        );
    }

    #[test]
    fn test_brake_windows() {
        let pca = Pca9685Encoder::new(0x60);
        let mut board = ready_board(&pca);
        pca.write_brake_lines(&mut board, 9, 10).unwrap();
        assert_eq!(
            board.io().i2c(),
            [
                (0x60, vec![42, 0, 0, 2032, 7]),
                (0x60, vec![46, 2032, 7, 4080, 15]),
            ]
        );
    }

    #[test]
    fn test_init_once_per_address() {
        let mut board = Board::new(MockTransport::new());
        let a = Pca9685Encoder::new(0x60);
        let b = Pca9685Encoder::new(0x61);

        a.init(&mut board).unwrap();
        a.init(&mut board).unwrap();
        assert_eq!(board.io().i2c().len(), 5);
        assert_eq!(board.io().i2c()[0], (0x60, vec![0x00, 0x00]));
        assert_eq!(board.io().i2c()[2], (0x60, vec![0xFE, 0x70]));
        assert_eq!(board.io().i2c()[4], (0x60, vec![0x00, 0xA1]));

        b.init(&mut board).unwrap();
        assert_eq!(board.io().i2c().len(), 10);
    }

    #[test]
    fn test_first_write_brings_chip_up() {
        let mut board = Board::new(MockTransport::new());
        let pca = Pca9685Encoder::new(0x40);
        pca.write_duty(&mut board, 0, 128).unwrap();
        pca.write_duty(&mut board, 0, 64).unwrap();

        let writes = board.io().i2c();
        assert_eq!(writes.len(), 7);
        assert_eq!(writes[5], (0x40, vec![6, 0, 0, 2048, 8]));
        assert_eq!(writes[6], (0x40, vec![6, 0, 0, 1024, 4]));
    }
}
