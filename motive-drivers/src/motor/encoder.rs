//! Backend encoders
//!
//! An encoder turns "put this duty on that pin" and "drive that line"
//! into transport calls for one controller backend. The motor state
//! machine only talks to [`Controller`], which dispatches to the backend
//! selected at construction.

use motive_core::{ControllerKind, Direction, MotorError, PinMap};
use motive_hal::{Level, Transport};

use super::gpio::GpioEncoder;
use super::pca9685::Pca9685Encoder;
use super::shift::ShiftRegisterEncoder;
use crate::board::Board;

/// Write primitives of one controller backend
pub trait Encoder {
    /// Put an 8-bit duty on a PWM pin or channel
    fn write_duty<T: Transport>(
        &self,
        board: &mut Board<T>,
        pin: u8,
        duty: u8,
    ) -> Result<(), MotorError>;

    /// Drive a line fully on or fully off
    fn write_line<T: Transport>(
        &self,
        board: &mut Board<T>,
        pin: u8,
        level: Level,
    ) -> Result<(), MotorError>;

    /// Assert the direction lines for `direction`
    ///
    /// The complementary line is written before the primary one.
    fn write_direction<T: Transport>(
        &self,
        board: &mut Board<T>,
        pins: &PinMap,
        direction: Direction,
    ) -> Result<(), MotorError> {
        if let Some(cdir) = pins.cdir() {
            self.write_line(board, cdir, direction.level().inverted())?;
        }
        if let Some(dir) = pins.dir() {
            self.write_line(board, dir, direction.level())?;
        }
        Ok(())
    }

    /// Short both half-bridges of a dir/cdir driver
    fn write_brake_lines<T: Transport>(
        &self,
        board: &mut Board<T>,
        dir: u8,
        cdir: u8,
    ) -> Result<(), MotorError> {
        self.write_line(board, dir, Level::High)?;
        self.write_line(board, cdir, Level::High)
    }

    /// Bring up the backend hardware; safe to call repeatedly
    fn init<T: Transport>(&self, _board: &mut Board<T>) -> Result<(), MotorError> {
        Ok(())
    }

    /// Whether motors on this backend have direction control
    fn has_direction(&self, pins: &PinMap) -> bool {
        pins.dir().is_some()
    }
}

/// The backend a motor writes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    Gpio(GpioEncoder),
    Pca9685(Pca9685Encoder),
    ShiftRegister(ShiftRegisterEncoder),
}

impl From<ControllerKind> for Controller {
    fn from(kind: ControllerKind) -> Self {
        match kind {
            ControllerKind::Gpio => Controller::Gpio(GpioEncoder),
            ControllerKind::Pca9685 { address } => {
                Controller::Pca9685(Pca9685Encoder::new(address))
            }
            ControllerKind::ShiftRegister { register, bits } => {
                Controller::ShiftRegister(ShiftRegisterEncoder::new(register, bits))
            }
        }
    }
}

impl Controller {
    /// The configuration this backend was built from
    pub fn kind(&self) -> ControllerKind {
        match self {
            Controller::Gpio(_) => ControllerKind::Gpio,
            Controller::Pca9685(e) => ControllerKind::Pca9685 {
                address: e.address(),
            },
            Controller::ShiftRegister(e) => ControllerKind::ShiftRegister {
                register: e.register(),
                bits: e.bits(),
            },
        }
    }
}

impl Encoder for Controller {
    fn write_duty<T: Transport>(
        &self,
        board: &mut Board<T>,
        pin: u8,
        duty: u8,
    ) -> Result<(), MotorError> {
        match self {
            Controller::Gpio(e) => e.write_duty(board, pin, duty),
            Controller::Pca9685(e) => e.write_duty(board, pin, duty),
            Controller::ShiftRegister(e) => e.write_duty(board, pin, duty),
        }
    }

    fn write_line<T: Transport>(
        &self,
        board: &mut Board<T>,
        pin: u8,
        level: Level,
    ) -> Result<(), MotorError> {
        match self {
            Controller::Gpio(e) => e.write_line(board, pin, level),
            Controller::Pca9685(e) => e.write_line(board, pin, level),
            Controller::ShiftRegister(e) => e.write_line(board, pin, level),
        }
    }

    fn write_direction<T: Transport>(
        &self,
        board: &mut Board<T>,
        pins: &PinMap,
        direction: Direction,
    ) -> Result<(), MotorError> {
        match self {
            Controller::Gpio(e) => e.write_direction(board, pins, direction),
            Controller::Pca9685(e) => e.write_direction(board, pins, direction),
            Controller::ShiftRegister(e) => e.write_direction(board, pins, direction),
        }
    }

    fn write_brake_lines<T: Transport>(
        &self,
        board: &mut Board<T>,
        dir: u8,
        cdir: u8,
    ) -> Result<(), MotorError> {
        match self {
            Controller::Gpio(e) => e.write_brake_lines(board, dir, cdir),
            Controller::Pca9685(e) => e.write_brake_lines(board, dir, cdir),
            Controller::ShiftRegister(e) => e.write_brake_lines(board, dir, cdir),
        }
    }

    fn init<T: Transport>(&self, board: &mut Board<T>) -> Result<(), MotorError> {
        match self {
            Controller::Gpio(e) => e.init(board),
            Controller::Pca9685(e) => e.init(board),
            Controller::ShiftRegister(e) => e.init(board),
        }
    }

    fn has_direction(&self, pins: &PinMap) -> bool {
        match self {
            Controller::Gpio(e) => e.has_direction(pins),
            Controller::Pca9685(e) => e.has_direction(pins),
            Controller::ShiftRegister(e) => e.has_direction(pins),
        }
    }
}
