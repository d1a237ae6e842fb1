//! Motor driver traits
//!
//! A single contract is shared by individual motors and by motor
//! collections, so callers can drive a group exactly like one motor.
//!
//! Every operation receives the board context `B` it writes through
//! instead of the motor owning its transport. Several motors on one
//! board therefore borrow the same transport one call at a time.

use motive_hal::{Level, TransportError};

use crate::config::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Logical rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Direction line high
    #[default]
    Forward,
    /// Direction line low
    Reverse,
}

impl Direction {
    /// Level written to the `dir` line for this direction
    pub fn level(self) -> Level {
        match self {
            Direction::Forward => Level::High,
            Direction::Reverse => Level::Low,
        }
    }

    /// True when the direction line is asserted high
    pub fn is_forward(self) -> bool {
        self == Direction::Forward
    }
}

/// Motor state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorState {
    /// No drive applied (coasting, or never started)
    #[default]
    Stopped,
    /// Driven in the recorded direction at the recorded speed
    Running,
    /// Brake hold applied; recorded direction/speed kept for release
    Braking,
}

/// Named pin roles of a motor topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    /// Speed (PWM) line
    Pwm,
    /// Primary direction-enable line
    Dir,
    /// Complementary direction-enable line
    Cdir,
    /// Dedicated brake line
    Brake,
}

/// A motor operation as a value
///
/// Collections fan commands out to their members; see
/// [`MotorDriver::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorCommand {
    /// Drive forward, optionally at a new speed
    Forward(Option<u8>),
    /// Drive in reverse, optionally at a new speed
    Reverse(Option<u8>),
    /// Drive in the recorded direction, optionally at a new speed
    Start(Option<u8>),
    /// Remove drive (coast)
    Stop,
    /// Apply the brake hold, optionally releasing after a delay in ms
    Brake(Option<u32>),
    /// Drop the brake and restore the recorded drive
    Release,
    /// Re-apply the recorded drive unchanged
    Resume,
}

/// Errors that can occur with motor operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Motor configuration was rejected
    Config(ConfigError),
    /// A transport write failed (not retried)
    Transport(TransportError),
    /// The topology has no pin in this role
    NoSuchPin(PinRole),
    /// The board cannot track another shift register or PWM chip
    BoardFull,
}

impl From<ConfigError> for MotorError {
    fn from(e: ConfigError) -> Self {
        MotorError::Config(e)
    }
}

impl From<TransportError> for MotorError {
    fn from(e: TransportError) -> Self {
        MotorError::Transport(e)
    }
}

/// DC motor driver contract
///
/// Implemented by single motors and by collections. All writes are
/// issued synchronously, in order, on the caller's context.
pub trait MotorDriver<B> {
    /// Drive forward; `None` reuses the recorded speed
    fn forward(&mut self, board: &mut B, speed: Option<u8>) -> Result<(), MotorError>;

    /// Drive in reverse; `None` reuses the recorded speed
    fn reverse(&mut self, board: &mut B, speed: Option<u8>) -> Result<(), MotorError>;

    /// Drive in the recorded direction (forward if none was ever set)
    fn start(&mut self, board: &mut B, speed: Option<u8>) -> Result<(), MotorError>;

    /// Remove drive without forgetting direction or speed
    fn stop(&mut self, board: &mut B) -> Result<(), MotorError>;

    /// Apply the brake hold
    ///
    /// With `duration_ms`, a single release is scheduled after that delay;
    /// any previously pending release is cancelled first.
    fn brake(&mut self, board: &mut B, duration_ms: Option<u32>) -> Result<(), MotorError>;

    /// Cancel any pending timed release and restore the recorded drive
    fn release(&mut self, board: &mut B) -> Result<(), MotorError>;

    /// Re-apply the recorded direction and speed
    fn resume(&mut self, board: &mut B) -> Result<(), MotorError>;

    /// Advance time by `delta_ms`, firing due timers and samples
    fn update_with_delta(&mut self, board: &mut B, delta_ms: u32) -> Result<(), MotorError>;

    /// Alias for [`MotorDriver::forward`]
    fn fwd(&mut self, board: &mut B, speed: Option<u8>) -> Result<(), MotorError> {
        self.forward(board, speed)
    }

    /// Alias for [`MotorDriver::reverse`]
    fn rev(&mut self, board: &mut B, speed: Option<u8>) -> Result<(), MotorError> {
        self.reverse(board, speed)
    }

    /// Dispatch a [`MotorCommand`]
    fn apply(&mut self, board: &mut B, command: MotorCommand) -> Result<(), MotorError> {
        match command {
            MotorCommand::Forward(speed) => self.forward(board, speed),
            MotorCommand::Reverse(speed) => self.reverse(board, speed),
            MotorCommand::Start(speed) => self.start(board, speed),
            MotorCommand::Stop => self.stop(board),
            MotorCommand::Brake(duration_ms) => self.brake(board, duration_ms),
            MotorCommand::Release => self.release(board),
            MotorCommand::Resume => self.resume(board),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_levels() {
        assert_eq!(Direction::Forward.level(), Level::High);
        assert_eq!(Direction::Reverse.level(), Level::Low);
        assert_eq!(Direction::default(), Direction::Forward);
    }

    #[test]
    fn test_error_conversion() {
        let e: MotorError = TransportError::Nack(0x60).into();
        assert_eq!(e, MotorError::Transport(TransportError::Nack(0x60)));

        let e: MotorError = ConfigError::MissingPwm.into();
        assert_eq!(e, MotorError::Config(ConfigError::MissingPwm));
    }
}
