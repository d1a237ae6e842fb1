//! Motor traits and shared types
//!
//! These types define the vocabulary shared between the configuration
//! layer and the driver implementations.

pub mod motor;

pub use motor::{Direction, MotorCommand, MotorDriver, MotorError, MotorState, PinRole};
