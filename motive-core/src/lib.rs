//! Board-agnostic core logic for the motive DC motor drivers
//!
//! This crate contains everything about a motor that does not touch the
//! transport:
//!
//! - Raw motor configuration and the topology normalizer
//! - Duty-cycle calculation (threshold clamping, PWM inversion)
//! - Motor traits, commands and the error taxonomy
//! - TOML motor configuration documents

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "toml")]
extern crate alloc;

pub mod config;
pub mod duty;
pub mod traits;

pub use config::{ConfigError, ControllerKind, MotorConfig, PinMap, Topology};
pub use traits::{Direction, MotorCommand, MotorDriver, MotorError, MotorState, PinRole};
