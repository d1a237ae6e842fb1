//! DC motor driver implementations
//!
//! This crate drives the motor topologies described in motive-core over
//! any [`motive_hal::Transport`]:
//!
//! - [`motor::Motor`] - Single motor state machine (GPIO, PCA9685 or
//!   shift-register backend)
//! - [`collection::MotorCollection`] - Groups of motors driven as one
//! - [`board::Board`] - Transport plus state shared by motors on it
//! - [`adapter`] - embedded-hal bridges

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod adapter;
pub mod board;
pub mod collection;
pub mod motor;

#[cfg(test)]
mod mock;

pub use board::Board;
pub use collection::{Member, MotorCollection, SharedCollection, SharedMotor};
pub use motor::Motor;
