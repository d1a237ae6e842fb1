//! Motive I/O transport abstraction
//!
//! This crate defines the transport collaborator that the motor drivers
//! write through. A transport is whatever performs the raw pin writes, I2C
//! transactions and bit-banged shift-register clocking: a firmata-style
//! remote board, a chip HAL, or a recording mock in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  motive-drivers (Motor, collections)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  motive-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  chip HAL /   │       │  test mock    │
//! │  remote board │       │               │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::DigitalOutput`], [`gpio::PwmOutput`] - Digital and PWM pins
//! - [`i2c::I2cWrite`] - I2C register bursts
//! - [`shift::ShiftOut`] - Serial-in shift register clocking
//! - [`adc::AnalogInput`] - Analog sampling (current sensing)
//! - [`Transport`] - Everything above, what a motor needs

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod error;
pub mod gpio;
pub mod i2c;
pub mod shift;

// Re-export key traits at crate root for convenience
pub use adc::AnalogInput;
pub use error::TransportError;
pub use gpio::{DigitalOutput, Level, PwmOutput};
pub use i2c::I2cWrite;
pub use shift::{BitOrder, ShiftOut};

/// Full transport collaborator contract
///
/// Motors are generic over a single transport so that every backend
/// (direct GPIO, PCA9685 over I2C, shift register) can share one board.
pub trait Transport: DigitalOutput + PwmOutput + I2cWrite + ShiftOut + AnalogInput {}

// Blanket implementation for types that implement every collaborator trait
impl<T> Transport for T where T: DigitalOutput + PwmOutput + I2cWrite + ShiftOut + AnalogInput {}
