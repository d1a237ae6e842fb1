//! DC motor drivers
//!
//! - [`Motor`] - State machine shared by every backend
//! - [`gpio`] - Direct PWM and digital pins
//! - [`pca9685`] - 16-channel I2C PWM chip
//! - [`shift`] - Direction bits behind a 74HC595 shift register
//! - [`current`] - Analog current sensing

pub mod current;
pub mod dc;
pub mod encoder;
pub mod gpio;
pub mod pca9685;
pub mod shift;

pub use current::CurrentSensor;
pub use dc::Motor;
pub use encoder::{Controller, Encoder};
pub use gpio::GpioEncoder;
pub use pca9685::Pca9685Encoder;
pub use shift::ShiftRegisterEncoder;
