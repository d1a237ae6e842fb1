//! Configuration types
//!
//! Raw motor configuration as written by the user, and its normalized
//! topology.

#[cfg(feature = "toml")]
pub mod toml;
pub mod topology;
pub mod types;

pub use topology::{
    normalize_pins, parse_analog_pin, ConfigError, ControllerKind, CurrentSense, PinMap,
    Topology, PCA9685_CHANNELS,
};
pub use types::*;
