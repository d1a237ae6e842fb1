//! TOML motor configuration documents
//!
//! A document is a list of `[[motor]]` tables, each deserializing into a
//! raw [`MotorConfig`]:
//!
//! ```toml
//! [[motor]]
//! pin = 11
//!
//! [[motor]]
//! pins = { pwm = 3, dir = 12, brake = 9 }
//! current = { pin = "A0", freq = 250 }
//!
//! [[motor]]
//! pins = [8, 9, 10]
//! controller = "PCA9685"
//! address = 0x60
//! ```
//!
//! Normalization is left to the caller, so one bad motor does not hide
//! the others.

use alloc::vec::Vec as AllocVec;
use heapless::Vec;
use serde::Deserialize;

use super::types::MotorConfig;

/// Maximum motors per document
pub const MAX_MOTORS: usize = 16;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Not valid TOML, or a value of the wrong type
    InvalidDocument,
    /// More than [`MAX_MOTORS`] motors
    TooManyItems,
}

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    motor: AllocVec<MotorConfig>,
}

/// Parse a TOML document into raw motor configurations
pub fn parse_motors(input: &str) -> Result<Vec<MotorConfig, MAX_MOTORS>, ParseError> {
    let document: Document = ::toml::from_str(input).map_err(|_| ParseError::InvalidDocument)?;
    if document.motor.len() > MAX_MOTORS {
        return Err(ParseError::TooManyItems);
    }
    Ok(document.motor.into_iter().collect())
}
