//! Raw motor configuration
//!
//! These types mirror what a user writes: a bare pin, an ordered pin list
//! or a table of named pins, plus optional controller selection. Nothing
//! here is validated; see [`super::topology`] for normalization.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum pins accepted in a positional list (only 1-3 are valid)
pub const MAX_LIST_PINS: usize = 4;

/// Maximum controller tag length
pub const MAX_CONTROLLER_LEN: usize = 16;

/// Maximum analog pin name length ("A0".."A15")
pub const MAX_ANALOG_NAME_LEN: usize = 4;

/// Default current sampling interval in ms
pub const DEFAULT_SAMPLE_INTERVAL_MS: u16 = 25;

/// Controller tag selecting the PCA9685 backend
pub const PCA9685_TAG: &str = "PCA9685";

/// User-supplied pin configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum PinSpec {
    /// A single PWM pin
    Single(u8),
    /// `[pwm]`, `[pwm, dir]` or `[pwm, dir, cdir]`
    List(Vec<u8, MAX_LIST_PINS>),
    /// Named roles
    Named(NamedPins),
}

impl PinSpec {
    /// Build a positional list, keeping at most [`MAX_LIST_PINS`] entries
    ///
    /// Over-long lists still normalize to [`super::ConfigError::TooManyPins`].
    pub fn list(pins: &[u8]) -> Self {
        PinSpec::List(pins.iter().copied().take(MAX_LIST_PINS).collect())
    }
}

/// Pins by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct NamedPins {
    /// Speed line
    pub pwm: Option<u8>,
    /// Direction line
    pub dir: Option<u8>,
    /// Complementary direction line
    pub cdir: Option<u8>,
    /// Brake line
    pub brake: Option<u8>,
}

impl NamedPins {
    /// Start from a PWM pin
    pub const fn pwm(pwm: u8) -> Self {
        Self {
            pwm: Some(pwm),
            dir: None,
            cdir: None,
            brake: None,
        }
    }

    /// Add a direction line
    pub const fn with_dir(mut self, dir: u8) -> Self {
        self.dir = Some(dir);
        self
    }

    /// Add a complementary direction line
    pub const fn with_cdir(mut self, cdir: u8) -> Self {
        self.cdir = Some(cdir);
        self
    }

    /// Add a brake line
    pub const fn with_brake(mut self, brake: u8) -> Self {
        self.brake = Some(brake);
        self
    }
}

/// Shift register control pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegisterPins {
    /// Serial data pin
    pub data: u8,
    /// Shift clock pin
    pub clock: u8,
    /// Storage latch pin
    pub latch: u8,
}

/// Bit positions of one motor's direction outputs in a shift register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitPositions {
    /// Bit asserted for forward
    pub a: u8,
    /// Bit asserted for reverse
    pub b: u8,
}

/// Analog pin as a channel number or an `A<n>` name
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum AnalogPinRef {
    /// Channel number
    Channel(u8),
    /// Pin name such as "A0"
    Name(String<MAX_ANALOG_NAME_LEN>),
}

impl AnalogPinRef {
    /// Pin by name; `None` if the name does not fit
    pub fn named(name: &str) -> Option<Self> {
        String::try_from(name).ok().map(AnalogPinRef::Name)
    }
}

impl From<u8> for AnalogPinRef {
    fn from(channel: u8) -> Self {
        AnalogPinRef::Channel(channel)
    }
}

/// Current sensing configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrentConfig {
    /// Analog sense pin
    pub pin: AnalogPinRef,
    /// Sampling interval in ms
    #[cfg_attr(feature = "serde", serde(default = "default_sample_interval"))]
    pub freq: u16,
}

#[cfg(feature = "serde")]
fn default_sample_interval() -> u16 {
    DEFAULT_SAMPLE_INTERVAL_MS
}

/// Raw motor configuration
///
/// Exactly one of `pin` and `pins` should be given. `controller` plus
/// `address` selects a PCA9685 channel set; `register` plus `bits` selects
/// the shift-register backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotorConfig {
    /// Single PWM pin shorthand
    pub pin: Option<u8>,
    /// Pin list or named pins
    pub pins: Option<PinSpec>,
    /// Controller tag ("PCA9685")
    pub controller: Option<String<MAX_CONTROLLER_LEN>>,
    /// I2C address of the controller chip
    pub address: Option<u8>,
    /// Shift register pins
    pub register: Option<RegisterPins>,
    /// Shift register bit positions
    pub bits: Option<BitPositions>,
    /// Current sensing
    pub current: Option<CurrentConfig>,
    /// Driver inverts PWM while the direction line is high
    #[cfg_attr(feature = "serde", serde(default, alias = "invertPWM"))]
    pub invert_pwm: bool,
    /// Minimum effective duty
    #[cfg_attr(feature = "serde", serde(default))]
    pub threshold: u8,
}

impl MotorConfig {
    /// Non-directional motor on a single PWM pin
    pub fn pin(pwm: u8) -> Self {
        Self {
            pin: Some(pwm),
            ..Default::default()
        }
    }

    /// Motor from a positional pin list
    pub fn pins(pins: &[u8]) -> Self {
        Self::with_pins(PinSpec::list(pins))
    }

    /// Motor from named pins
    pub fn named(pins: NamedPins) -> Self {
        Self::with_pins(PinSpec::Named(pins))
    }

    /// Motor from any pin spec
    pub fn with_pins(pins: PinSpec) -> Self {
        Self {
            pins: Some(pins),
            ..Default::default()
        }
    }

    /// Select a PCA9685 at `address`; pins become channel numbers
    pub fn pca9685(mut self, address: u8) -> Self {
        // The tag is shorter than MAX_CONTROLLER_LEN
        self.controller = String::try_from(PCA9685_TAG).ok();
        self.address = Some(address);
        self
    }

    /// Route direction through a shift register
    pub fn shift_register(mut self, register: RegisterPins, bits: BitPositions) -> Self {
        self.register = Some(register);
        self.bits = Some(bits);
        self
    }

    /// Mark the driver as PWM-inverting
    pub fn inverted(mut self) -> Self {
        self.invert_pwm = true;
        self
    }

    /// Set the minimum effective duty
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Attach a current sense pin sampled every `freq` ms
    pub fn with_current(mut self, pin: impl Into<AnalogPinRef>, freq: u16) -> Self {
        self.current = Some(CurrentConfig {
            pin: pin.into(),
            freq,
        });
        self
    }
}
