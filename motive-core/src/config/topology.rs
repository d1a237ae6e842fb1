//! Topology normalization
//!
//! Turns a raw [`MotorConfig`] into a canonical [`Topology`]: one closed
//! [`PinMap`] shape and one [`ControllerKind`]. The shape is chosen once,
//! at construction; drivers match on the variant instead of probing for
//! optional pins.

use super::types::{
    AnalogPinRef, BitPositions, MotorConfig, PinSpec, RegisterPins, PCA9685_TAG,
};
use crate::traits::PinRole;

/// Number of PWM channels on a PCA9685
pub const PCA9685_CHANNELS: u8 = 16;

/// Errors from normalizing a motor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No PWM pin given
    MissingPwm,
    /// `cdir` or `brake` given without `dir`
    MissingDirection,
    /// Conflicting pin roles or backends
    AmbiguousPins,
    /// Positional list longer than `[pwm, dir, cdir]`
    TooManyPins,
    /// Chip controller selected without an I2C address
    MissingAddress,
    /// Unrecognized controller tag
    UnknownController,
    /// Only one of `register` / `bits` given
    IncompleteShiftRegister,
    /// Bit positions out of range or equal
    InvalidBits,
    /// Pin number is not a channel of the selected chip
    InvalidChannel(u8),
    /// Analog pin name could not be parsed
    InvalidAnalogPin,
}

/// Canonical pin roles of a motor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMap {
    /// Speed only
    NonDirectional { pwm: u8 },
    /// Speed and one direction line
    Directional { pwm: u8, dir: u8 },
    /// Speed and two independently driven direction lines
    DirectionalWithCdir { pwm: u8, dir: u8, cdir: u8 },
    /// Speed, one direction line and a dedicated brake line
    DirectionalWithBrake { pwm: u8, dir: u8, brake: u8 },
}

impl PinMap {
    /// The PWM pin
    pub fn pwm(&self) -> u8 {
        match *self {
            PinMap::NonDirectional { pwm }
            | PinMap::Directional { pwm, .. }
            | PinMap::DirectionalWithCdir { pwm, .. }
            | PinMap::DirectionalWithBrake { pwm, .. } => pwm,
        }
    }

    /// The direction pin, if any
    pub fn dir(&self) -> Option<u8> {
        match *self {
            PinMap::NonDirectional { .. } => None,
            PinMap::Directional { dir, .. }
            | PinMap::DirectionalWithCdir { dir, .. }
            | PinMap::DirectionalWithBrake { dir, .. } => Some(dir),
        }
    }

    /// The complementary direction pin, if any
    pub fn cdir(&self) -> Option<u8> {
        match *self {
            PinMap::DirectionalWithCdir { cdir, .. } => Some(cdir),
            _ => None,
        }
    }

    /// The brake pin, if any
    pub fn brake(&self) -> Option<u8> {
        match *self {
            PinMap::DirectionalWithBrake { brake, .. } => Some(brake),
            _ => None,
        }
    }

    /// Pin for a role, if the topology has one
    pub fn pin(&self, role: PinRole) -> Option<u8> {
        match role {
            PinRole::Pwm => Some(self.pwm()),
            PinRole::Dir => self.dir(),
            PinRole::Cdir => self.cdir(),
            PinRole::Brake => self.brake(),
        }
    }

    /// True if the topology can short-brake in hardware
    pub fn can_brake(&self) -> bool {
        matches!(
            self,
            PinMap::DirectionalWithCdir { .. } | PinMap::DirectionalWithBrake { .. }
        )
    }

    fn pins(&self) -> impl Iterator<Item = u8> {
        [Some(self.pwm()), self.dir(), self.cdir(), self.brake()]
            .into_iter()
            .flatten()
    }
}

/// Backend that encodes a motor's writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerKind {
    /// Direct GPIO and PWM pins
    Gpio,
    /// Channels of a PCA9685 PWM chip
    Pca9685 { address: u8 },
    /// Direction bits in a shift register, PWM on a real pin
    ShiftRegister {
        register: RegisterPins,
        bits: BitPositions,
    },
}

/// Normalized current sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentSense {
    /// Analog channel number
    pub channel: u8,
    /// Sampling interval in ms
    pub interval_ms: u16,
}

/// A fully normalized motor description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Topology {
    pub pins: PinMap,
    pub controller: ControllerKind,
    pub invert_pwm: bool,
    pub threshold: u8,
    pub current: Option<CurrentSense>,
}

impl Topology {
    /// Check that the pins fit the selected backend
    ///
    /// [`MotorConfig::normalize`] runs this already; call it on topologies
    /// built by hand.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.controller {
            ControllerKind::Gpio => Ok(()),
            ControllerKind::Pca9685 { .. } => {
                match self.pins.pins().find(|&p| p >= PCA9685_CHANNELS) {
                    Some(pin) => Err(ConfigError::InvalidChannel(pin)),
                    None => Ok(()),
                }
            }
            ControllerKind::ShiftRegister { bits, .. } => {
                // Direction lives in the register, so no direct direction pins
                if !matches!(self.pins, PinMap::NonDirectional { .. }) {
                    return Err(ConfigError::AmbiguousPins);
                }
                if bits.a > 7 || bits.b > 7 || bits.a == bits.b {
                    return Err(ConfigError::InvalidBits);
                }
                Ok(())
            }
        }
    }
}

impl MotorConfig {
    /// Normalize into a [`Topology`]
    pub fn normalize(&self) -> Result<Topology, ConfigError> {
        let pins = normalize_pins(self.pin, self.pins.as_ref())?;
        let controller = self.controller_kind()?;
        let current = match &self.current {
            Some(current) => Some(CurrentSense {
                channel: parse_analog_pin(&current.pin)?,
                interval_ms: current.freq,
            }),
            None => None,
        };

        let topology = Topology {
            pins,
            controller,
            invert_pwm: self.invert_pwm,
            threshold: self.threshold,
            current,
        };
        topology.validate()?;
        Ok(topology)
    }

    fn controller_kind(&self) -> Result<ControllerKind, ConfigError> {
        let shift = match (self.register, self.bits) {
            (Some(register), Some(bits)) => Some((register, bits)),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteShiftRegister),
        };

        match (self.controller.as_deref(), shift) {
            (Some(tag), None) if tag.eq_ignore_ascii_case(PCA9685_TAG) => {
                let address = self.address.ok_or(ConfigError::MissingAddress)?;
                Ok(ControllerKind::Pca9685 { address })
            }
            (Some(tag), Some(_)) if tag.eq_ignore_ascii_case(PCA9685_TAG) => {
                Err(ConfigError::AmbiguousPins)
            }
            (Some(_), _) => Err(ConfigError::UnknownController),
            (None, Some((register, bits))) => Ok(ControllerKind::ShiftRegister { register, bits }),
            (None, None) => Ok(ControllerKind::Gpio),
        }
    }
}

/// Normalize the pin part of a configuration
pub fn normalize_pins(pin: Option<u8>, pins: Option<&PinSpec>) -> Result<PinMap, ConfigError> {
    match (pin, pins) {
        (Some(_), Some(_)) => Err(ConfigError::AmbiguousPins),
        (None, None) => Err(ConfigError::MissingPwm),
        (Some(pwm), None) => Ok(PinMap::NonDirectional { pwm }),
        (None, Some(PinSpec::Single(pwm))) => Ok(PinMap::NonDirectional { pwm: *pwm }),
        (None, Some(PinSpec::List(list))) => match list.as_slice() {
            [] => Err(ConfigError::MissingPwm),
            [pwm] => Ok(PinMap::NonDirectional { pwm: *pwm }),
            [pwm, dir] => Ok(PinMap::Directional {
                pwm: *pwm,
                dir: *dir,
            }),
            [pwm, dir, cdir] => Ok(PinMap::DirectionalWithCdir {
                pwm: *pwm,
                dir: *dir,
                cdir: *cdir,
            }),
            _ => Err(ConfigError::TooManyPins),
        },
        (None, Some(PinSpec::Named(named))) => {
            let pwm = named.pwm.ok_or(ConfigError::MissingPwm)?;
            match (named.dir, named.cdir, named.brake) {
                (_, Some(_), Some(_)) => Err(ConfigError::AmbiguousPins),
                (None, Some(_), _) | (None, _, Some(_)) => Err(ConfigError::MissingDirection),
                (None, None, None) => Ok(PinMap::NonDirectional { pwm }),
                (Some(dir), None, None) => Ok(PinMap::Directional { pwm, dir }),
                (Some(dir), Some(cdir), None) => Ok(PinMap::DirectionalWithCdir { pwm, dir, cdir }),
                (Some(dir), None, Some(brake)) => {
                    Ok(PinMap::DirectionalWithBrake { pwm, dir, brake })
                }
            }
        }
    }
}

/// Parse an analog pin reference into a channel number
///
/// Accepts a channel number, "A<n>"/"a<n>", or a bare "<n>".
pub fn parse_analog_pin(pin: &AnalogPinRef) -> Result<u8, ConfigError> {
    match pin {
        AnalogPinRef::Channel(channel) => Ok(*channel),
        AnalogPinRef::Name(name) => {
            let digits = name
                .strip_prefix('A')
                .or_else(|| name.strip_prefix('a'))
                .unwrap_or(name.as_str());
            digits.parse().map_err(|_| ConfigError::InvalidAnalogPin)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::NamedPins;

    #[test]
    fn test_single_pin_is_non_directional() {
        let topo = MotorConfig::pin(11).normalize().unwrap();
        assert_eq!(topo.pins, PinMap::NonDirectional { pwm: 11 });
        assert_eq!(topo.controller, ControllerKind::Gpio);
        assert_eq!(topo.pins.dir(), None);
    }

    #[test]
    fn test_list_shapes() {
        assert_eq!(
            MotorConfig::pins(&[11, 12]).normalize().unwrap().pins,
            PinMap::Directional { pwm: 11, dir: 12 }
        );
        assert_eq!(
            MotorConfig::pins(&[11, 12, 13]).normalize().unwrap().pins,
            PinMap::DirectionalWithCdir {
                pwm: 11,
                dir: 12,
                cdir: 13
            }
        );
        assert_eq!(
            MotorConfig::pins(&[11, 12, 13, 14]).normalize(),
            Err(ConfigError::TooManyPins)
        );
        assert_eq!(
            MotorConfig::pins(&[]).normalize(),
            Err(ConfigError::MissingPwm)
        );
    }

    #[test]
    fn test_named_brake() {
        let topo = MotorConfig::named(NamedPins::pwm(3).with_dir(12).with_brake(9))
            .normalize()
            .unwrap();
        assert_eq!(
            topo.pins,
            PinMap::DirectionalWithBrake {
                pwm: 3,
                dir: 12,
                brake: 9
            }
        );
        assert_eq!(topo.pins.pin(PinRole::Brake), Some(9));
        assert!(topo.pins.can_brake());
    }

    #[test]
    fn test_named_errors() {
        let both = NamedPins::pwm(3).with_dir(12).with_cdir(13).with_brake(9);
        assert_eq!(
            MotorConfig::named(both).normalize(),
            Err(ConfigError::AmbiguousPins)
        );

        let no_dir = NamedPins::pwm(3).with_brake(9);
        assert_eq!(
            MotorConfig::named(no_dir).normalize(),
            Err(ConfigError::MissingDirection)
        );

        let no_pwm = NamedPins::default().with_dir(4);
        assert_eq!(
            MotorConfig::named(no_pwm).normalize(),
            Err(ConfigError::MissingPwm)
        );
    }

    #[test]
    fn test_pin_and_pins_conflict() {
        let mut config = MotorConfig::pins(&[3, 4]);
        config.pin = Some(5);
        assert_eq!(config.normalize(), Err(ConfigError::AmbiguousPins));
        assert_eq!(
            MotorConfig::default().normalize(),
            Err(ConfigError::MissingPwm)
        );
    }

    #[test]
    fn test_pca9685_selection() {
        let topo = MotorConfig::pins(&[8, 9, 10])
            .pca9685(0x60)
            .normalize()
            .unwrap();
        assert_eq!(topo.controller, ControllerKind::Pca9685 { address: 0x60 });
        assert_eq!(topo.pins.cdir(), Some(10));
    }

    #[test]
    fn test_pca9685_requires_address() {
        let mut config = MotorConfig::pins(&[8, 9]).pca9685(0x60);
        config.address = None;
        assert_eq!(config.normalize(), Err(ConfigError::MissingAddress));
    }

    #[test]
    fn test_pca9685_channel_range() {
        let config = MotorConfig::pins(&[8, 16]).pca9685(0x60);
        assert_eq!(config.normalize(), Err(ConfigError::InvalidChannel(16)));
    }

    #[test]
    fn test_unknown_controller() {
        let mut config = MotorConfig::pin(3);
        config.controller = heapless::String::try_from("L298").ok();
        assert_eq!(config.normalize(), Err(ConfigError::UnknownController));
    }

    #[test]
    fn test_shift_register_selection() {
        let register = RegisterPins {
            data: 8,
            clock: 4,
            latch: 12,
        };
        let bits = BitPositions { a: 2, b: 3 };
        let topo = MotorConfig::named(NamedPins::pwm(11))
            .shift_register(register, bits)
            .normalize()
            .unwrap();
        assert_eq!(topo.pins, PinMap::NonDirectional { pwm: 11 });
        assert_eq!(
            topo.controller,
            ControllerKind::ShiftRegister { register, bits }
        );

        let mut incomplete = MotorConfig::pin(11);
        incomplete.register = Some(register);
        assert_eq!(
            incomplete.normalize(),
            Err(ConfigError::IncompleteShiftRegister)
        );

        let clash = MotorConfig::pins(&[11, 12]).shift_register(register, bits);
        assert_eq!(clash.normalize(), Err(ConfigError::AmbiguousPins));

        let same_bit = MotorConfig::pin(11).shift_register(register, BitPositions { a: 2, b: 2 });
        assert_eq!(same_bit.normalize(), Err(ConfigError::InvalidBits));
    }

    #[test]
    fn test_validate_hand_built_topology() {
        let register = RegisterPins {
            data: 8,
            clock: 4,
            latch: 12,
        };
        let mut topo = Topology {
            pins: PinMap::NonDirectional { pwm: 11 },
            controller: ControllerKind::ShiftRegister {
                register,
                bits: BitPositions { a: 8, b: 3 },
            },
            invert_pwm: false,
            threshold: 0,
            current: None,
        };
        assert_eq!(topo.validate(), Err(ConfigError::InvalidBits));

        topo.controller = ControllerKind::Pca9685 { address: 0x60 };
        topo.pins = PinMap::Directional { pwm: 3, dir: 16 };
        assert_eq!(topo.validate(), Err(ConfigError::InvalidChannel(16)));

        topo.controller = ControllerKind::Gpio;
        assert_eq!(topo.validate(), Ok(()));
    }

    #[test]
    fn test_current_pin_names() {
        let topo = MotorConfig::pins(&[3, 12])
            .with_current(AnalogPinRef::named("A0").unwrap(), 250)
            .normalize()
            .unwrap();
        assert_eq!(
            topo.current,
            Some(CurrentSense {
                channel: 0,
                interval_ms: 250
            })
        );

        assert_eq!(parse_analog_pin(&AnalogPinRef::named("3").unwrap()), Ok(3));
        assert_eq!(
            parse_analog_pin(&AnalogPinRef::named("X1").unwrap()),
            Err(ConfigError::InvalidAnalogPin)
        );
    }
}
