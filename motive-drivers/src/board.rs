//! Board context shared by every motor on one transport
//!
//! Motors never own their transport. Each operation borrows the board,
//! which carries the transport plus the state that several motors on the
//! same hardware have to agree on: the last byte latched into each shift
//! register and the PCA9685 chips that were already brought up.

use heapless::Vec;
use motive_core::config::RegisterPins;
use motive_core::MotorError;

/// Maximum distinct shift registers tracked per board
pub const MAX_SHIFT_REGISTERS: usize = 4;

/// Maximum distinct PCA9685 chips tracked per board
pub const MAX_PWM_CHIPS: usize = 8;

#[derive(Debug, Clone, Copy)]
struct LatchedRegister {
    pins: RegisterPins,
    value: u8,
}

/// Transport plus shared per-board motor state
pub struct Board<T> {
    io: T,
    registers: Vec<LatchedRegister, MAX_SHIFT_REGISTERS>,
    chips: Vec<u8, MAX_PWM_CHIPS>,
}

impl<T> Board<T> {
    /// Wrap a transport
    pub fn new(io: T) -> Self {
        Self {
            io,
            registers: Vec::new(),
            chips: Vec::new(),
        }
    }

    /// Borrow the transport
    pub fn io(&self) -> &T {
        &self.io
    }

    /// Mutably borrow the transport
    pub fn io_mut(&mut self) -> &mut T {
        &mut self.io
    }

    /// Give the transport back
    pub fn into_inner(self) -> T {
        self.io
    }

    /// Last byte latched into the register on `pins` (0 if never written)
    pub fn register_value(&self, pins: RegisterPins) -> u8 {
        self.registers
            .iter()
            .find(|r| r.pins == pins)
            .map(|r| r.value)
            .unwrap_or(0)
    }

    /// Record the byte latched into the register on `pins`
    ///
    /// Fails with [`MotorError::BoardFull`] when `pins` is a new register
    /// and [`MAX_SHIFT_REGISTERS`] are already tracked.
    pub fn store_register_value(
        &mut self,
        pins: RegisterPins,
        value: u8,
    ) -> Result<(), MotorError> {
        if let Some(entry) = self.registers.iter_mut().find(|r| r.pins == pins) {
            entry.value = value;
            return Ok(());
        }
        self.registers
            .push(LatchedRegister { pins, value })
            .map_err(|_| {
                warn!("shift register table full, latch {} rejected", pins.latch);
                MotorError::BoardFull
            })
    }

    /// Whether the PCA9685 at `address` has been initialized
    pub fn is_chip_initialized(&self, address: u8) -> bool {
        self.chips.contains(&address)
    }

    /// Mark the PCA9685 at `address` as initialized
    ///
    /// Returns true only the first time for a given address, so the caller
    /// knows to send the init sequence. Fails with [`MotorError::BoardFull`]
    /// when [`MAX_PWM_CHIPS`] other chips are already tracked.
    pub fn mark_chip_initialized(&mut self, address: u8) -> Result<bool, MotorError> {
        if self.is_chip_initialized(address) {
            return Ok(false);
        }
        self.chips.push(address).map_err(|_| {
            warn!("PCA9685 table full, {:#x} rejected", address);
            MotorError::BoardFull
        })?;
        Ok(true)
    }
}
