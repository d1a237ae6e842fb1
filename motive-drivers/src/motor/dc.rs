//! DC motor state machine
//!
//! One [`Motor`] drives a single H-bridge channel through whichever
//! backend its configuration selected. It records the logical direction
//! and speed of the last drive command so that `start`, `resume` and
//! `release` can restore them.
//!
//! # Write order
//!
//! A drive on a motor with direction control is always:
//!
//! 1. PWM to the stop level (keyed on the direction held before the change)
//! 2. Direction lines (`cdir` before `dir`, or a shift-register latch)
//! 3. PWM to the requested duty
//! 4. Brake line low, when leaving a brake on a brake-pin motor
//!
//! State is recorded before any write is issued, so a failed write leaves
//! the motor in the state it was asked to enter.
//!
//! # Usage
//!
//! ```ignore
//! let mut board = Board::new(io);
//! let mut motor = Motor::new(&MotorConfig::named(NamedPins::pwm(3).with_dir(12).with_brake(9)))?;
//!
//! motor.forward(&mut board, Some(200))?;
//! motor.brake(&mut board, Some(500))?;
//!
//! // Periodic tick:
//! motor.update_with_delta(&mut board, 10)?;
//! ```

use motive_core::duty::{compute_duty, DEFAULT_SPEED, MAX_DUTY};
use motive_core::{
    ConfigError, ControllerKind, Direction, MotorConfig, MotorDriver, MotorError, MotorState,
    PinMap, PinRole, Topology,
};
use motive_hal::{Level, Transport};

use super::current::CurrentSensor;
use super::encoder::{Controller, Encoder};
use crate::board::Board;

/// Pending timed brake release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReleaseTimer {
    remaining_ms: u32,
}

/// A single DC motor
#[derive(Debug, Clone)]
pub struct Motor {
    pins: PinMap,
    controller: Controller,
    invert_pwm: bool,
    threshold: u8,
    /// Last requested logical speed
    speed: u8,
    /// Last requested logical direction
    direction: Direction,
    state: MotorState,
    release_timer: Option<ReleaseTimer>,
    current: Option<CurrentSensor>,
}

impl Motor {
    /// Validate a configuration and build a motor from it
    ///
    /// PCA9685 chips are brought up lazily, so the first command to a chip
    /// also carries its init writes. Call [`Motor::init`] before the first
    /// command to send them up front.
    pub fn new(config: &MotorConfig) -> Result<Self, ConfigError> {
        Self::from_topology(config.normalize()?)
    }

    /// Build a motor from a topology, checking it against its backend
    pub fn from_topology(topology: Topology) -> Result<Self, ConfigError> {
        topology.validate()?;
        debug!("motor pins={} controller={}", topology.pins, topology.controller);
        Ok(Self {
            pins: topology.pins,
            controller: Controller::from(topology.controller),
            invert_pwm: topology.invert_pwm,
            threshold: topology.threshold,
            speed: DEFAULT_SPEED,
            direction: Direction::Forward,
            state: MotorState::Stopped,
            release_timer: None,
            current: topology.current.map(CurrentSensor::new),
        })
    }

    /// Resolved pins
    pub fn pins(&self) -> PinMap {
        self.pins
    }

    /// Backend in use
    pub fn controller(&self) -> ControllerKind {
        self.controller.kind()
    }

    /// Minimum effective duty
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Change the minimum effective duty; applies from the next write
    pub fn set_threshold(&mut self, threshold: u8) {
        self.threshold = threshold;
    }

    pub fn invert_pwm(&self) -> bool {
        self.invert_pwm
    }

    /// Last requested speed (128 until one is given)
    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Last requested direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Alias for [`Motor::direction`]
    pub fn dir(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == MotorState::Running
    }

    pub fn is_braking(&self) -> bool {
        self.state == MotorState::Braking
    }

    /// Whether the motor has direction control
    pub fn has_direction(&self) -> bool {
        self.controller.has_direction(&self.pins)
    }

    /// Current sensor, when one is configured
    pub fn current(&self) -> Option<&CurrentSensor> {
        self.current.as_ref()
    }

    /// Time left before a scheduled brake release fires
    pub fn pending_release_ms(&self) -> Option<u32> {
        self.release_timer.map(|t| t.remaining_ms)
    }

    /// Bring up the backend hardware
    ///
    /// PCA9685 chips are otherwise brought up on first write; calling this
    /// ahead of time keeps the init burst out of the first command.
    pub fn init<T: Transport>(&self, board: &mut Board<T>) -> Result<(), MotorError> {
        self.controller.init(board)?;
        Ok(())
    }

    /// Drive one of the motor's lines fully on or off
    ///
    /// Bypasses the state machine; recorded state is untouched.
    pub fn set_pin<T: Transport>(
        &mut self,
        board: &mut Board<T>,
        role: PinRole,
        level: Level,
    ) -> Result<(), MotorError> {
        let pin = self.pins.pin(role).ok_or(MotorError::NoSuchPin(role))?;
        self.controller.write_line(board, pin, level)?;
        Ok(())
    }

    /// Write a raw duty to any pin or channel of the motor's backend
    ///
    /// No threshold or inversion is applied.
    pub fn set_pwm<T: Transport>(
        &mut self,
        board: &mut Board<T>,
        pin: u8,
        duty: u8,
    ) -> Result<(), MotorError> {
        self.controller.write_duty(board, pin, duty)?;
        Ok(())
    }

    /// Wire duty for `requested` in the recorded direction
    fn wire_duty(&self, requested: u8) -> u8 {
        compute_duty(
            requested as i32,
            self.threshold,
            self.invert_pwm,
            self.direction.is_forward(),
        )
    }

    fn stop_duty(&self) -> u8 {
        compute_duty(0, 0, self.invert_pwm, self.direction.is_forward())
    }

    fn hold_duty(&self) -> u8 {
        compute_duty(MAX_DUTY as i32, 0, self.invert_pwm, self.direction.is_forward())
    }

    fn write_pwm<T: Transport>(&self, board: &mut Board<T>, duty: u8) -> Result<(), MotorError> {
        self.controller.write_duty(board, self.pins.pwm(), duty)?;
        Ok(())
    }

    /// Drop the brake line after a brake, if the motor has one
    fn clear_brake_line<T: Transport>(
        &self,
        board: &mut Board<T>,
        was_braking: bool,
    ) -> Result<(), MotorError> {
        if let (true, Some(brake)) = (was_braking, self.pins.brake()) {
            self.controller.write_line(board, brake, Level::Low)?;
        }
        Ok(())
    }

    fn drive<T: Transport>(
        &mut self,
        board: &mut Board<T>,
        direction: Direction,
        speed: Option<u8>,
    ) -> Result<(), MotorError> {
        let was_braking = self.is_braking();
        let previous_stop = self.stop_duty();

        self.speed = speed.unwrap_or(self.speed);
        self.direction = direction;
        self.state = MotorState::Running;
        self.release_timer = None;

        debug!("motor drive dir={} speed={}", direction, self.speed);

        if self.has_direction() {
            self.write_pwm(board, previous_stop)?;
            self.controller
                .write_direction(board, &self.pins, direction)?;
        }
        self.write_pwm(board, self.wire_duty(self.speed))?;
        self.clear_brake_line(board, was_braking)
    }
}

impl<T: Transport> MotorDriver<Board<T>> for Motor {
    fn forward(&mut self, board: &mut Board<T>, speed: Option<u8>) -> Result<(), MotorError> {
        self.drive(board, Direction::Forward, speed)
    }

    fn reverse(&mut self, board: &mut Board<T>, speed: Option<u8>) -> Result<(), MotorError> {
        self.drive(board, Direction::Reverse, speed)
    }

    fn start(&mut self, board: &mut Board<T>, speed: Option<u8>) -> Result<(), MotorError> {
        self.drive(board, self.direction, speed)
    }

    fn stop(&mut self, board: &mut Board<T>) -> Result<(), MotorError> {
        let was_braking = self.is_braking();
        self.state = MotorState::Stopped;
        self.release_timer = None;

        debug!("motor stop");
        self.write_pwm(board, self.stop_duty())?;
        self.clear_brake_line(board, was_braking)
    }

    fn brake(&mut self, board: &mut Board<T>, duration_ms: Option<u32>) -> Result<(), MotorError> {
        self.state = MotorState::Braking;
        self.release_timer = duration_ms.map(|remaining_ms| ReleaseTimer { remaining_ms });

        debug!("motor brake duration={}", duration_ms);

        match self.pins {
            PinMap::DirectionalWithBrake { dir, brake, .. } => {
                self.controller.write_line(board, brake, Level::High)?;
                self.write_pwm(board, self.hold_duty())?;
                self.controller.write_line(board, dir, Level::High)?;
            }
            PinMap::DirectionalWithCdir { dir, cdir, .. } => {
                self.write_pwm(board, self.stop_duty())?;
                self.controller.write_brake_lines(board, dir, cdir)?;
                self.write_pwm(board, self.hold_duty())?;
            }
            // No brake hardware: best effort is removing drive
            _ => self.write_pwm(board, self.stop_duty())?,
        }
        Ok(())
    }

    fn release(&mut self, board: &mut Board<T>) -> Result<(), MotorError> {
        self.release_timer = None;
        self.drive(board, self.direction, None)
    }

    fn resume(&mut self, board: &mut Board<T>) -> Result<(), MotorError> {
        self.drive(board, self.direction, None)
    }

    fn update_with_delta(&mut self, board: &mut Board<T>, delta_ms: u32) -> Result<(), MotorError> {
        let release_due = match self.release_timer.as_mut() {
            Some(timer) => {
                timer.remaining_ms = timer.remaining_ms.saturating_sub(delta_ms);
                timer.remaining_ms == 0
            }
            None => false,
        };
        if release_due {
            debug!("motor timed brake release");
            self.release(board)?;
        }

        if let Some(sensor) = self.current.as_mut() {
            sensor.update_with_delta(board.io_mut(), delta_ms)?;
        }
        Ok(())
    }
}
