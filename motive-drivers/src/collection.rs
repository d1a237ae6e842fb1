//! Motor collections
//!
//! A [`MotorCollection`] fans every [`MotorDriver`] operation out to its
//! members in insertion order. Members are shared motor handles or shared
//! nested collections, so one motor or group can be driven alone and as
//! part of any number of groups without copying its state.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use motive_core::{ConfigError, MotorCommand, MotorConfig, MotorDriver, MotorError};
use motive_hal::Transport;

use crate::board::Board;
use crate::motor::Motor;

/// A motor that may belong to several collections
pub type SharedMotor = Rc<RefCell<Motor>>;

/// Wrap a motor so collections can share it
pub fn shared(motor: Motor) -> SharedMotor {
    Rc::new(RefCell::new(motor))
}

/// A collection nested by reference in other collections
pub type SharedCollection = Rc<RefCell<MotorCollection>>;

/// One entry of a collection
#[derive(Debug, Clone)]
pub enum Member {
    Motor(SharedMotor),
    Group(SharedCollection),
}

impl From<SharedMotor> for Member {
    fn from(motor: SharedMotor) -> Self {
        Member::Motor(motor)
    }
}

impl From<Motor> for Member {
    fn from(motor: Motor) -> Self {
        Member::Motor(shared(motor))
    }
}

impl From<SharedCollection> for Member {
    fn from(group: SharedCollection) -> Self {
        Member::Group(group)
    }
}

impl From<MotorCollection> for Member {
    fn from(group: MotorCollection) -> Self {
        Member::Group(group.into_shared())
    }
}

/// Ordered group of motors driven as one
///
/// Nested collections must not contain the collection itself.
#[derive(Debug, Clone, Default)]
pub struct MotorCollection {
    members: Vec<Member>,
}

impl MotorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one motor per configuration
    ///
    /// Fails on the first invalid configuration; no motors are kept.
    pub fn from_configs(configs: &[MotorConfig]) -> Result<Self, ConfigError> {
        let members = configs
            .iter()
            .map(|config| Motor::new(config).map(Member::from))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("collection of {} motors", members.len());
        Ok(Self { members })
    }

    /// Wrap this collection so others can nest it by reference
    pub fn into_shared(self) -> SharedCollection {
        Rc::new(RefCell::new(self))
    }

    /// Group existing motors and collections
    pub fn from_members<I, M>(members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Member>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a member
    pub fn push(&mut self, member: impl Into<Member>) {
        self.members.push(member.into());
    }

    /// Number of direct members (a nested collection counts once)
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Member> {
        self.members.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    /// Every motor reachable from this collection, depth first
    pub fn motors(&self) -> Vec<SharedMotor> {
        let mut out = Vec::new();
        self.collect_motors(&mut out);
        out
    }

    fn collect_motors(&self, out: &mut Vec<SharedMotor>) {
        for member in &self.members {
            match member {
                Member::Motor(motor) => out.push(Rc::clone(motor)),
                Member::Group(group) => group.borrow().collect_motors(out),
            }
        }
    }

    /// Run `f` on every motor, depth first, stopping at the first error
    ///
    /// # Panics
    ///
    /// If a member motor or nested collection is already mutably borrowed
    /// by the caller.
    fn try_for_each<F>(&self, f: &mut F) -> Result<(), MotorError>
    where
        F: FnMut(&mut Motor) -> Result<(), MotorError>,
    {
        for member in &self.members {
            match member {
                Member::Motor(motor) => f(&mut motor.borrow_mut())?,
                Member::Group(group) => group.borrow().try_for_each(f)?,
            }
        }
        Ok(())
    }

    /// Send one command to every motor
    ///
    /// Members after a failing one are not commanded.
    pub fn broadcast<T: Transport>(
        &self,
        board: &mut Board<T>,
        command: MotorCommand,
    ) -> Result<(), MotorError> {
        trace!("collection broadcast {}", command);
        self.try_for_each(&mut |motor: &mut Motor| motor.apply(board, command))
    }
}

impl<T: Transport> MotorDriver<Board<T>> for MotorCollection {
    fn forward(&mut self, board: &mut Board<T>, speed: Option<u8>) -> Result<(), MotorError> {
        self.broadcast(board, MotorCommand::Forward(speed))
    }

    fn reverse(&mut self, board: &mut Board<T>, speed: Option<u8>) -> Result<(), MotorError> {
        self.broadcast(board, MotorCommand::Reverse(speed))
    }

    fn start(&mut self, board: &mut Board<T>, speed: Option<u8>) -> Result<(), MotorError> {
        self.broadcast(board, MotorCommand::Start(speed))
    }

    fn stop(&mut self, board: &mut Board<T>) -> Result<(), MotorError> {
        self.broadcast(board, MotorCommand::Stop)
    }

    fn brake(&mut self, board: &mut Board<T>, duration_ms: Option<u32>) -> Result<(), MotorError> {
        self.broadcast(board, MotorCommand::Brake(duration_ms))
    }

    fn release(&mut self, board: &mut Board<T>) -> Result<(), MotorError> {
        self.broadcast(board, MotorCommand::Release)
    }

    fn resume(&mut self, board: &mut Board<T>) -> Result<(), MotorError> {
        self.broadcast(board, MotorCommand::Resume)
    }

    fn update_with_delta(&mut self, board: &mut Board<T>, delta_ms: u32) -> Result<(), MotorError> {
        self.try_for_each(&mut |motor: &mut Motor| motor.update_with_delta(board, delta_ms))
    }
}
