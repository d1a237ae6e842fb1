//! Motor current sensing
//!
//! A sense pin is read on a fixed interval while the motor is updated,
//! and the latest raw reading is kept. No scaling to amps is attempted.

use motive_core::config::CurrentSense;
use motive_hal::{AnalogInput, TransportError};

/// Periodically sampled analog current sense line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentSensor {
    channel: u8,
    interval_ms: u16,
    elapsed_ms: u32,
    value: Option<u16>,
}

impl CurrentSensor {
    pub fn new(sense: CurrentSense) -> Self {
        Self {
            channel: sense.channel,
            interval_ms: sense.interval_ms,
            elapsed_ms: 0,
            value: None,
        }
    }

    /// Analog channel being sampled
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Sampling interval in ms
    pub fn interval_ms(&self) -> u16 {
        self.interval_ms
    }

    /// Latest raw reading, if one was taken
    pub fn value(&self) -> Option<u16> {
        self.value
    }

    /// Take a reading now
    pub fn sample<A: AnalogInput>(&mut self, io: &mut A) -> Result<u16, TransportError> {
        let raw = io.analog_read(self.channel)?;
        self.value = Some(raw);
        Ok(raw)
    }

    /// Advance time, sampling once the interval has elapsed
    ///
    /// At most one reading is taken per call however large `delta_ms` is.
    pub fn update_with_delta<A: AnalogInput>(
        &mut self,
        io: &mut A,
        delta_ms: u32,
    ) -> Result<(), TransportError> {
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        if self.elapsed_ms < self.interval_ms as u32 {
            return Ok(());
        }
        self.elapsed_ms = 0;
        self.sample(io).map(|_| ())
    }
}
