//! Recording transport for tests

use alloc::vec::Vec;

use motive_hal::{
    AnalogInput, BitOrder, DigitalOutput, I2cWrite, Level, PwmOutput, ShiftOut, TransportError,
};

/// One recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Digital(u8, u8),
    Analog(u8, u8),
    I2c(u8, Vec<u16>),
    Shift {
        data: u8,
        clock: u8,
        order: BitOrder,
        value: u8,
    },
    AnalogRead(u8),
}

/// Transport that records every call in order
#[derive(Debug, Default)]
pub struct MockTransport {
    pub calls: Vec<Call>,
    /// Value returned by `analog_read`
    pub analog_value: u16,
    /// Fail the write with this index (counted from the last `clear`)
    pub fail_at: Option<usize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn digital(&self) -> Vec<(u8, u8)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Digital(pin, value) => Some((*pin, *value)),
                _ => None,
            })
            .collect()
    }

    pub fn analog(&self) -> Vec<(u8, u8)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Analog(pin, duty) => Some((*pin, *duty)),
                _ => None,
            })
            .collect()
    }

    pub fn i2c(&self) -> Vec<(u8, Vec<u16>)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::I2c(address, words) => Some((*address, words.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn shifts(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Shift { value, .. } => Some(*value),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, call: Call) -> Result<(), TransportError> {
        if self.fail_at == Some(self.calls.len()) {
            return Err(TransportError::Bus);
        }
        self.calls.push(call);
        Ok(())
    }
}

impl DigitalOutput for MockTransport {
    fn digital_write(&mut self, pin: u8, level: Level) -> Result<(), TransportError> {
        self.record(Call::Digital(pin, level.as_u8()))
    }
}

impl PwmOutput for MockTransport {
    fn analog_write(&mut self, pin: u8, duty: u8) -> Result<(), TransportError> {
        self.record(Call::Analog(pin, duty))
    }
}

impl I2cWrite for MockTransport {
    fn i2c_write(&mut self, address: u8, words: &[u16]) -> Result<(), TransportError> {
        self.record(Call::I2c(address, words.to_vec()))
    }
}

impl ShiftOut for MockTransport {
    fn shift_out(
        &mut self,
        data_pin: u8,
        clock_pin: u8,
        order: BitOrder,
        value: u8,
    ) -> Result<(), TransportError> {
        self.record(Call::Shift {
            data: data_pin,
            clock: clock_pin,
            order,
            value,
        })
    }
}

impl AnalogInput for MockTransport {
    fn analog_read(&mut self, channel: u8) -> Result<u16, TransportError> {
        self.record(Call::AnalogRead(channel))?;
        Ok(self.analog_value)
    }
}
