//! Transport error type

/// Errors reported by a transport collaborator
///
/// Writes are fire-and-forget from the driver's point of view; a failure is
/// never retried and is handed straight back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// A pin write or read was rejected (pin number attached)
    Pin(u8),
    /// I2C device did not acknowledge (7-bit address attached)
    Nack(u8),
    /// Generic bus failure
    Bus,
    /// The transport did not complete in time
    Timeout,
}
