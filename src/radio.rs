//! Radio Control Logic
//!
//! The radio protocol engine itself (framing, acknowledgement, address
//! matching) lives behind [`RadioLink`]. This module holds the logic that
//! sits on top of it: the transmit slot, the completion handler and the
//! periodic transmitter.

pub mod config;
pub mod event;
pub mod state;
pub mod transmit;

use core::fmt;

use crate::types::Payload;
use config::{Addressing, RadioConfig};

/// Radio layer error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadioError {
    /// Configuration rejected by the radio layer
    InvalidConfig,
    /// Address or prefix rejected by the radio layer
    InvalidAddress,
    /// Radio not initialized, or TX queue full
    Busy,
    /// Payload longer than the radio accepts
    PayloadTooLong,
    /// Driver-specific error code
    Hardware(i32),
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig => write!(f, "invalid radio configuration"),
            Self::InvalidAddress => write!(f, "invalid radio address"),
            Self::Busy => write!(f, "radio busy"),
            Self::PayloadTooLong => write!(f, "payload too long"),
            Self::Hardware(code) => write!(f, "radio error {code}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RadioError {}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::InvalidConfig => defmt::write!(f, "InvalidConfig"),
            Self::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            Self::Busy => defmt::write!(f, "Busy"),
            Self::PayloadTooLong => defmt::write!(f, "PayloadTooLong"),
            Self::Hardware(code) => defmt::write!(f, "Hardware({})", code),
        }
    }
}

/// Radio protocol engine
///
/// All calls are made from thread or timer context. Completion events are
/// delivered separately, through the handler registered in
/// [`RadioConfig::event_handler`].
pub trait RadioLink {
    /// Configure the radio and register the completion callback
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is rejected.
    fn initialize(&mut self, config: &RadioConfig) -> Result<(), RadioError>;

    /// Set base addresses, prefixes and RF channel
    ///
    /// # Errors
    ///
    /// Returns an error if the addressing is rejected.
    fn set_addressing(&mut self, addressing: &Addressing) -> Result<(), RadioError>;

    /// Queue a payload for transmission
    ///
    /// The payload is only borrowed for the duration of the call. On-air
    /// completion is reported later through the completion callback.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload could not be queued.
    fn write(&mut self, payload: &Payload) -> Result<(), RadioError>;

    /// Drop anything still queued for transmission
    fn flush(&mut self);
}

impl<T: RadioLink + ?Sized> RadioLink for &mut T {
    fn initialize(&mut self, config: &RadioConfig) -> Result<(), RadioError> {
        (**self).initialize(config)
    }

    fn set_addressing(&mut self, addressing: &Addressing) -> Result<(), RadioError> {
        (**self).set_addressing(addressing)
    }

    fn write(&mut self, payload: &Payload) -> Result<(), RadioError> {
        (**self).write(payload)
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}
