//! Radio Configuration
//!
//! Parameters handed to the radio layer at initialization.

use core::fmt;

use super::event::RadioEvent;
use super::RadioError;

/// Completion callback signature registered with the radio layer
pub type EventHandler = fn(RadioEvent);

/// ESB protocol variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Protocol {
    /// Fixed payload length
    EsbFpl,
    /// Dynamic payload length
    #[default]
    EsbDpl,
}

impl Protocol {
    /// Length field size in bits for the on-air packet header
    #[must_use]
    pub const fn length_bits(self) -> u8 {
        match self {
            Self::EsbFpl => 0,
            Self::EsbDpl => 8,
        }
    }
}

/// Radio role
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RadioMode {
    /// Primary transmitter
    #[default]
    Ptx,
    /// Primary receiver
    Prx,
}

/// On-air bitrate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Bitrate {
    /// 1 Mbps
    Mbps1,
    /// 2 Mbps
    #[default]
    Mbps2,
    /// 4 Mbps (nRF54 series only)
    Mbps4,
}

impl Bitrate {
    /// Bitrate in kilobits per second
    #[must_use]
    pub const fn as_kbps(self) -> u32 {
        match self {
            Self::Mbps1 => 1_000,
            Self::Mbps2 => 2_000,
            Self::Mbps4 => 4_000,
        }
    }
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Mbps", self.as_kbps() / 1_000)
    }
}

/// Radio layer configuration
#[derive(Clone, Copy, Debug)]
pub struct RadioConfig {
    /// Protocol variant
    pub protocol: Protocol,
    /// PTX or PRX
    pub mode: RadioMode,
    /// On-air bitrate
    pub bitrate: Bitrate,
    /// Delay between retransmissions in microseconds
    pub retransmit_delay_us: u16,
    /// Number of retransmissions (0 = send once)
    pub retransmit_count: u8,
    /// Honour the per-packet `noack` flag
    pub selective_auto_ack: bool,
    /// Fast radio ramp-up
    pub use_fast_ramp_up: bool,
    /// Completion callback, invoked from the radio interrupt
    pub event_handler: Option<EventHandler>,
}

impl RadioConfig {
    /// Register the completion callback (returns new config)
    #[must_use]
    pub const fn with_event_handler(self, handler: EventHandler) -> Self {
        Self {
            event_handler: Some(handler),
            ..self
        }
    }

    /// Check the configuration is usable by a transmitter
    ///
    /// # Errors
    ///
    /// Returns [`RadioError::InvalidConfig`] if no callback is registered
    /// or the role is not PTX.
    pub fn validate(&self) -> Result<(), RadioError> {
        if self.event_handler.is_none() || self.mode != RadioMode::Ptx {
            return Err(RadioError::InvalidConfig);
        }
        Ok(())
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        crate::config::default_radio_config()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Radio({}kbps, rt={}x{}us, sel_ack={}, fast={})",
            self.bitrate.as_kbps(),
            self.retransmit_count,
            self.retransmit_delay_us,
            self.selective_auto_ack,
            self.use_fast_ramp_up
        );
    }
}

/// Pipe addressing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Addressing {
    /// Base address for pipe 0
    pub base_address_0: [u8; 4],
    /// Base address for pipes 1-7
    pub base_address_1: [u8; 4],
    /// One prefix byte per pipe
    pub prefixes: [u8; 8],
    /// RF channel (2400 MHz + channel)
    pub rf_channel: u8,
}

impl Addressing {
    /// Highest usable RF channel
    pub const MAX_RF_CHANNEL: u8 = 100;

    /// Check the addressing is usable
    ///
    /// # Errors
    ///
    /// Returns [`RadioError::InvalidAddress`] when the channel is out of
    /// range or two pipes share the same prefix on the same base address.
    pub fn validate(&self) -> Result<(), RadioError> {
        if self.rf_channel > Self::MAX_RF_CHANNEL {
            return Err(RadioError::InvalidAddress);
        }

        // Pipes 1-7 share base address 1, so their prefixes must differ.
        let shared = &self.prefixes[1..];
        for (i, a) in shared.iter().enumerate() {
            if shared[i + 1..].contains(a) {
                return Err(RadioError::InvalidAddress);
            }
        }

        Ok(())
    }
}

impl Addressing {
    /// Base address length in bytes, as programmed into the radio
    ///
    /// The prefix byte makes up the rest of the on-air address.
    #[must_use]
    pub const fn base_length() -> u8 {
        crate::config::ADDRESS_LENGTH - 1
    }

    /// BASE0 register value
    #[must_use]
    pub const fn base0_register(&self) -> u32 {
        base_register(self.base_address_0)
    }

    /// BASE1 register value
    #[must_use]
    pub const fn base1_register(&self) -> u32 {
        base_register(self.base_address_1)
    }

    /// PREFIX0 and PREFIX1 register values (pipes 0-3 and 4-7)
    #[must_use]
    pub const fn prefix_registers(&self) -> [u32; 2] {
        let p = bit_reversed(self.prefixes);
        [
            u32::from_le_bytes([p[0], p[1], p[2], p[3]]),
            u32::from_le_bytes([p[4], p[5], p[6], p[7]]),
        ]
    }
}

/// Reverse the bit order of every byte
///
/// The radio sends address bytes LSB first, while ESB addresses are
/// specified MSB first.
const fn bit_reversed<const N: usize>(mut bytes: [u8; N]) -> [u8; N] {
    let mut i = 0;
    while i < N {
        bytes[i] = bytes[i].reverse_bits();
        i += 1;
    }
    bytes
}

/// Register layout for a base address: first byte in the top bits
const fn base_register(address: [u8; 4]) -> u32 {
    u32::from_be_bytes(bit_reversed(address))
}

impl Default for Addressing {
    fn default() -> Self {
        crate::config::default_addressing()
    }
}
