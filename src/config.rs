//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the ESB transmitter.
//! Sample layout, timer period, radio addressing and pin mappings are
//! centralized here.

use crate::radio::config::{Addressing, Bitrate, Protocol, RadioConfig, RadioMode};
use crate::types::Pipe;

/// Number of 16-bit samples carried in every payload
pub const NUM_SAMPLES: usize = 126;

/// Size of one sample in bytes
pub const SAMPLE_SIZE: usize = core::mem::size_of::<u16>();

/// Maximum ESB payload length in bytes
pub const MAX_PAYLOAD_LEN: usize = 252;

/// Payload length actually used by the sample stream
pub const SAMPLE_PAYLOAD_LEN: usize = NUM_SAMPLES * SAMPLE_SIZE;

/// Sample timer period in microseconds (500 Hz)
pub const SAMPLE_PERIOD_US: u64 = 2_000;

/// Delay before the first sample tick in microseconds
pub const SAMPLE_FIRST_FIRE_US: u64 = 2_000;

/// Destination pipe for sample payloads
pub const SAMPLE_PIPE: Pipe = Pipe::P0;

/// Sample payloads are sent without requesting an acknowledgement
pub const SAMPLE_NOACK: bool = true;

/// Index of the sample whose low byte drives the status LEDs
pub const STATUS_SAMPLE_INDEX: usize = 1;

/// Number of status LEDs on the development kit
pub const NUM_STATUS_LEDS: usize = 4;

/// Radio channel (2400 MHz + channel)
pub const RF_CHANNEL: u8 = 2;

/// On-air address length in bytes (base address + prefix)
pub const ADDRESS_LENGTH: u8 = 5;

/// Base address for pipe 0
///
/// These are arbitrary defaults. Products should use different addresses
/// for each set of devices.
pub const BASE_ADDRESS_0: [u8; 4] = [0xE7, 0xE7, 0xE7, 0xE7];

/// Base address for pipes 1-7
pub const BASE_ADDRESS_1: [u8; 4] = [0xC2, 0xC2, 0xC2, 0xC2];

/// Address prefixes, one per pipe
pub const ADDRESS_PREFIXES: [u8; 8] = [0xE7, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8];

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments for the nRF52840 DK

    /// LED1 (active low)
    pub const LED1: &str = "P0.13";

    /// LED2 (active low)
    pub const LED2: &str = "P0.14";

    /// LED3 (active low)
    pub const LED3: &str = "P0.15";

    /// LED4 (active low)
    pub const LED4: &str = "P0.16";
}

/// Ticks between statistics log lines (10 s)
pub const STATS_LOG_TICKS: u32 = 5_000;

/// Radio addressing used by the transmitter
#[must_use]
pub const fn default_addressing() -> Addressing {
    Addressing {
        base_address_0: BASE_ADDRESS_0,
        base_address_1: BASE_ADDRESS_1,
        prefixes: ADDRESS_PREFIXES,
        rf_channel: RF_CHANNEL,
    }
}

/// Radio configuration used by the transmitter
///
/// No retransmissions: a lost sample is simply replaced by the next one.
#[must_use]
pub const fn default_radio_config() -> RadioConfig {
    RadioConfig {
        protocol: Protocol::EsbDpl,
        mode: RadioMode::Ptx,
        bitrate: Bitrate::Mbps2,
        retransmit_delay_us: 0,
        retransmit_count: 0,
        selective_auto_ack: true,
        use_fast_ramp_up: cfg!(feature = "fast-switching"),
        event_handler: None,
    }
}
