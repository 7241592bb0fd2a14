//! ESB Telemetry Transmitter Library
//!
//! This library provides the core of an nRF52840-based telemetry transmitter.
//! A periodic timer samples a synthetic buffer and hands it to an Enhanced
//! ShockBurst (ESB) radio in PTX mode. A one-bit readiness handshake keeps
//! at most one transmission in flight.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Periodic Transmitter  │  Completion Handler  │  Status LEDs │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     STARTUP LAYER                            │
//! │        HF clock bring-up  │  Radio init & addressing         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  CLOCK  │  RADIO (ESB PTX)  │  GPIO  │  Sample timer         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Concurrency
//!
//! Two contexts share state once startup is done: the sample timer
//! (drives [`radio::transmit::Transmitter`]) and the radio interrupt
//! (drives [`radio::event::CompletionHandler`]). The only state they share
//! is the [`radio::state::LinkState`] slot, which is a single atomic flag.
//!
//! # Design Principles
//!
//! - **Hardware behind traits**: clock, radio and display are collaborators
//! - **No unsafe in application code**: the only unsafe is the RADIO interrupt glue in `hal::esb`
//! - **Functional core, imperative shell**: Pure logic separated from I/O
//! - **Explicit error handling**: All fallible operations return `Result`

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// This must go first so the macros are visible to every other module.
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_nrf;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// nRF52840 glue for the clock, radio, GPIO and timer collaborators.
#[cfg(feature = "embedded")]
pub mod hal;

/// Radio Control Logic
///
/// Link slot, completion handling and the periodic transmitter.
pub mod radio;

/// Clock Bring-up
///
/// Busy-poll wait for the high-frequency clock.
pub mod power;

/// Status Indication
///
/// Display code projection and LED output.
pub mod ui;

/// Startup sequence
pub mod startup;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    // Common traits
    pub use crate::power::ClockManager;
    pub use crate::radio::RadioLink;
    pub use crate::ui::StatusDisplay;
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    pub use embassy_time::{Duration, Instant, Ticker, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
