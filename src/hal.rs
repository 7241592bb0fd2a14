//! Hardware Abstraction Layer
//!
//! nRF52840 implementations of the collaborator traits: HF clock
//! manager, ESB radio, status LEDs and the sample timer.

pub mod clock;
pub mod esb;
pub mod gpio;
pub mod timer;
