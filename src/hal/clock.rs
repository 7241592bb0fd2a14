//! HF Clock Control
//!
//! Starts the external 32 MHz crystal, which the radio requires. The start
//! task is fire-and-forget; completion shows up as the HFCLKSTARTED event.

use embassy_nrf::pac;

use crate::power::{ClockError, ClockManager, ClockPoll};

/// Outstanding HFXO start request
#[derive(Debug)]
pub struct HfclkRequest {
    _private: (),
}

/// HFXO clock manager
#[derive(Debug, Default)]
pub struct HfClock {
    requested: bool,
}

impl HfClock {
    /// Create the clock manager
    #[must_use]
    pub const fn new() -> Self {
        Self { requested: false }
    }
}

impl ClockManager for HfClock {
    type Handle = HfclkRequest;

    fn request(&mut self) -> Result<Self::Handle, ClockError> {
        if self.requested {
            // One request per boot; a second one means startup ran twice.
            return Err(ClockError::RequestRejected(-114)); // EALREADY
        }
        self.requested = true;

        let clock = pac::CLOCK;
        clock.events_hfclkstarted().write_value(0);
        clock.tasks_hfclkstart().write_value(1);
        Ok(HfclkRequest { _private: () })
    }

    fn poll(&mut self, _handle: &mut Self::Handle) -> ClockPoll {
        if pac::CLOCK.events_hfclkstarted().read() == 0 {
            ClockPoll::Pending
        } else {
            ClockPoll::Ready(0)
        }
    }

    fn post_start(&mut self) {
        pac::CLOCK.events_hfclkstarted().write_value(0);
    }
}
