//! Periodic Transmitter
//!
//! Called once per sample period. If the transmit slot is free, the current
//! samples are copied into the payload and queued on the radio; otherwise
//! the period is an overrun and its data is dropped. The samples advance
//! every period either way.

use super::state::LinkState;
use super::{RadioError, RadioLink};
use crate::config::{NUM_SAMPLES, SAMPLE_NOACK, SAMPLE_PIPE, STATUS_SAMPLE_INDEX};
use crate::types::{Payload, SampleBuffer};
use crate::ui::{display_code, DisplayCode, StatusDisplay};

/// What happened on one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Payload queued on the radio
    Sent {
        /// Code shown on the status display this tick
        status: DisplayCode,
    },
    /// Radio refused the payload; the slot stays held until the next
    /// completion event
    SubmitFailed {
        /// Code shown on the status display this tick
        status: DisplayCode,
        /// Error returned by the radio
        error: RadioError,
    },
    /// Slot still held by the previous transmission; nothing sent
    Overrun,
}

impl TickOutcome {
    /// Check if a payload was queued
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    /// Code shown this tick, if the display was updated
    #[must_use]
    pub const fn status(&self) -> Option<DisplayCode> {
        match self {
            Self::Sent { status } | Self::SubmitFailed { status, .. } => Some(*status),
            Self::Overrun => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TickOutcome {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Sent { status } => defmt::write!(f, "Sent({})", status),
            Self::SubmitFailed { status, error } => {
                defmt::write!(f, "SubmitFailed({}, {})", status, error);
            }
            Self::Overrun => defmt::write!(f, "Overrun"),
        }
    }
}

/// Transmitter counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransmitStats {
    /// Payloads accepted by the radio
    pub sent: u32,
    /// Ticks that found the slot held
    pub overruns: u32,
    /// Payloads the radio refused
    pub submit_failures: u32,
}

impl TransmitStats {
    /// Total ticks seen
    #[must_use]
    pub const fn ticks(&self) -> u32 {
        self.sent
            .wrapping_add(self.overruns)
            .wrapping_add(self.submit_failures)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TransmitStats {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Stats(sent={}, overrun={}, failed={})",
            self.sent,
            self.overruns,
            self.submit_failures
        );
    }
}

/// Sample producer and periodic transmitter
///
/// Owns the sample buffer, the payload and the counters. Shares only the
/// [`LinkState`] with the completion handler.
#[derive(Debug)]
pub struct Transmitter<'a, const N: usize = NUM_SAMPLES> {
    link: &'a LinkState,
    samples: SampleBuffer<N>,
    payload: Payload,
    stats: TransmitStats,
}

impl<'a, const N: usize> Transmitter<'a, N> {
    /// Create a transmitter with zeroed samples
    #[must_use]
    pub const fn new(link: &'a LinkState) -> Self {
        Self::with_samples(link, SampleBuffer::new())
    }

    /// Create a transmitter starting from `samples`
    #[must_use]
    pub const fn with_samples(link: &'a LinkState, samples: SampleBuffer<N>) -> Self {
        Self {
            link,
            samples,
            payload: Payload::new(SAMPLE_PIPE, SAMPLE_NOACK),
            stats: TransmitStats {
                sent: 0,
                overruns: 0,
                submit_failures: 0,
            },
        }
    }

    /// Current samples
    #[must_use]
    pub const fn samples(&self) -> &SampleBuffer<N> {
        &self.samples
    }

    /// Last payload handed to the radio
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Counters
    #[must_use]
    pub const fn stats(&self) -> TransmitStats {
        self.stats
    }

    /// Committed transmissions (payloads accepted by the radio)
    #[must_use]
    pub const fn packets_sent(&self) -> u32 {
        self.stats.sent
    }

    /// Run one sample period
    ///
    /// Must not block: this runs at the sample timer's priority.
    pub fn on_tick<R, D>(&mut self, radio: &mut R, display: &mut D) -> TickOutcome
    where
        R: RadioLink + ?Sized,
        D: StatusDisplay + ?Sized,
    {
        let outcome = if self.link.try_acquire() {
            self.transmit(radio, display)
        } else {
            error!("NOT READY!");
            self.stats.overruns = self.stats.overruns.wrapping_add(1);
            TickOutcome::Overrun
        };

        self.samples.advance();
        outcome
    }

    fn transmit<R, D>(&mut self, radio: &mut R, display: &mut D) -> TickOutcome
    where
        R: RadioLink + ?Sized,
        D: StatusDisplay + ?Sized,
    {
        radio.flush();

        // Status reflects the previous payload, read before it is overwritten.
        let status = display_code(self.payload.sample(STATUS_SAMPLE_INDEX).to_le_bytes()[0]);
        display.set_lines(status);

        self.payload.fill_from(&self.samples);

        match radio.write(&self.payload) {
            Ok(()) => {
                self.stats.sent = self.stats.sent.wrapping_add(1);
                trace!("Payload queued, {} sent", self.stats.sent);
                TickOutcome::Sent { status }
            }
            Err(error) => {
                // The slot stays held; only a completion event frees it.
                error!("Payload write failed, err {}", error);
                self.stats.submit_failures = self.stats.submit_failures.wrapping_add(1);
                TickOutcome::SubmitFailed { status, error }
            }
        }
    }
}
