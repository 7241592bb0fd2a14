//! Radio Completion Handling
//!
//! Runs in the radio interrupt. Whatever the event, the transmit slot is
//! released; the event kind only feeds logging and diagnostic counters.
//! Failed payloads are not resubmitted.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::state::LinkState;

/// Event reported by the radio layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadioEvent {
    /// Payload sent (and acknowledged, if an ACK was requested)
    TxSuccess,
    /// Payload not delivered after all retransmissions
    TxFailed,
    /// Packet received (ACK payload)
    RxReceived,
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::TxSuccess => defmt::write!(f, "TX SUCCESS"),
            Self::TxFailed => defmt::write!(f, "TX FAILED"),
            Self::RxReceived => defmt::write!(f, "RX RECEIVED"),
        }
    }
}

/// Per-kind event counters
#[derive(Debug, Default)]
pub struct EventCounts {
    tx_success: AtomicU32,
    tx_failed: AtomicU32,
    rx_received: AtomicU32,
}

impl EventCounts {
    /// Create zeroed counters
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tx_success: AtomicU32::new(0),
            tx_failed: AtomicU32::new(0),
            rx_received: AtomicU32::new(0),
        }
    }

    fn record(&self, event: RadioEvent) {
        let counter = match event {
            RadioEvent::TxSuccess => &self.tx_success,
            RadioEvent::TxFailed => &self.tx_failed,
            RadioEvent::RxReceived => &self.rx_received,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of `TxSuccess` events
    #[must_use]
    pub fn tx_success(&self) -> u32 {
        self.tx_success.load(Ordering::Relaxed)
    }

    /// Number of `TxFailed` events
    #[must_use]
    pub fn tx_failed(&self) -> u32 {
        self.tx_failed.load(Ordering::Relaxed)
    }

    /// Number of `RxReceived` events
    #[must_use]
    pub fn rx_received(&self) -> u32 {
        self.rx_received.load(Ordering::Relaxed)
    }

    /// Total number of events
    #[must_use]
    pub fn total(&self) -> u32 {
        self.tx_success()
            .wrapping_add(self.tx_failed())
            .wrapping_add(self.rx_received())
    }
}

/// Radio completion callback
#[derive(Debug)]
pub struct CompletionHandler<'a> {
    link: &'a LinkState,
    counts: EventCounts,
}

impl<'a> CompletionHandler<'a> {
    /// Create a handler that releases `link`
    #[must_use]
    pub const fn new(link: &'a LinkState) -> Self {
        Self {
            link,
            counts: EventCounts::new(),
        }
    }

    /// Handle one radio event
    pub fn on_event(&self, event: RadioEvent) {
        self.link.release();
        self.counts.record(event);

        match event {
            RadioEvent::TxSuccess => debug!("TX SUCCESS EVENT"),
            RadioEvent::TxFailed => debug!("TX FAILED EVENT"),
            RadioEvent::RxReceived => debug!("Packet received"),
        }
    }

    /// Event counters
    #[must_use]
    pub const fn counts(&self) -> &EventCounts {
        &self.counts
    }
}

/// Outcome of the transfer currently on air
///
/// The radio signals the end of every transfer the same way, whether it
/// finished or was cut short by a flush. The flush marks the transfer as
/// aborted so the end can be reported as a failure.
#[derive(Debug, Default)]
pub struct TransferEnd {
    aborted: AtomicBool,
}

impl TransferEnd {
    /// Create a tracker for a transfer that has not been aborted
    #[must_use]
    pub const fn new() -> Self {
        Self {
            aborted: AtomicBool::new(false),
        }
    }

    /// Mark the transfer on air as aborted
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
    }

    /// Event for the transfer that just ended, resetting the abort mark
    pub fn take_event(&self) -> RadioEvent {
        if self.aborted.swap(false, Ordering::AcqRel) {
            RadioEvent::TxFailed
        } else {
            RadioEvent::TxSuccess
        }
    }
}
