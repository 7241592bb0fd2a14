//! Link State
//!
//! The transmit slot: a single flag that is `true` while no transmission
//! is in flight. The periodic transmitter takes it, the radio completion
//! handler gives it back. The two run in different interrupt contexts, so
//! the flag is an atomic.

use core::sync::atomic::{AtomicBool, Ordering};

/// Single-outstanding-transmission token
#[derive(Debug)]
pub struct LinkState {
    available: AtomicBool,
}

impl LinkState {
    /// Create a link state with the slot available
    #[must_use]
    pub const fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
        }
    }

    /// Take the slot if it is free
    ///
    /// Returns `true` if the caller now owns the slot. Between a successful
    /// acquire and the next [`release`](Self::release), every other acquire
    /// fails.
    pub fn try_acquire(&self) -> bool {
        self.available
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Make the slot available again
    ///
    /// Unconditional: releasing a free slot is a no-op.
    pub fn release(&self) {
        self.available.store(true, Ordering::Release);
    }

    /// Check whether the slot is currently free
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }
}

impl Default for LinkState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LinkState {
    fn format(&self, f: defmt::Formatter) {
        if self.is_available() {
            defmt::write!(f, "READY");
        } else {
            defmt::write!(f, "BUSY");
        }
    }
}
