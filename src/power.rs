//! Clock Bring-up
//!
//! The radio needs the high-frequency crystal running before it can be
//! touched. The clock manager starts it asynchronously; this module waits
//! for the result by spinning on the notification, because it runs before
//! the executor and interrupt-driven wakers are available.

use core::fmt;

/// Result of polling a clock request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockPoll {
    /// Notification not delivered yet (request not yet registered or
    /// clock still starting)
    Pending,
    /// Notification delivered with a result code (0 = running)
    Ready(i32),
}

#[cfg(feature = "embedded")]
impl defmt::Format for ClockPoll {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Pending => defmt::write!(f, "Pending"),
            Self::Ready(code) => defmt::write!(f, "Ready({})", code),
        }
    }
}

/// Clock bring-up error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockError {
    /// The clock manager could not be obtained
    ManagerUnavailable,
    /// The clock manager rejected the start request
    RequestRejected(i32),
    /// The clock reported a nonzero result
    StartFailed(i32),
}

impl ClockError {
    /// Errno-style code for this error
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            // ENXIO
            Self::ManagerUnavailable => -6,
            Self::RequestRejected(code) | Self::StartFailed(code) => code,
        }
    }
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManagerUnavailable => write!(f, "unable to get the clock manager"),
            Self::RequestRejected(code) => write!(f, "clock request failed: {code}"),
            Self::StartFailed(code) => write!(f, "clock could not be started: {code}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClockError {}

#[cfg(feature = "embedded")]
impl defmt::Format for ClockError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::ManagerUnavailable => defmt::write!(f, "ManagerUnavailable"),
            Self::RequestRejected(code) => defmt::write!(f, "RequestRejected({})", code),
            Self::StartFailed(code) => defmt::write!(f, "StartFailed({})", code),
        }
    }
}

/// External clock manager
pub trait ClockManager {
    /// Handle for one outstanding request
    type Handle;

    /// Issue an asynchronous request to start the HF clock
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::ManagerUnavailable`] if there is no manager,
    /// or [`ClockError::RequestRejected`] if the request is refused.
    fn request(&mut self) -> Result<Self::Handle, ClockError>;

    /// Fetch the notification for `handle` without blocking
    fn poll(&mut self, handle: &mut Self::Handle) -> ClockPoll;

    /// Board-specific work once the clock is confirmed running
    fn post_start(&mut self) {}
}

impl<T: ClockManager + ?Sized> ClockManager for &mut T {
    type Handle = T::Handle;

    fn request(&mut self) -> Result<Self::Handle, ClockError> {
        (**self).request()
    }

    fn poll(&mut self, handle: &mut Self::Handle) -> ClockPoll {
        (**self).poll(handle)
    }

    fn post_start(&mut self) {
        (**self).post_start();
    }
}

/// Start the HF clock and spin until it is confirmed running
///
/// Nothing else may touch the radio until this returns `Ok`.
///
/// # Errors
///
/// Any error is fatal for startup: the caller must not go on to radio or
/// timer setup.
pub fn bring_up_clock<C: ClockManager>(clock: &mut C) -> Result<(), ClockError> {
    let mut handle = clock.request().inspect_err(|err| match err {
        ClockError::ManagerUnavailable => error!("Unable to get the Clock manager"),
        _ => error!("Clock request failed: {}", err.code()),
    })?;

    loop {
        match clock.poll(&mut handle) {
            ClockPoll::Pending => core::hint::spin_loop(),
            ClockPoll::Ready(0) => break,
            ClockPoll::Ready(code) => {
                error!("Clock could not be started: {}", code);
                return Err(ClockError::StartFailed(code));
            }
        }
    }

    clock.post_start();
    debug!("HF clock started");
    Ok(())
}
