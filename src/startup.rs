//! Startup Sequence
//!
//! Brings the system up in a fixed order: HF clock, then radio
//! configuration, then addressing. Each step only runs if the previous one
//! succeeded. The sample timer must not be armed unless this returns `Ok`.

use core::fmt;

use crate::power::{bring_up_clock, ClockError, ClockManager};
use crate::radio::config::{Addressing, RadioConfig};
use crate::radio::{RadioError, RadioLink};

/// Fatal startup error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartupError {
    /// HF clock did not start
    Clock(ClockError),
    /// Radio rejected its configuration or addressing
    Radio(RadioError),
}

impl From<ClockError> for StartupError {
    fn from(err: ClockError) -> Self {
        Self::Clock(err)
    }
}

impl From<RadioError> for StartupError {
    fn from(err: RadioError) -> Self {
        Self::Radio(err)
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clock(err) => write!(f, "clock bring-up failed: {err}"),
            Self::Radio(err) => write!(f, "ESB initialization failed: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Clock(err) => Some(err),
            Self::Radio(err) => Some(err),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for StartupError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Clock(err) => defmt::write!(f, "Clock({})", err),
            Self::Radio(err) => defmt::write!(f, "Radio({})", err),
        }
    }
}

/// Configure the radio and its addressing
///
/// # Errors
///
/// Returns the first error from validation, `initialize` or
/// `set_addressing`. Later steps are skipped.
pub fn initialize_radio<R: RadioLink + ?Sized>(
    radio: &mut R,
    config: &RadioConfig,
    addressing: &Addressing,
) -> Result<(), RadioError> {
    config.validate()?;
    addressing.validate()?;

    radio.initialize(config)?;
    radio.set_addressing(addressing)?;
    Ok(())
}

/// Run the full startup sequence
///
/// # Errors
///
/// Any error is fatal. On a clock error the radio is never touched.
pub fn bring_up<C, R>(
    clock: &mut C,
    radio: &mut R,
    config: &RadioConfig,
    addressing: &Addressing,
) -> Result<(), StartupError>
where
    C: ClockManager,
    R: RadioLink + ?Sized,
{
    info!("Enhanced ShockBurst ptx sample");

    bring_up_clock(clock)?;

    initialize_radio(radio, config, addressing).inspect_err(|err| {
        error!("ESB initialization failed, err {}", err);
    })?;

    info!("Initialization complete");
    Ok(())
}
