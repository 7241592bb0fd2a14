//! GPIO Abstractions
//!
//! Status LED bank for the nRF52840 DK (LED1-LED4 on P0.13-P0.16,
//! active low).

use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::peripherals::{P0_13, P0_14, P0_15, P0_16};

use crate::ui::Leds;

/// DK status LEDs
pub type DkLeds = Leds<Output<'static>>;

/// Configure the four DK LEDs (initially off)
#[must_use]
pub fn dk_leds(led1: P0_13, led2: P0_14, led3: P0_15, led4: P0_16) -> DkLeds {
    // Active low: start high so nothing is lit before the first tick.
    let pins = [
        Output::new(led1, Level::High, OutputDrive::Standard),
        Output::new(led2, Level::High, OutputDrive::Standard),
        Output::new(led3, Level::High, OutputDrive::Standard),
        Output::new(led4, Level::High, OutputDrive::Standard),
    ];
    Leds::new(pins)
}
