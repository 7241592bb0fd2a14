//! Status Indication
//!
//! Projects a payload byte onto the development kit LEDs. Each LED has an
//! "off" window over `value % 8`; outside its window it is lit. Over eight
//! consecutive values the pattern walks around the four LEDs.

use core::fmt;

use embedded_hal::digital::OutputPin;

/// Number of status lines
pub const NUM_LINES: usize = 4;

/// Off window per line: `(low, high)` with the line off for `low < v <= high`
const OFF_WINDOWS: [(u8, u8); NUM_LINES] = [(0, 4), (1, 5), (2, 6), (3, 7)];

/// Display code: bit `i` set means line `i` is on
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DisplayCode(u8);

impl DisplayCode {
    /// All lines on
    pub const ALL_ON: Self = Self(0b1111);

    /// All lines off
    pub const ALL_OFF: Self = Self(0);

    /// Create from a bitmask (bits above the line count are dropped)
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL_ON.0)
    }

    /// Get the bitmask
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if a line is on (out-of-range lines are off)
    #[must_use]
    pub const fn is_on(self, line: usize) -> bool {
        line < NUM_LINES && self.0 & (1 << line) != 0
    }

    /// Number of lines on
    #[must_use]
    pub const fn count_on(self) -> u32 {
        self.0.count_ones()
    }
}

impl fmt::Debug for DisplayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisplayCode({:04b})", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DisplayCode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u8:04b}", self.0);
    }
}

/// Derive the display code for a byte
///
/// Depends only on `value % 8`.
#[must_use]
pub const fn display_code(value: u8) -> DisplayCode {
    let v = value % 8;
    let mut bits = 0;
    let mut line = 0;
    while line < NUM_LINES {
        let (low, high) = OFF_WINDOWS[line];
        if !(v > low && v <= high) {
            bits |= 1 << line;
        }
        line += 1;
    }
    DisplayCode(bits)
}

/// Status display driver
pub trait StatusDisplay {
    /// Show `code`
    fn set_lines(&mut self, code: DisplayCode);
}

impl<T: StatusDisplay + ?Sized> StatusDisplay for &mut T {
    fn set_lines(&mut self, code: DisplayCode) {
        (**self).set_lines(code);
    }
}

/// Discards every code
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDisplay;

impl StatusDisplay for NoDisplay {
    fn set_lines(&mut self, _code: DisplayCode) {}
}

/// LED bank driven through GPIO
///
/// DK LEDs are active low: a lit line drives its pin low.
pub struct Leds<P: OutputPin> {
    pins: [P; NUM_LINES],
    active_low: bool,
    shown: DisplayCode,
}

impl<P: OutputPin> Leds<P> {
    /// Create an active-low LED bank and switch every LED off
    pub fn new(pins: [P; NUM_LINES]) -> Self {
        Self::with_polarity(pins, true)
    }

    /// Create an LED bank with explicit polarity and switch every LED off
    pub fn with_polarity(pins: [P; NUM_LINES], active_low: bool) -> Self {
        let mut leds = Self {
            pins,
            active_low,
            shown: DisplayCode::ALL_OFF,
        };
        leds.set_lines(DisplayCode::ALL_OFF);
        leds
    }

    /// Last code written
    #[must_use]
    pub const fn shown(&self) -> DisplayCode {
        self.shown
    }

    /// Release the pins
    pub fn release(self) -> [P; NUM_LINES] {
        self.pins
    }
}

impl<P: OutputPin> StatusDisplay for Leds<P> {
    fn set_lines(&mut self, code: DisplayCode) {
        for (line, pin) in self.pins.iter_mut().enumerate() {
            let high = code.is_on(line) != self.active_low;
            // GPIO writes on the DK are infallible; a failing pin just
            // leaves that LED stale.
            let _ = if high { pin.set_high() } else { pin.set_low() };
        }
        self.shown = code;
    }
}
