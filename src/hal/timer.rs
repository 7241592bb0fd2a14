//! Timer Abstractions
//!
//! Periodic sample clock with a separate first-fire delay.

use embassy_time::{Duration, Ticker, Timer};

use crate::config::{SAMPLE_FIRST_FIRE_US, SAMPLE_PERIOD_US};

/// Periodic timer driving the sample producer
pub struct SampleClock {
    /// Delay before the first tick
    first_fire: Duration,
    /// Period between ticks
    period: Duration,
    /// Running ticker, created on the first tick
    ticker: Option<Ticker>,
}

impl SampleClock {
    /// Create a sample clock from first-fire delay and period in microseconds
    #[must_use]
    pub const fn from_us(first_fire_us: u64, period_us: u64) -> Self {
        Self {
            first_fire: Duration::from_micros(first_fire_us),
            period: Duration::from_micros(period_us),
            ticker: None,
        }
    }

    /// Sample clock with the configured timing
    #[must_use]
    pub const fn sample_rate() -> Self {
        Self::from_us(SAMPLE_FIRST_FIRE_US, SAMPLE_PERIOD_US)
    }

    /// Get the tick rate in Hz
    #[must_use]
    pub fn rate_hz(&self) -> u64 {
        1_000_000 / self.period.as_micros().max(1)
    }

    /// Wait for the next tick
    ///
    /// Missed ticks are not replayed in a burst: the ticker skips ahead.
    pub async fn tick(&mut self) {
        match &mut self.ticker {
            Some(ticker) => ticker.next().await,
            None => {
                Timer::after(self.first_fire).await;
                self.ticker = Some(Ticker::every(self.period));
            }
        }
    }

}

impl defmt::Format for SampleClock {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "SampleClock({}Hz)", self.rate_hz());
    }
}
