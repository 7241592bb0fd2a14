//! ESB Transmitter Main Application
//!
//! Entry point for the nRF52840 telemetry transmitter.
//! Brings up the HF clock and radio, then spawns the sample task.
//! Build with: cargo build --release --target thumbv7em-none-eabihf --no-default-features --features embedded

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_nrf::bind_interrupts;
use embassy_nrf::interrupt::Priority;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use esb_ptx::hal::clock::HfClock;
use esb_ptx::hal::esb::{self, EsbRadio};
use esb_ptx::hal::gpio::{dk_leds, DkLeds};
use esb_ptx::hal::timer::SampleClock;
use esb_ptx::prelude::*;
use esb_ptx::radio::event::{CompletionHandler, RadioEvent};
use esb_ptx::radio::state::LinkState;
use esb_ptx::radio::transmit::Transmitter;
use esb_ptx::startup;

bind_interrupts!(struct Irqs {
    RADIO => esb::InterruptHandler;
});

/// Transmit slot shared by the sample task and the radio interrupt
static LINK: LinkState = LinkState::new();

/// Completion callback state
static COMPLETION: CompletionHandler<'static> = CompletionHandler::new(&LINK);

/// Radio driver; the packet buffer must stay put while on air
static RADIO: StaticCell<EsbRadio> = StaticCell::new();

/// Registered with the radio; runs in the RADIO interrupt
fn on_radio_event(event: RadioEvent) {
    COMPLETION.on_event(event);
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ESB PTX firmware v{}", env!("CARGO_PKG_VERSION"));

    let mut config = embassy_nrf::config::Config::default();
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);

    let leds = dk_leds(p.P0_13, p.P0_14, p.P0_15, p.P0_16);
    let radio = RADIO.init(EsbRadio::new(p.RADIO, Irqs));

    let mut clock = HfClock::new();
    let radio_config = default_radio_config().with_event_handler(on_radio_event);
    if let Err(err) = startup::bring_up(&mut clock, radio, &radio_config, &default_addressing()) {
        // Nothing is armed; the radio stays off.
        error!("Startup failed: {}", err);
        return;
    }

    info!("Sending samples every {}us", SAMPLE_PERIOD_US);
    spawner.must_spawn(sample_task(radio, leds));

    loop {
        Timer::after(Duration::from_secs(10)).await;
        info!(
            "Radio events: ok={} failed={} rx={}",
            COMPLETION.counts().tx_success(),
            COMPLETION.counts().tx_failed(),
            COMPLETION.counts().rx_received()
        );
    }
}

/// Sample task - one transmitter tick per sample period
#[embassy_executor::task]
async fn sample_task(radio: &'static mut EsbRadio, mut leds: DkLeds) {
    let mut transmitter: Transmitter<'static> = Transmitter::new(&LINK);
    let mut clock = SampleClock::sample_rate();
    info!("Sample clock: {}", clock);

    loop {
        clock.tick().await;
        transmitter.on_tick(radio, &mut leds);

        let stats = transmitter.stats();
        if stats.ticks() % STATS_LOG_TICKS == 0 {
            info!("{}", stats);
        }
    }
}
