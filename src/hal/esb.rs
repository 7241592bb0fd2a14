//! ESB PTX Radio
//!
//! Transmit-only Enhanced ShockBurst on the nRF52840 RADIO peripheral.
//! Payloads are sent once, without acknowledgement. The DISABLED event
//! that ends every transmission is reported through the registered
//! completion callback: `TxSuccess`, or `TxFailed` if a flush cut the
//! transmission short.
//!
//! Addresses follow the Nordic ESB layout: 5 bytes on air, every byte sent
//! MSB first.
//!
//! Packet layout (dynamic payload length):
//!
//! ```text
//! ┌────────┬──────────────────┬──────────────┐
//! │ LENGTH │ S1: PID(2) ACK(1)│ DATA (≤ 252) │
//! └────────┴──────────────────┴──────────────┘
//! ```

use core::cell::Cell;
use core::sync::atomic::{compiler_fence, Ordering};

use critical_section::Mutex;
use embassy_nrf::interrupt::{self, typelevel, InterruptExt, Priority};
use embassy_nrf::pac;
use embassy_nrf::pac::radio::vals;
use embassy_nrf::peripherals::RADIO;

use crate::config::MAX_PAYLOAD_LEN;
use crate::radio::config::{Addressing, Bitrate, EventHandler, Protocol, RadioConfig};
use crate::radio::event::TransferEnd;
use crate::radio::{RadioError, RadioLink};
use crate::types::Payload;

/// Bytes in front of the payload data (length + S1)
const HEADER_LEN: usize = 2;

/// Completion callback, read from the RADIO interrupt
static EVENT_HANDLER: Mutex<Cell<Option<EventHandler>>> = Mutex::new(Cell::new(None));

/// Set by `flush`, read by the RADIO interrupt
static TRANSFER_END: TransferEnd = TransferEnd::new();

/// RADIO interrupt handler
///
/// Bind with `bind_interrupts!(struct Irqs { RADIO => InterruptHandler; })`.
pub struct InterruptHandler {
    _private: (),
}

#[allow(unsafe_code)]
impl typelevel::Handler<typelevel::RADIO> for InterruptHandler {
    unsafe fn on_interrupt() {
        let r = pac::RADIO;
        if r.events_disabled().read() == 0 {
            return;
        }
        r.events_disabled().write_value(0);

        let event = TRANSFER_END.take_event();
        let handler = critical_section::with(|cs| EVENT_HANDLER.borrow(cs).get());
        if let Some(handler) = handler {
            handler(event);
        }
    }
}

/// ESB transmitter
pub struct EsbRadio {
    _radio: RADIO,
    /// On-air packet, read by RADIO DMA until DISABLED
    packet: [u8; HEADER_LEN + MAX_PAYLOAD_LEN],
    /// Packet identifier, 2 bits, changes on every new payload
    pid: u8,
    initialized: bool,
}

impl EsbRadio {
    /// Take ownership of the RADIO peripheral
    ///
    /// The instance must not move after the first [`RadioLink::write`],
    /// since the radio reads the packet buffer by address. Keep it in a
    /// `StaticCell`.
    #[must_use]
    pub fn new(
        radio: RADIO,
        _irq: impl typelevel::Binding<typelevel::RADIO, InterruptHandler>,
    ) -> Self {
        Self {
            _radio: radio,
            packet: [0; HEADER_LEN + MAX_PAYLOAD_LEN],
            pid: 0,
            initialized: false,
        }
    }

    /// Check if a transmission is on air
    #[must_use]
    pub fn is_busy(&self) -> bool {
        pac::RADIO.state().read().state() != vals::State::DISABLED
    }

    #[allow(unsafe_code)]
    fn enable_interrupt() {
        // Above the time driver, so completions preempt the sample task.
        interrupt::RADIO.set_priority(Priority::P1);
        interrupt::RADIO.unpend();
        // SAFETY: the handler only touches RADIO events and the
        // critical-section protected callback.
        unsafe { interrupt::RADIO.enable() };
    }
}

impl RadioLink for EsbRadio {
    fn initialize(&mut self, config: &RadioConfig) -> Result<(), RadioError> {
        config.validate()?;
        if config.protocol != Protocol::EsbDpl || config.retransmit_count != 0 {
            // Only unacknowledged, dynamic-length transmission is supported.
            return Err(RadioError::InvalidConfig);
        }
        let mode = match config.bitrate {
            Bitrate::Mbps1 => vals::Mode::NRF_1MBIT,
            Bitrate::Mbps2 => vals::Mode::NRF_2MBIT,
            Bitrate::Mbps4 => return Err(RadioError::InvalidConfig),
        };

        critical_section::with(|cs| EVENT_HANDLER.borrow(cs).set(config.event_handler));

        let r = pac::RADIO;
        r.mode().write(|w| w.set_mode(mode));
        r.modecnf0().write(|w| {
            w.set_ru(if config.use_fast_ramp_up {
                vals::Ru::FAST
            } else {
                vals::Ru::DEFAULT
            });
        });
        r.pcnf0().write(|w| {
            w.set_lflen(8);
            w.set_s0len(false);
            w.set_s1len(3);
        });
        r.pcnf1().write(|w| {
            w.set_maxlen(MAX_PAYLOAD_LEN as u8);
            w.set_statlen(0);
            w.set_balen(Addressing::base_length());
            w.set_endian(vals::Endian::BIG);
            w.set_whiteen(false);
        });
        r.crccnf().write(|w| {
            w.set_len(vals::Len::TWO);
            w.set_skipaddr(vals::Skipaddr::INCLUDE);
        });
        r.crcinit().write(|w| w.set_crcinit(0xFFFF));
        r.crcpoly().write(|w| w.set_crcpoly(0x1_1021));
        r.shorts().write(|w| {
            w.set_ready_start(true);
            w.set_end_disable(true);
        });
        r.intenset().write(|w| w.set_disabled(true));

        Self::enable_interrupt();
        self.initialized = true;
        info!("ESB initialized: {}", config);
        Ok(())
    }

    fn set_addressing(&mut self, addressing: &Addressing) -> Result<(), RadioError> {
        if !self.initialized {
            return Err(RadioError::Busy);
        }
        addressing.validate()?;

        let [prefix0, prefix1] = addressing.prefix_registers();
        let r = pac::RADIO;
        r.frequency().write(|w| w.set_frequency(addressing.rf_channel));
        r.base0().write_value(addressing.base0_register());
        r.base1().write_value(addressing.base1_register());
        r.prefix0().write_value(pac::radio::regs::Prefix0(prefix0));
        r.prefix1().write_value(pac::radio::regs::Prefix1(prefix1));
        Ok(())
    }

    fn write(&mut self, payload: &Payload) -> Result<(), RadioError> {
        if !self.initialized || self.is_busy() {
            return Err(RadioError::Busy);
        }
        if !payload.noack() {
            return Err(RadioError::InvalidConfig);
        }
        let data = payload.data();
        let len = u8::try_from(data.len()).map_err(|_| RadioError::PayloadTooLong)?;

        self.pid = (self.pid + 1) & 0b11;
        self.packet[0] = len;
        // ACK bit cleared: no acknowledgement requested.
        self.packet[1] = self.pid << 1;
        self.packet[HEADER_LEN..HEADER_LEN + data.len()].copy_from_slice(data);

        let r = pac::RADIO;
        r.txaddress().write(|w| w.set_txaddress(payload.pipe().index()));
        r.packetptr().write_value(self.packet.as_ptr() as u32);
        r.events_disabled().write_value(0);

        // Packet contents must be in RAM before the radio starts reading.
        compiler_fence(Ordering::SeqCst);
        r.tasks_txen().write_value(1);
        Ok(())
    }

    fn flush(&mut self) {
        // Nothing is queued beyond the packet on air. A transmission that
        // is still running here is stale; stop it.
        if self.initialized && self.is_busy() {
            warn!("Flushing stale transmission");
            TRANSFER_END.abort();
            pac::RADIO.tasks_disable().write_value(1);
            // DISABLED follows within microseconds; its interrupt reports
            // the aborted transfer before the next write starts.
            while self.is_busy() {
                core::hint::spin_loop();
            }
        }
    }
}
