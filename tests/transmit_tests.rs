//! Periodic Transmitter Tests
//!
//! Tests for the sample producer, the transmit slot handshake and the
//! completion handler working together.
//! Run with: cargo test --features std --test transmit_tests

use esb_ptx::config::{MAX_PAYLOAD_LEN, NUM_SAMPLES};
use esb_ptx::radio::config::{Addressing, RadioConfig};
use esb_ptx::radio::event::{CompletionHandler, RadioEvent, TransferEnd};
use esb_ptx::radio::state::LinkState;
use esb_ptx::radio::transmit::{TickOutcome, TransmitStats, Transmitter};
use esb_ptx::radio::{RadioError, RadioLink};
use esb_ptx::types::{Payload, Pipe, SampleBuffer};
use esb_ptx::ui::{display_code, DisplayCode, StatusDisplay};
use proptest::prelude::*;

// =============================================================================
// Test Doubles
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    Initialize,
    SetAddressing,
    Flush,
    Write(Vec<u8>),
}

/// Radio that records every call and can be told to refuse writes
#[derive(Default)]
struct MockRadio {
    calls: Vec<Call>,
    refuse_writes: Option<RadioError>,
}

impl MockRadio {
    fn writes(&self) -> Vec<&Vec<u8>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Write(data) => Some(data),
                _ => None,
            })
            .collect()
    }
}

impl RadioLink for MockRadio {
    fn initialize(&mut self, _config: &RadioConfig) -> Result<(), RadioError> {
        self.calls.push(Call::Initialize);
        Ok(())
    }

    fn set_addressing(&mut self, _addressing: &Addressing) -> Result<(), RadioError> {
        self.calls.push(Call::SetAddressing);
        Ok(())
    }

    fn write(&mut self, payload: &Payload) -> Result<(), RadioError> {
        self.calls.push(Call::Write(payload.data().to_vec()));
        match self.refuse_writes {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn flush(&mut self) {
        self.calls.push(Call::Flush);
    }
}

/// Display that remembers every code it was given
#[derive(Default)]
struct MockDisplay {
    shown: Vec<DisplayCode>,
}

impl StatusDisplay for MockDisplay {
    fn set_lines(&mut self, code: DisplayCode) {
        self.shown.push(code);
    }
}

fn all_equal(samples: &SampleBuffer, value: u16) -> bool {
    samples.samples().iter().all(|&s| s == value)
}

// =============================================================================
// Single Tick Tests
// =============================================================================

#[test]
fn first_tick_sends_zeros() {
    let link = LinkState::new();
    let mut tx: Transmitter = Transmitter::new(&link);
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    let outcome = tx.on_tick(&mut radio, &mut display);

    assert!(outcome.is_sent());
    assert_eq!(tx.packets_sent(), 1);
    let writes = radio.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].len(), NUM_SAMPLES * 2);
    assert!(writes[0].iter().all(|&b| b == 0));
}

#[test]
fn flush_precedes_write() {
    let link = LinkState::new();
    let mut tx: Transmitter = Transmitter::new(&link);
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    tx.on_tick(&mut radio, &mut display);

    assert_eq!(radio.calls.len(), 2);
    assert_eq!(radio.calls[0], Call::Flush);
    assert!(matches!(radio.calls[1], Call::Write(_)));
}

#[test]
fn tick_takes_the_slot() {
    let link = LinkState::new();
    let mut tx: Transmitter = Transmitter::new(&link);
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    tx.on_tick(&mut radio, &mut display);

    assert!(!link.is_available(), "slot held until completion");
}

#[test]
fn payload_header_is_fixed() {
    let link = LinkState::new();
    let mut tx: Transmitter = Transmitter::new(&link);
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    tx.on_tick(&mut radio, &mut display);

    assert_eq!(tx.payload().pipe(), Pipe::P0);
    assert!(tx.payload().noack());
    assert_eq!(tx.payload().len(), MAX_PAYLOAD_LEN);
}

#[test]
fn payload_is_little_endian_copy_of_samples() {
    let link = LinkState::new();
    let mut samples = [0u16; NUM_SAMPLES];
    for (i, s) in samples.iter_mut().enumerate() {
        *s = 0x0100 * i as u16 + 7;
    }
    let mut tx: Transmitter = Transmitter::with_samples(&link, SampleBuffer::from_samples(samples));
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    tx.on_tick(&mut radio, &mut display);

    let sent = radio.writes()[0].clone();
    for (i, s) in samples.iter().enumerate() {
        assert_eq!(sent[2 * i], s.to_le_bytes()[0]);
        assert_eq!(sent[2 * i + 1], s.to_le_bytes()[1]);
    }
}

// =============================================================================
// Overrun Tests
// =============================================================================

#[test]
fn overrun_when_slot_held() {
    let link = LinkState::new();
    assert!(link.try_acquire());

    let mut tx: Transmitter = Transmitter::new(&link);
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    let outcome = tx.on_tick(&mut radio, &mut display);

    assert_eq!(outcome, TickOutcome::Overrun);
    assert!(radio.calls.is_empty(), "no flush or write on overrun");
    assert!(display.shown.is_empty(), "display untouched on overrun");
    assert_eq!(tx.packets_sent(), 0);
    assert_eq!(tx.stats().overruns, 1);
}

#[test]
fn overrun_still_advances_samples() {
    let link = LinkState::new();
    assert!(link.try_acquire());

    let mut tx: Transmitter = Transmitter::new(&link);
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    tx.on_tick(&mut radio, &mut display);
    tx.on_tick(&mut radio, &mut display);

    assert!(all_equal(tx.samples(), 2));
}

// =============================================================================
// Submit Failure Tests
// =============================================================================

#[test]
fn submit_failure_not_counted_as_sent() {
    let link = LinkState::new();
    let mut tx: Transmitter = Transmitter::new(&link);
    let mut radio = MockRadio {
        refuse_writes: Some(RadioError::Busy),
        ..MockRadio::default()
    };
    let mut display = MockDisplay::default();

    let outcome = tx.on_tick(&mut radio, &mut display);

    assert_eq!(
        outcome,
        TickOutcome::SubmitFailed {
            status: DisplayCode::ALL_ON,
            error: RadioError::Busy,
        }
    );
    assert_eq!(tx.packets_sent(), 0);
    assert_eq!(tx.stats().submit_failures, 1);
    assert!(all_equal(tx.samples(), 1));
}

#[test]
fn submit_failure_keeps_slot_held() {
    let link = LinkState::new();
    let mut tx: Transmitter = Transmitter::new(&link);
    let mut radio = MockRadio {
        refuse_writes: Some(RadioError::Hardware(-5)),
        ..MockRadio::default()
    };
    let mut display = MockDisplay::default();

    tx.on_tick(&mut radio, &mut display);
    assert!(!link.is_available());

    // Without a completion event the next tick is an overrun.
    radio.refuse_writes = None;
    let outcome = tx.on_tick(&mut radio, &mut display);
    assert_eq!(outcome, TickOutcome::Overrun);
}

#[test]
fn submit_failure_recovers_after_completion() {
    let link = LinkState::new();
    let handler = CompletionHandler::new(&link);
    let mut tx: Transmitter = Transmitter::new(&link);
    let mut radio = MockRadio {
        refuse_writes: Some(RadioError::Busy),
        ..MockRadio::default()
    };
    let mut display = MockDisplay::default();

    tx.on_tick(&mut radio, &mut display);
    handler.on_event(RadioEvent::TxFailed);

    radio.refuse_writes = None;
    let outcome = tx.on_tick(&mut radio, &mut display);
    assert!(outcome.is_sent());
    assert_eq!(tx.packets_sent(), 1);
}

// =============================================================================
// Status Tests
// =============================================================================

#[test]
fn status_comes_from_previous_payload() {
    let link = LinkState::new();
    let handler = CompletionHandler::new(&link);
    let mut samples = [0u16; NUM_SAMPLES];
    samples[1] = 5;
    let mut tx: Transmitter = Transmitter::with_samples(&link, SampleBuffer::from_samples(samples));
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    // Payload is still empty on the first tick.
    let first = tx.on_tick(&mut radio, &mut display);
    assert_eq!(first.status(), Some(display_code(0)));

    handler.on_event(RadioEvent::TxSuccess);

    // Second tick shows element 1 of what the first tick sent.
    let second = tx.on_tick(&mut radio, &mut display);
    assert_eq!(second.status(), Some(display_code(5)));

    assert_eq!(display.shown, vec![display_code(0), display_code(5)]);
}

#[test]
fn status_uses_low_byte_of_sample() {
    let link = LinkState::new();
    let handler = CompletionHandler::new(&link);
    let mut samples = [0u16; NUM_SAMPLES];
    samples[1] = 0x0302;
    let mut tx: Transmitter = Transmitter::with_samples(&link, SampleBuffer::from_samples(samples));
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    tx.on_tick(&mut radio, &mut display);
    handler.on_event(RadioEvent::TxSuccess);
    let outcome = tx.on_tick(&mut radio, &mut display);

    assert_eq!(outcome.status(), Some(display_code(0x02)));
}

// =============================================================================
// Sample Evolution Tests
// =============================================================================

#[test]
fn samples_wrap_at_u16_max() {
    let link = LinkState::new();
    let mut tx: Transmitter = Transmitter::with_samples(
        &link,
        SampleBuffer::from_samples([u16::MAX; NUM_SAMPLES]),
    );
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    tx.on_tick(&mut radio, &mut display);

    assert!(all_equal(tx.samples(), 0));
    // The payload carries the value from before the wrap.
    assert_eq!(tx.payload().sample(0), u16::MAX);
}

#[test]
fn small_buffer_transmitter() {
    let link = LinkState::new();
    let mut tx: Transmitter<'_, 3> =
        Transmitter::with_samples(&link, SampleBuffer::from_samples([1, 2, 3]));
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    tx.on_tick(&mut radio, &mut display);

    assert_eq!(radio.writes()[0], &vec![1, 0, 2, 0, 3, 0]);
    assert_eq!(tx.samples().samples(), &[2, 3, 4]);
}

// =============================================================================
// End-to-end Scenario
// =============================================================================

#[test]
fn three_tick_scenario() {
    let link = LinkState::new();
    let handler = CompletionHandler::new(&link);
    let mut tx: Transmitter = Transmitter::new(&link);
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    // Tick 1: slot free, all-zero samples go out.
    let t1 = tx.on_tick(&mut radio, &mut display);
    assert_eq!(t1, TickOutcome::Sent { status: DisplayCode::ALL_ON });
    assert!(all_equal(tx.samples(), 1));
    assert_eq!(tx.packets_sent(), 1);

    // Completion arrives before tick 2.
    handler.on_event(RadioEvent::TxSuccess);

    // Tick 2: slot free again, status from tick 1's payload.
    let t2 = tx.on_tick(&mut radio, &mut display);
    assert_eq!(t2, TickOutcome::Sent { status: display_code(0) });
    assert!(radio.writes()[1].chunks(2).all(|c| c == [1, 0]));
    assert!(all_equal(tx.samples(), 2));
    assert_eq!(tx.packets_sent(), 2);

    // No completion before tick 3: overrun.
    let t3 = tx.on_tick(&mut radio, &mut display);
    assert_eq!(t3, TickOutcome::Overrun);
    assert_eq!(tx.packets_sent(), 2);
    assert!(all_equal(tx.samples(), 3));

    assert_eq!(
        tx.stats(),
        TransmitStats {
            sent: 2,
            overruns: 1,
            submit_failures: 0,
        }
    );
    assert_eq!(tx.stats().ticks(), 3);
}

// =============================================================================
// Completion Handler Tests
// =============================================================================

#[test]
fn every_event_kind_releases() {
    for event in [RadioEvent::TxSuccess, RadioEvent::TxFailed, RadioEvent::RxReceived] {
        let link = LinkState::new();
        let handler = CompletionHandler::new(&link);
        assert!(link.try_acquire());

        handler.on_event(event);

        assert!(link.is_available(), "{event:?} must release the slot");
    }
}

#[test]
fn completion_counts_per_kind() {
    let link = LinkState::new();
    let handler = CompletionHandler::new(&link);

    handler.on_event(RadioEvent::TxSuccess);
    handler.on_event(RadioEvent::TxSuccess);
    handler.on_event(RadioEvent::TxFailed);
    handler.on_event(RadioEvent::RxReceived);

    let counts = handler.counts();
    assert_eq!(counts.tx_success(), 2);
    assert_eq!(counts.tx_failed(), 1);
    assert_eq!(counts.rx_received(), 1);
    assert_eq!(counts.total(), 4);
}

#[test]
fn transfer_end_defaults_to_success() {
    let end = TransferEnd::new();
    assert_eq!(end.take_event(), RadioEvent::TxSuccess);
    assert_eq!(end.take_event(), RadioEvent::TxSuccess);
}

#[test]
fn aborted_transfer_counts_as_failure() {
    let link = LinkState::new();
    let handler = CompletionHandler::new(&link);
    let end = TransferEnd::new();
    assert!(link.try_acquire());

    // Flush cuts the transfer short; the radio still reports its end.
    end.abort();
    handler.on_event(end.take_event());

    assert!(link.is_available());
    assert_eq!(handler.counts().tx_failed(), 1);
    assert_eq!(handler.counts().tx_success(), 0);
}

#[test]
fn abort_applies_to_one_transfer_only() {
    let end = TransferEnd::new();
    end.abort();
    end.abort();
    assert_eq!(end.take_event(), RadioEvent::TxFailed);
    assert_eq!(end.take_event(), RadioEvent::TxSuccess);
}

#[test]
fn failed_payload_is_not_resent() {
    let link = LinkState::new();
    let handler = CompletionHandler::new(&link);
    let mut tx: Transmitter = Transmitter::new(&link);
    let mut radio = MockRadio::default();
    let mut display = MockDisplay::default();

    tx.on_tick(&mut radio, &mut display);
    handler.on_event(RadioEvent::TxFailed);
    tx.on_tick(&mut radio, &mut display);

    // Second payload carries the new samples, not a retry of the first.
    let writes = radio.writes();
    assert!(writes[0].iter().all(|&b| b == 0));
    assert!(writes[1].chunks(2).all(|c| c == [1, 0]));
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// `release_before[i]`: a completion fires before tick i.
    /// `write_ok[i]`: the radio accepts the write on tick i.
    #[test]
    fn counter_tracks_accepted_writes(
        steps in prop::collection::vec((any::<bool>(), any::<bool>()), 1..64)
    ) {
        let link = LinkState::new();
        let handler = CompletionHandler::new(&link);
        let mut tx: Transmitter<'_, 4> = Transmitter::with_samples(&link, SampleBuffer::new());
        let mut radio = MockRadio::default();
        let mut display = MockDisplay::default();

        let mut expected_sent = 0u32;
        let mut slot_free = true;

        for (i, &(release_before, write_ok)) in steps.iter().enumerate() {
            if release_before {
                handler.on_event(RadioEvent::TxSuccess);
                slot_free = true;
            }
            radio.refuse_writes = if write_ok { None } else { Some(RadioError::Busy) };

            let before = tx.packets_sent();
            let outcome = tx.on_tick(&mut radio, &mut display);

            if slot_free {
                slot_free = false;
                if write_ok {
                    expected_sent += 1;
                    prop_assert!(outcome.is_sent());
                } else {
                    prop_assert!(
                        matches!(outcome, TickOutcome::SubmitFailed { .. }),
                        "tick {} should fail the submit",
                        i
                    );
                }
            } else {
                prop_assert_eq!(outcome, TickOutcome::Overrun);
                prop_assert_eq!(tx.packets_sent(), before);
            }

            let ticks = u16::try_from(i + 1).unwrap();
            prop_assert!(tx.samples().samples().iter().all(|&s| s == ticks));
        }

        prop_assert_eq!(tx.packets_sent(), expected_sent);
        prop_assert_eq!(tx.stats().ticks(), u32::try_from(steps.len()).unwrap());
    }
}
