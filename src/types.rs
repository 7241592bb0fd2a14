//! Shared types used across the ESB transmitter
//!
//! This module defines the sample buffer and payload types that flow
//! from the periodic transmitter into the radio layer.

use core::fmt;

use heapless::Vec;

use crate::config::{MAX_PAYLOAD_LEN, NUM_SAMPLES, SAMPLE_SIZE};

/// ESB pipe (logical destination channel)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Pipe {
    /// Pipe 0 (base address 0)
    #[default]
    P0,
    /// Pipe 1
    P1,
    /// Pipe 2
    P2,
    /// Pipe 3
    P3,
    /// Pipe 4
    P4,
    /// Pipe 5
    P5,
    /// Pipe 6
    P6,
    /// Pipe 7
    P7,
}

impl Pipe {
    /// All pipes in order
    pub const ALL: [Self; 8] = [
        Self::P0,
        Self::P1,
        Self::P2,
        Self::P3,
        Self::P4,
        Self::P5,
        Self::P6,
        Self::P7,
    ];

    /// Create from a pipe number, returns None if out of range
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Get the pipe number
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Pipe {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "P{}", self.index());
    }
}

/// Rolling sample buffer
///
/// Every element advances by one per period, wrapping at `u16::MAX`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SampleBuffer<const N: usize = NUM_SAMPLES> {
    samples: [u16; N],
}

impl<const N: usize> SampleBuffer<N> {
    /// Create a buffer of zeros
    #[must_use]
    pub const fn new() -> Self {
        Self { samples: [0; N] }
    }

    /// Create a buffer from explicit samples
    #[must_use]
    pub const fn from_samples(samples: [u16; N]) -> Self {
        Self { samples }
    }

    /// Number of samples
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    /// Check if the buffer holds no samples
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Get all samples
    #[must_use]
    pub const fn samples(&self) -> &[u16; N] {
        &self.samples
    }

    /// Get one sample
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u16> {
        self.samples.get(index).copied()
    }

    /// Size of the buffer in bytes
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        N * SAMPLE_SIZE
    }

    /// Advance every sample by one
    pub fn advance(&mut self) {
        for sample in &mut self.samples {
            *sample = sample.wrapping_add(1);
        }
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for SampleBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.samples.first() {
            Some(first) => write!(f, "SampleBuffer(len={N}, first={first})"),
            None => write!(f, "SampleBuffer(empty)"),
        }
    }
}

#[cfg(feature = "embedded")]
impl<const N: usize> defmt::Format for SampleBuffer<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Samples({}, first={})", N, self.get(0));
    }
}

/// Radio payload
///
/// Long-lived and overwritten in place on every transmission.
#[derive(Clone, PartialEq, Eq)]
pub struct Payload {
    /// Destination pipe
    pipe: Pipe,
    /// Skip the acknowledgement for this payload
    noack: bool,
    /// Payload bytes (length is `data.len()`)
    data: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl Payload {
    /// Create an empty payload
    #[must_use]
    pub const fn new(pipe: Pipe, noack: bool) -> Self {
        Self {
            pipe,
            noack,
            data: Vec::new(),
        }
    }

    /// Create a payload holding a copy of `bytes`
    ///
    /// Returns None if `bytes` exceeds the maximum payload length.
    #[must_use]
    pub fn from_bytes(pipe: Pipe, noack: bool, bytes: &[u8]) -> Option<Self> {
        let data = Vec::from_slice(bytes).ok()?;
        Some(Self { pipe, noack, data })
    }

    /// Destination pipe
    #[must_use]
    pub const fn pipe(&self) -> Pipe {
        self.pipe
    }

    /// Whether the payload skips the acknowledgement
    #[must_use]
    pub const fn noack(&self) -> bool {
        self.noack
    }

    /// Payload length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Payload bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read back sample `index` (little-endian), or 0 if not present
    #[must_use]
    pub fn sample(&self, index: usize) -> u16 {
        let Some(start) = index.checked_mul(SAMPLE_SIZE) else {
            return 0;
        };
        match self.data.get(start..start.saturating_add(SAMPLE_SIZE)) {
            Some(&[lo, hi]) => u16::from_le_bytes([lo, hi]),
            _ => 0,
        }
    }

    /// Overwrite the payload with the samples in `buffer`
    ///
    /// Samples are stored little-endian. Samples that do not fit in
    /// [`MAX_PAYLOAD_LEN`] are dropped.
    pub fn fill_from<const N: usize>(&mut self, buffer: &SampleBuffer<N>) {
        self.data.clear();
        for sample in buffer.samples() {
            if self.data.extend_from_slice(&sample.to_le_bytes()).is_err() {
                break;
            }
        }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::new(Pipe::P0, true)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("pipe", &self.pipe)
            .field("noack", &self.noack)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Payload {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Payload({}, len={}, noack={})",
            self.pipe,
            self.data.len(),
            self.noack
        );
    }
}
