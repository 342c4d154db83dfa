//! Bloom filter used as the approximate membership primitive of a summary.
//!
//! The bit layout matches the filters found in published summaries: two 32-bit
//! FNV-1a hashes of the value, seeded with the bytes `"S"` and `"W"`, combined
//! by double hashing into `hashes` bit positions `(h1 + i * h2) mod bits`.
//! Bits are stored least-significant first within each byte.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Result, SummaryError};

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Upper bound on the hash count accepted from a descriptor.
pub const MAX_HASHES: u32 = 1024;

fn fnv1a(seed: u8, value: &[u8]) -> u32 {
    std::iter::once(&seed).chain(value).fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipFilter {
    bits: usize,
    hashes: u32,
    bitfield: Vec<u8>,
}

impl MembershipFilter {
    /// Wraps an existing bit array of `bits` bits tested with `hashes` hash functions.
    pub fn new(bits: usize, hashes: u32, bitfield: Vec<u8>) -> Result<Self> {
        if bits == 0 {
            return Err(SummaryError::InvalidFilter("bit length must be positive".into()));
        }
        if hashes == 0 || hashes > MAX_HASHES {
            return Err(SummaryError::InvalidFilter(format!(
                "hash count must be between 1 and {}, got {}",
                MAX_HASHES, hashes
            )));
        }
        let required = bits.div_ceil(8);
        if bitfield.len() < required {
            return Err(SummaryError::InvalidFilter(format!(
                "{} bits need {} bytes, filter has {}",
                bits,
                required,
                bitfield.len()
            )));
        }
        Ok(Self { bits, hashes, bitfield })
    }

    /// An empty filter, ready for [`MembershipFilter::add`].
    pub fn empty(bits: usize, hashes: u32) -> Result<Self> {
        Self::new(bits, hashes, vec![0; bits.div_ceil(8)])
    }

    /// An empty filter sized for `capacity` values at the given false-positive rate.
    pub fn with_rate(capacity: usize, error_rate: f64) -> Result<Self> {
        if capacity == 0 || !(error_rate > 0.0 && error_rate < 1.0) {
            return Err(SummaryError::InvalidFilter(format!(
                "cannot size a filter for {} values at rate {}",
                capacity, error_rate
            )));
        }
        let ln2 = std::f64::consts::LN_2;
        let bits = (-(capacity as f64) * error_rate.ln() / (ln2 * ln2)).ceil() as usize;
        let hashes = ((bits as f64 / capacity as f64) * ln2).round().max(1.0) as u32;
        Self::empty(bits, hashes.min(MAX_HASHES))
    }

    /// Decodes a base64 bit array as found in `amf:filter` literals.
    pub fn from_base64(bits: usize, hashes: u32, encoded: &str) -> Result<Self> {
        let bytes = STANDARD.decode(encoded.trim())?;
        Self::new(bits, hashes, bytes)
    }

    pub fn add(&mut self, value: &[u8]) {
        for position in self.positions(value) {
            self.bitfield[position >> 3] |= 1 << (position % 8);
        }
    }

    /// `false` means definitely absent; `true` means possibly present.
    pub fn may_contain(&self, value: &[u8]) -> bool {
        self.positions(value)
            .all(|position| self.bitfield[position >> 3] & (1 << (position % 8)) != 0)
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    pub fn hashes(&self) -> u32 {
        self.hashes
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bitfield
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bitfield)
    }

    /// Expected false-positive probability after `inserted` distinct values.
    pub fn false_positive_rate(&self, inserted: usize) -> f64 {
        let k = f64::from(self.hashes);
        let fill = 1.0 - (-k * inserted as f64 / self.bits as f64).exp();
        fill.powf(k)
    }

    fn positions(&self, value: &[u8]) -> impl Iterator<Item = usize> {
        let h1 = u64::from(fnv1a(b'S', value));
        let h2 = u64::from(fnv1a(b'W', value));
        let bits = self.bits as u64;
        (0..u64::from(self.hashes)).map(move |i| ((h1 + i * h2) % bits) as usize)
    }
}
