//! Seeded random sources and reusable message buffers.
//!
//! Every tester takes an explicitly owned generator. Parallel runs give each
//! partition its own sub-stream derived from `(base_seed, index)`, so results
//! are reproducible for a fixed seed and partition count. Changing the
//! partition count changes which messages are drawn.

use core::ops::RangeInclusive;

use checksum::{CrcValue, width_mask};
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finalizer.
#[inline]
const fn mix64(mut z: u64) -> u64 {
  z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
  z ^ (z >> 31)
}

/// Seed of sub-stream `index` under `base_seed`.
///
/// Distinct indices give well-separated seeds; the mapping is stable across
/// platforms and releases of this crate.
#[inline]
#[must_use]
pub const fn substream_seed(base_seed: u64, index: u64) -> u64 {
  mix64(base_seed.wrapping_add(index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA)))
}

/// Generator for sub-stream `index` under `base_seed`.
#[must_use]
pub fn substream(base_seed: u64, index: u64) -> StdRng {
  StdRng::seed_from_u64(substream_seed(base_seed, index))
}

/// Generator for a single-threaded run.
#[must_use]
pub fn seeded(seed: u64) -> StdRng {
  StdRng::seed_from_u64(seed)
}

/// Uniform initialization value in `[0, 2^width)`.
#[inline]
pub fn random_iv<R: Rng + ?Sized>(rng: &mut R, width: u8) -> CrcValue {
  rng.r#gen::<u64>() & width_mask(width)
}

/// Random length in `range`, never below one byte.
///
/// An inverted range collapses to its lower bound.
#[inline]
pub fn random_len<R: Rng + ?Sized>(rng: &mut R, range: &RangeInclusive<usize>) -> usize {
  let lo = (*range.start()).max(1);
  let hi = (*range.end()).max(lo);
  rng.gen_range(lo..=hi)
}

/// Reusable buffer for generated messages.
///
/// The buffer is only resized when the requested length changes, so the hot
/// loops allocate at most once per distinct length.
#[derive(Clone, Debug, Default)]
pub struct MessageSampler {
  buf: Vec<u8>,
}

impl MessageSampler {
  /// Create a sampler with room for `capacity` bytes.
  #[must_use]
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      buf: Vec::with_capacity(capacity),
    }
  }

  /// Overwrite the buffer with `len` random bytes.
  pub fn fill<R: Rng + ?Sized>(&mut self, rng: &mut R, len: usize) -> &[u8] {
    if self.buf.len() != len {
      self.buf.resize(len, 0);
    }
    rng.fill_bytes(&mut self.buf);
    &self.buf
  }

  /// Overwrite the buffer with a message whose length is drawn from `range`.
  pub fn fill_range<R: Rng + ?Sized>(&mut self, rng: &mut R, range: &RangeInclusive<usize>) -> &[u8] {
    let len = random_len(rng, range);
    self.fill(rng, len)
  }

  /// The most recently generated message.
  #[inline]
  #[must_use]
  pub fn message(&self) -> &[u8] {
    &self.buf
  }
}
