//! XOR-linearity tester.
//!
//! Checks `crc(m1) ^ crc(m2) == crc(m1 ^ m2)` over random equal-length
//! message pairs under a fixed initialization value. A single failing trial
//! disproves the homomorphism, so both forms stop at the first
//! counterexample.

use checksum::{Crc, CrcValue};
use rand::{Rng, RngCore};
use rayon::prelude::*;
use tracing::debug;

use crate::{
  outcome::LinearityOutcome,
  partition::{CANCEL_CHECK_INTERVAL, CancelBound, split_count},
  sampler::substream,
};

/// Trials run under the algorithm's own initialization value.
pub const STANDARD_TRIALS: u64 = 1_000;

/// Trials run under the shared custom initialization value.
pub const CUSTOM_TRIALS: u64 = 10_000;

/// Length of each message in a trial pair.
pub const DEFAULT_MESSAGE_LENGTH: usize = 16;

/// Custom initialization value shared across algorithms (masked per width).
pub const DEFAULT_CUSTOM_INIT: u64 = 0x1234_5678_9012_3456;

/// Buffers for one trial pair and their XOR, reused across trials.
struct TrialPair {
  m1: Vec<u8>,
  m2: Vec<u8>,
  mx: Vec<u8>,
}

impl TrialPair {
  fn new(len: usize) -> Self {
    Self {
      m1: vec![0; len],
      m2: vec![0; len],
      mx: vec![0; len],
    }
  }

  /// Draw a fresh pair and return whether the homomorphism held.
  fn holds<R: Rng + ?Sized>(&mut self, crc: &Crc, init: CrcValue, rng: &mut R) -> bool {
    rng.fill_bytes(&mut self.m1);
    rng.fill_bytes(&mut self.m2);
    for ((x, a), b) in self.mx.iter_mut().zip(&self.m1).zip(&self.m2) {
      *x = a ^ b;
    }

    let c1 = crc.checksum_with_init(&self.m1, init);
    let c2 = crc.checksum_with_init(&self.m2, init);
    let cx = crc.checksum_with_init(&self.mx, init);
    c1 ^ c2 == cx
  }
}

/// Monte Carlo linearity test.
///
/// `init` is masked to the algorithm's width. Returns
/// [`LinearityOutcome::NonLinear`] with the index of the first failing trial,
/// or [`LinearityOutcome::Linear`] after `trials` passing trials.
pub fn test_linearity<R: Rng + ?Sized>(
  crc: &Crc,
  init: CrcValue,
  message_length: usize,
  trials: u64,
  rng: &mut R,
) -> LinearityOutcome {
  let init = init & crc.mask();
  let mut pair = TrialPair::new(message_length);

  for trial in 0..trials {
    if !pair.holds(crc, init, rng) {
      return LinearityOutcome::NonLinear { trial };
    }
  }

  LinearityOutcome::Linear { trials }
}

/// Partitioned linearity test.
///
/// Trials are split into contiguous ranges; partition `i` draws from
/// sub-stream `i` of `seed`. The reported trial is the lowest failing index
/// over all partitions, and workers past it stop early. The outcome depends
/// only on `(seed, partitions)`.
pub fn test_linearity_partitioned(
  crc: &Crc,
  init: CrcValue,
  message_length: usize,
  trials: u64,
  seed: u64,
  partitions: usize,
) -> LinearityOutcome {
  let init = init & crc.mask();
  let bound = CancelBound::new();

  split_count(trials, partitions)
    .into_par_iter()
    .enumerate()
    .for_each(|(index, range)| {
      let mut rng = substream(seed, index as u64);
      let mut pair = TrialPair::new(message_length);
      for trial in range.clone() {
        if (trial - range.start) % CANCEL_CHECK_INTERVAL == 0 && bound.passed(trial) {
          return;
        }
        if !pair.holds(crc, init, &mut rng) {
          bound.offer(trial);
          return;
        }
      }
    });

  match bound.found() {
    Some(trial) => {
      debug!(algorithm = crc.name(), trial, "linearity counterexample");
      LinearityOutcome::NonLinear { trial }
    }
    None => LinearityOutcome::Linear { trials },
  }
}

#[cfg(test)]
mod tests {
  use checksum::{CrcParams, catalog};

  use super::*;
  use crate::sampler::seeded;

  #[test]
  fn zero_offset_crc_is_linear() {
    let crc = Crc::new(catalog::XMODEM).unwrap();
    let mut rng = seeded(42);
    let outcome = test_linearity(&crc, 0, DEFAULT_MESSAGE_LENGTH, STANDARD_TRIALS, &mut rng);
    assert_eq!(outcome, LinearityOutcome::Linear { trials: STANDARD_TRIALS });
  }

  #[test]
  fn nonzero_init_breaks_linearity_at_first_trial() {
    let crc = Crc::new(catalog::XMODEM).unwrap();
    let mut rng = seeded(42);
    let outcome = test_linearity(&crc, DEFAULT_CUSTOM_INIT, DEFAULT_MESSAGE_LENGTH, CUSTOM_TRIALS, &mut rng);
    assert_eq!(outcome, LinearityOutcome::NonLinear { trial: 0 });
  }

  #[test]
  fn nonzero_xor_out_alone_breaks_linearity() {
    // crc(a) ^ crc(b) ^ crc(a ^ b) picks up xor_out once.
    let crc = Crc::new(CrcParams::new("xmodem-xorout", 16, 0x1021, 0, false, false, 0x00FF)).unwrap();
    let outcome = test_linearity(&crc, 0, 8, 100, &mut seeded(1));
    assert_eq!(outcome, LinearityOutcome::NonLinear { trial: 0 });
  }

  #[test]
  fn reflected_zero_offset_crc_is_linear() {
    let crc = Crc::new(catalog::KERMIT).unwrap();
    let outcome = test_linearity(&crc, 0, DEFAULT_MESSAGE_LENGTH, 500, &mut seeded(3));
    assert!(outcome.is_linear());
  }

  #[test]
  fn zero_trials_is_vacuously_linear() {
    let crc = Crc::new(catalog::CRC_32).unwrap();
    let outcome = test_linearity(&crc, 0, DEFAULT_MESSAGE_LENGTH, 0, &mut seeded(0));
    assert_eq!(outcome, LinearityOutcome::Linear { trials: 0 });
  }

  #[test]
  fn partitioned_agrees_on_verdicts() {
    let crc = Crc::new(catalog::XMODEM).unwrap();
    for partitions in [1, 2, 8] {
      assert_eq!(
        test_linearity_partitioned(&crc, 0, DEFAULT_MESSAGE_LENGTH, STANDARD_TRIALS, 42, partitions),
        LinearityOutcome::Linear { trials: STANDARD_TRIALS }
      );
      assert_eq!(
        test_linearity_partitioned(&crc, DEFAULT_CUSTOM_INIT, DEFAULT_MESSAGE_LENGTH, CUSTOM_TRIALS, 42, partitions),
        LinearityOutcome::NonLinear { trial: 0 }
      );
    }
  }

  #[test]
  fn partitioned_is_deterministic() {
    let crc = Crc::new(catalog::CRC_8_ROHC).unwrap();
    for init in [0, DEFAULT_CUSTOM_INIT] {
      let first = test_linearity_partitioned(&crc, init, 1, 2_000, 99, 4);
      for _ in 0..4 {
        assert_eq!(test_linearity_partitioned(&crc, init, 1, 2_000, 99, 4), first);
      }
    }
  }
}
