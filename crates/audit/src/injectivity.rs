//! Injectivity-in-IV tester.
//!
//! For a fixed message, enumerates every initialization value in ascending
//! order and reports the first pair producing the same output. Exhaustive
//! enumeration is `O(2^width)` in time and memory, so widths above a
//! threshold are refused unless explicitly allowed; the sampled variant gives
//! a weaker answer for 32- and 64-bit algorithms.

use std::collections::{HashMap, hash_map::Entry};

use checksum::{Crc, CrcValue};
use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::{
  error::AuditError,
  outcome::InjectivityOutcome,
  partition::{CANCEL_CHECK_INTERVAL, CancelBound, split_inclusive},
  sampler::random_iv,
};

/// Default safety threshold for exhaustive runs, in bits (inclusive).
pub const DEFAULT_THRESHOLD_BITS: u8 = 24;

/// Upper bound on up-front map reservation.
const MAX_RESERVE: u64 = 1 << 24;

/// Guard against exhaustive runs that would not finish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExhaustivePolicy {
  /// Widths up to and including this run without opt-in.
  pub threshold_bits: u8,
  /// Run wider algorithms anyway.
  pub allow_large: bool,
}

impl Default for ExhaustivePolicy {
  fn default() -> Self {
    Self {
      threshold_bits: DEFAULT_THRESHOLD_BITS,
      allow_large: false,
    }
  }
}

impl ExhaustivePolicy {
  /// Policy that never refuses.
  #[must_use]
  pub const fn unbounded() -> Self {
    Self {
      threshold_bits: 64,
      allow_large: true,
    }
  }

  /// # Errors
  ///
  /// Returns [`AuditError::ExhaustiveRangeTooLarge`] if `width` is above the
  /// threshold and large runs are not allowed.
  pub fn check(&self, width: u8) -> Result<(), AuditError> {
    if width > self.threshold_bits && !self.allow_large {
      return Err(AuditError::ExhaustiveRangeTooLarge {
        width,
        threshold: self.threshold_bits,
      });
    }
    Ok(())
  }
}

#[inline]
fn reserve_hint(span: u64) -> usize {
  span.min(MAX_RESERVE) as usize
}

/// Exhaustive injectivity test over `[0, 2^width)`.
///
/// Stops at the first repeated output and returns it as
/// [`InjectivityOutcome::CollisionFound`] with the smallest `iv_b` at which
/// a repeat exists.
///
/// # Errors
///
/// Returns [`AuditError::ExhaustiveRangeTooLarge`] when `policy` refuses the
/// algorithm's width.
pub fn test_injectivity(
  crc: &Crc,
  message: &[u8],
  policy: &ExhaustivePolicy,
) -> Result<InjectivityOutcome, AuditError> {
  policy.check(crc.width())?;

  let mask = crc.mask();
  let mut seen: HashMap<CrcValue, CrcValue> = HashMap::with_capacity(reserve_hint(mask));

  for iv in 0..=mask {
    let out = crc.checksum_with_init(message, iv);
    match seen.entry(out) {
      Entry::Occupied(first) => {
        return Ok(InjectivityOutcome::CollisionFound {
          iv_a: *first.get(),
          iv_b: iv,
        });
      }
      Entry::Vacant(slot) => {
        slot.insert(iv);
      }
    }
  }

  Ok(InjectivityOutcome::Injective)
}

/// Sampled injectivity test: draw `samples` IVs and look for two distinct
/// ones producing the same output.
///
/// Drawing the same IV twice is not a collision. A clean run only says that
/// no collision was observed.
pub fn test_injectivity_sampled<R: Rng + ?Sized>(
  crc: &Crc,
  message: &[u8],
  samples: u64,
  rng: &mut R,
) -> InjectivityOutcome {
  let mut seen: HashMap<CrcValue, CrcValue> = HashMap::with_capacity(reserve_hint(samples));

  for _ in 0..samples {
    let iv = random_iv(rng, crc.width());
    let out = crc.checksum_with_init(message, iv);
    match seen.entry(out) {
      Entry::Occupied(first) if *first.get() != iv => {
        return InjectivityOutcome::CollisionFound {
          iv_a: *first.get(),
          iv_b: iv,
        };
      }
      Entry::Occupied(_) => {}
      Entry::Vacant(slot) => {
        slot.insert(iv);
      }
    }
  }

  InjectivityOutcome::NoCollisionInSamples { samples }
}

/// Outputs of one IV partition, densely indexed from `start`.
struct PartitionScan {
  start: u64,
  outputs: Vec<CrcValue>,
}

fn scan_partition(crc: &Crc, message: &[u8], span: (u64, u64), bound: &CancelBound) -> PartitionScan {
  let (start, end) = span;
  let len = end - start;
  let mut outputs = Vec::with_capacity(reserve_hint(len.saturating_add(1)));
  let mut local: HashMap<CrcValue, CrcValue> = HashMap::with_capacity(reserve_hint(len.saturating_add(1)));

  let mut iv = start;
  loop {
    if (iv - start) % CANCEL_CHECK_INTERVAL == 0 && bound.passed(iv) {
      break;
    }
    let out = crc.checksum_with_init(message, iv);
    outputs.push(out);
    if local.insert(out, iv).is_some() {
      // A repeat inside this partition caps the global witness at `iv`.
      bound.offer(iv);
      break;
    }
    if iv == end {
      break;
    }
    iv += 1;
  }

  PartitionScan { start, outputs }
}

/// Range-partitioned exhaustive injectivity test.
///
/// Each partition records its outputs and publishes the IV of its first
/// local repeat; partitions stop once they pass the lowest published IV. A
/// merge phase then checks duplicates across partitions in ascending IV
/// order, so the witness equals the one [`test_injectivity`] returns for any
/// partition count.
///
/// # Errors
///
/// Returns [`AuditError::ExhaustiveRangeTooLarge`] when `policy` refuses the
/// algorithm's width.
pub fn test_injectivity_partitioned(
  crc: &Crc,
  message: &[u8],
  policy: &ExhaustivePolicy,
  partitions: usize,
) -> Result<InjectivityOutcome, AuditError> {
  policy.check(crc.width())?;

  let bound = CancelBound::new();
  let spans: Vec<(u64, u64)> = split_inclusive(0, crc.mask(), partitions)
    .into_iter()
    .map(|r| (*r.start(), *r.end()))
    .collect();

  let scans: Vec<PartitionScan> = spans
    .into_par_iter()
    .map(|span| scan_partition(crc, message, span, &bound))
    .collect();

  let limit = bound.get();
  debug!(
    algorithm = crc.name(),
    partitions = scans.len(),
    local_bound = bound.found(),
    "merging injectivity partitions"
  );

  let mut seen: HashMap<CrcValue, CrcValue> = HashMap::with_capacity(reserve_hint(crc.mask()));
  for scan in &scans {
    for (iv, &out) in (scan.start..).zip(&scan.outputs) {
      if iv > limit {
        break;
      }
      match seen.entry(out) {
        Entry::Occupied(first) => {
          return Ok(InjectivityOutcome::CollisionFound {
            iv_a: *first.get(),
            iv_b: iv,
          });
        }
        Entry::Vacant(slot) => {
          slot.insert(iv);
        }
      }
    }
  }

  Ok(InjectivityOutcome::Injective)
}

#[cfg(test)]
mod tests {
  use checksum::{CrcParams, catalog};

  use super::*;
  use crate::sampler::seeded;

  fn degenerate_width8() -> Crc {
    Crc::new(CrcParams::new("zero-poly-8", 8, 0x00, 0x00, false, false, 0x00)).unwrap()
  }

  #[test]
  fn zero_polynomial_collides_immediately() {
    let outcome = test_injectivity(&degenerate_width8(), b"ACRIC", &ExhaustivePolicy::default()).unwrap();
    assert_eq!(outcome, InjectivityOutcome::CollisionFound { iv_a: 0, iv_b: 1 });
  }

  #[test]
  fn witness_pair_really_collides() {
    let crc = degenerate_width8();
    let msg = b"\x01\x02\x03\x04";
    let (a, b) = test_injectivity(&crc, msg, &ExhaustivePolicy::default())
      .unwrap()
      .witness()
      .unwrap();
    assert_ne!(a, b);
    assert_eq!(crc.checksum_with_init(msg, a), crc.checksum_with_init(msg, b));
  }

  #[test]
  fn catalogue_crcs_are_injective_in_iv() {
    for params in [catalog::CRC_8, catalog::CRC_8_MAXIM, catalog::XMODEM, catalog::KERMIT] {
      let crc = Crc::new(params).unwrap();
      let outcome = test_injectivity(&crc, b"\xde\xad\xbe\xef", &ExhaustivePolicy::default()).unwrap();
      assert_eq!(outcome, InjectivityOutcome::Injective, "{}", crc.name());
    }
  }

  #[test]
  fn empty_message_is_injective() {
    let crc = degenerate_width8();
    let outcome = test_injectivity(&crc, b"", &ExhaustivePolicy::default()).unwrap();
    assert_eq!(outcome, InjectivityOutcome::Injective);
  }

  #[test]
  fn wide_algorithms_are_refused_without_opt_in() {
    let crc = Crc::new(catalog::CRC_32).unwrap();
    let err = test_injectivity(&crc, b"abcd", &ExhaustivePolicy::default()).unwrap_err();
    assert!(matches!(
      err,
      AuditError::ExhaustiveRangeTooLarge {
        width: 32,
        threshold: 24
      }
    ));
    let err = test_injectivity_partitioned(&crc, b"abcd", &ExhaustivePolicy::default(), 4).unwrap_err();
    assert!(matches!(err, AuditError::ExhaustiveRangeTooLarge { .. }));
  }

  #[test]
  fn threshold_is_inclusive() {
    let policy = ExhaustivePolicy {
      threshold_bits: 16,
      allow_large: false,
    };
    assert!(policy.check(16).is_ok());
    assert!(policy.check(17).is_err());
    assert!(ExhaustivePolicy { allow_large: true, ..policy }.check(64).is_ok());
    assert!(ExhaustivePolicy::unbounded().check(64).is_ok());
  }

  #[test]
  fn partitioned_witness_matches_sequential() {
    // x^10 + x = x(x^9 + 1): IVs differing by 0x201 collide after one byte,
    // so the first repeat is (1, 512), across partition boundaries.
    let params = CrcParams::new("even-10", 10, 0x002, 0x000, false, false, 0x155);
    let crc = Crc::new(params).unwrap();
    let msg = b"\x5a";
    let sequential = test_injectivity(&crc, msg, &ExhaustivePolicy::default()).unwrap();
    assert_eq!(sequential.witness(), Some((1, 512)));
    for partitions in [1, 2, 3, 7, 16, 1024, 4096] {
      let parallel = test_injectivity_partitioned(&crc, msg, &ExhaustivePolicy::default(), partitions).unwrap();
      assert_eq!(parallel, sequential, "partitions={partitions}");
    }
  }

  #[test]
  fn partitioned_injective_result_matches_sequential() {
    let crc = Crc::new(catalog::CRC_16_DNP).unwrap();
    for partitions in [1, 5, 64] {
      let outcome = test_injectivity_partitioned(&crc, b"xyz", &ExhaustivePolicy::default(), partitions).unwrap();
      assert_eq!(outcome, InjectivityOutcome::Injective);
    }
  }

  #[test]
  fn sampled_finds_degenerate_collision() {
    let mut rng = seeded(42);
    let outcome = test_injectivity_sampled(&degenerate_width8(), b"ACRIC", 64, &mut rng);
    let (a, b) = outcome.witness().unwrap();
    assert_ne!(a, b);
  }

  #[test]
  fn sampled_reports_weaker_verdict() {
    let crc = Crc::new(catalog::CRC_32).unwrap();
    let mut rng = seeded(42);
    let outcome = test_injectivity_sampled(&crc, b"abcd", 10_000, &mut rng);
    assert_eq!(outcome, InjectivityOutcome::NoCollisionInSamples { samples: 10_000 });
  }

  #[test]
  fn sampled_is_deterministic_for_a_seed() {
    let crc = degenerate_width8();
    let a = test_injectivity_sampled(&crc, b"m", 100, &mut seeded(7));
    let b = test_injectivity_sampled(&crc, b"m", 100, &mut seeded(7));
    assert_eq!(a, b);
  }
}
