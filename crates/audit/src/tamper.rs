//! Tamper-resistance (collision probability) tester.
//!
//! Each round fixes an initialization value and a reference message, then
//! counts how many random candidate messages reproduce the reference CRC.
//! For a well-behaved width-`w` CRC the rate approaches `2^-w`.
//!
//! Counts accumulate in scalars and messages live in reused buffers, so a
//! round of 10^8 trials runs in constant memory.

use core::ops::RangeInclusive;

use checksum::{Crc, CrcValue};
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::{
  outcome::CollisionProbability,
  partition::split_count,
  sampler::{MessageSampler, random_iv, substream, substream_seed},
};

/// Default number of rounds.
pub const DEFAULT_ROUNDS: u64 = 10;

/// Default candidate messages per round.
pub const DEFAULT_TRIALS_PER_ROUND: u64 = 100_000_000;

/// Default reference message length bounds, in bytes.
pub const DEFAULT_REFERENCE_LEN: RangeInclusive<usize> = 1..=50;

/// Default candidate message length bounds, in bytes.
pub const DEFAULT_CANDIDATE_LEN: RangeInclusive<usize> = 1..=250;

/// How each round picks its initialization value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IvSelection {
  /// Uniform over `[0, 2^width)`, drawn per round.
  #[default]
  Random,
  /// The same value every round, masked to the width.
  Fixed(CrcValue),
}

/// Shape of a tamper-resistance run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TamperPlan {
  /// Independent rounds, each with a fresh IV and reference message.
  pub rounds: u64,
  /// Candidate messages compared against the reference in each round.
  pub trials_per_round: u64,
  /// How each round picks its IV.
  pub iv: IvSelection,
  /// Reference message length bounds. Lengths below one byte are raised to one.
  pub reference_len: RangeInclusive<usize>,
  /// Candidate message length bounds. Lengths below one byte are raised to one.
  pub candidate_len: RangeInclusive<usize>,
}

impl Default for TamperPlan {
  fn default() -> Self {
    Self {
      rounds: DEFAULT_ROUNDS,
      trials_per_round: DEFAULT_TRIALS_PER_ROUND,
      iv: IvSelection::Random,
      reference_len: DEFAULT_REFERENCE_LEN,
      candidate_len: DEFAULT_CANDIDATE_LEN,
    }
  }
}

impl TamperPlan {
  /// Plan with the default length bounds and a random IV per round.
  #[must_use]
  pub fn new(rounds: u64, trials_per_round: u64) -> Self {
    Self {
      rounds,
      trials_per_round,
      ..Self::default()
    }
  }

  /// Set the IV selection.
  #[must_use]
  pub fn with_iv(mut self, iv: IvSelection) -> Self {
    self.iv = iv;
    self
  }

  /// Set the reference and candidate length bounds, in bytes.
  #[must_use]
  pub fn with_lengths(mut self, reference: RangeInclusive<usize>, candidate: RangeInclusive<usize>) -> Self {
    self.reference_len = reference;
    self.candidate_len = candidate;
    self
  }

  /// Total candidate messages the plan tests.
  #[must_use]
  pub fn total_trials(&self) -> u64 {
    self.rounds.saturating_mul(self.trials_per_round)
  }

  /// Largest message the plan can generate.
  fn max_len(&self) -> usize {
    (*self.reference_len.end()).max(*self.candidate_len.end()).max(1)
  }
}

/// Per-round setup: the IV and the reference CRC.
struct Round {
  iv: CrcValue,
  reference_crc: CrcValue,
}

fn start_round<R: Rng + ?Sized>(crc: &Crc, plan: &TamperPlan, reference: &mut MessageSampler, rng: &mut R) -> Round {
  let iv = match plan.iv {
    IvSelection::Random => random_iv(rng, crc.width()),
    IvSelection::Fixed(value) => value & crc.mask(),
  };
  let message = reference.fill_range(rng, &plan.reference_len);
  Round {
    iv,
    reference_crc: crc.checksum_with_init(message, iv),
  }
}

/// Count candidates among `trials` that reproduce the round's reference CRC.
///
/// Candidates equal to the reference message are redrawn.
fn count_collisions<R: Rng + ?Sized>(
  crc: &Crc,
  plan: &TamperPlan,
  round: &Round,
  reference: &[u8],
  trials: u64,
  rng: &mut R,
) -> u64 {
  let mut candidate = MessageSampler::with_capacity(plan.max_len());
  let mut collisions = 0u64;

  for _ in 0..trials {
    loop {
      if candidate.fill_range(rng, &plan.candidate_len) != reference {
        break;
      }
    }
    if crc.checksum_with_init(candidate.message(), round.iv) == round.reference_crc {
      collisions += 1;
    }
  }

  collisions
}

/// Single-stream tamper-resistance test.
///
/// Draws every IV, reference and candidate from `rng` in order.
pub fn test_tamper_resistance<R: Rng + ?Sized>(crc: &Crc, plan: &TamperPlan, rng: &mut R) -> CollisionProbability {
  let mut total = CollisionProbability::new(crc.width());
  let mut reference = MessageSampler::with_capacity(plan.max_len());

  for index in 0..plan.rounds {
    let round = start_round(crc, plan, &mut reference, rng);
    let collisions = count_collisions(crc, plan, &round, reference.message(), plan.trials_per_round, rng);
    debug!(
      algorithm = crc.name(),
      round = index,
      iv = round.iv,
      collisions,
      "tamper round finished"
    );
    total.absorb(&CollisionProbability {
      collisions,
      trials: plan.trials_per_round,
      rounds: 1,
      width: crc.width(),
    });
  }

  total
}

/// Partitioned tamper-resistance test.
///
/// Round `r` draws its IV and reference from sub-stream 0 of
/// `substream_seed(seed, r)`; its trials are split into `partitions`
/// contiguous ranges, range `p` drawing from sub-stream `p + 1`. Counters are
/// summed, so the result depends only on `(seed, partitions)`.
pub fn test_tamper_resistance_partitioned(
  crc: &Crc,
  plan: &TamperPlan,
  seed: u64,
  partitions: usize,
) -> CollisionProbability {
  let mut total = CollisionProbability::new(crc.width());
  let mut reference = MessageSampler::with_capacity(plan.max_len());

  for index in 0..plan.rounds {
    let round_seed = substream_seed(seed, index);
    let round = start_round(crc, plan, &mut reference, &mut substream(round_seed, 0));
    let reference_message = reference.message();

    let collisions: u64 = split_count(plan.trials_per_round, partitions)
      .into_par_iter()
      .enumerate()
      .map(|(part, range)| {
        let mut rng = substream(round_seed, part as u64 + 1);
        count_collisions(crc, plan, &round, reference_message, range.end - range.start, &mut rng)
      })
      .sum();

    debug!(
      algorithm = crc.name(),
      round = index,
      iv = round.iv,
      collisions,
      partitions,
      "tamper round finished"
    );
    total.absorb(&CollisionProbability {
      collisions,
      trials: plan.trials_per_round,
      rounds: 1,
      width: crc.width(),
    });
  }

  total
}
