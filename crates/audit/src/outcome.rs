//! Tester outcomes.
//!
//! Each tester yields a tagged value rather than a boolean: exhaustive
//! verdicts carry a reproducible witness, Monte Carlo verdicts carry the
//! sample size they rest on.

use core::fmt;

use checksum::CrcValue;
use serde::Serialize;

use crate::stats::{Interval, wilson_interval};

/// Result of an injectivity-in-IV test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum InjectivityOutcome {
  /// Every initialization value produced a distinct output.
  Injective,

  /// Two initialization values produced the same output.
  ///
  /// `iv_a` is the first producer in enumeration order, `iv_b` the value at
  /// which the repeat was detected.
  CollisionFound {
    /// First IV producing the output.
    iv_a: CrcValue,
    /// Later IV producing the same output.
    iv_b: CrcValue,
  },

  /// Sampled run: no repeated output among `samples` distinct draws.
  ///
  /// This is weaker than [`Injective`](Self::Injective).
  NoCollisionInSamples {
    /// Number of IVs drawn.
    samples: u64,
  },
}

impl InjectivityOutcome {
  /// Returns `true` when no collision was observed.
  #[inline]
  #[must_use]
  pub const fn is_collision_free(&self) -> bool {
    !matches!(self, Self::CollisionFound { .. })
  }

  /// Returns the witness pair, if any.
  #[inline]
  #[must_use]
  pub const fn witness(&self) -> Option<(CrcValue, CrcValue)> {
    match *self {
      Self::CollisionFound { iv_a, iv_b } => Some((iv_a, iv_b)),
      _ => None,
    }
  }
}

impl fmt::Display for InjectivityOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Injective => write!(f, "injective"),
      Self::CollisionFound { iv_a, iv_b } => write!(f, "collision: iv {iv_a:#x} and iv {iv_b:#x}"),
      Self::NoCollisionInSamples { samples } => write!(f, "no collision in {samples} samples"),
    }
  }
}

/// Result of an XOR-linearity test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LinearityOutcome {
  /// `crc(a) ^ crc(b) == crc(a ^ b)` held for every trial.
  Linear {
    /// Number of trials run.
    trials: u64,
  },

  /// The homomorphism failed; `trial` is the zero-based index of the first
  /// counterexample.
  NonLinear {
    /// Index of the failing trial.
    trial: u64,
  },
}

impl LinearityOutcome {
  #[inline]
  #[must_use]
  pub const fn is_linear(&self) -> bool {
    matches!(self, Self::Linear { .. })
  }
}

impl fmt::Display for LinearityOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Linear { trials } => write!(f, "linear ({trials} trials)"),
      Self::NonLinear { trial } => write!(f, "non-linear (counterexample at trial {trial})"),
    }
  }
}

/// Empirical collision probability from the tamper-resistance tester.
///
/// This is a statistical estimate. Use [`confidence_interval`] to bound it.
///
/// [`confidence_interval`]: Self::confidence_interval
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CollisionProbability {
  /// Candidate messages whose CRC matched the reference CRC.
  pub collisions: u64,

  /// Candidate messages tested across all rounds.
  pub trials: u64,

  /// Rounds run (one IV and reference message each).
  pub rounds: u64,

  /// CRC width in bits.
  pub width: u8,
}

impl CollisionProbability {
  /// Empty accumulator for an algorithm of the given width.
  #[must_use]
  pub const fn new(width: u8) -> Self {
    Self {
      collisions: 0,
      trials: 0,
      rounds: 0,
      width,
    }
  }

  /// Observed collision rate, `collisions / trials` (0 when nothing ran).
  #[must_use]
  pub fn probability(&self) -> f64 {
    if self.trials == 0 {
      return 0.0;
    }
    self.collisions as f64 / self.trials as f64
  }

  /// Rate expected from a uniform width-bit output: `2^-width`.
  #[must_use]
  pub fn expected(&self) -> f64 {
    (-f64::from(self.width)).exp2()
  }

  /// Observed over expected rate. 1.0 means "as good as uniform".
  #[must_use]
  pub fn ratio_to_expected(&self) -> f64 {
    self.probability() / self.expected()
  }

  /// Wilson score interval around [`probability`](Self::probability).
  #[must_use]
  pub fn confidence_interval(&self, z: f64) -> Option<Interval> {
    wilson_interval(self.collisions, self.trials, z)
  }

  /// Fold another partial count (one round or one partition) into this one.
  pub fn absorb(&mut self, other: &Self) {
    debug_assert_eq!(self.width, other.width);
    self.collisions += other.collisions;
    self.trials += other.trials;
    self.rounds += other.rounds;
  }
}

impl fmt::Display for CollisionProbability {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "collision prob: {:.10} ({} / {}, expected {:.10})",
      self.probability(),
      self.collisions,
      self.trials,
      self.expected()
    )
  }
}
