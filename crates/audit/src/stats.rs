//! Statistical helpers for the Monte Carlo testers.
//!
//! The tamper-resistance tester reports a raw collision count. These helpers
//! turn it into something a report can judge: a Wilson score interval around
//! the observed rate and a relative-tolerance comparison against `2^-width`.
//!
//! # Example
//!
//! ```rust
//! use audit::stats::{Z_95, wilson_interval};
//!
//! let ci = wilson_interval(39, 10_000, Z_95).unwrap();
//! assert!(ci.contains(1.0 / 256.0));
//! ```

use serde::Serialize;

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.959_963_984_540_054;

/// Two-sided 99% normal quantile.
pub const Z_99: f64 = 2.575_829_303_548_901;

/// Relative tolerance used when judging an observed collision rate.
pub const DEFAULT_TOLERANCE: f64 = 0.20;

/// Closed interval `[lower, upper]` on a probability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Interval {
  /// Lower bound, at least `0.0`.
  pub lower: f64,
  /// Upper bound, at most `1.0`.
  pub upper: f64,
}

impl Interval {
  #[inline]
  #[must_use]
  pub fn contains(&self, value: f64) -> bool {
    self.lower <= value && value <= self.upper
  }

  #[inline]
  #[must_use]
  pub fn width(&self) -> f64 {
    self.upper - self.lower
  }
}

/// Wilson score interval for `successes` out of `trials`.
///
/// Returns `None` when `trials` is zero. Unlike the normal approximation it
/// stays inside `[0, 1]` and behaves sensibly for the tiny rates seen with
/// wide CRCs (zero observed collisions still yields a nonzero upper bound).
/// The bound on the observed side is pinned to `0` (or `1`) when every trial
/// failed (or succeeded), so the interval always contains the observed rate.
#[must_use]
pub fn wilson_interval(successes: u64, trials: u64, z: f64) -> Option<Interval> {
  if trials == 0 {
    return None;
  }
  let n = trials as f64;
  let p = successes as f64 / n;
  let z2 = z * z;

  let denom = 1.0 + z2 / n;
  let centre = (p + z2 / (2.0 * n)) / denom;
  let half = (z / denom) * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt();

  let lower = if successes == 0 { 0.0 } else { (centre - half).max(0.0) };
  let upper = if successes >= trials { 1.0 } else { (centre + half).min(1.0) };
  Some(Interval { lower, upper })
}

/// Returns `true` if `observed` lies within `tolerance * expected` of `expected`.
#[inline]
#[must_use]
pub fn within_tolerance(observed: f64, expected: f64, tolerance: f64) -> bool {
  (observed - expected).abs() <= tolerance * expected
}
