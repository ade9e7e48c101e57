//! Range partitioning and shared cancellation for parallel testers.
//!
//! Workers receive contiguous index ranges. A worker that reaches a definitive
//! answer publishes its index through a [`CancelBound`]; others poll the bound
//! every [`CANCEL_CHECK_INTERVAL`] iterations and stop once their position has
//! passed it.

use core::{
  ops::{Range, RangeInclusive},
  sync::atomic::{AtomicU64, Ordering},
};

/// Iterations between polls of a [`CancelBound`].
pub const CANCEL_CHECK_INTERVAL: u64 = 1 << 12;

/// Split `count` items into at most `parts` contiguous, non-empty ranges
/// covering `0..count` in order.
#[must_use]
pub fn split_count(count: u64, parts: usize) -> Vec<Range<u64>> {
  split_span(0, u128::from(count), parts)
    .into_iter()
    .map(|(start, end)| start as u64..end as u64)
    .collect()
}

/// Split the inclusive span `first..=last` into at most `parts` contiguous,
/// non-empty ranges in order.
///
/// Works for the full `0..=u64::MAX` span.
#[must_use]
pub fn split_inclusive(first: u64, last: u64, parts: usize) -> Vec<RangeInclusive<u64>> {
  if first > last {
    return Vec::new();
  }
  split_span(u128::from(first), u128::from(last) + 1, parts)
    .into_iter()
    .map(|(start, end)| start as u64..=(end - 1) as u64)
    .collect()
}

fn split_span(start: u128, end: u128, parts: usize) -> Vec<(u128, u128)> {
  let len = end.saturating_sub(start);
  if len == 0 {
    return Vec::new();
  }
  let parts = (parts.max(1) as u128).min(len);
  let base = len / parts;
  let extra = len % parts;

  let mut out = Vec::with_capacity(parts as usize);
  let mut lo = start;
  for i in 0..parts {
    let size = base + u128::from(i < extra);
    out.push((lo, lo + size));
    lo += size;
  }
  out
}

/// Lowest index at which some worker found a definitive answer.
///
/// Starts unset (`u64::MAX`) and only ever decreases.
#[derive(Debug)]
pub struct CancelBound(AtomicU64);

impl CancelBound {
  /// A bound with nothing offered yet.
  #[must_use]
  pub const fn new() -> Self {
    Self(AtomicU64::new(u64::MAX))
  }

  /// Publish `index`; keeps the minimum of all offers.
  #[inline]
  pub fn offer(&self, index: u64) {
    self.0.fetch_min(index, Ordering::AcqRel);
  }

  /// Current bound (`u64::MAX` when nothing has been offered).
  #[inline]
  #[must_use]
  pub fn get(&self) -> u64 {
    self.0.load(Ordering::Acquire)
  }

  /// Returns the bound if one has been offered.
  #[inline]
  #[must_use]
  pub fn found(&self) -> Option<u64> {
    match self.get() {
      u64::MAX => None,
      bound => Some(bound),
    }
  }

  /// Returns `true` if work at `index` can no longer affect the answer.
  #[inline]
  #[must_use]
  pub fn passed(&self, index: u64) -> bool {
    index > self.get()
  }
}

impl Default for CancelBound {
  fn default() -> Self {
    Self::new()
  }
}
