//! Partitioned testers agree with their single-stream counterparts.

use audit::{
  InjectivityOutcome,
  injectivity::{ExhaustivePolicy, test_injectivity, test_injectivity_partitioned},
  linearity::test_linearity_partitioned,
  partition::{split_count, split_inclusive},
};
use checksum::{Crc, CrcParams, width_mask};
use proptest::prelude::*;

fn arb_small_params() -> impl Strategy<Value = CrcParams> {
  (1u8..=12, any::<u64>(), any::<u64>(), any::<bool>(), any::<bool>(), any::<u64>()).prop_map(
    |(width, poly, init, reflect_in, reflect_out, xor_out)| {
      let mask = width_mask(width);
      CrcParams::new(
        "arbitrary",
        width,
        poly & mask,
        init & mask,
        reflect_in,
        reflect_out,
        xor_out & mask,
      )
    },
  )
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  #[test]
  fn split_count_is_an_ordered_cover(count in 0u64..10_000, parts in 0usize..64) {
    let ranges = split_count(count, parts);
    prop_assert!(ranges.len() <= parts.max(1));
    let mut next = 0;
    for r in &ranges {
      prop_assert_eq!(r.start, next);
      prop_assert!(r.end > r.start);
      next = r.end;
    }
    prop_assert_eq!(next, count);
  }

  #[test]
  fn split_inclusive_is_an_ordered_cover(first in 0u64..1_000, len in 0u64..5_000, parts in 1usize..64) {
    let last = first + len;
    let ranges = split_inclusive(first, last, parts);
    prop_assert_eq!(*ranges[0].start(), first);
    prop_assert_eq!(*ranges[ranges.len() - 1].end(), last);
    for pair in ranges.windows(2) {
      prop_assert_eq!(*pair[0].end() + 1, *pair[1].start());
    }
    let sizes: Vec<u64> = ranges.iter().map(|r| r.end() - r.start() + 1).collect();
    let (min, max) = (sizes.iter().min().copied(), sizes.iter().max().copied());
    prop_assert!(max.zip(min).is_some_and(|(hi, lo)| hi - lo <= 1));
  }

  #[test]
  fn partitioned_injectivity_equals_sequential(
    params in arb_small_params(),
    message in proptest::collection::vec(any::<u8>(), 0..=8),
    partitions in 1usize..=32,
  ) {
    let crc = Crc::new(params).unwrap();
    let policy = ExhaustivePolicy::default();
    let sequential = test_injectivity(&crc, &message, &policy).unwrap();
    let parallel = test_injectivity_partitioned(&crc, &message, &policy, partitions).unwrap();
    prop_assert_eq!(parallel, sequential);
  }

  #[test]
  fn odd_polynomials_are_injective(
    params in arb_small_params(),
    message in proptest::collection::vec(any::<u8>(), 1..=8),
  ) {
    // An odd generator is coprime to x, so multiplying the register by x^8
    // is invertible modulo it.
    let params = CrcParams { polynomial: params.polynomial | 1, ..params };
    let crc = Crc::new(params).unwrap();
    let outcome = test_injectivity(&crc, &message, &ExhaustivePolicy::default()).unwrap();
    prop_assert_eq!(outcome, InjectivityOutcome::Injective);
  }

  #[test]
  fn partitioned_linearity_depends_only_on_seed_and_partitions(
    params in arb_small_params(),
    seed in any::<u64>(),
    partitions in 1usize..=8,
  ) {
    let crc = Crc::new(params).unwrap();
    let a = test_linearity_partitioned(&crc, 0, 4, 64, seed, partitions);
    let b = test_linearity_partitioned(&crc, 0, 4, 64, seed, partitions);
    prop_assert_eq!(a, b);
  }
}
