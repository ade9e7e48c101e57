//! Property tests for the table-driven engine.
//!
//! Two invariants over randomly drawn, valid parameter sets:
//!
//! 1. **Reference equivalence**: the table-driven [`Crc`] matches the bitwise
//!    reference for every width, reflection combination, and init override.
//! 2. **Empty-message identity**: the CRC of no bytes is `init ^ xor_out`.

#![cfg(all(test, not(miri)))]

use proptest::prelude::*;

use super::reference::crc_bitwise;
use crate::{Crc, CrcParams, width_mask};

fn arb_params() -> impl Strategy<Value = CrcParams> {
  (1u8..=64, any::<u64>(), any::<u64>(), any::<bool>(), any::<bool>(), any::<u64>()).prop_map(
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
  #![proptest_config(ProptestConfig::with_cases(512))]

  #[test]
  fn table_engine_matches_bitwise_reference(
    params in arb_params(),
    data in proptest::collection::vec(any::<u8>(), 0..=256),
    iv in proptest::option::of(any::<u64>()),
  ) {
    let crc = Crc::new(params.clone()).unwrap();
    let expected = crc_bitwise(&params, &data, iv).unwrap();
    prop_assert_eq!(crc.compute(&data, iv), expected);
  }

  #[test]
  fn output_fits_in_width(
    params in arb_params(),
    data in proptest::collection::vec(any::<u8>(), 0..=64),
    iv in any::<u64>(),
  ) {
    let crc = Crc::new(params.clone()).unwrap();
    prop_assert_eq!(crc.checksum_with_init(&data, iv) & !params.mask(), 0);
  }

  #[test]
  fn empty_message_identity(params in arb_params(), iv in any::<u64>()) {
    let crc = Crc::new(params.clone()).unwrap();
    let mask = params.mask();
    prop_assert_eq!(crc.checksum(&[]), (params.init ^ params.xor_out) & mask);
    prop_assert_eq!(crc.checksum_with_init(&[], iv), (iv ^ params.xor_out) & mask);
  }

  #[test]
  fn affine_over_equal_length_messages(
    params in arb_params(),
    pair in (1usize..=64).prop_flat_map(|len| (
      proptest::collection::vec(any::<u8>(), len),
      proptest::collection::vec(any::<u8>(), len),
    )),
  ) {
    // crc(a) ^ crc(b) ^ crc(a ^ b) equals the CRC of the all-zero message of
    // the same length: the affine offset contributed by init and xor_out.
    let (a, b) = pair;
    let crc = Crc::new(params).unwrap();
    let xored: Vec<u8> = a.iter().zip(&b).map(|(x, y)| x ^ y).collect();
    let zeros = vec![0u8; a.len()];

    let offset = crc.checksum(&a) ^ crc.checksum(&b) ^ crc.checksum(&xored);
    prop_assert_eq!(offset, crc.checksum(&zeros));
  }
}
