use checksum::{Crc, CrcError, CrcParams, ParamIssue, catalog, compute, reflect_bits};

fn gen_bytes(len: usize, seed: u64) -> Vec<u8> {
  let mut out = vec![0u8; len];
  let mut x = seed;
  for b in &mut out {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *b = (x as u8).wrapping_add((x >> 8) as u8);
  }
  out
}

#[test]
fn catalogue_check_values_through_both_engines() {
  for entry in catalog::ENTRIES {
    let crc = Crc::new(entry.params.clone()).unwrap();
    assert_eq!(crc.checksum(catalog::CHECK_INPUT), entry.check, "{} (table)", entry.name());
    assert_eq!(
      compute(&entry.params, catalog::CHECK_INPUT, None).unwrap(),
      entry.check,
      "{} (bitwise)",
      entry.name()
    );
  }
}

#[test]
fn table_engine_matches_bitwise_across_lengths() {
  let lengths = [0usize, 1, 2, 3, 4, 7, 8, 15, 16, 31, 32, 63, 64, 255, 256, 1024];
  let seeds = [0u64, 1, 0x0123_4567_89ab_cdef, 0xd1b5_4a32_d192_ed03];

  for entry in catalog::ENTRIES {
    let crc = Crc::new(entry.params.clone()).unwrap();
    for &len in &lengths {
      for &seed in &seeds {
        let data = gen_bytes(len, seed ^ len as u64);
        let iv = seed.rotate_left(len as u32);
        assert_eq!(
          crc.checksum_with_init(&data, iv),
          compute(&entry.params, &data, Some(iv)).unwrap(),
          "{} mismatch at len={len} seed={seed:#x}",
          entry.name()
        );
      }
    }
  }
}

#[test]
fn empty_message_identity_for_every_definition() {
  for entry in catalog::ENTRIES {
    let p = &entry.params;
    let crc = Crc::new(p.clone()).unwrap();
    assert_eq!(crc.checksum(b""), (p.xor_out ^ p.init) & p.mask(), "{}", entry.name());

    let iv = 0xA5A5_A5A5_A5A5_A5A5 & p.mask();
    assert_eq!(crc.checksum_with_init(b"", iv), (p.xor_out ^ iv) & p.mask(), "{}", entry.name());
  }
}

#[test]
fn default_init_equals_explicit_override() {
  for entry in catalog::ENTRIES {
    let crc = Crc::new(entry.params.clone()).unwrap();
    let data = gen_bytes(40, 7);
    assert_eq!(crc.checksum(&data), crc.compute(&data, Some(entry.params.init)), "{}", entry.name());
  }
}

#[test]
fn zero_offset_crcs_are_xor_homomorphic() {
  // init = 0 and xor_out = 0 over an unreflected register: plain polynomial
  // division, hence linear over GF(2).
  let crc = Crc::new(catalog::XMODEM).unwrap();
  for seed in 0..32u64 {
    let a = gen_bytes(16, seed);
    let b = gen_bytes(16, seed.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    let x: Vec<u8> = a.iter().zip(&b).map(|(p, q)| p ^ q).collect();
    assert_eq!(crc.checksum(&a) ^ crc.checksum(&b), crc.checksum(&x));
  }
}

#[test]
fn reflected_register_init_is_stored_reflected() {
  // CRC-16/RIELLO publishes init 0xB2AA MSB-first; the catalogue keeps the
  // register form.
  assert_eq!(catalog::CRC_16_RIELLO.init, reflect_bits(0xB2AA, 16));
}

#[test]
fn invalid_definitions_are_errors_not_truncations() {
  let too_wide = CrcParams::new("too-wide", 8, 0x07, 0x100, false, false, 0);
  let err = Crc::new(too_wide.clone()).unwrap_err();
  assert_eq!(
    err,
    CrcError::InvalidParameters {
      name: "too-wide".to_string(),
      issue: ParamIssue::ValueTooWide {
        field: "init",
        value: 0x100,
        width: 8
      },
    }
  );
  assert_eq!(compute(&too_wide, b"x", None).unwrap_err(), err);
}
