//! Bitwise reference implementation for every CRC width.
//!
//! This module provides the canonical "source of truth" for CRC computation.
//! It processes one bit at a time, making it:
//!
//! - **Obviously correct**: The algorithm directly mirrors the polynomial division
//! - **Audit-friendly**: two short loops, no lookup tables
//! - **Const-evaluable**: Check values are verified at compile time
//!
//! The table-driven [`Crc`](crate::Crc) engine must produce identical results.
//!
//! # CRC Model
//!
//! | Parameter | Description |
//! |-----------|-------------|
//! | `width`   | CRC width in bits (1..=64) |
//! | `poly`    | Generator polynomial (reflected for LSB-first CRCs) |
//! | `init`    | Initial register value |
//! | `refin`   | Process input LSB-first |
//! | `refout`  | Reflect output before final XOR |
//! | `xorout`  | Final XOR value |
//!
//! # Performance
//!
//! These are intentionally slow (~8 operations per bit). Use for correctness
//! verification, one-off computations and test oracles.

// SAFETY: All array indexing uses bounded loop indices (0..data.len()).
// Clippy cannot prove this in const fn contexts, but bounds are statically guaranteed.
#![allow(clippy::indexing_slicing)]

use crate::{
  error::CrcError,
  params::{CrcParams, reflect_bits},
};

// ─────────────────────────────────────────────────────────────────────────────
// Register Loops
// ─────────────────────────────────────────────────────────────────────────────

/// Bitwise MSB-first register update for any width in `1..=64`.
///
/// The register is kept left-aligned in a `u64` so widths below 8 need no
/// special casing.
///
/// # Returns
///
/// The raw register state in the low `width` bits (caller applies final XOR).
#[must_use]
pub const fn normal_bitwise(poly: u64, width: u8, init: u64, data: &[u8]) -> u64 {
  let shift = 64 - width as u32;
  let poly_aligned = poly << shift;
  let mut crc = init << shift;

  let mut i: usize = 0;
  while i < data.len() {
    crc ^= (data[i] as u64) << 56;
    let mut bit: u32 = 0;
    while bit < 8 {
      crc = if crc & (1u64 << 63) != 0 {
        (crc << 1) ^ poly_aligned
      } else {
        crc << 1
      };
      bit += 1;
    }
    i += 1;
  }

  crc >> shift
}

/// Bitwise LSB-first register update.
///
/// # Arguments
///
/// * `poly` - Reflected polynomial (e.g., 0xEDB88320 for CRC-32)
/// * `init` - Initial register value
/// * `data` - Input bytes
///
/// # Returns
///
/// The raw register state (caller applies final XOR if needed).
#[must_use]
pub const fn reflected_bitwise(poly: u64, init: u64, data: &[u8]) -> u64 {
  let mut crc = init;
  let mut i: usize = 0;
  while i < data.len() {
    crc ^= data[i] as u64;
    let mut bit: u32 = 0;
    while bit < 8 {
      crc = if crc & 1 != 0 { (crc >> 1) ^ poly } else { crc >> 1 };
      bit += 1;
    }
    i += 1;
  }
  crc
}

// ─────────────────────────────────────────────────────────────────────────────
// Parameterized Entry Point
// ─────────────────────────────────────────────────────────────────────────────

/// Compute a CRC bit by bit from a parameter set.
///
/// `init_override` replaces `params.init` and is masked to `width` bits.
///
/// # Errors
///
/// [`CrcError::InvalidParameters`] if `params` fails validation; nothing is
/// computed in that case.
pub fn crc_bitwise(params: &CrcParams, data: &[u8], init_override: Option<u64>) -> Result<u64, CrcError> {
  params.validate()?;
  Ok(crc_bitwise_unchecked(params, data, init_override))
}

/// [`crc_bitwise`] without validation. `params` must already be valid.
pub(crate) fn crc_bitwise_unchecked(params: &CrcParams, data: &[u8], init_override: Option<u64>) -> u64 {
  let width = params.width;
  let mask = params.mask();
  let init = init_override.unwrap_or(params.init) & mask;

  // Differing reflection flags reverse the register on the way in and out so
  // the empty message still reports `init ^ xor_out`.
  let flip = params.reflect_in != params.reflect_out;
  let start = if flip { reflect_bits(init, width) } else { init };

  let register = if params.reflect_in {
    reflected_bitwise(params.polynomial_reflected(), start, data)
  } else {
    normal_bitwise(params.polynomial, width, start, data)
  };

  let register = if flip { reflect_bits(register, width) } else { register };
  (register ^ params.xor_out) & mask
}

// ─────────────────────────────────────────────────────────────────────────────
// Compile-Time Verification
// ─────────────────────────────────────────────────────────────────────────────

// These const assertions verify the register loops against known check values
// at compile time. If these fail, the build fails.

/// Standard test input for CRC check values.
pub const CHECK_INPUT: &[u8] = b"123456789";

// CRC-16/XMODEM: MSB-first, init=0x0000, xorout=0x0000
// Check value: 0x31C3
const _: () = {
  let check = normal_bitwise(0x1021, 16, 0, CHECK_INPUT);
  assert!(check == 0x31C3);
};

// CRC-24/OPENPGP: MSB-first, init=0xB704CE, xorout=0x000000
// Check value: 0x21CF02
const _: () = {
  let check = normal_bitwise(0x0086_4CFB, 24, 0x00B7_04CE, CHECK_INPUT);
  assert!(check == 0x0021_CF02);
};

// CRC-32/ISO-HDLC: LSB-first, init=0xFFFFFFFF, xorout=0xFFFFFFFF
// Check value: 0xCBF43926
const _: () = {
  let raw = reflected_bitwise(0xEDB8_8320, 0xFFFF_FFFF, CHECK_INPUT);
  assert!(raw ^ 0xFFFF_FFFF == 0xCBF4_3926);
};

// CRC-64/XZ: LSB-first, init=!0, xorout=!0
// Check value: 0x995DC9BBDF1939FA
const _: () = {
  let raw = reflected_bitwise(0xC96C_5795_D787_0F42, !0u64, CHECK_INPUT);
  assert!(raw ^ !0u64 == 0x995D_C9BB_DF19_39FA);
};

// CRC-64/WE: MSB-first at full width, init=!0, xorout=!0
// Check value: 0x62EC59E3F1A4F00A
const _: () = {
  let raw = normal_bitwise(0x42F0_E1EB_A9EA_3693, 64, !0u64, CHECK_INPUT);
  assert!(raw ^ !0u64 == 0x62EC_59E3_F1A4_F00A);
};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
