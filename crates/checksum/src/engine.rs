//! Table-driven CRC engine.
//!
//! [`Crc`] validates a [`CrcParams`] once, builds the byte-indexed table for
//! its polynomial, and then computes CRCs of arbitrary messages under the
//! default or an overridden initialization value. It is immutable after
//! construction, so one instance can be shared by any number of threads.
//!
//! ```rust
//! use checksum::{Crc, catalog};
//!
//! let crc = Crc::new(catalog::CRC_32.clone()).unwrap();
//! assert_eq!(crc.checksum(b"123456789"), 0xCBF4_3926);
//!
//! // Empty input reports `init ^ xor_out`.
//! assert_eq!(crc.checksum_with_init(b"", 0x1234), 0x1234 ^ 0xFFFF_FFFF);
//! ```

// SAFETY: Table indices are produced from a `u8`, so they are always < 256.
#![allow(clippy::indexing_slicing)]

use crate::{
  common::{
    reference,
    tables::{TABLE_LEN, normal_table, reflected_table},
  },
  error::CrcError,
  params::{CrcParams, reflect_bits},
};

/// A CRC value. Always fits in the producing algorithm's `width` bits.
pub type CrcValue = u64;

/// Compute the CRC of `message` from a parameter set.
///
/// `init_override` replaces `params.init` and is masked to `width` bits.
/// This is a one-shot convenience over the bitwise reference; repeated
/// computations should build a [`Crc`] once instead.
///
/// # Errors
///
/// [`CrcError::InvalidParameters`] if `params` is not a valid CRC definition.
pub fn compute(params: &CrcParams, message: &[u8], init_override: Option<CrcValue>) -> Result<CrcValue, CrcError> {
  reference::crc_bitwise(params, message, init_override)
}

/// Validated CRC definition plus its lookup table.
#[derive(Clone, Debug)]
pub struct Crc {
  params: CrcParams,
  table: [u64; TABLE_LEN],
  mask: u64,
  /// Left shift aligning an MSB-first register to the top of a `u64`.
  shift: u32,
  /// `reflect_in != reflect_out`.
  flip: bool,
}

impl Crc {
  /// Build an engine for `params`.
  ///
  /// # Errors
  ///
  /// [`CrcError::InvalidParameters`] if `params` fails validation.
  pub fn new(params: CrcParams) -> Result<Self, CrcError> {
    params.validate()?;

    let table = if params.reflect_in {
      reflected_table(params.polynomial_reflected())
    } else {
      normal_table(params.polynomial, params.width)
    };

    Ok(Self {
      mask: params.mask(),
      shift: 64 - u32::from(params.width),
      flip: params.reflect_in != params.reflect_out,
      table,
      params,
    })
  }

  /// The parameter set this engine was built from.
  #[inline]
  #[must_use]
  pub fn params(&self) -> &CrcParams {
    &self.params
  }

  /// Algorithm name.
  #[inline]
  #[must_use]
  pub fn name(&self) -> &str {
    &self.params.name
  }

  /// Register width in bits.
  #[inline]
  #[must_use]
  pub fn width(&self) -> u8 {
    self.params.width
  }

  /// Mask selecting the low `width` bits.
  #[inline]
  #[must_use]
  pub fn mask(&self) -> u64 {
    self.mask
  }

  /// CRC of `message` under the algorithm's own initialization value.
  #[inline]
  #[must_use]
  pub fn checksum(&self, message: &[u8]) -> CrcValue {
    self.checksum_with_init(message, self.params.init)
  }

  /// CRC of `message` with `init_override` if given, else the default init.
  #[inline]
  #[must_use]
  pub fn compute(&self, message: &[u8], init_override: Option<CrcValue>) -> CrcValue {
    self.checksum_with_init(message, init_override.unwrap_or(self.params.init))
  }

  /// CRC of `message` with the register loaded from `init` (masked to `width` bits).
  #[must_use]
  pub fn checksum_with_init(&self, message: &[u8], init: CrcValue) -> CrcValue {
    let width = self.params.width;
    let init = init & self.mask;
    let start = if self.flip { reflect_bits(init, width) } else { init };

    let register = if self.params.reflect_in {
      self.update_reflected(start, message)
    } else {
      self.update_normal(start, message)
    };

    let register = if self.flip { reflect_bits(register, width) } else { register };
    (register ^ self.params.xor_out) & self.mask
  }

  #[inline]
  fn update_reflected(&self, mut crc: u64, message: &[u8]) -> u64 {
    for &byte in message {
      crc = (crc >> 8) ^ self.table[usize::from(crc as u8 ^ byte)];
    }
    crc
  }

  #[inline]
  fn update_normal(&self, register: u64, message: &[u8]) -> u64 {
    let mut crc = register << self.shift;
    for &byte in message {
      crc = (crc << 8) ^ self.table[usize::from((crc >> 56) as u8 ^ byte)];
    }
    crc >> self.shift
  }
}
