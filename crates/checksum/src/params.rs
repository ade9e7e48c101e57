//! CRC algorithm parameters.
//!
//! This module defines the parameter record shared by every CRC variant,
//! following the Rocksoft model used by the
//! [CRC Catalogue](https://reveng.sourceforge.io/crc-catalogue/).
//!
//! A variant is data, not code: one [`CrcParams`] value fully describes it and
//! the single engine in [`crate::engine`] consumes it.

use std::borrow::Cow;

use crate::error::{CrcError, ParamIssue};

/// Largest supported register width in bits.
pub const MAX_WIDTH: u8 = 64;

/// CRC algorithm parameters.
///
/// # Parameters
///
/// - `width`: Number of bits in the CRC (1..=64)
/// - `polynomial`: The generator polynomial (without the implicit high bit)
/// - `init`: Register value loaded before the first byte
/// - `reflect_in`: If true, bytes are processed LSB-first
/// - `reflect_out`: If true, the final register is reported bit-reversed
/// - `xor_out`: Value to XOR with the final CRC
///
/// # Orientation of `init`
///
/// `init` is the register value in the processing orientation. For reflected
/// algorithms that is the bit-reversed form of the catalogue's MSB-first
/// value (CRC-16/RIELLO is `0x554D`, not `0xB2AA`). This is the convention
/// under which an initialization override is a plain register load.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CrcParams {
  /// Registry key (e.g. `"crc-32c"`).
  pub name: Cow<'static, str>,
  /// Width in bits.
  pub width: u8,
  /// Generator polynomial (without implicit high bit).
  pub polynomial: u64,
  /// Initial value for the CRC register.
  pub init: u64,
  /// Process input bytes LSB-first.
  pub reflect_in: bool,
  /// Reflect final register before XOR.
  pub reflect_out: bool,
  /// XOR value applied to final CRC.
  pub xor_out: u64,
}

impl CrcParams {
  /// Build a parameter set with a static name. Values are not checked here;
  /// see [`validate`](Self::validate).
  #[must_use]
  pub const fn new(
    name: &'static str,
    width: u8,
    polynomial: u64,
    init: u64,
    reflect_in: bool,
    reflect_out: bool,
    xor_out: u64,
  ) -> Self {
    Self {
      name: Cow::Borrowed(name),
      width,
      polynomial,
      init,
      reflect_in,
      reflect_out,
      xor_out,
    }
  }

  /// Mask selecting the low `width` bits.
  ///
  /// Only meaningful for a valid width; a zero width yields `0`.
  #[inline]
  #[must_use]
  pub const fn mask(&self) -> u64 {
    width_mask(self.width)
  }

  /// Number of distinct register values, `2^width`, or `None` for 64-bit CRCs.
  #[inline]
  #[must_use]
  pub const fn iv_space(&self) -> Option<u64> {
    if self.width >= MAX_WIDTH {
      None
    } else {
      Some(1u64 << self.width)
    }
  }

  /// Returns the reflected polynomial (bit-reversed over `width` bits).
  ///
  /// For reflected CRCs, the polynomial is processed in bit-reversed form.
  #[must_use]
  pub const fn polynomial_reflected(&self) -> u64 {
    reflect_bits(self.polynomial, self.width)
  }

  /// Check the width and that every configured value fits in `width` bits.
  ///
  /// # Errors
  ///
  /// [`CrcError::InvalidParameters`] describing the first violation found.
  pub fn validate(&self) -> Result<(), CrcError> {
    if self.width == 0 || self.width > MAX_WIDTH {
      return Err(self.invalid(ParamIssue::WidthOutOfRange { width: self.width }));
    }
    let mask = self.mask();
    for (field, value) in [
      ("polynomial", self.polynomial),
      ("init", self.init),
      ("xor_out", self.xor_out),
    ] {
      if value & !mask != 0 {
        return Err(self.invalid(ParamIssue::ValueTooWide {
          field,
          value,
          width: self.width,
        }));
      }
    }
    Ok(())
  }

  fn invalid(&self, issue: ParamIssue) -> CrcError {
    CrcError::InvalidParameters {
      name: self.name.to_string(),
      issue,
    }
  }
}

/// Mask selecting the low `width` bits (`u64::MAX` for 64 and above).
#[inline]
#[must_use]
pub const fn width_mask(width: u8) -> u64 {
  if width >= MAX_WIDTH {
    u64::MAX
  } else {
    (1u64 << width) - 1
  }
}

/// Reflect (bit-reverse) the lower `width` bits of `value`.
#[must_use]
pub const fn reflect_bits(value: u64, width: u8) -> u64 {
  if width == 0 {
    return 0;
  }
  let width = if width > MAX_WIDTH { MAX_WIDTH } else { width };
  value.reverse_bits() >> (MAX_WIDTH - width)
}

#[cfg(test)]
mod tests {
  use super::*;

  const CRC32C: CrcParams = CrcParams::new("crc-32c", 32, 0x1EDC6F41, 0xFFFF_FFFF, true, true, 0xFFFF_FFFF);
  const CRC32_ISO: CrcParams = CrcParams::new("crc-32", 32, 0x04C11DB7, 0xFFFF_FFFF, true, true, 0xFFFF_FFFF);

  #[test]
  fn test_crc32c_polynomial_reflected() {
    // CRC32-C polynomial 0x1EDC6F41 reflected is 0x82F63B78
    assert_eq!(CRC32C.polynomial_reflected(), 0x82F63B78);
  }

  #[test]
  fn test_crc32_polynomial_reflected() {
    // CRC32 (ISO) polynomial 0x04C11DB7 reflected is 0xEDB88320
    assert_eq!(CRC32_ISO.polynomial_reflected(), 0xEDB88320);
  }

  #[test]
  fn test_reflect_bits() {
    assert_eq!(reflect_bits(0b1010, 4), 0b0101);
    assert_eq!(reflect_bits(0b1100, 4), 0b0011);
    assert_eq!(reflect_bits(0xFF, 8), 0xFF);
    assert_eq!(reflect_bits(0x80, 8), 0x01);
    assert_eq!(reflect_bits(0xB2AA, 16), 0x554D);
    assert_eq!(reflect_bits(1, 64), 1u64 << 63);
  }

  #[test]
  fn test_width_mask() {
    assert_eq!(width_mask(1), 0x1);
    assert_eq!(width_mask(8), 0xFF);
    assert_eq!(width_mask(24), 0xFF_FFFF);
    assert_eq!(width_mask(63), u64::MAX >> 1);
    assert_eq!(width_mask(64), u64::MAX);
  }

  #[test]
  fn test_iv_space() {
    assert_eq!(CRC32C.iv_space(), Some(1 << 32));
    let crc64 = CrcParams::new("crc-64", 64, 0x1B, 0, true, true, 0);
    assert_eq!(crc64.iv_space(), None);
  }

  #[test]
  fn validate_accepts_catalogue_style_values() {
    assert!(CRC32C.validate().is_ok());
    assert!(CrcParams::new("crc-5-usb", 5, 0x05, 0x1F, true, true, 0x1F).validate().is_ok());
  }

  #[test]
  fn validate_rejects_zero_width() {
    let err = CrcParams::new("zero", 0, 0, 0, false, false, 0).validate().unwrap_err();
    assert!(matches!(
      err,
      CrcError::InvalidParameters {
        issue: ParamIssue::WidthOutOfRange { width: 0 },
        ..
      }
    ));
  }

  #[test]
  fn validate_rejects_oversized_width() {
    let err = CrcParams::new("wide", 65, 0, 0, false, false, 0).validate().unwrap_err();
    assert!(matches!(
      err,
      CrcError::InvalidParameters {
        issue: ParamIssue::WidthOutOfRange { width: 65 },
        ..
      }
    ));
  }

  #[test]
  fn validate_rejects_values_wider_than_register() {
    let poly = CrcParams::new("p", 8, 0x107, 0, false, false, 0).validate().unwrap_err();
    assert!(matches!(
      poly,
      CrcError::InvalidParameters {
        issue: ParamIssue::ValueTooWide { field: "polynomial", .. },
        ..
      }
    ));

    let init = CrcParams::new("i", 16, 0x1021, 0x1_0000, false, false, 0).validate().unwrap_err();
    assert!(matches!(
      init,
      CrcError::InvalidParameters {
        issue: ParamIssue::ValueTooWide { field: "init", .. },
        ..
      }
    ));

    let xor = CrcParams::new("x", 24, 0x864CFB, 0, false, false, 0x100_0000).validate().unwrap_err();
    assert!(matches!(
      xor,
      CrcError::InvalidParameters {
        issue: ParamIssue::ValueTooWide { field: "xor_out", .. },
        ..
      }
    ));
  }
}
