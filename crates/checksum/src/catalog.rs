//! Catalogue of published CRC definitions.
//!
//! The registry the auditor iterates by default: 41 definitions keyed by
//! name, each with its published check value for the ASCII string
//! `"123456789"`. Entries are plain [`CrcParams`] data consumed by the shared
//! engine.
//!
//! # Initialization Values
//!
//! `init` is the register value loaded before the first byte, in the
//! processing orientation (see [`CrcParams`]). For definitions whose final
//! XOR is applied on top of an all-ones register (CRC-32, X-25, ...), the
//! register starts from all ones and `xor_out` carries the inversion.
//!
//! | Width | Entries |
//! |-------|---------|
//! | 8 | `crc-8` … `crc-8-wcdma` (7) |
//! | 16 | `crc-16` … `crc-aug-ccitt` (19) |
//! | 24 | `crc-24`, `crc-24-flexray-a`, `crc-24-flexray-b` |
//! | 32 | `crc-32` … `xfer` (9) |
//! | 64 | `crc-64`, `crc-64-we`, `crc-64-jones` |

pub use crate::common::reference::CHECK_INPUT;
use crate::params::CrcParams;

/// A catalogue definition and its published check value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
  /// Algorithm parameters.
  pub params: CrcParams,
  /// CRC of [`CHECK_INPUT`] under the default initialization.
  pub check: u64,
}

impl CatalogEntry {
  const fn new(params: CrcParams, check: u64) -> Self {
    Self { params, check }
  }

  /// Registry key.
  #[inline]
  #[must_use]
  pub fn name(&self) -> &str {
    &self.params.name
  }
}

/// Look up a catalogue entry by name (ASCII case-insensitive).
#[must_use]
pub fn lookup(name: &str) -> Option<&'static CatalogEntry> {
  ENTRIES.iter().find(|entry| entry.name().eq_ignore_ascii_case(name))
}

/// Names of every catalogue entry, in catalogue order.
pub fn names() -> impl Iterator<Item = &'static str> {
  ENTRIES.iter().map(|entry| entry.name())
}

// ─────────────────────────────────────────────────────────────────────────────
// Definitions
// ─────────────────────────────────────────────────────────────────────────────

/// SMBus, ATM HEC.
pub const CRC_8: CrcParams = CrcParams::new("crc-8", 8, 0x07, 0x00, false, false, 0x00);

/// Data Radio Channel.
pub const CRC_8_DARC: CrcParams = CrcParams::new("crc-8-darc", 8, 0x39, 0x00, true, true, 0x00);

/// Philips I-CODE RFID.
pub const CRC_8_I_CODE: CrcParams = CrcParams::new("crc-8-i-code", 8, 0x1D, 0xFD, false, false, 0x00);

/// ITU-T I.432.1.
pub const CRC_8_ITU: CrcParams = CrcParams::new("crc-8-itu", 8, 0x07, 0x00, false, false, 0x55);

/// 1-Wire, iButton.
pub const CRC_8_MAXIM: CrcParams = CrcParams::new("crc-8-maxim", 8, 0x31, 0x00, true, true, 0x00);

/// RFC 3095 header compression.
pub const CRC_8_ROHC: CrcParams = CrcParams::new("crc-8-rohc", 8, 0x07, 0xFF, true, true, 0x00);

/// 3GPP WCDMA.
pub const CRC_8_WCDMA: CrcParams = CrcParams::new("crc-8-wcdma", 8, 0x9B, 0x00, true, true, 0x00);

/// ARC, LHA.
pub const CRC_16: CrcParams = CrcParams::new("crc-16", 16, 0x8005, 0x0000, true, true, 0x0000);

/// UMTS, Verifone.
pub const CRC_16_BUYPASS: CrcParams = CrcParams::new("crc-16-buypass", 16, 0x8005, 0x0000, false, false, 0x0000);

/// ELV DDS 110.
pub const CRC_16_DDS_110: CrcParams = CrcParams::new("crc-16-dds-110", 16, 0x8005, 0x800D, false, false, 0x0000);

/// DECT R-CRC.
pub const CRC_16_DECT: CrcParams = CrcParams::new("crc-16-dect", 16, 0x0589, 0x0000, false, false, 0x0001);

/// DNP 3.0.
pub const CRC_16_DNP: CrcParams = CrcParams::new("crc-16-dnp", 16, 0x3D65, 0x0000, true, true, 0xFFFF);

/// Wireless M-Bus.
pub const CRC_16_EN_13757: CrcParams = CrcParams::new("crc-16-en-13757", 16, 0x3D65, 0x0000, false, false, 0xFFFF);

/// Grundfos GENIbus, EPC RFID.
pub const CRC_16_GENIBUS: CrcParams = CrcParams::new("crc-16-genibus", 16, 0x1021, 0xFFFF, false, false, 0xFFFF);

/// 1-Wire 16-bit.
pub const CRC_16_MAXIM: CrcParams = CrcParams::new("crc-16-maxim", 16, 0x8005, 0x0000, true, true, 0xFFFF);

/// Microchip MCRF4xx RFID.
pub const CRC_16_MCRF4XX: CrcParams = CrcParams::new("crc-16-mcrf4xx", 16, 0x1021, 0xFFFF, true, true, 0x0000);

/// Riello UPS.
pub const CRC_16_RIELLO: CrcParams = CrcParams::new("crc-16-riello", 16, 0x1021, 0x554D, true, true, 0x0000);

/// SCSI T10 data integrity field.
pub const CRC_16_T10_DIF: CrcParams = CrcParams::new("crc-16-t10-dif", 16, 0x8BB7, 0x0000, false, false, 0x0000);

/// Teledisk disk images.
pub const CRC_16_TELEDISK: CrcParams = CrcParams::new("crc-16-teledisk", 16, 0xA097, 0x0000, false, false, 0x0000);

/// USB data packets.
pub const CRC_16_USB: CrcParams = CrcParams::new("crc-16-usb", 16, 0x8005, 0xFFFF, true, true, 0xFFFF);

/// X.25, HDLC, IrDA.
pub const X_25: CrcParams = CrcParams::new("x-25", 16, 0x1021, 0xFFFF, true, true, 0xFFFF);

/// XMODEM, Bluetooth ACL.
pub const XMODEM: CrcParams = CrcParams::new("xmodem", 16, 0x1021, 0x0000, false, false, 0x0000);

/// Modbus RTU.
pub const MODBUS: CrcParams = CrcParams::new("modbus", 16, 0x8005, 0xFFFF, true, true, 0x0000);

/// Kermit, Bluetooth.
pub const KERMIT: CrcParams = CrcParams::new("kermit", 16, 0x1021, 0x0000, true, true, 0x0000);

/// IBM 3740, AUTOSAR.
pub const CRC_CCITT_FALSE: CrcParams = CrcParams::new("crc-ccitt-false", 16, 0x1021, 0xFFFF, false, false, 0x0000);

/// Fujitsu SPI.
pub const CRC_AUG_CCITT: CrcParams = CrcParams::new("crc-aug-ccitt", 16, 0x1021, 0x1D0F, false, false, 0x0000);

/// OpenPGP armor.
pub const CRC_24: CrcParams = CrcParams::new("crc-24", 24, 0x86_4CFB, 0xB7_04CE, false, false, 0x00_0000);

/// FlexRay channel A.
pub const CRC_24_FLEXRAY_A: CrcParams =
  CrcParams::new("crc-24-flexray-a", 24, 0x5D_6DCB, 0xFE_DCBA, false, false, 0x00_0000);

/// FlexRay channel B.
pub const CRC_24_FLEXRAY_B: CrcParams =
  CrcParams::new("crc-24-flexray-b", 24, 0x5D_6DCB, 0xAB_CDEF, false, false, 0x00_0000);

/// Ethernet, gzip, PNG, zip.
pub const CRC_32: CrcParams = CrcParams::new("crc-32", 32, 0x04C1_1DB7, 0xFFFF_FFFF, true, true, 0xFFFF_FFFF);

/// bzip2, AAL5.
pub const CRC_32_BZIP2: CrcParams =
  CrcParams::new("crc-32-bzip2", 32, 0x04C1_1DB7, 0xFFFF_FFFF, false, false, 0xFFFF_FFFF);

/// iSCSI, SCTP, ext4.
pub const CRC_32C: CrcParams = CrcParams::new("crc-32c", 32, 0x1EDC_6F41, 0xFFFF_FFFF, true, true, 0xFFFF_FFFF);

/// BASE91-D.
pub const CRC_32D: CrcParams = CrcParams::new("crc-32d", 32, 0xA833_982B, 0xFFFF_FFFF, true, true, 0xFFFF_FFFF);

/// MPEG-2 transport streams.
pub const CRC_32_MPEG: CrcParams =
  CrcParams::new("crc-32-mpeg", 32, 0x04C1_1DB7, 0xFFFF_FFFF, false, false, 0x0000_0000);

/// POSIX cksum (without length suffix).
pub const POSIX: CrcParams = CrcParams::new("posix", 32, 0x04C1_1DB7, 0x0000_0000, false, false, 0xFFFF_FFFF);

/// AIXM aeronautical data.
pub const CRC_32Q: CrcParams = CrcParams::new("crc-32q", 32, 0x8141_41AB, 0x0000_0000, false, false, 0x0000_0000);

/// Altera MegaCore.
pub const JAMCRC: CrcParams = CrcParams::new("jamcrc", 32, 0x04C1_1DB7, 0xFFFF_FFFF, true, true, 0x0000_0000);

/// XFER.
pub const XFER: CrcParams = CrcParams::new("xfer", 32, 0x0000_00AF, 0x0000_0000, false, false, 0x0000_0000);

/// ISO 3309 (crcmod variant, zero init).
pub const CRC_64: CrcParams =
  CrcParams::new("crc-64", 64, 0x0000_0000_0000_001B, 0x0000_0000_0000_0000, true, true, 0x0000_0000_0000_0000);

/// ECMA-182 (Wolfgang Ehrhardt).
pub const CRC_64_WE: CrcParams =
  CrcParams::new("crc-64-we", 64, 0x42F0_E1EB_A9EA_3693, 0xFFFF_FFFF_FFFF_FFFF, false, false, 0xFFFF_FFFF_FFFF_FFFF);

/// Jones polynomial, all-ones init.
pub const CRC_64_JONES: CrcParams =
  CrcParams::new("crc-64-jones", 64, 0xAD93_D235_94C9_35A9, 0xFFFF_FFFF_FFFF_FFFF, true, true, 0x0000_0000_0000_0000);

pub static ENTRIES: &[CatalogEntry] = &[
  CatalogEntry::new(CRC_8, 0xF4),
  CatalogEntry::new(CRC_8_DARC, 0x15),
  CatalogEntry::new(CRC_8_I_CODE, 0x7E),
  CatalogEntry::new(CRC_8_ITU, 0xA1),
  CatalogEntry::new(CRC_8_MAXIM, 0xA1),
  CatalogEntry::new(CRC_8_ROHC, 0xD0),
  CatalogEntry::new(CRC_8_WCDMA, 0x25),
  CatalogEntry::new(CRC_16, 0xBB3D),
  CatalogEntry::new(CRC_16_BUYPASS, 0xFEE8),
  CatalogEntry::new(CRC_16_DDS_110, 0x9ECF),
  CatalogEntry::new(CRC_16_DECT, 0x007E),
  CatalogEntry::new(CRC_16_DNP, 0xEA82),
  CatalogEntry::new(CRC_16_EN_13757, 0xC2B7),
  CatalogEntry::new(CRC_16_GENIBUS, 0xD64E),
  CatalogEntry::new(CRC_16_MAXIM, 0x44C2),
  CatalogEntry::new(CRC_16_MCRF4XX, 0x6F91),
  CatalogEntry::new(CRC_16_RIELLO, 0x63D0),
  CatalogEntry::new(CRC_16_T10_DIF, 0xD0DB),
  CatalogEntry::new(CRC_16_TELEDISK, 0x0FB3),
  CatalogEntry::new(CRC_16_USB, 0xB4C8),
  CatalogEntry::new(X_25, 0x906E),
  CatalogEntry::new(XMODEM, 0x31C3),
  CatalogEntry::new(MODBUS, 0x4B37),
  CatalogEntry::new(KERMIT, 0x2189),
  CatalogEntry::new(CRC_CCITT_FALSE, 0x29B1),
  CatalogEntry::new(CRC_AUG_CCITT, 0xE5CC),
  CatalogEntry::new(CRC_24, 0x21_CF02),
  CatalogEntry::new(CRC_24_FLEXRAY_A, 0x79_79BD),
  CatalogEntry::new(CRC_24_FLEXRAY_B, 0x1F_23B8),
  CatalogEntry::new(CRC_32, 0xCBF4_3926),
  CatalogEntry::new(CRC_32_BZIP2, 0xFC89_1918),
  CatalogEntry::new(CRC_32C, 0xE306_9283),
  CatalogEntry::new(CRC_32D, 0x8731_5576),
  CatalogEntry::new(CRC_32_MPEG, 0x0376_E6E7),
  CatalogEntry::new(POSIX, 0x765E_7680),
  CatalogEntry::new(CRC_32Q, 0x3010_BF7F),
  CatalogEntry::new(JAMCRC, 0x340B_C6D9),
  CatalogEntry::new(XFER, 0xBD0B_E338),
  CatalogEntry::new(CRC_64, 0x46A5_A938_8A5B_EFFE),
  CatalogEntry::new(CRC_64_WE, 0x62EC_59E3_F1A4_F00A),
  CatalogEntry::new(CRC_64_JONES, 0xCAA7_1716_8609_F281),
];

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;
  use crate::engine::compute;

  #[test]
  fn catalogue_has_every_audited_algorithm() {
    assert_eq!(ENTRIES.len(), 41);
    let widths: Vec<u8> = ENTRIES.iter().map(|e| e.params.width).collect();
    assert_eq!(widths.iter().filter(|&&w| w == 8).count(), 7);
    assert_eq!(widths.iter().filter(|&&w| w == 16).count(), 19);
    assert_eq!(widths.iter().filter(|&&w| w == 24).count(), 3);
    assert_eq!(widths.iter().filter(|&&w| w == 32).count(), 9);
    assert_eq!(widths.iter().filter(|&&w| w == 64).count(), 3);
  }

  #[test]
  fn names_are_unique() {
    let unique: HashSet<&str> = names().collect();
    assert_eq!(unique.len(), ENTRIES.len());
  }

  #[test]
  fn every_entry_is_valid() {
    for entry in ENTRIES {
      entry
        .params
        .validate()
        .unwrap_or_else(|err| panic!("{} failed validation: {err}", entry.name()));
    }
  }

  #[test]
  fn bitwise_reference_matches_check_values() {
    for entry in ENTRIES {
      let got = compute(&entry.params, CHECK_INPUT, None).unwrap();
      assert_eq!(got, entry.check, "{}: got {got:#x}, want {:#x}", entry.name(), entry.check);
    }
  }

  #[test]
  fn empty_message_reports_init_xor_xorout() {
    for entry in ENTRIES {
      let p = &entry.params;
      let got = compute(p, b"", None).unwrap();
      assert_eq!(got, (p.init ^ p.xor_out) & p.mask(), "{}", entry.name());
    }
  }

  #[test]
  fn lookup_is_case_insensitive() {
    assert_eq!(lookup("crc-32c").map(CatalogEntry::name), Some("crc-32c"));
    assert_eq!(lookup("XMODEM").map(CatalogEntry::name), Some("xmodem"));
    assert!(lookup("crc-31-imaginary").is_none());
  }
}
