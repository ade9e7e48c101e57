//! Const-fn CRC lookup table generation for any width up to 64 bits.
//!
//! Both tables hold one entry per possible input byte. They are built at
//! engine construction (or at compile time for fixed parameters) and shared
//! by every computation with the same polynomial.
//!
//! # Register Layout
//!
//! | Processing | Register | Polynomial | Table entry |
//! |------------|----------|------------|-------------|
//! | MSB-first (`reflect_in = false`) | left-aligned in `u64` | `poly << (64 - width)` | 8 shifts of `index << 56` |
//! | LSB-first (`reflect_in = true`) | right-aligned in `u64` | reflected over `width` | 8 shifts of `index` |
//!
//! Left-aligning the MSB-first register lets a single table serve every
//! width, including widths below 8.

// SAFETY: All array indexing in this module uses bounded loop indices (0..256).
// Clippy cannot prove this in const fn contexts, but bounds are statically guaranteed.
#![allow(clippy::indexing_slicing)]

/// Number of entries in a byte-indexed table.
pub const TABLE_LEN: usize = 256;

// ─────────────────────────────────────────────────────────────────────────────
// MSB-first (normal) tables
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a single MSB-first table entry.
///
/// # Arguments
///
/// * `poly_aligned` - Polynomial shifted to the top of a `u64` (`poly << (64 - width)`)
/// * `index` - Byte value already combined with the register's top byte
#[must_use]
pub const fn normal_table_entry(poly_aligned: u64, index: u8) -> u64 {
  let mut crc = (index as u64) << 56;
  let mut i = 0;
  while i < 8 {
    crc = if crc & (1u64 << 63) != 0 {
      (crc << 1) ^ poly_aligned
    } else {
      crc << 1
    };
    i += 1;
  }
  crc
}

/// Generate the MSB-first table for a `width`-bit polynomial.
///
/// `width` must be in `1..=64`.
#[must_use]
pub const fn normal_table(poly: u64, width: u8) -> [u64; TABLE_LEN] {
  let poly_aligned = poly << (64 - width as u32);
  let mut table = [0u64; TABLE_LEN];
  let mut i = 0usize;
  while i < TABLE_LEN {
    table[i] = normal_table_entry(poly_aligned, i as u8);
    i += 1;
  }
  table
}

// ─────────────────────────────────────────────────────────────────────────────
// LSB-first (reflected) tables
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a single LSB-first table entry.
///
/// Uses bit-by-bit computation with the reflected polynomial.
#[must_use]
pub const fn reflected_table_entry(poly_reflected: u64, index: u8) -> u64 {
  let mut crc = index as u64;
  let mut i = 0;
  while i < 8 {
    crc = if crc & 1 != 0 {
      (crc >> 1) ^ poly_reflected
    } else {
      crc >> 1
    };
    i += 1;
  }
  crc
}

/// Generate the LSB-first table for an already reflected polynomial.
#[must_use]
pub const fn reflected_table(poly_reflected: u64) -> [u64; TABLE_LEN] {
  let mut table = [0u64; TABLE_LEN];
  let mut i = 0usize;
  while i < TABLE_LEN {
    table[i] = reflected_table_entry(poly_reflected, i as u8);
    i += 1;
  }
  table
}
