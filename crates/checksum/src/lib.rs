//! Parameterizable CRC engine.
//!
//! This crate computes CRCs of any width from 1 to 64 bits, described by a
//! plain [`CrcParams`] record (Rocksoft model), with an optional override of
//! the initialization value on every call.
//!
//! # Components
//!
//! | Item | Role |
//! |------|------|
//! | [`CrcParams`] | Width, polynomial, init, reflection flags, final XOR |
//! | [`catalog`] | 41 published definitions with check values |
//! | [`compute`] | One-shot bitwise computation from a parameter set |
//! | [`Crc`] | Validated, table-driven engine for repeated computation |
//!
//! # Example
//!
//! ```rust
//! use checksum::{Crc, catalog, compute};
//!
//! let params = catalog::XMODEM;
//! assert_eq!(compute(&params, b"123456789", None).unwrap(), 0x31C3);
//!
//! // Same algorithm, different register start.
//! let crc = Crc::new(params).unwrap();
//! let a = crc.checksum_with_init(b"123456789", 0x0001);
//! let b = crc.checksum_with_init(b"123456789", 0x0002);
//! assert_ne!(a, b);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod common;

pub mod catalog;
pub mod engine;
pub mod error;
pub mod params;

pub use common::reference;
pub use engine::{Crc, CrcValue, compute};
pub use error::{CrcError, ParamIssue};
pub use params::{CrcParams, MAX_WIDTH, reflect_bits, width_mask};
