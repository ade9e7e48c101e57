//! Common utilities for CRC computation.
//!
//! This module provides:
//! - The bitwise reference implementation (test oracle and one-shot path)
//! - Const-fn lookup table generation for the table-driven engine

pub mod reference;
pub mod tables;

mod proptests;
