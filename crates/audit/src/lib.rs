//! Empirical property testers for CRCs with a variable initialization value.
//!
//! Three questions are asked of each algorithm:
//!
//! | Test | Method | Outcome |
//! |------|--------|---------|
//! | Injectivity in IV | Exhaustive over `[0, 2^width)` (sampled above a threshold) | [`InjectivityOutcome`] |
//! | XOR linearity | Monte Carlo over random message pairs | [`LinearityOutcome`] |
//! | Tamper resistance | Monte Carlo collision rate against a reference message | [`CollisionProbability`] |
//!
//! Testers take a [`checksum::Crc`] and an explicitly owned generator; the
//! `*_partitioned` variants spread work over rayon with one sub-stream per
//! partition. [`Suite`] drives all three over a registry according to an
//! [`AuditConfig`], and [`Report`] renders the results.
//!
//! # Example
//!
//! ```rust
//! use audit::{InjectivityOutcome, injectivity::{ExhaustivePolicy, test_injectivity}};
//! use checksum::{Crc, catalog};
//!
//! let crc = Crc::new(catalog::CRC_8).unwrap();
//! let outcome = test_injectivity(&crc, b"\x01\x02\x03\x04", &ExhaustivePolicy::default()).unwrap();
//! assert_eq!(outcome, InjectivityOutcome::Injective);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod injectivity;
pub mod linearity;
pub mod outcome;
pub mod partition;
pub mod registry;
pub mod report;
pub mod sampler;
pub mod stats;
pub mod suite;
pub mod tamper;

pub use config::{AuditConfig, TestKind, load_config, load_config_from_str};
pub use error::{AuditError, ConfigError};
pub use outcome::{CollisionProbability, InjectivityOutcome, LinearityOutcome};
pub use registry::Registry;
pub use report::{OutputFormat, Report};
pub use suite::{AlgorithmReport, Suite, SuiteReport, TestStatus};
pub use tamper::{IvSelection, TamperPlan};
