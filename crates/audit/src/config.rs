//! Run configuration.
//!
//! An `acric.toml` file selects algorithms, the seed, trial counts and the
//! exhaustive-run policy. Every field has a default matching the reference
//! scripts, so an empty file (or no file) is a valid configuration.
//!
//! ```toml
//! seed = 42
//! algorithms = ["crc-8", "xmodem"]
//! partitions = 4
//!
//! [linearity]
//! custom_init = "0x1234567890123456"
//!
//! [tamper]
//! trials_per_round = 1_000_000
//!
//! [[algorithm]]
//! name = "crc-10-atm"
//! width = 10
//! polynomial = "0x233"
//! ```
//!
//! Integers may be written as TOML integers or as decimal/`0x` hex strings;
//! 64-bit values above `i64::MAX` need the string form.
//!
//! After parsing, `ACRIC_*` environment variables override a few fields (see
//! [`AuditConfig::apply_env_overrides`]).

use std::{borrow::Cow, path::Path};

use checksum::{CrcParams, CrcValue};
use serde::{Deserialize, Serialize};

pub use crate::error::ConfigError;
use crate::{
  injectivity::{DEFAULT_THRESHOLD_BITS, ExhaustivePolicy},
  linearity::{CUSTOM_TRIALS, DEFAULT_CUSTOM_INIT, DEFAULT_MESSAGE_LENGTH, STANDARD_TRIALS},
  tamper::{DEFAULT_ROUNDS, DEFAULT_TRIALS_PER_ROUND, IvSelection, TamperPlan},
};

/// Environment variable overriding [`AuditConfig::seed`].
pub const ENV_SEED: &str = "ACRIC_SEED";
/// Environment variable overriding [`AuditConfig::partitions`].
pub const ENV_PARTITIONS: &str = "ACRIC_PARTITIONS";
/// Environment variable overriding [`TamperConfig::trials_per_round`].
pub const ENV_TAMPER_TRIALS: &str = "ACRIC_TAMPER_TRIALS";
/// Environment variable overriding [`InjectivityConfig::allow_large`].
pub const ENV_ALLOW_LARGE: &str = "ACRIC_ALLOW_LARGE_EXHAUSTIVE";

/// The three property tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
  Injectivity,
  Linearity,
  Tamper,
}

impl TestKind {
  pub const ALL: [Self; 3] = [Self::Injectivity, Self::Linearity, Self::Tamper];

  /// Parse a test name.
  #[must_use]
  pub fn parse(s: &str) -> Option<Self> {
    match s.to_lowercase().as_str() {
      "injectivity" | "injective" | "iv" => Some(Self::Injectivity),
      "linearity" | "linear" => Some(Self::Linearity),
      "tamper" | "integrity" | "collision" => Some(Self::Tamper),
      _ => None,
    }
  }
}

/// Top-level run configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
  /// Base seed for every generator in the run.
  #[serde(deserialize_with = "int_or_hex::deserialize")]
  pub seed: u64,

  /// Algorithms to test, by registry name. Empty means the whole catalogue
  /// followed by the custom definitions.
  pub algorithms: Vec<String>,

  /// Tests to run, in order.
  pub tests: Vec<TestKind>,

  /// Worker partitions per test. `1` runs the single-stream testers.
  pub partitions: usize,

  /// Evaluate algorithms concurrently.
  pub parallel_algorithms: bool,

  pub injectivity: InjectivityConfig,
  pub linearity: LinearityConfig,
  pub tamper: TamperConfig,

  /// Extra definitions, `[[algorithm]]` tables.
  #[serde(rename = "algorithm")]
  pub custom: Vec<AlgorithmDef>,
}

impl Default for AuditConfig {
  fn default() -> Self {
    Self {
      seed: 42,
      algorithms: Vec::new(),
      tests: TestKind::ALL.to_vec(),
      partitions: 1,
      parallel_algorithms: false,
      injectivity: InjectivityConfig::default(),
      linearity: LinearityConfig::default(),
      tamper: TamperConfig::default(),
      custom: Vec::new(),
    }
  }
}

/// `[injectivity]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InjectivityConfig {
  /// Length of the random fixed message.
  pub message_length: usize,
  /// Explicit fixed message as hex; overrides the random one.
  pub message_hex: Option<String>,
  /// Largest width enumerated exhaustively without opt-in.
  pub threshold_bits: u8,
  /// Enumerate wider algorithms anyway.
  pub allow_large: bool,
  /// When set, widths above the threshold fall back to this many sampled
  /// IVs instead of being skipped.
  pub sample_count: Option<u64>,
}

impl Default for InjectivityConfig {
  fn default() -> Self {
    Self {
      message_length: 4,
      message_hex: None,
      threshold_bits: DEFAULT_THRESHOLD_BITS,
      allow_large: false,
      sample_count: None,
    }
  }
}

impl InjectivityConfig {
  #[must_use]
  pub fn policy(&self) -> ExhaustivePolicy {
    ExhaustivePolicy {
      threshold_bits: self.threshold_bits,
      allow_large: self.allow_large,
    }
  }

  /// Decode [`message_hex`](Self::message_hex), if set.
  ///
  /// # Errors
  ///
  /// [`ConfigError::Validation`] if the string is not an even-length run of
  /// hex digits.
  pub fn fixed_message(&self) -> Result<Option<Vec<u8>>, ConfigError> {
    let Some(text) = self.message_hex.as_deref() else {
      return Ok(None);
    };
    let digits = text.trim();
    let digits = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")).unwrap_or(digits);
    hex::decode(digits)
      .map(Some)
      .map_err(|e| ConfigError::Validation(format!("injectivity.message_hex is not valid hex: `{text}` ({e})")))
  }
}

/// `[linearity]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinearityConfig {
  pub message_length: usize,
  /// Trials under each algorithm's own initialization value.
  pub standard_trials: u64,
  /// Trials under [`custom_init`](Self::custom_init).
  pub custom_trials: u64,
  /// Initialization value shared by all algorithms, masked per width.
  #[serde(deserialize_with = "int_or_hex::deserialize")]
  pub custom_init: CrcValue,
}

impl Default for LinearityConfig {
  fn default() -> Self {
    Self {
      message_length: DEFAULT_MESSAGE_LENGTH,
      standard_trials: STANDARD_TRIALS,
      custom_trials: CUSTOM_TRIALS,
      custom_init: DEFAULT_CUSTOM_INIT,
    }
  }
}

/// `[tamper]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TamperConfig {
  pub rounds: u64,
  pub trials_per_round: u64,
  pub reference_min: usize,
  pub reference_max: usize,
  pub candidate_min: usize,
  pub candidate_max: usize,
  /// Use this IV in every round instead of a random one.
  #[serde(deserialize_with = "int_or_hex::option")]
  pub fixed_iv: Option<CrcValue>,
}

impl Default for TamperConfig {
  fn default() -> Self {
    Self {
      rounds: DEFAULT_ROUNDS,
      trials_per_round: DEFAULT_TRIALS_PER_ROUND,
      reference_min: 1,
      reference_max: 50,
      candidate_min: 1,
      candidate_max: 250,
      fixed_iv: None,
    }
  }
}

impl TamperConfig {
  #[must_use]
  pub fn plan(&self) -> TamperPlan {
    let iv = match self.fixed_iv {
      Some(value) => IvSelection::Fixed(value),
      None => IvSelection::Random,
    };
    TamperPlan::new(self.rounds, self.trials_per_round)
      .with_iv(iv)
      .with_lengths(
        self.reference_min..=self.reference_max,
        self.candidate_min..=self.candidate_max,
      )
  }
}

/// A custom algorithm definition (`[[algorithm]]`).
///
/// `init` uses the register orientation of [`CrcParams::init`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlgorithmDef {
  pub name: String,
  pub width: u8,
  #[serde(deserialize_with = "int_or_hex::deserialize")]
  pub polynomial: u64,
  #[serde(default, deserialize_with = "int_or_hex::deserialize")]
  pub init: u64,
  #[serde(default)]
  pub reflect_in: bool,
  #[serde(default)]
  pub reflect_out: bool,
  #[serde(default, deserialize_with = "int_or_hex::deserialize")]
  pub xor_out: u64,
}

impl AlgorithmDef {
  /// Parameter set for the engine (not validated here).
  #[must_use]
  pub fn to_params(&self) -> CrcParams {
    CrcParams {
      name: Cow::Owned(self.name.clone()),
      width: self.width,
      polynomial: self.polynomial,
      init: self.init,
      reflect_in: self.reflect_in,
      reflect_out: self.reflect_out,
      xor_out: self.xor_out,
    }
  }
}

impl AuditConfig {
  /// Override fields from `ACRIC_*` environment variables.
  ///
  /// Unset, empty or unparsable variables leave the field alone.
  pub fn apply_env_overrides(&mut self) {
    self.apply_overrides(|name| std::env::var(name).ok());
  }

  /// Override fields from an arbitrary variable source.
  pub fn apply_overrides<F>(&mut self, lookup: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    let read = |name: &str| -> Option<String> {
      let value = lookup(name)?;
      let value = value.trim();
      if value.is_empty() {
        return None;
      }
      Some(value.to_string())
    };

    if let Some(seed) = read(ENV_SEED).as_deref().and_then(int_or_hex::parse_u64) {
      self.seed = seed;
    }
    if let Some(partitions) = read(ENV_PARTITIONS).and_then(|v| v.parse::<usize>().ok()) {
      self.partitions = partitions;
    }
    if let Some(trials) = read(ENV_TAMPER_TRIALS).as_deref().and_then(int_or_hex::parse_u64) {
      self.tamper.trials_per_round = trials;
    }
    if let Some(allow) = read(ENV_ALLOW_LARGE).as_deref().and_then(parse_flag) {
      self.injectivity.allow_large = allow;
    }
  }

  /// Check cross-field consistency.
  ///
  /// # Errors
  ///
  /// [`ConfigError::Validation`] naming the first offending field.
  pub fn validate(&self) -> Result<(), ConfigError> {
    fn invalid(msg: impl Into<String>) -> Result<(), ConfigError> {
      Err(ConfigError::Validation(msg.into()))
    }

    if self.partitions == 0 {
      return invalid("partitions must be at least 1");
    }
    if self.tests.is_empty() {
      return invalid("tests must name at least one test");
    }
    if self.injectivity.message_length == 0 && self.injectivity.message_hex.is_none() {
      return invalid("injectivity.message_length must be at least 1");
    }
    self.injectivity.fixed_message()?;
    if self.injectivity.threshold_bits == 0 || self.injectivity.threshold_bits > 64 {
      return invalid("injectivity.threshold_bits must be in 1..=64");
    }
    if self.linearity.message_length == 0 {
      return invalid("linearity.message_length must be at least 1");
    }
    let t = &self.tamper;
    if t.reference_min == 0 || t.reference_min > t.reference_max {
      return invalid("tamper reference length bounds must satisfy 1 <= reference_min <= reference_max");
    }
    if t.candidate_min == 0 || t.candidate_min > t.candidate_max {
      return invalid("tamper candidate length bounds must satisfy 1 <= candidate_min <= candidate_max");
    }
    for def in &self.custom {
      if def.name.trim().is_empty() {
        return invalid("custom algorithm names must not be empty");
      }
      if checksum::catalog::lookup(&def.name).is_some() {
        return invalid(format!("custom algorithm `{}` shadows a catalogue entry", def.name));
      }
      if self.custom.iter().filter(|other| other.name.eq_ignore_ascii_case(&def.name)).count() > 1 {
        return invalid(format!("custom algorithm `{}` is defined more than once", def.name));
      }
    }
    Ok(())
  }
}

/// Loads and validates a configuration file.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read, otherwise as
/// [`load_config_from_str`].
pub fn load_config(path: &Path) -> Result<AuditConfig, ConfigError> {
  let content = std::fs::read_to_string(path)?;
  load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// # Errors
///
/// [`ConfigError::Parse`] for malformed TOML or unknown fields,
/// [`ConfigError::Validation`] for inconsistent values.
pub fn load_config_from_str(content: &str) -> Result<AuditConfig, ConfigError> {
  let config: AuditConfig = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
  config.validate()?;
  Ok(config)
}

fn parse_flag(value: &str) -> Option<bool> {
  if value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes") {
    return Some(true);
  }
  if value == "0" || value.eq_ignore_ascii_case("false") || value.eq_ignore_ascii_case("no") {
    return Some(false);
  }
  None
}

/// Integers written either natively or as decimal / `0x` hex strings.
pub mod int_or_hex {
  use serde::{Deserialize, Deserializer, de::Error};

  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    Int(u64),
    Text(String),
  }

  /// Parse a decimal or `0x` hex integer, ignoring `_` separators.
  #[must_use]
  pub fn parse_u64(text: &str) -> Option<u64> {
    let text = text.trim().replace('_', "");
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
      Some(hex) => u64::from_str_radix(hex, 16).ok(),
      None => text.parse().ok(),
    }
  }

  fn resolve<E: Error>(raw: Raw) -> Result<u64, E> {
    match raw {
      Raw::Int(value) => Ok(value),
      Raw::Text(text) => parse_u64(&text).ok_or_else(|| E::custom(format!("invalid integer `{text}`"))),
    }
  }

  pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    resolve(Raw::deserialize(deserializer)?)
  }

  pub(super) fn option<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    resolve(Raw::deserialize(deserializer)?).map(Some)
  }
}
