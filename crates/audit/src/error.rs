//! Error types for the property testers and their configuration.

use checksum::CrcError;

/// Errors raised while resolving algorithms or running a tester.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
  /// The registry has no definition under this name.
  #[error("algorithm `{0}` is not available")]
  AlgorithmUnavailable(String),

  /// The parameter set was rejected by the engine.
  #[error(transparent)]
  InvalidParameters(#[from] CrcError),

  /// Exhaustive enumeration was requested over a width above the safety
  /// threshold without the explicit opt-in.
  #[error("exhaustive enumeration over {width} bits exceeds the {threshold}-bit limit (opt in to run it anyway)")]
  ExhaustiveRangeTooLarge {
    /// Width of the requested algorithm.
    width: u8,
    /// Largest width allowed without opt-in.
    threshold: u8,
  },

  /// The run configuration could not be loaded.
  #[error(transparent)]
  Config(#[from] ConfigError),
}

/// Errors that can occur when loading or validating a run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The configuration file could not be read.
  #[error("failed to read configuration: {0}")]
  Io(#[from] std::io::Error),

  /// The TOML content could not be parsed.
  #[error("failed to parse configuration: {0}")]
  Parse(String),

  /// A configuration value failed validation.
  #[error("invalid configuration: {0}")]
  Validation(String),
}

#[cfg(test)]
mod tests {
  use checksum::ParamIssue;

  use super::*;

  #[test]
  fn display_unavailable() {
    let err = AuditError::AlgorithmUnavailable("crc-99".to_string());
    assert_eq!(err.to_string(), "algorithm `crc-99` is not available");
  }

  #[test]
  fn display_exhaustive_refusal() {
    let err = AuditError::ExhaustiveRangeTooLarge {
      width: 32,
      threshold: 24,
    };
    assert_eq!(
      err.to_string(),
      "exhaustive enumeration over 32 bits exceeds the 24-bit limit (opt in to run it anyway)"
    );
  }

  #[test]
  fn engine_errors_pass_through() {
    let crc_err = CrcError::InvalidParameters {
      name: "bad".to_string(),
      issue: ParamIssue::WidthOutOfRange { width: 0 },
    };
    let err = AuditError::from(crc_err.clone());
    assert_eq!(err.to_string(), crc_err.to_string());
  }

  #[test]
  fn display_config_validation() {
    let err = AuditError::from(ConfigError::Validation("partitions must be at least 1".to_string()));
    assert_eq!(err.to_string(), "invalid configuration: partitions must be at least 1");
  }
}
