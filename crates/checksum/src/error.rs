//! Error types for CRC configuration.

/// Errors raised before any CRC computation starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrcError {
  /// The parameter set cannot describe a CRC register.
  #[error("invalid parameters for `{name}`: {issue}")]
  InvalidParameters {
    /// Name of the offending parameter set.
    name: String,
    /// What is wrong with it.
    issue: ParamIssue,
  },
}

/// Specific defect in a [`CrcParams`](crate::CrcParams) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParamIssue {
  /// Width is zero or larger than 64 bits.
  #[error("width {width} is outside 1..=64")]
  WidthOutOfRange {
    /// Configured width.
    width: u8,
  },

  /// A configured value has bits set above `width`.
  #[error("{field} {value:#x} does not fit in {width} bits")]
  ValueTooWide {
    /// Field name (`polynomial`, `init` or `xor_out`).
    field: &'static str,
    /// Configured value.
    value: u64,
    /// Configured width.
    width: u8,
  },
}
