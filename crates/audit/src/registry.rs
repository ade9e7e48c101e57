//! Algorithm registry: the built-in catalogue plus custom definitions.

use checksum::{Crc, CrcParams, catalog};

use crate::{config::AlgorithmDef, error::AuditError};

/// Name-keyed source of parameter sets.
#[derive(Clone, Debug, Default)]
pub struct Registry {
  custom: Vec<CrcParams>,
}

impl Registry {
  /// Registry holding only the built-in catalogue.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Catalogue plus the given custom definitions.
  #[must_use]
  pub fn with_custom(defs: &[AlgorithmDef]) -> Self {
    Self {
      custom: defs.iter().map(AlgorithmDef::to_params).collect(),
    }
  }

  /// Every known name: catalogue order, then custom definitions.
  #[must_use]
  pub fn names(&self) -> Vec<String> {
    catalog::names()
      .map(str::to_string)
      .chain(self.custom.iter().map(|p| p.name.to_string()))
      .collect()
  }

  /// Parameter set for `name` (ASCII case-insensitive).
  ///
  /// # Errors
  ///
  /// [`AuditError::AlgorithmUnavailable`] if no definition has that name.
  pub fn get(&self, name: &str) -> Result<&CrcParams, AuditError> {
    if let Some(entry) = catalog::lookup(name) {
      return Ok(&entry.params);
    }
    self
      .custom
      .iter()
      .find(|p| p.name.eq_ignore_ascii_case(name))
      .ok_or_else(|| AuditError::AlgorithmUnavailable(name.to_string()))
  }

  /// Build an engine for `name`.
  ///
  /// # Errors
  ///
  /// [`AuditError::AlgorithmUnavailable`] for unknown names,
  /// [`AuditError::InvalidParameters`] for definitions the engine rejects.
  pub fn engine(&self, name: &str) -> Result<Crc, AuditError> {
    Ok(Crc::new(self.get(name)?.clone())?)
  }

  /// Resolve a selection into engines, keeping failures in place.
  ///
  /// An empty selection means every known algorithm.
  #[must_use]
  pub fn resolve(&self, selection: &[String]) -> Vec<(String, Result<Crc, AuditError>)> {
    let names = if selection.is_empty() {
      self.names()
    } else {
      selection.to_vec()
    };
    names
      .into_iter()
      .map(|name| {
        let crc = self.engine(&name);
        (name, crc)
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn custom(name: &str, init: u64) -> AlgorithmDef {
    AlgorithmDef {
      name: name.to_string(),
      width: 8,
      polynomial: 0x07,
      init,
      reflect_in: false,
      reflect_out: false,
      xor_out: 0,
    }
  }

  #[test]
  fn catalogue_names_come_first() {
    let registry = Registry::with_custom(&[custom("my-crc", 0)]);
    let names = registry.names();
    assert_eq!(names.len(), catalog::ENTRIES.len() + 1);
    assert_eq!(names[0], "crc-8");
    assert_eq!(names.last().map(String::as_str), Some("my-crc"));
  }

  #[test]
  fn lookup_is_case_insensitive() {
    let registry = Registry::with_custom(&[custom("My-CRC", 0)]);
    assert_eq!(registry.get("XMODEM").unwrap().name, "xmodem");
    assert_eq!(registry.get("my-crc").unwrap().name, "My-CRC");
  }

  #[test]
  fn unknown_name_is_unavailable() {
    let err = Registry::new().get("crc-13-nope").unwrap_err();
    assert!(matches!(err, AuditError::AlgorithmUnavailable(name) if name == "crc-13-nope"));
  }

  #[test]
  fn resolve_keeps_failures_in_order() {
    let registry = Registry::with_custom(&[custom("bad-init", 0x1FF)]);
    let resolved = registry.resolve(&["crc-8".to_string(), "missing".to_string(), "bad-init".to_string()]);
    assert_eq!(resolved.len(), 3);
    assert!(resolved[0].1.is_ok());
    assert!(matches!(resolved[1].1, Err(AuditError::AlgorithmUnavailable(_))));
    assert!(matches!(resolved[2].1, Err(AuditError::InvalidParameters(_))));
  }

  #[test]
  fn empty_selection_means_everything() {
    let resolved = Registry::new().resolve(&[]);
    assert_eq!(resolved.len(), catalog::ENTRIES.len());
    assert!(resolved.iter().all(|(_, crc)| crc.is_ok()));
  }
}
