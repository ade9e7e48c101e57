//! Suite runner: every selected test over every selected algorithm.
//!
//! Each algorithm gets its own seed derived from the base seed and its name,
//! so its results do not depend on which other algorithms were selected or
//! on whether algorithms run concurrently.

use std::time::Instant;

use checksum::Crc;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
  config::{AuditConfig, TestKind},
  error::{AuditError, ConfigError},
  injectivity::{test_injectivity, test_injectivity_partitioned, test_injectivity_sampled},
  linearity::{test_linearity, test_linearity_partitioned},
  outcome::{CollisionProbability, InjectivityOutcome, LinearityOutcome},
  registry::Registry,
  sampler::{MessageSampler, seeded, substream, substream_seed},
  tamper::{test_tamper_resistance, test_tamper_resistance_partitioned},
};

/// Sub-stream indices under an algorithm's seed, one per test.
const STREAM_INJECTIVITY: u64 = 0;
const STREAM_LINEARITY_STANDARD: u64 = 1;
const STREAM_LINEARITY_CUSTOM: u64 = 2;
const STREAM_TAMPER: u64 = 3;

/// Stable per-algorithm seed.
#[must_use]
pub fn algorithm_seed(base_seed: u64, name: &str) -> u64 {
  name
    .bytes()
    .map(|b| b.to_ascii_lowercase())
    .fold(base_seed, |acc, b| substream_seed(acc, u64::from(b)))
}

/// A test that ran, or the reason it did not.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus<T> {
  /// The test ran to an outcome.
  Completed(T),
  /// The test was not run, for the given reason.
  Skipped(String),
}

/// Results for one algorithm. Tests that were not selected stay `None`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlgorithmReport {
  pub name: String,
  pub width: Option<u8>,
  /// Why the algorithm could not be tested at all.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub injectivity: Option<TestStatus<InjectivityOutcome>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub linearity_standard: Option<LinearityOutcome>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub linearity_custom: Option<LinearityOutcome>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tamper: Option<CollisionProbability>,
}

impl AlgorithmReport {
  fn unavailable(name: String, err: &AuditError) -> Self {
    Self {
      name,
      width: None,
      error: Some(err.to_string()),
      injectivity: None,
      linearity_standard: None,
      linearity_custom: None,
      tamper: None,
    }
  }

  fn empty(crc: &Crc) -> Self {
    Self {
      name: crc.name().to_string(),
      width: Some(crc.width()),
      error: None,
      injectivity: None,
      linearity_standard: None,
      linearity_custom: None,
      tamper: None,
    }
  }
}

/// Results of a whole run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SuiteReport {
  pub seed: u64,
  pub partitions: usize,
  pub tests: Vec<TestKind>,
  /// Fixed message used by the injectivity test.
  pub injectivity_message: Vec<u8>,
  /// Custom initialization value of the linearity test (before masking).
  pub custom_init: u64,
  pub algorithms: Vec<AlgorithmReport>,
}

impl SuiteReport {
  /// Algorithms found linear under their own initialization value.
  #[must_use]
  pub fn linear_under_standard_init(&self) -> Vec<&str> {
    self.linear_where(|r| r.linearity_standard.as_ref())
  }

  /// Algorithms found linear under the custom initialization value.
  #[must_use]
  pub fn linear_under_custom_init(&self) -> Vec<&str> {
    self.linear_where(|r| r.linearity_custom.as_ref())
  }

  fn linear_where<F>(&self, pick: F) -> Vec<&str>
  where
    F: Fn(&AlgorithmReport) -> Option<&LinearityOutcome>,
  {
    self
      .algorithms
      .iter()
      .filter(|r| pick(r).is_some_and(LinearityOutcome::is_linear))
      .map(|r| r.name.as_str())
      .collect()
  }

  /// Names that could not be tested.
  #[must_use]
  pub fn unavailable(&self) -> Vec<&str> {
    self
      .algorithms
      .iter()
      .filter(|r| r.error.is_some())
      .map(|r| r.name.as_str())
      .collect()
  }
}

/// Runs the selected tests over the selected algorithms.
///
/// # Example
///
/// ```rust
/// use audit::{AuditConfig, Suite, TestKind};
///
/// let mut config = AuditConfig::default();
/// config.tests = vec![TestKind::Linearity];
/// config.linearity.standard_trials = 50;
/// config.linearity.custom_trials = 50;
///
/// let mut suite = Suite::new(config).unwrap();
/// suite.retain_only(&["xmodem".to_string()]);
/// let report = suite.run();
/// assert_eq!(report.linear_under_standard_init(), vec!["xmodem"]);
/// ```
#[derive(Clone, Debug)]
pub struct Suite {
  config: AuditConfig,
  registry: Registry,
  injectivity_message: Vec<u8>,
}

impl Suite {
  /// Build a suite from a configuration.
  ///
  /// # Errors
  ///
  /// [`AuditError::Config`] if the configuration does not validate.
  pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
    config.validate()?;
    let registry = Registry::with_custom(&config.custom);
    let injectivity_message = match config.injectivity.fixed_message()? {
      Some(message) => message,
      None => {
        let mut sampler = MessageSampler::with_capacity(config.injectivity.message_length);
        sampler
          .fill(&mut seeded(config.seed), config.injectivity.message_length)
          .to_vec()
      }
    };
    Ok(Self {
      config,
      registry,
      injectivity_message,
    })
  }

  /// Restrict the run to `names`. An empty list selects everything.
  pub fn retain_only(&mut self, names: &[String]) {
    self.config.algorithms = names.to_vec();
  }

  /// Restrict the run to `tests`.
  ///
  /// # Errors
  ///
  /// [`AuditError::Config`] if `tests` is empty.
  pub fn select_tests(&mut self, tests: &[TestKind]) -> Result<(), AuditError> {
    if tests.is_empty() {
      return Err(ConfigError::Validation("tests must name at least one test".to_string()).into());
    }
    self.config.tests = tests.to_vec();
    Ok(())
  }

  #[must_use]
  pub fn injectivity_message(&self) -> &[u8] {
    &self.injectivity_message
  }

  /// Run every selected test. Unknown or invalid algorithms are logged,
  /// recorded in the report and skipped.
  #[must_use]
  pub fn run(&self) -> SuiteReport {
    let resolved = self.registry.resolve(&self.config.algorithms);
    info!(
      algorithms = resolved.len(),
      seed = self.config.seed,
      partitions = self.config.partitions,
      parallel = self.config.parallel_algorithms,
      "starting audit"
    );

    let audit_one = |(name, crc): &(String, Result<Crc, AuditError>)| match crc {
      Ok(crc) => self.run_algorithm(crc),
      Err(err) => {
        warn!(algorithm = %name, error = %err, "skipping algorithm");
        AlgorithmReport::unavailable(name.clone(), err)
      }
    };

    let algorithms: Vec<AlgorithmReport> = if self.config.parallel_algorithms {
      resolved.par_iter().map(audit_one).collect()
    } else {
      resolved.iter().map(audit_one).collect()
    };

    SuiteReport {
      seed: self.config.seed,
      partitions: self.config.partitions,
      tests: self.config.tests.clone(),
      injectivity_message: self.injectivity_message.clone(),
      custom_init: self.config.linearity.custom_init,
      algorithms,
    }
  }

  /// Run every selected test on one engine.
  #[must_use]
  pub fn run_algorithm(&self, crc: &Crc) -> AlgorithmReport {
    let seed = algorithm_seed(self.config.seed, crc.name());
    let started = Instant::now();
    info!(algorithm = crc.name(), width = crc.width(), "auditing algorithm");

    let mut report = AlgorithmReport::empty(crc);
    for test in &self.config.tests {
      match test {
        TestKind::Injectivity => report.injectivity = Some(self.injectivity(crc, seed)),
        TestKind::Linearity => {
          let (standard, custom) = self.linearity(crc, seed);
          report.linearity_standard = Some(standard);
          report.linearity_custom = Some(custom);
        }
        TestKind::Tamper => report.tamper = Some(self.tamper(crc, seed)),
      }
    }

    debug!(
      algorithm = crc.name(),
      elapsed_ms = started.elapsed().as_millis() as u64,
      "algorithm finished"
    );
    report
  }

  fn injectivity(&self, crc: &Crc, seed: u64) -> TestStatus<InjectivityOutcome> {
    let cfg = &self.config.injectivity;
    let policy = cfg.policy();
    let message = &self.injectivity_message;

    let outcome = if self.config.partitions > 1 {
      test_injectivity_partitioned(crc, message, &policy, self.config.partitions)
    } else {
      test_injectivity(crc, message, &policy)
    };

    match (outcome, cfg.sample_count) {
      (Ok(outcome), _) => {
        info!(algorithm = crc.name(), %outcome, "injectivity");
        TestStatus::Completed(outcome)
      }
      (Err(AuditError::ExhaustiveRangeTooLarge { .. }), Some(samples)) => {
        let mut rng = substream(seed, STREAM_INJECTIVITY);
        let outcome = test_injectivity_sampled(crc, message, samples, &mut rng);
        info!(algorithm = crc.name(), %outcome, "injectivity (sampled)");
        TestStatus::Completed(outcome)
      }
      (Err(err), _) => {
        warn!(algorithm = crc.name(), error = %err, "injectivity skipped");
        TestStatus::Skipped(err.to_string())
      }
    }
  }

  fn linearity(&self, crc: &Crc, seed: u64) -> (LinearityOutcome, LinearityOutcome) {
    let cfg = &self.config.linearity;
    let partitions = self.config.partitions;
    let runs = [
      (crc.params().init, cfg.standard_trials, STREAM_LINEARITY_STANDARD),
      (cfg.custom_init, cfg.custom_trials, STREAM_LINEARITY_CUSTOM),
    ];

    let [standard, custom] = runs.map(|(init, trials, stream)| {
      if partitions > 1 {
        test_linearity_partitioned(
          crc,
          init,
          cfg.message_length,
          trials,
          substream_seed(seed, stream),
          partitions,
        )
      } else {
        test_linearity(crc, init, cfg.message_length, trials, &mut substream(seed, stream))
      }
    });

    info!(algorithm = crc.name(), %standard, %custom, "linearity");
    (standard, custom)
  }

  fn tamper(&self, crc: &Crc, seed: u64) -> CollisionProbability {
    let plan = self.config.tamper.plan();
    let result = if self.config.partitions > 1 {
      test_tamper_resistance_partitioned(crc, &plan, substream_seed(seed, STREAM_TAMPER), self.config.partitions)
    } else {
      test_tamper_resistance(crc, &plan, &mut substream(seed, STREAM_TAMPER))
    };
    info!(
      algorithm = crc.name(),
      collisions = result.collisions,
      trials = result.trials,
      probability = result.probability(),
      "tamper resistance"
    );
    result
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn quick_config() -> AuditConfig {
    let mut config = AuditConfig::default();
    config.linearity.standard_trials = 100;
    config.linearity.custom_trials = 100;
    config.tamper.rounds = 2;
    config.tamper.trials_per_round = 2_000;
    config
  }

  #[test]
  fn algorithm_seed_is_case_insensitive_and_name_dependent() {
    assert_eq!(algorithm_seed(42, "CRC-8"), algorithm_seed(42, "crc-8"));
    assert_ne!(algorithm_seed(42, "crc-8"), algorithm_seed(42, "crc-16"));
    assert_ne!(algorithm_seed(42, "crc-8"), algorithm_seed(43, "crc-8"));
  }

  #[test]
  fn injectivity_message_is_seeded() {
    let a = Suite::new(quick_config()).unwrap();
    let b = Suite::new(quick_config()).unwrap();
    assert_eq!(a.injectivity_message().len(), 4);
    assert_eq!(a.injectivity_message(), b.injectivity_message());
  }

  #[test]
  fn fixed_injectivity_message_wins() {
    let mut config = quick_config();
    config.injectivity.message_hex = Some("0102".to_string());
    let suite = Suite::new(config).unwrap();
    assert_eq!(suite.injectivity_message(), &[1, 2]);
  }

  #[test]
  fn unknown_algorithms_are_reported_not_fatal() {
    let mut suite = Suite::new(quick_config()).unwrap();
    suite.retain_only(&["crc-8".to_string(), "crc-99".to_string()]);
    let report = suite.run();
    assert_eq!(report.algorithms.len(), 2);
    assert!(report.algorithms[0].error.is_none());
    assert_eq!(report.unavailable(), vec!["crc-99"]);
  }

  #[test]
  fn wide_algorithms_skip_injectivity_without_sampling() {
    let mut suite = Suite::new(quick_config()).unwrap();
    suite.retain_only(&["crc-32".to_string()]);
    suite.select_tests(&[TestKind::Injectivity]).unwrap();
    let report = suite.run();
    assert!(matches!(report.algorithms[0].injectivity, Some(TestStatus::Skipped(_))));
    assert!(report.algorithms[0].linearity_standard.is_none());
  }

  #[test]
  fn wide_algorithms_fall_back_to_sampling() {
    let mut config = quick_config();
    config.injectivity.sample_count = Some(1_000);
    let mut suite = Suite::new(config).unwrap();
    suite.retain_only(&["crc-64".to_string()]);
    suite.select_tests(&[TestKind::Injectivity]).unwrap();
    let report = suite.run();
    assert_eq!(
      report.algorithms[0].injectivity,
      Some(TestStatus::Completed(InjectivityOutcome::NoCollisionInSamples { samples: 1_000 }))
    );
  }

  #[test]
  fn selecting_no_tests_is_rejected() {
    let mut suite = Suite::new(quick_config()).unwrap();
    assert!(matches!(suite.select_tests(&[]), Err(AuditError::Config(_))));
  }

  #[test]
  fn parallel_and_sequential_algorithm_runs_agree() {
    let names: Vec<String> = ["crc-8", "crc-8-itu", "xmodem", "kermit"].map(String::from).to_vec();

    let mut sequential = Suite::new(quick_config()).unwrap();
    sequential.retain_only(&names);

    let mut config = quick_config();
    config.parallel_algorithms = true;
    let mut parallel = Suite::new(config).unwrap();
    parallel.retain_only(&names);

    assert_eq!(sequential.run(), parallel.run());
  }

  #[test]
  fn results_do_not_depend_on_selection() {
    let mut alone = Suite::new(quick_config()).unwrap();
    alone.retain_only(&["kermit".to_string()]);
    let mut together = Suite::new(quick_config()).unwrap();
    together.retain_only(&["xmodem".to_string(), "kermit".to_string()]);

    assert_eq!(alone.run().algorithms[0], together.run().algorithms[1]);
  }

  #[test]
  fn linear_lists_follow_outcomes() {
    let mut suite = Suite::new(quick_config()).unwrap();
    suite.retain_only(&["xmodem".to_string(), "crc-16-usb".to_string()]);
    suite.select_tests(&[TestKind::Linearity]).unwrap();
    let report = suite.run();
    assert_eq!(report.linear_under_standard_init(), vec!["xmodem"]);
    assert!(report.linear_under_custom_init().is_empty());
  }
}
