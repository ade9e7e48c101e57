//! Output formatters for audit results.
//!
//! - [`OutputFormat::Summary`]: Human-readable summary (default)
//! - [`OutputFormat::Json`]: JSON for programmatic use
//! - [`OutputFormat::Tsv`]: Tab-separated values, one row per algorithm

use std::io::{self, Write};

use checksum::width_mask;

use crate::{
  outcome::InjectivityOutcome,
  stats::{DEFAULT_TOLERANCE, Z_95, within_tolerance},
  suite::{AlgorithmReport, SuiteReport, TestStatus},
};

/// Output format for audit results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
  /// Human-readable summary (default).
  #[default]
  Summary,

  /// JSON format for programmatic use.
  Json,

  /// Tab-separated values.
  Tsv,
}

impl OutputFormat {
  /// Parse format from string.
  #[must_use]
  pub fn parse(s: &str) -> Option<Self> {
    match s.to_lowercase().as_str() {
      "summary" | "text" | "human" => Some(Self::Summary),
      "json" => Some(Self::Json),
      "tsv" | "tab" => Some(Self::Tsv),
      _ => None,
    }
  }
}

/// Report generator for audit results.
pub struct Report<W: Write> {
  writer: W,
  format: OutputFormat,
}

impl<W: Write> Report<W> {
  /// Create a new report generator.
  pub fn new(writer: W, format: OutputFormat) -> Self {
    Self { writer, format }
  }

  /// Write the complete results.
  pub fn write(&mut self, report: &SuiteReport) -> io::Result<()> {
    match self.format {
      OutputFormat::Summary => self.write_summary(report),
      OutputFormat::Json => self.write_json(report),
      OutputFormat::Tsv => self.write_tsv(report),
    }
  }

  /// Consume the report and return the writer.
  pub fn into_inner(self) -> W {
    self.writer
  }

  fn write_summary(&mut self, report: &SuiteReport) -> io::Result<()> {
    writeln!(self.writer, "ACRIC CRC Property Audit")?;
    writeln!(self.writer, "========================")?;
    writeln!(self.writer)?;
    writeln!(self.writer, "Seed: {}", report.seed)?;
    writeln!(self.writer, "Partitions: {}", report.partitions)?;
    writeln!(self.writer, "Injectivity message: {}", hex::encode_upper(&report.injectivity_message))?;
    writeln!(self.writer)?;

    for algo in &report.algorithms {
      self.write_algorithm_summary(algo, report.custom_init)?;
      writeln!(self.writer)?;
    }

    if report.algorithms.iter().any(|a| a.linearity_standard.is_some()) {
      let standard = report.linear_under_standard_init();
      let custom = report.linear_under_custom_init();
      writeln!(self.writer, "Linear under standard init: {}", list_or_none(&standard))?;
      writeln!(self.writer, "Linear under custom init: {}", list_or_none(&custom))?;
    }

    let unavailable = report.unavailable();
    if !unavailable.is_empty() {
      writeln!(self.writer, "Not available: {}", unavailable.join(", "))?;
    }

    Ok(())
  }

  fn write_algorithm_summary(&mut self, algo: &AlgorithmReport, custom_init: u64) -> io::Result<()> {
    let Some(width) = algo.width else {
      writeln!(self.writer, "=== {} ===", algo.name)?;
      if let Some(error) = &algo.error {
        writeln!(self.writer, "Skipped: {error}")?;
      }
      return Ok(());
    };

    writeln!(self.writer, "=== {} ({width}-bit) ===", algo.name)?;

    match &algo.injectivity {
      Some(TestStatus::Completed(outcome)) => writeln!(self.writer, "Injectivity: {outcome}")?,
      Some(TestStatus::Skipped(reason)) => writeln!(self.writer, "Injectivity: skipped ({reason})")?,
      None => {}
    }
    if let Some(outcome) = &algo.linearity_standard {
      writeln!(self.writer, "Linearity (standard init): {outcome}")?;
    }
    if let Some(outcome) = &algo.linearity_custom {
      let init = custom_init & width_mask(width);
      writeln!(self.writer, "Linearity (custom init {init:#x}): {outcome}")?;
    }
    if let Some(tamper) = &algo.tamper {
      writeln!(self.writer, "Tamper: {tamper}")?;
      if let Some(ci) = tamper.confidence_interval(Z_95) {
        let status = if within_tolerance(tamper.probability(), tamper.expected(), DEFAULT_TOLERANCE) {
          "ok"
        } else {
          "DEVIATES"
        };
        writeln!(
          self.writer,
          "  95% CI [{:.10}, {:.10}], ratio to 2^-{width}: {:.3} [{status}]",
          ci.lower,
          ci.upper,
          tamper.ratio_to_expected()
        )?;
      }
    }
    Ok(())
  }

  fn write_json(&mut self, report: &SuiteReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut self.writer, report)?;
    writeln!(self.writer)
  }

  fn write_tsv(&mut self, report: &SuiteReport) -> io::Result<()> {
    writeln!(
      self.writer,
      "algorithm\twidth\tinjectivity\tiv_a\tiv_b\tlinear_standard\tlinear_custom\tcollisions\ttrials\tprobability"
    )?;
    for algo in &report.algorithms {
      let width = algo.width.map_or_else(String::new, |w| w.to_string());
      let (injectivity, iv_a, iv_b) = match &algo.injectivity {
        Some(TestStatus::Completed(outcome)) => {
          let label = match outcome {
            InjectivityOutcome::Injective => "injective",
            InjectivityOutcome::CollisionFound { .. } => "collision",
            InjectivityOutcome::NoCollisionInSamples { .. } => "no_collision_sampled",
          };
          let (a, b) = outcome
            .witness()
            .map_or((String::new(), String::new()), |(a, b)| (a.to_string(), b.to_string()));
          (label.to_string(), a, b)
        }
        Some(TestStatus::Skipped(_)) => ("skipped".to_string(), String::new(), String::new()),
        None => (String::new(), String::new(), String::new()),
      };
      let standard = algo.linearity_standard.map_or_else(String::new, |o| o.is_linear().to_string());
      let custom = algo.linearity_custom.map_or_else(String::new, |o| o.is_linear().to_string());
      let (collisions, trials, probability) = algo.tamper.map_or_else(
        || (String::new(), String::new(), String::new()),
        |t| (t.collisions.to_string(), t.trials.to_string(), format!("{:.10}", t.probability())),
      );
      writeln!(
        self.writer,
        "{}\t{width}\t{injectivity}\t{iv_a}\t{iv_b}\t{standard}\t{custom}\t{collisions}\t{trials}\t{probability}",
        algo.name
      )?;
    }
    Ok(())
  }
}

fn list_or_none(names: &[&str]) -> String {
  if names.is_empty() {
    "(none)".to_string()
  } else {
    names.join(", ")
  }
}
