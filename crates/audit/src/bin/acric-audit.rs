//! Command-line driver for the CRC property audit.
//!
//! Loads an optional `acric.toml`, applies `ACRIC_*` environment overrides,
//! then command-line flags, and writes the report to stdout or a file.
//! Log verbosity follows `RUST_LOG` (default `audit=info`).

use std::{
  fs::File,
  io::{self, BufWriter, Write},
  path::PathBuf,
  process::ExitCode,
};

use audit::{AuditConfig, OutputFormat, Registry, Report, Suite, TestKind, config::int_or_hex, load_config};
use clap::{Parser, Subcommand};
use tracing::error;

/// ACRIC CRC property audit.
#[derive(Parser, Debug)]
#[command(name = "acric-audit", version, about = "Injectivity, linearity and tamper-resistance tests for CRCs")]
struct Cli {
  /// Path to an `acric.toml` configuration file.
  #[arg(long, global = true, value_name = "PATH")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run the selected tests.
  Run(RunArgs),
  /// List every algorithm the registry knows.
  List,
}

#[derive(Parser, Debug)]
struct RunArgs {
  /// Algorithm to test (repeatable). Defaults to the whole registry.
  #[arg(short, long = "algorithm", value_name = "NAME")]
  algorithms: Vec<String>,

  /// Test to run (repeatable): injectivity, linearity or tamper. Defaults to all three.
  #[arg(short, long = "test", value_name = "TEST", value_parser = parse_test)]
  tests: Vec<TestKind>,

  /// Base seed (decimal or 0x hex).
  #[arg(long, value_parser = parse_u64)]
  seed: Option<u64>,

  /// Worker partitions per test.
  #[arg(short, long)]
  partitions: Option<usize>,

  /// Evaluate algorithms concurrently.
  #[arg(long)]
  parallel: bool,

  /// Enumerate IVs exhaustively even above the width threshold.
  #[arg(long)]
  allow_large: bool,

  /// Sample this many IVs for widths above the threshold instead of skipping.
  #[arg(long, value_name = "N")]
  sample: Option<u64>,

  /// Tamper-resistance rounds.
  #[arg(long)]
  rounds: Option<u64>,

  /// Tamper-resistance candidate messages per round.
  #[arg(long, value_parser = parse_u64)]
  trials: Option<u64>,

  /// Output format: summary, json or tsv.
  #[arg(short, long, value_name = "FORMAT", value_parser = parse_format, default_value = "summary")]
  format: OutputFormat,

  /// Write the report here instead of stdout.
  #[arg(short, long, value_name = "PATH")]
  output: Option<PathBuf>,
}

fn parse_u64(value: &str) -> Result<u64, String> {
  int_or_hex::parse_u64(value).ok_or_else(|| format!("invalid integer `{value}`"))
}

fn parse_test(value: &str) -> Result<TestKind, String> {
  TestKind::parse(value).ok_or_else(|| format!("unknown test `{value}` (expected injectivity, linearity or tamper)"))
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
  OutputFormat::parse(value).ok_or_else(|| format!("unknown format `{value}` (expected summary, json or tsv)"))
}

/// Initialize tracing with environment-based log levels.
fn init_tracing() {
  use tracing_subscriber::{EnvFilter, fmt, prelude::*};

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(io::stderr))
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("audit=info")))
    .init();
}

fn load(cli: &Cli) -> Result<AuditConfig, audit::AuditError> {
  let mut config = match &cli.config {
    Some(path) => load_config(path)?,
    None => AuditConfig::default(),
  };
  config.apply_env_overrides();
  Ok(config)
}

fn apply_args(config: &mut AuditConfig, args: &RunArgs) {
  if !args.algorithms.is_empty() {
    config.algorithms = args.algorithms.clone();
  }
  if !args.tests.is_empty() {
    config.tests = args.tests.clone();
  }
  if let Some(seed) = args.seed {
    config.seed = seed;
  }
  if let Some(partitions) = args.partitions {
    config.partitions = partitions;
  }
  if args.parallel {
    config.parallel_algorithms = true;
  }
  if args.allow_large {
    config.injectivity.allow_large = true;
  }
  if let Some(samples) = args.sample {
    config.injectivity.sample_count = Some(samples);
  }
  if let Some(rounds) = args.rounds {
    config.tamper.rounds = rounds;
  }
  if let Some(trials) = args.trials {
    config.tamper.trials_per_round = trials;
  }
}

fn run(mut config: AuditConfig, args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
  apply_args(&mut config, args);
  let suite = Suite::new(config)?;
  let report = suite.run();

  let writer: Box<dyn Write> = match &args.output {
    Some(path) => Box::new(BufWriter::new(File::create(path)?)),
    None => Box::new(BufWriter::new(io::stdout().lock())),
  };
  let mut out = Report::new(writer, args.format);
  out.write(&report)?;
  out.into_inner().flush()?;
  Ok(())
}

fn list(config: &AuditConfig) -> io::Result<()> {
  let registry = Registry::with_custom(&config.custom);
  let mut out = io::stdout().lock();
  for name in registry.names() {
    if let Ok(params) = registry.get(&name) {
      writeln!(
        out,
        "{name:24} width={:<2} poly={:#x} init={:#x} refin={} refout={} xorout={:#x}",
        params.width, params.polynomial, params.init, params.reflect_in, params.reflect_out, params.xor_out
      )?;
    }
  }
  Ok(())
}

fn main() -> ExitCode {
  init_tracing();
  let cli = Cli::parse();

  let config = match load(&cli) {
    Ok(config) => config,
    Err(err) => {
      error!(error = %err, "failed to load configuration");
      eprintln!("error: {err}");
      return ExitCode::FAILURE;
    }
  };

  let result = match &cli.command {
    Command::Run(args) => run(config, args),
    Command::List => list(&config).map_err(Into::into),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err}");
      ExitCode::FAILURE
    }
  }
}
