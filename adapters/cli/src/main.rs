#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for the outpost scenario generator.
//!
//! `generate` prints one scenario as JSON, `sample` runs the fairness harness
//! over consecutive seeds and `thresholds` prints the default limits as TOML.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use outposts_core::{Scenario, Seed};
use outposts_system_generation::Generator;
use outposts_system_metrics::{evaluate_fairness, ScenarioFairnessMetrics};
use outposts_system_sampler::{
    build_fairness_narrative, run_fairness_samples, CheckResult, FairnessThresholds,
};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

const DIAGNOSTIC_FILTER: &str = "info,outposts_core=debug,outposts_system_generation=debug,\
outposts_system_metrics=debug,outposts_system_sampler=debug";

#[derive(Parser, Debug)]
#[command(name = "outposts")]
#[command(about = "Generate and audit fair five-player outpost scenarios")]
struct Cli {
    /// Narrate generation and sampling at debug level.
    #[arg(long, global = true)]
    diagnostic: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Generate one scenario and print it as JSON.
    Generate {
        /// Seed to generate from. Fractional and negative values are
        /// normalised. A random seed is drawn when omitted.
        #[arg(long, allow_negative_numbers = true, value_parser = parse_seed)]
        seed: Option<Seed>,
        /// Include the fairness metrics of the scenario.
        #[arg(long)]
        metrics: bool,
    },
    /// Sample consecutive seeds and check their fairness.
    Sample {
        /// Number of scenarios to sample.
        #[arg(long, default_value_t = 1000)]
        count: u32,
        /// First seed of the sample.
        #[arg(long = "start-seed", default_value = "1", value_parser = parse_seed)]
        start_seed: Seed,
        /// TOML file overriding the default thresholds.
        #[arg(long)]
        thresholds: Option<PathBuf>,
        /// Print the check results as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the default fairness thresholds as TOML.
    Thresholds,
}

/// Accepts integer seeds as given and normalises any other number.
fn parse_seed(raw: &str) -> Result<Seed, String> {
    if let Ok(value) = raw.parse::<u64>() {
        return Ok(Seed::new(value));
    }
    raw.parse::<f64>()
        .map(Seed::from_f64)
        .map_err(|_| format!("`{raw}` is not a number"))
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    requested_seed: u64,
    seed: u64,
    attempts: u32,
    scenario: &'a Scenario,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<ScenarioFairnessMetrics>,
}

#[derive(Serialize)]
struct SampleOutput<'a> {
    passed: bool,
    checks: &'a [CheckResult],
}

fn init_logging(diagnostic: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if diagnostic {
            EnvFilter::new(DIAGNOSTIC_FILTER)
        } else {
            EnvFilter::new("warn")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_thresholds(path: Option<&Path>) -> Result<FairnessThresholds> {
    let Some(path) = path else {
        return Ok(FairnessThresholds::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read thresholds from {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse thresholds in {}", path.display()))
}

fn generate(seed: Option<Seed>, with_metrics: bool) -> Result<ExitCode> {
    let requested = seed.unwrap_or_else(|| Seed::new(rand::random()));
    let generated = Generator::default()
        .generate_with_attempt(requested)
        .context("scenario generation failed")?;
    tracing::info!(
        requested = requested.get(),
        accepted = generated.seed.get(),
        attempts = generated.attempts,
        "scenario generated"
    );
    let metrics = with_metrics.then(|| {
        evaluate_fairness(
            generated.scenario.players(),
            generated.scenario.structures(),
        )
    });

    let output = GenerateOutput {
        requested_seed: requested.get(),
        seed: generated.seed.get(),
        attempts: generated.attempts,
        scenario: &generated.scenario,
        metrics,
    };
    let json = serde_json::to_string_pretty(&output).context("failed to serialize scenario")?;
    print_line(&json)?;
    Ok(ExitCode::SUCCESS)
}

fn sample(count: u32, start_seed: Seed, thresholds: Option<&Path>, json: bool) -> Result<ExitCode> {
    let thresholds = load_thresholds(thresholds)?;
    let run = run_fairness_samples(count, start_seed.get()).context("fairness sampling failed")?;
    let narrative = build_fairness_narrative(&run.summary, &thresholds);
    let passed = narrative.all_passed();
    let checks = &narrative.checks;
    let tally = checks.iter().filter(|check| check.passed).count();
    tracing::info!(
        passed = tally,
        total = checks.len(),
        "fairness checks evaluated"
    );

    if json {
        let output = SampleOutput { passed, checks };
        let rendered =
            serde_json::to_string_pretty(&output).context("failed to serialize checks")?;
        print_line(&rendered)?;
    } else {
        for line in &narrative.lines {
            print_line(line)?;
        }
    }

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_thresholds() -> Result<ExitCode> {
    let rendered = toml::to_string_pretty(&FairnessThresholds::default())
        .context("failed to serialize thresholds")?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("failed to write thresholds")?;
    Ok(ExitCode::SUCCESS)
}

fn print_line(line: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}").context("failed to write output")
}

/// Entry point for the outposts command-line interface.
fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.diagnostic);

    match cli.command {
        Command::Generate { seed, metrics } => generate(seed, metrics),
        Command::Sample {
            count,
            start_seed,
            thresholds,
            json,
        } => sample(count, start_seed, thresholds.as_deref(), json),
        Command::Thresholds => print_thresholds(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sample_defaults_apply() {
        let cli = Cli::try_parse_from(["outposts", "sample"]).expect("parses");
        assert!(!cli.diagnostic);
        assert_eq!(
            cli.command,
            Command::Sample {
                count: 1000,
                start_seed: Seed::new(1),
                thresholds: None,
                json: false,
            }
        );
    }

    #[test]
    fn diagnostic_flag_is_global() {
        let cli = Cli::try_parse_from(["outposts", "generate", "--seed", "9", "--diagnostic"])
            .expect("parses");
        assert!(cli.diagnostic);
        assert_eq!(
            cli.command,
            Command::Generate {
                seed: Some(Seed::new(9)),
                metrics: false,
            }
        );
    }

    #[test]
    fn fractional_and_negative_seeds_are_normalised() {
        assert_eq!(parse_seed("42"), Ok(Seed::new(42)));
        assert_eq!(parse_seed("12.8"), Ok(Seed::new(12)));
        assert_eq!(parse_seed("0"), Ok(Seed::new(1)));
        assert!(parse_seed("north").is_err());

        let cli = Cli::try_parse_from(["outposts", "generate", "--seed=-12.8"]).expect("parses");
        assert_eq!(
            cli.command,
            Command::Generate {
                seed: Some(Seed::new(12)),
                metrics: false,
            }
        );
    }

    #[test]
    fn missing_thresholds_file_is_reported() {
        let error = load_thresholds(Some(Path::new("does/not/exist.toml")))
            .expect_err("missing file fails");
        assert!(error.to_string().contains("does/not/exist.toml"));
    }
}
