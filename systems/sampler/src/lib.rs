#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Statistical validation harness for the scenario generator.
//!
//! The sampler generates scenarios for consecutive seeds, measures each with
//! the fairness metrics engine and folds the results into a
//! [`FairnessSummary`] that remembers the worst value of every statistic and
//! the seed that produced it. The summary is then compared against
//! [`FairnessThresholds`] and rendered as a line-oriented narrative.

mod checks;
mod narrative;
mod summary;
mod thresholds;

use outposts_core::{Scenario, Seed};
use outposts_system_generation::{GenerationError, Generator};
use outposts_system_metrics::{evaluate_fairness_with, MetricsConfig, ScenarioFairnessMetrics};

pub use checks::{evaluate_fairness_checks, CheckResult, Comparison};
pub use narrative::{build_fairness_narrative, FairnessNarrative};
pub use summary::{Extreme, FairnessSummary, Statistic, WorstRecord};
pub use thresholds::FairnessThresholds;

const PROGRESS_INTERVAL: u32 = 100;

/// One sampled scenario and its measurements.
#[derive(Clone, Debug, PartialEq)]
pub struct FairnessReport {
    /// Seed the scenario was requested with.
    pub seed: u64,
    /// Generated scenario.
    pub scenario: Scenario,
    /// Fairness statistics of the scenario.
    pub metrics: ScenarioFairnessMetrics,
}

/// Result of a sampling run.
#[derive(Clone, Debug, PartialEq)]
pub struct FairnessSampleRun {
    /// Per-seed reports in seed order.
    pub reports: Vec<FairnessReport>,
    /// Worst-case summary across the reports.
    pub summary: FairnessSummary,
}

/// Drives generation and measurement across consecutive seeds.
#[derive(Clone, Debug, Default)]
pub struct FairnessSampler {
    generator: Generator,
    metrics: MetricsConfig,
}

impl FairnessSampler {
    /// Creates a sampler from a generator and metrics radii.
    #[must_use]
    pub fn new(generator: Generator, metrics: MetricsConfig) -> Self {
        Self { generator, metrics }
    }

    /// Samples `sample_size` consecutive seeds starting at `start_seed`.
    ///
    /// Seeds are normalised the same way generation normalises them, so a
    /// start seed of zero samples seed one first.
    pub fn run(
        &self,
        sample_size: u32,
        start_seed: u64,
    ) -> Result<FairnessSampleRun, GenerationError> {
        let mut reports = Vec::with_capacity(sample_size as usize);
        let mut summary = FairnessSummary::new();
        let mut seed = Seed::new(start_seed);

        for index in 0..sample_size {
            let generated = self.generator.generate_with_attempt(seed)?;
            let scenario = generated.scenario;
            let metrics =
                evaluate_fairness_with(scenario.players(), scenario.structures(), &self.metrics);
            summary.record(seed.get(), &metrics, generated.attempts > 1);
            reports.push(FairnessReport {
                seed: seed.get(),
                scenario,
                metrics,
            });

            let completed = index + 1;
            if completed % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    completed,
                    total = sample_size,
                    "fairness samples progress"
                );
            }
            seed = seed.successor();
        }

        tracing::info!(
            samples = summary.sample_size,
            regenerated = summary.regenerated,
            "fairness sampling finished"
        );
        Ok(FairnessSampleRun { reports, summary })
    }
}

/// Samples `sample_size` consecutive seeds with default tuning.
pub fn run_fairness_samples(
    sample_size: u32,
    start_seed: u64,
) -> Result<FairnessSampleRun, GenerationError> {
    FairnessSampler::default().run(sample_size, start_seed)
}
