#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic, fairness-constrained scenario generation.
//!
//! A [`Generator`] turns a [`Seed`] into a five-player [`Scenario`] by running
//! a fixed pipeline: a headquarters ring, satellite clusters, staged neutral
//! placement, two optimisation passes, a fit-to-map normalisation, a
//! rebalancer and a final normalisation before assembly. Every random draw
//! comes from one [`XorShiftRng`] seeded once per attempt, so the same seed
//! and tuning always yield the same scenario. Attempts that fail the
//! acceptance gate restart with the next seed.

mod anchors;
mod assembly;
mod clusters;
mod layout;
mod neutrals;
mod normalize;
mod optimizer;
mod rebalance;
mod tuning;

use outposts_core::{Scenario, Seed, XorShiftRng};
use thiserror::Error;

pub use tuning::{
    AnchorTuning, BackfieldTuning, CenterClusterTuning, CenterOccupancy, ClusterTuning,
    FillTuning, GeneratorTuning, NeutralTuning, NormalizeTuning, OptimizerTuning, OuterTemplate,
    RadiusBand, RebalanceTuning, RegenerationTuning, ScoreWeights, TemplateKind, TopUpTuning,
    OUTER_TEMPLATES,
};

use crate::assembly::{assemble, check_acceptance, Rejection};
use crate::layout::Layout;
use crate::optimizer::Optimizer;
use crate::rebalance::Rebalancer;

/// Errors surfaced by scenario generation.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Every attempt up to the regeneration ceiling failed its acceptance
    /// gate.
    #[error("no valid scenario after {attempts} attempts starting from seed {seed}")]
    GenerationFailed {
        /// Seed of the first attempt.
        seed: u64,
        /// Attempts made before giving up.
        attempts: u32,
    },
}

/// Scenario together with the seed that actually produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Generated {
    /// Accepted scenario.
    pub scenario: Scenario,
    /// Seed of the accepted attempt. Differs from the requested seed when
    /// earlier attempts were rejected.
    pub seed: Seed,
    /// Attempts made, including the accepted one.
    pub attempts: u32,
}

/// Scenario generator holding its tuning.
#[derive(Clone, Debug, Default)]
pub struct Generator {
    tuning: GeneratorTuning,
}

impl Generator {
    /// Creates a generator that uses the provided tuning.
    #[must_use]
    pub fn new(tuning: GeneratorTuning) -> Self {
        Self { tuning }
    }

    /// Tuning used by the generator.
    #[must_use]
    pub fn tuning(&self) -> &GeneratorTuning {
        &self.tuning
    }

    /// Mutable access to the tuning.
    pub fn tuning_mut(&mut self) -> &mut GeneratorTuning {
        &mut self.tuning
    }

    /// Generates the scenario for `seed`.
    pub fn generate(&self, seed: Seed) -> Result<Scenario, GenerationError> {
        self.generate_with_attempt(seed)
            .map(|generated| generated.scenario)
    }

    /// Generates the scenario for `seed` and reports which seed was accepted.
    pub fn generate_with_attempt(&self, seed: Seed) -> Result<Generated, GenerationError> {
        let max_attempts = self.tuning.regeneration.max_attempts.max(1);
        let mut current = seed;

        for attempt in 1..=max_attempts {
            match self.attempt(current) {
                Ok(scenario) => {
                    return Ok(Generated {
                        scenario,
                        seed: current,
                        attempts: attempt,
                    });
                }
                Err(rejection) => {
                    tracing::debug!(
                        seed = current.get(),
                        attempt,
                        %rejection,
                        "scenario rejected, regenerating"
                    );
                    current = current.successor();
                }
            }
        }

        tracing::warn!(
            seed = seed.get(),
            attempts = max_attempts,
            "scenario generation exhausted its retries"
        );
        Err(GenerationError::GenerationFailed {
            seed: seed.get(),
            attempts: max_attempts,
        })
    }

    fn attempt(&self, seed: Seed) -> Result<Scenario, Rejection> {
        let tuning = &self.tuning;
        let mut rng = XorShiftRng::new(seed);

        let hqs = anchors::place_anchors(&mut rng, &tuning.anchors);
        let clusters = clusters::sample_clusters(&mut rng, &hqs, &tuning.clusters);
        let mut layout = Layout {
            hqs,
            clusters,
            neutrals: Vec::new(),
        };
        let full_clusters = layout
            .clusters
            .iter()
            .filter(|cluster| !cluster.is_empty())
            .count();
        tracing::trace!(
            seed = seed.get(),
            full_clusters,
            "anchors and clusters placed"
        );

        let owned = layout.owned();
        let neutrals = neutrals::place_neutrals(
            &mut rng,
            &layout.hqs,
            &owned,
            &tuning.neutrals,
            &tuning.center,
        );
        let optimizer = Optimizer {
            hqs: &layout.hqs,
            owned: &owned,
            tuning: &tuning.optimizer,
            neutrals: &tuning.neutrals,
            occupancy: &tuning.center,
        };
        let neutrals = optimizer.improve(&mut rng, neutrals);
        layout.neutrals = optimizer.balance_reach(&mut rng, neutrals);

        normalize::normalize_layout(&mut layout, &tuning.normalize);

        let owned = layout.owned();
        let rebalancer = Rebalancer {
            hqs: &layout.hqs,
            owned: &owned,
            tuning: &tuning.rebalance,
            occupancy: &tuning.center,
            min_separation: tuning.neutrals.min_separation,
            margin: tuning.normalize.margin(),
        };
        let neutrals = rebalancer.rebalance(&mut rng, layout.neutrals.clone());
        layout.neutrals = neutrals;

        normalize::normalize_layout(&mut layout, &tuning.normalize);

        let scenario = assemble(&mut rng, &layout);
        check_acceptance(&scenario, &tuning.center)?;
        Ok(scenario)
    }
}

/// Generates a scenario with default tuning. A missing seed is drawn from the
/// thread-local random source.
pub fn generate_scenario(seed: Option<u64>) -> Result<Scenario, GenerationError> {
    let seed = Seed::new(seed.unwrap_or_else(rand::random));
    Generator::default().generate(seed)
}
