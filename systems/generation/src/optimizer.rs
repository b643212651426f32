//! Score-driven local search over neutral positions.

use std::f64::consts::TAU;

use outposts_core::{geometry, Point2D, Rng};

use crate::layout::{center_count, clear_of, farthest_free_neutral, with_replaced, without};
use crate::neutrals::pick_template;
use crate::tuning::{CenterOccupancy, NeutralTuning, OptimizerTuning};

/// Shared inputs of the optimisation passes.
pub(crate) struct Optimizer<'a> {
    pub(crate) hqs: &'a [Point2D],
    pub(crate) owned: &'a [Point2D],
    pub(crate) tuning: &'a OptimizerTuning,
    pub(crate) neutrals: &'a NeutralTuning,
    pub(crate) occupancy: &'a CenterOccupancy,
}

impl Optimizer<'_> {
    /// Combined imbalance penalty of a neutral layout. Lower is fairer.
    pub(crate) fn score(&self, neutrals: &[Point2D]) -> f64 {
        let tuning = self.tuning;
        let weights = &tuning.weights;
        let bands =
            geometry::band_counts(self.hqs, neutrals, tuning.near_radius, tuning.mid_radius);
        let reach = geometry::spread(&geometry::nearest_two_sums(self.hqs, neutrals));
        let stddev = geometry::neutral_angle_stddev_deg(self.hqs, neutrals);
        let angle_deficit = (tuning.angle_target_deg - stddev).max(0.0);
        let in_center = center_count(neutrals, self.occupancy.radius);
        let center_violation = self.occupancy.violation(in_center);

        weights.near * geometry::count_spread(&bands.near) as f64
            + weights.mid * geometry::count_spread(&bands.mid) as f64
            + weights.near_mid * geometry::count_spread(&bands.near_mid()) as f64
            + weights.reach * reach / tuning.reach_scale
            + weights.angle * angle_deficit / tuning.angle_target_deg
            + weights.center * center_violation as f64
    }

    fn is_clear(&self, candidate: Point2D, others: &[Point2D]) -> bool {
        clear_of(
            candidate,
            &[self.owned, others],
            self.neutrals.min_separation,
        )
    }

    /// Replaces one random neutral per iteration with a centre or template
    /// proposal and keeps the move when it strictly lowers the score.
    pub(crate) fn improve<R: Rng>(&self, rng: &mut R, neutrals: Vec<Point2D>) -> Vec<Point2D> {
        if neutrals.is_empty() || self.hqs.is_empty() {
            return neutrals;
        }
        let center = geometry::map_center();
        let wedges = geometry::wedge_centers(self.hqs, center);
        let center_band = self.neutrals.center.band;
        let templates = &self.neutrals.fill.templates;

        let mut current = neutrals;
        let mut current_score = self.score(&current);
        let mut accepted = 0_u32;

        for _ in 0..self.tuning.iterations {
            let index = rng.index(current.len());
            let proposal = if rng.next() < self.tuning.center_proposal_chance {
                let angle = rng.next() * TAU;
                center.polar_offset(angle, rng.range(center_band.min, center_band.max))
            } else {
                let template = pick_template(rng, templates);
                let wedge = wedges[rng.index(wedges.len())];
                let angle = wedge + rng.signed() * template.jitter_deg.to_radians();
                center.polar_offset(angle, rng.range(template.band.min, template.band.max))
            };

            if !self.is_clear(proposal, &without(&current, index)) {
                continue;
            }
            let trial = with_replaced(&current, index, proposal);
            let trial_score = self.score(&trial);
            if trial_score < current_score {
                current = trial;
                current_score = trial_score;
                accepted += 1;
            }
        }

        tracing::trace!(
            accepted,
            score = current_score,
            "neutral improvement finished"
        );
        current
    }

    /// Moves the worst-off player's farthest free neutral toward its HQ until
    /// the nearest-two reach spread falls within tolerance.
    pub(crate) fn balance_reach<R: Rng>(
        &self,
        rng: &mut R,
        neutrals: Vec<Point2D>,
    ) -> Vec<Point2D> {
        let tuning = self.tuning;
        let center = geometry::map_center();
        let jitter = tuning.reach_jitter_deg.to_radians();
        let mut current = neutrals;
        let mut attempts = 0;

        while attempts < tuning.reach_attempts {
            let sums = geometry::nearest_two_sums(self.hqs, &current);
            let spread = geometry::spread(&sums);
            if spread <= tuning.reach_tolerance {
                break;
            }
            attempts += 1;

            let Some(worst) = geometry::index_of_max(sums.iter().copied()) else {
                break;
            };
            let Some(index) = farthest_free_neutral(self.hqs, &current, worst) else {
                break;
            };
            let hq = self.hqs[worst];
            let angle = hq.angle_to(center) + rng.signed() * jitter;
            let radius = rng.range(tuning.reach_band.min, tuning.reach_band.max);
            let candidate = hq.polar_offset(angle, radius);

            if !self.is_clear(candidate, &without(&current, index)) {
                continue;
            }
            let trial = with_replaced(&current, index, candidate);
            let in_center = center_count(&trial, self.occupancy.radius);
            if !self.occupancy.admits(in_center) {
                continue;
            }
            if geometry::spread(&geometry::nearest_two_sums(self.hqs, &trial)) < spread {
                current = trial;
            }
        }

        tracing::trace!(attempts, "reach balancing finished");
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        anchors::place_anchors,
        clusters::sample_clusters,
        layout::Layout,
        neutrals::place_neutrals,
        tuning::{AnchorTuning, ClusterTuning},
    };
    use outposts_core::{Seed, XorShiftRng};

    struct Fixture {
        rng: XorShiftRng,
        layout: Layout,
        optimizer: OptimizerTuning,
        neutrals: NeutralTuning,
        occupancy: CenterOccupancy,
    }

    impl Fixture {
        fn new(seed: u64) -> Self {
            let mut rng = XorShiftRng::new(Seed::new(seed));
            let hqs = place_anchors(&mut rng, &AnchorTuning::default());
            let clusters = sample_clusters(&mut rng, &hqs, &ClusterTuning::default());
            let mut layout = Layout {
                hqs,
                clusters,
                neutrals: Vec::new(),
            };
            let neutrals = NeutralTuning::default();
            let occupancy = CenterOccupancy::default();
            layout.neutrals = place_neutrals(
                &mut rng,
                &layout.hqs,
                &layout.owned(),
                &neutrals,
                &occupancy,
            );
            Self {
                rng,
                layout,
                optimizer: OptimizerTuning::default(),
                neutrals,
                occupancy,
            }
        }
    }

    #[test]
    fn improvement_never_raises_the_score() {
        for seed in 1..12 {
            let mut fixture = Fixture::new(seed);
            let owned = fixture.layout.owned();
            let optimizer = Optimizer {
                hqs: &fixture.layout.hqs,
                owned: &owned,
                tuning: &fixture.optimizer,
                neutrals: &fixture.neutrals,
                occupancy: &fixture.occupancy,
            };
            let before = optimizer.score(&fixture.layout.neutrals);
            let improved = optimizer.improve(&mut fixture.rng, fixture.layout.neutrals.clone());
            assert!(optimizer.score(&improved) <= before, "seed {seed}");
            assert_eq!(improved.len(), fixture.layout.neutrals.len());
        }
    }

    #[test]
    fn reach_balancing_never_widens_the_spread() {
        for seed in 1..12 {
            let mut fixture = Fixture::new(seed);
            let owned = fixture.layout.owned();
            let optimizer = Optimizer {
                hqs: &fixture.layout.hqs,
                owned: &owned,
                tuning: &fixture.optimizer,
                neutrals: &fixture.neutrals,
                occupancy: &fixture.occupancy,
            };
            let hqs = &fixture.layout.hqs;
            let sums = geometry::nearest_two_sums(hqs, &fixture.layout.neutrals);
            let before = geometry::spread(&sums);
            let neutrals = fixture.layout.neutrals.clone();
            let balanced = optimizer.balance_reach(&mut fixture.rng, neutrals);
            let after = geometry::spread(&geometry::nearest_two_sums(hqs, &balanced));
            assert!(after <= before, "seed {seed}");
        }
    }

    #[test]
    fn score_penalises_empty_centre() {
        let north = Point2D::new(1_000.0, 200.0);
        let south = Point2D::new(1_000.0, 1_600.0);
        let hqs = [north, south];
        let neutrals_tuning = NeutralTuning::default();
        let occupancy = CenterOccupancy::default();
        let tuning = OptimizerTuning::default();
        let optimizer = Optimizer {
            hqs: &hqs,
            owned: &hqs,
            tuning: &tuning,
            neutrals: &neutrals_tuning,
            occupancy: &occupancy,
        };
        let outer = [Point2D::new(200.0, 900.0), Point2D::new(1_800.0, 900.0)];
        let mut central = outer.to_vec();
        central.extend([
            Point2D::new(1_000.0, 800.0),
            Point2D::new(1_000.0, 1_000.0),
            Point2D::new(900.0, 900.0),
        ]);
        assert!(optimizer.score(&outer) > optimizer.score(&central));
    }
}
