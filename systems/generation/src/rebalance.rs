//! Post-normalisation rebalancer for reach and isolation outliers.

use outposts_core::{geometry, Point2D, Rng, MAP_HEIGHT, MAP_WIDTH};

use crate::layout::{center_count, clear_of, farthest_free_neutral, with_replaced, without};
use crate::tuning::{CenterOccupancy, RebalanceTuning};

/// Inputs shared by every rebalancing iteration.
pub(crate) struct Rebalancer<'a> {
    pub(crate) hqs: &'a [Point2D],
    pub(crate) owned: &'a [Point2D],
    pub(crate) tuning: &'a RebalanceTuning,
    pub(crate) occupancy: &'a CenterOccupancy,
    pub(crate) min_separation: f64,
    pub(crate) margin: f64,
}

impl Rebalancer<'_> {
    /// Overage of the reach spread and isolation range beyond their limits.
    pub(crate) fn penalty(&self, neutrals: &[Point2D]) -> f64 {
        let reach = geometry::spread(&geometry::nearest_two_sums(self.hqs, neutrals));
        let isolation = geometry::spread(&geometry::isolation_scores(self.hqs, neutrals));
        let reach_over = (reach - self.tuning.reach_limit).max(0.0);
        let isolation_over = (isolation - self.tuning.isolation_limit).max(0.0);
        reach_over + isolation_over
    }

    /// Alternates between the worst reach and the worst isolation, relocating
    /// a free neutral toward that player whenever it strictly lowers the
    /// penalty. Empty inputs pass through untouched.
    pub(crate) fn rebalance<R: Rng>(&self, rng: &mut R, neutrals: Vec<Point2D>) -> Vec<Point2D> {
        if self.hqs.is_empty() || neutrals.is_empty() {
            return neutrals;
        }
        let center = geometry::map_center();
        let jitter = self.tuning.jitter_deg.to_radians();
        let mut current = neutrals;
        let mut moves = 0_u32;

        for iteration in 0..self.tuning.iterations {
            let penalty = self.penalty(&current);
            if penalty <= 0.0 {
                break;
            }
            let metric = if iteration % 2 == 0 {
                geometry::nearest_two_sums(self.hqs, &current)
            } else {
                geometry::isolation_scores(self.hqs, &current)
            };
            let Some(worst) = geometry::index_of_max(metric) else {
                break;
            };
            let Some(index) = farthest_free_neutral(self.hqs, &current, worst) else {
                break;
            };

            let hq = self.hqs[worst];
            let toward = hq.angle_to(center);
            let reach = self
                .tuning
                .min_radius
                .max(self.tuning.reach_fraction * hq.distance(center));
            let mut search = Search {
                rebalancer: self,
                neutrals: &current,
                others: without(&current, index),
                index,
                best: None,
                best_penalty: penalty,
            };

            for _ in 0..self.tuning.candidates {
                let angle = toward + rng.signed() * jitter;
                let radius = rng.range(self.tuning.min_radius, reach);
                search.consider(hq.polar_offset(angle, radius));
            }
            if search.best.is_none() {
                for offset in &self.tuning.grid_angles_deg {
                    for radius in &self.tuning.grid_radii {
                        search.consider(hq.polar_offset(toward + offset.to_radians(), *radius));
                    }
                }
            }
            let chosen = search.best;
            if let Some(best) = chosen {
                current[index] = best;
                moves += 1;
            }
        }

        tracing::trace!(
            moves,
            penalty = self.penalty(&current),
            "rebalance finished"
        );
        current
    }
}

struct Search<'a, 'b> {
    rebalancer: &'a Rebalancer<'b>,
    neutrals: &'a [Point2D],
    others: Vec<Point2D>,
    index: usize,
    best: Option<Point2D>,
    best_penalty: f64,
}

impl Search<'_, '_> {
    fn consider(&mut self, candidate: Point2D) {
        let rebalancer = self.rebalancer;
        if !candidate.within_bounds(MAP_WIDTH, MAP_HEIGHT, rebalancer.margin) {
            return;
        }
        if !clear_of(
            candidate,
            &[rebalancer.owned, &self.others],
            rebalancer.min_separation,
        ) {
            return;
        }
        let trial = with_replaced(self.neutrals, self.index, candidate);
        let in_center = center_count(&trial, rebalancer.occupancy.radius);
        if !rebalancer.occupancy.admits(in_center) {
            return;
        }
        let penalty = rebalancer.penalty(&trial);
        if penalty < self.best_penalty {
            self.best = Some(candidate);
            self.best_penalty = penalty;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outposts_core::{Seed, XorShiftRng};

    fn rebalancer<'a>(
        hqs: &'a [Point2D],
        tuning: &'a RebalanceTuning,
        occupancy: &'a CenterOccupancy,
    ) -> Rebalancer<'a> {
        Rebalancer {
            hqs,
            owned: hqs,
            tuning,
            occupancy,
            min_separation: 100.0,
            margin: 36.0,
        }
    }

    #[test]
    fn empty_inputs_are_no_ops() {
        let tuning = RebalanceTuning::default();
        let occupancy = CenterOccupancy::default();
        let mut rng = XorShiftRng::new(Seed::new(1));
        let before = rng.clone();

        let neutrals = vec![Point2D::new(1_000.0, 900.0)];
        let without_hqs = rebalancer(&[], &tuning, &occupancy);
        let result = without_hqs.rebalance(&mut rng, neutrals.clone());
        assert_eq!(result, neutrals);

        let hqs = [Point2D::new(500.0, 500.0)];
        let single_hq = rebalancer(&hqs, &tuning, &occupancy);
        let result = single_hq.rebalance(&mut rng, Vec::new());
        assert!(result.is_empty());
        assert_eq!(rng, before);
    }

    #[test]
    fn lopsided_reach_is_reduced() {
        let tuning = RebalanceTuning::default();
        let occupancy = CenterOccupancy {
            min_count: 0,
            ..CenterOccupancy::default()
        };
        let hqs = [Point2D::new(300.0, 900.0), Point2D::new(1_700.0, 900.0)];
        let neutrals = vec![
            Point2D::new(450.0, 800.0),
            Point2D::new(450.0, 1_000.0),
            Point2D::new(1_000.0, 300.0),
            Point2D::new(1_000.0, 1_500.0),
        ];
        let rebalancer = rebalancer(&hqs, &tuning, &occupancy);
        let before = rebalancer.penalty(&neutrals);
        assert!(before > 0.0);

        let mut rng = XorShiftRng::new(Seed::new(9));
        let after = rebalancer.rebalance(&mut rng, neutrals);
        assert!(rebalancer.penalty(&after) < before);
    }
}
