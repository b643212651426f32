//! Satellite rejection sampling around each headquarters.

use outposts_core::{geometry, Point2D, Rng};

use crate::tuning::ClusterTuning;

/// Satellite slots sampled per player.
pub(crate) const SATELLITES_PER_PLAYER: usize = 3;

/// Samples three satellites for every headquarters, in player order.
///
/// A cluster that cannot fill all of its slots is left empty; the acceptance
/// gate then rejects the whole attempt.
pub(crate) fn sample_clusters<R: Rng>(
    rng: &mut R,
    hqs: &[Point2D],
    tuning: &ClusterTuning,
) -> Vec<Vec<Point2D>> {
    let center = geometry::map_center();
    let mut clusters: Vec<Vec<Point2D>> = vec![Vec::new(); hqs.len()];

    for (index, hq) in hqs.iter().enumerate() {
        let facing = hq.angle_to(center);
        let mut accepted: Vec<Point2D> = Vec::with_capacity(SATELLITES_PER_PLAYER);

        for _ in 0..SATELLITES_PER_PLAYER {
            for _ in 0..tuning.attempts_per_satellite {
                let angle = facing + rng.signed() * tuning.half_spread_deg.to_radians();
                let radius = rng.range(tuning.min_radius, tuning.max_radius);
                let candidate = hq.polar_offset(angle, radius);
                if satellite_fits(candidate, index, hqs, &clusters, &accepted, tuning) {
                    accepted.push(candidate);
                    break;
                }
            }
        }

        if accepted.len() == SATELLITES_PER_PLAYER {
            clusters[index] = accepted;
        }
    }

    clusters
}

fn satellite_fits(
    candidate: Point2D,
    owner: usize,
    hqs: &[Point2D],
    clusters: &[Vec<Point2D>],
    siblings: &[Point2D],
    tuning: &ClusterTuning,
) -> bool {
    let hq = hqs[owner];
    let own_distance = candidate.distance(hq);
    if own_distance < tuning.min_radius || own_distance > tuning.max_radius {
        return false;
    }

    let sibling_angle = tuning.sibling_min_angle_deg.to_radians();
    let candidate_angle = hq.angle_to(candidate);
    for sibling in siblings {
        if candidate.distance(*sibling) < tuning.sibling_min_distance {
            return false;
        }
        let apart = geometry::angle_delta(candidate_angle, hq.angle_to(*sibling));
        if apart.abs() < sibling_angle {
            return false;
        }
    }

    let enemy_hqs = || {
        hqs.iter()
            .enumerate()
            .filter(move |(index, _)| *index != owner)
            .map(|(_, enemy)| *enemy)
    };

    let nearest_enemy = enemy_hqs()
        .map(|enemy| candidate.distance(enemy))
        .fold(f64::INFINITY, f64::min);
    if nearest_enemy < own_distance + tuning.foreign_margin {
        return false;
    }

    let sonar_exclusion = tuning.enemy_sonar_radius + tuning.sonar_buffer;
    if enemy_hqs().any(|enemy| candidate.distance(enemy) < sonar_exclusion) {
        return false;
    }

    let foreign_satellites = clusters
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != owner)
        .flat_map(|(_, cluster)| cluster.iter().copied());
    !enemy_hqs()
        .chain(foreign_satellites)
        .any(|foreign| candidate.distance(foreign) < tuning.foreign_min_distance)
}
