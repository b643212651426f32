//! Measurement helpers shared by the generator's scoring functions and the
//! fairness metrics engine.
//!
//! Both sides must agree on what "nearest-two reach" or "isolation" means, so
//! the definitions live here next to the data contracts rather than in either
//! consumer.

use std::f64::consts::{PI, TAU};

use crate::{Point2D, MAP_HEIGHT, MAP_WIDTH};

/// Number of nearest neutrals averaged into the isolation score.
pub const ISOLATION_NEUTRALS: usize = 3;

/// Number of nearest enemy headquarters averaged into the isolation score.
pub const ISOLATION_ENEMY_HQS: usize = 2;

/// Centre of the map.
#[must_use]
pub fn map_center() -> Point2D {
    Point2D::new(MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0)
}

/// Signed difference `a - b` wrapped into `(-PI, PI]`.
#[must_use]
pub fn angle_delta(a: f64, b: f64) -> f64 {
    let wrapped = (a - b).rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Angles of each headquarters as seen from `center`.
#[must_use]
pub fn wedge_centers(hqs: &[Point2D], center: Point2D) -> Vec<f64> {
    hqs.iter().map(|hq| center.angle_to(*hq)).collect()
}

/// Signed offset of `angle` from the closest wedge centre. Ties resolve to the
/// earliest wedge.
#[must_use]
pub fn nearest_wedge_offset(angle: f64, wedges: &[f64]) -> f64 {
    let mut best: Option<f64> = None;
    for wedge in wedges {
        let delta = angle_delta(angle, *wedge);
        match best {
            Some(current) if delta.abs() >= current.abs() => {}
            _ => best = Some(delta),
        }
    }
    best.unwrap_or(0.0)
}

/// Index of the first maximum, or `None` for an empty input.
#[must_use]
pub fn index_of_max<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, value) in values.into_iter().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

/// `max - min` over the values, zero when empty.
#[must_use]
pub fn spread(values: &[f64]) -> f64 {
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return 0.0;
    };
    let (min, max) = iter.fold((first, first), |(min, max), value| {
        (min.min(value), max.max(value))
    });
    max - min
}

/// `max - min` over integer counts, zero when empty.
#[must_use]
pub fn count_spread(values: &[usize]) -> usize {
    match (values.iter().min(), values.iter().max()) {
        (Some(min), Some(max)) => max - min,
        _ => 0,
    }
}

/// Population standard deviation, zero for fewer than two samples.
#[must_use]
pub fn population_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|value| (value - mean) * (value - mean))
        .sum::<f64>()
        / count;
    variance.sqrt()
}

/// Distances from `origin` to every target, ascending.
#[must_use]
pub fn sorted_distances(origin: Point2D, targets: &[Point2D]) -> Vec<f64> {
    let mut distances: Vec<f64> = targets
        .iter()
        .map(|target| origin.distance(*target))
        .collect();
    distances.sort_by(f64::total_cmp);
    distances
}

fn mean_of_first(sorted: &[f64], take: usize) -> f64 {
    let taken = &sorted[..take.min(sorted.len())];
    if taken.is_empty() {
        return 0.0;
    }
    taken.iter().sum::<f64>() / taken.len() as f64
}

/// Sum of the distances from `origin` to its two nearest neutrals.
#[must_use]
pub fn nearest_two_sum(origin: Point2D, neutrals: &[Point2D]) -> f64 {
    sorted_distances(origin, neutrals).iter().take(2).sum()
}

/// Nearest-two sum for every headquarters.
#[must_use]
pub fn nearest_two_sums(hqs: &[Point2D], neutrals: &[Point2D]) -> Vec<f64> {
    hqs.iter()
        .map(|hq| nearest_two_sum(*hq, neutrals))
        .collect()
}

/// Isolation score for every headquarters: the mean distance to the three
/// nearest neutrals plus the mean distance to the two nearest enemy
/// headquarters.
#[must_use]
pub fn isolation_scores(hqs: &[Point2D], neutrals: &[Point2D]) -> Vec<f64> {
    hqs.iter()
        .enumerate()
        .map(|(index, hq)| {
            let enemies: Vec<Point2D> = hqs
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, enemy)| *enemy)
                .collect();
            let neutral_term = mean_of_first(&sorted_distances(*hq, neutrals), ISOLATION_NEUTRALS);
            let enemy_term = mean_of_first(&sorted_distances(*hq, &enemies), ISOLATION_ENEMY_HQS);
            neutral_term + enemy_term
        })
        .collect()
}

/// Neutral counts per headquarters split into near and mid distance bands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BandCounts {
    /// Neutrals within the near radius of each headquarters.
    pub near: Vec<usize>,
    /// Neutrals beyond the near radius but within the mid radius.
    pub mid: Vec<usize>,
}

impl BandCounts {
    /// Per-player sum of the near and mid bands.
    #[must_use]
    pub fn near_mid(&self) -> Vec<usize> {
        self.near
            .iter()
            .zip(&self.mid)
            .map(|(near, mid)| near + mid)
            .collect()
    }
}

/// Counts neutrals per headquarters inside the near and mid bands.
#[must_use]
pub fn band_counts(
    hqs: &[Point2D],
    neutrals: &[Point2D],
    near_radius: f64,
    mid_radius: f64,
) -> BandCounts {
    let mut counts = BandCounts::default();
    for hq in hqs {
        let mut near = 0;
        let mut mid = 0;
        for neutral in neutrals {
            let distance = hq.distance(*neutral);
            if distance <= near_radius {
                near += 1;
            } else if distance <= mid_radius {
                mid += 1;
            }
        }
        counts.near.push(near);
        counts.mid.push(mid);
    }
    counts
}

/// Number of points within `radius` of `center`.
#[must_use]
pub fn count_within(points: &[Point2D], center: Point2D, radius: f64) -> usize {
    points
        .iter()
        .filter(|point| point.distance(center) <= radius)
        .count()
}

/// Standard deviation in degrees of each neutral's offset from the nearest
/// wedge centre, measured around the map centre.
#[must_use]
pub fn neutral_angle_stddev_deg(hqs: &[Point2D], neutrals: &[Point2D]) -> f64 {
    let center = map_center();
    let wedges = wedge_centers(hqs, center);
    let offsets: Vec<f64> = neutrals
        .iter()
        .map(|neutral| nearest_wedge_offset(center.angle_to(*neutral), &wedges).to_degrees())
        .collect();
    population_stddev(&offsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_delta_wraps_across_pi() {
        let delta = angle_delta(PI - 0.1, -PI + 0.1);
        assert!((delta + 0.2).abs() < 1e-12);
        assert!((angle_delta(0.5, 0.2) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn index_of_max_prefers_first_tie() {
        assert_eq!(index_of_max([1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(index_of_max(Vec::<f64>::new()), None);
    }

    #[test]
    fn spreads_measure_range() {
        assert!((spread(&[3.0, 9.5, 4.0]) - 6.5).abs() < 1e-12);
        assert_eq!(spread(&[]), 0.0);
        assert_eq!(count_spread(&[2, 5, 3]), 3);
        assert_eq!(count_spread(&[]), 0);
    }

    #[test]
    fn stddev_of_symmetric_samples() {
        assert!((population_stddev(&[-2.0, 2.0]) - 2.0).abs() < 1e-12);
        assert_eq!(population_stddev(&[4.0]), 0.0);
    }

    #[test]
    fn nearest_two_sum_takes_closest_pair() {
        let origin = Point2D::new(0.0, 0.0);
        let neutrals = [
            Point2D::new(300.0, 0.0),
            Point2D::new(0.0, 100.0),
            Point2D::new(0.0, -50.0),
        ];
        assert!((nearest_two_sum(origin, &neutrals) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn isolation_combines_neutral_and_enemy_terms() {
        let hqs = [
            Point2D::new(0.0, 0.0),
            Point2D::new(100.0, 0.0),
            Point2D::new(0.0, 300.0),
        ];
        let neutrals = [
            Point2D::new(10.0, 0.0),
            Point2D::new(20.0, 0.0),
            Point2D::new(30.0, 0.0),
        ];
        let scores = isolation_scores(&hqs, &neutrals);
        assert!((scores[0] - (20.0 + 200.0)).abs() < 1e-9);
    }

    #[test]
    fn band_counts_split_near_and_mid() {
        let hqs = [Point2D::new(0.0, 0.0)];
        let neutrals = [
            Point2D::new(100.0, 0.0),
            Point2D::new(400.0, 0.0),
            Point2D::new(900.0, 0.0),
        ];
        let counts = band_counts(&hqs, &neutrals, 300.0, 550.0);
        assert_eq!(counts.near, vec![1]);
        assert_eq!(counts.mid, vec![1]);
        assert_eq!(counts.near_mid(), vec![2]);
    }

    #[test]
    fn nearest_wedge_offset_picks_closest_wedge() {
        let wedges = [0.0, PI / 2.0];
        let offset = nearest_wedge_offset(PI / 2.0 - 0.2, &wedges);
        assert!((offset + 0.2).abs() < 1e-12);
    }
}
