//! Headquarters ring.

use std::f64::consts::TAU;

use outposts_core::{geometry, Point2D, Rng, PLAYER_COUNT};

use crate::tuning::AnchorTuning;

/// Places one headquarters per player on a regular ring around the map
/// centre, rotated by a single random offset.
pub(crate) fn place_anchors<R: Rng>(rng: &mut R, tuning: &AnchorTuning) -> Vec<Point2D> {
    let center = geometry::map_center();
    let radius = tuning.ring_radius();
    let offset = rng.next() * TAU;
    let step = TAU / PLAYER_COUNT as f64;
    (0..PLAYER_COUNT)
        .map(|index| center.polar_offset(offset + index as f64 * step, radius))
        .collect()
}
