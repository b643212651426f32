//! Working set of positions threaded through the placement stages.

use outposts_core::{geometry, Point2D};

/// Positions produced by the pipeline before they become outposts.
///
/// `clusters[i]` holds the satellites of `hqs[i]` in slot order (foundry,
/// foundry, reactor) and is empty when sampling failed for that player.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Layout {
    pub(crate) hqs: Vec<Point2D>,
    pub(crate) clusters: Vec<Vec<Point2D>>,
    pub(crate) neutrals: Vec<Point2D>,
}

impl Layout {
    /// Headquarters followed by every satellite.
    pub(crate) fn owned(&self) -> Vec<Point2D> {
        let mut owned = self.hqs.clone();
        owned.extend(self.clusters.iter().flatten().copied());
        owned
    }

    /// Applies `transform` to every position, owned ones first.
    pub(crate) fn map_points(&mut self, mut transform: impl FnMut(Point2D) -> Point2D) {
        for point in self
            .hqs
            .iter_mut()
            .chain(self.clusters.iter_mut().flatten())
            .chain(self.neutrals.iter_mut())
        {
            *point = transform(*point);
        }
    }

    /// Every position in the layout, owned ones first.
    pub(crate) fn all_points(&self) -> Vec<Point2D> {
        let mut points = self.owned();
        points.extend(self.neutrals.iter().copied());
        points
    }
}

/// Returns `true` when `candidate` keeps `min_separation` from every point in
/// each of `groups`.
pub(crate) fn clear_of(candidate: Point2D, groups: &[&[Point2D]], min_separation: f64) -> bool {
    groups
        .iter()
        .flat_map(|group| group.iter())
        .all(|point| candidate.distance(*point) >= min_separation)
}

/// Copy of `neutrals` without the entry at `skip`.
pub(crate) fn without(neutrals: &[Point2D], skip: usize) -> Vec<Point2D> {
    neutrals
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != skip)
        .map(|(_, point)| *point)
        .collect()
}

/// Copy of `neutrals` with the entry at `index` moved to `replacement`.
pub(crate) fn with_replaced(
    neutrals: &[Point2D],
    index: usize,
    replacement: Point2D,
) -> Vec<Point2D> {
    let mut trial = neutrals.to_vec();
    if let Some(slot) = trial.get_mut(index) {
        *slot = replacement;
    }
    trial
}

/// Number of neutrals within `radius` of the map centre.
pub(crate) fn center_count(neutrals: &[Point2D], radius: f64) -> usize {
    geometry::count_within(neutrals, geometry::map_center(), radius)
}

/// Index of the neutral farthest from `hqs[worst]` among those not already
/// counted in another player's two nearest. Falls back to every neutral when
/// all of them are claimed.
pub(crate) fn farthest_free_neutral(
    hqs: &[Point2D],
    neutrals: &[Point2D],
    worst: usize,
) -> Option<usize> {
    let origin = *hqs.get(worst)?;
    let mut claimed = vec![false; neutrals.len()];
    for (index, hq) in hqs.iter().enumerate() {
        if index == worst {
            continue;
        }
        let distances: Vec<f64> = neutrals.iter().map(|point| hq.distance(*point)).collect();
        let mut order: Vec<usize> = (0..neutrals.len()).collect();
        order.sort_by(|a, b| distances[*a].total_cmp(&distances[*b]));
        for claimed_index in order.into_iter().take(2) {
            claimed[claimed_index] = true;
        }
    }

    let mut pool: Vec<usize> = (0..neutrals.len())
        .filter(|index| !claimed[*index])
        .collect();
    if pool.is_empty() {
        pool = (0..neutrals.len()).collect();
    }
    let distances = pool.iter().map(|index| origin.distance(neutrals[*index]));
    let best = geometry::index_of_max(distances)?;
    pool.get(best).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_lists_hqs_before_satellites() {
        let layout = Layout {
            hqs: vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)],
            clusters: vec![vec![Point2D::new(2.0, 0.0)], Vec::new()],
            neutrals: vec![Point2D::new(3.0, 0.0)],
        };
        let xs: Vec<f64> = layout.all_points().iter().map(|point| point.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn clear_of_checks_every_group() {
        let a = [Point2D::new(0.0, 0.0)];
        let b = [Point2D::new(200.0, 0.0)];
        assert!(clear_of(Point2D::new(100.0, 0.0), &[&a, &b], 100.0));
        assert!(!clear_of(Point2D::new(150.0, 0.0), &[&a, &b], 100.0));
    }

    #[test]
    fn farthest_free_skips_claimed_neutrals() {
        let hqs = [Point2D::new(0.0, 0.0), Point2D::new(1_000.0, 0.0)];
        let neutrals = [
            Point2D::new(100.0, 0.0),
            Point2D::new(200.0, 0.0),
            Point2D::new(990.0, 0.0),
            Point2D::new(900.0, 0.0),
        ];
        // Neutrals 2 and 3 belong to the second HQ's nearest pair.
        assert_eq!(farthest_free_neutral(&hqs, &neutrals, 0), Some(1));
    }

    #[test]
    fn farthest_free_falls_back_when_all_claimed() {
        let hqs = [Point2D::new(0.0, 0.0), Point2D::new(1_000.0, 0.0)];
        let neutrals = [Point2D::new(900.0, 0.0), Point2D::new(950.0, 0.0)];
        assert_eq!(farthest_free_neutral(&hqs, &neutrals, 0), Some(1));
        assert_eq!(farthest_free_neutral(&hqs, &[], 0), None);
    }
}
