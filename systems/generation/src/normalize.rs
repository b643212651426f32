//! Fit-to-map rescaling.

use outposts_core::{geometry, Point2D, MAP_HEIGHT, MAP_WIDTH};

use crate::layout::Layout;
use crate::tuning::NormalizeTuning;

/// Uniform scale about the map centre that fits `points` inside the map
/// inset by `margin`. Never enlarges the layout.
pub(crate) fn fit_scale(points: &[Point2D], margin: f64) -> f64 {
    let center = geometry::map_center();
    let mut extent_x = 0.0_f64;
    let mut extent_y = 0.0_f64;
    for point in points {
        extent_x = extent_x.max((point.x - center.x).abs());
        extent_y = extent_y.max((point.y - center.y).abs());
    }

    let mut scale = 1.0_f64;
    if extent_x > 0.0 {
        scale = scale.min((MAP_WIDTH / 2.0 - margin) / extent_x);
    }
    if extent_y > 0.0 {
        scale = scale.min((MAP_HEIGHT / 2.0 - margin) / extent_y);
    }
    scale
}

/// Scales the whole layout about the map centre so it fits inside the
/// margin, then clamps every coordinate to the map.
pub(crate) fn normalize_layout(layout: &mut Layout, tuning: &NormalizeTuning) {
    let center = geometry::map_center();
    let scale = fit_scale(&layout.all_points(), tuning.margin());
    layout.map_points(|point| {
        let x = center.x + (point.x - center.x) * scale;
        let y = center.y + (point.y - center.y) * scale;
        Point2D::new(x.clamp(0.0, MAP_WIDTH), y.clamp(0.0, MAP_HEIGHT))
    });
    tracing::trace!(scale, "layout normalized");
}
