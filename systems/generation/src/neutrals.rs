//! Staged neutral placement: centre cluster, backfield, mid/outer fill and a
//! relaxed top-up.

use std::f64::consts::{PI, TAU};

use outposts_core::{geometry, Point2D, Rng, NEUTRAL_COUNT};

use crate::layout::clear_of;
use crate::tuning::{CenterOccupancy, NeutralTuning, OuterTemplate, RadiusBand};

/// Runs every placement stage in order and returns up to
/// [`NEUTRAL_COUNT`] neutral positions.
pub(crate) fn place_neutrals<R: Rng>(
    rng: &mut R,
    hqs: &[Point2D],
    owned: &[Point2D],
    tuning: &NeutralTuning,
    occupancy: &CenterOccupancy,
) -> Vec<Point2D> {
    let center = geometry::map_center();
    let wedges = geometry::wedge_centers(hqs, center);
    let mut stage = Stage {
        owned,
        neutrals: Vec::with_capacity(NEUTRAL_COUNT),
        min_separation: tuning.min_separation,
    };

    stage.center_cluster(rng, hqs, &wedges, tuning, occupancy.min_count);
    let after_center = stage.neutrals.len();
    stage.backfield(rng, hqs, tuning);
    let after_backfield = stage.neutrals.len();
    stage.fill(rng, &wedges, tuning);
    let after_fill = stage.neutrals.len();
    stage.top_up(rng, &wedges, tuning);

    tracing::trace!(
        center = after_center,
        backfield = after_backfield - after_center,
        fill = after_fill - after_backfield,
        top_up = stage.neutrals.len() - after_fill,
        "neutral placement finished"
    );
    stage.neutrals
}

/// Draws a point `band` away from `origin` at `base` plus up to `jitter`
/// radians either side.
fn draw_around<R: Rng>(
    rng: &mut R,
    origin: Point2D,
    base: f64,
    jitter: f64,
    band: RadiusBand,
) -> Point2D {
    let angle = base + rng.signed() * jitter;
    origin.polar_offset(angle, rng.range(band.min, band.max))
}

struct Stage<'a> {
    owned: &'a [Point2D],
    neutrals: Vec<Point2D>,
    min_separation: f64,
}

impl Stage<'_> {
    fn is_full(&self) -> bool {
        self.neutrals.len() >= NEUTRAL_COUNT
    }

    fn is_clear(&self, candidate: Point2D) -> bool {
        clear_of(
            candidate,
            &[self.owned, &self.neutrals],
            self.min_separation,
        )
    }

    fn center_cluster<R: Rng>(
        &mut self,
        rng: &mut R,
        hqs: &[Point2D],
        wedges: &[f64],
        tuning: &NeutralTuning,
        target: usize,
    ) {
        let settings = &tuning.center;
        let center = geometry::map_center();
        let guard = settings.wedge_guard_deg.to_radians();
        let mut attempts = 0;
        while self.neutrals.len() < target && attempts < settings.attempts {
            attempts += 1;
            let angle = rng.next() * TAU;
            let radius = rng.range(settings.band.min, settings.band.max);
            let candidate = center.polar_offset(angle, radius);
            if hqs
                .iter()
                .any(|hq| candidate.distance(*hq) < settings.hq_clearance)
            {
                continue;
            }
            if !self.is_clear(candidate) {
                continue;
            }
            if wedges
                .iter()
                .any(|wedge| geometry::angle_delta(angle, *wedge).abs() < guard)
            {
                continue;
            }
            self.neutrals.push(candidate);
        }
    }

    fn backfield<R: Rng>(&mut self, rng: &mut R, hqs: &[Point2D], tuning: &NeutralTuning) {
        let settings = &tuning.backfield;
        let center = geometry::map_center();
        let jitter = settings.jitter_deg.to_radians();
        let mut order: Vec<usize> = (0..hqs.len()).collect();
        rng.shuffle(&mut order);

        for index in order {
            if self.is_full() {
                break;
            }
            let hq = hqs[index];
            let outward = center.angle_to(hq);
            for _ in 0..settings.attempts {
                let candidate = draw_around(rng, hq, outward, jitter, settings.band);
                if self.is_clear(candidate) {
                    self.neutrals.push(candidate);
                    break;
                }
            }
        }
    }

    fn fill<R: Rng>(&mut self, rng: &mut R, wedges: &[f64], tuning: &NeutralTuning) {
        if wedges.is_empty() {
            return;
        }
        let settings = &tuning.fill;
        let center = geometry::map_center();
        let half_wedge = PI / wedges.len() as f64;
        let start = rng.index(wedges.len());
        let mut round = 0;

        while !self.is_full() && round < settings.rounds {
            let wedge = wedges[(start + round as usize) % wedges.len()];
            round += 1;

            let mut placed = self.first_clear(rng, settings.attempts, |rng| {
                draw_around(rng, center, wedge, half_wedge, settings.band)
            });
            if placed.is_none() {
                let template = pick_template(rng, &settings.templates);
                placed = self.first_clear(rng, settings.template_attempts, |rng| {
                    let jitter = template.jitter_deg.to_radians();
                    draw_around(rng, center, wedge, jitter, template.band)
                });
            }
            if let Some(candidate) = placed {
                self.neutrals.push(candidate);
            }
        }
    }

    fn top_up<R: Rng>(&mut self, rng: &mut R, wedges: &[f64], tuning: &NeutralTuning) {
        let settings = &tuning.top_up;
        let center = geometry::map_center();
        let guard = settings.wedge_guard_deg.to_radians();
        let mut attempts = 0;
        while !self.is_full() && attempts < settings.attempts {
            attempts += 1;
            let angle = rng.next() * TAU;
            let radius = rng.range(settings.band.min, settings.band.max);
            let candidate = center.polar_offset(angle, radius);
            if wedges
                .iter()
                .any(|wedge| geometry::angle_delta(angle, *wedge).abs() < guard)
            {
                continue;
            }
            if self.is_clear(candidate) {
                self.neutrals.push(candidate);
            }
        }
    }

    fn first_clear<R: Rng>(
        &self,
        rng: &mut R,
        attempts: u32,
        mut draw: impl FnMut(&mut R) -> Point2D,
    ) -> Option<Point2D> {
        (0..attempts)
            .map(|_| draw(rng))
            .find(|candidate| self.is_clear(*candidate))
    }
}

/// Picks one of the outer templates uniformly.
pub(crate) fn pick_template<R: Rng>(rng: &mut R, templates: &[OuterTemplate; 3]) -> OuterTemplate {
    templates[rng.index(templates.len())]
}
