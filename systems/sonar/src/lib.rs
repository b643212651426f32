#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Read-only sonar visibility oracle.
//!
//! Every owned outpost emits a sonar pulse whose radius depends on its kind.
//! A player sees its own outposts unconditionally and any other outpost whose
//! centre falls inside one of its pulses. The oracle holds no state; callers
//! derive the sources once per player and reuse them across queries.

use outposts_core::{Outpost, OutpostId, OutpostKind, PlayerId};
use serde::{Deserialize, Serialize};

/// Sonar radii per outpost kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonarConfig {
    /// Pulse radius of a headquarters.
    pub hq_radius: f64,
    /// Pulse radius of a foundry.
    pub foundry_radius: f64,
    /// Pulse radius of a reactor.
    pub reactor_radius: f64,
    /// Pulse radius of an extractor.
    pub extractor_radius: f64,
}

impl Default for SonarConfig {
    fn default() -> Self {
        Self {
            hq_radius: 320.0,
            foundry_radius: 180.0,
            reactor_radius: 220.0,
            extractor_radius: 150.0,
        }
    }
}

impl SonarConfig {
    /// Pulse radius emitted by an outpost of `kind`.
    #[must_use]
    pub const fn radius_for(&self, kind: OutpostKind) -> f64 {
        match kind {
            OutpostKind::Hq => self.hq_radius,
            OutpostKind::Foundry => self.foundry_radius,
            OutpostKind::Reactor => self.reactor_radius,
            OutpostKind::Extractor => self.extractor_radius,
        }
    }
}

/// Sonar pulse emitted by a single owned outpost.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SonarSource {
    /// Outpost emitting the pulse.
    pub outpost_id: OutpostId,
    /// Horizontal centre of the pulse.
    pub x: f64,
    /// Vertical centre of the pulse.
    pub y: f64,
    /// Radius covered by the pulse.
    pub radius: f64,
}

impl SonarSource {
    fn covers(&self, outpost: &Outpost) -> bool {
        let position = outpost.position();
        (position.x - self.x).hypot(position.y - self.y) <= self.radius
    }
}

/// Collects the sonar pulses emitted by every outpost `player_id` owns.
#[must_use]
pub fn sonar_sources_for_player(
    outposts: &[Outpost],
    player_id: PlayerId,
    config: &SonarConfig,
) -> Vec<SonarSource> {
    outposts
        .iter()
        .filter(|outpost| outpost.owner() == Some(player_id))
        .map(|outpost| {
            let position = outpost.position();
            SonarSource {
                outpost_id: outpost.id(),
                x: position.x,
                y: position.y,
                radius: config.radius_for(outpost.kind()),
            }
        })
        .collect()
}

/// Reports whether `player_id` currently sees `outpost`.
///
/// The outpost list and sonar radii are part of the signature for oracles
/// with occlusion. This oracle resolves visibility from the sources alone.
#[must_use]
pub fn is_outpost_visible(
    outpost: &Outpost,
    player_id: PlayerId,
    _all_outposts: &[Outpost],
    sonar_sources: &[SonarSource],
    _config: &SonarConfig,
) -> bool {
    if outpost.owner() == Some(player_id) {
        return true;
    }
    sonar_sources.iter().any(|source| source.covers(outpost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use outposts_core::{DroneStock, Point2D};

    fn outpost(id: u32, kind: OutpostKind, x: f64, owner: Option<u32>) -> Outpost {
        Outpost::new(
            OutpostId::new(id),
            kind,
            Point2D::new(x, 0.0),
            owner.map(PlayerId::new),
            "test",
            DroneStock::new(0, 10, None),
        )
    }

    #[test]
    fn sources_only_include_owned_outposts() {
        let outposts = vec![
            outpost(1, OutpostKind::Hq, 0.0, Some(1)),
            outpost(2, OutpostKind::Reactor, 50.0, Some(1)),
            outpost(3, OutpostKind::Hq, 900.0, Some(2)),
            outpost(4, OutpostKind::Foundry, 400.0, None),
        ];
        let config = SonarConfig::default();
        let sources = sonar_sources_for_player(&outposts, PlayerId::new(1), &config);

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].outpost_id, OutpostId::new(1));
        assert!((sources[0].radius - config.hq_radius).abs() < f64::EPSILON);
        assert!((sources[1].radius - config.reactor_radius).abs() < f64::EPSILON);
    }

    #[test]
    fn visibility_respects_pulse_radius() {
        let outposts = vec![
            outpost(1, OutpostKind::Hq, 0.0, Some(1)),
            outpost(2, OutpostKind::Foundry, 300.0, None),
            outpost(3, OutpostKind::Foundry, 340.0, None),
            outpost(4, OutpostKind::Hq, 2_000.0, Some(2)),
        ];
        let config = SonarConfig::default();
        let player = PlayerId::new(1);
        let sources = sonar_sources_for_player(&outposts, player, &config);

        let visible: Vec<bool> = outposts
            .iter()
            .map(|candidate| is_outpost_visible(candidate, player, &outposts, &sources, &config))
            .collect();
        assert_eq!(visible, vec![true, true, false, false]);
    }

    #[test]
    fn own_outposts_are_visible_without_sources() {
        let owned = outpost(1, OutpostKind::Reactor, 0.0, Some(4));
        let config = SonarConfig::default();
        assert!(is_outpost_visible(&owned, PlayerId::new(4), &[], &[], &config));
    }
}
