use outposts_core::{geometry, Outpost, OutpostKind, OwnedCounts, Player, PlayerId, Point2D};
use outposts_system_sonar::{is_outpost_visible, sonar_sources_for_player};
use serde::{Deserialize, Serialize};

use crate::MetricsConfig;

/// Fairness statistics gathered for a single player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerFairness {
    /// Player the statistics describe.
    pub player_id: PlayerId,
    /// Starting composition of the player's structures.
    pub owned: OwnedCounts,
    /// Neutrals within the near radius of the player's HQ.
    pub near_neutrals: usize,
    /// Neutrals beyond the near radius but within the mid radius.
    pub mid_neutrals: usize,
    /// Neutrals beyond the mid radius.
    pub far_neutrals: usize,
    /// Neutral foundries within the mid radius of the HQ.
    pub foundry_access: usize,
    /// Neutral reactors within the mid radius of the HQ.
    pub reactor_access: usize,
    /// Sum of the distances to the two nearest neutrals.
    pub neutral_reach: f64,
    /// Isolation score of the HQ.
    pub isolation: f64,
    /// Neutrals within the connectivity radius of any owned structure.
    pub connectivity: usize,
    /// Neutrals covered by the player's sonar at the start.
    pub visible_neutrals: usize,
    /// Enemy structures covered by the player's sonar at the start.
    pub visible_enemies: usize,
}

/// Builds the per-player record. `reach` and `isolation` are precomputed
/// across all HQs since isolation depends on the enemy ring.
pub(crate) fn player_fairness(
    player: &Player,
    hq: Point2D,
    reach: f64,
    isolation: f64,
    structures: &[Outpost],
    config: &MetricsConfig,
) -> PlayerFairness {
    let id = player.id();
    let is_owned = |outpost: &&Outpost| outpost.owner() == Some(id);
    let owned_positions: Vec<Point2D> = structures
        .iter()
        .filter(is_owned)
        .map(Outpost::position)
        .collect();

    let mut record = PlayerFairness {
        player_id: id,
        owned: OwnedCounts::tally(structures.iter().filter(is_owned)),
        near_neutrals: 0,
        mid_neutrals: 0,
        far_neutrals: 0,
        foundry_access: 0,
        reactor_access: 0,
        neutral_reach: reach,
        isolation,
        connectivity: 0,
        visible_neutrals: 0,
        visible_enemies: 0,
    };

    for neutral in structures.iter().filter(|outpost| outpost.is_neutral()) {
        let distance = neutral.position().distance(hq);
        if distance <= config.near_radius {
            record.near_neutrals += 1;
        } else if distance <= config.mid_radius {
            record.mid_neutrals += 1;
        } else {
            record.far_neutrals += 1;
        }
        if distance <= config.mid_radius {
            match neutral.kind() {
                OutpostKind::Foundry => record.foundry_access += 1,
                OutpostKind::Reactor => record.reactor_access += 1,
                OutpostKind::Hq | OutpostKind::Extractor => {}
            }
        }
        let nearby = geometry::count_within(
            &owned_positions,
            neutral.position(),
            config.connectivity_radius,
        );
        if nearby > 0 {
            record.connectivity += 1;
        }
    }

    let sources = sonar_sources_for_player(structures, id, &config.sonar);
    for outpost in structures {
        if outpost.owner() == Some(id) {
            continue;
        }
        if !is_outpost_visible(outpost, id, structures, &sources, &config.sonar) {
            continue;
        }
        if outpost.is_neutral() {
            record.visible_neutrals += 1;
        } else {
            record.visible_enemies += 1;
        }
    }

    record
}
