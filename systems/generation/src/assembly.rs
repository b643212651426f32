//! Turns a finished layout into a [`Scenario`] and decides whether it is
//! acceptable.

use std::fmt;

use outposts_core::{
    DroneStock, Outpost, OutpostId, OutpostKind, OwnedCounts, Player, PlayerColor, PlayerId,
    Point2D, Rng, Scenario, MAP_HEIGHT, MAP_WIDTH, NEUTRAL_COUNT,
};

use crate::clusters::SATELLITES_PER_PLAYER;
use crate::layout::{center_count, Layout};
use crate::tuning::CenterOccupancy;

const PLAYER_PALETTE: [(&str, (u8, u8, u8)); 5] = [
    ("Cobalt", (0x2f, 0x6f, 0xdb)),
    ("Crimson", (0xd6, 0x3a, 0x3a)),
    ("Amber", (0xe8, 0xa3, 0x1c)),
    ("Verdant", (0x3f, 0xa8, 0x4e)),
    ("Violet", (0x8e, 0x4c, 0xc9)),
];

const SATELLITE_KINDS: [OutpostKind; SATELLITES_PER_PLAYER] = [
    OutpostKind::Foundry,
    OutpostKind::Foundry,
    OutpostKind::Reactor,
];

const NEUTRAL_LABELS: [&str; 32] = [
    "Abyssal Gate",
    "Brine Vault",
    "Coral Spire",
    "Drift Hollow",
    "Ebb Station",
    "Fathom Works",
    "Gyre Point",
    "Halocline",
    "Ion Trench",
    "Jetsam Yard",
    "Kelp Array",
    "Lantern Deep",
    "Maelstrom",
    "Nadir Post",
    "Obsidian Shelf",
    "Pelagic Hub",
    "Quartz Reef",
    "Riptide Dock",
    "Silt Beacon",
    "Thermocline",
    "Undertow",
    "Vent Cluster",
    "Whale Fall",
    "Xenon Basin",
    "Yawning Rift",
    "Zephyr Sound",
    "Anchor Ridge",
    "Benthic Forge",
    "Current Relay",
    "Dusk Caldera",
    "Echo Canyon",
    "Foam Terrace",
];

fn owned_drones(kind: OutpostKind) -> DroneStock {
    match kind {
        OutpostKind::Hq => DroneStock::new(20, 60, Some(1.0)),
        OutpostKind::Foundry => DroneStock::new(10, 30, Some(0.5)),
        OutpostKind::Reactor | OutpostKind::Extractor => DroneStock::new(8, 25, Some(0.35)),
    }
}

fn neutral_drones(kind: OutpostKind) -> DroneStock {
    match kind {
        OutpostKind::Foundry => DroneStock::new(8, 30, None),
        _ => DroneStock::new(6, 25, None),
    }
}

fn seat_players(count: usize) -> Vec<Player> {
    PLAYER_PALETTE
        .iter()
        .cycle()
        .take(count)
        .enumerate()
        .map(|(index, (name, (red, green, blue)))| {
            let id = PlayerId::new(index as u32 + 1);
            let color = PlayerColor::from_rgb(*red, *green, *blue);
            Player::new(id, *name, color)
        })
        .collect()
}

/// Builds the scenario: owned structures first in wedge order, then the
/// neutrals with shuffled kinds and labels.
pub(crate) fn assemble<R: Rng>(rng: &mut R, layout: &Layout) -> Scenario {
    let players = seat_players(layout.hqs.len());
    let mut structures: Vec<Outpost> = Vec::with_capacity(layout.all_points().len());
    for ((player, hq), cluster) in players.iter().zip(&layout.hqs).zip(&layout.clusters) {
        let owner = Some(player.id());
        push_outpost(
            &mut structures,
            OutpostKind::Hq,
            *hq,
            owner,
            format!("{} HQ", player.name()),
            owned_drones(OutpostKind::Hq),
        );
        for (slot, (kind, position)) in SATELLITE_KINDS.iter().zip(cluster).enumerate() {
            push_outpost(
                &mut structures,
                *kind,
                *position,
                owner,
                format!("{} {} {}", player.name(), satellite_title(*kind), slot + 1),
                owned_drones(*kind),
            );
        }
    }

    let mut kinds: Vec<OutpostKind> = (0..NEUTRAL_COUNT)
        .map(|index| {
            if index < NEUTRAL_COUNT / 2 {
                OutpostKind::Foundry
            } else {
                OutpostKind::Reactor
            }
        })
        .collect();
    rng.shuffle(&mut kinds);
    let mut labels = NEUTRAL_LABELS;
    rng.shuffle(&mut labels);

    for (index, position) in layout.neutrals.iter().enumerate() {
        let kind = kinds.get(index).copied().unwrap_or(OutpostKind::Foundry);
        let label = labels[index % labels.len()];
        push_outpost(
            &mut structures,
            kind,
            *position,
            None,
            label.to_string(),
            neutral_drones(kind),
        );
    }

    Scenario::new(players, structures, 0)
}

/// Appends an outpost whose id continues the 1-based assembly order.
fn push_outpost(
    structures: &mut Vec<Outpost>,
    kind: OutpostKind,
    position: Point2D,
    owner: Option<PlayerId>,
    label: String,
    drones: DroneStock,
) {
    let id = OutpostId::new(structures.len() as u32 + 1);
    structures.push(Outpost::new(id, kind, position, owner, label, drones));
}

fn satellite_title(kind: OutpostKind) -> &'static str {
    match kind {
        OutpostKind::Foundry => "Foundry",
        OutpostKind::Reactor => "Reactor",
        OutpostKind::Hq => "HQ",
        OutpostKind::Extractor => "Extractor",
    }
}

/// Reason an assembled scenario failed the acceptance gate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Rejection {
    OwnedComposition {
        player: PlayerId,
        counts: OwnedCounts,
    },
    NeutralCount(usize),
    OutOfBounds(OutpostId),
    Overlap {
        first: OutpostId,
        second: OutpostId,
        clearance: f64,
    },
    CenterOccupancy(usize),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnedComposition { player, counts } => write!(
                f,
                "player {} owns {} structures ({} hq, {} foundry, {} reactor)",
                player.get(),
                counts.total,
                counts.hq,
                counts.foundry,
                counts.reactor
            ),
            Self::NeutralCount(count) => write!(f, "{count} neutrals placed"),
            Self::OutOfBounds(id) => write!(f, "outpost {} lies outside the map", id.get()),
            Self::Overlap {
                first,
                second,
                clearance,
            } => write!(
                f,
                "outposts {} and {} overlap (clearance {clearance:.1})",
                first.get(),
                second.get()
            ),
            Self::CenterOccupancy(count) => write!(f, "{count} neutrals near the centre"),
        }
    }
}

/// Checks composition, bounds, clearance and centre occupancy.
pub(crate) fn check_acceptance(
    scenario: &Scenario,
    occupancy: &CenterOccupancy,
) -> Result<(), Rejection> {
    for player in scenario.players() {
        let counts = scenario.owned_counts(player.id());
        if counts != OwnedCounts::EXPECTED {
            return Err(Rejection::OwnedComposition {
                player: player.id(),
                counts,
            });
        }
    }

    let neutral_count = scenario.neutral_count();
    if neutral_count != NEUTRAL_COUNT {
        return Err(Rejection::NeutralCount(neutral_count));
    }

    let structures = scenario.structures();
    let in_map = |point: Point2D| point.within_bounds(MAP_WIDTH, MAP_HEIGHT, 0.0);
    if let Some(outside) = structures
        .iter()
        .find(|outpost| !in_map(outpost.position()))
    {
        return Err(Rejection::OutOfBounds(outside.id()));
    }

    for (index, first) in structures.iter().enumerate() {
        for second in &structures[index + 1..] {
            let clearance = first.clearance(second);
            if clearance <= 0.0 {
                return Err(Rejection::Overlap {
                    first: first.id(),
                    second: second.id(),
                    clearance,
                });
            }
        }
    }

    let neutrals: Vec<Point2D> = scenario.neutrals().map(Outpost::position).collect();
    let central = center_count(&neutrals, occupancy.radius);
    if !occupancy.admits(central) {
        return Err(Rejection::CenterOccupancy(central));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use outposts_core::{geometry, Seed, XorShiftRng};

    fn ring_layout() -> Layout {
        let center = geometry::map_center();
        let step = std::f64::consts::TAU / 5.0;
        let hqs: Vec<Point2D> = (0..5)
            .map(|index| center.polar_offset(index as f64 * step, 612.0))
            .collect();
        let clusters = hqs
            .iter()
            .map(|hq| {
                let facing = hq.angle_to(center);
                [-0.6, 0.0, 0.6]
                    .iter()
                    .map(|offset| hq.polar_offset(facing + offset, 150.0))
                    .collect()
            })
            .collect();
        let neutrals = (0..NEUTRAL_COUNT)
            .map(|index| {
                let radius = if index < 5 { 220.0 } else { 760.0 };
                center.polar_offset(index as f64 * step + step / 2.0, radius)
            })
            .collect();
        Layout {
            hqs,
            clusters,
            neutrals,
        }
    }

    #[test]
    fn assembly_orders_owned_structures_first() {
        let mut rng = XorShiftRng::new(Seed::new(4));
        let scenario = assemble(&mut rng, &ring_layout());
        let structures = scenario.structures();

        assert_eq!(structures.len(), 30);
        assert!(structures[..20].iter().all(|outpost| !outpost.is_neutral()));
        assert!(structures[20..].iter().all(Outpost::is_neutral));
        for (index, outpost) in structures.iter().enumerate() {
            assert_eq!(outpost.id().get(), index as u32 + 1);
        }
        assert_eq!(structures[0].kind(), OutpostKind::Hq);
        assert_eq!(structures[3].kind(), OutpostKind::Reactor);
        assert_eq!(scenario.players()[0].name(), "Cobalt");
        assert_eq!(scenario.active_player_index(), 0);
    }

    #[test]
    fn neutral_kinds_are_split_evenly() {
        let mut rng = XorShiftRng::new(Seed::new(8));
        let scenario = assemble(&mut rng, &ring_layout());
        let foundries = scenario
            .neutrals()
            .filter(|outpost| outpost.kind() == OutpostKind::Foundry)
            .count();
        assert_eq!(foundries, NEUTRAL_COUNT / 2);
        let mut neutrals = scenario.neutrals();
        assert!(neutrals.all(|outpost| outpost.drones().generation_rate.is_none()));
    }

    #[test]
    fn well_formed_layout_is_accepted() {
        let mut rng = XorShiftRng::new(Seed::new(4));
        let scenario = assemble(&mut rng, &ring_layout());
        assert_eq!(
            check_acceptance(&scenario, &CenterOccupancy::default()),
            Ok(())
        );
    }

    #[test]
    fn missing_cluster_is_rejected() {
        let mut layout = ring_layout();
        layout.clusters[2].clear();
        let mut rng = XorShiftRng::new(Seed::new(4));
        let scenario = assemble(&mut rng, &layout);
        let rejection = check_acceptance(&scenario, &CenterOccupancy::default());
        assert!(matches!(
            rejection,
            Err(Rejection::OwnedComposition { player, .. }) if player == PlayerId::new(3)
        ));
    }

    #[test]
    fn overlapping_structures_are_rejected() {
        let mut layout = ring_layout();
        layout.neutrals[9] = layout.hqs[0];
        let mut rng = XorShiftRng::new(Seed::new(4));
        let scenario = assemble(&mut rng, &layout);
        assert!(matches!(
            check_acceptance(&scenario, &CenterOccupancy::default()),
            Err(Rejection::Overlap { .. })
        ));
    }

    #[test]
    fn crowded_centre_is_rejected() {
        let mut layout = ring_layout();
        let center = geometry::map_center();
        for (index, neutral) in layout.neutrals.iter_mut().enumerate() {
            *neutral = center.polar_offset(index as f64 * 0.628, 250.0);
        }
        let mut rng = XorShiftRng::new(Seed::new(4));
        let scenario = assemble(&mut rng, &layout);
        assert_eq!(
            check_acceptance(&scenario, &CenterOccupancy::default()),
            Err(Rejection::CenterOccupancy(NEUTRAL_COUNT))
        );
    }
}
