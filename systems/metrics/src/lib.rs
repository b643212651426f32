#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Descriptive fairness statistics for finished scenarios.
//!
//! [`evaluate_fairness`] is a pure function over a player list and a
//! structure list. It measures headquarters regularity, satellite and neutral
//! angular spread, per-player neutral band counts, reach, isolation,
//! connectivity, clearance and initial sonar exposure. It never feeds back
//! into generation.

mod player;

use std::f64::consts::TAU;

use outposts_core::{geometry, Outpost, OutpostKind, Player, Point2D};
use outposts_system_sonar::SonarConfig;
use serde::{Deserialize, Serialize};

pub use player::PlayerFairness;

/// Radii used when bucketing neutrals around each player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Near band radius around each headquarters.
    pub near_radius: f64,
    /// Mid band outer radius around each headquarters.
    pub mid_radius: f64,
    /// Radius around the map centre that counts as "centre".
    pub center_radius: f64,
    /// Distance from any owned structure within which a neutral counts as
    /// connected.
    pub connectivity_radius: f64,
    /// Sonar radii handed to the visibility oracle.
    pub sonar: SonarConfig,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            near_radius: 300.0,
            mid_radius: 550.0,
            center_radius: 300.0,
            connectivity_radius: 500.0,
            sonar: SonarConfig::default(),
        }
    }
}

/// Statistics describing how evenly a scenario treats its players.
///
/// `*_range` fields are `max - min` across players.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFairnessMetrics {
    /// Smallest distance between two headquarters.
    pub hq_min_distance: f64,
    /// Largest distance between two headquarters.
    pub hq_max_distance: f64,
    /// Spread of the headquarters' distances from the map centre.
    pub hq_radius_spread: f64,
    /// Largest deviation in degrees of a headquarters from an even ring.
    pub hq_angle_deviation_deg: f64,
    /// Closest a satellite sits to its own headquarters.
    pub satellite_distance_min: f64,
    /// Farthest a satellite sits from its own headquarters.
    pub satellite_distance_max: f64,
    /// Standard deviation in degrees of satellite offsets from each HQ's
    /// facing direction.
    pub satellite_angle_stddev_deg: f64,
    /// Standard deviation in degrees of neutral offsets from the nearest
    /// wedge centre.
    pub neutral_angle_stddev_deg: f64,
    /// Range of near-band neutral counts.
    pub near_count_range: usize,
    /// Range of mid-band neutral counts.
    pub mid_count_range: usize,
    /// Range of near plus mid neutral counts.
    pub near_mid_count_range: usize,
    /// Range of far-band neutral counts.
    pub far_count_range: usize,
    /// Range of nearest-two neutral reach.
    pub neutral_reach_spread: f64,
    /// Smallest nearest-two neutral reach.
    pub neutral_reach_min: f64,
    /// Largest nearest-two neutral reach.
    pub neutral_reach_max: f64,
    /// Range of isolation scores.
    pub isolation_range: f64,
    /// Largest isolation score.
    pub isolation_max: f64,
    /// Range of connected neutral counts.
    pub connectivity_range: usize,
    /// Range of neutral foundries within the mid radius.
    pub foundry_access_range: usize,
    /// Range of neutral reactors within the mid radius.
    pub reactor_access_range: usize,
    /// Neutrals within the centre radius.
    pub center_neutral_count: usize,
    /// Total neutrals.
    pub neutral_count: usize,
    /// Smallest clearance between any two structures. Zero when there are
    /// fewer than two structures.
    pub min_structure_clearance: f64,
    /// Range of neutrals visible per player at the start.
    pub visible_neutral_range: usize,
    /// Most enemy structures any player sees at the start.
    pub visible_enemy_max: usize,
    /// Per-player breakdown, in player order. Players without a headquarters
    /// are omitted.
    pub players: Vec<PlayerFairness>,
}

/// Evaluates a scenario with the default [`MetricsConfig`].
#[must_use]
pub fn evaluate_fairness(players: &[Player], structures: &[Outpost]) -> ScenarioFairnessMetrics {
    evaluate_fairness_with(players, structures, &MetricsConfig::default())
}

/// Evaluates a scenario with explicit radii.
#[must_use]
pub fn evaluate_fairness_with(
    players: &[Player],
    structures: &[Outpost],
    config: &MetricsConfig,
) -> ScenarioFairnessMetrics {
    let center = geometry::map_center();
    let seated: Vec<(&Player, Point2D)> = players
        .iter()
        .filter_map(|player| hq_position(structures, player).map(|hq| (player, hq)))
        .collect();
    let hqs: Vec<Point2D> = seated.iter().map(|(_, hq)| *hq).collect();
    let neutrals: Vec<Point2D> = structures
        .iter()
        .filter(|outpost| outpost.is_neutral())
        .map(Outpost::position)
        .collect();

    let mut hq_distances: Vec<f64> = Vec::new();
    for (index, hq) in hqs.iter().enumerate() {
        hq_distances.extend(hqs[index + 1..].iter().map(|other| hq.distance(*other)));
    }
    let hq_radii: Vec<f64> = hqs.iter().map(|hq| hq.distance(center)).collect();

    let (satellite_distances, satellite_offsets) = satellite_measurements(&seated, structures);

    let reach = geometry::nearest_two_sums(&hqs, &neutrals);
    let isolation = geometry::isolation_scores(&hqs, &neutrals);
    let records: Vec<PlayerFairness> = seated
        .iter()
        .zip(reach.iter().zip(&isolation))
        .map(|((player, hq), (reach, isolation))| {
            player::player_fairness(player, *hq, *reach, *isolation, structures, config)
        })
        .collect();
    let per_player = |field: fn(&PlayerFairness) -> usize| -> usize {
        geometry::count_spread(&records.iter().map(field).collect::<Vec<_>>())
    };

    ScenarioFairnessMetrics {
        hq_min_distance: min_or_zero(&hq_distances),
        hq_max_distance: max_or_zero(&hq_distances),
        hq_radius_spread: geometry::spread(&hq_radii),
        hq_angle_deviation_deg: ring_deviation_deg(&hqs, center),
        satellite_distance_min: min_or_zero(&satellite_distances),
        satellite_distance_max: max_or_zero(&satellite_distances),
        satellite_angle_stddev_deg: geometry::population_stddev(&satellite_offsets),
        neutral_angle_stddev_deg: geometry::neutral_angle_stddev_deg(&hqs, &neutrals),
        near_count_range: per_player(|record| record.near_neutrals),
        mid_count_range: per_player(|record| record.mid_neutrals),
        near_mid_count_range: per_player(|record| record.near_neutrals + record.mid_neutrals),
        far_count_range: per_player(|record| record.far_neutrals),
        neutral_reach_spread: geometry::spread(&reach),
        neutral_reach_min: min_or_zero(&reach),
        neutral_reach_max: max_or_zero(&reach),
        isolation_range: geometry::spread(&isolation),
        isolation_max: max_or_zero(&isolation),
        connectivity_range: per_player(|record| record.connectivity),
        foundry_access_range: per_player(|record| record.foundry_access),
        reactor_access_range: per_player(|record| record.reactor_access),
        center_neutral_count: geometry::count_within(&neutrals, center, config.center_radius),
        neutral_count: neutrals.len(),
        min_structure_clearance: min_clearance(structures),
        visible_neutral_range: per_player(|record| record.visible_neutrals),
        visible_enemy_max: records
            .iter()
            .map(|record| record.visible_enemies)
            .max()
            .unwrap_or(0),
        players: records,
    }
}

fn min_or_zero(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

fn max_or_zero(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

fn hq_position(structures: &[Outpost], player: &Player) -> Option<Point2D> {
    structures
        .iter()
        .filter(|outpost| outpost.kind() == OutpostKind::Hq)
        .find(|outpost| outpost.owner() == Some(player.id()))
        .map(Outpost::position)
}

/// Distances to the owner's HQ and angular offsets in degrees from the HQ's
/// facing direction, for every non-HQ owned structure.
fn satellite_measurements(
    seated: &[(&Player, Point2D)],
    structures: &[Outpost],
) -> (Vec<f64>, Vec<f64>) {
    let center = geometry::map_center();
    let mut distances = Vec::new();
    let mut offsets = Vec::new();
    for (player, hq) in seated {
        let facing = hq.angle_to(center);
        let satellites = structures
            .iter()
            .filter(|outpost| outpost.owner() == Some(player.id()))
            .filter(|outpost| outpost.kind() != OutpostKind::Hq);
        for satellite in satellites {
            let position = satellite.position();
            let offset = geometry::angle_delta(hq.angle_to(position), facing);
            distances.push(hq.distance(position));
            offsets.push(offset.to_degrees());
        }
    }
    (distances, offsets)
}

/// Largest angular deviation of the headquarters from an evenly spaced ring
/// after removing the common rotation.
fn ring_deviation_deg(hqs: &[Point2D], center: Point2D) -> f64 {
    let Some(first) = hqs.first() else {
        return 0.0;
    };
    let reference = center.angle_to(*first);
    let mut relative: Vec<f64> = hqs
        .iter()
        .map(|hq| (center.angle_to(*hq) - reference).rem_euclid(TAU))
        .collect();
    relative.sort_by(f64::total_cmp);

    let step = TAU / hqs.len() as f64;
    let offsets: Vec<f64> = relative
        .iter()
        .enumerate()
        .map(|(index, angle)| geometry::angle_delta(*angle, index as f64 * step))
        .collect();
    let mean = offsets.iter().sum::<f64>() / offsets.len() as f64;
    offsets
        .iter()
        .map(|offset| (offset - mean).abs().to_degrees())
        .fold(0.0, f64::max)
}

fn min_clearance(structures: &[Outpost]) -> f64 {
    let mut best: Option<f64> = None;
    for (index, first) in structures.iter().enumerate() {
        for second in &structures[index + 1..] {
            let clearance = first.clearance(second);
            best = Some(best.map_or(clearance, |current: f64| current.min(clearance)));
        }
    }
    best.unwrap_or(0.0)
}
