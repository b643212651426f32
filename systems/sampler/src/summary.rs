use outposts_system_metrics::ScenarioFairnessMetrics;
use serde::{Deserialize, Serialize};

/// Which end of a statistic's range is the unfair one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extreme {
    /// Larger values are worse.
    Highest,
    /// Smaller values are worse.
    Lowest,
}

/// Statistics folded into a [`FairnessSummary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    /// Spread of HQ distances from the map centre.
    HqRadiusSpread,
    /// HQ deviation from an even ring.
    HqAngleDeviation,
    /// Smallest distance between two headquarters.
    HqMinDistance,
    /// Closest satellite to its HQ.
    SatelliteDistanceMin,
    /// Farthest satellite from its HQ.
    SatelliteDistanceMax,
    /// Satellite angular standard deviation.
    SatelliteAngleStddev,
    /// Neutral angular standard deviation.
    NeutralAngleStddev,
    /// Range of near-band neutral counts.
    NearCountRange,
    /// Range of mid-band neutral counts.
    MidCountRange,
    /// Range of near plus mid neutral counts.
    NearMidCountRange,
    /// Range of far-band neutral counts.
    FarCountRange,
    /// Spread of nearest-two neutral reach.
    NeutralReachSpread,
    /// Range of isolation scores.
    IsolationRange,
    /// Fewest neutrals near the centre.
    CenterNeutralsMin,
    /// Most neutrals near the centre.
    CenterNeutralsMax,
    /// Smallest structure clearance.
    StructureClearance,
    /// Range of visible neutrals.
    VisibleNeutralRange,
    /// Most visible enemy structures.
    VisibleEnemyMax,
    /// Range of connected neutrals.
    ConnectivityRange,
    /// Range of neutral foundry access.
    FoundryAccessRange,
    /// Range of neutral reactor access.
    ReactorAccessRange,
}

impl Statistic {
    /// Every statistic in report order.
    pub const ALL: [Statistic; 21] = [
        Statistic::HqRadiusSpread,
        Statistic::HqAngleDeviation,
        Statistic::HqMinDistance,
        Statistic::SatelliteDistanceMin,
        Statistic::SatelliteDistanceMax,
        Statistic::SatelliteAngleStddev,
        Statistic::NeutralAngleStddev,
        Statistic::NearCountRange,
        Statistic::MidCountRange,
        Statistic::NearMidCountRange,
        Statistic::FarCountRange,
        Statistic::NeutralReachSpread,
        Statistic::IsolationRange,
        Statistic::CenterNeutralsMin,
        Statistic::CenterNeutralsMax,
        Statistic::StructureClearance,
        Statistic::VisibleNeutralRange,
        Statistic::VisibleEnemyMax,
        Statistic::ConnectivityRange,
        Statistic::FoundryAccessRange,
        Statistic::ReactorAccessRange,
    ];

    /// Stable machine-readable key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::HqRadiusSpread => "hq_radius_spread",
            Self::HqAngleDeviation => "hq_angle_deviation_deg",
            Self::HqMinDistance => "hq_min_distance",
            Self::SatelliteDistanceMin => "satellite_distance_min",
            Self::SatelliteDistanceMax => "satellite_distance_max",
            Self::SatelliteAngleStddev => "satellite_angle_stddev_deg",
            Self::NeutralAngleStddev => "neutral_angle_stddev_deg",
            Self::NearCountRange => "near_count_range",
            Self::MidCountRange => "mid_count_range",
            Self::NearMidCountRange => "near_mid_count_range",
            Self::FarCountRange => "far_count_range",
            Self::NeutralReachSpread => "neutral_reach_spread",
            Self::IsolationRange => "isolation_range",
            Self::CenterNeutralsMin => "center_neutrals_min",
            Self::CenterNeutralsMax => "center_neutrals_max",
            Self::StructureClearance => "min_structure_clearance",
            Self::VisibleNeutralRange => "visible_neutral_range",
            Self::VisibleEnemyMax => "visible_enemy_max",
            Self::ConnectivityRange => "connectivity_range",
            Self::FoundryAccessRange => "foundry_access_range",
            Self::ReactorAccessRange => "reactor_access_range",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HqRadiusSpread => "HQ radius spread",
            Self::HqAngleDeviation => "HQ angle deviation (deg)",
            Self::HqMinDistance => "HQ minimum distance",
            Self::SatelliteDistanceMin => "Satellite minimum distance",
            Self::SatelliteDistanceMax => "Satellite maximum distance",
            Self::SatelliteAngleStddev => "Satellite angle stddev (deg)",
            Self::NeutralAngleStddev => "Neutral angle stddev (deg)",
            Self::NearCountRange => "Near neutral range",
            Self::MidCountRange => "Mid neutral range",
            Self::NearMidCountRange => "Near+mid neutral range",
            Self::FarCountRange => "Far neutral range",
            Self::NeutralReachSpread => "Neutral reach spread",
            Self::IsolationRange => "Isolation range",
            Self::CenterNeutralsMin => "Centre neutrals (fewest)",
            Self::CenterNeutralsMax => "Centre neutrals (most)",
            Self::StructureClearance => "Structure clearance",
            Self::VisibleNeutralRange => "Visible neutral range",
            Self::VisibleEnemyMax => "Visible enemy structures",
            Self::ConnectivityRange => "Connectivity range",
            Self::FoundryAccessRange => "Foundry access range",
            Self::ReactorAccessRange => "Reactor access range",
        }
    }

    /// End of the range that counts as worst.
    #[must_use]
    pub const fn extreme(self) -> Extreme {
        match self {
            Self::HqMinDistance
            | Self::SatelliteDistanceMin
            | Self::SatelliteAngleStddev
            | Self::NeutralAngleStddev
            | Self::CenterNeutralsMin
            | Self::StructureClearance => Extreme::Lowest,
            _ => Extreme::Highest,
        }
    }

    /// Reads the statistic from one scenario's metrics.
    #[must_use]
    pub fn measure(self, metrics: &ScenarioFairnessMetrics) -> f64 {
        match self {
            Self::HqRadiusSpread => metrics.hq_radius_spread,
            Self::HqAngleDeviation => metrics.hq_angle_deviation_deg,
            Self::HqMinDistance => metrics.hq_min_distance,
            Self::SatelliteDistanceMin => metrics.satellite_distance_min,
            Self::SatelliteDistanceMax => metrics.satellite_distance_max,
            Self::SatelliteAngleStddev => metrics.satellite_angle_stddev_deg,
            Self::NeutralAngleStddev => metrics.neutral_angle_stddev_deg,
            Self::NearCountRange => metrics.near_count_range as f64,
            Self::MidCountRange => metrics.mid_count_range as f64,
            Self::NearMidCountRange => metrics.near_mid_count_range as f64,
            Self::FarCountRange => metrics.far_count_range as f64,
            Self::NeutralReachSpread => metrics.neutral_reach_spread,
            Self::IsolationRange => metrics.isolation_range,
            Self::CenterNeutralsMin | Self::CenterNeutralsMax => {
                metrics.center_neutral_count as f64
            }
            Self::StructureClearance => metrics.min_structure_clearance,
            Self::VisibleNeutralRange => metrics.visible_neutral_range as f64,
            Self::VisibleEnemyMax => metrics.visible_enemy_max as f64,
            Self::ConnectivityRange => metrics.connectivity_range as f64,
            Self::FoundryAccessRange => metrics.foundry_access_range as f64,
            Self::ReactorAccessRange => metrics.reactor_access_range as f64,
        }
    }
}

/// Worst observed value of a statistic and the seed that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorstRecord {
    /// Worst value seen.
    pub value: f64,
    /// Seed whose scenario produced the value.
    pub seed: u64,
}

/// Worst-case record per statistic across a batch of sampled scenarios.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FairnessSummary {
    /// Scenarios folded into the summary.
    pub sample_size: u32,
    /// First seed sampled, if any.
    pub first_seed: Option<u64>,
    /// Last seed sampled, if any.
    pub last_seed: Option<u64>,
    /// Samples whose first generation attempt was rejected.
    pub regenerated: u32,
    /// Worst record per statistic, in [`Statistic::ALL`] order.
    pub records: Vec<(Statistic, WorstRecord)>,
}

impl FairnessSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one scenario's metrics into the summary. Ties keep the earlier
    /// seed.
    pub fn record(&mut self, seed: u64, metrics: &ScenarioFairnessMetrics, regenerated: bool) {
        self.sample_size += 1;
        if self.first_seed.is_none() {
            self.first_seed = Some(seed);
        }
        self.last_seed = Some(seed);
        if regenerated {
            self.regenerated += 1;
        }

        for statistic in Statistic::ALL {
            let value = statistic.measure(metrics);
            let slot = self.records.iter_mut().find(|entry| entry.0 == statistic);
            match slot {
                Some((_, worst)) => {
                    let replace = match statistic.extreme() {
                        Extreme::Highest => value > worst.value,
                        Extreme::Lowest => value < worst.value,
                    };
                    if replace {
                        *worst = WorstRecord { value, seed };
                    }
                }
                None => self.records.push((statistic, WorstRecord { value, seed })),
            }
        }
    }

    /// Worst record of `statistic`, `None` before the first sample.
    #[must_use]
    pub fn worst(&self, statistic: Statistic) -> Option<WorstRecord> {
        self.records
            .iter()
            .find(|(existing, _)| *existing == statistic)
            .map(|(_, record)| *record)
    }
}
