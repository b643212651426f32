use serde::{Deserialize, Serialize};

/// Limits every sampled scenario must respect.
///
/// Missing fields fall back to their defaults when deserialising, so a
/// configuration file only needs to name the limits it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessThresholds {
    /// Largest allowed spread of HQ distances from the map centre.
    pub max_hq_radius_spread: f64,
    /// Largest allowed HQ deviation in degrees from an even ring.
    pub max_hq_angle_deviation_deg: f64,
    /// Smallest allowed distance between two headquarters.
    pub min_hq_distance: f64,
    /// Closest a satellite may sit to its HQ.
    pub min_satellite_distance: f64,
    /// Farthest a satellite may sit from its HQ.
    pub max_satellite_distance: f64,
    /// Smallest allowed satellite angular standard deviation in degrees.
    pub min_satellite_angle_stddev_deg: f64,
    /// Smallest allowed neutral angular standard deviation in degrees.
    pub min_neutral_angle_stddev_deg: f64,
    /// Largest allowed range of near-band neutral counts.
    pub max_near_count_range: usize,
    /// Largest allowed range of mid-band neutral counts.
    pub max_mid_count_range: usize,
    /// Largest allowed range of near plus mid neutral counts.
    pub max_near_mid_count_range: usize,
    /// Largest allowed range of far-band neutral counts.
    pub max_far_count_range: usize,
    /// Largest allowed spread of nearest-two neutral reach.
    pub max_neutral_reach_spread: f64,
    /// Largest allowed isolation range.
    pub max_isolation_range: f64,
    /// Fewest neutrals allowed near the map centre.
    pub min_center_neutrals: usize,
    /// Most neutrals allowed near the map centre.
    pub max_center_neutrals: usize,
    /// Clearance every pair of structures must strictly exceed.
    pub min_structure_clearance: f64,
    /// Largest allowed range of visible neutrals at the start.
    pub max_visible_neutral_range: usize,
    /// Most enemy structures any player may see at the start.
    pub max_visible_enemies: usize,
    /// Largest allowed range of connected neutral counts.
    pub max_connectivity_range: usize,
    /// Largest allowed range of neutral foundry access.
    pub max_foundry_access_range: usize,
    /// Largest allowed range of neutral reactor access.
    pub max_reactor_access_range: usize,
}

impl Default for FairnessThresholds {
    fn default() -> Self {
        Self {
            max_hq_radius_spread: 15.0,
            max_hq_angle_deviation_deg: 3.0,
            min_hq_distance: 650.0,
            min_satellite_distance: 90.0,
            max_satellite_distance: 200.0,
            min_satellite_angle_stddev_deg: 6.0,
            min_neutral_angle_stddev_deg: 5.0,
            max_near_count_range: 2,
            max_mid_count_range: 4,
            max_near_mid_count_range: 4,
            max_far_count_range: 4,
            max_neutral_reach_spread: 350.0,
            max_isolation_range: 300.0,
            min_center_neutrals: 3,
            max_center_neutrals: 7,
            min_structure_clearance: 0.0,
            max_visible_neutral_range: 3,
            max_visible_enemies: 0,
            max_connectivity_range: 5,
            max_foundry_access_range: 5,
            max_reactor_access_range: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FairnessThresholds;

    #[test]
    fn partial_toml_overrides_only_named_limits() {
        let text = "max_neutral_reach_spread = 200.0\nmax_center_neutrals = 6\n";
        let thresholds: FairnessThresholds = toml::from_str(text).expect("thresholds parse");

        assert!((thresholds.max_neutral_reach_spread - 200.0).abs() < f64::EPSILON);
        assert_eq!(thresholds.max_center_neutrals, 6);
        assert_eq!(
            thresholds.min_hq_distance,
            FairnessThresholds::default().min_hq_distance
        );
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let defaults = FairnessThresholds::default();
        let text = toml::to_string(&defaults).expect("thresholds serialize");
        let restored: FairnessThresholds = toml::from_str(&text).expect("thresholds parse");
        assert_eq!(restored, defaults);
    }
}
