//! Tuning surface for every stage of the placement pipeline.

use outposts_core::{MAP_HEIGHT, MAP_WIDTH, PLAYER_COUNT};

/// Aggregated tuning knobs controlling every adjustable aspect of generation.
#[derive(Clone, Debug, Default)]
pub struct GeneratorTuning {
    /// Headquarters ring placement.
    pub anchors: AnchorTuning,
    /// Satellite cluster rejection sampling around each headquarters.
    pub clusters: ClusterTuning,
    /// Staged neutral placement.
    pub neutrals: NeutralTuning,
    /// Bounds on how many neutrals may sit near the map centre.
    pub center: CenterOccupancy,
    /// Score-based improvement and reach balancing passes.
    pub optimizer: OptimizerTuning,
    /// Post-normalisation rebalancer.
    pub rebalance: RebalanceTuning,
    /// Fit-to-map rescaling.
    pub normalize: NormalizeTuning,
    /// Restart policy applied when an attempt fails its acceptance gate.
    pub regeneration: RegenerationTuning,
}

/// Parameters for the headquarters ring.
#[derive(Clone, Debug)]
pub struct AnchorTuning {
    /// Drone travel speed in world units per second.
    pub drone_speed: f64,
    /// Seconds a drone needs to cross between neighbouring headquarters.
    pub hq_travel_seconds: f64,
}

impl Default for AnchorTuning {
    fn default() -> Self {
        Self {
            drone_speed: 30.0,
            hq_travel_seconds: 24.0,
        }
    }
}

impl AnchorTuning {
    /// Minimum distance between neighbouring headquarters.
    #[must_use]
    pub fn min_hq_distance(&self) -> f64 {
        self.drone_speed * self.hq_travel_seconds
    }

    /// Radius of the ring that yields [`AnchorTuning::min_hq_distance`]
    /// between neighbours.
    #[must_use]
    pub fn ring_radius(&self) -> f64 {
        let half_step = std::f64::consts::PI / PLAYER_COUNT as f64;
        self.min_hq_distance() / (2.0 * half_step.sin())
    }
}

/// Satellite rejection sampling parameters.
#[derive(Clone, Debug)]
pub struct ClusterTuning {
    /// Candidate draws allowed per satellite slot.
    pub attempts_per_satellite: u32,
    /// Half-angle in degrees of the wedge around the HQ's facing direction.
    pub half_spread_deg: f64,
    /// Closest a satellite may sit to its own headquarters.
    pub min_radius: f64,
    /// Farthest a satellite may sit from its own headquarters.
    pub max_radius: f64,
    /// Minimum distance between two satellites of the same player.
    pub sibling_min_distance: f64,
    /// Minimum angular separation around the HQ between sibling satellites.
    pub sibling_min_angle_deg: f64,
    /// How much farther the nearest enemy HQ must be than the own HQ.
    pub foreign_margin: f64,
    /// Sonar radius of an enemy headquarters.
    pub enemy_sonar_radius: f64,
    /// Extra clearance kept outside an enemy headquarters' sonar radius.
    pub sonar_buffer: f64,
    /// Minimum distance to any structure owned by another player.
    pub foreign_min_distance: f64,
}

impl Default for ClusterTuning {
    fn default() -> Self {
        Self {
            attempts_per_satellite: 80,
            half_spread_deg: 60.0,
            min_radius: 100.0,
            max_radius: 190.0,
            sibling_min_distance: 80.0,
            sibling_min_angle_deg: 18.0,
            foreign_margin: 200.0,
            enemy_sonar_radius: 320.0,
            sonar_buffer: 60.0,
            foreign_min_distance: 240.0,
        }
    }
}

/// Radius band measured from an anchor point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusBand {
    /// Inner radius.
    pub min: f64,
    /// Outer radius.
    pub max: f64,
}

impl RadiusBand {
    /// Creates a new band.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Named outer layouts used when a mid-band draw fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateKind {
    /// Tight group just outside the centre.
    Cluster,
    /// Ring midway between the centre and the headquarters.
    Belt,
    /// Loose scatter out toward the headquarters ring.
    Sprawl,
}

/// Outer fill template: a radius band around the map centre and an angular
/// jitter around a wedge centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OuterTemplate {
    /// Name of the template.
    pub kind: TemplateKind,
    /// Distance band from the map centre.
    pub band: RadiusBand,
    /// Maximum deviation in degrees from the wedge centre.
    pub jitter_deg: f64,
}

/// Default cluster, belt and sprawl templates.
pub const OUTER_TEMPLATES: [OuterTemplate; 3] = [
    OuterTemplate {
        kind: TemplateKind::Cluster,
        band: RadiusBand::new(260.0, 380.0),
        jitter_deg: 12.0,
    },
    OuterTemplate {
        kind: TemplateKind::Belt,
        band: RadiusBand::new(420.0, 560.0),
        jitter_deg: 24.0,
    },
    OuterTemplate {
        kind: TemplateKind::Sprawl,
        band: RadiusBand::new(560.0, 720.0),
        jitter_deg: 34.0,
    },
];

/// Parameters for the centre cluster stage.
#[derive(Clone, Debug)]
pub struct CenterClusterTuning {
    /// Distance band from the map centre.
    pub band: RadiusBand,
    /// Minimum distance to every headquarters.
    pub hq_clearance: f64,
    /// Minimum angular distance in degrees from any wedge centre.
    pub wedge_guard_deg: f64,
    /// Total candidate draws for the stage.
    pub attempts: u32,
}

impl Default for CenterClusterTuning {
    fn default() -> Self {
        Self {
            band: RadiusBand::new(60.0, 250.0),
            hq_clearance: 320.0,
            wedge_guard_deg: 8.0,
            attempts: 300,
        }
    }
}

/// Parameters for the per-player backfield stage.
#[derive(Clone, Debug)]
pub struct BackfieldTuning {
    /// Distance band behind the headquarters.
    pub band: RadiusBand,
    /// Maximum deviation in degrees from the outward direction.
    pub jitter_deg: f64,
    /// Candidate draws per headquarters.
    pub attempts: u32,
}

impl Default for BackfieldTuning {
    fn default() -> Self {
        Self {
            band: RadiusBand::new(140.0, 220.0),
            jitter_deg: 35.0,
            attempts: 60,
        }
    }
}

/// Parameters for the rotating mid/outer fill stage.
#[derive(Clone, Debug)]
pub struct FillTuning {
    /// Distance band from the map centre for the primary draw.
    pub band: RadiusBand,
    /// Primary draws per round.
    pub attempts: u32,
    /// Template draws per round after the primary draws fail.
    pub template_attempts: u32,
    /// Rounds before the stage gives up.
    pub rounds: u32,
    /// Outer templates used as fallback.
    pub templates: [OuterTemplate; 3],
}

impl Default for FillTuning {
    fn default() -> Self {
        Self {
            band: RadiusBand::new(320.0, 540.0),
            attempts: 40,
            template_attempts: 40,
            rounds: 40,
            templates: OUTER_TEMPLATES,
        }
    }
}

/// Parameters for the relaxed top-up stage.
#[derive(Clone, Debug)]
pub struct TopUpTuning {
    /// Distance band from the map centre.
    pub band: RadiusBand,
    /// Minimum angular distance in degrees from any wedge centre.
    pub wedge_guard_deg: f64,
    /// Total candidate draws for the stage.
    pub attempts: u32,
}

impl Default for TopUpTuning {
    fn default() -> Self {
        Self {
            band: RadiusBand::new(200.0, 780.0),
            wedge_guard_deg: 3.0,
            attempts: 600,
        }
    }
}

/// Staged neutral placement parameters.
#[derive(Clone, Debug)]
pub struct NeutralTuning {
    /// Minimum distance from a neutral to any other structure.
    pub min_separation: f64,
    /// Centre cluster stage.
    pub center: CenterClusterTuning,
    /// Backfield stage.
    pub backfield: BackfieldTuning,
    /// Mid/outer fill stage.
    pub fill: FillTuning,
    /// Relaxed top-up stage.
    pub top_up: TopUpTuning,
}

impl Default for NeutralTuning {
    fn default() -> Self {
        Self {
            min_separation: 100.0,
            center: CenterClusterTuning::default(),
            backfield: BackfieldTuning::default(),
            fill: FillTuning::default(),
            top_up: TopUpTuning::default(),
        }
    }
}

/// How many neutrals may sit within the central radius.
#[derive(Clone, Debug)]
pub struct CenterOccupancy {
    /// Radius around the map centre that counts as "centre".
    pub radius: f64,
    /// Fewest neutrals allowed in the centre. The centre cluster stage seeds
    /// this many.
    pub min_count: usize,
    /// Most neutrals allowed in the centre.
    pub max_count: usize,
}

impl Default for CenterOccupancy {
    fn default() -> Self {
        Self {
            radius: 300.0,
            min_count: 3,
            max_count: 7,
        }
    }
}

impl CenterOccupancy {
    /// Returns `true` when `count` lies within the allowed range.
    #[must_use]
    pub fn admits(&self, count: usize) -> bool {
        (self.min_count..=self.max_count).contains(&count)
    }

    /// Distance of `count` from the allowed range.
    #[must_use]
    pub fn violation(&self, count: usize) -> usize {
        if count < self.min_count {
            self.min_count - count
        } else {
            count.saturating_sub(self.max_count)
        }
    }
}

/// Weights combined into the improvement penalty score.
#[derive(Clone, Debug)]
pub struct ScoreWeights {
    /// Near-band count imbalance.
    pub near: f64,
    /// Mid-band count imbalance.
    pub mid: f64,
    /// Near plus mid imbalance.
    pub near_mid: f64,
    /// Nearest-two reach spread, per [`OptimizerTuning::reach_scale`] units.
    pub reach: f64,
    /// Angular variance deficit.
    pub angle: f64,
    /// Centre occupancy violation per missing or surplus neutral.
    pub center: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            near: 3.0,
            mid: 1.5,
            near_mid: 2.0,
            reach: 1.0,
            angle: 3.0,
            center: 4.0,
        }
    }
}

/// Local search parameters for the improvement and reach passes.
#[derive(Clone, Debug)]
pub struct OptimizerTuning {
    /// Proposals evaluated by the improvement pass.
    pub iterations: u32,
    /// Probability that a proposal is drawn from the centre band.
    pub center_proposal_chance: f64,
    /// Near band radius around each headquarters.
    pub near_radius: f64,
    /// Mid band outer radius around each headquarters.
    pub mid_radius: f64,
    /// Neutral angular standard deviation in degrees below which layouts are
    /// penalised as too regular.
    pub angle_target_deg: f64,
    /// Penalty weights.
    pub weights: ScoreWeights,
    /// Divisor converting reach spread into penalty units.
    pub reach_scale: f64,
    /// Reach spread the balancing pass settles for.
    pub reach_tolerance: f64,
    /// Relocations attempted by the balancing pass.
    pub reach_attempts: u32,
    /// Angular jitter in degrees around the HQ's facing direction.
    pub reach_jitter_deg: f64,
    /// Distance band from the headquarters for relocated neutrals.
    pub reach_band: RadiusBand,
}

impl Default for OptimizerTuning {
    fn default() -> Self {
        Self {
            iterations: 400,
            center_proposal_chance: 0.3,
            near_radius: 300.0,
            mid_radius: 550.0,
            angle_target_deg: 14.0,
            weights: ScoreWeights::default(),
            reach_scale: 100.0,
            reach_tolerance: 60.0,
            reach_attempts: 200,
            reach_jitter_deg: 60.0,
            reach_band: RadiusBand::new(140.0, 260.0),
        }
    }
}

/// Post-normalisation rebalancer parameters.
#[derive(Clone, Debug)]
pub struct RebalanceTuning {
    /// Alternating iterations.
    pub iterations: u32,
    /// Sampled candidates per iteration.
    pub candidates: u32,
    /// Nearest-two spread above which the overage penalty grows.
    pub reach_limit: f64,
    /// Isolation range above which the overage penalty grows.
    pub isolation_limit: f64,
    /// Angular jitter in degrees around the HQ's facing direction.
    pub jitter_deg: f64,
    /// Closest a candidate may sit to the worst-off headquarters.
    pub min_radius: f64,
    /// Farthest a candidate may sit, as a fraction of the HQ-centre distance.
    pub reach_fraction: f64,
    /// Angular offsets in degrees of the fallback grid.
    pub grid_angles_deg: Vec<f64>,
    /// Radii of the fallback grid.
    pub grid_radii: Vec<f64>,
}

impl Default for RebalanceTuning {
    fn default() -> Self {
        Self {
            iterations: 60,
            candidates: 24,
            reach_limit: 180.0,
            isolation_limit: 180.0,
            jitter_deg: 45.0,
            min_radius: 150.0,
            reach_fraction: 0.6,
            grid_angles_deg: vec![-40.0, -20.0, 0.0, 20.0, 40.0],
            grid_radii: vec![160.0, 220.0, 280.0, 340.0],
        }
    }
}

/// Fit-to-map parameters.
#[derive(Clone, Debug)]
pub struct NormalizeTuning {
    /// Margin as a fraction of the smaller map dimension.
    pub margin_fraction: f64,
}

impl Default for NormalizeTuning {
    fn default() -> Self {
        Self {
            margin_fraction: 0.02,
        }
    }
}

impl NormalizeTuning {
    /// Margin kept between the layout and the map edges.
    #[must_use]
    pub fn margin(&self) -> f64 {
        MAP_WIDTH.min(MAP_HEIGHT) * self.margin_fraction
    }
}

/// Restart policy for failed attempts.
#[derive(Clone, Debug)]
pub struct RegenerationTuning {
    /// Attempts, including the first, before generation reports failure.
    pub max_attempts: u32,
}

impl Default for RegenerationTuning {
    fn default() -> Self {
        Self { max_attempts: 32 }
    }
}
