use std::fmt;

use serde::Serialize;

use crate::summary::{FairnessSummary, Statistic};
use crate::thresholds::FairnessThresholds;

/// How a worst value is compared with its threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Comparison {
    /// Passes when `value <= threshold`.
    AtMost,
    /// Passes when `value >= threshold`.
    AtLeast,
    /// Passes when `value > threshold`.
    GreaterThan,
}

impl Comparison {
    /// Applies the comparison.
    #[must_use]
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::AtMost => value <= threshold,
            Self::AtLeast => value >= threshold,
            Self::GreaterThan => value > threshold,
        }
    }

    /// Operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::AtMost => "<=",
            Self::AtLeast => ">=",
            Self::GreaterThan => ">",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Outcome of comparing one summary statistic with its threshold.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CheckResult {
    /// Machine-readable key of the statistic.
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Worst value observed, `None` when nothing was sampled.
    pub value: Option<f64>,
    /// Seed that produced the worst value.
    pub seed: Option<u64>,
    /// Limit the value is compared with.
    pub threshold: f64,
    /// Comparison applied.
    pub comparison: Comparison,
    /// Whether the check passed. Always `false` without samples.
    pub passed: bool,
    /// Rendered report line.
    pub text: String,
}

fn limit(statistic: Statistic, thresholds: &FairnessThresholds) -> (f64, Comparison) {
    use Comparison::{AtLeast, AtMost, GreaterThan};
    match statistic {
        Statistic::HqRadiusSpread => (thresholds.max_hq_radius_spread, AtMost),
        Statistic::HqAngleDeviation => (thresholds.max_hq_angle_deviation_deg, AtMost),
        Statistic::HqMinDistance => (thresholds.min_hq_distance, AtLeast),
        Statistic::SatelliteDistanceMin => (thresholds.min_satellite_distance, AtLeast),
        Statistic::SatelliteDistanceMax => (thresholds.max_satellite_distance, AtMost),
        Statistic::SatelliteAngleStddev => (thresholds.min_satellite_angle_stddev_deg, AtLeast),
        Statistic::NeutralAngleStddev => (thresholds.min_neutral_angle_stddev_deg, AtLeast),
        Statistic::NearCountRange => (thresholds.max_near_count_range as f64, AtMost),
        Statistic::MidCountRange => (thresholds.max_mid_count_range as f64, AtMost),
        Statistic::NearMidCountRange => (thresholds.max_near_mid_count_range as f64, AtMost),
        Statistic::FarCountRange => (thresholds.max_far_count_range as f64, AtMost),
        Statistic::NeutralReachSpread => (thresholds.max_neutral_reach_spread, AtMost),
        Statistic::IsolationRange => (thresholds.max_isolation_range, AtMost),
        Statistic::CenterNeutralsMin => (thresholds.min_center_neutrals as f64, AtLeast),
        Statistic::CenterNeutralsMax => (thresholds.max_center_neutrals as f64, AtMost),
        Statistic::StructureClearance => (thresholds.min_structure_clearance, GreaterThan),
        Statistic::VisibleNeutralRange => (thresholds.max_visible_neutral_range as f64, AtMost),
        Statistic::VisibleEnemyMax => (thresholds.max_visible_enemies as f64, AtMost),
        Statistic::ConnectivityRange => (thresholds.max_connectivity_range as f64, AtMost),
        Statistic::FoundryAccessRange => (thresholds.max_foundry_access_range as f64, AtMost),
        Statistic::ReactorAccessRange => (thresholds.max_reactor_access_range as f64, AtMost),
    }
}

/// Compares every summary statistic with its threshold, in report order.
#[must_use]
pub fn evaluate_fairness_checks(
    summary: &FairnessSummary,
    thresholds: &FairnessThresholds,
) -> Vec<CheckResult> {
    Statistic::ALL
        .iter()
        .map(|statistic| {
            let (threshold, comparison) = limit(*statistic, thresholds);
            let worst = summary.worst(*statistic);
            let passed = worst.is_some_and(|record| comparison.holds(record.value, threshold));
            let verdict = if passed { "PASS" } else { "FAIL" };
            let text = match worst {
                Some(record) => format!(
                    "[{verdict}] {}: worst {:.2} (seed {}) {comparison} {threshold:.2}",
                    statistic.label(),
                    record.value,
                    record.seed
                ),
                None => format!("[{verdict}] {}: no samples", statistic.label()),
            };
            CheckResult {
                key: statistic.key(),
                label: statistic.label(),
                value: worst.map(|record| record.value),
                seed: worst.map(|record| record.seed),
                threshold,
                comparison,
                passed,
                text,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::tests::metrics;

    #[test]
    fn healthy_summary_passes_every_check() {
        let mut summary = FairnessSummary::new();
        summary.record(1, &metrics(120.0, 30.0, 4), false);
        summary.record(2, &metrics(200.0, 12.0, 6), false);

        let checks = evaluate_fairness_checks(&summary, &FairnessThresholds::default());
        assert_eq!(checks.len(), Statistic::ALL.len());
        assert!(checks.iter().all(|check| check.passed), "{checks:#?}");
    }

    #[test]
    fn offending_seed_is_reported() {
        let mut summary = FairnessSummary::new();
        summary.record(7, &metrics(120.0, 30.0, 4), false);
        summary.record(8, &metrics(400.0, 30.0, 9), false);

        let checks = evaluate_fairness_checks(&summary, &FairnessThresholds::default());
        let reach = checks
            .iter()
            .find(|check| check.key == "neutral_reach_spread")
            .expect("reach check present");
        assert!(!reach.passed);
        assert_eq!(reach.seed, Some(8));
        let text = &reach.text;
        assert!(text.starts_with("[FAIL] Neutral reach spread: worst 400.00 (seed 8)"));

        let crowded = checks
            .iter()
            .find(|check| check.key == "center_neutrals_max")
            .expect("centre check present");
        assert!(!crowded.passed);
    }

    #[test]
    fn clearance_must_be_strictly_positive() {
        let mut summary = FairnessSummary::new();
        summary.record(3, &metrics(120.0, 0.0, 4), false);
        let checks = evaluate_fairness_checks(&summary, &FairnessThresholds::default());
        let clearance = checks
            .iter()
            .find(|check| check.key == "min_structure_clearance")
            .expect("clearance check present");
        assert!(!clearance.passed);
        assert_eq!(clearance.comparison, Comparison::GreaterThan);
    }

    #[test]
    fn empty_summary_fails_every_check() {
        let thresholds = FairnessThresholds::default();
        let checks = evaluate_fairness_checks(&FairnessSummary::new(), &thresholds);
        let unanswered = |check: &CheckResult| !check.passed && check.value.is_none();
        assert!(checks.iter().all(unanswered));
        assert!(checks[0].text.ends_with("no samples"));
    }
}
