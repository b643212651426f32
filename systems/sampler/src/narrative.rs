use serde::Serialize;

use crate::checks::{evaluate_fairness_checks, CheckResult};
use crate::summary::FairnessSummary;
use crate::thresholds::FairnessThresholds;

/// Line-oriented fairness report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FairnessNarrative {
    /// Individual check outcomes.
    pub checks: Vec<CheckResult>,
    /// Report lines: header, one line per check, closing tally.
    pub lines: Vec<String>,
}

impl FairnessNarrative {
    /// Returns `true` when every check passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }
}

/// Evaluates the checks and renders them as a report.
#[must_use]
pub fn build_fairness_narrative(
    summary: &FairnessSummary,
    thresholds: &FairnessThresholds,
) -> FairnessNarrative {
    let checks = evaluate_fairness_checks(summary, thresholds);
    let mut lines = Vec::with_capacity(checks.len() + 2);

    let header = match (summary.first_seed, summary.last_seed) {
        (Some(first), Some(last)) => format!(
            "Fairness sample: {} scenarios, seeds {}, {} regenerated",
            summary.sample_size,
            seed_range(first, last),
            summary.regenerated
        ),
        _ => String::from("Fairness sample: no scenarios"),
    };
    lines.push(header);
    lines.extend(checks.iter().map(|check| check.text.clone()));

    let passed = checks.iter().filter(|check| check.passed).count();
    lines.push(format!("{passed}/{} checks passed", checks.len()));

    FairnessNarrative { checks, lines }
}

/// Renders the sampled seeds. Sampling restarts at seed one after
/// `u64::MAX`, so a wrapped sample is shown as two ranges.
fn seed_range(first: u64, last: u64) -> String {
    if first <= last {
        format!("{first}..={last}")
    } else {
        format!("{first}..={} then 1..={last}", u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::tests::metrics;

    #[test]
    fn narrative_has_header_checks_and_tally() {
        let mut summary = FairnessSummary::new();
        summary.record(5, &metrics(100.0, 25.0, 4), false);
        summary.record(6, &metrics(150.0, 25.0, 4), true);

        let narrative = build_fairness_narrative(&summary, &FairnessThresholds::default());
        assert_eq!(narrative.lines.len(), narrative.checks.len() + 2);
        assert_eq!(
            narrative.lines[0],
            "Fairness sample: 2 scenarios, seeds 5..=6, 1 regenerated"
        );
        let tally = narrative.lines.last().expect("tally line");
        let expected = format!("{0}/{0} checks passed", narrative.checks.len());
        assert_eq!(tally, &expected);
        assert!(narrative.all_passed());
    }

    #[test]
    fn empty_summary_renders_placeholder_header() {
        let thresholds = FairnessThresholds::default();
        let narrative = build_fairness_narrative(&FairnessSummary::new(), &thresholds);
        assert_eq!(narrative.lines[0], "Fairness sample: no scenarios");
        assert!(!narrative.all_passed());
    }

    #[test]
    fn sample_wrapping_past_the_last_seed_is_split() {
        let mut summary = FairnessSummary::new();
        summary.record(u64::MAX - 1, &metrics(100.0, 25.0, 4), false);
        summary.record(u64::MAX, &metrics(100.0, 25.0, 4), false);
        summary.record(1, &metrics(100.0, 25.0, 4), false);

        let narrative = build_fairness_narrative(&summary, &FairnessThresholds::default());
        let expected = format!("seeds {}..={} then 1..=1,", u64::MAX - 1, u64::MAX);
        let header = &narrative.lines[0];
        assert!(header.contains(&expected), "{header}");
        assert!(header.starts_with("Fairness sample: 3 scenarios"));
    }
}
