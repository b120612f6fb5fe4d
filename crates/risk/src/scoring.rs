//! Likelihood × impact scoring.
//!
//! Levels map to weights `{1, 1, 2, 3, 4}`; `very_low` and `low` share the
//! bottom weight. A risk score is the product of the two weights (1 to 16).

use qms_core::{Priority, Risk, RiskLevel};

/// Weight of a level.
pub fn level_weight(level: RiskLevel) -> u32 {
    match level {
        RiskLevel::VeryLow => 1,
        RiskLevel::Low => 1,
        RiskLevel::Medium => 2,
        RiskLevel::High => 3,
        RiskLevel::VeryHigh => 4,
    }
}

/// Weight of an axis that may not be assessed yet. Unassessed weighs 1.
pub fn axis_weight(level: Option<RiskLevel>) -> u32 {
    level.map_or(1, level_weight)
}

/// Score of a likelihood/impact pair.
pub fn risk_score(likelihood: RiskLevel, impact: RiskLevel) -> u32 {
    level_weight(likelihood) * level_weight(impact)
}

/// Priority tier of a score.
pub fn priority_for_score(score: u32) -> Priority {
    match score {
        s if s >= 16 => Priority::Critical,
        s if s >= 9 => Priority::High,
        s if s >= 4 => Priority::Medium,
        _ => Priority::Low,
    }
}

/// Priority tier of a likelihood/impact pair.
pub fn calculate_priority(likelihood: RiskLevel, impact: RiskLevel) -> Priority {
    priority_for_score(risk_score(likelihood, impact))
}

/// Score of a risk as recorded, treating unassessed axes as weight 1.
pub fn score_of(risk: &Risk) -> u32 {
    axis_weight(risk.likelihood) * axis_weight(risk.impact)
}

/// Impact is very high and likelihood is high or very high.
///
/// This is independent of the register's top-N view.
pub fn is_critical(risk: &Risk) -> bool {
    risk.impact == Some(RiskLevel::VeryHigh)
        && matches!(risk.likelihood, Some(RiskLevel::High | RiskLevel::VeryHigh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use RiskLevel::*;

    #[test]
    fn test_weights() {
        assert_eq!(level_weight(VeryLow), 1);
        assert_eq!(level_weight(Low), 1);
        assert_eq!(level_weight(Medium), 2);
        assert_eq!(level_weight(High), 3);
        assert_eq!(level_weight(VeryHigh), 4);
        assert_eq!(axis_weight(None), 1);
    }

    #[test]
    fn test_very_low_and_low_score_alike() {
        for x in RiskLevel::ALL {
            assert_eq!(risk_score(VeryLow, x), risk_score(Low, x));
            assert_eq!(risk_score(x, VeryLow), risk_score(x, Low));
        }
    }

    #[test]
    fn test_all_25_combinations() {
        for likelihood in RiskLevel::ALL {
            for impact in RiskLevel::ALL {
                let score = risk_score(likelihood, impact);
                assert_eq!(score, level_weight(likelihood) * level_weight(impact));

                let expected = match score {
                    16 => Priority::Critical,
                    9 | 12 => Priority::High,
                    4 | 6 | 8 => Priority::Medium,
                    1 | 2 | 3 => Priority::Low,
                    other => panic!("unexpected score {other}"),
                };
                assert_eq!(calculate_priority(likelihood, impact), expected, "{likelihood} x {impact}");
            }
        }
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(priority_for_score(3), Priority::Low);
        assert_eq!(priority_for_score(4), Priority::Medium);
        assert_eq!(priority_for_score(8), Priority::Medium);
        assert_eq!(priority_for_score(9), Priority::High);
        assert_eq!(priority_for_score(15), Priority::High);
        assert_eq!(priority_for_score(16), Priority::Critical);
    }

    #[test]
    fn test_is_critical() {
        let mut risk = Risk::new("R1", "Plant fire");
        assert!(!is_critical(&risk));

        risk.impact = Some(VeryHigh);
        risk.likelihood = Some(High);
        assert!(is_critical(&risk));

        risk.likelihood = Some(VeryHigh);
        assert!(is_critical(&risk));

        risk.likelihood = Some(Medium);
        assert!(!is_critical(&risk));

        risk.likelihood = Some(VeryHigh);
        risk.impact = Some(High);
        assert!(!is_critical(&risk));
    }

    #[test]
    fn test_unassessed_score() {
        let mut risk = Risk::new("R1", "x");
        assert_eq!(score_of(&risk), 1);
        risk.impact = Some(VeryHigh);
        assert_eq!(score_of(&risk), 4);
    }
}
