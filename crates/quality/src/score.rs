//! Compliance scoring.

use serde::{Deserialize, Serialize};
use qms_core::ValidationResult;

/// Penalty points per error finding. Also the normalisation weight for every finding.
pub const ERROR_WEIGHT: f64 = 3.0;
/// Penalty points per warning finding.
pub const WARNING_WEIGHT: f64 = 1.0;
/// Penalty points per info finding, rounded once over the whole count.
pub const INFO_WEIGHT: f64 = 0.5;

/// Reduce a validation result to a score in `[0, 100]`.
///
/// Penalty is `3E + W + round(0.5 I)`, normalised against every finding being
/// an error. An empty result scores 100.
pub fn compliance_score(result: &ValidationResult) -> f64 {
    let total = result.total_findings();
    if total == 0 {
        return 100.0;
    }

    let errors = result.errors.len() as f64;
    let warnings = result.warnings.len() as f64;
    let infos = result.infos.len() as f64;

    let penalty = ERROR_WEIGHT * errors + WARNING_WEIGHT * warnings + (INFO_WEIGHT * infos).round();
    let max_possible = ERROR_WEIGHT * total as f64;

    (100.0 * (1.0 - penalty / max_possible)).max(0.0)
}

/// Overall compliance label bucketed from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceLevel {
    /// 90 and above
    #[serde(rename = "Excellent")]
    Excellent,
    /// 80 and above
    #[serde(rename = "Good")]
    Good,
    /// 70 and above
    #[serde(rename = "Satisfactory")]
    Satisfactory,
    /// 60 and above
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    /// Below 60
    #[serde(rename = "Critical Gaps")]
    CriticalGaps,
}

impl ComplianceLevel {
    /// Bucket a score.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            ComplianceLevel::Excellent
        } else if score >= 80.0 {
            ComplianceLevel::Good
        } else if score >= 70.0 {
            ComplianceLevel::Satisfactory
        } else if score >= 60.0 {
            ComplianceLevel::NeedsImprovement
        } else {
            ComplianceLevel::CriticalGaps
        }
    }

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceLevel::Excellent => "Excellent",
            ComplianceLevel::Good => "Good",
            ComplianceLevel::Satisfactory => "Satisfactory",
            ComplianceLevel::NeedsImprovement => "Needs Improvement",
            ComplianceLevel::CriticalGaps => "Critical Gaps",
        }
    }
}

impl std::fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(errors: usize, warnings: usize, infos: usize) -> ValidationResult {
        let mut result = ValidationResult::new();
        for _ in 0..errors {
            result.add_error("4.1", "e", "e");
        }
        for _ in 0..warnings {
            result.add_warning("4.1", "w", "w");
        }
        for _ in 0..infos {
            result.add_info("4.1", "i", "i");
        }
        result
    }

    #[test]
    fn test_empty_scores_100() {
        assert_eq!(compliance_score(&ValidationResult::new()), 100.0);
    }

    #[test]
    fn test_any_finding_scores_below_100() {
        for (e, w, i) in [(1, 0, 0), (0, 1, 0), (0, 0, 1), (0, 0, 3), (0, 5, 5)] {
            let score = compliance_score(&result_with(e, w, i));
            assert!(score < 100.0, "({e},{w},{i}) scored {score}");
        }
    }

    #[test]
    fn test_all_errors_scores_zero() {
        assert_eq!(compliance_score(&result_with(4, 0, 0)), 0.0);
    }

    #[test]
    fn test_info_points_rounded_once() {
        // round(0.5 * 3) = 2, not 3 * round(0.5)
        let score = compliance_score(&result_with(0, 0, 3));
        assert!((score - 100.0 * (1.0 - 2.0 / 9.0)).abs() < 1e-9);
    }

    #[test]
    fn test_mixed() {
        // penalty 3*2 + 1*1 + round(0.5) = 8, max 3*4 = 12
        let score = compliance_score(&result_with(2, 1, 1));
        assert!((score - 100.0 * (1.0 - 8.0 / 12.0)).abs() < 1e-9);
    }

    #[test]
    fn test_bounded() {
        for e in 0..6 {
            for w in 0..6 {
                for i in 0..6 {
                    let score = compliance_score(&result_with(e, w, i));
                    assert!((0.0..=100.0).contains(&score));
                }
            }
        }
    }

    #[test]
    fn test_monotonic_in_errors() {
        for w in 0..4 {
            for i in 0..4 {
                let mut previous = compliance_score(&result_with(0, w, i));
                for e in 1..8 {
                    let score = compliance_score(&result_with(e, w, i));
                    assert!(score <= previous + 1e-9, "e={e} w={w} i={i}");
                    previous = score;
                }
            }
        }
    }

    #[test]
    fn test_levels() {
        assert_eq!(ComplianceLevel::from_score(100.0), ComplianceLevel::Excellent);
        assert_eq!(ComplianceLevel::from_score(90.0), ComplianceLevel::Excellent);
        assert_eq!(ComplianceLevel::from_score(89.9), ComplianceLevel::Good);
        assert_eq!(ComplianceLevel::from_score(70.0), ComplianceLevel::Satisfactory);
        assert_eq!(ComplianceLevel::from_score(60.0), ComplianceLevel::NeedsImprovement);
        assert_eq!(ComplianceLevel::from_score(59.99), ComplianceLevel::CriticalGaps);
        assert_eq!(ComplianceLevel::NeedsImprovement.to_string(), "Needs Improvement");
    }
}
