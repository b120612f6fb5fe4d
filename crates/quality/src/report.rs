//! Compliance reports.

use serde::{Deserialize, Serialize};
use qms_core::{Organization, OrganizationId, Priority, Time, ValidationResult};

use crate::score::{compliance_score, ComplianceLevel};

/// Summary assessment of an organization's compliance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Assessed organization
    pub organization_id: OrganizationId,

    /// When the assessment ran
    pub assessment_date: Time,

    /// Label bucketed from the score
    pub overall_compliance: ComplianceLevel,

    /// Score, 0 to 100
    pub compliance_score: f64,

    /// One per error finding
    pub critical_gaps: Vec<ComplianceGap>,

    /// One per warning finding
    pub improvement_areas: Vec<ImprovementArea>,

    /// Things already in place
    pub strengths: Vec<String>,

    /// Standard next steps
    pub recommendations: Vec<String>,
}

/// A mandatory requirement that is not met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceGap {
    /// Clause with the gap
    pub clause: String,
    /// What is missing
    pub description: String,
    /// "critical" for errors
    pub severity: String,
    /// How urgent
    pub priority: Priority,
}

/// A recommended element that is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprovementArea {
    /// Affected area
    pub area: String,
    /// What is missing
    pub description: String,
    /// How urgent
    pub priority: Priority,
}

const GAP_RECOMMENDATIONS: [&str; 3] = [
    "Address critical compliance gaps immediately",
    "Implement corrective actions for identified nonconformities",
    "Strengthen QMS documentation and procedures",
];

const IMPROVEMENT_RECOMMENDATIONS: [&str; 3] = [
    "Develop action plans for improvement areas",
    "Enhance monitoring and measurement processes",
    "Provide additional training where needed",
];

impl ComplianceReport {
    /// Build a report from an organization and its validation result.
    pub fn from_result(org: &Organization, result: &ValidationResult) -> Self {
        let score = compliance_score(result);

        let critical_gaps: Vec<_> = result
            .errors
            .iter()
            .map(|e| ComplianceGap {
                clause: e.clause.clone(),
                description: e.message.clone(),
                severity: "Critical".to_string(),
                priority: Priority::High,
            })
            .collect();

        let improvement_areas: Vec<_> = result
            .warnings
            .iter()
            .map(|w| ImprovementArea {
                area: w.field.clone(),
                description: w.message.clone(),
                priority: Priority::Medium,
            })
            .collect();

        let mut recommendations = Vec::new();
        if !critical_gaps.is_empty() {
            recommendations.extend(GAP_RECOMMENDATIONS.iter().map(|s| s.to_string()));
        }
        if !improvement_areas.is_empty() {
            recommendations.extend(IMPROVEMENT_RECOMMENDATIONS.iter().map(|s| s.to_string()));
        }

        let mut strengths = Vec::new();
        if org.qms.as_ref().is_some_and(|qms| !qms.processes.is_empty()) {
            strengths.push("Processes are defined and documented".to_string());
        }
        if org.leadership.as_ref().is_some_and(|l| l.quality_policy.is_some()) {
            strengths.push("Quality policy is established and communicated".to_string());
        }

        Self {
            organization_id: org.id.clone(),
            assessment_date: chrono::Utc::now(),
            overall_compliance: ComplianceLevel::from_score(score),
            compliance_score: score,
            critical_gaps,
            improvement_areas,
            strengths,
            recommendations,
        }
    }
}
