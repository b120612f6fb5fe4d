//! Internal audits (clause 9.2) and management reviews (clause 9.3).

use serde::{Deserialize, Serialize};
use crate::id::{AuditId, ReviewId};
use crate::organization::{Impact, Issue};
use crate::risk::{ActionStatus, Priority, RiskLevel};
use crate::Time;

/// An audit and everything recorded against it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Audit {
    /// Unique identifier
    pub id: AuditId,

    /// Title
    pub title: String,

    /// Kind of audit
    #[serde(rename = "type")]
    pub audit_type: AuditType,

    /// What is audited
    pub scope: AuditScope,

    /// Planned start
    pub planned_start_date: Option<Time>,

    /// Planned end
    pub planned_end_date: Option<Time>,

    /// Set when the audit starts
    pub actual_start_date: Option<Time>,

    /// Set when the audit completes
    pub actual_end_date: Option<Time>,

    /// Audit team
    pub auditors: Vec<AuditParticipant>,

    /// People audited
    pub auditees: Vec<AuditParticipant>,

    /// Findings raised
    pub findings: Vec<AuditFinding>,

    /// Recommendations raised
    pub recommendations: Vec<AuditRecommendation>,

    /// Final report
    pub report: Option<AuditReport>,

    /// Lifecycle status
    pub status: AuditStatus,

    /// Risk of the audit itself
    pub risk_assessment: AuditRisk,

    /// When created
    pub created: Option<Time>,

    /// Last modified
    pub modified: Option<Time>,
}

impl Audit {
    /// Create an audit with a scope description.
    pub fn new(id: impl Into<AuditId>, title: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            scope: AuditScope {
                description: scope.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Kind of audit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditType {
    /// Internal
    #[default]
    Internal,
    /// External
    External,
    /// Certification
    Certification,
    /// Supplier
    Supplier,
    /// Process
    Process,
    /// System
    System,
}

/// What an audit covers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditScope {
    /// Description
    pub description: String,
    /// Processes covered
    pub processes: Vec<String>,
    /// Sites covered
    pub locations: Vec<String>,
    /// Departments covered
    pub departments: Vec<String>,
    /// ISO 9001 clauses covered
    pub clauses: Vec<String>,
    /// Areas left out
    pub exclusions: Vec<String>,
    /// What the audit should establish
    pub objectives: Vec<String>,
}

/// An auditor or auditee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditParticipant {
    /// Identifier
    pub id: String,
    /// Name
    pub name: String,
    /// Role
    pub role: String,
    /// Competences
    pub competence: Vec<String>,
}

/// A finding raised during an audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditFinding {
    /// Identifier
    pub id: String,

    /// Clause the finding refers to
    pub clause: String,

    /// What was found
    pub description: String,

    /// Objective evidence
    pub evidence: String,

    /// How serious it is
    pub severity: NonconformitySeverity,

    /// Kind of finding
    pub category: AuditFindingCategory,

    /// Root cause, once known
    pub root_cause: String,

    /// Process concerned
    pub process: String,

    /// Who must respond
    pub responsible: String,

    /// Response due
    pub due_date: Option<Time>,

    /// Tracking status
    pub status: AuditFindingStatus,

    /// Corrective actions taken
    pub corrective_actions: Vec<CorrectiveAction>,

    /// When recorded
    pub created: Option<Time>,
}

impl AuditFinding {
    /// True when the finding is still open and its due date has passed.
    pub fn is_overdue(&self, now: Time) -> bool {
        self.status != AuditFindingStatus::Closed && self.due_date.is_some_and(|due| due < now)
    }
}

/// Severity of an audit finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonconformitySeverity {
    /// Critical
    Critical,
    /// Major
    Major,
    /// Minor
    #[default]
    Minor,
    /// Observation, not a nonconformity
    Observation,
}

/// Category of an audit finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditFindingCategory {
    /// Nonconformance
    #[default]
    Nonconformance,
    /// Opportunity
    Opportunity,
    /// Compliance
    Compliance,
    /// System
    System,
    /// Process
    Process,
    /// Documentation
    Documentation,
}

/// Tracking status of an audit finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditFindingStatus {
    /// Open
    #[default]
    Open,
    /// In progress
    InProgress,
    /// Closed
    Closed,
    /// Accepted
    Accepted,
}

/// A corrective action against a finding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectiveAction {
    /// Identifier
    pub id: String,
    /// Description
    pub description: String,
    /// Identified root cause
    pub root_cause: String,
    /// Actions to take
    pub actions: Vec<String>,
    /// Who is responsible
    pub responsible: String,
    /// When it is due
    pub due_date: Option<Time>,
    /// Progress
    pub status: ActionStatus,
    /// How effectiveness was verified
    pub verification: String,
}

/// A recommendation raised by an audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditRecommendation {
    /// Identifier
    pub id: String,
    /// Description
    pub description: String,
    /// Priority tier
    pub priority: Option<Priority>,
    /// Category
    pub category: String,
    /// Who is responsible
    pub responsible: String,
    /// Target date
    pub timeline: Option<Time>,
    /// Progress
    pub status: ActionStatus,
}

/// The report issued at the end of an audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditReport {
    /// Identifier
    pub id: String,
    /// Executive summary
    pub summary: String,
    /// Overall conclusions
    pub conclusions: String,
    /// Assessment of QMS effectiveness
    pub effectiveness: String,
    /// Recommendations raised
    pub recommendations: Vec<AuditRecommendation>,
    /// When issued
    pub issued_date: Option<Time>,
    /// Reviewer
    pub reviewed_by: String,
    /// Approver
    pub approved_by: String,
}

/// Audit lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// Planned
    #[default]
    Planned,
    /// In progress
    InProgress,
    /// Completed
    Completed,
    /// Reported
    Reported,
    /// Closed
    Closed,
}

impl AuditStatus {
    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Planned => "planned",
            AuditStatus::InProgress => "in_progress",
            AuditStatus::Completed => "completed",
            AuditStatus::Reported => "reported",
            AuditStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk assessment of the audit itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditRisk {
    /// Risk level
    pub level: Option<RiskLevel>,
    /// Description
    pub description: String,
    /// Planned mitigations
    pub mitigations: Vec<String>,
}

/// A management review (clause 9.3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementReview {
    /// Unique identifier
    pub id: ReviewId,

    /// Title
    pub title: String,

    /// When held
    pub date: Option<Time>,

    /// Who attended
    pub attendees: Vec<ReviewAttendee>,

    /// Inputs (clause 9.3.2)
    pub inputs: ReviewInputs,

    /// Outputs (clause 9.3.3)
    pub outputs: ReviewOutputs,

    /// Status
    pub status: ReviewStatus,

    /// When created
    pub created: Option<Time>,
}

impl ManagementReview {
    /// Create a pending review.
    pub fn new(id: impl Into<ReviewId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Someone attending a management review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewAttendee {
    /// Identifier
    pub id: String,
    /// Name
    pub name: String,
    /// Role
    pub role: String,
    /// Attended the review
    pub present: bool,
}

/// What management reviews.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewInputs {
    /// Status of actions from previous reviews
    pub status_of_actions: Vec<String>,

    /// Changes in external issues
    pub changes_external_issues: Vec<Issue>,

    /// Changes in internal issues
    pub changes_internal_issues: Vec<Issue>,

    /// Overall QMS performance
    pub qms_performance: String,

    /// Audit results summarised for the review
    pub internal_audit_results: Vec<AuditResultSummary>,

    /// Improvement opportunities raised as input
    pub opportunities_improvement: Vec<ImprovementOpportunity>,
}

/// Audit outcome as presented to management review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditResultSummary {
    /// Audit summarized
    pub audit_id: String,
    /// Overall outcome
    pub overall_result: String,
    /// Number of findings
    pub findings_count: usize,
    /// Number of critical findings
    pub critical_findings: usize,
}

/// Decisions coming out of a management review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewOutputs {
    /// Opportunities for improvement
    pub improvement_opportunities: Vec<ImprovementOpportunity>,
    /// Changes to the QMS
    pub qms_changes: Vec<QmsChange>,
    /// Resource needs
    pub resource_needs: Vec<String>,
    /// Follow-up actions
    pub action_items: Vec<ActionItem>,
    /// Next review
    pub next_review_date: Option<Time>,
}

/// An improvement opportunity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovementOpportunity {
    /// Identifier
    pub id: String,
    /// Description
    pub description: String,
    /// Priority tier
    pub priority: Option<Priority>,
    /// Category
    pub category: String,
    /// Expected benefits
    pub benefits: Vec<String>,
}

/// A change to the QMS decided in review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QmsChange {
    /// Identifier
    pub id: String,
    /// Description
    pub description: String,
    /// Kind of change
    #[serde(rename = "type")]
    pub change_type: String,
    /// Expected impact
    pub impact: Option<Impact>,
    /// Target date
    pub timeline: Option<Time>,
}

/// A follow-up action from review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionItem {
    /// Identifier
    pub id: String,
    /// Description
    pub description: String,
    /// Who is responsible
    pub responsible: String,
    /// When it is due
    pub due_date: Option<Time>,
    /// Priority tier
    pub priority: Option<Priority>,
    /// Progress
    pub status: ActionStatus,
}

/// Management review status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Pending
    #[default]
    Pending,
    /// Completed
    Completed,
    /// Overdue
    Overdue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_new_audit_is_planned() {
        let audit = Audit::new("AUDIT-1", "Q1 internal audit", "Production processes");
        assert_eq!(audit.status, AuditStatus::Planned);
        assert_eq!(audit.audit_type, AuditType::Internal);
        assert_eq!(audit.scope.description, "Production processes");
    }

    #[test]
    fn test_finding_overdue() {
        let now = Utc::now();
        let mut finding = AuditFinding {
            due_date: Some(now - Duration::days(3)),
            ..Default::default()
        };
        assert!(finding.is_overdue(now));

        finding.status = AuditFindingStatus::Closed;
        assert!(!finding.is_overdue(now));

        finding.status = AuditFindingStatus::Open;
        finding.due_date = None;
        assert!(!finding.is_overdue(now));
    }

    #[test]
    fn test_audit_json_tags() {
        let audit: Audit = serde_json::from_str(
            r#"{"id":"A1","title":"t","type":"supplier","status":"in_progress","findings":[{"severity":"major"}]}"#,
        )
        .unwrap();
        assert_eq!(audit.audit_type, AuditType::Supplier);
        assert_eq!(audit.status, AuditStatus::InProgress);
        assert_eq!(audit.findings[0].severity, NonconformitySeverity::Major);
    }
}
