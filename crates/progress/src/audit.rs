//! Internal audits (clause 9.2) and management reviews (clause 9.3).
//!
//! Only `start_audit` is guarded: the audit must still be planned. Every
//! other transition is applied as requested.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use qms_core::{
    Audit, AuditFinding, AuditFindingStatus, AuditId, AuditReport, AuditStatus, ManagementReview,
    NonconformitySeverity, QmsError, Result, ReviewId, ReviewOutputs, ReviewStatus, Time,
};

/// Audit counts by status and finding counts by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStatistics {
    /// All audits
    pub total_audits: usize,
    /// Planned
    pub planned: usize,
    /// In progress
    pub in_progress: usize,
    /// Completed
    pub completed: usize,
    /// Reported
    pub reported: usize,
    /// Closed
    pub closed: usize,
    /// All findings
    pub total_findings: usize,
    /// Number of critical findings
    pub critical_findings: usize,
    /// Major findings
    pub major_findings: usize,
    /// Minor findings
    pub minor_findings: usize,
    /// Observations
    pub observations: usize,
    /// Findings not yet closed or accepted
    pub open_findings: usize,
}

/// Manages audits and management reviews.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditManager {
    audits: HashMap<AuditId, Audit>,
    reviews: HashMap<ReviewId, ManagementReview>,
}

fn rejected(err: QmsError) -> QmsError {
    tracing::warn!(error = %err, "Audit operation rejected");
    err
}

impl AuditManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a planned audit, or replace one with the same ID.
    pub fn create_audit(&mut self, mut audit: Audit) -> Result<()> {
        const OP: &str = "create_audit";

        if audit.id.is_empty() {
            return Err(rejected(QmsError::missing(OP, "id")));
        }
        if audit.title.is_empty() {
            return Err(rejected(QmsError::missing(OP, "title")));
        }
        if audit.scope.description.is_empty() {
            return Err(rejected(QmsError::missing(OP, "scope.description")));
        }

        let now = Utc::now();
        audit.created = Some(now);
        audit.modified = Some(now);
        audit.status = AuditStatus::Planned;

        tracing::info!(audit = %audit.id, audit_type = ?audit.audit_type, "Audit created");
        self.audits.insert(audit.id.clone(), audit);
        Ok(())
    }

    /// Move a planned audit to in progress.
    pub fn start_audit(&mut self, id: &AuditId, start: Time) -> Result<()> {
        const OP: &str = "start_audit";

        let audit = self
            .audits
            .get_mut(id)
            .ok_or_else(|| rejected(QmsError::not_found(OP, "audit", id)))?;

        if audit.status != AuditStatus::Planned {
            return Err(rejected(QmsError::InvalidState {
                operation: OP,
                entity: "audit",
                id: id.to_string(),
                actual: audit.status.to_string(),
                expected: AuditStatus::Planned.to_string(),
            }));
        }

        audit.status = AuditStatus::InProgress;
        audit.actual_start_date = Some(start);
        audit.modified = Some(Utc::now());

        tracing::info!(audit = %id, "Audit started");
        Ok(())
    }

    /// Record a finding. Findings without an ID get `F<n>`.
    pub fn add_finding(&mut self, id: &AuditId, mut finding: AuditFinding) -> Result<()> {
        let audit = self
            .audits
            .get_mut(id)
            .ok_or_else(|| rejected(QmsError::not_found("add_finding", "audit", id)))?;

        if finding.id.is_empty() {
            finding.id = format!("F{}", audit.findings.len() + 1);
        }
        let now = Utc::now();
        finding.created = Some(now);

        tracing::info!(audit = %id, finding = %finding.id, severity = ?finding.severity, "Audit finding recorded");
        audit.findings.push(finding);
        audit.modified = Some(now);
        Ok(())
    }

    /// Mark an audit completed with its end date and optional report.
    pub fn complete_audit(&mut self, id: &AuditId, end: Time, report: Option<AuditReport>) -> Result<()> {
        let audit = self
            .audits
            .get_mut(id)
            .ok_or_else(|| rejected(QmsError::not_found("complete_audit", "audit", id)))?;

        audit.status = AuditStatus::Completed;
        audit.actual_end_date = Some(end);
        if report.is_some() {
            audit.report = report;
        }
        audit.modified = Some(Utc::now());

        tracing::info!(audit = %id, findings = audit.findings.len(), "Audit completed");
        Ok(())
    }

    /// Look up an audit.
    pub fn get_audit(&self, id: &AuditId) -> Option<&Audit> {
        self.audits.get(id)
    }

    /// Every audit, by ID.
    pub fn audits(&self) -> Vec<&Audit> {
        let mut all: Vec<_> = self.audits.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Planned audits whose planned start is before `now`.
    pub fn audits_due(&self, now: Time) -> Vec<&Audit> {
        self.audits()
            .into_iter()
            .filter(|a| a.status == AuditStatus::Planned && a.planned_start_date.is_some_and(|d| d < now))
            .collect()
    }

    /// Findings not closed and past their due date, with their audit.
    pub fn overdue_findings(&self, now: Time) -> Vec<(&AuditId, &AuditFinding)> {
        self.audits()
            .into_iter()
            .flat_map(|a| a.findings.iter().map(move |f| (&a.id, f)))
            .filter(|(_, f)| f.is_overdue(now))
            .collect()
    }

    /// Counts by audit status and finding severity.
    pub fn statistics(&self) -> AuditStatistics {
        let mut stats = AuditStatistics {
            total_audits: self.audits.len(),
            ..Default::default()
        };

        for audit in self.audits.values() {
            match audit.status {
                AuditStatus::Planned => stats.planned += 1,
                AuditStatus::InProgress => stats.in_progress += 1,
                AuditStatus::Completed => stats.completed += 1,
                AuditStatus::Reported => stats.reported += 1,
                AuditStatus::Closed => stats.closed += 1,
            }

            for finding in &audit.findings {
                stats.total_findings += 1;
                match finding.severity {
                    NonconformitySeverity::Critical => stats.critical_findings += 1,
                    NonconformitySeverity::Major => stats.major_findings += 1,
                    NonconformitySeverity::Minor => stats.minor_findings += 1,
                    NonconformitySeverity::Observation => stats.observations += 1,
                }
                if finding.status != AuditFindingStatus::Closed {
                    stats.open_findings += 1;
                }
            }
        }

        stats
    }

    /// Register a pending management review.
    pub fn create_review(&mut self, mut review: ManagementReview) -> Result<()> {
        if review.id.is_empty() {
            return Err(rejected(QmsError::missing("create_review", "id")));
        }
        if review.title.is_empty() {
            return Err(rejected(QmsError::missing("create_review", "title")));
        }

        review.created = Some(Utc::now());
        review.status = ReviewStatus::Pending;

        tracing::info!(review = %review.id, "Management review created");
        self.reviews.insert(review.id.clone(), review);
        Ok(())
    }

    /// Record review outputs and mark the review completed.
    pub fn complete_review(&mut self, id: &ReviewId, outputs: ReviewOutputs) -> Result<()> {
        let review = self
            .reviews
            .get_mut(id)
            .ok_or_else(|| rejected(QmsError::not_found("complete_review", "review", id)))?;

        review.outputs = outputs;
        review.status = ReviewStatus::Completed;

        tracing::info!(review = %id, actions = review.outputs.action_items.len(), "Management review completed");
        Ok(())
    }

    /// Look up a management review.
    pub fn get_review(&self, id: &ReviewId) -> Option<&ManagementReview> {
        self.reviews.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use qms_core::ActionItem;

    fn manager_with_audit(id: &str) -> AuditManager {
        let mut manager = AuditManager::new();
        manager
            .create_audit(Audit::new(id, "Internal audit", "Production processes"))
            .unwrap();
        manager
    }

    fn finding(severity: NonconformitySeverity) -> AuditFinding {
        AuditFinding {
            clause: "8.5".to_string(),
            description: "Work instructions not followed".to_string(),
            severity,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_validation() {
        let mut manager = AuditManager::new();

        let err = manager.create_audit(Audit::new("", "t", "s")).unwrap_err();
        assert_eq!(err, QmsError::missing("create_audit", "id"));

        let err = manager.create_audit(Audit::new("AUDIT-1", "", "s")).unwrap_err();
        assert_eq!(err, QmsError::missing("create_audit", "title"));

        let err = manager.create_audit(Audit::new("AUDIT-1", "t", "")).unwrap_err();
        assert_eq!(err, QmsError::missing("create_audit", "scope.description"));

        assert!(manager.audits().is_empty());
    }

    #[test]
    fn test_create_sets_planned() {
        let mut manager = AuditManager::new();
        let mut audit = Audit::new("AUDIT-1", "Internal audit", "All processes");
        audit.status = AuditStatus::Closed;
        manager.create_audit(audit).unwrap();

        let stored = manager.get_audit(&AuditId::from("AUDIT-1")).unwrap();
        assert_eq!(stored.status, AuditStatus::Planned);
        assert!(stored.created.is_some());
    }

    #[test]
    fn test_start_requires_planned() {
        let mut manager = manager_with_audit("AUDIT-1");
        let id = AuditId::from("AUDIT-1");
        let start = Utc::now();

        manager.start_audit(&id, start).unwrap();
        let audit = manager.get_audit(&id).unwrap();
        assert_eq!(audit.status, AuditStatus::InProgress);
        assert_eq!(audit.actual_start_date, Some(start));

        let err = manager.start_audit(&id, start).unwrap_err();
        assert_eq!(
            err,
            QmsError::InvalidState {
                operation: "start_audit",
                entity: "audit",
                id: "AUDIT-1".to_string(),
                actual: "in_progress".to_string(),
                expected: "planned".to_string(),
            }
        );
    }

    #[test]
    fn test_start_unknown_audit() {
        let mut manager = AuditManager::new();
        let err = manager.start_audit(&AuditId::from("AUDIT-9"), Utc::now()).unwrap_err();
        assert!(matches!(err, QmsError::NotFound { entity: "audit", .. }));
    }

    #[test]
    fn test_complete_is_unguarded() {
        let mut manager = manager_with_audit("AUDIT-1");
        let id = AuditId::from("AUDIT-1");
        let end = Utc::now();

        // completing a planned audit skips in_progress
        let report = AuditReport {
            summary: "No major issues".to_string(),
            ..Default::default()
        };
        manager.complete_audit(&id, end, Some(report)).unwrap();

        let audit = manager.get_audit(&id).unwrap();
        assert_eq!(audit.status, AuditStatus::Completed);
        assert_eq!(audit.actual_end_date, Some(end));
        assert_eq!(audit.report.as_ref().unwrap().summary, "No major issues");

        // and can be completed again
        manager.complete_audit(&id, end, None).unwrap();
        assert!(manager.get_audit(&id).unwrap().report.is_some());
    }

    #[test]
    fn test_findings_and_statistics() {
        let mut manager = manager_with_audit("AUDIT-1");
        manager.create_audit(Audit::new("AUDIT-2", "Supplier audit", "Purchasing")).unwrap();
        let id = AuditId::from("AUDIT-1");

        manager.add_finding(&id, finding(NonconformitySeverity::Critical)).unwrap();
        manager.add_finding(&id, finding(NonconformitySeverity::Minor)).unwrap();
        let mut closed = finding(NonconformitySeverity::Observation);
        closed.status = AuditFindingStatus::Closed;
        manager.add_finding(&id, closed).unwrap();
        manager.start_audit(&id, Utc::now()).unwrap();

        let audit = manager.get_audit(&id).unwrap();
        let ids: Vec<_> = audit.findings.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["F1", "F2", "F3"]);

        let stats = manager.statistics();
        assert_eq!(stats.total_audits, 2);
        assert_eq!(stats.planned, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.total_findings, 3);
        assert_eq!(stats.critical_findings, 1);
        assert_eq!(stats.minor_findings, 1);
        assert_eq!(stats.observations, 1);
        assert_eq!(stats.major_findings, 0);
        assert_eq!(stats.open_findings, 2);
    }

    #[test]
    fn test_due_and_overdue() {
        let now = Utc::now();
        let mut manager = AuditManager::new();

        let mut due = Audit::new("AUDIT-1", "Due", "Scope");
        due.planned_start_date = Some(now - Duration::days(2));
        let mut future = Audit::new("AUDIT-2", "Future", "Scope");
        future.planned_start_date = Some(now + Duration::days(2));
        let mut started = Audit::new("AUDIT-3", "Started", "Scope");
        started.planned_start_date = Some(now - Duration::days(2));
        manager.create_audit(due).unwrap();
        manager.create_audit(future).unwrap();
        manager.create_audit(started).unwrap();
        manager.start_audit(&AuditId::from("AUDIT-3"), now).unwrap();

        let ids: Vec<_> = manager.audits_due(now).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["AUDIT-1"]);

        let mut late = finding(NonconformitySeverity::Major);
        late.due_date = Some(now - Duration::days(1));
        let mut late_closed = late.clone();
        late_closed.status = AuditFindingStatus::Closed;
        let mut on_time = finding(NonconformitySeverity::Minor);
        on_time.due_date = Some(now + Duration::days(1));

        let id = AuditId::from("AUDIT-3");
        manager.add_finding(&id, late).unwrap();
        manager.add_finding(&id, late_closed).unwrap();
        manager.add_finding(&id, on_time).unwrap();

        let overdue = manager.overdue_findings(now);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].0.as_str(), "AUDIT-3");
        assert_eq!(overdue[0].1.severity, NonconformitySeverity::Major);
    }

    #[test]
    fn test_management_review() {
        let mut manager = AuditManager::new();

        let err = manager.create_review(ManagementReview::new("MR-1", "")).unwrap_err();
        assert_eq!(err, QmsError::missing("create_review", "title"));

        manager.create_review(ManagementReview::new("MR-1", "Annual review")).unwrap();
        let id = ReviewId::from("MR-1");
        assert_eq!(manager.get_review(&id).unwrap().status, ReviewStatus::Pending);

        let outputs = ReviewOutputs {
            action_items: vec![ActionItem {
                description: "Update supplier criteria".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        manager.complete_review(&id, outputs).unwrap();

        let review = manager.get_review(&id).unwrap();
        assert_eq!(review.status, ReviewStatus::Completed);
        assert_eq!(review.outputs.action_items.len(), 1);

        assert!(manager.complete_review(&ReviewId::from("MR-2"), ReviewOutputs::default()).is_err());
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let mut manager = manager_with_audit("AUDIT-1");
        manager
            .add_finding(&AuditId::from("AUDIT-1"), finding(NonconformitySeverity::Major))
            .unwrap();

        let json = serde_json::to_string(&manager).unwrap();
        let restored: AuditManager = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.statistics(), manager.statistics());
    }
}
