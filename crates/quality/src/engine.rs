//! Validation engine.

use qms_core::{Organization, ValidationResult};

use crate::checks::ClauseCheck;
use crate::report::ComplianceReport;
use crate::score::compliance_score;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Checks to run, in order
    pub checks: Vec<ClauseCheck>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            checks: ClauseCheck::ALL.to_vec(),
        }
    }
}

/// Runs clause checks over an organization snapshot.
///
/// The engine never mutates the organization and never fails: absent
/// substructures degrade to clause-level error findings.
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: EngineConfig,
}

impl ValidationEngine {
    /// Create an engine running every clause check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run a single check.
    pub fn run_check(&self, check: ClauseCheck, org: &Organization) -> ValidationResult {
        let result = check.run(org);
        tracing::debug!(
            clause = check.clause(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            infos = result.infos.len(),
            "Clause check finished"
        );
        result
    }

    /// Run every configured check and merge the results in order.
    pub fn validate(&self, org: &Organization) -> ValidationResult {
        let mut result = ValidationResult::new();
        for check in &self.config.checks {
            result.merge(self.run_check(*check, org));
        }
        tracing::debug!(
            organization = %org.id,
            valid = result.valid,
            findings = result.total_findings(),
            "Organization validated"
        );
        result
    }

    /// Validate and reduce to a compliance score.
    pub fn score(&self, org: &Organization) -> f64 {
        compliance_score(&self.validate(org))
    }

    /// Validate and build a full compliance report.
    pub fn report(&self, org: &Organization) -> ComplianceReport {
        let result = self.validate(org);
        ComplianceReport::from_result(org, &result)
    }
}

/// Validate an organization against every clause check.
pub fn validate_organization(org: &Organization) -> ValidationResult {
    ValidationEngine::new().validate(org)
}

/// Compliance score of an organization, 0 to 100.
pub fn organization_score(org: &Organization) -> f64 {
    ValidationEngine::new().score(org)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qms_core::{
        Leadership, LeadershipCommitment, OrganizationalContext, OrganizationalRole, InterestedParty,
        Issue, IssueType, Impact, Person, Process, ProcessCriteria, ProcessInput, ProcessOutput,
        QmsScope, QualityManagementSystem, QualityObjective, QualityPolicy, Risk, Opportunity, Action,
        ActionType,
    };

    fn party(name: &str, kind: &str) -> InterestedParty {
        InterestedParty {
            id: name.to_string(),
            name: name.to_string(),
            party_type: kind.to_string(),
            requirements: vec!["Requirement".to_string()],
        }
    }

    fn compliant_org() -> Organization {
        let mut risk = Risk::new("RISK-1", "Supplier delay");
        risk.mitigation.push(Action::new("Second source", ActionType::Mitigation));
        let mut opportunity = Opportunity::new("OPP-1", "Automation");
        opportunity.actions.push(Action::new("Pilot cell", ActionType::Improvement));

        Organization {
            context: Some(OrganizationalContext {
                external_issues: vec![Issue::new("Competition", IssueType::External, Impact::High)],
                internal_issues: vec![Issue::new("Efficiency", IssueType::Internal, Impact::Medium)],
                interested_parties: vec![
                    party("Customers", "customer"),
                    party("Suppliers", "supplier"),
                    party("Regulator", "authority"),
                ],
            }),
            leadership: Some(Leadership {
                top_management: vec![Person {
                    id: "CEO".into(),
                    name: "Chief".into(),
                    ..Default::default()
                }],
                quality_policy: Some(QualityPolicy {
                    statement: "Quality first".into(),
                    objectives: "Framework".into(),
                    commitment: "Meet requirements".into(),
                    improvement: "Continual improvement".into(),
                    communicated: true,
                    available: true,
                    ..Default::default()
                }),
                roles: vec![OrganizationalRole {
                    name: "Quality Manager".into(),
                    responsibilities: vec!["QMS".into()],
                    authorities: vec!["Approve documents".into()],
                    assigned_to: "QM-1".into(),
                    ..Default::default()
                }],
                commitment: LeadershipCommitment::ALL.to_vec(),
            }),
            qms: Some(QualityManagementSystem {
                scope: Some(QmsScope {
                    description: "Design and manufacture".into(),
                    products: vec!["Widget".into()],
                    ..Default::default()
                }),
                processes: vec![Process {
                    name: "Design".into(),
                    inputs: vec![ProcessInput::default()],
                    outputs: vec![ProcessOutput::default()],
                    responsibilities: vec!["Design team".into()],
                    criteria: vec![ProcessCriteria::default()],
                    risks: vec![Risk::new("RISK-2", "Scope creep")],
                    ..Default::default()
                }],
                objectives: vec![QualityObjective::new("OBJ-1", "Delivery")
                    .with_target("on_time", "95", "%")
                    .with_responsible("Ops")
                    .with_target_date(chrono::Utc::now())],
                risks: vec![risk],
                opportunities: vec![opportunity],
                ..Default::default()
            }),
            ..Organization::new("ORG-1", "Acme")
        }
    }

    #[test]
    fn test_compliant_org_has_no_findings() {
        let org = compliant_org();
        let result = validate_organization(&org);
        assert!(result.valid, "{:?}", result.errors);
        assert_eq!(result.total_findings(), 0);
        assert_eq!(organization_score(&org), 100.0);
    }

    #[test]
    fn test_skeleton_org() {
        let org = Organization {
            context: Some(OrganizationalContext::default()),
            ..Organization::new("ORG-2", "Empty")
        };
        let result = validate_organization(&org);

        // 4.2, 4.3, 4.4, 5.1, 5.2, 5.3, 6.1, 6.2
        assert_eq!(result.errors.len(), 8);
        // external and internal issues
        assert_eq!(result.warnings.len(), 2);
        assert!(result.infos.is_empty());
        assert!(!result.valid);

        let score = organization_score(&org);
        assert!(score < 50.0);
        assert!((score - 100.0 * (1.0 - 26.0 / 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_findings_follow_clause_order() {
        let result = validate_organization(&Organization::default());
        let clauses: Vec<_> = result.errors.iter().map(|e| e.clause.as_str()).collect();
        assert_eq!(clauses, vec!["4.1", "4.2", "4.3", "4.4", "5.1", "5.2", "5.3", "6.1", "6.2"]);
    }

    #[test]
    fn test_validation_does_not_mutate() {
        let org = compliant_org();
        let before = org.clone();
        let _ = validate_organization(&org);
        assert_eq!(org, before);
    }

    #[test]
    fn test_configured_subset() {
        let engine = ValidationEngine::with_config(EngineConfig {
            checks: vec![ClauseCheck::Leadership],
        });
        let result = engine.validate(&Organization::default());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].clause, "5.1");
    }

    #[test]
    fn test_deterministic() {
        let org = Organization::default();
        assert_eq!(validate_organization(&org), validate_organization(&org));
    }
}
