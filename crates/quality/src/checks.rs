//! Clause checks.
//!
//! Each check inspects one section of the organization graph and returns its
//! own [`ValidationResult`]. A missing substructure yields a single error and
//! the check stops there; otherwise every record is checked field by field and
//! no field check hides another.

use qms_core::{
    Organization, PartyCategory, OpportunityStatus, RiskStatus, ValidationResult,
};

/// The nine clause checks, in the order the engine runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseCheck {
    /// 4.1 Understanding the organization and its context
    Context,
    /// 4.2 Needs and expectations of interested parties
    InterestedParties,
    /// 4.3 Scope of the QMS
    Scope,
    /// 4.4 QMS and its processes
    Processes,
    /// 5.1 Leadership and commitment
    Leadership,
    /// 5.2 Quality policy
    QualityPolicy,
    /// 5.3 Roles, responsibilities and authorities
    Roles,
    /// 6.1 Actions to address risks and opportunities
    RisksOpportunities,
    /// 6.2 Quality objectives
    Objectives,
}

impl ClauseCheck {
    /// Every check in engine order.
    pub const ALL: [ClauseCheck; 9] = [
        ClauseCheck::Context,
        ClauseCheck::InterestedParties,
        ClauseCheck::Scope,
        ClauseCheck::Processes,
        ClauseCheck::Leadership,
        ClauseCheck::QualityPolicy,
        ClauseCheck::Roles,
        ClauseCheck::RisksOpportunities,
        ClauseCheck::Objectives,
    ];

    /// ISO 9001 clause number.
    pub fn clause(&self) -> &'static str {
        match self {
            ClauseCheck::Context => "4.1",
            ClauseCheck::InterestedParties => "4.2",
            ClauseCheck::Scope => "4.3",
            ClauseCheck::Processes => "4.4",
            ClauseCheck::Leadership => "5.1",
            ClauseCheck::QualityPolicy => "5.2",
            ClauseCheck::Roles => "5.3",
            ClauseCheck::RisksOpportunities => "6.1",
            ClauseCheck::Objectives => "6.2",
        }
    }

    /// Run this check against an organization.
    pub fn run(&self, org: &Organization) -> ValidationResult {
        match self {
            ClauseCheck::Context => check_context(org),
            ClauseCheck::InterestedParties => check_interested_parties(org),
            ClauseCheck::Scope => check_scope(org),
            ClauseCheck::Processes => check_processes(org),
            ClauseCheck::Leadership => check_leadership(org),
            ClauseCheck::QualityPolicy => check_quality_policy(org),
            ClauseCheck::Roles => check_roles(org),
            ClauseCheck::RisksOpportunities => check_risks_opportunities(org),
            ClauseCheck::Objectives => check_objectives(org),
        }
    }
}

/// Clause 4.1.
pub fn check_context(org: &Organization) -> ValidationResult {
    let mut result = ValidationResult::new();

    let Some(context) = &org.context else {
        result.add_error("4.1", "context", "Organizational context must be defined");
        return result;
    };

    if context.external_issues.is_empty() {
        result.add_warning(
            "4.1",
            "external_issues",
            "No external issues identified - consider reviewing legal, technological, competitive, market, cultural, social and economic environments",
        );
    }
    if context.internal_issues.is_empty() {
        result.add_warning(
            "4.1",
            "internal_issues",
            "No internal issues identified - consider reviewing values, culture, knowledge and performance",
        );
    }

    for (i, issue) in context.all_issues().enumerate() {
        if issue.description.is_empty() {
            result.add_error("4.1", format!("issue_{i}_description"), "Issue must have a description");
        }
        if issue.issue_type.is_none() {
            result.add_error("4.1", format!("issue_{i}_type"), "Issue must have a type (external/internal)");
        }
    }

    result
}

/// Clause 4.2.
pub fn check_interested_parties(org: &Organization) -> ValidationResult {
    let mut result = ValidationResult::new();

    let parties = match &org.context {
        Some(context) if !context.interested_parties.is_empty() => &context.interested_parties,
        _ => {
            result.add_error(
                "4.2",
                "interested_parties",
                "Interested parties must be identified and their requirements determined",
            );
            return result;
        }
    };

    let mut has_customers = false;
    let mut has_suppliers = false;
    let mut has_regulators = false;

    for party in parties {
        if party.name.is_empty() {
            result.add_error("4.2", "party_name", "Interested party must have a name");
        }
        if party.requirements.is_empty() {
            result.add_warning(
                "4.2",
                format!("party_{}_requirements", party.name),
                "No requirements specified for interested party",
            );
        }

        match party.category() {
            PartyCategory::Customer => has_customers = true,
            PartyCategory::Supplier => has_suppliers = true,
            PartyCategory::Regulator => has_regulators = true,
            PartyCategory::Other => {}
        }
    }

    if !has_customers {
        result.add_warning("4.2", "customers", "No customers identified as interested parties");
    }
    if !has_suppliers {
        result.add_warning("4.2", "suppliers", "No suppliers/external providers identified as interested parties");
    }
    if !has_regulators {
        result.add_info("4.2", "regulators", "Consider identifying regulatory authorities as interested parties");
    }

    result
}

/// Clause 4.3.
pub fn check_scope(org: &Organization) -> ValidationResult {
    let mut result = ValidationResult::new();

    let Some(scope) = org.qms.as_ref().and_then(|qms| qms.scope.as_ref()) else {
        result.add_error("4.3", "scope", "QMS scope must be determined and documented");
        return result;
    };

    if scope.description.is_empty() {
        result.add_error(
            "4.3",
            "scope_description",
            "Scope must include a description of products and services covered",
        );
    }
    if scope.products.is_empty() && scope.services.is_empty() {
        result.add_error(
            "4.3",
            "scope_coverage",
            "Scope must specify the types of products and services covered",
        );
    }

    for (i, exclusion) in scope.exclusions.iter().enumerate() {
        if exclusion.clause.is_empty() {
            result.add_error(
                "4.3",
                format!("exclusion_{i}_clause"),
                "Exclusion must specify which clause is not applicable",
            );
        }
        if exclusion.justification.is_empty() {
            result.add_error(
                "4.3",
                format!("exclusion_{i}_justification"),
                "Exclusion must be justified and not affect organization's ability to meet requirements",
            );
        }
    }

    result
}

/// Clause 4.4.
pub fn check_processes(org: &Organization) -> ValidationResult {
    let mut result = ValidationResult::new();

    let processes = match &org.qms {
        Some(qms) if !qms.processes.is_empty() => &qms.processes,
        _ => {
            result.add_error(
                "4.4",
                "processes",
                "QMS processes must be established, implemented, maintained and continually improved",
            );
            return result;
        }
    };

    for (i, process) in processes.iter().enumerate() {
        let name = &process.name;
        if name.is_empty() {
            result.add_error("4.4", format!("process_{i}_name"), "Process must have a name");
        }
        if process.inputs.is_empty() {
            result.add_warning("4.4", format!("process_{name}_inputs"), "Process inputs should be defined");
        }
        if process.outputs.is_empty() {
            result.add_warning("4.4", format!("process_{name}_outputs"), "Process outputs should be defined");
        }
        if process.responsibilities.is_empty() {
            result.add_error(
                "4.4",
                format!("process_{name}_responsibilities"),
                "Process responsibilities and authorities must be assigned",
            );
        }
        if process.criteria.is_empty() {
            result.add_error(
                "4.4",
                format!("process_{name}_criteria"),
                "Process criteria and methods for monitoring must be determined",
            );
        }
        if process.risks.is_empty() {
            result.add_info(
                "4.4",
                format!("process_{name}_risks"),
                "Consider identifying risks and opportunities for this process",
            );
        }
    }

    result
}

/// Clause 5.1.
pub fn check_leadership(org: &Organization) -> ValidationResult {
    let mut result = ValidationResult::new();

    let Some(leadership) = &org.leadership else {
        result.add_error("5.1", "leadership", "Top management must demonstrate leadership and commitment");
        return result;
    };

    if leadership.top_management.is_empty() {
        result.add_error("5.1", "top_management", "Top management must be identified");
    }

    for missing in leadership.missing_commitments() {
        result.add_error(
            "5.1",
            "leadership_commitment",
            format!("Missing leadership commitment: {missing}"),
        );
    }

    result
}

/// Clause 5.2.
pub fn check_quality_policy(org: &Organization) -> ValidationResult {
    let mut result = ValidationResult::new();

    let Some(policy) = org.leadership.as_ref().and_then(|l| l.quality_policy.as_ref()) else {
        result.add_error("5.2", "quality_policy", "Quality policy must be established and maintained");
        return result;
    };

    if policy.statement.is_empty() {
        result.add_error("5.2", "policy_statement", "Quality policy must include a statement of intent");
    }
    if policy.objectives.is_empty() {
        result.add_error(
            "5.2",
            "policy_objectives",
            "Quality policy must provide a framework for setting quality objectives",
        );
    }
    if policy.commitment.is_empty() {
        result.add_error(
            "5.2",
            "policy_commitment",
            "Quality policy must include commitment to satisfy applicable requirements",
        );
    }
    if policy.improvement.is_empty() {
        result.add_error(
            "5.2",
            "policy_improvement",
            "Quality policy must include commitment to continual improvement",
        );
    }
    if !policy.communicated {
        result.add_error(
            "5.2",
            "policy_communication",
            "Quality policy must be communicated and understood within the organization",
        );
    }
    if !policy.available {
        result.add_error(
            "5.2",
            "policy_availability",
            "Quality policy must be available to relevant interested parties",
        );
    }

    result
}

/// Clause 5.3.
pub fn check_roles(org: &Organization) -> ValidationResult {
    let mut result = ValidationResult::new();

    let roles = match &org.leadership {
        Some(leadership) if !leadership.roles.is_empty() => &leadership.roles,
        _ => {
            result.add_error(
                "5.3",
                "roles_responsibilities",
                "Organizational roles, responsibilities and authorities must be assigned and communicated",
            );
            return result;
        }
    };

    for (i, role) in roles.iter().enumerate() {
        let name = &role.name;
        if name.is_empty() {
            result.add_error("5.3", format!("role_{i}_name"), "Role must have a name");
        }
        if role.responsibilities.is_empty() {
            result.add_error(
                "5.3",
                format!("role_{name}_responsibilities"),
                "Role must have defined responsibilities",
            );
        }
        if role.authorities.is_empty() {
            result.add_error("5.3", format!("role_{name}_authorities"), "Role must have defined authorities");
        }
        if role.assigned_to.is_empty() {
            result.add_error("5.3", format!("role_{name}_assignment"), "Role must be assigned to a person");
        }
    }

    result
}

/// Clause 6.1.
pub fn check_risks_opportunities(org: &Organization) -> ValidationResult {
    let mut result = ValidationResult::new();

    let Some(qms) = &org.qms else {
        result.add_error("6.1", "qms", "QMS must be defined to validate risks and opportunities");
        return result;
    };

    if qms.total_risks() == 0 {
        result.add_warning(
            "6.1",
            "risks",
            "No risks identified - risk-based thinking should be applied to planning",
        );
    }
    if qms.total_opportunities() == 0 {
        result.add_info("6.1", "opportunities", "Consider identifying opportunities for improvement");
    }

    for (i, risk) in qms.risks.iter().enumerate() {
        if risk.mitigation.is_empty() && risk.status != RiskStatus::Mitigated {
            result.add_warning(
                "6.1",
                format!("risk_{i}_mitigation"),
                "Risk should have mitigation actions defined",
            );
        }
    }

    for (i, opportunity) in qms.opportunities.iter().enumerate() {
        if opportunity.actions.is_empty() && opportunity.status != OpportunityStatus::Realized {
            result.add_info(
                "6.1",
                format!("opportunity_{i}_actions"),
                "Opportunity should have actions defined for realization",
            );
        }
    }

    result
}

/// Clause 6.2.
pub fn check_objectives(org: &Organization) -> ValidationResult {
    let mut result = ValidationResult::new();

    let objectives = match &org.qms {
        Some(qms) if !qms.objectives.is_empty() => &qms.objectives,
        _ => {
            result.add_error(
                "6.2",
                "quality_objectives",
                "Quality objectives must be established at relevant functions and levels",
            );
            return result;
        }
    };

    for (i, objective) in objectives.iter().enumerate() {
        let name = &objective.name;
        if name.is_empty() {
            result.add_error("6.2", format!("objective_{i}_name"), "Quality objective must have a name");
        }
        if !objective.measurable {
            result.add_error(
                "6.2",
                format!("objective_{name}_measurable"),
                "Quality objectives must be measurable",
            );
        }
        if objective.targets.is_empty() {
            result.add_error(
                "6.2",
                format!("objective_{name}_targets"),
                "Quality objectives must have specific targets",
            );
        }
        if objective.responsible.is_empty() {
            result.add_error(
                "6.2",
                format!("objective_{name}_responsible"),
                "Quality objectives must have responsible parties assigned",
            );
        }
        if !objective.timeline.has_target_date() {
            result.add_error(
                "6.2",
                format!("objective_{name}_timeline"),
                "Quality objectives must have target dates",
            );
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use qms_core::{
        InterestedParty, Issue, IssueType, Impact, Leadership, LeadershipCommitment,
        OrganizationalContext, OrganizationalRole, Opportunity, Process, QualityManagementSystem,
        QualityObjective, QualityPolicy, Risk,
    };

    fn party(name: &str, kind: &str) -> InterestedParty {
        InterestedParty {
            id: name.to_string(),
            name: name.to_string(),
            party_type: kind.to_string(),
            requirements: vec!["On-time delivery".to_string()],
        }
    }

    fn org_with_context(context: OrganizationalContext) -> Organization {
        Organization {
            context: Some(context),
            ..Organization::new("ORG-1", "Acme")
        }
    }

    fn org_with_qms(qms: QualityManagementSystem) -> Organization {
        Organization {
            qms: Some(qms),
            ..Organization::new("ORG-1", "Acme")
        }
    }

    #[test]
    fn test_every_check_has_distinct_clause() {
        let clauses: HashSet<_> = ClauseCheck::ALL.iter().map(|c| c.clause()).collect();
        assert_eq!(clauses.len(), ClauseCheck::ALL.len());
        assert_eq!(clauses.len(), 9);
    }

    #[test]
    fn test_missing_context() {
        let result = check_context(&Organization::default());
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "context");
    }

    #[test]
    fn test_empty_context_warns_twice() {
        let result = check_context(&org_with_context(OrganizationalContext::default()));
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_issue_fields_indexed_across_both_lists() {
        let context = OrganizationalContext {
            external_issues: vec![Issue::new("Market shift", IssueType::External, Impact::High)],
            internal_issues: vec![Issue::default()],
            ..Default::default()
        };
        let result = check_context(&org_with_context(context));

        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["issue_1_description", "issue_1_type"]);
    }

    #[test]
    fn test_empty_issue_type_from_json() {
        let org: Organization =
            serde_json::from_str(r#"{"context":{"external_issues":[{"description":"x","type":""}]}}"#).unwrap();
        let result = check_context(&org);

        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["issue_0_type"]);
    }

    #[test]
    fn test_party_buckets() {
        let context = OrganizationalContext {
            interested_parties: vec![party("Buyers", "customer"), party("Acme Parts", "external_provider")],
            ..Default::default()
        };
        let result = check_interested_parties(&org_with_context(context));

        assert!(result.valid);
        assert!(result.warnings.is_empty());
        assert_eq!(result.infos.len(), 1);
        assert_eq!(result.infos[0].field, "regulators");
    }

    #[test]
    fn test_party_type_is_case_sensitive() {
        let context = OrganizationalContext {
            interested_parties: vec![party("Buyers", "Customer")],
            ..Default::default()
        };
        let result = check_interested_parties(&org_with_context(context));

        let fields: Vec<_> = result.warnings.iter().map(|w| w.field.as_str()).collect();
        assert!(fields.contains(&"customers"));
        assert!(fields.contains(&"suppliers"));
    }

    #[test]
    fn test_party_without_name_or_requirements() {
        let context = OrganizationalContext {
            interested_parties: vec![InterestedParty {
                party_type: "regulator".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let result = check_interested_parties(&org_with_context(context));

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "party_name");
        assert!(result.warnings.iter().any(|w| w.field == "party__requirements"));
        assert!(result.infos.is_empty());
    }

    #[test]
    fn test_scope_checks() {
        let org = org_with_qms(QualityManagementSystem {
            scope: Some(qms_core::QmsScope {
                exclusions: vec![qms_core::Exclusion::default()],
                ..Default::default()
            }),
            ..Default::default()
        });
        let result = check_scope(&org);

        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["scope_description", "scope_coverage", "exclusion_0_clause", "exclusion_0_justification"]
        );
    }

    #[test]
    fn test_process_reports_every_missing_field() {
        let org = org_with_qms(QualityManagementSystem {
            processes: vec![Process::default()],
            ..Default::default()
        });
        let result = check_processes(&org);

        let errors: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(errors, vec!["process_0_name", "process__responsibilities", "process__criteria"]);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.infos.len(), 1);
    }

    #[test]
    fn test_leadership_requires_all_twelve_commitments() {
        let org = Organization {
            leadership: Some(Leadership::default()),
            ..Default::default()
        };
        let result = check_leadership(&org);

        // top_management plus one per commitment
        assert_eq!(result.errors.len(), 13);
        assert_eq!(
            result.errors[1].message,
            "Missing leadership commitment: qms_effectiveness"
        );

        let full = Organization {
            leadership: Some(Leadership {
                top_management: vec![qms_core::Person::default()],
                commitment: LeadershipCommitment::ALL.to_vec(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(check_leadership(&full).valid);
    }

    #[test]
    fn test_quality_policy_flags() {
        let org = Organization {
            leadership: Some(Leadership {
                quality_policy: Some(QualityPolicy {
                    statement: "Quality first".into(),
                    objectives: "Framework".into(),
                    commitment: "Meet requirements".into(),
                    improvement: "Continual".into(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let result = check_quality_policy(&org);

        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["policy_communication", "policy_availability"]);
    }

    #[test]
    fn test_roles() {
        let org = Organization {
            leadership: Some(Leadership {
                roles: vec![OrganizationalRole {
                    name: "QM".into(),
                    responsibilities: vec!["Audits".into()],
                    ..Default::default()
                }],
                ..Default::default()
            }),
            ..Default::default()
        };
        let result = check_roles(&org);

        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["role_QM_authorities", "role_QM_assignment"]);
    }

    #[test]
    fn test_risk_totals_include_processes() {
        let org = org_with_qms(QualityManagementSystem {
            processes: vec![Process {
                risks: vec![Risk::new("R1", "Late supply")],
                opportunities: vec![Opportunity::new("O1", "Automation")],
                ..Default::default()
            }],
            ..Default::default()
        });
        let result = check_risks_opportunities(&org);

        assert!(result.valid);
        assert_eq!(result.total_findings(), 0);
    }

    #[test]
    fn test_unmitigated_risk_and_idle_opportunity() {
        let mut mitigated = Risk::new("R2", "Handled");
        mitigated.status = RiskStatus::Mitigated;

        let org = org_with_qms(QualityManagementSystem {
            risks: vec![Risk::new("R1", "Open"), mitigated],
            opportunities: vec![Opportunity::new("O1", "Idle")],
            ..Default::default()
        });
        let result = check_risks_opportunities(&org);

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].field, "risk_0_mitigation");
        assert_eq!(result.infos.len(), 1);
        assert_eq!(result.infos[0].field, "opportunity_0_actions");
    }

    #[test]
    fn test_objective_needs_target_date_only() {
        let objective = QualityObjective::new("OBJ-1", "Delivery")
            .with_target("on_time", "95", "%")
            .with_responsible("Ops");
        let org = org_with_qms(QualityManagementSystem {
            objectives: vec![objective.clone()],
            ..Default::default()
        });
        let result = check_objectives(&org);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "objective_Delivery_timeline");

        let dated = objective.with_target_date(chrono::Utc::now());
        let org = org_with_qms(QualityManagementSystem {
            objectives: vec![dated],
            ..Default::default()
        });
        assert!(check_objectives(&org).valid);
    }

    #[test]
    fn test_zero_target_date_fails_timeline() {
        let org: Organization = serde_json::from_str(
            r#"{
                "id": "ORG-1",
                "name": "Acme",
                "qms": {
                    "objectives": [{
                        "id": "OBJ-1",
                        "name": "Delivery",
                        "measurable": true,
                        "targets": [{"id": "T1", "metric": "on_time", "value": "95", "unit": "%"}],
                        "responsible": "Ops",
                        "timeline": {"target_date": "0001-01-01T00:00:00Z"}
                    }]
                }
            }"#,
        )
        .unwrap();

        let result = check_objectives(&org);
        let fields: Vec<_> = result.errors.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, ["objective_Delivery_timeline"]);
    }
}
