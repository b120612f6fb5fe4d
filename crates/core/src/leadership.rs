//! Leadership model (clause 5).

use serde::{Deserialize, Serialize};
use crate::Time;

/// Top management, quality policy, roles and demonstrated commitments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Leadership {
    /// Top management
    pub top_management: Vec<Person>,

    /// Quality policy (clause 5.2)
    pub quality_policy: Option<QualityPolicy>,

    /// Roles, responsibilities and authorities (clause 5.3)
    pub roles: Vec<OrganizationalRole>,

    /// Demonstrated commitments (clause 5.1)
    #[serde(deserialize_with = "crate::tag::known")]
    pub commitment: Vec<LeadershipCommitment>,
}

impl Leadership {
    /// Required commitments not present in `commitment`, in canonical order.
    pub fn missing_commitments(&self) -> Vec<LeadershipCommitment> {
        LeadershipCommitment::ALL
            .iter()
            .copied()
            .filter(|required| !self.commitment.contains(required))
            .collect()
    }
}

/// A leadership commitment from clause 5.1.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadershipCommitment {
    /// Accountability for QMS effectiveness
    QmsEffectiveness,
    /// Quality policy
    QualityPolicy,
    /// QMS integrated into business processes
    QmsIntegration,
    /// Process approach
    ProcessApproach,
    /// Risk based thinking
    RiskBasedThinking,
    /// Resources are available
    ResourcesAvailable,
    /// Communicating the importance of the QMS
    ImportanceQms,
    /// Conformity to requirements
    ConformityRequirements,
    /// QMS achieves its intended results
    QmsResults,
    /// Engaging and supporting personnel
    PersonnelEngagement,
    /// Improvement
    Improvement,
    /// Customer focus
    CustomerFocus,
}

impl LeadershipCommitment {
    /// Every commitment top management must demonstrate.
    pub const ALL: [LeadershipCommitment; 12] = [
        LeadershipCommitment::QmsEffectiveness,
        LeadershipCommitment::QualityPolicy,
        LeadershipCommitment::QmsIntegration,
        LeadershipCommitment::ProcessApproach,
        LeadershipCommitment::RiskBasedThinking,
        LeadershipCommitment::ResourcesAvailable,
        LeadershipCommitment::ImportanceQms,
        LeadershipCommitment::ConformityRequirements,
        LeadershipCommitment::QmsResults,
        LeadershipCommitment::PersonnelEngagement,
        LeadershipCommitment::Improvement,
        LeadershipCommitment::CustomerFocus,
    ];

    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadershipCommitment::QmsEffectiveness => "qms_effectiveness",
            LeadershipCommitment::QualityPolicy => "quality_policy",
            LeadershipCommitment::QmsIntegration => "qms_integration",
            LeadershipCommitment::ProcessApproach => "process_approach",
            LeadershipCommitment::RiskBasedThinking => "risk_based_thinking",
            LeadershipCommitment::ResourcesAvailable => "resources_available",
            LeadershipCommitment::ImportanceQms => "importance_qms",
            LeadershipCommitment::ConformityRequirements => "conformity_requirements",
            LeadershipCommitment::QmsResults => "qms_results",
            LeadershipCommitment::PersonnelEngagement => "personnel_engagement",
            LeadershipCommitment::Improvement => "improvement",
            LeadershipCommitment::CustomerFocus => "customer_focus",
        }
    }
}

impl std::fmt::Display for LeadershipCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person in the organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    /// Identifier
    pub id: String,

    /// Full name
    pub name: String,

    /// Job title
    pub role: String,

    /// Demonstrated competences
    pub competence: Vec<String>,

    /// Completed training
    pub training: Vec<String>,
}

/// A role with its responsibilities and authorities (clause 5.3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationalRole {
    /// Identifier
    pub id: String,

    /// Role name
    pub name: String,

    /// What the role is responsible for
    pub responsibilities: Vec<String>,

    /// What the role may decide
    pub authorities: Vec<String>,

    /// Person holding the role
    pub assigned_to: String,
}

/// The quality policy (clause 5.2).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityPolicy {
    /// Identifier
    pub id: String,

    /// Statement of intent
    pub statement: String,

    /// Framework for setting objectives
    pub objectives: String,

    /// Commitment to satisfy applicable requirements
    pub commitment: String,

    /// Commitment to continual improvement
    pub improvement: String,

    /// Communicated within the organization
    pub communicated: bool,

    /// Available to interested parties
    pub available: bool,

    /// When created
    pub created: Option<Time>,

    /// Last updated
    pub updated: Option<Time>,
}
