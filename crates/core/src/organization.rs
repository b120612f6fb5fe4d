//! Organization root aggregate and its context (clauses 4.1 and 4.2).

use serde::{Deserialize, Serialize};
use crate::id::{IssueId, OrganizationId};
use crate::leadership::Leadership;
use crate::system::QualityManagementSystem;
use crate::Time;

/// An organization implementing a QMS.
///
/// Owns its context, leadership and QMS blocks outright; nothing inside is
/// shared by reference with other organizations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    /// Unique identifier
    pub id: OrganizationId,

    /// Display name
    pub name: String,

    /// Internal/external issues and interested parties
    pub context: Option<OrganizationalContext>,

    /// Top management, policy, roles, commitments
    pub leadership: Option<Leadership>,

    /// Scope, processes, objectives, risks
    pub qms: Option<QualityManagementSystem>,

    /// When created
    pub created: Option<Time>,

    /// Last modified
    pub modified: Option<Time>,
}

impl Organization {
    /// Create an empty organization.
    pub fn new(id: impl Into<OrganizationId>, name: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            created: Some(now),
            modified: Some(now),
            ..Default::default()
        }
    }

    /// Add a context issue, creating the context block if needed.
    ///
    /// Issues are filed by their type tag; untyped issues go with the internal ones.
    pub fn add_issue(&mut self, issue: Issue) {
        let context = self.context.get_or_insert_with(OrganizationalContext::default);
        match issue.issue_type {
            Some(IssueType::External) => context.external_issues.push(issue),
            _ => context.internal_issues.push(issue),
        }
        self.modified = Some(chrono::Utc::now());
    }
}

/// Organizational context (clauses 4.1 and 4.2).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationalContext {
    /// External issues
    pub external_issues: Vec<Issue>,

    /// Internal issues
    pub internal_issues: Vec<Issue>,

    /// Relevant interested parties
    pub interested_parties: Vec<InterestedParty>,
}

impl OrganizationalContext {
    /// External issues followed by internal issues.
    pub fn all_issues(&self) -> impl Iterator<Item = &Issue> {
        self.external_issues.iter().chain(self.internal_issues.iter())
    }
}

/// An internal or external issue affecting the organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    /// Unique identifier
    pub id: IssueId,

    /// What the issue is
    pub description: String,

    /// External or internal
    #[serde(rename = "type", deserialize_with = "crate::tag::optional")]
    pub issue_type: Option<IssueType>,

    /// How much it matters
    #[serde(deserialize_with = "crate::tag::optional")]
    pub impact: Option<Impact>,

    /// Tracking status
    #[serde(deserialize_with = "crate::tag::optional")]
    pub status: Option<Status>,

    /// When recorded
    pub created: Option<Time>,
}

impl Issue {
    /// Create an active issue with a fresh ID.
    pub fn new(description: impl Into<String>, issue_type: IssueType, impact: Impact) -> Self {
        Self {
            id: IssueId::generate(),
            description: description.into(),
            issue_type: Some(issue_type),
            impact: Some(impact),
            status: Some(Status::Active),
            created: Some(chrono::Utc::now()),
        }
    }
}

/// Issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// Outside the organization
    External,
    /// Inside the organization
    Internal,
}

/// Impact of a context issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    /// Minor effect
    Low,
    /// Noticeable effect
    Medium,
    /// Significant effect
    High,
    /// Threatens the QMS
    Critical,
}

/// Tracking status of a context issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Currently relevant
    Active,
    /// No longer relevant
    Inactive,
    /// Dealt with
    Resolved,
    /// Effect reduced
    Mitigated,
}

/// A relevant interested party (clause 4.2).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterestedParty {
    /// Identifier
    pub id: String,

    /// Party name
    pub name: String,

    /// Free-text kind, e.g. "customer", "supplier", "regulator"
    #[serde(rename = "type")]
    pub party_type: String,

    /// What the party requires of the organization
    pub requirements: Vec<String>,
}

impl InterestedParty {
    /// Which bucket the free-text type falls into.
    pub fn category(&self) -> PartyCategory {
        PartyCategory::classify(&self.party_type)
    }
}

/// Coarse buckets for interested parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartyCategory {
    /// "customer"
    Customer,
    /// "supplier" or "external_provider"
    Supplier,
    /// "regulator" or "authority"
    Regulator,
    /// Anything else
    Other,
}

impl PartyCategory {
    /// Classify a free-text party type. Matching is exact and case-sensitive.
    pub fn classify(party_type: &str) -> Self {
        match party_type {
            "customer" => PartyCategory::Customer,
            "supplier" | "external_provider" => PartyCategory::Supplier,
            "regulator" | "authority" => PartyCategory::Regulator,
            _ => PartyCategory::Other,
        }
    }
}
