//! QMS core data models.
//!
//! This crate defines the organization graph that the validation engine walks
//! (context, leadership, QMS) together with the records kept by the risk,
//! objective, audit and documentation managers.

#![warn(missing_docs)]

// Core identities
mod id;
mod error;

// Organization graph
mod organization;
mod leadership;
mod system;

// Planning (clause 6)
mod risk;
mod objective;

// Support and evaluation (clauses 7.5, 9.2, 9.3)
mod document;
mod audit;

// Validation output
mod finding;

// Wire tag decoding
mod tag;

// Re-exports
pub use id::*;
pub use error::{QmsError, Result};

pub use organization::{
    Organization, OrganizationalContext, Issue, IssueType, Impact, Status,
    InterestedParty, PartyCategory,
};
pub use leadership::{Leadership, LeadershipCommitment, Person, OrganizationalRole, QualityPolicy};
pub use system::{
    QualityManagementSystem, QmsScope, Exclusion, Process, ProcessInput, ProcessOutput,
    ProcessCriteria, ProcessStatus, Resource, ResourceType,
};

pub use risk::{
    Risk, RiskLevel, Priority, RiskStatus, Opportunity, OpportunityLevel, OpportunityStatus,
    Action, ActionType, ActionStatus,
};
pub use objective::{QualityObjective, ObjectiveTarget, ObjectiveTimeline, ObjectiveStatus};

pub use document::{
    Document, DocumentType, DocumentCategory, DocumentMetadata, DocumentApproval, Approval,
    ApprovalStatus, DocumentReview, DocumentAccess, DocumentStatus, DocumentVersion,
};
pub use audit::{
    Audit, AuditType, AuditScope, AuditParticipant, AuditFinding, NonconformitySeverity,
    AuditFindingCategory, AuditFindingStatus, CorrectiveAction, AuditRecommendation,
    AuditReport, AuditStatus, AuditRisk, ManagementReview, ReviewAttendee, ReviewInputs,
    ReviewOutputs, AuditResultSummary, ImprovementOpportunity, QmsChange, ActionItem,
    ReviewStatus,
};

pub use finding::{Finding, Severity, ValidationResult};
pub use tag::{from_tag, Fallback};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
