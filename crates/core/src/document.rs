//! Documented information (clause 7.5).

use serde::{Deserialize, Serialize};
use crate::audit::ReviewStatus;
use crate::id::DocumentId;
use crate::Time;

/// A controlled document or record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,

    /// Title
    pub title: String,

    /// Kind of document
    #[serde(rename = "type")]
    pub doc_type: Option<DocumentType>,

    /// Subject area
    pub category: Option<DocumentCategory>,

    /// Body text
    pub content: String,

    /// Authorship, keywords, related clauses, periods
    pub metadata: DocumentMetadata,

    /// Approval record
    pub approval: Option<DocumentApproval>,

    /// Last review
    pub review: Option<DocumentReview>,

    /// Access control
    pub access: DocumentAccess,

    /// Lifecycle status
    pub status: DocumentStatus,

    /// Version history, oldest first
    pub versions: Vec<DocumentVersion>,

    /// When created
    pub created: Option<Time>,

    /// Last modified
    pub modified: Option<Time>,
}

impl Document {
    /// Create a draft document.
    pub fn new(id: impl Into<DocumentId>, title: impl Into<String>, doc_type: DocumentType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            doc_type: Some(doc_type),
            ..Default::default()
        }
    }

    /// Current version number, if any version exists.
    pub fn current_version(&self) -> Option<&str> {
        self.versions.last().map(|v| v.version_number.as_str())
    }
}

/// Kind of document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Policy
    Policy,
    /// Procedure
    Procedure,
    /// Work instruction
    WorkInstruction,
    /// Record
    Record,
    /// Form
    Form,
    /// Template
    Template,
    /// Plan
    Plan,
    /// Report
    Report,
    /// Manual
    Manual,
}

/// Subject area of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    /// Quality management
    QualityManagement,
    /// Process management
    ProcessManagement,
    /// Risk management
    RiskManagement,
    /// Training
    Training,
    /// Audit
    Audit,
    /// Management review
    ManagementReview,
    /// Supplier
    Supplier,
    /// Customer
    Customer,
    /// Calibration
    Calibration,
    /// Nonconformance
    Nonconformance,
}

/// Descriptive metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    /// Who wrote it
    pub author: String,

    /// Who owns it
    pub owner: String,

    /// Search keywords
    pub keywords: Vec<String>,

    /// ISO 9001 clauses it supports
    pub related_clauses: Vec<String>,

    /// Related document IDs
    pub related_documents: Vec<String>,

    /// Days to retain after creation
    pub retention_days: Option<i64>,

    /// Days between reviews
    pub review_frequency_days: Option<i64>,

    /// "electronic", "paper" or "both"
    pub format: String,

    /// Language
    pub language: String,
}

/// Approval state of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentApproval {
    /// Approver IDs that must sign
    pub required_approvers: Vec<String>,

    /// Signatures received
    pub actual_approvers: Vec<Approval>,

    /// Overall state
    pub status: ApprovalStatus,
}

impl DocumentApproval {
    /// True once every required approver has signed.
    pub fn is_complete(&self) -> bool {
        self.required_approvers
            .iter()
            .all(|required| self.actual_approvers.iter().any(|a| &a.approver_id == required))
    }
}

/// One signature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Approval {
    /// Approver identifier
    pub approver_id: String,
    /// Approver name
    pub approver_name: String,
    /// Role
    pub role: String,
    /// When decided
    pub timestamp: Option<Time>,
    /// Comments
    pub comments: String,
}

/// Approval state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Pending
    #[default]
    Pending,
    /// Approved
    Approved,
    /// Rejected
    Rejected,
    /// Withdrawn
    Withdrawn,
}

/// A review of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentReview {
    /// When reviewed
    pub review_date: Option<Time>,
    /// Reviewer identifier
    pub reviewer_id: String,
    /// Reviewer name
    pub reviewer_name: String,
    /// Review comments
    pub review_comments: String,
    /// Next review
    pub next_review_date: Option<Time>,
    /// Review outcome
    pub status: ReviewStatus,
}

/// Access control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentAccess {
    /// "public", "internal", "confidential" or "restricted"
    pub classification: String,
    /// Roles with read access
    pub read_access: Vec<String>,
    /// Roles with write access
    pub write_access: Vec<String>,
}

/// Document lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Draft
    #[default]
    Draft,
    /// Review
    Review,
    /// Approved
    Approved,
    /// Published
    Published,
    /// Obsolete
    Obsolete,
    /// Archived
    Archived,
}

/// One entry in a document's version history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentVersion {
    /// Version, e.g. "1.2"
    pub version_number: String,
    /// What changed
    pub change_summary: String,
    /// Who made the change
    pub created_by: String,
    /// When made
    pub created_at: Option<Time>,
}
