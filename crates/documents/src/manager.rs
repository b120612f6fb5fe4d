//! Document control.
//!
//! New documents start as drafts at version `1.0`. Every update and archive
//! appends a version; the index is refreshed on every write.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use qms_core::{
    Approval, ApprovalStatus, Document, DocumentCategory, DocumentId, DocumentReview, DocumentStatus,
    DocumentType, DocumentVersion, QmsError, Result, Time,
};

use crate::index::DocumentIndex;

const INITIAL_VERSION: &str = "1.0";

/// Exact-match search filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSearchCriteria {
    /// Exact document type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<DocumentType>,
    /// Exact category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<DocumentCategory>,
    /// Exact status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
    /// Exact title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Exact author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Keyword the document carries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Related clause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clause: Option<String>,
}

impl DocumentSearchCriteria {
    /// True when the document matches every set field.
    pub fn matches(&self, doc: &Document) -> bool {
        if self.doc_type.is_some() && doc.doc_type != self.doc_type {
            return false;
        }
        if self.category.is_some() && doc.category != self.category {
            return false;
        }
        if self.status.is_some_and(|s| s != doc.status) {
            return false;
        }
        if self.title.as_ref().is_some_and(|t| t != &doc.title) {
            return false;
        }
        if self.author.as_ref().is_some_and(|a| a != &doc.metadata.author) {
            return false;
        }
        if self.keyword.as_ref().is_some_and(|k| !doc.metadata.keywords.contains(k)) {
            return false;
        }
        if self.clause.as_ref().is_some_and(|c| !doc.metadata.related_clauses.contains(c)) {
            return false;
        }
        true
    }
}

/// Next version after `current`: the last numeric segment is incremented,
/// otherwise `.1` is appended.
pub fn next_version(current: &str) -> String {
    match current.rsplit_once('.') {
        Some((major, minor)) => match minor.parse::<u32>() {
            Ok(n) => format!("{major}.{}", n + 1),
            Err(_) => format!("{current}.1"),
        },
        None => format!("{current}.1"),
    }
}

/// Check a document carries everything controlled documents need.
pub fn validate_document(doc: &Document) -> Result<()> {
    const OP: &str = "validate_document";

    if doc.id.is_empty() {
        return Err(QmsError::missing(OP, "id"));
    }
    if doc.title.is_empty() {
        return Err(QmsError::missing(OP, "title"));
    }
    if doc.doc_type.is_none() {
        return Err(QmsError::missing(OP, "type"));
    }
    if doc.metadata.author.is_empty() {
        return Err(QmsError::missing(OP, "metadata.author"));
    }
    if doc.metadata.owner.is_empty() {
        return Err(QmsError::missing(OP, "metadata.owner"));
    }
    if doc.metadata.related_clauses.is_empty() {
        return Err(QmsError::missing(OP, "metadata.related_clauses"));
    }
    Ok(())
}

/// Manages controlled documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationManager {
    documents: HashMap<DocumentId, Document>,
    index: DocumentIndex,
}

fn rejected(err: QmsError) -> QmsError {
    tracing::warn!(error = %err, "Document operation rejected");
    err
}

fn version(number: String, summary: impl Into<String>, created_by: impl Into<String>, at: Time) -> DocumentVersion {
    DocumentVersion {
        version_number: number,
        change_summary: summary.into(),
        created_by: created_by.into(),
        created_at: Some(at),
    }
}

/// End of the retention period, if set and representable.
fn retention_end(doc: &Document) -> Option<Time> {
    let created = doc.created?;
    let days = Duration::try_days(doc.metadata.retention_days?)?;
    created.checked_add_signed(days)
}

impl DocumentationManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a draft document, or replace one with the same ID.
    pub fn add_document(&mut self, mut doc: Document) -> Result<()> {
        if doc.id.is_empty() {
            return Err(rejected(QmsError::missing("add_document", "id")));
        }
        if doc.title.is_empty() {
            return Err(rejected(QmsError::missing("add_document", "title")));
        }

        let now = Utc::now();
        doc.created = Some(now);
        doc.modified = Some(now);
        doc.status = DocumentStatus::Draft;
        if doc.versions.is_empty() {
            let author = doc.metadata.author.clone();
            doc.versions.push(version(INITIAL_VERSION.to_string(), "Initial version", author, now));
        }

        tracing::info!(document = %doc.id, "Document added");
        self.store(doc);
        Ok(())
    }

    /// Replace a document's content, keeping its ID, creation date and
    /// version history, and append the next version.
    pub fn update_document(&mut self, id: &DocumentId, mut updates: Document) -> Result<()> {
        let existing = self
            .documents
            .get(id)
            .ok_or_else(|| rejected(QmsError::not_found("update_document", "document", id)))?;

        let now = Utc::now();
        let number = existing
            .current_version()
            .map_or_else(|| INITIAL_VERSION.to_string(), next_version);

        updates.id = existing.id.clone();
        updates.created = existing.created;
        updates.modified = Some(now);
        updates.versions = existing.versions.clone();
        let author = updates.metadata.author.clone();
        updates.versions.push(version(number, "Updated document", author, now));

        tracing::info!(document = %id, version = ?updates.current_version(), "Document updated");
        self.store(updates);
        Ok(())
    }

    /// Look up a document.
    pub fn get_document(&self, id: &DocumentId) -> Result<&Document> {
        self.documents
            .get(id)
            .ok_or_else(|| QmsError::not_found("get_document", "document", id))
    }

    /// Every document, by ID.
    pub fn documents(&self) -> Vec<&Document> {
        let mut all: Vec<_> = self.documents.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Documents matching every set criterion, by ID.
    pub fn search(&self, criteria: &DocumentSearchCriteria) -> Vec<&Document> {
        self.documents().into_iter().filter(|d| criteria.matches(d)).collect()
    }

    /// Documents related to a clause, by ID.
    pub fn documents_for_clause(&self, clause: &str) -> Vec<&Document> {
        self.index
            .with_clause(clause)
            .into_iter()
            .filter_map(|id| self.documents.get(id))
            .collect()
    }

    /// The lookup index.
    pub fn index(&self) -> &DocumentIndex {
        &self.index
    }

    /// Record an approval. Once every required approver has signed, the
    /// document becomes approved. Returns whether it is now approved.
    pub fn approve_document(&mut self, id: &DocumentId, mut approval: Approval) -> Result<bool> {
        let doc = self
            .documents
            .get_mut(id)
            .ok_or_else(|| rejected(QmsError::not_found("approve_document", "document", id)))?;

        let now = Utc::now();
        approval.timestamp.get_or_insert(now);

        let state = doc.approval.get_or_insert_with(Default::default);
        tracing::info!(document = %id, approver = %approval.approver_id, "Document approval recorded");
        state.actual_approvers.push(approval);

        let complete = state.is_complete();
        if complete {
            state.status = ApprovalStatus::Approved;
            doc.status = DocumentStatus::Approved;
            tracing::info!(document = %id, "Document approved");
        }
        doc.modified = Some(now);

        self.reindex(id);
        Ok(complete)
    }

    /// Record a review.
    pub fn review_document(&mut self, id: &DocumentId, review: DocumentReview) -> Result<()> {
        let doc = self
            .documents
            .get_mut(id)
            .ok_or_else(|| rejected(QmsError::not_found("review_document", "document", id)))?;

        doc.review = Some(review);
        doc.modified = Some(Utc::now());

        tracing::info!(document = %id, "Document reviewed");
        self.reindex(id);
        Ok(())
    }

    /// Documents whose next review date is before `now`, excluding obsolete ones.
    pub fn documents_due_for_review(&self, now: Time) -> Vec<&Document> {
        self.documents()
            .into_iter()
            .filter(|d| d.status != DocumentStatus::Obsolete)
            .filter(|d| {
                d.review
                    .as_ref()
                    .and_then(|r| r.next_review_date)
                    .is_some_and(|next| next < now)
            })
            .collect()
    }

    /// Documents whose retention period ends before `now + within`,
    /// excluding archived ones. Documents without a retention period, or whose
    /// retention end is past the representable range, never expire.
    pub fn documents_expiring(&self, now: Time, within: Duration) -> Vec<&Document> {
        // None: the horizon is past the representable range.
        let horizon = now.checked_add_signed(within);
        self.documents()
            .into_iter()
            .filter(|d| d.status != DocumentStatus::Archived)
            .filter(|d| match retention_end(d) {
                Some(end) => horizon.map_or(true, |horizon| end < horizon),
                None => false,
            })
            .collect()
    }

    /// Archive a document, recording the reason as a new version.
    pub fn archive_document(&mut self, id: &DocumentId, reason: &str) -> Result<()> {
        let doc = self
            .documents
            .get_mut(id)
            .ok_or_else(|| rejected(QmsError::not_found("archive_document", "document", id)))?;

        let now = Utc::now();
        let number = doc
            .current_version()
            .map_or_else(|| INITIAL_VERSION.to_string(), next_version);
        doc.versions.push(version(number, format!("Archived: {reason}"), "system", now));
        doc.status = DocumentStatus::Archived;
        doc.modified = Some(now);

        tracing::info!(document = %id, reason, "Document archived");
        self.reindex(id);
        Ok(())
    }

    fn store(&mut self, doc: Document) {
        self.index.update(&doc);
        self.documents.insert(doc.id.clone(), doc);
    }

    fn reindex(&mut self, id: &DocumentId) {
        if let Some(doc) = self.documents.get(id) {
            self.index.update(doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(id: &str) -> Document {
        let mut doc = Document::new(id, "Quality Policy", DocumentType::Policy);
        doc.category = Some(DocumentCategory::QualityManagement);
        doc.metadata.author = "QM".to_string();
        doc.metadata.owner = "CEO".to_string();
        doc.metadata.related_clauses = vec!["5.2".to_string()];
        doc.metadata.keywords = vec!["policy".to_string()];
        doc
    }

    fn manager_with(doc: Document) -> DocumentationManager {
        let mut manager = DocumentationManager::new();
        manager.add_document(doc).unwrap();
        manager
    }

    fn approval(id: &str) -> Approval {
        Approval {
            approver_id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_next_version() {
        assert_eq!(next_version("1.0"), "1.1");
        assert_eq!(next_version("1.9"), "1.10");
        assert_eq!(next_version("2.3.4"), "2.3.5");
        assert_eq!(next_version("draft"), "draft.1");
        assert_eq!(next_version("1.beta"), "1.beta.1");
    }

    #[test]
    fn test_add_document() {
        let mut manager = DocumentationManager::new();
        assert_eq!(
            manager.add_document(Document::default()).unwrap_err(),
            QmsError::missing("add_document", "id")
        );
        assert_eq!(
            manager.add_document(Document::new("DOC-1", "", DocumentType::Form)).unwrap_err(),
            QmsError::missing("add_document", "title")
        );

        let mut doc = policy("DOC-1");
        doc.status = DocumentStatus::Published;
        manager.add_document(doc).unwrap();

        let stored = manager.get_document(&DocumentId::from("DOC-1")).unwrap();
        assert_eq!(stored.status, DocumentStatus::Draft);
        assert_eq!(stored.current_version(), Some("1.0"));
        assert_eq!(stored.versions[0].created_by, "QM");
        assert!(stored.created.is_some());
    }

    #[test]
    fn test_update_appends_version() {
        let mut manager = manager_with(policy("DOC-1"));
        let id = DocumentId::from("DOC-1");
        let created = manager.get_document(&id).unwrap().created;

        let mut updates = policy("ignored");
        updates.content = "Revised".to_string();
        manager.update_document(&id, updates.clone()).unwrap();
        manager.update_document(&id, updates).unwrap();

        let doc = manager.get_document(&id).unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.created, created);
        assert_eq!(doc.content, "Revised");
        let versions: Vec<_> = doc.versions.iter().map(|v| v.version_number.as_str()).collect();
        assert_eq!(versions, vec!["1.0", "1.1", "1.2"]);

        assert!(manager.get_document(&DocumentId::from("ignored")).is_err());
        assert!(manager.update_document(&DocumentId::from("DOC-9"), policy("DOC-9")).is_err());
    }

    #[test]
    fn test_approval_requires_every_approver() {
        let mut doc = policy("DOC-1");
        doc.approval = Some(qms_core::DocumentApproval {
            required_approvers: vec!["QM".to_string(), "CEO".to_string()],
            ..Default::default()
        });
        let mut manager = manager_with(doc);
        let id = DocumentId::from("DOC-1");

        assert!(!manager.approve_document(&id, approval("QM")).unwrap());
        assert_eq!(manager.get_document(&id).unwrap().status, DocumentStatus::Draft);

        assert!(manager.approve_document(&id, approval("CEO")).unwrap());
        let doc = manager.get_document(&id).unwrap();
        assert_eq!(doc.status, DocumentStatus::Approved);
        let state = doc.approval.as_ref().unwrap();
        assert_eq!(state.status, ApprovalStatus::Approved);
        assert!(state.actual_approvers.iter().all(|a| a.timestamp.is_some()));

        assert_eq!(manager.index().with_status(DocumentStatus::Approved).len(), 1);
        assert!(manager.index().with_status(DocumentStatus::Draft).is_empty());
    }

    #[test]
    fn test_approval_without_requirements() {
        let mut manager = manager_with(policy("DOC-1"));
        assert!(manager.approve_document(&DocumentId::from("DOC-1"), approval("QM")).unwrap());
    }

    #[test]
    fn test_search() {
        let mut manager = manager_with(policy("DOC-1"));
        let mut procedure = Document::new("DOC-2", "Control of Records", DocumentType::Procedure);
        procedure.metadata.author = "QM".to_string();
        procedure.metadata.related_clauses = vec!["7.5".to_string()];
        manager.add_document(procedure).unwrap();

        let all = manager.search(&DocumentSearchCriteria::default());
        assert_eq!(all.len(), 2);

        let by_author = manager.search(&DocumentSearchCriteria {
            author: Some("QM".to_string()),
            ..Default::default()
        });
        assert_eq!(by_author.len(), 2);

        let by_clause = manager.search(&DocumentSearchCriteria {
            clause: Some("7.5".to_string()),
            author: Some("QM".to_string()),
            ..Default::default()
        });
        assert_eq!(by_clause.len(), 1);
        assert_eq!(by_clause[0].id.as_str(), "DOC-2");

        let by_type = manager.search(&DocumentSearchCriteria {
            doc_type: Some(DocumentType::Policy),
            keyword: Some("policy".to_string()),
            ..Default::default()
        });
        assert_eq!(by_type.len(), 1);

        // titles match exactly
        let partial = manager.search(&DocumentSearchCriteria {
            title: Some("Quality".to_string()),
            ..Default::default()
        });
        assert!(partial.is_empty());

        assert_eq!(manager.documents_for_clause("5.2")[0].id.as_str(), "DOC-1");
    }

    #[test]
    fn test_due_for_review() {
        let now = Utc::now();
        let mut manager = manager_with(policy("DOC-1"));
        manager.add_document(policy("DOC-2")).unwrap();
        manager.add_document(policy("DOC-3")).unwrap();

        let overdue = DocumentReview {
            next_review_date: Some(now - Duration::days(1)),
            ..Default::default()
        };
        let upcoming = DocumentReview {
            next_review_date: Some(now + Duration::days(30)),
            ..Default::default()
        };
        manager.review_document(&DocumentId::from("DOC-1"), overdue.clone()).unwrap();
        manager.review_document(&DocumentId::from("DOC-2"), upcoming).unwrap();

        let due: Vec<_> = manager.documents_due_for_review(now).iter().map(|d| d.id.as_str()).collect();
        assert_eq!(due, vec!["DOC-1"]);

        let mut obsolete = policy("DOC-1");
        obsolete.review = Some(overdue);
        obsolete.status = DocumentStatus::Obsolete;
        manager.update_document(&DocumentId::from("DOC-1"), obsolete).unwrap();
        assert!(manager.documents_due_for_review(now).is_empty());
    }

    #[test]
    fn test_expiring() {
        let now = Utc::now();
        let mut short = policy("DOC-1");
        short.metadata.retention_days = Some(10);
        let mut long = policy("DOC-2");
        long.metadata.retention_days = Some(3650);

        let mut manager = manager_with(short);
        manager.add_document(long).unwrap();
        manager.add_document(policy("DOC-3")).unwrap();

        let expiring: Vec<_> = manager
            .documents_expiring(now, Duration::days(30))
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(expiring, vec!["DOC-1"]);

        manager.archive_document(&DocumentId::from("DOC-1"), "superseded").unwrap();
        assert!(manager.documents_expiring(now, Duration::days(30)).is_empty());
    }

    #[test]
    fn test_expiring_with_out_of_range_retention() {
        let now = Utc::now();
        let mut forever = policy("DOC-1");
        forever.metadata.retention_days = Some(200_000_000);
        let mut max = policy("DOC-2");
        max.metadata.retention_days = Some(i64::MAX);
        let mut short = policy("DOC-3");
        short.metadata.retention_days = Some(1);

        let mut manager = manager_with(forever);
        manager.add_document(max).unwrap();
        manager.add_document(short).unwrap();

        let expiring: Vec<_> = manager
            .documents_expiring(now, Duration::days(30))
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(expiring, vec!["DOC-3"]);

        let expiring = manager.documents_expiring(now, Duration::MAX);
        assert_eq!(expiring.len(), 1);
    }

    #[test]
    fn test_archive() {
        let mut manager = manager_with(policy("DOC-1"));
        let id = DocumentId::from("DOC-1");
        manager.archive_document(&id, "Superseded by DOC-7").unwrap();

        let doc = manager.get_document(&id).unwrap();
        assert_eq!(doc.status, DocumentStatus::Archived);
        let last = doc.versions.last().unwrap();
        assert_eq!(last.version_number, "1.1");
        assert_eq!(last.change_summary, "Archived: Superseded by DOC-7");
        assert_eq!(last.created_by, "system");

        assert_eq!(manager.index().with_status(DocumentStatus::Archived).len(), 1);
        assert!(manager.archive_document(&DocumentId::from("DOC-9"), "x").is_err());
    }

    #[test]
    fn test_validate_document() {
        assert!(validate_document(&policy("DOC-1")).is_ok());

        let mut doc = policy("DOC-1");
        doc.doc_type = None;
        assert_eq!(validate_document(&doc).unwrap_err(), QmsError::missing("validate_document", "type"));

        let mut doc = policy("DOC-1");
        doc.metadata.owner.clear();
        assert_eq!(
            validate_document(&doc).unwrap_err(),
            QmsError::missing("validate_document", "metadata.owner")
        );

        let mut doc = policy("DOC-1");
        doc.metadata.related_clauses.clear();
        assert_eq!(
            validate_document(&doc).unwrap_err(),
            QmsError::missing("validate_document", "metadata.related_clauses")
        );
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let manager = manager_with(policy("DOC-1"));
        let json = serde_json::to_string(&manager).unwrap();
        let restored: DocumentationManager = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.documents().len(), 1);
        assert_eq!(restored.index(), manager.index());
    }
}
