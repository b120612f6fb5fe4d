//! Lookup index over documents.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use qms_core::{Document, DocumentCategory, DocumentId, DocumentStatus, DocumentType};

/// Document IDs keyed by type, category, status, clause and keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentIndex {
    /// Documents by type
    pub by_type: BTreeMap<DocumentType, BTreeSet<DocumentId>>,
    /// Documents by category
    pub by_category: BTreeMap<DocumentCategory, BTreeSet<DocumentId>>,
    /// Documents by status
    pub by_status: BTreeMap<DocumentStatus, BTreeSet<DocumentId>>,
    /// Documents by related clause
    pub by_clause: BTreeMap<String, BTreeSet<DocumentId>>,
    /// Documents by keyword
    pub by_keyword: BTreeMap<String, BTreeSet<DocumentId>>,
}

impl DocumentIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a document, dropping whatever was indexed for its ID before.
    pub fn update(&mut self, doc: &Document) {
        self.remove(&doc.id);

        if let Some(doc_type) = doc.doc_type {
            self.by_type.entry(doc_type).or_default().insert(doc.id.clone());
        }
        if let Some(category) = doc.category {
            self.by_category.entry(category).or_default().insert(doc.id.clone());
        }
        self.by_status.entry(doc.status).or_default().insert(doc.id.clone());

        for clause in &doc.metadata.related_clauses {
            self.by_clause.entry(clause.clone()).or_default().insert(doc.id.clone());
        }
        for keyword in &doc.metadata.keywords {
            self.by_keyword.entry(keyword.clone()).or_default().insert(doc.id.clone());
        }
    }

    /// Drop a document ID from every key. Keys left empty are removed.
    pub fn remove(&mut self, id: &DocumentId) {
        remove_from(&mut self.by_type, id);
        remove_from(&mut self.by_category, id);
        remove_from(&mut self.by_status, id);
        remove_from(&mut self.by_clause, id);
        remove_from(&mut self.by_keyword, id);
    }

    /// Documents of a type.
    pub fn with_type(&self, doc_type: DocumentType) -> Vec<&DocumentId> {
        ids(self.by_type.get(&doc_type))
    }

    /// Documents in a category.
    pub fn with_category(&self, category: DocumentCategory) -> Vec<&DocumentId> {
        ids(self.by_category.get(&category))
    }

    /// Documents in a status.
    pub fn with_status(&self, status: DocumentStatus) -> Vec<&DocumentId> {
        ids(self.by_status.get(&status))
    }

    /// Documents related to a clause.
    pub fn with_clause(&self, clause: &str) -> Vec<&DocumentId> {
        ids(self.by_clause.get(clause))
    }

    /// Documents carrying a keyword.
    pub fn with_keyword(&self, keyword: &str) -> Vec<&DocumentId> {
        ids(self.by_keyword.get(keyword))
    }
}

fn remove_from<K: Ord + Clone>(map: &mut BTreeMap<K, BTreeSet<DocumentId>>, id: &DocumentId) {
    map.retain(|_, set| {
        set.remove(id);
        !set.is_empty()
    });
}

fn ids(set: Option<&BTreeSet<DocumentId>>) -> Vec<&DocumentId> {
    set.map(|s| s.iter().collect()).unwrap_or_default()
}
