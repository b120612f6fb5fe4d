//! Documented Information (clause 7.5)
//!
//! Document control: versioning, approval, review, retention and lookup.

#![warn(missing_docs)]

pub mod manager;
pub mod index;

pub use manager::{DocumentationManager, DocumentSearchCriteria, validate_document, next_version};
pub use index::DocumentIndex;
