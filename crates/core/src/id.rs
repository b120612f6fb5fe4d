//! Identifiers for QMS records.
//!
//! Records are keyed by opaque, caller-supplied strings. `generate()` mints a
//! fresh `PREFIX-<ulid>` value for callers that have no external numbering.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Mint a new unique identifier.
            pub fn generate() -> Self {
                Self(format!("{}-{}", $prefix, Ulid::new()))
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when no identifier was supplied.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of an organization.
    OrganizationId,
    "ORG"
);

string_id!(
    /// Identifier of a context issue (clause 4.1).
    IssueId,
    "ISSUE"
);

string_id!(
    /// Identifier of a risk.
    RiskId,
    "RISK"
);

string_id!(
    /// Identifier of an opportunity.
    OpportunityId,
    "OPP"
);

string_id!(
    /// Identifier of a quality objective.
    ObjectiveId,
    "OBJ"
);

string_id!(
    /// Identifier of an audit.
    AuditId,
    "AUDIT"
);

string_id!(
    /// Identifier of a management review.
    ReviewId,
    "MR"
);

string_id!(
    /// Identifier of a controlled document.
    DocumentId,
    "DOC"
);
