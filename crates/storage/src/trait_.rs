//! Storage trait abstraction.

use async_trait::async_trait;
use qms_core::{Organization, OrganizationId};
use serde::{de::DeserializeOwned, Serialize};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Identifier cannot be used as a file name
    #[error("Invalid ID: {0:?}")]
    InvalidId(String),
}

/// Named manager state snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Risk manager
    Risks,
    /// Objectives manager
    Objectives,
    /// Audit manager
    Audits,
    /// Documentation manager
    Documents,
}

impl StateKind {
    /// All snapshot kinds.
    pub const ALL: [StateKind; 4] = [
        StateKind::Risks,
        StateKind::Objectives,
        StateKind::Audits,
        StateKind::Documents,
    ];

    /// Snapshot name, used as the file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            StateKind::Risks => "risks",
            StateKind::Objectives => "objectives",
            StateKind::Audits => "audits",
            StateKind::Documents => "documents",
        }
    }
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage abstraction for QMS data.
///
/// This trait allows different storage backends to be plugged in.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Organization operations ===

    /// Save an organization (create or update).
    async fn save_organization(&mut self, org: &Organization) -> Result<()>;

    /// Load an organization by ID.
    async fn load_organization(&self, id: &OrganizationId) -> Result<Option<Organization>>;

    /// List all organizations, by ID.
    async fn list_organizations(&self) -> Result<Vec<Organization>>;

    /// Delete an organization. Deleting a missing organization is not an error.
    async fn delete_organization(&mut self, id: &OrganizationId) -> Result<()>;

    // === Manager state ===

    /// Save a manager state snapshot.
    async fn save_state(&mut self, kind: StateKind, state: &serde_json::Value) -> Result<()>;

    /// Load a manager state snapshot.
    async fn load_state(&self, kind: StateKind) -> Result<Option<serde_json::Value>>;
}

/// Save a typed manager as a state snapshot.
pub async fn save_state_as<S, T>(storage: &mut S, kind: StateKind, state: &T) -> Result<()>
where
    S: Storage + ?Sized,
    T: Serialize + Sync,
{
    let value = serde_json::to_value(state)?;
    storage.save_state(kind, &value).await
}

/// Load a typed manager from a state snapshot, or its default when none is stored.
pub async fn load_state_as<S, T>(storage: &S, kind: StateKind) -> Result<T>
where
    S: Storage + ?Sized,
    T: DeserializeOwned + Default,
{
    match storage.load_state(kind).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(T::default()),
    }
}
