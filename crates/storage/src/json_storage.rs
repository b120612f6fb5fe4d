//! JSON file storage implementation.
//!
//! Stores data as pretty-printed JSON files under a root directory (`.qms` by
//! default) and keeps small per-object meta markers (version + updated_at).

use std::path::{Path, PathBuf};

use qms_core::{Organization, OrganizationId};
use tokio::fs;

use super::{Result, StateKind, Storage, StorageError};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage, creating the `organizations/`, `state/` and `meta/`
    /// subdirectories as needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("organizations")).await?;
        fs::create_dir_all(root.join("state")).await?;
        fs::create_dir_all(root.join("meta").join("organizations")).await?;
        fs::create_dir_all(root.join("meta").join("state")).await?;

        tracing::debug!(root = %root.display(), "JSON storage opened");
        Ok(Self { root })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn organization_path(&self, id: &OrganizationId) -> Result<PathBuf> {
        let id = file_stem(id.as_str())?;
        Ok(self.root.join("organizations").join(format!("{id}.json")))
    }

    fn state_path(&self, kind: StateKind) -> PathBuf {
        self.root.join("state").join(format!("{kind}.json"))
    }

    fn meta_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join("meta").join(kind).join(format!("{id}.meta.json"))
    }

    /// Read and increment per-object version, return new version.
    async fn bump_version(&self, kind: &str, id: &str) -> Result<u64> {
        let path = self.meta_path(kind, id);
        let mut version = 0u64;
        if let Ok(s) = fs::read_to_string(&path).await {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&s) {
                if let Some(v) = json.get("version").and_then(|v| v.as_u64()) {
                    version = v;
                }
            }
        }
        version += 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }

    /// Number of times an organization has been saved.
    pub async fn organization_version(&self, id: &OrganizationId) -> Result<u64> {
        let path = self.meta_path("organizations", file_stem(id.as_str())?);
        let meta: Option<serde_json::Value> = read_json(&path).await?;
        Ok(meta
            .and_then(|m| m.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0))
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_organization(&mut self, org: &Organization) -> Result<()> {
        let path = self.organization_path(&org.id)?;
        let json = serde_json::to_string_pretty(org)?;
        fs::write(&path, json.as_bytes()).await?;

        let version = self.bump_version("organizations", org.id.as_str()).await?;
        tracing::info!(organization = %org.id, version, "Organization saved");
        Ok(())
    }

    async fn load_organization(&self, id: &OrganizationId) -> Result<Option<Organization>> {
        read_json(&self.organization_path(id)?).await
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        let mut orgs: Vec<Organization> = list_dir(&self.root.join("organizations")).await?;
        orgs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(orgs)
    }

    async fn delete_organization(&mut self, id: &OrganizationId) -> Result<()> {
        for path in [
            self.organization_path(id)?,
            self.meta_path("organizations", id.as_str()),
        ] {
            fs::remove_file(path).await.or_else(|e| {
                if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
            })?;
        }
        tracing::info!(organization = %id, "Organization deleted");
        Ok(())
    }

    async fn save_state(&mut self, kind: StateKind, state: &serde_json::Value) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        fs::write(self.state_path(kind), json.as_bytes()).await?;

        let version = self.bump_version("state", kind.as_str()).await?;
        tracing::debug!(state = %kind, version, "State saved");
        Ok(())
    }

    async fn load_state(&self, kind: StateKind) -> Result<Option<serde_json::Value>> {
        read_json(&self.state_path(kind)).await
    }
}

fn file_stem(id: &str) -> Result<&str> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(StorageError::InvalidId(id.to_string()));
    }
    Ok(id)
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&entry.path()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => tracing::warn!(path = %entry.path().display(), error = %e, "Skipping unreadable file"),
        }
    }
    Ok(items)
}
