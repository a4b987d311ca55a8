//! JSON file store for user servers (`servers.json`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::types::UserServer;

use super::{ServerStore, StoreError};

/// Mutations hold `write_lock` across their read-modify-write.
#[derive(Debug, Clone)]
pub struct JsonServerStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonServerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all servers; a missing file is an empty list.
    pub async fn load(&self) -> Result<Vec<UserServer>, StoreError> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub async fn save(&self, servers: &[UserServer]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(servers)?;
        tokio::fs::write(&self.path, content).await?;
        tracing::debug!("Wrote {} servers to {}", servers.len(), self.path.display());
        Ok(())
    }
}

impl ServerStore for JsonServerStore {
    async fn list(&self) -> Result<Vec<UserServer>, StoreError> {
        self.load().await
    }

    async fn create(&self, server: UserServer) -> Result<UserServer, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut servers = self.load().await?;
        if servers.iter().any(|s| s.id == server.id) {
            return Err(StoreError::Duplicate(server.id));
        }

        let server = if server.created_at.is_none() {
            UserServer {
                created_at: Some(chrono::Utc::now().to_rfc3339()),
                ..server
            }
        } else {
            server
        };

        servers.push(server.clone());
        self.save(&servers).await?;
        Ok(server)
    }

    async fn update(&self, server: UserServer) -> Result<UserServer, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut servers = self.load().await?;
        let slot = servers
            .iter_mut()
            .find(|s| s.id == server.id)
            .ok_or_else(|| StoreError::NotFound(server.id.clone()))?;
        *slot = server.clone();
        self.save(&servers).await?;
        Ok(server)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut servers = self.load().await?;
        let index = servers
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        servers.remove(index);
        self.save(&servers).await
    }
}
