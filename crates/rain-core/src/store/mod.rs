//! Persistence of user servers.
//!
//! The wizard only talks to [`ServerStore`]; [`JsonServerStore`] is the file
//! backed implementation the CLI uses.

mod json;

use std::future::Future;

use thiserror::Error;

use crate::types::UserServer;

pub use json::JsonServerStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Server with ID '{0}' already exists")]
    Duplicate(String),

    #[error("Server with ID '{0}' not found")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Backend(String),
}

/// Create/update/delete over persisted servers. Every call may fail.
pub trait ServerStore {
    fn list(&self) -> impl Future<Output = Result<Vec<UserServer>, StoreError>> + Send;

    /// Store a new server and return it as persisted.
    fn create(
        &self,
        server: UserServer,
    ) -> impl Future<Output = Result<UserServer, StoreError>> + Send;

    fn update(
        &self,
        server: UserServer,
    ) -> impl Future<Output = Result<UserServer, StoreError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}
