//! Shared records handed to persistence.

use serde::{Deserialize, Serialize};

use crate::mcp::AgentServerEntry;

/// A server the user added, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserServer {
    pub id: String,

    /// Display name
    pub name: String,

    pub config: AgentServerEntry,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<ServerOrigin>,

    /// RFC 3339 creation timestamp, stamped by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserServer {
    /// New record with a fresh v4 id.
    pub fn new(name: impl Into<String>, config: AgentServerEntry, origin: ServerOrigin) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            config,
            origin: Some(origin),
            created_at: None,
        }
    }
}

/// Where a server came from, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOrigin {
    pub origin_type: OriginType,

    /// Registry schema name, e.g. "io.github.acme/weather"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,

    /// "<registryType>:<identifier>", e.g. "npm:@acme/weather-mcp"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
}

impl ServerOrigin {
    pub fn custom() -> Self {
        Self {
            origin_type: OriginType::Custom,
            schema_name: None,
            package_id: None,
        }
    }

    pub fn registry(schema_name: impl Into<String>, package_id: Option<String>) -> Self {
        Self {
            origin_type: OriginType::Registry,
            schema_name: Some(schema_name.into()),
            package_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginType {
    /// Installed from the MCP registry
    Registry,
    /// Entered or pasted by the user
    Custom,
}
