//! Canonical MCP server launch entries.
//!
//! Every ingestion path (clipboard import, registry synthesis, manual forms)
//! converges on [`AgentServerEntry`]. The serialized form is the contract handed
//! to persistence and agent config writers:
//!
//! ```json
//! {"type": "local", "command": "npx", "args": ["-y", "pkg"], "env": {"K": "V"}}
//! {"type": "remote", "url": "https://example.com/mcp", "headers": {"Authorization": "..."}}
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// String pairs in document order (`env`, `headers`)
pub type EnvMap = IndexMap<String, String>;

/// A launch description for exactly one MCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AgentServerEntry {
    Local(LocalServerEntry),
    Remote(RemoteServerEntry),
}

/// Command-based server spawned over stdio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalServerEntry {
    pub command: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<EnvMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

/// URL-based server reached over SSE or streamable HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteServerEntry {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<EnvMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

impl AgentServerEntry {
    /// Local entry; empty args/env collapse to `None`.
    pub fn local(command: String, args: Vec<String>, env: EnvMap) -> Self {
        AgentServerEntry::Local(LocalServerEntry {
            command,
            args: non_empty_vec(args),
            env: non_empty_map(env),
            timeout: None,
        })
    }

    /// Remote entry; empty headers collapse to `None`.
    pub fn remote(url: String, headers: EnvMap) -> Self {
        AgentServerEntry::Remote(RemoteServerEntry {
            url,
            headers: non_empty_map(headers),
            timeout: None,
        })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, AgentServerEntry::Remote(_))
    }

    pub fn timeout(&self) -> Option<u32> {
        match self {
            AgentServerEntry::Local(local) => local.timeout,
            AgentServerEntry::Remote(remote) => remote.timeout,
        }
    }

    /// Short human summary: the command line or the URL.
    pub fn summary(&self) -> String {
        match self {
            AgentServerEntry::Local(local) => match &local.args {
                Some(args) => format!("{} {}", local.command, args.join(" ")),
                None => local.command.clone(),
            },
            AgentServerEntry::Remote(remote) => remote.url.clone(),
        }
    }
}

/// One server recognized in pasted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedServer {
    pub name: String,
    pub config: AgentServerEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub(crate) fn non_empty_vec(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() { None } else { Some(values) }
}

pub(crate) fn non_empty_map(values: EnvMap) -> Option<EnvMap> {
    if values.is_empty() { None } else { Some(values) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_local_entry_serializes_with_type_tag() {
        let entry = AgentServerEntry::local(
            "npx".to_string(),
            vec!["-y".to_string(), "weather-mcp".to_string()],
            EnvMap::new(),
        );

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({"type": "local", "command": "npx", "args": ["-y", "weather-mcp"]})
        );
    }

    #[test]
    fn test_remote_entry_omits_empty_headers() {
        let entry = AgentServerEntry::remote("https://example.com/mcp".to_string(), EnvMap::new());

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({"type": "remote", "url": "https://example.com/mcp"}));
    }

    #[test]
    fn test_entry_rejects_unknown_type() {
        let result: Result<AgentServerEntry, _> =
            serde_json::from_value(json!({"type": "socket", "url": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_remote_with_timeout() {
        let entry: AgentServerEntry = serde_json::from_value(json!({
            "type": "remote",
            "url": "https://example.com/sse",
            "headers": {"X-Key": "abc"},
            "timeout": 30
        }))
        .unwrap();

        assert!(entry.is_remote());
        assert_eq!(entry.timeout(), Some(30));
        assert_eq!(entry.summary(), "https://example.com/sse");
    }

    #[test]
    fn test_summary_joins_args() {
        let entry = AgentServerEntry::local(
            "uvx".to_string(),
            vec!["mcp-server-time".to_string()],
            EnvMap::new(),
        );
        assert_eq!(entry.summary(), "uvx mcp-server-time");
    }
}
