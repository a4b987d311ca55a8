//! Recognize server configurations in parsed JSON.
//!
//! Accepted shapes, checked in this order:
//!
//! 1. `{"mcpServers": {...}}` (or VS Code's `{"servers": {...}}` when that
//!    value is not itself a server named `servers`)
//! 2. `{"url": "..."}`: one bare remote server
//! 3. `{"command": "..."}`: one bare local server
//! 4. `{"name": {...}, ...}`: a map of servers
//!
//! Inside a server map, entries without `url` or `command` are skipped; only a
//! map with nothing left is an error.

use serde_json::{Map, Value};

use crate::mcp::{AgentServerEntry, EnvMap, LocalServerEntry, ParsedServer, RemoteServerEntry};
use crate::naming::suggest_server_name;

use super::ImportError;

/// Key whose object value is always a server map
pub const SERVER_COLLECTION_KEY: &str = "mcpServers";

/// VS Code's collection key, also a plausible server name
pub const ALT_COLLECTION_KEY: &str = "servers";

pub fn classify(value: &Value) -> Result<Vec<ParsedServer>, ImportError> {
    let Value::Object(obj) = value else {
        return Err(ImportError::InvalidFormat);
    };

    if let Some(Value::Object(inner)) = obj.get(SERVER_COLLECTION_KEY) {
        return extract_server_map(inner);
    }

    if let Some(Value::Object(inner)) = obj.get(ALT_COLLECTION_KEY)
        && !is_server(inner)
    {
        return extract_server_map(inner);
    }

    if obj.get("url").is_some_and(Value::is_string)
        && let Some(entry) = extract_entry(obj)
    {
        return Ok(vec![bare_server(entry, description(obj))]);
    }

    if obj.get("command").is_some_and(Value::is_string)
        && let Some(entry) = extract_entry(obj)
    {
        return Ok(vec![bare_server(entry, None)]);
    }

    if looks_like_server_map(obj) {
        return extract_server_map(obj);
    }

    Err(ImportError::Unrecognized)
}

fn bare_server(config: AgentServerEntry, description: Option<String>) -> ParsedServer {
    ParsedServer {
        name: suggest_server_name(&config),
        config,
        description,
    }
}

/// Every value is an object and at least one of them looks like a server.
fn looks_like_server_map(obj: &Map<String, Value>) -> bool {
    !obj.is_empty()
        && obj.values().all(Value::is_object)
        && obj
            .values()
            .filter_map(Value::as_object)
            .any(is_server)
}

fn is_server(obj: &Map<String, Value>) -> bool {
    has_string(obj, "url") || has_string(obj, "command")
}

fn extract_server_map(obj: &Map<String, Value>) -> Result<Vec<ParsedServer>, ImportError> {
    let mut servers = Vec::new();

    for (name, value) in obj {
        let Some(entry) = value.as_object() else {
            tracing::debug!("Skipping '{}': not an object", name);
            continue;
        };
        let Some(config) = extract_entry(entry) else {
            tracing::debug!("Skipping '{}': neither url nor command", name);
            continue;
        };
        let description = match config {
            AgentServerEntry::Remote(_) => description(entry),
            AgentServerEntry::Local(_) => None,
        };
        servers.push(ParsedServer {
            name: name.clone(),
            config,
            description,
        });
    }

    if servers.is_empty() {
        return Err(ImportError::NoValidServers);
    }
    Ok(servers)
}

/// `url` wins over `command` when both are present.
fn extract_entry(obj: &Map<String, Value>) -> Option<AgentServerEntry> {
    if let Some(url) = obj.get("url").and_then(Value::as_str) {
        return Some(AgentServerEntry::Remote(RemoteServerEntry {
            url: url.to_string(),
            headers: string_map(obj.get("headers")),
            timeout: timeout(obj),
        }));
    }

    let command = obj.get("command").and_then(Value::as_str)?;
    Some(AgentServerEntry::Local(LocalServerEntry {
        command: command.to_string(),
        args: string_list(obj.get("args")),
        env: string_map(obj.get("env")),
        timeout: timeout(obj),
    }))
}

fn has_string(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(Value::is_string)
}

fn description(obj: &Map<String, Value>) -> Option<String> {
    obj.get("description")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// All-or-nothing: one non-string element drops the whole list.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    value?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn string_map(value: Option<&Value>) -> Option<EnvMap> {
    value?
        .as_object()?
        .iter()
        .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect()
}

fn timeout(obj: &Map<String, Value>) -> Option<u32> {
    obj.get("timeout")
        .and_then(Value::as_u64)
        .and_then(|t| u32::try_from(t).ok())
}
