//! Render entries as the `mcpServers` document agents read.

use serde_json::{Map, Value};

use super::spec::AgentServerEntry;

/// `{"mcpServers": {"<name>": {...}}}` with the internal `type` tag dropped.
///
/// The output is accepted back by the clipboard importer unchanged.
pub fn to_mcp_servers_json<'a, I>(entries: I) -> serde_json::Result<Value>
where
    I: IntoIterator<Item = (&'a str, &'a AgentServerEntry)>,
{
    let mut servers = Map::new();
    for (name, entry) in entries {
        let body = match entry {
            AgentServerEntry::Local(local) => serde_json::to_value(local)?,
            AgentServerEntry::Remote(remote) => serde_json::to_value(remote)?,
        };
        servers.insert(name.to_string(), body);
    }

    let mut root = Map::new();
    root.insert("mcpServers".to_string(), Value::Object(servers));
    Ok(Value::Object(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::EnvMap;
    use serde_json::json;

    #[test]
    fn test_export_drops_type_tag() {
        let local = AgentServerEntry::local(
            "npx".to_string(),
            vec!["-y".to_string(), "weather-mcp".to_string()],
            EnvMap::new(),
        );
        let remote = AgentServerEntry::remote("https://example.com/mcp".to_string(), EnvMap::new());

        let doc = to_mcp_servers_json([("weather", &local), ("example", &remote)]).unwrap();

        assert_eq!(
            doc,
            json!({
                "mcpServers": {
                    "weather": {"command": "npx", "args": ["-y", "weather-mcp"]},
                    "example": {"url": "https://example.com/mcp"}
                }
            })
        );
    }

    #[test]
    fn test_export_empty() {
        let doc = to_mcp_servers_json(std::iter::empty()).unwrap();
        assert_eq!(doc, json!({"mcpServers": {}}));
    }
}
