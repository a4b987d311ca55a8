//! MCP (Model Context Protocol) server entries

pub mod builder;
pub mod export;
pub mod spec;

pub use builder::{option_to_entry, package_to_entry, remote_to_entry};
pub use export::to_mcp_servers_json;
pub use spec::{AgentServerEntry, EnvMap, LocalServerEntry, ParsedServer, RemoteServerEntry};
