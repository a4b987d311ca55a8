//! MCP registry descriptors and the cached catalog

pub mod schema;
pub mod store;

pub use schema::{
    Argument, ArgumentKind, EnvironmentVariable, LocalTransport, Package, RemoteTransport,
    SchemaOption, ServerSchema,
};
pub use store::{SchemaStore, is_version_newer};
