//! Rain Core Library
//!
//! Turns pasted configuration fragments and MCP registry descriptors into
//! canonical server entries, and drives the add-server wizard that produces
//! them.

pub mod config;
pub mod import;
pub mod mcp;
pub mod naming;
pub mod registry;
pub mod runtime;
pub mod search;
pub mod store;
pub mod types;
pub mod wizard;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, RainConfig};

    // Canonical entries
    pub use crate::mcp::{AgentServerEntry, LocalServerEntry, ParsedServer, RemoteServerEntry};

    // Import
    pub use crate::import::{ClipboardSource, ImportError, parse_content, parse_from_clipboard};

    // Registry
    pub use crate::registry::{Package, RemoteTransport, SchemaOption, SchemaStore, ServerSchema};

    // Search
    pub use crate::search::{SchemaIndex, SchemaSearch, SearchOptions};

    // Persistence
    pub use crate::store::{JsonServerStore, ServerStore, StoreError};
    pub use crate::types::{OriginType, ServerOrigin, UserServer};

    // Wizard
    pub use crate::wizard::{ServerType, Step, WizardSession, WizardState};
}
