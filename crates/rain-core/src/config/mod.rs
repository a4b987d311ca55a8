//! Application settings (`rain.toml`)
//!
//! Lives in `<config_dir>/rain-mcp/` unless a path is given explicitly.

pub mod parser;
pub mod schema;
pub mod store;

pub use parser::{parse_rain_toml, parse_rain_toml_str, to_toml};
pub use schema::{PathsConfig, RainConfig, SearchConfig};
pub use store::ConfigStore;
