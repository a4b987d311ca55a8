//! Builds canonical entries from registry selections.
//!
//! The builder is total: unknown runtimes fall back to `npx -y` and every
//! selection yields an entry. User-supplied values become `env` for local
//! packages and `headers` for anything reached over the network.

use crate::registry::{Package, RemoteTransport, SchemaOption};
use crate::runtime::resolve_package;

use super::spec::{AgentServerEntry, EnvMap};

/// Build the entry for a package.
///
/// A package whose transport is SSE or streamable HTTP is already running
/// somewhere; the launcher command is discarded and a remote entry is emitted.
pub fn package_to_entry(package: &Package, values: &EnvMap) -> AgentServerEntry {
    if let Some(url) = package.transport.url() {
        return AgentServerEntry::remote(url.to_string(), values.clone());
    }

    let runner = resolve_package(package);
    AgentServerEntry::local(runner.command, runner.args, values.clone())
}

/// Build the entry for a hosted remote.
pub fn remote_to_entry(
    remote: &RemoteTransport,
    values: &EnvMap,
) -> AgentServerEntry {
    AgentServerEntry::remote(remote.url().to_string(), values.clone())
}

/// Build the entry for whichever option the user picked.
pub fn option_to_entry(
    option: SchemaOption<'_>,
    values: &EnvMap,
) -> AgentServerEntry {
    match option {
        SchemaOption::Package(package) => package_to_entry(package, values),
        SchemaOption::Remote(remote) => remote_to_entry(remote, values),
    }
}
