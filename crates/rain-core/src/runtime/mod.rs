//! Runtime resolution for registry packages.
//!
//! Maps a package's `runtimeHint` (or, without a hint, its `registryType`) to the
//! launcher command and its leading arguments:
//!
//! | runtimeHint | registryType (no hint) | command  | base args      |
//! |-------------|------------------------|----------|----------------|
//! | `npx`       | `npm`                  | `npx`    | `-y`           |
//! | `uvx`       | `pypi`                 | `uvx`    |                |
//! | `docker`    | `oci`                  | `docker` | `run -i`       |
//! | `dnx`       |                        | `dnx`    |                |
//!
//! Anything else falls back to `npx -y`. Resolution never fails.

use crate::registry::{Argument, ArgumentKind, Package};

/// Launcher used to run a package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    Npx,
    Uvx,
    Docker,
    Dnx,
}

impl RuntimeKind {
    /// First match wins; an explicit hint always beats registry-type inference.
    pub fn resolve(runtime_hint: Option<&str>, registry_type: &str) -> Self {
        match (runtime_hint, registry_type) {
            (Some("npx"), _) | (None, "npm") => RuntimeKind::Npx,
            (Some("uvx"), _) | (None, "pypi") => RuntimeKind::Uvx,
            (Some("docker"), _) | (None, "oci") => RuntimeKind::Docker,
            (Some("dnx"), _) => RuntimeKind::Dnx,
            _ => RuntimeKind::Npx,
        }
    }

    pub fn for_package(package: &Package) -> Self {
        Self::resolve(package.runtime_hint.as_deref(), &package.registry_type)
    }

    pub fn command(self) -> &'static str {
        match self {
            RuntimeKind::Npx => "npx",
            RuntimeKind::Uvx => "uvx",
            RuntimeKind::Docker => "docker",
            RuntimeKind::Dnx => "dnx",
        }
    }

    pub fn base_args(self) -> &'static [&'static str] {
        match self {
            RuntimeKind::Npx => &["-y"],
            RuntimeKind::Uvx | RuntimeKind::Dnx => &[],
            RuntimeKind::Docker => &["run", "-i"],
        }
    }
}

/// Executable specification for a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerSpec {
    pub command: String,
    pub args: Vec<String>,
}

/// Assemble `<command> <base args> <identifier[@version]> <package args>`.
pub fn resolve_package(package: &Package) -> RunnerSpec {
    let kind = RuntimeKind::for_package(package);

    let mut args: Vec<String> = kind.base_args().iter().map(|s| s.to_string()).collect();

    args.push(match &package.version {
        Some(version) => format!("{}@{}", package.identifier, version),
        None => package.identifier.clone(),
    });

    for argument in &package.package_arguments {
        push_argument(&mut args, argument);
    }

    RunnerSpec {
        command: kind.command().to_string(),
        args,
    }
}

// Name and value are independent: a named flag without a fixed value still
// emits its name, and a fixed value is emitted whatever the kind.
fn push_argument(args: &mut Vec<String>, argument: &Argument) {
    if argument.kind == ArgumentKind::Named
        && let Some(name) = &argument.name
    {
        args.push(name.clone());
    }
    if let Some(value) = &argument.value {
        args.push(value.clone());
    }
}
