//! MCP registry `server.json` descriptors
//!
//! Mirrors the official registry schema closely enough to drive the install
//! wizard. Registry data is only partially trusted: argument kinds may be empty
//! or unknown, so they deserialize leniently instead of failing the catalog.

use serde::{Deserialize, Serialize};

/// One server published in the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSchema {
    /// Reverse-DNS name, e.g. "io.github.user/weather"
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,

    /// Locally installable distributions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<Package>,

    /// Hosted endpoints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remotes: Vec<RemoteTransport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Repository {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Package distribution of a server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// npm, pypi, oci, nuget, mcpb, ...
    pub registry_type: String,

    pub identifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// npx, uvx, docker, dnx
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_hint: Option<String>,

    #[serde(default)]
    pub transport: LocalTransport,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub package_arguments: Vec<Argument>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment_variables: Vec<EnvironmentVariable>,
}

impl Package {
    /// Stable identifier recorded as the origin of installed servers
    pub fn package_id(&self) -> String {
        format!("{}:{}", self.registry_type, self.identifier)
    }
}

/// How a package talks once launched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LocalTransport {
    #[default]
    Stdio,
    Sse {
        url: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        headers: Vec<EnvironmentVariable>,
    },
    StreamableHttp {
        url: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        headers: Vec<EnvironmentVariable>,
    },
}

impl LocalTransport {
    /// URL of a network transport, `None` for stdio
    pub fn url(&self) -> Option<&str> {
        match self {
            LocalTransport::Stdio => None,
            LocalTransport::Sse { url, .. } | LocalTransport::StreamableHttp { url, .. } => {
                Some(url)
            }
        }
    }
}

/// Hosted endpoint of a server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RemoteTransport {
    Sse {
        url: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        headers: Vec<EnvironmentVariable>,
    },
    StreamableHttp {
        url: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        headers: Vec<EnvironmentVariable>,
    },
}

impl RemoteTransport {
    pub fn url(&self) -> &str {
        match self {
            RemoteTransport::Sse { url, .. } | RemoteTransport::StreamableHttp { url, .. } => url,
        }
    }

    pub fn headers(&self) -> &[EnvironmentVariable] {
        match self {
            RemoteTransport::Sse { headers, .. }
            | RemoteTransport::StreamableHttp { headers, .. } => headers,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RemoteTransport::Sse { .. } => "sse",
            RemoteTransport::StreamableHttp { .. } => "streamable-http",
        }
    }
}

/// Declared input: an environment variable, or a header for remotes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentVariable {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub is_required: bool,

    #[serde(default)]
    pub is_secret: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Fixed value, not user-configurable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

/// Argument kinds; anything else the registry sends is `Unknown`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    Positional,
    Named,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Command-line argument declared by a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    #[serde(rename = "type", default)]
    pub kind: ArgumentKind,

    /// Flag name for named arguments, including dashes ("--port")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Fixed value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_hint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub is_required: bool,

    #[serde(default)]
    pub is_secret: bool,

    #[serde(default)]
    pub is_repeated: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl ServerSchema {
    /// Packages and remotes offered together, packages first
    pub fn option_count(&self) -> usize {
        self.packages.len() + self.remotes.len()
    }

    /// Resolve a combined option index into a package or a remote
    pub fn option(&self, index: usize) -> Option<SchemaOption<'_>> {
        if let Some(package) = self.packages.get(index) {
            return Some(SchemaOption::Package(package));
        }
        self.remotes
            .get(index.checked_sub(self.packages.len())?)
            .map(SchemaOption::Remote)
    }
}

/// Either side of a schema's install options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaOption<'a> {
    Package(&'a Package),
    Remote(&'a RemoteTransport),
}

impl<'a> SchemaOption<'a> {
    /// Inputs the user can fill in for this option
    pub fn variables(&self) -> &'a [EnvironmentVariable] {
        match self {
            SchemaOption::Package(package) => &package.environment_variables,
            SchemaOption::Remote(remote) => remote.headers(),
        }
    }

    /// One-line label for selection lists
    pub fn label(&self) -> String {
        match self {
            SchemaOption::Package(package) => match &package.version {
                Some(version) => format!(
                    "{} {}@{}",
                    package.registry_type, package.identifier, version
                ),
                None => format!("{} {}", package.registry_type, package.identifier),
            },
            SchemaOption::Remote(remote) => format!("{} {}", remote.label(), remote.url()),
        }
    }
}
