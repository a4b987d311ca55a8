//! Cached registry catalog.
//!
//! The catalog is fetched by an external refresher and written to
//! `schema_store.json`; this module only reads, merges and rewrites it.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use semver::Version;
use serde::{Deserialize, Serialize};

use super::schema::ServerSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaStore {
    pub servers: Vec<ServerSchema>,

    /// RFC 3339 timestamp of the last refresh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl SchemaStore {
    /// Load the catalog; a missing file is an empty catalog.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema store: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse schema store: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create schema store directory: {}", parent.display())
            })?;
        }
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize schema store")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write schema store: {}", path.display()))
    }

    /// Merge freshly fetched schemas, keeping the newest version of each name.
    ///
    /// Existing order is kept; names seen for the first time are appended.
    pub fn merge_latest(&mut self, incoming: Vec<ServerSchema>) {
        let mut positions: HashMap<String, usize> = self
            .servers
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();

        for schema in incoming {
            match positions.get(&schema.name) {
                Some(&i) => {
                    if is_version_newer(&schema.version, &self.servers[i].version) {
                        self.servers[i] = schema;
                    }
                }
                None => {
                    positions.insert(schema.name.clone(), self.servers.len());
                    self.servers.push(schema);
                }
            }
        }
    }

    pub fn stamp_now(&mut self) {
        self.updated_at = Some(chrono::Utc::now().to_rfc3339());
    }
}

/// Semver comparison, with a numeric-component fallback for loose versions
pub fn is_version_newer(candidate: &str, current: &str) -> bool {
    match (Version::parse(candidate), Version::parse(current)) {
        (Ok(a), Ok(b)) => a > b,
        _ => {
            tracing::debug!(
                "Non-semver versions '{}' vs '{}', comparing numerically",
                candidate,
                current
            );
            fallback_version_compare(candidate, current)
        }
    }
}

fn fallback_version_compare(candidate: &str, current: &str) -> bool {
    let parts = |v: &str| -> Vec<u64> {
        v.split(|c: char| !c.is_ascii_digit())
            .filter_map(|s| s.parse::<u64>().ok())
            .collect()
    };

    let a = parts(candidate);
    let b = parts(current);

    for (x, y) in a.iter().zip(b.iter()) {
        if x != y {
            return x > y;
        }
    }

    // Equal prefix: the longer version is newer
    a.len() > b.len()
}
