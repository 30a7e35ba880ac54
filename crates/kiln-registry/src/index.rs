//! The index document and its conversion into an oracle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use kiln_resolver::IndexOracle;
use kiln_util::errors::KilnError;

use crate::source::IndexFormat;

/// A registry index: every published version of every package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryIndex {
    #[serde(default)]
    pub package: Vec<IndexEntry>,
}

/// One published `(name, version)` and its dependency ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

impl RegistryIndex {
    pub fn parse(content: &str, format: IndexFormat) -> miette::Result<Self> {
        let parsed: Result<Self, String> = match format {
            IndexFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            IndexFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|e| registry_error(format!("Failed to parse index: {e}")))
    }

    /// Build the oracle. Duplicate `(name, version)` entries and empty
    /// names or versions are rejected.
    pub fn into_oracle(self) -> miette::Result<IndexOracle> {
        let mut oracle = IndexOracle::new();
        for entry in self.package {
            if entry.name.trim().is_empty() || entry.version.trim().is_empty() {
                return Err(registry_error(format!(
                    "index entry `{}@{}` has an empty name or version",
                    entry.name, entry.version
                )));
            }
            if !oracle.publish(&entry.name, &entry.version, entry.dependencies) {
                return Err(registry_error(format!(
                    "`{}@{}` is listed more than once",
                    entry.name, entry.version
                )));
            }
        }
        Ok(oracle)
    }
}

fn registry_error(message: String) -> miette::Report {
    KilnError::Registry { message }.into()
}
