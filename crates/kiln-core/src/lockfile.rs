use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use kiln_util::errors::KilnError;

/// Deterministic lockfile recording the exact resolved versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    #[serde(default)]
    pub metadata: LockMetadata,
    #[serde(default)]
    pub package: Vec<LockedPackage>,
}

/// What the lockfile was resolved from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockMetadata {
    /// Root requirements (name to range) at the time of resolution.
    #[serde(default)]
    pub roots: BTreeMap<String, String>,
}

/// A single locked package and its pinned direct dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedPackage {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<LockedDependencyRef>,
}

/// A reference to another package within the lockfile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LockedDependencyRef {
    pub name: String,
    pub version: String,
}

impl Lockfile {
    /// Build a lockfile, sorting packages and their dependency lists so the
    /// written file does not depend on resolution order.
    pub fn new(roots: BTreeMap<String, String>, mut package: Vec<LockedPackage>) -> Self {
        for pkg in &mut package {
            pkg.dependencies.sort();
        }
        package.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));
        Self {
            metadata: LockMetadata { roots },
            package,
        }
    }

    /// Load and parse a `Kiln.lock` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KilnError::Lockfile {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            KilnError::Lockfile {
                message: format!("Failed to parse Kiln.lock: {e}"),
            }
            .into()
        })
    }

    /// Serialize the lockfile to a pretty-printed TOML string.
    pub fn to_string_pretty(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Write the lockfile to `path`.
    pub fn write_to(&self, path: &Path) -> miette::Result<()> {
        let content = self.to_string_pretty().map_err(|e| KilnError::Lockfile {
            message: format!("Failed to serialize Kiln.lock: {e}"),
        })?;
        kiln_util::fs::write_string(path, &content).map_err(KilnError::Io)?;
        tracing::debug!(path = %path.display(), packages = self.package.len(), "wrote lockfile");
        Ok(())
    }

    /// Whether this lockfile was resolved from exactly `roots`.
    pub fn is_fresh(&self, roots: &BTreeMap<String, String>) -> bool {
        self.metadata.roots == *roots
    }

    pub fn find(&self, name: &str) -> Option<&LockedPackage> {
        self.package.iter().find(|p| p.name == name)
    }
}
