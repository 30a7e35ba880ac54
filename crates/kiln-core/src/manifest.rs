use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kiln_util::errors::KilnError;

/// The parsed representation of a `Kiln.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub package: PackageMetadata,

    /// Package name to version range, e.g. `fmt = ">=10.0.0 and <11.0.0"`.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default, rename = "dev-dependencies")]
    pub dev_dependencies: BTreeMap<String, String>,

    #[serde(default)]
    pub registry: Option<RegistrySection>,
}

/// Package identity and metadata from the `[package]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub license: Option<String>,
}

/// Per-project registry override from `[registry]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySection {
    /// Local path (relative to the manifest) or `http(s)://` URL.
    pub index: String,
}

impl Manifest {
    /// Load and parse a `Kiln.toml` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KilnError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_str(&content)
    }

    /// Parse and validate a `Kiln.toml` from a string.
    pub fn from_str(content: &str) -> miette::Result<Self> {
        let manifest: Self = toml::from_str(content).map_err(|e| KilnError::Manifest {
            message: format!("Failed to parse Kiln.toml: {e}"),
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> miette::Result<()> {
        if self.package.name.trim().is_empty() {
            return Err(manifest_error("package name must not be empty"));
        }
        semver::Version::parse(&self.package.version).map_err(|e| {
            manifest_error(format!(
                "package version `{}` is not valid semver: {e}",
                self.package.version
            ))
        })?;
        for (name, range) in self.dependencies.iter().chain(&self.dev_dependencies) {
            if range.trim().is_empty() {
                return Err(manifest_error(format!(
                    "dependency `{name}` has an empty version range"
                )));
            }
        }
        Ok(())
    }

    /// All root requirements: `[dependencies]` and `[dev-dependencies]`
    /// merged. A name declared in both tables is an error.
    pub fn roots(&self) -> miette::Result<BTreeMap<String, String>> {
        let mut roots = self.dependencies.clone();
        for (name, range) in &self.dev_dependencies {
            if roots.contains_key(name) {
                return Err(manifest_error(format!(
                    "`{name}` is declared in both [dependencies] and [dev-dependencies]"
                )));
            }
            roots.insert(name.clone(), range.clone());
        }
        Ok(roots)
    }

    /// The `[registry] index` of this manifest, with relative paths
    /// resolved against `project_root`. URLs are returned unchanged.
    pub fn registry_index(&self, project_root: &Path) -> Option<String> {
        let index = &self.registry.as_ref()?.index;
        if index.starts_with("http://") || index.starts_with("https://") {
            return Some(index.clone());
        }
        let path = PathBuf::from(index);
        if path.is_absolute() {
            Some(index.clone())
        } else {
            Some(project_root.join(path).display().to_string())
        }
    }
}

fn manifest_error(message: impl Into<String>) -> miette::Report {
    KilnError::Manifest {
        message: message.into(),
    }
    .into()
}

/// Find the directory holding `Kiln.toml`, starting at `start` and walking
/// up through its ancestors.
pub fn find_project_root(start: &Path) -> miette::Result<PathBuf> {
    kiln_util::fs::find_ancestor_with(start, crate::MANIFEST_FILE).ok_or_else(|| {
        manifest_error(format!(
            "could not find {} in {} or any parent directory",
            crate::MANIFEST_FILE,
            start.display()
        ))
    })
}
