//! The version oracle: where published versions and their dependency
//! ranges come from.

use std::collections::BTreeMap;

use crate::candidate::VersionRange;
use crate::interval::Interval;
use crate::version::Version;

/// Answers the two questions the gatherer asks about a registry.
///
/// Errors are plain messages; the resolver wraps them as
/// [`crate::ResolveError::OracleFailure`]. Implementations must not retry
/// on behalf of the resolver beyond what their own transport does.
pub trait VersionOracle {
    /// Published versions of `name` satisfying `range`. An unknown package
    /// yields an empty list.
    fn satisfying_versions(&self, name: &str, range: &VersionRange) -> Result<Vec<String>, String>;

    /// Direct dependency ranges of one published version.
    fn direct_deps(
        &self,
        name: &str,
        version: &str,
    ) -> Result<BTreeMap<String, VersionRange>, String>;
}

impl<T: VersionOracle + ?Sized> VersionOracle for &T {
    fn satisfying_versions(&self, name: &str, range: &VersionRange) -> Result<Vec<String>, String> {
        (**self).satisfying_versions(name, range)
    }

    fn direct_deps(
        &self,
        name: &str,
        version: &str,
    ) -> Result<BTreeMap<String, VersionRange>, String> {
        (**self).direct_deps(name, version)
    }
}

/// An in-memory oracle over a fixed set of published packages.
///
/// Versions are returned in ascending order regardless of publish order.
#[derive(Debug, Clone, Default)]
pub struct IndexOracle {
    packages: BTreeMap<String, Vec<Published>>,
}

#[derive(Debug, Clone)]
struct Published {
    version: Version,
    deps: BTreeMap<String, VersionRange>,
}

impl IndexOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a published version. Returns `false` (and changes nothing) if
    /// an equal version of `name` was already published, so `1.0` and
    /// `1.0.0` count as the same release.
    pub fn publish<I, K, V>(&mut self, name: &str, version: &str, deps: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<VersionRange>,
    {
        let version = Version::parse(version);
        let entries = self.packages.entry(name.to_string()).or_default();
        if entries.iter().any(|p| p.version == version) {
            return false;
        }
        let deps = deps
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let pos = entries.partition_point(|p| p.version <= version);
        entries.insert(pos, Published { version, deps });
        true
    }

    /// Builder-style [`IndexOracle::publish`] for tests and fixtures.
    pub fn with<I, K, V>(mut self, name: &str, version: &str, deps: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<VersionRange>,
    {
        self.publish(name, version, deps);
        self
    }

    /// Number of published `(name, version)` pairs.
    pub fn len(&self) -> usize {
        self.packages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All published versions of `name`, ascending.
    pub fn versions(&self, name: &str) -> Vec<&str> {
        self.packages
            .get(name)
            .map(|entries| entries.iter().map(|p| p.version.as_str()).collect())
            .unwrap_or_default()
    }
}

impl VersionOracle for IndexOracle {
    fn satisfying_versions(&self, name: &str, range: &VersionRange) -> Result<Vec<String>, String> {
        let interval = Interval::parse(range.as_str())
            .map_err(|e| format!("invalid range for `{name}`: {e}"))?;
        Ok(self
            .packages
            .get(name)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|p| interval.satisfies(&p.version))
                    .map(|p| p.version.as_str().to_string())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn direct_deps(
        &self,
        name: &str,
        version: &str,
    ) -> Result<BTreeMap<String, VersionRange>, String> {
        self.packages
            .get(name)
            .and_then(|entries| entries.iter().find(|p| p.version.as_str() == version))
            .map(|p| p.deps.clone())
            .ok_or_else(|| format!("`{name}@{version}` is not published"))
    }
}
