//! Resolution data model: requests, candidates and the candidate list.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::cache::RangeCache;

/// A version-range expression, opaque to everything but the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionRange(String);

impl VersionRange {
    pub fn new(range: impl Into<String>) -> Self {
        Self(range.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VersionRange {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for VersionRange {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A package name constrained by a range, before any version is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRequest {
    pub name: String,
    pub range: VersionRange,
}

impl PackageRequest {
    pub fn new(name: impl Into<String>, range: impl Into<VersionRange>) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
        }
    }
}

impl fmt::Display for PackageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.range)
    }
}

/// A concrete package identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId {
    pub name: String,
    pub version: String,
}

impl PackageId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// One concrete (name, version) considered during resolution.
///
/// `deps` is `None` for a leaf and `Some` once the version's direct
/// dependency requests have been expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateNode {
    pub name: String,
    pub version: String,
    pub deps: Option<Vec<PackageRequest>>,
}

impl CandidateNode {
    pub fn id(&self) -> PackageId {
        PackageId::new(&self.name, &self.version)
    }
}

/// The ordered candidates of one resolution run.
///
/// A node's 1-based position is its SAT variable, so the order must never
/// change once gathering is done. The list keeps the [`RangeCache`] it was
/// built with so later stages can ask which versions matched a request
/// without going back to the oracle.
#[derive(Debug, Default)]
pub struct CandidateList {
    nodes: Vec<CandidateNode>,
    roots: Vec<PackageRequest>,
    ranges: RangeCache,
}

impl CandidateList {
    pub(crate) fn new(
        nodes: Vec<CandidateNode>,
        roots: Vec<PackageRequest>,
        ranges: RangeCache,
    ) -> Self {
        Self {
            nodes,
            roots,
            ranges,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root requests the list was gathered from.
    pub fn roots(&self) -> &[PackageRequest] {
        &self.roots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateNode> {
        self.nodes.iter()
    }

    /// The node behind a 1-based SAT variable.
    pub fn at_var(&self, var: usize) -> Option<&CandidateNode> {
        var.checked_sub(1).and_then(|i| self.nodes.get(i))
    }

    /// Concrete versions that satisfied `request` during gathering.
    pub fn matching_versions(&self, request: &PackageRequest) -> Option<&[String]> {
        self.ranges.get(request)
    }

    /// Whether `node` is one of the versions `request` matched.
    pub fn satisfies(&self, request: &PackageRequest, node: &CandidateNode) -> bool {
        node.name == request.name
            && self
                .matching_versions(request)
                .is_some_and(|versions| versions.iter().any(|v| *v == node.version))
    }

    /// Every request made of `name`, by the roots (`None`) or by a candidate.
    pub fn requests_for<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (Option<&'a CandidateNode>, &'a PackageRequest)> + 'a {
        let from_roots = self
            .roots
            .iter()
            .filter(move |r| r.name == name)
            .map(|r| (None::<&CandidateNode>, r));
        let from_nodes = self.nodes.iter().flat_map(move |node| {
            node.deps
                .iter()
                .flatten()
                .filter(move |r| r.name == name)
                .map(move |r| (Some(node), r))
        });
        from_roots.chain(from_nodes)
    }
}

impl Index<usize> for CandidateList {
    type Output = CandidateNode;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a CandidateNode;
    type IntoIter = std::slice::Iter<'a, CandidateNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
