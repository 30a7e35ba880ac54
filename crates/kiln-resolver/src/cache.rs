//! Per-run memoization for the gatherer.
//!
//! Both structures live for a single resolution call; nothing here is
//! shared between runs.

use std::collections::{HashMap, HashSet};

use crate::candidate::PackageRequest;

/// Memo of `(name, range) -> matching versions`, filled once per distinct
/// request so the oracle is asked at most once per range.
#[derive(Debug, Default)]
pub struct RangeCache {
    entries: HashMap<PackageRequest, Vec<String>>,
    hits: usize,
}

impl RangeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, request: &PackageRequest) -> Option<&[String]> {
        self.entries.get(request).map(Vec::as_slice)
    }

    /// Like [`RangeCache::get`] but counts the lookup as a hit.
    pub fn lookup(&mut self, request: &PackageRequest) -> Option<&[String]> {
        let found = self.entries.get(request);
        if found.is_some() {
            self.hits += 1;
        }
        found.map(Vec::as_slice)
    }

    pub fn insert(&mut self, request: PackageRequest, versions: Vec<String>) {
        self.entries.insert(request, versions);
    }

    /// Number of distinct requests sent to the oracle.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered without asking the oracle.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

/// Tracks which concrete `(name, version)` pairs have been expanded, which
/// is what bounds recursion on diamonds and cycles.
#[derive(Debug, Default)]
pub struct VisitedSet {
    visited: HashSet<(String, String)>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a pair as visited. Returns `false` if it already was.
    pub fn visit(&mut self, name: &str, version: &str) -> bool {
        self.visited.insert((name.to_string(), version.to_string()))
    }

    pub fn contains(&self, name: &str, version: &str) -> bool {
        self.visited
            .contains(&(name.to_string(), version.to_string()))
    }
}
