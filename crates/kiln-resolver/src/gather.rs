//! Candidate gathering: expand root ranges into every concrete
//! `(name, version)` that could take part in a solution.
//!
//! Expansion is depth-first and strictly sequential. Each concrete pair is
//! appended to the arena at most once; the visited set is what makes
//! diamonds and cycles terminate.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::cache::{RangeCache, VisitedSet};
use crate::candidate::{CandidateList, CandidateNode, PackageRequest, VersionRange};
use crate::error::ResolveError;
use crate::oracle::VersionOracle;

/// Expand `roots` into the ordered candidate list.
pub fn gather_all<O>(
    oracle: &O,
    roots: &BTreeMap<String, VersionRange>,
) -> Result<CandidateList, ResolveError>
where
    O: VersionOracle + ?Sized,
{
    let mut gatherer = Gatherer::new(oracle);
    let mut root_requests = Vec::with_capacity(roots.len());

    for (name, range) in roots {
        let request = PackageRequest::new(name.as_str(), range.clone());
        let versions = gatherer.versions_for(&request)?;
        root_requests.push(request);
        for version in versions {
            gatherer.expand(name, &version)?;
        }
    }

    debug!(
        candidates = gatherer.nodes.len(),
        ranges = gatherer.ranges.len(),
        cache_hits = gatherer.ranges.hits(),
        "gathered candidates"
    );
    Ok(CandidateList::new(
        gatherer.nodes,
        root_requests,
        gatherer.ranges,
    ))
}

struct Gatherer<'o, O: ?Sized> {
    oracle: &'o O,
    nodes: Vec<CandidateNode>,
    visited: VisitedSet,
    ranges: RangeCache,
}

impl<'o, O> Gatherer<'o, O>
where
    O: VersionOracle + ?Sized,
{
    fn new(oracle: &'o O) -> Self {
        Self {
            oracle,
            nodes: Vec::new(),
            visited: VisitedSet::new(),
            ranges: RangeCache::new(),
        }
    }

    /// Versions matching `request`, asking the oracle only on a cache miss.
    /// Zero matches is an error, never an empty success.
    fn versions_for(&mut self, request: &PackageRequest) -> Result<Vec<String>, ResolveError> {
        if let Some(cached) = self.ranges.lookup(request) {
            trace!(%request, "range cache hit");
            return Ok(cached.to_vec());
        }

        debug!(%request, "querying oracle for matching versions");
        let versions = self
            .oracle
            .satisfying_versions(&request.name, &request.range)
            .map_err(|message| ResolveError::OracleFailure { message })?;

        if versions.is_empty() {
            return Err(ResolveError::NoSatisfyingVersion {
                name: request.name.clone(),
                range: request.range.to_string(),
            });
        }

        self.ranges.insert(request.clone(), versions.clone());
        Ok(versions)
    }

    fn expand(&mut self, name: &str, version: &str) -> Result<(), ResolveError> {
        if self.visited.contains(name, version) {
            return Ok(());
        }

        let direct = self
            .oracle
            .direct_deps(name, version)
            .map_err(|message| ResolveError::OracleFailure { message })?;

        if direct.is_empty() {
            self.visited.visit(name, version);
            self.nodes.push(CandidateNode {
                name: name.to_string(),
                version: version.to_string(),
                deps: None,
            });
            return Ok(());
        }

        let mut requests = Vec::with_capacity(direct.len());
        let mut chosen = Vec::with_capacity(direct.len());
        for (dep_name, range) in direct {
            let request = PackageRequest::new(dep_name, range);
            let versions = self.versions_for(&request)?;
            chosen.push((request.name.clone(), versions));
            requests.push(request);
        }

        // Append before recursing so a cycle back to this pair stops above.
        self.visited.visit(name, version);
        self.nodes.push(CandidateNode {
            name: name.to_string(),
            version: version.to_string(),
            deps: Some(requests),
        });

        for (dep_name, versions) in chosen {
            for dep_version in versions {
                self.expand(&dep_name, &dep_version)?;
            }
        }
        Ok(())
    }
}
