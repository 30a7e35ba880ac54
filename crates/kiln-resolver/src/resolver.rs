//! Resolution entry point: gather, encode, solve, assemble.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::assemble::assemble;
use crate::candidate::{CandidateList, VersionRange};
use crate::cnf::{encode_groups, Clause, EncodeOptions, DEFAULT_EXACTLY_ONE_THRESHOLD};
use crate::conflict::{minimal_conflict, ConflictReport};
use crate::error::ResolveError;
use crate::gather::gather_all;
use crate::graph::ResolvedGraph;
use crate::oracle::VersionOracle;
use crate::sat::{SatEngine, SatError, VarisatEngine};

/// Knobs that change how a resolution runs, never which graphs are valid.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// Same-name groups larger than this use pairwise exactly-one clauses.
    pub exactly_one_threshold: usize,
    /// Shrink an unsatisfiable formula to the packages actually in conflict.
    /// Costs one extra solve per package name.
    pub explain_conflicts: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            exactly_one_threshold: DEFAULT_EXACTLY_ONE_THRESHOLD,
            explain_conflicts: true,
        }
    }
}

/// Size of the problem a resolution solved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub candidates: usize,
    /// SAT variables handed to the engine, one per candidate.
    pub variables: usize,
    /// Distinct package names among the candidates.
    pub packages: usize,
    pub clauses: usize,
}

/// The output of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub graph: ResolvedGraph,
    pub stats: ResolutionStats,
}

/// Resolve `roots` against `oracle` with the default engine and options.
pub fn resolve<O>(
    oracle: &O,
    roots: &BTreeMap<String, VersionRange>,
) -> Result<ResolvedGraph, ResolveError>
where
    O: VersionOracle + ?Sized,
{
    Resolver::new(oracle).resolve(roots).map(|r| r.graph)
}

/// A configured resolver. Holds no per-run state, so one instance can run
/// any number of resolutions.
pub struct Resolver<O, S = VarisatEngine> {
    oracle: O,
    engine: S,
    options: ResolveOptions,
}

impl<O: VersionOracle> Resolver<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            engine: VarisatEngine,
            options: ResolveOptions::default(),
        }
    }
}

impl<O: VersionOracle, S: SatEngine> Resolver<O, S> {
    /// Swap in another SAT engine.
    pub fn with_engine<E: SatEngine>(self, engine: E) -> Resolver<O, E> {
        Resolver {
            oracle: self.oracle,
            engine,
            options: self.options,
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Only the gathering step: every candidate the roots can reach.
    pub fn candidates(
        &self,
        roots: &BTreeMap<String, VersionRange>,
    ) -> Result<CandidateList, ResolveError> {
        gather_all(&self.oracle, roots)
    }

    pub fn resolve(
        &self,
        roots: &BTreeMap<String, VersionRange>,
    ) -> Result<Resolution, ResolveError> {
        let list = self.candidates(roots)?;
        let encode_options = EncodeOptions {
            exactly_one_threshold: self.options.exactly_one_threshold,
        };
        let groups = encode_groups(&list, &encode_options)?;
        let clauses: Vec<Clause> = groups.iter().flat_map(|g| g.clauses.clone()).collect();

        let stats = ResolutionStats {
            candidates: list.len(),
            variables: list.len(),
            packages: groups.len(),
            clauses: clauses.len(),
        };
        debug!(?stats, "encoded resolution problem");

        let assignment = match self.engine.solve(&clauses, stats.variables) {
            Ok(assignment) => assignment,
            Err(SatError::Unsatisfiable) => {
                let names = if self.options.explain_conflicts {
                    minimal_conflict(&groups, stats.variables, &self.engine)
                        .map_err(engine_failure)?
                } else {
                    groups.iter().map(|g| g.name.clone()).collect()
                };
                let report = ConflictReport::from_candidates(&list, &names);
                warn!(packages = ?names, "no consistent set of versions exists");
                return Err(ResolveError::ConflictingConstraints {
                    names,
                    report: Some(report.to_string()),
                });
            }
            Err(e) => return Err(engine_failure(e)),
        };

        let graph = assemble(&list, &assignment)?;
        info!(
            packages = graph.len(),
            candidates = stats.candidates,
            clauses = stats.clauses,
            "resolved dependency graph"
        );
        Ok(Resolution { graph, stats })
    }
}

fn engine_failure(e: SatError) -> ResolveError {
    ResolveError::internal(e.to_string())
}
