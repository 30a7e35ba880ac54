//! Explaining unsatisfiable resolutions.

use std::fmt;

use tracing::debug;

use crate::candidate::CandidateList;
use crate::cnf::{Clause, ClauseGroup};
use crate::sat::{SatEngine, SatError};

/// Shrink `groups` to a minimal subset whose clauses are still jointly
/// unsatisfiable and return their names, sorted.
///
/// Deletion-based: each group is dropped in turn and stays dropped if the
/// remaining clauses are still unsatisfiable. Costs one solve per group.
pub fn minimal_conflict<S>(
    groups: &[ClauseGroup],
    var_count: usize,
    engine: &S,
) -> Result<Vec<String>, SatError>
where
    S: SatEngine + ?Sized,
{
    let mut keep = vec![true; groups.len()];
    for i in 0..groups.len() {
        keep[i] = false;
        let clauses: Vec<Clause> = groups
            .iter()
            .zip(&keep)
            .filter(|(_, keep)| **keep)
            .flat_map(|(g, _)| g.clauses.iter().cloned())
            .collect();
        match engine.solve(&clauses, var_count) {
            Err(SatError::Unsatisfiable) => {
                debug!(group = %groups[i].name, "not needed for the conflict");
            }
            Ok(_) => keep[i] = true,
            Err(e) => return Err(e),
        }
    }

    let mut names: Vec<String> = groups
        .iter()
        .zip(&keep)
        .filter(|(_, keep)| **keep)
        .map(|(g, _)| g.name.clone())
        .collect();
    names.sort();
    names.dedup();
    Ok(names)
}

/// Who asked for each conflicting package, and with which range.
#[derive(Debug, Default)]
pub struct ConflictReport {
    pub conflicts: Vec<PackageConflict>,
}

/// The requirements placed on one package name.
#[derive(Debug, Clone)]
pub struct PackageConflict {
    pub name: String,
    pub requirements: Vec<Requirement>,
}

/// One range imposed on a package, by the project or by another package.
#[derive(Debug, Clone)]
pub struct Requirement {
    /// `None` when the project itself declared the range.
    pub requester: Option<String>,
    pub range: String,
}

impl ConflictReport {
    /// Collect the requirements on each of `names` from the candidate list.
    pub fn from_candidates(list: &CandidateList, names: &[String]) -> Self {
        let conflicts = names
            .iter()
            .map(|name| PackageConflict {
                name: name.clone(),
                requirements: list
                    .requests_for(name)
                    .map(|(requester, request)| Requirement {
                        requester: requester.map(|node| node.id().to_string()),
                        range: request.range.to_string(),
                    })
                    .collect(),
            })
            .collect();
        Self { conflicts }
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        for (i, conflict) in self.conflicts.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{conflict}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PackageConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is required as:", self.name)?;
        for req in &self.requirements {
            let by = req.requester.as_deref().unwrap_or("the project");
            write!(f, "\n  {} (by {by})", req.range)?;
        }
        Ok(())
    }
}
