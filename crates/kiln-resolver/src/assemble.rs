//! Map a satisfying assignment back onto the candidate list.

use std::collections::HashMap;

use crate::candidate::{CandidateList, CandidateNode, PackageId};
use crate::error::ResolveError;
use crate::graph::ResolvedGraph;

/// Build the resolved graph from a model over `list`.
///
/// The encoding guarantees one selected candidate per name and a selected
/// match for every request of a selected candidate. Both are checked here;
/// a violation is an internal error, never a partial result.
pub fn assemble(list: &CandidateList, assignment: &[i32]) -> Result<ResolvedGraph, ResolveError> {
    let mut selected: HashMap<&str, &CandidateNode> = HashMap::new();
    for &lit in assignment.iter().filter(|&&lit| lit > 0) {
        let node = list.at_var(lit as usize).ok_or_else(|| {
            ResolveError::internal(format!(
                "assignment selects variable {lit} but only {} candidates exist",
                list.len()
            ))
        })?;
        if let Some(previous) = selected.insert(node.name.as_str(), node) {
            return Err(ResolveError::internal(format!(
                "both {} and {} selected",
                previous.id(),
                node.id()
            )));
        }
    }

    let mut graph = ResolvedGraph::new();
    for node in list.iter() {
        if !selected
            .get(node.name.as_str())
            .is_some_and(|chosen| chosen.version == node.version)
        {
            continue;
        }

        let mut deps = Vec::new();
        for request in node.deps.iter().flatten() {
            let chosen = selected
                .get(request.name.as_str())
                .filter(|chosen| list.satisfies(request, chosen))
                .ok_or_else(|| {
                    ResolveError::internal(format!(
                        "request `{request}` of {} has no selected match",
                        node.id()
                    ))
                })?;
            deps.push(chosen.id());
        }

        graph
            .insert(node.id(), deps)
            .map_err(|clash: PackageId| {
                ResolveError::internal(format!("both {clash} and {} selected", node.id()))
            })?;
    }
    Ok(graph)
}
