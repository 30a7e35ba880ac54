//! CNF encoding of a candidate list.
//!
//! Variable `p` (1-based) stands for "the candidate at position `p` is
//! selected". Clauses emitted:
//! - exactly one candidate per package name
//! - a selected candidate implies, for each of its dependency requests, one
//!   of the candidates that request matched
//! - a root range that excludes some candidate of its name requires one of
//!   the candidates it matched

use std::collections::HashMap;

use tracing::trace;

use crate::candidate::CandidateList;
use crate::error::ResolveError;

/// A disjunction of literals; negative means "not selected".
pub type Clause = Vec<i32>;

/// Default size above which a same-name group switches from the
/// truth-table exactly-one encoding to the pairwise one.
pub const DEFAULT_EXACTLY_ONE_THRESHOLD: usize = 10;

/// Hard cap on truth-table width; `2^16` clauses for one group is already
/// far past anything a real dependency graph produces.
const MAX_TRUTH_TABLE_WIDTH: usize = 16;

/// Encoder tuning. Changes the clause set, never the set of models.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    pub exactly_one_threshold: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            exactly_one_threshold: DEFAULT_EXACTLY_ONE_THRESHOLD,
        }
    }
}

impl EncodeOptions {
    fn truth_table_limit(&self) -> usize {
        self.exactly_one_threshold.min(MAX_TRUTH_TABLE_WIDTH)
    }
}

/// The clauses contributed by one package name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseGroup {
    pub name: String,
    pub clauses: Vec<Clause>,
}

/// Encode with default options and flatten the groups.
pub fn encode(list: &CandidateList) -> Result<Vec<Clause>, ResolveError> {
    Ok(encode_groups(list, &EncodeOptions::default())?
        .into_iter()
        .flat_map(|g| g.clauses)
        .collect())
}

/// Encode the list one same-name group at a time, in first-appearance order.
pub fn encode_groups(
    list: &CandidateList,
    options: &EncodeOptions,
) -> Result<Vec<ClauseGroup>, ResolveError> {
    let mut order: Vec<&str> = Vec::new();
    let mut members: HashMap<&str, Vec<i32>> = HashMap::new();
    for (i, node) in list.iter().enumerate() {
        let var = to_var(i)?;
        members
            .entry(node.name.as_str())
            .or_insert_with(|| {
                order.push(node.name.as_str());
                Vec::new()
            })
            .push(var);
    }

    let mut groups = Vec::with_capacity(order.len());
    for name in order {
        let vars = &members[name];
        let mut clauses = if vars.len() == 1 {
            vec![vec![vars[0]]]
        } else if vars.len() <= options.truth_table_limit() {
            exactly_one_truth_table(vars)
        } else {
            exactly_one_pairwise(vars)
        };

        for &var in vars {
            clauses.extend(implications(list, &members, var)?);
        }
        clauses.extend(root_clauses(list, name, vars)?);

        trace!(name, candidates = vars.len(), clauses = clauses.len(), "encoded group");
        groups.push(ClauseGroup {
            name: name.to_string(),
            clauses,
        });
    }
    Ok(groups)
}

/// Exactly-one by enumeration: one blocking clause for every assignment
/// whose true-count is not one. `2^n - n` clauses, no auxiliary variables.
pub fn exactly_one_truth_table(vars: &[i32]) -> Vec<Clause> {
    let n = vars.len();
    let mut clauses = Vec::with_capacity((1usize << n).saturating_sub(n));
    for mask in 0u32..(1u32 << n) {
        if mask.count_ones() == 1 {
            continue;
        }
        let clause = vars
            .iter()
            .enumerate()
            .map(|(bit, &var)| if mask & (1 << bit) != 0 { -var } else { var })
            .collect();
        clauses.push(clause);
    }
    clauses
}

/// Exactly-one as at-least-one plus pairwise at-most-one.
pub fn exactly_one_pairwise(vars: &[i32]) -> Vec<Clause> {
    let mut clauses = Vec::with_capacity(1 + vars.len() * vars.len().saturating_sub(1) / 2);
    clauses.push(vars.to_vec());
    for (i, &a) in vars.iter().enumerate() {
        for &b in &vars[i + 1..] {
            clauses.push(vec![-a, -b]);
        }
    }
    clauses
}

/// `var ⇒ (q1 ∨ q2 ∨ …)` for each dependency request of the candidate at
/// `var`, written as `[-var, q1, q2, …]`. Leaves produce nothing.
fn implications(
    list: &CandidateList,
    members: &HashMap<&str, Vec<i32>>,
    var: i32,
) -> Result<Vec<Clause>, ResolveError> {
    let node = &list[var as usize - 1];
    let Some(deps) = &node.deps else {
        return Ok(Vec::new());
    };

    let mut clauses = Vec::with_capacity(deps.len());
    for request in deps {
        let mut clause = vec![-var];
        if let Some(candidates) = members.get(request.name.as_str()) {
            clause.extend(
                candidates
                    .iter()
                    .copied()
                    .filter(|&q| list.satisfies(request, &list[q as usize - 1])),
            );
        }
        if clause.len() == 1 {
            return Err(ResolveError::internal(format!(
                "request `{request}` of {} has no candidate",
                node.id()
            )));
        }
        clauses.push(clause);
    }
    Ok(clauses)
}

/// One clause per root request on `name` that rules out part of the group.
/// A root matching the whole group is already covered by exactly-one.
fn root_clauses(
    list: &CandidateList,
    name: &str,
    vars: &[i32],
) -> Result<Vec<Clause>, ResolveError> {
    let mut clauses = Vec::new();
    for root in list.roots().iter().filter(|r| r.name == name) {
        let matching: Clause = vars
            .iter()
            .copied()
            .filter(|&q| list.satisfies(root, &list[q as usize - 1]))
            .collect();
        if matching.is_empty() {
            return Err(ResolveError::internal(format!(
                "root request `{root}` has no candidate"
            )));
        }
        if matching.len() < vars.len() {
            clauses.push(matching);
        }
    }
    Ok(clauses)
}

fn to_var(index: usize) -> Result<i32, ResolveError> {
    i32::try_from(index + 1)
        .map_err(|_| ResolveError::internal("candidate list exceeds the SAT variable range"))
}
