//! SAT engine seam.
//!
//! The resolver only needs "one model or unsatisfiable"; any sound and
//! complete procedure can sit behind [`SatEngine`].

use thiserror::Error;
use varisat::{ExtendFormula, Lit, Solver};

use crate::cnf::Clause;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SatError {
    #[error("formula is unsatisfiable")]
    Unsatisfiable,

    #[error("SAT engine failed: {0}")]
    Engine(String),
}

/// A decision procedure over DIMACS-style clauses.
pub trait SatEngine {
    /// Return one literal per variable `1..=var_count`, positive when the
    /// variable is true in the model.
    fn solve(&self, clauses: &[Clause], var_count: usize) -> Result<Vec<i32>, SatError>;
}

impl<T: SatEngine + ?Sized> SatEngine for &T {
    fn solve(&self, clauses: &[Clause], var_count: usize) -> Result<Vec<i32>, SatError> {
        (**self).solve(clauses, var_count)
    }
}

/// CDCL engine backed by the `varisat` crate. Each call builds a fresh
/// solver, so one engine can serve any number of resolutions.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarisatEngine;

impl SatEngine for VarisatEngine {
    fn solve(&self, clauses: &[Clause], var_count: usize) -> Result<Vec<i32>, SatError> {
        let mut solver = Solver::new();
        let mut lits = Vec::new();
        for clause in clauses {
            lits.clear();
            for &lit in clause {
                if lit == 0 || lit.unsigned_abs() as usize > var_count {
                    return Err(SatError::Engine(format!(
                        "literal {lit} outside 1..={var_count}"
                    )));
                }
                lits.push(Lit::from_dimacs(lit as isize));
            }
            solver.add_clause(&lits);
        }

        let satisfiable = solver
            .solve()
            .map_err(|e| SatError::Engine(e.to_string()))?;
        if !satisfiable {
            return Err(SatError::Unsatisfiable);
        }

        let model = solver
            .model()
            .ok_or_else(|| SatError::Engine("solver reported SAT without a model".into()))?;

        // Variables never mentioned in a clause are absent from the model;
        // they are unconstrained, so report them false.
        let mut assignment: Vec<i32> = (1..=var_count as i32).map(|v| -v).collect();
        for lit in model {
            let dimacs = lit.to_dimacs();
            let var = dimacs.unsigned_abs();
            if (1..=var_count).contains(&var) {
                assignment[var - 1] = dimacs as i32;
            }
        }
        Ok(assignment)
    }
}
