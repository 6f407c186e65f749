//! Satisfiability oracle: enumerates the models of an expression.

use crate::syntax::{Expr, Model};
use thiserror::Error;

/// Default bound on the variables a truth table will enumerate.
pub const DEFAULT_MAX_VARIABLES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("formula mentions {found} variables, the oracle enumerates at most {limit}")]
    TooManyVariables { found: usize, limit: usize },
}

/// Decides satisfiability and reports every satisfying assignment.
///
/// Each returned model assigns exactly the variables of `expr`. Models are
/// distinct; an unsatisfiable expression yields an empty list.
pub trait FormulaOracle {
    fn models(&self, expr: &Expr) -> Result<Vec<Model>, OracleError>;

    fn is_satisfiable(&self, expr: &Expr) -> Result<bool, OracleError> {
        Ok(!self.models(expr)?.is_empty())
    }
}

/// Exhaustive enumeration over all assignments, in variable-name order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruthTable {
    pub max_variables: usize,
}

impl TruthTable {
    pub fn new(max_variables: usize) -> Self {
        TruthTable { max_variables }
    }
}

impl Default for TruthTable {
    fn default() -> Self {
        TruthTable::new(DEFAULT_MAX_VARIABLES)
    }
}

impl FormulaOracle for TruthTable {
    fn models(&self, expr: &Expr) -> Result<Vec<Model>, OracleError> {
        let vars: Vec<String> = expr.variables().into_iter().collect();
        // u64 masks cap the table width regardless of configuration.
        let limit = self.max_variables.min(63);
        if vars.len() > limit {
            return Err(OracleError::TooManyVariables {
                found: vars.len(),
                limit,
            });
        }

        let mut models = Vec::new();
        for mask in 0..(1u64 << vars.len()) {
            let assignment: Model = vars
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), mask & (1 << i) != 0))
                .collect();
            if expr.evaluate(&assignment) == Some(true) {
                models.push(assignment);
            }
        }
        Ok(models)
    }
}
