//! Validated formulas with cached models.

use crate::error::{Error, Result};
use crate::oracle::{FormulaOracle, TruthTable};
use crate::parser::parse_expr;
use crate::syntax::{Expr, Fluent, Model, Ternary};
use std::fmt;
use std::str::FromStr;

/// A satisfiable propositional formula.
///
/// Construction asks an oracle for every model and fails if there is none.
/// The models are cached: evaluation against a domain state never calls
/// the oracle again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    /// `None` is the "no condition" formula.
    expr: Option<Expr>,
    variables: Vec<String>,
    models: Vec<Model>,
}

impl Formula {
    /// Validate `expr` with the default truth-table oracle.
    pub fn new(expr: Expr) -> Result<Self> {
        Formula::with_oracle(expr, &TruthTable::default())
    }

    pub fn with_oracle(expr: Expr, oracle: &dyn FormulaOracle) -> Result<Self> {
        let models = oracle.models(&expr)?;
        if models.is_empty() {
            return Err(Error::UnsatisfiableFormula {
                formula: expr.to_string(),
            });
        }
        let variables = expr.variables().into_iter().collect();
        Ok(Formula {
            expr: Some(expr),
            variables,
            models,
        })
    }

    /// The formula that always holds: no variables, one empty model.
    pub fn always() -> Self {
        Formula {
            expr: None,
            variables: Vec::new(),
            models: vec![Model::new()],
        }
    }

    /// Parse and validate infix text.
    pub fn parse(source: &str) -> Result<Self> {
        Formula::new(parse_expr(source)?)
    }

    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    pub fn is_trivial(&self) -> bool {
        self.expr.is_none()
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Referenced variable names, sorted.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// One fluent per variable, valued as the formula forces it.
    ///
    /// A variable every model assigns the same value gets that value; one
    /// the models disagree on is `Unknown`.
    pub fn fluents(&self) -> Vec<Fluent> {
        self.variables
            .iter()
            .map(|name| Fluent::new(name.clone(), forced_value(&self.models, name)))
            .collect()
    }

    /// Conjunction of two formulas, validated again with the default oracle.
    pub fn conjoin(&self, other: &Formula) -> Result<Formula> {
        self.conjoin_with(other, &TruthTable::default())
    }

    pub fn conjoin_with(&self, other: &Formula, oracle: &dyn FormulaOracle) -> Result<Formula> {
        match (&self.expr, &other.expr) {
            (None, _) => Ok(other.clone()),
            (_, None) => Ok(self.clone()),
            (Some(l), Some(r)) => Formula::with_oracle(Expr::and(l.clone(), r.clone()), oracle),
        }
    }
}

/// Value shared by all `models` for `name`, or `Unknown` if they disagree.
pub(crate) fn forced_value<'a, I>(models: I, name: &str) -> Ternary
where
    I: IntoIterator<Item = &'a Model>,
{
    let mut seen: Option<bool> = None;
    for model in models {
        let Some(&value) = model.get(name) else {
            continue;
        };
        match seen {
            None => seen = Some(value),
            Some(prev) if prev != value => return Ternary::Unknown,
            Some(_) => {}
        }
    }
    seen.map_or(Ternary::Unknown, Ternary::from)
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Formula::parse(s)
    }
}

impl TryFrom<Expr> for Formula {
    type Error = Error;

    fn try_from(expr: Expr) -> Result<Self> {
        Formula::new(expr)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expr {
            Some(expr) => write!(f, "{}", expr),
            None => write!(f, "true"),
        }
    }
}
