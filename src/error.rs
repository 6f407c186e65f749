//! Crate-level error type.

use crate::oracle::OracleError;
use crate::parser::ParseError;
use crate::syntax::BuildError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Hard errors. Contradictory narratives are not errors: they are reported
/// as `Ternary::False` by the consistency checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("formula is unsatisfiable: {formula}")]
    UnsatisfiableFormula { formula: String },

    #[error("scenario is inconsistent; conditions cannot be queried")]
    InconsistentScenario,

    #[error("timepoint {time} is not reachable (termination at {horizon:?})")]
    UnreachableTime { time: u64, horizon: Option<u64> },

    #[error("timepoint {time} already has action '{existing}', cannot also start '{action}'")]
    DuplicateOccurrence {
        time: u64,
        existing: String,
        action: String,
    },

    #[error("duration of '{action}' must be positive")]
    InvalidDuration { action: String },

    #[error("invalid value '{value}' for option '{key}'")]
    InvalidOption { key: String, value: String },

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("formula construction: {0}")]
    Build(#[from] BuildError),

    #[error("oracle: {0}")]
    Oracle(#[from] OracleError),
}
