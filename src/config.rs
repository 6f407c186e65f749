//! Engine configuration.

use crate::error::{Error, Result};
use crate::oracle::{TruthTable, DEFAULT_MAX_VARIABLES};
use serde::{Deserialize, Serialize};

/// What to do when two rules of one action definitely write opposite
/// values to the same fluent in a single execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Reject the execution: the action leads to no state.
    #[default]
    Reject,
    /// Leave the fluent `Unknown`.
    Unknown,
    /// The rule declared last wins.
    LastWins,
}

/// What to do when two action occurrences share a timepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OccurrencePolicy {
    #[default]
    Reject,
    LastWins,
}

/// Configuration shared by a domain and every scenario built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub conflict_policy: ConflictPolicy,
    pub occurrence_policy: OccurrencePolicy,
    /// Clock units consumed by an action with no declared duration.
    pub default_duration: u64,
    /// Variable bound for the formula oracle.
    pub max_formula_variables: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            conflict_policy: ConflictPolicy::default(),
            occurrence_policy: OccurrencePolicy::default(),
            default_duration: 1,
            max_formula_variables: DEFAULT_MAX_VARIABLES,
        }
    }
}

impl EngineConfig {
    /// Update the configuration from a key/value pair.
    ///
    /// Keys: `conflicts` (`reject`, `unknown`, `last-wins`), `occurrences`
    /// (`reject`, `last-wins`), `default_duration` (positive integer),
    /// `max_variables` (integer).
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || Error::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "conflicts" => {
                self.conflict_policy = match value {
                    "reject" => ConflictPolicy::Reject,
                    "unknown" => ConflictPolicy::Unknown,
                    "last-wins" => ConflictPolicy::LastWins,
                    _ => return Err(invalid()),
                }
            }
            "occurrences" => {
                self.occurrence_policy = match value {
                    "reject" => OccurrencePolicy::Reject,
                    "last-wins" => OccurrencePolicy::LastWins,
                    _ => return Err(invalid()),
                }
            }
            "default_duration" => match value.parse::<u64>() {
                Ok(n) if n > 0 => self.default_duration = n,
                _ => return Err(invalid()),
            },
            "max_variables" => {
                self.max_formula_variables = value.parse().map_err(|_| invalid())?;
            }
            _ => return Err(invalid()),
        }
        Ok(())
    }

    /// The oracle formulas built under this configuration use.
    pub fn oracle(&self) -> TruthTable {
        TruthTable::new(self.max_formula_variables)
    }
}
