//! Action domains: fluent state, causal rules, and durational execution.

mod description;
mod rules;
mod timed;

pub use description::DomainDescription;
pub use rules::{CausationRule, EffectKind, ImpossibilityRule};
pub use timed::{TimeDomainDescription, TIME_ORIGIN};
