//! Causation and impossibility rules.

use crate::formula::Formula;
use std::fmt;

/// How a causation rule affects its effect fluents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Sets the effect fluents to the values the effect formula forces.
    Causes,
    /// Makes the effect fluents indeterminate.
    Releases,
}

/// `action causes effect if condition` (or `releases`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CausationRule {
    pub kind: EffectKind,
    pub effect: Formula,
    pub condition: Formula,
}

impl CausationRule {
    pub fn new(kind: EffectKind, effect: Formula, condition: Formula) -> Self {
        CausationRule {
            kind,
            effect,
            condition,
        }
    }
}

impl fmt::Display for CausationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            EffectKind::Causes => "causes",
            EffectKind::Releases => "releases",
        };
        write!(f, "{} {}", verb, self.effect)?;
        if !self.condition.is_trivial() {
            write!(f, " if {}", self.condition)?;
        }
        Ok(())
    }
}

/// `impossible action if condition`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpossibilityRule {
    pub condition: Formula,
}

impl fmt::Display for ImpossibilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "impossible if {}", self.condition)
    }
}
