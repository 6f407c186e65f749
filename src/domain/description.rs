//! Domain description: fluent state plus the causal rule base.

use super::rules::{CausationRule, EffectKind, ImpossibilityRule};
use crate::config::{ConflictPolicy, EngineConfig};
use crate::error::Result;
use crate::formula::{forced_value, Formula};
use crate::parser::parse_expr;
use crate::syntax::{Fluent, Model, Ternary};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// Current fluent valuation and the rules that change it.
///
/// `do_action` mutates the state in place. Callers that need to try a
/// narrative without disturbing the description work on a `clone()`,
/// which is a full independent snapshot.
#[derive(Debug, Clone, Default)]
pub struct DomainDescription {
    fluents: BTreeMap<String, Ternary>,
    causes: BTreeMap<String, Vec<CausationRule>>,
    impossibles: BTreeMap<String, Vec<ImpossibilityRule>>,
    config: EngineConfig,
}

/// A pending write to one fluent during an action execution.
#[derive(Debug, Clone, Copy)]
struct Write {
    value: Ternary,
    certain: bool,
}

/// Writes one execution would make, or the fluent two certain rules
/// disagree on.
type EffectPlan = std::result::Result<(BTreeMap<String, Ternary>, Ternary), String>;

impl DomainDescription {
    pub fn new() -> Self {
        DomainDescription::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        DomainDescription {
            config,
            ..DomainDescription::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Update one configuration option, see [`EngineConfig::set_option`].
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        self.config.set_option(key, value)
    }

    /// Parse and validate a formula with the configured oracle.
    pub fn parse_formula(&self, source: &str) -> Result<Formula> {
        Formula::with_oracle(parse_expr(source)?, &self.config.oracle())
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Set the initial values of the named fluents.
    pub fn initially<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        for (name, value) in values {
            self.fluents.insert(name.into(), Ternary::from(value));
        }
    }

    /// `action causes effect`.
    pub fn causes(&mut self, action: impl Into<String>, effect: Formula) {
        self.causes_if(action, effect, Formula::always());
    }

    /// `action causes effect if condition`.
    pub fn causes_if(&mut self, action: impl Into<String>, effect: Formula, condition: Formula) {
        self.add_rule(action.into(), CausationRule::new(EffectKind::Causes, effect, condition));
    }

    /// `action releases effect`.
    pub fn releases(&mut self, action: impl Into<String>, effect: Formula) {
        self.releases_if(action, effect, Formula::always());
    }

    /// `action releases effect if condition`.
    ///
    /// The released fluents become `Unknown` immediately.
    pub fn releases_if(&mut self, action: impl Into<String>, effect: Formula, condition: Formula) {
        for name in effect.variables() {
            self.fluents.insert(name.clone(), Ternary::Unknown);
        }
        self.add_rule(action.into(), CausationRule::new(EffectKind::Releases, effect, condition));
    }

    /// `impossible action if condition`.
    pub fn impossible(&mut self, action: impl Into<String>, condition: Formula) {
        self.register(&condition);
        self.impossibles
            .entry(action.into())
            .or_default()
            .push(ImpossibilityRule { condition });
    }

    fn add_rule(&mut self, action: String, rule: CausationRule) {
        self.register(&rule.effect);
        self.register(&rule.condition);
        self.causes.entry(action).or_default().push(rule);
    }

    /// Register unseen fluents of `formula` as `Unknown`.
    fn register(&mut self, formula: &Formula) {
        for name in formula.variables() {
            self.fluents.entry(name.clone()).or_insert(Ternary::Unknown);
        }
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn value(&self, name: &str) -> Option<Ternary> {
        self.fluents.get(name).copied()
    }

    pub fn fluent(&self, name: &str) -> Option<Fluent> {
        self.value(name).map(|value| Fluent::new(name, value))
    }

    /// All fluents, sorted by name.
    pub fn state(&self) -> Vec<Fluent> {
        self.fluents
            .iter()
            .map(|(name, value)| Fluent::new(name.clone(), *value))
            .collect()
    }

    /// Every action that has at least one rule.
    pub fn actions(&self) -> BTreeSet<&str> {
        self.causes
            .keys()
            .chain(self.impossibles.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn causation_rules(&self, action: &str) -> &[CausationRule] {
        self.causes.get(action).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn impossibility_rules(&self, action: &str) -> &[ImpossibilityRule] {
        self.impossibles.get(action).map(Vec::as_slice).unwrap_or(&[])
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Whether one model is included in the current state.
    ///
    /// Unregistered fluents exclude the model outright.
    fn includes(&self, model: &Model) -> Ternary {
        Ternary::all(model.iter().map(|(name, &wanted)| match self.fluents.get(name) {
            Some(current) => current.equals(Ternary::from(wanted)),
            None => Ternary::False,
        }))
    }

    /// Does `formula` hold in the current state?
    ///
    /// `True` as soon as one model is definitely included; `Unknown` if some
    /// model might be; `False` otherwise.
    pub fn check(&self, formula: &Formula) -> Ternary {
        let mut result = Ternary::False;
        for model in formula.models() {
            result = result.or(self.includes(model));
            if result.is_true() {
                break;
            }
        }
        result
    }

    /// Whether `action` may be performed in the current state.
    pub fn possible(&self, action: &str) -> Ternary {
        let blocked = Ternary::any(
            self.impossibility_rules(action)
                .iter()
                .map(|rule| self.check(&rule.condition)),
        );
        !blocked
    }

    /// Perform `action` on the current state.
    ///
    /// Returns `False` if the action is impossible or its effects contradict
    /// each other (the state is then untouched), `Unknown` if it executed but
    /// whether some effect fired is ambiguous, `True` otherwise.
    pub fn do_action(&mut self, action: &str) -> Ternary {
        let possible = self.possible(action);
        if possible.is_false() {
            debug!(action, "action is impossible in the current state");
            return Ternary::False;
        }

        let (writes, outcome) = match self.plan_effects(action, possible) {
            Ok(plan) => plan,
            Err(fluent) => {
                debug!(action, fluent = %fluent, "contradictory effects");
                return Ternary::False;
            }
        };

        for (name, value) in writes {
            trace!(action, fluent = %name, value = %value, "effect applied");
            self.fluents.insert(name, value);
        }
        outcome
    }

    /// Evaluate every rule of `action` against the pre-action state.
    fn plan_effects(&self, action: &str, possible: Ternary) -> EffectPlan {
        let mut proposed: BTreeMap<String, Vec<Write>> = BTreeMap::new();
        let mut outcome = possible;

        for rule in self.causation_rules(action) {
            let condition = self.check(&rule.condition);
            if condition.is_false() {
                continue;
            }
            outcome = outcome.and(condition);
            let certain = condition.is_true() && possible.is_true();

            for effect in rule.effect.fluents() {
                let current = self.value(&effect.name).unwrap_or(Ternary::Unknown);
                let value = match rule.kind {
                    EffectKind::Releases => Ternary::Unknown,
                    EffectKind::Causes if certain => effect.value,
                    // Either branch leaves a fluent that already has the value unchanged.
                    EffectKind::Causes if current.equals(effect.value).is_true() => effect.value,
                    EffectKind::Causes => Ternary::Unknown,
                };
                proposed
                    .entry(effect.name)
                    .or_default()
                    .push(Write { value, certain });
            }
        }

        let mut writes = BTreeMap::new();
        for (name, candidates) in proposed {
            let (value, settled) = self.resolve_writes(&name, &candidates)?;
            if !settled {
                outcome = outcome.and(Ternary::Unknown);
            }
            writes.insert(name, value);
        }
        Ok((writes, outcome))
    }

    /// Merge every write proposed for one fluent, in declaration order.
    ///
    /// Returns the value to store and whether it was settled without
    /// ambiguity. Only the conflict policy's `LastWins` looks at order.
    fn resolve_writes(
        &self,
        name: &str,
        candidates: &[Write],
    ) -> std::result::Result<(Ternary, bool), String> {
        let first = candidates.first().map_or(Ternary::Unknown, |w| w.value);
        if candidates.iter().all(|w| w.value == first) {
            return Ok((first, true));
        }

        let certain = |wanted: bool| {
            candidates
                .iter()
                .any(|w| w.certain && w.value.to_bool() == Some(wanted))
        };
        if certain(true) && certain(false) {
            match self.config.conflict_policy {
                ConflictPolicy::Reject => return Err(name.to_string()),
                ConflictPolicy::LastWins => {
                    let last = candidates
                        .iter()
                        .rev()
                        .find(|w| w.certain && w.value.to_bool().is_some())
                        .map_or(Ternary::Unknown, |w| w.value);
                    return Ok((last, true));
                }
                ConflictPolicy::Unknown => {}
            }
        }
        Ok((Ternary::Unknown, false))
    }

    /// Commit an observation into the current state.
    ///
    /// Among the observation's models not excluded by the state, each
    /// variable they all agree on takes that value.
    pub fn adopt(&mut self, observation: &Formula) {
        let candidates: Vec<&Model> = observation
            .models()
            .iter()
            .filter(|model| !self.includes(model).is_false())
            .collect();
        if candidates.is_empty() {
            return;
        }
        for name in observation.variables() {
            let value = forced_value(candidates.iter().copied(), name);
            if value.to_bool().is_some() {
                self.fluents.insert(name.clone(), value);
            }
        }
    }

    /// Does `formula` hold after performing `actions` in order?
    ///
    /// Runs on a snapshot; `False` if any action is rejected.
    pub fn holds_after(&self, actions: &[&str], formula: &Formula) -> Ternary {
        let mut snapshot = self.clone();
        for action in actions {
            if snapshot.do_action(action).is_false() {
                return Ternary::False;
            }
        }
        snapshot.check(formula)
    }
}
