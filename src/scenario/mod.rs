//! Scenarios: a narrative of observations and action occurrences replayed
//! against a time domain description.

use crate::config::OccurrencePolicy;
use crate::domain::TimeDomainDescription;
use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::syntax::Ternary;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeBounds;
use tracing::{debug, trace, warn};

/// The first step at which a narrative broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Failure {
    /// The observation contradicts the state reached so far.
    Observation { time: u64, formula: String },
    /// The action was impossible, overlapped the previous one, ran past the
    /// termination time, or had contradictory effects.
    Action { time: u64, action: String },
}

impl Failure {
    pub fn time(&self) -> u64 {
        match self {
            Failure::Observation { time, .. } | Failure::Action { time, .. } => *time,
        }
    }
}

/// Outcome of replaying a whole scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub consistency: Ternary,
    pub failure: Option<Failure>,
}

/// A fixed narrative over a snapshot of a time domain description.
///
/// The scenario clones the description at construction and clones its own
/// copy again for every check, so queries never interfere with each other
/// and the caller's description stays reusable.
#[derive(Debug, Clone)]
pub struct Scenario {
    domain: TimeDomainDescription,
    observations: BTreeMap<u64, Formula>,
    occurrences: BTreeMap<u64, String>,
}

impl Scenario {
    /// Build a scenario from `(formula, time)` observations and
    /// `(action, time)` occurrences.
    ///
    /// Observations sharing a timepoint are conjoined. Occurrences sharing
    /// one follow the configured [`OccurrencePolicy`].
    pub fn new<O, A, S>(domain: &TimeDomainDescription, observations: O, occurrences: A) -> Result<Self>
    where
        O: IntoIterator<Item = (Formula, u64)>,
        A: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let oracle = domain.config().oracle();
        let mut indexed_observations: BTreeMap<u64, Formula> = BTreeMap::new();
        for (formula, time) in observations {
            match indexed_observations.entry(time) {
                Entry::Vacant(slot) => {
                    slot.insert(formula);
                }
                Entry::Occupied(mut slot) => {
                    let joined = slot.get().conjoin_with(&formula, &oracle)?;
                    slot.insert(joined);
                }
            }
        }

        let policy = domain.config().occurrence_policy;
        let mut indexed_occurrences: BTreeMap<u64, String> = BTreeMap::new();
        for (action, time) in occurrences {
            let action = action.into();
            match indexed_occurrences.entry(time) {
                Entry::Vacant(slot) => {
                    slot.insert(action);
                }
                Entry::Occupied(mut slot) => match policy {
                    OccurrencePolicy::Reject => {
                        return Err(Error::DuplicateOccurrence {
                            time,
                            existing: slot.get().clone(),
                            action,
                        })
                    }
                    OccurrencePolicy::LastWins => {
                        warn!(time, replaced = %slot.get(), by = %action, "occurrence overridden");
                        slot.insert(action);
                    }
                },
            }
        }

        Ok(Scenario {
            domain: domain.clone(),
            observations: indexed_observations,
            occurrences: indexed_occurrences,
        })
    }

    pub fn domain(&self) -> &TimeDomainDescription {
        &self.domain
    }

    pub fn observations(&self) -> &BTreeMap<u64, Formula> {
        &self.observations
    }

    pub fn occurrences(&self) -> &BTreeMap<u64, String> {
        &self.occurrences
    }

    /// The greatest timepoint the narrative mentions.
    pub fn last_timepoint(&self) -> u64 {
        let last_observation = self.observations.keys().next_back().copied();
        let last_occurrence = self.occurrences.keys().next_back().copied();
        last_observation.max(last_occurrence).unwrap_or(0)
    }

    /// Timepoints within `range` that carry an observation or an occurrence,
    /// ascending. Nothing changes between them.
    fn event_times<R>(&self, range: R) -> BTreeSet<u64>
    where
        R: RangeBounds<u64> + Clone,
    {
        self.observations
            .range(range.clone())
            .map(|(&time, _)| time)
            .chain(self.occurrences.range(range).map(|(&time, _)| time))
            .collect()
    }

    /// Process one timepoint: the observation, then (optionally) the action
    /// starting there. Returns how definite the step was.
    fn replay_step(
        &self,
        domain: &mut TimeDomainDescription,
        time: u64,
        run_action: bool,
    ) -> std::result::Result<Ternary, Failure> {
        let mut result = Ternary::True;

        if let Some(observation) = self.observations.get(&time) {
            let holds = domain.check(observation);
            trace!(time, observation = %observation, %holds, "observation checked");
            if holds.is_false() {
                return Err(Failure::Observation {
                    time,
                    formula: observation.to_string(),
                });
            }
            result = result.and(holds);
            domain.adopt(observation);
        }

        if run_action {
            if let Some(action) = self.occurrences.get(&time) {
                let executed = domain.do_action(action, time);
                if executed.is_false() {
                    return Err(Failure::Action {
                        time,
                        action: action.clone(),
                    });
                }
                result = result.and(executed);
            }
        }

        Ok(result)
    }

    /// Replay the whole narrative on a fresh snapshot.
    pub fn evaluate(&self) -> Evaluation {
        let mut domain = self.domain.clone();
        let mut consistency = Ternary::True;

        for time in self.event_times(..=self.last_timepoint()) {
            domain.advance_to(time);
            match self.replay_step(&mut domain, time, true) {
                Ok(step) => consistency = consistency.and(step),
                Err(failure) => {
                    debug!(?failure, "scenario is inconsistent");
                    return Evaluation {
                        consistency: Ternary::False,
                        failure: Some(failure),
                    };
                }
            }
        }

        debug!(%consistency, "scenario replayed");
        Evaluation {
            consistency,
            failure: None,
        }
    }

    /// `True` if every step was definite, `Unknown` if some step was
    /// ambiguous, `False` if some step failed.
    pub fn is_consistent(&self) -> Ternary {
        self.evaluate().consistency
    }

    /// Whether `action` is performed at `time`.
    ///
    /// Occurrences are fixed by the narrative, so this holds exactly when
    /// the scenario is not inconsistent and `action` is scheduled at `time`.
    pub fn does_action_perform(&self, action: &str, time: u64) -> bool {
        !self.is_consistent().is_false()
            && self.occurrences.get(&time).map(String::as_str) == Some(action)
    }

    /// Does `formula` hold at the moment `after_time` begins?
    ///
    /// Everything up to `after_time` is replayed, including the observation
    /// at `after_time`; an action starting at `after_time` is not.
    pub fn check_if_condition_hold(&self, formula: &Formula, after_time: u64) -> Result<Ternary> {
        if self.is_consistent().is_false() {
            return Err(Error::InconsistentScenario);
        }
        let horizon = self.domain.termination();
        if horizon.is_some_and(|h| after_time > h) {
            return Err(Error::UnreachableTime {
                time: after_time,
                horizon,
            });
        }

        let mut domain = self.domain.clone();
        for time in self.event_times(..after_time) {
            domain.advance_to(time);
            self.replay_step(&mut domain, time, true)
                .map_err(|_| Error::InconsistentScenario)?;
        }
        domain.advance_to(after_time);
        self.replay_step(&mut domain, after_time, false)
            .map_err(|_| Error::InconsistentScenario)?;

        Ok(domain.check(formula))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(src: &str) -> Formula {
        Formula::parse(src).expect("formula")
    }

    fn no_observations() -> Vec<(Formula, u64)> {
        Vec::new()
    }

    fn no_actions() -> Vec<(&'static str, u64)> {
        Vec::new()
    }

    fn switch_domain() -> TimeDomainDescription {
        let mut d = TimeDomainDescription::new();
        d.initially([("light", false)]);
        d.causes("switch", f("light"));
        d.terminate_time(10);
        d
    }

    #[test]
    fn test_duplicate_occurrence_rejected_by_default() {
        let d = switch_domain();
        let err = Scenario::new(&d, no_observations(), [("switch", 1), ("flip", 1)]).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateOccurrence {
                time: 1,
                existing: "switch".to_string(),
                action: "flip".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_occurrence_last_wins() {
        let mut d = switch_domain();
        d.set_option("occurrences", "last-wins").unwrap();
        let s = Scenario::new(&d, no_observations(), [("flip", 1), ("switch", 1)]).unwrap();
        assert_eq!(s.occurrences().get(&1).map(String::as_str), Some("switch"));
    }

    #[test]
    fn test_observations_at_same_time_are_conjoined() {
        let d = switch_domain();
        let s = Scenario::new(&d, [(f("~light"), 0), (f("~light"), 0)], no_actions())
            .unwrap();
        assert_eq!(s.observations().len(), 1);
        assert!(Scenario::new(&d, [(f("light"), 0), (f("~light"), 0)], no_actions())
            .is_err());
    }

    #[test]
    fn test_conjoined_observations_use_configured_limit() {
        let mut d = switch_domain();
        d.set_option("max_variables", "2").unwrap();
        let first = f("light & a");
        let err = Scenario::new(&d, [(first, 0), (f("b"), 0)], no_actions()).unwrap_err();
        assert!(matches!(err, Error::Oracle(_)));
    }

    #[test]
    fn test_source_domain_is_untouched() {
        let d = switch_domain();
        let s = Scenario::new(&d, [(f("light"), 2)], [("switch", 1)]).unwrap();
        assert_eq!(s.is_consistent(), Ternary::True);
        assert_eq!(d.value("light"), Some(Ternary::False));
        assert_eq!(s.domain().value("light"), Some(Ternary::False));
        assert_eq!(s.is_consistent(), Ternary::True);
    }

    #[test]
    fn test_evaluation_reports_first_failure() {
        let d = switch_domain();
        let s = Scenario::new(&d, [(f("~light"), 3)], [("switch", 1)]).unwrap();
        let eval = s.evaluate();
        assert_eq!(eval.consistency, Ternary::False);
        assert_eq!(
            eval.failure,
            Some(Failure::Observation {
                time: 3,
                formula: "~light".to_string()
            })
        );
    }

    #[test]
    fn test_query_past_horizon_is_unreachable() {
        let d = switch_domain();
        let s = Scenario::new(&d, no_observations(), [("switch", 1)]).unwrap();
        assert_eq!(
            s.check_if_condition_hold(&f("light"), 11),
            Err(Error::UnreachableTime {
                time: 11,
                horizon: Some(10)
            })
        );
        assert_eq!(s.check_if_condition_hold(&f("light"), 10), Ok(Ternary::True));
    }

    #[test]
    fn test_query_at_start_of_action_sees_prior_state() {
        let d = switch_domain();
        let s = Scenario::new(&d, no_observations(), [("switch", 1)]).unwrap();
        assert_eq!(s.check_if_condition_hold(&f("light"), 1), Ok(Ternary::False));
        assert_eq!(s.check_if_condition_hold(&f("light"), 2), Ok(Ternary::True));
    }

    #[test]
    fn test_sparse_timeline_replays_only_event_times() {
        let mut d = TimeDomainDescription::new();
        d.initially([("light", false)]);
        d.causes("switch", f("light"));
        let late = 10_000_000_000_000;
        let s = Scenario::new(&d, [(f("light"), late)], [("switch", 1)]).unwrap();
        assert_eq!(s.is_consistent(), Ternary::True);
        assert_eq!(s.check_if_condition_hold(&f("light"), late), Ok(Ternary::True));
        assert_eq!(s.check_if_condition_hold(&f("light"), u64::MAX), Ok(Ternary::True));
        assert_eq!(s.check_if_condition_hold(&f("light"), 1), Ok(Ternary::False));

        let broken = Scenario::new(&d, [(f("~light"), late)], [("switch", 1)]).unwrap();
        assert_eq!(broken.evaluate().failure.map(|failure| failure.time()), Some(late));
    }

    #[test]
    fn test_empty_scenario_is_consistent() {
        let d = switch_domain();
        let s = Scenario::new(&d, no_observations(), no_actions()).unwrap();
        assert_eq!(s.last_timepoint(), 0);
        assert_eq!(s.is_consistent(), Ternary::True);
        assert!(!s.does_action_perform("switch", 0));
    }
}
