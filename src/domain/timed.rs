//! Durational actions on a clock with a termination horizon.

use super::description::DomainDescription;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::syntax::Ternary;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use tracing::{debug, trace};

/// Timepoint at which every clock starts.
pub const TIME_ORIGIN: u64 = 0;

/// A domain description whose actions take time.
///
/// Two counters are kept apart: the `clock` is the earliest time the next
/// action may start and only moves when an action is accepted; the
/// `timepoint` is the replay position a scenario advances with `step` or
/// `advance_to`.
#[derive(Debug, Clone)]
pub struct TimeDomainDescription {
    domain: DomainDescription,
    durations: BTreeMap<String, u64>,
    clock: u64,
    timepoint: u64,
    termination: Option<u64>,
}

impl Default for TimeDomainDescription {
    fn default() -> Self {
        TimeDomainDescription::from_domain(DomainDescription::default())
    }
}

impl TimeDomainDescription {
    pub fn new() -> Self {
        TimeDomainDescription::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        TimeDomainDescription::from_domain(DomainDescription::with_config(config))
    }

    /// Wrap an existing description; no durations, unbounded horizon.
    pub fn from_domain(domain: DomainDescription) -> Self {
        TimeDomainDescription {
            domain,
            durations: BTreeMap::new(),
            clock: TIME_ORIGIN,
            timepoint: TIME_ORIGIN,
            termination: None,
        }
    }

    pub fn domain(&self) -> &DomainDescription {
        &self.domain
    }

    /// Declare how many clock units `action` takes.
    pub fn duration(&mut self, action: impl Into<String>, units: u64) -> Result<()> {
        let action = action.into();
        if units == 0 {
            return Err(Error::InvalidDuration { action });
        }
        self.durations.insert(action, units);
        Ok(())
    }

    pub fn duration_of(&self, action: &str) -> u64 {
        self.durations
            .get(action)
            .copied()
            .unwrap_or(self.domain.config().default_duration)
    }

    /// No action may finish after `time`.
    pub fn terminate_time(&mut self, time: u64) {
        self.termination = Some(time);
    }

    pub fn termination(&self) -> Option<u64> {
        self.termination
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn timepoint(&self) -> u64 {
        self.timepoint
    }

    /// Start `action` at `start`.
    ///
    /// `False` if `start` is before the clock, if the action would finish
    /// after the termination time, or if the description rejects it.
    /// On success the clock moves to the action's finishing time.
    pub fn do_action(&mut self, action: &str, start: u64) -> Ternary {
        if start < self.clock {
            debug!(action, start, clock = self.clock, "action starts before the clock");
            return Ternary::False;
        }
        let end = start.saturating_add(self.duration_of(action));
        if let Some(horizon) = self.termination {
            if end > horizon {
                debug!(action, start, end, horizon, "action ends after termination time");
                return Ternary::False;
            }
        }

        let result = self.domain.do_action(action);
        if !result.is_false() {
            trace!(action, start, end, %result, "action executed");
            self.clock = end;
        }
        result
    }

    /// Advance the replay timepoint by one unit.
    pub fn step(&mut self) {
        self.timepoint += 1;
    }

    /// Move the replay timepoint forward to `time`. Never moves it back.
    pub fn advance_to(&mut self, time: u64) {
        self.timepoint = self.timepoint.max(time);
    }
}

impl Deref for TimeDomainDescription {
    type Target = DomainDescription;

    fn deref(&self) -> &DomainDescription {
        &self.domain
    }
}

impl DerefMut for TimeDomainDescription {
    fn deref_mut(&mut self) -> &mut DomainDescription {
        &mut self.domain
    }
}
