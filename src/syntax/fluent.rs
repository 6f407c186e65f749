//! Named fluents.

use super::Ternary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named proposition paired with its current value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fluent {
    pub name: String,
    pub value: Ternary,
}

impl Fluent {
    pub fn new(name: impl Into<String>, value: Ternary) -> Self {
        Fluent {
            name: name.into(),
            value,
        }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Fluent::new(name, Ternary::Unknown)
    }
}

impl fmt::Display for Fluent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
