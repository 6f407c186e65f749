//! Kleene three-valued logic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-valued truth value.
///
/// `Unknown` means the causal laws do not pin the value down. It is not
/// missing data: it propagates through every combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ternary {
    True,
    False,
    Unknown,
}

impl Ternary {
    pub fn not(self) -> Ternary {
        match self {
            Ternary::True => Ternary::False,
            Ternary::False => Ternary::True,
            Ternary::Unknown => Ternary::Unknown,
        }
    }

    /// Kleene conjunction: `False` dominates, then `Unknown`.
    pub fn and(self, other: Ternary) -> Ternary {
        match (self, other) {
            (Ternary::False, _) | (_, Ternary::False) => Ternary::False,
            (Ternary::Unknown, _) | (_, Ternary::Unknown) => Ternary::Unknown,
            _ => Ternary::True,
        }
    }

    /// Kleene disjunction: `True` dominates, then `Unknown`.
    pub fn or(self, other: Ternary) -> Ternary {
        match (self, other) {
            (Ternary::True, _) | (_, Ternary::True) => Ternary::True,
            (Ternary::Unknown, _) | (_, Ternary::Unknown) => Ternary::Unknown,
            _ => Ternary::False,
        }
    }

    /// Equality that is `Unknown` whenever either side is.
    pub fn equals(self, other: Ternary) -> Ternary {
        match (self, other) {
            (Ternary::Unknown, _) | (_, Ternary::Unknown) => Ternary::Unknown,
            (a, b) => Ternary::from(a == b),
        }
    }

    /// Conjunction of any number of values; `True` for none.
    pub fn all<I: IntoIterator<Item = Ternary>>(values: I) -> Ternary {
        values.into_iter().fold(Ternary::True, Ternary::and)
    }

    /// Disjunction of any number of values; `False` for none.
    pub fn any<I: IntoIterator<Item = Ternary>>(values: I) -> Ternary {
        values.into_iter().fold(Ternary::False, Ternary::or)
    }

    pub fn is_true(self) -> bool {
        self == Ternary::True
    }

    pub fn is_false(self) -> bool {
        self == Ternary::False
    }

    pub fn is_unknown(self) -> bool {
        self == Ternary::Unknown
    }

    /// The definite boolean, if there is one.
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Ternary::True => Some(true),
            Ternary::False => Some(false),
            Ternary::Unknown => None,
        }
    }
}

impl From<bool> for Ternary {
    fn from(value: bool) -> Self {
        if value {
            Ternary::True
        } else {
            Ternary::False
        }
    }
}

impl std::ops::Not for Ternary {
    type Output = Ternary;

    fn not(self) -> Ternary {
        Ternary::not(self)
    }
}

impl std::ops::BitAnd for Ternary {
    type Output = Ternary;

    fn bitand(self, rhs: Ternary) -> Ternary {
        self.and(rhs)
    }
}

impl std::ops::BitOr for Ternary {
    type Output = Ternary;

    fn bitor(self, rhs: Ternary) -> Ternary {
        self.or(rhs)
    }
}

impl fmt::Display for Ternary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Ternary::True => "true",
            Ternary::False => "false",
            Ternary::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
