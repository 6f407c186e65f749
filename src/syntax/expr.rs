//! Propositional expressions over fluent names.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A total truth assignment to named variables.
pub type Model = BTreeMap<String, bool>;

/// A propositional expression as written by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Const(bool),
    Var(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Implies(Box<Expr>, Box<Expr>),
    Iff(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn constant(value: bool) -> Self {
        Expr::Const(value)
    }

    pub fn negation(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    pub fn implies(left: Expr, right: Expr) -> Self {
        Expr::Implies(Box::new(left), Box::new(right))
    }

    pub fn iff(left: Expr, right: Expr) -> Self {
        Expr::Iff(Box::new(left), Box::new(right))
    }

    /// Names of all variables, sorted and deduplicated.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(name) => {
                out.insert(name.clone());
            }
            Expr::Not(inner) => inner.collect_variables(out),
            Expr::And(l, r) | Expr::Or(l, r) | Expr::Implies(l, r) | Expr::Iff(l, r) => {
                l.collect_variables(out);
                r.collect_variables(out);
            }
        }
    }

    /// Evaluate under an assignment. `None` if a variable is unassigned.
    pub fn evaluate(&self, model: &Model) -> Option<bool> {
        Some(match self {
            Expr::Const(b) => *b,
            Expr::Var(name) => *model.get(name)?,
            Expr::Not(inner) => !inner.evaluate(model)?,
            Expr::And(l, r) => l.evaluate(model)? && r.evaluate(model)?,
            Expr::Or(l, r) => l.evaluate(model)? || r.evaluate(model)?,
            Expr::Implies(l, r) => !l.evaluate(model)? || r.evaluate(model)?,
            Expr::Iff(l, r) => l.evaluate(model)? == r.evaluate(model)?,
        })
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Iff(..) => 1,
            Expr::Implies(..) => 2,
            Expr::Or(..) => 3,
            Expr::And(..) => 4,
            Expr::Not(_) => 5,
            Expr::Const(_) | Expr::Var(_) => 6,
        }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        let prec = self.precedence();
        if prec < min {
            write!(f, "(")?;
        }
        match self {
            Expr::Const(b) => write!(f, "{}", b)?,
            Expr::Var(name) => fmt_name(name, f)?,
            Expr::Not(inner) => {
                write!(f, "~")?;
                inner.fmt_prec(f, prec)?;
            }
            // and/or are associative; -> groups to the right; <-> never chains bare.
            Expr::And(l, r) => fmt_binary(f, l, " & ", r, prec, prec + 1)?,
            Expr::Or(l, r) => fmt_binary(f, l, " | ", r, prec, prec + 1)?,
            Expr::Implies(l, r) => fmt_binary(f, l, " -> ", r, prec + 1, prec)?,
            Expr::Iff(l, r) => fmt_binary(f, l, " <-> ", r, prec + 1, prec + 1)?,
        }
        if prec < min {
            write!(f, ")")?;
        }
        Ok(())
    }
}

fn fmt_binary(
    f: &mut fmt::Formatter<'_>,
    left: &Expr,
    op: &str,
    right: &Expr,
    left_min: u8,
    right_min: u8,
) -> fmt::Result {
    left.fmt_prec(f, left_min)?;
    write!(f, "{}", op)?;
    right.fmt_prec(f, right_min)
}

/// Whether a name can be written without quotes.
fn is_bare_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && name != "true"
        && name != "false"
}

fn fmt_name(name: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if is_bare_name(name) {
        return write!(f, "{}", name);
    }
    write!(f, "\"")?;
    for ch in name.chars() {
        match ch {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            _ => write!(f, "{}", ch)?,
        }
    }
    write!(f, "\"")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}

impl std::ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::negation(self)
    }
}

impl std::ops::BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        Expr::and(self, rhs)
    }
}

impl std::ops::BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        Expr::or(self, rhs)
    }
}
