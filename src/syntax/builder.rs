//! Postfix (stack) construction of expressions.

use super::expr::Expr;
use std::fmt;
use thiserror::Error;

/// Connective applied to the most recent operands on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Not,
    And,
    Or,
    Implies,
    Iff,
}

impl Op {
    pub fn arity(self) -> usize {
        match self {
            Op::Not => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Op::Not => "NOT",
            Op::And => "AND",
            Op::Or => "OR",
            Op::Implies => "IMPLIES",
            Op::Iff => "IFF",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("{op} needs {needed} operand(s), stack holds {available}")]
    StackUnderflow {
        op: Op,
        needed: usize,
        available: usize,
    },
    #[error("no expression was pushed")]
    Empty,
    #[error("{0} operands left on the stack")]
    Unbalanced(usize),
}

/// Builds an expression from operands and operators in postfix order.
///
/// `a b AND NOT` yields `~(a & b)`.
#[derive(Debug, Clone, Default)]
pub struct PostfixBuilder {
    stack: Vec<Expr>,
}

impl PostfixBuilder {
    pub fn new() -> Self {
        PostfixBuilder { stack: Vec::new() }
    }

    pub fn var(&mut self, name: impl Into<String>) -> &mut Self {
        self.stack.push(Expr::var(name));
        self
    }

    pub fn constant(&mut self, value: bool) -> &mut Self {
        self.stack.push(Expr::constant(value));
        self
    }

    pub fn push(&mut self, expr: Expr) -> &mut Self {
        self.stack.push(expr);
        self
    }

    /// Pop the operands `op` needs and push the combined expression.
    pub fn apply(&mut self, op: Op) -> Result<&mut Self, BuildError> {
        let needed = op.arity();
        if self.stack.len() < needed {
            return Err(BuildError::StackUnderflow {
                op,
                needed,
                available: self.stack.len(),
            });
        }
        let combined = match op {
            Op::Not => Expr::negation(self.pop()?),
            _ => {
                let right = self.pop()?;
                let left = self.pop()?;
                match op {
                    Op::And => Expr::and(left, right),
                    Op::Or => Expr::or(left, right),
                    Op::Implies => Expr::implies(left, right),
                    _ => Expr::iff(left, right),
                }
            }
        };
        self.stack.push(combined);
        Ok(self)
    }

    fn pop(&mut self) -> Result<Expr, BuildError> {
        self.stack.pop().ok_or(BuildError::Empty)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The single expression left on the stack.
    pub fn finish(mut self) -> Result<Expr, BuildError> {
        match self.stack.len() {
            0 => Err(BuildError::Empty),
            1 => self.pop(),
            n => Err(BuildError::Unbalanced(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postfix_nesting() {
        let mut b = PostfixBuilder::new();
        b.var("a").var("b");
        b.apply(Op::And).unwrap().apply(Op::Not).unwrap();
        b.var("c");
        b.apply(Op::Implies).unwrap();
        let e = b.finish().unwrap();
        assert_eq!(
            e,
            Expr::implies(!(Expr::var("a") & Expr::var("b")), Expr::var("c"))
        );
    }

    #[test]
    fn test_operand_order_is_preserved() {
        let mut b = PostfixBuilder::new();
        b.var("left").var("right");
        b.apply(Op::Implies).unwrap();
        assert_eq!(
            b.finish().unwrap(),
            Expr::implies(Expr::var("left"), Expr::var("right"))
        );
    }

    #[test]
    fn test_underflow_reports_op() {
        let mut b = PostfixBuilder::new();
        b.var("a");
        let err = b.apply(Op::Iff).unwrap_err();
        assert_eq!(
            err,
            BuildError::StackUnderflow {
                op: Op::Iff,
                needed: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_finish_rejects_leftovers() {
        let mut b = PostfixBuilder::new();
        b.var("a").var("b");
        assert_eq!(b.finish().unwrap_err(), BuildError::Unbalanced(2));
        assert_eq!(PostfixBuilder::new().finish().unwrap_err(), BuildError::Empty);
    }
}
