//! Syntax types: three-valued truth, fluents, and propositional expressions.

mod builder;
mod expr;
mod fluent;
mod ternary;

pub use builder::{BuildError, Op, PostfixBuilder};
pub use expr::{Expr, Model};
pub use fluent::Fluent;
pub use ternary::Ternary;
