//! Text syntax for propositional formulas over fluent names.

mod lexer;
mod parser;

pub use lexer::{LexError, Lexer, Token};
pub use parser::{parse_expr, ParseError};
