//! Recursive-descent parser for propositional formulas.
//!
//! Precedence, tightest first: `~`, `&`, `|`, `->` (right associative), `<->`.

use super::lexer::{LexError, Lexer, Token};
use crate::syntax::Expr;
use thiserror::Error;

/// Parse error with location information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError {
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}

/// Parser state.
struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Parser { lexer, current })
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn eat(&mut self, expected: &Token) -> Result<bool, ParseError> {
        if &self.current == expected {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.eat(&expected)? {
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}, found {:?}", expected, self.current)))
        }
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            line: self.lexer.line(),
            column: self.lexer.column(),
        }
    }
}

/// Parse a complete formula.
pub fn parse_expr(source: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(source)?;
    if parser.current == Token::Eof {
        return Err(parser.error("empty formula".to_string()));
    }
    let expr = parse_iff(&mut parser)?;
    if parser.current != Token::Eof {
        return Err(parser.error(format!("unexpected {:?} after formula", parser.current)));
    }
    Ok(expr)
}

fn parse_iff(parser: &mut Parser) -> Result<Expr, ParseError> {
    let mut left = parse_implies(parser)?;
    while parser.eat(&Token::Iff)? {
        let right = parse_implies(parser)?;
        left = Expr::iff(left, right);
    }
    Ok(left)
}

fn parse_implies(parser: &mut Parser) -> Result<Expr, ParseError> {
    let left = parse_or(parser)?;
    if parser.eat(&Token::Implies)? {
        let right = parse_implies(parser)?;
        return Ok(Expr::implies(left, right));
    }
    Ok(left)
}

fn parse_or(parser: &mut Parser) -> Result<Expr, ParseError> {
    let mut left = parse_and(parser)?;
    while parser.eat(&Token::Or)? {
        let right = parse_and(parser)?;
        left = Expr::or(left, right);
    }
    Ok(left)
}

fn parse_and(parser: &mut Parser) -> Result<Expr, ParseError> {
    let mut left = parse_unary(parser)?;
    while parser.eat(&Token::And)? {
        let right = parse_unary(parser)?;
        left = Expr::and(left, right);
    }
    Ok(left)
}

fn parse_unary(parser: &mut Parser) -> Result<Expr, ParseError> {
    if parser.eat(&Token::Not)? {
        return Ok(Expr::negation(parse_unary(parser)?));
    }
    parse_atom(parser)
}

fn parse_atom(parser: &mut Parser) -> Result<Expr, ParseError> {
    match parser.advance()? {
        Token::Identifier(name) => Ok(Expr::Var(name)),
        Token::True => Ok(Expr::Const(true)),
        Token::False => Ok(Expr::Const(false)),
        Token::LParen => {
            let inner = parse_iff(parser)?;
            parser.expect(Token::RParen)?;
            Ok(inner)
        }
        other => Err(parser.error(format!("expected fluent or '(', found {:?}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Expr {
        Expr::var(name)
    }

    #[test]
    fn test_parse_precedence() {
        let e = parse_expr("~a & b | c").unwrap();
        assert_eq!(e, (!v("a") & v("b")) | v("c"));
    }

    #[test]
    fn test_parse_implies_is_right_associative() {
        let e = parse_expr("a -> b -> c").unwrap();
        assert_eq!(e, Expr::implies(v("a"), Expr::implies(v("b"), v("c"))));
    }

    #[test]
    fn test_parse_iff_binds_loosest() {
        let e = parse_expr("a -> b <-> c").unwrap();
        assert_eq!(e, Expr::iff(Expr::implies(v("a"), v("b")), v("c")));
    }

    #[test]
    fn test_parse_parentheses_and_constants() {
        let e = parse_expr("(true | a) & ~(false)").unwrap();
        assert_eq!(
            e,
            (Expr::constant(true) | v("a")) & !Expr::constant(false)
        );
    }

    #[test]
    fn test_parse_display_round_trip() {
        for src in ["alive & ~loaded & hidden", "(a | b) & ~c", "a -> (b <-> \"c d\")"] {
            let e = parse_expr(src).unwrap();
            assert_eq!(parse_expr(&e.to_string()).unwrap(), e, "source {}", src);
        }
    }

    #[test]
    fn test_display_round_trip_with_awkward_names() {
        for name in ["say \"hi\"", "two\nlines", "back\\slash", "true", "9lives"] {
            let e = Expr::var(name) & !Expr::var("x");
            assert_eq!(parse_expr(&e.to_string()), Ok(e.clone()), "name {:?}", name);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_expr("").is_err());
        assert!(parse_expr("a &").is_err());
        assert!(parse_expr("(a | b").is_err());
        assert!(parse_expr("a b").is_err());
    }
}
