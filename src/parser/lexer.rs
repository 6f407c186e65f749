//! Lexer for propositional formula text.

use thiserror::Error;

/// Token types for formula syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // Fluent names, bare or quoted
    Identifier(String),

    // Constants
    True,
    False,

    // Delimiters
    LParen, // (
    RParen, // )

    // Connectives (ASCII and Unicode spellings)
    Not,     // ~ ! ¬
    And,     // & ∧
    Or,      // | ∨
    Implies, // -> →
    Iff,     // <-> ↔

    // End of input
    Eof,
}

/// Lexer state.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let remaining = &self.input[self.position..];
        let ch = match remaining.chars().next() {
            Some(ch) => ch,
            None => return Ok(Token::Eof),
        };

        let (token, width) = match ch {
            '(' => (Token::LParen, 1),
            ')' => (Token::RParen, 1),
            '~' | '!' | '¬' => (Token::Not, ch.len_utf8()),
            '&' | '∧' => (Token::And, ch.len_utf8()),
            '|' | '∨' => (Token::Or, ch.len_utf8()),
            '→' => (Token::Implies, ch.len_utf8()),
            '↔' => (Token::Iff, ch.len_utf8()),
            '-' if remaining.starts_with("->") => (Token::Implies, 2),
            '<' if remaining.starts_with("<->") => (Token::Iff, 3),
            '"' => return self.lex_quoted(),
            c if c.is_alphabetic() || c == '_' => return Ok(self.lex_identifier()),
            _ => {
                return Err(LexError {
                    message: format!("unexpected character: '{}'", ch),
                    line: self.line,
                    column: self.column,
                })
            }
        };
        self.advance(width);
        Ok(token)
    }

    fn advance(&mut self, bytes: usize) {
        let consumed = &self.input[self.position..self.position + bytes];
        for ch in consumed.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += bytes;
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.advance(ch.len_utf8());
            } else if self.input[self.position..].starts_with("//") {
                // Skip to end of line
                while let Some(c) = self.peek_char() {
                    self.advance(c.len_utf8());
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn lex_identifier(&mut self) -> Token {
        let start = self.position;

        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance(ch.len_utf8());
            } else {
                break;
            }
        }

        match &self.input[start..self.position] {
            "true" => Token::True,
            "false" => Token::False,
            name => Token::Identifier(name.to_string()),
        }
    }

    /// Quoted names allow spaces, `"has a ticket"`, and the escapes `\\`,
    /// `\"` and `\n`.
    fn lex_quoted(&mut self) -> Result<Token, LexError> {
        let (line, column) = (self.line, self.column);
        self.advance(1);
        let mut content = String::new();

        while let Some(ch) = self.peek_char() {
            match ch {
                '"' => {
                    self.advance(1);
                    if content.is_empty() {
                        return Err(LexError {
                            message: "empty fluent name".to_string(),
                            line,
                            column,
                        });
                    }
                    return Ok(Token::Identifier(content));
                }
                '\\' => {
                    let (escape_line, escape_column) = (self.line, self.column);
                    self.advance(1);
                    let unescaped = match self.peek_char() {
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('n') => '\n',
                        _ => {
                            return Err(LexError {
                                message: "invalid escape in quoted name".to_string(),
                                line: escape_line,
                                column: escape_column,
                            })
                        }
                    };
                    self.advance(1);
                    content.push(unescaped);
                }
                '\n' => break,
                _ => {
                    self.advance(ch.len_utf8());
                    content.push(ch);
                }
            }
        }

        Err(LexError {
            message: "unterminated quoted name".to_string(),
            line,
            column,
        })
    }
}

/// Lexer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lex = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lex.next_token().expect("token");
            if tok == Token::Eof {
                return out;
            }
            out.push(tok);
        }
    }

    #[test]
    fn test_lex_ascii_and_unicode_ops() {
        let got = tokens("~p ∧ q | r -> s <-> ¬t");
        let expected = vec![
            Token::Not,
            Token::Identifier("p".to_string()),
            Token::And,
            Token::Identifier("q".to_string()),
            Token::Or,
            Token::Identifier("r".to_string()),
            Token::Implies,
            Token::Identifier("s".to_string()),
            Token::Iff,
            Token::Not,
            Token::Identifier("t".to_string()),
        ];
        assert_eq!(got, expected);
    }

    #[test]
    fn test_lex_keywords_and_case() {
        assert_eq!(
            tokens("true False Loaded"),
            vec![
                Token::True,
                Token::Identifier("False".to_string()),
                Token::Identifier("Loaded".to_string())
            ]
        );
    }

    #[test]
    fn test_lex_quoted_name() {
        assert_eq!(
            tokens("\"has money\" & x"),
            vec![
                Token::Identifier("has money".to_string()),
                Token::And,
                Token::Identifier("x".to_string())
            ]
        );
    }

    #[test]
    fn test_lex_quoted_escapes() {
        assert_eq!(
            tokens(r#""say \"hi\"" | "a\\b\nc""#),
            vec![
                Token::Identifier("say \"hi\"".to_string()),
                Token::Or,
                Token::Identifier("a\\b\nc".to_string())
            ]
        );
        let mut lex = Lexer::new(r#""bad \q""#);
        let err = lex.next_token().unwrap_err();
        assert_eq!((err.line, err.column), (1, 6));
    }

    #[test]
    fn test_lex_comments_are_skipped() {
        assert_eq!(tokens("// comment\np"), vec![Token::Identifier("p".to_string())]);
    }

    #[test]
    fn test_lex_unterminated_quote() {
        let mut lex = Lexer::new("a & \"open");
        lex.next_token().unwrap();
        lex.next_token().unwrap();
        let err = lex.next_token().unwrap_err();
        assert_eq!(err.column, 5);
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_lex_rejects_stray_character() {
        let mut lex = Lexer::new("a $ b");
        lex.next_token().unwrap();
        let err = lex.next_token().unwrap_err();
        assert_eq!((err.line, err.column), (1, 3));
    }
}
