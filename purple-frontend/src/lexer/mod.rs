//! Purple Scanner
//!
//! Tokenizes Purple source code into a stream of tokens.
//! Handles operators, integer literals, and the `print` keyword.

pub mod token;
pub mod literals;

pub use token::{Token, TokenType};

use log::trace;
use purple_common::source_loc::SourceTracker;
use purple_common::{CompilerError, SourceLocation};

/// Longest identifier the scanner accepts
pub const MAX_IDENTIFIER_LENGTH: usize = 32;

/// Purple scanner
pub struct Lexer {
    pub(crate) input: Vec<char>,
    pub(crate) position: usize,
    pub(crate) tracker: SourceTracker,
}

impl Lexer {
    /// Create a new lexer over `input`, reporting locations against `filename`
    pub fn new(input: &str, filename: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            tracker: SourceTracker::new(filename),
        }
    }

    /// Get current character
    pub(crate) fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Advance to next character
    pub(crate) fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.position += 1;
        self.tracker.advance(ch);
        Some(ch)
    }

    /// Get current location
    pub(crate) fn current_location(&self) -> SourceLocation {
        self.tracker.location()
    }

    /// Build a syntax error at the current position
    pub(crate) fn error(&self, message: String) -> CompilerError {
        CompilerError::syntax_error(message, self.current_location())
    }

    /// Skip space, tab, newline, carriage return and form feed
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if matches!(ch, ' ' | '\t' | '\n' | '\r' | '\u{000C}') {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Get next token
    pub fn next_token(&mut self) -> Result<Token, CompilerError> {
        self.skip_whitespace();

        let start_location = self.current_location();

        let token_type = match self.current_char() {
            None => TokenType::EndOfFile,

            Some(ch) if ch.is_ascii_digit() => self.tokenize_integer()?,

            Some(ch) if is_identifier_char(ch, 0) => self.tokenize_keyword()?,

            Some('+') => {
                self.advance();
                TokenType::Plus
            }
            Some('-') => {
                self.advance();
                TokenType::Minus
            }
            Some('*') => {
                self.advance();
                if self.current_char() == Some('*') {
                    self.advance();
                    TokenType::Exponent
                } else {
                    TokenType::Star
                }
            }
            Some('/') => {
                self.advance();
                TokenType::Slash
            }
            Some('(') => {
                self.advance();
                TokenType::LeftParen
            }
            Some(')') => {
                self.advance();
                TokenType::RightParen
            }
            Some(';') => {
                self.advance();
                TokenType::Semicolon
            }

            Some(ch) => {
                return Err(self.error(format!("Unrecognized token \"{ch}\"")));
            }
        };

        trace!("token {} at {}", token_type, start_location);
        Ok(Token::new(token_type, start_location))
    }

    /// Tokenize the whole input, ending with an EndOfFile token
    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompilerError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.token_type, TokenType::EndOfFile);
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }
}

/// Letters, `_` and `$` anywhere; digits anywhere but the first position
pub(crate) fn is_identifier_char(ch: char, index: usize) -> bool {
    (index != 0 && ch.is_ascii_digit()) || ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}
