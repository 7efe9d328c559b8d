//! Purple Precedence-Climbing Parser
//!
//! Parses a token stream into a single expression tree.
//!
//! ```text
//! program    := [ "print" ] expression [ ";" ] EOF
//! expression := primary ( binop expression )*     -- precedence climbing
//! primary    := INTEGER | "(" expression ")"
//! ```

pub mod errors;
pub mod expressions;

use crate::ast::Expr;
use crate::lexer::{Token, TokenType};
use log::debug;
use purple_common::{CompilerError, SourceLocation};
use std::collections::VecDeque;

pub use errors::ParseError;

/// Deepest recursion the parser allows (parentheses and right-associative runs)
pub const MAX_NESTING_DEPTH: usize = 256;

/// Deepest expression tree accepted, counted in operator levels
pub const MAX_EXPRESSION_DEPTH: usize = 8192;

/// Purple parser
pub struct Parser {
    pub(crate) tokens: VecDeque<Token>,
    /// Where the input ends, for errors raised after the last token
    pub(crate) eof_location: SourceLocation,
    /// Current recursion depth of `parse_binary_expression`
    pub(crate) nesting: usize,
}

impl Parser {
    /// Create a new parser
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof_location = tokens
            .last()
            .map(|t| t.location.clone())
            .unwrap_or_else(SourceLocation::dummy);

        Self {
            tokens: tokens.into(),
            eof_location,
            nesting: 0,
        }
    }

    /// Peek at current token without consuming
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    /// Get current token and advance
    pub(crate) fn advance(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// Check if current token matches expected type
    pub(crate) fn check(&self, token_type: &TokenType) -> bool {
        match self.peek() {
            Some(token) => {
                std::mem::discriminant(&token.token_type) == std::mem::discriminant(token_type)
            }
            None => matches!(token_type, TokenType::EndOfFile),
        }
    }

    /// Location of the next token, or of the end of input
    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek()
            .map(|t| t.location.clone())
            .unwrap_or_else(|| self.eof_location.clone())
    }

    /// Consume token if it matches expected type
    pub(crate) fn match_token(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect and consume a specific token type
    pub(crate) fn expect(
        &mut self,
        token_type: TokenType,
        context: &str,
    ) -> Result<Token, ParseError> {
        match self.advance() {
            Some(token)
                if token.token_type == TokenType::EndOfFile
                    && token_type != TokenType::EndOfFile =>
            {
                Err(ParseError::UnexpectedEndOfFile {
                    expected: format!("{} in {}", token_type, context),
                    location: token.location,
                })
            }
            Some(token) => {
                let expected = std::mem::discriminant(&token_type);
                if std::mem::discriminant(&token.token_type) == expected {
                    Ok(token)
                } else {
                    Err(ParseError::UnexpectedToken {
                        expected: format!("{} in {}", token_type, context),
                        found: token,
                    })
                }
            }
            None => Err(ParseError::UnexpectedEndOfFile {
                expected: format!("{} in {}", token_type, context),
                location: self.eof_location.clone(),
            }),
        }
    }

    /// Parse a complete program: one optionally printed, optionally terminated expression
    pub fn parse_program(&mut self) -> Result<Expr, CompilerError> {
        self.match_token(&TokenType::Print);

        let expr = self.parse_binary_expression(0)?;

        self.match_token(&TokenType::Semicolon);
        if !self.check(&TokenType::EndOfFile) {
            self.expect(TokenType::EndOfFile, "program")?;
        }

        debug!("Parsed expression {expr}");
        Ok(expr)
    }
}

#[cfg(test)]
mod tests;
