//! Binary expression parsing with operator precedence

use crate::ast::{BinaryOp, Expr};
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser, MAX_EXPRESSION_DEPTH, MAX_NESTING_DEPTH};

impl Parser {
    /// Parse a binary expression whose operators all bind at least as tightly as `min_precedence`
    pub fn parse_binary_expression(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        self.parse_binary_with_depth(min_precedence).map(|(expr, _)| expr)
    }

    /// Same as `parse_binary_expression`, also returning the tree depth
    fn parse_binary_with_depth(
        &mut self,
        min_precedence: u8,
    ) -> Result<(Expr, usize), ParseError> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_NESTING_DEPTH,
                location: self.current_location(),
            });
        }
        self.nesting += 1;

        let (mut left, mut depth) = self.parse_primary_expression()?;

        while let Some(op) = self.peek_binary_operator() {
            if op.precedence() < min_precedence {
                break;
            }
            let location = self.current_location();
            self.advance();

            let next_min = if op.is_right_associative() {
                op.precedence()
            } else {
                op.precedence() + 1
            };
            let (right, right_depth) = self.parse_binary_with_depth(next_min)?;

            depth = 1 + depth.max(right_depth);
            if depth > MAX_EXPRESSION_DEPTH {
                return Err(ParseError::TooDeep {
                    limit: MAX_EXPRESSION_DEPTH,
                    location,
                });
            }
            left = Expr::binary(op, left, right);
        }

        self.nesting -= 1;
        Ok((left, depth))
    }

    /// Parse an integer literal or a parenthesised expression
    fn parse_primary_expression(&mut self) -> Result<(Expr, usize), ParseError> {
        let token = match self.advance() {
            Some(token) => token,
            None => {
                return Err(ParseError::UnexpectedEndOfFile {
                    expected: "expression".to_string(),
                    location: self.eof_location.clone(),
                })
            }
        };

        match token.token_type {
            TokenType::IntLiteral(value) => Ok((Expr::number(value, token.location), 0)),
            TokenType::LeftParen => {
                let inner = self.parse_binary_with_depth(0)?;
                self.expect(TokenType::RightParen, "parenthesised expression")?;
                Ok(inner)
            }
            TokenType::EndOfFile => Err(ParseError::UnexpectedEndOfFile {
                expected: "expression".to_string(),
                location: token.location,
            }),
            _ => Err(ParseError::UnexpectedToken {
                expected: "integer literal or (".to_string(),
                found: token,
            }),
        }
    }

    /// Map the current token to a binary operator without consuming it
    fn peek_binary_operator(&self) -> Option<BinaryOp> {
        match self.peek().map(|t| &t.token_type) {
            Some(TokenType::Plus) => Some(BinaryOp::Add),
            Some(TokenType::Minus) => Some(BinaryOp::Subtract),
            Some(TokenType::Star) => Some(BinaryOp::Multiply),
            Some(TokenType::Slash) => Some(BinaryOp::Divide),
            Some(TokenType::Exponent) => Some(BinaryOp::Exponent),
            _ => None,
        }
    }
}
