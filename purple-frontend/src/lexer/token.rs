//! Token definitions for the Purple scanner
//!
//! This module defines token types and the Token struct.

use purple_common::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Purple token types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenType {
    // Literals
    IntLiteral(i32),

    // Keywords
    Print,

    // Operators
    Plus,           // +
    Minus,          // -
    Star,           // *
    Exponent,       // **
    Slash,          // /

    // Delimiters
    LeftParen,      // (
    RightParen,     // )
    Semicolon,      // ;

    // Special
    EndOfFile,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::IntLiteral(n) => write!(f, "{n}"),
            TokenType::Print => write!(f, "print"),
            TokenType::Plus => write!(f, "+"),
            TokenType::Minus => write!(f, "-"),
            TokenType::Star => write!(f, "*"),
            TokenType::Exponent => write!(f, "**"),
            TokenType::Slash => write!(f, "/"),
            TokenType::LeftParen => write!(f, "("),
            TokenType::RightParen => write!(f, ")"),
            TokenType::Semicolon => write!(f, ";"),
            TokenType::EndOfFile => write!(f, "EOF"),
        }
    }
}

/// A token with location information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: TokenType,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(token_type: TokenType, location: SourceLocation) -> Self {
        Self { token_type, location }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.token_type, self.location)
    }
}
