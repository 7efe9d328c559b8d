//! Parse error types for the Purple parser
//!
//! This module defines all error types that can occur during parsing.

use crate::lexer::Token;
use purple_common::{CompilerError, SourceLocation};
use thiserror::Error;

/// Parse error types specific to the parser
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("Expected {expected}, found {}", found.token_type)]
    UnexpectedToken { expected: String, found: Token },

    #[error("Unexpected end of file, expected {expected}")]
    UnexpectedEndOfFile {
        expected: String,
        location: SourceLocation,
    },

    #[error("Expression nests deeper than {limit} levels")]
    TooDeep {
        limit: usize,
        location: SourceLocation,
    },
}

impl ParseError {
    fn location(&self) -> SourceLocation {
        match self {
            ParseError::UnexpectedToken { found, .. } => found.location.clone(),
            ParseError::UnexpectedEndOfFile { location, .. }
            | ParseError::TooDeep { location, .. } => location.clone(),
        }
    }
}

impl From<ParseError> for CompilerError {
    fn from(err: ParseError) -> Self {
        CompilerError::syntax_error(err.to_string(), err.location())
    }
}
