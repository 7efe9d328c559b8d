//! Purple Compiler - Frontend
//!
//! This crate provides the frontend components for the Purple compiler:
//! - Lexer: tokenizes source code
//! - Parser: builds the expression tree from tokens
//! - AST: expression tree definitions

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{BinaryOp, Expr};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{ParseError, Parser};

use log::debug;
use purple_common::CompilerError;

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Parse Purple source code into an expression tree
    pub fn parse_source(source: &str, filename: &str) -> Result<Expr, CompilerError> {
        // Tokenize
        let mut lexer = Lexer::new(source, filename);
        let tokens = lexer.tokenize()?;
        debug!("Scanned {} tokens from {}", tokens.len(), filename);

        // Parse
        let mut parser = Parser::new(tokens);
        parser.parse_program()
    }
}
