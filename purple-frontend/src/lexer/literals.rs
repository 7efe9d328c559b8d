//! Literal and keyword scanning
//!
//! Integer literals are decimal and must fit in a signed 32-bit integer.
//! The only word the language knows is `print`; any other identifier is
//! rejected here.

use crate::lexer::{is_identifier_char, Lexer, TokenType, MAX_IDENTIFIER_LENGTH};
use purple_common::CompilerError;

impl Lexer {
    /// Tokenize a decimal integer literal
    pub fn tokenize_integer(&mut self) -> Result<TokenType, CompilerError> {
        let mut number = String::new();

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let value = number.parse::<i32>().map_err(|_| {
            self.error(format!(
                "Integer literal {number} does not fit in a 32-bit signed integer"
            ))
        })?;

        Ok(TokenType::IntLiteral(value))
    }

    /// Tokenize a keyword, rejecting identifiers the language does not define
    pub fn tokenize_keyword(&mut self) -> Result<TokenType, CompilerError> {
        let mut identifier = String::new();

        while let Some(ch) = self.current_char() {
            if !is_identifier_char(ch, identifier.len()) {
                break;
            }
            if identifier.len() >= MAX_IDENTIFIER_LENGTH - 1 {
                return Err(self.error(format!(
                    "Identifier name has exceeded maximum length of {MAX_IDENTIFIER_LENGTH}"
                )));
            }
            identifier.push(ch);
            self.advance();
        }

        match identifier.as_str() {
            "print" => Ok(TokenType::Print),
            _ => Err(self.error(format!("Unrecognized identifier \"{identifier}\""))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{Lexer, TokenType};
    use purple_common::CompilerError;

    #[test]
    fn test_integer_bounds() {
        let mut lexer = Lexer::new("2147483647", "t.prp");
        assert_eq!(
            lexer.next_token().unwrap().token_type,
            TokenType::IntLiteral(i32::MAX)
        );

        let mut lexer = Lexer::new("2147483648", "t.prp");
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, CompilerError::Syntax { .. }));
        assert!(err.to_string().contains("2147483648"));
    }

    #[test]
    fn test_leading_zeros() {
        let mut lexer = Lexer::new("007", "t.prp");
        assert_eq!(lexer.next_token().unwrap().token_type, TokenType::IntLiteral(7));
    }

    #[test]
    fn test_unknown_identifier() {
        let mut lexer = Lexer::new("printf", "t.prp");
        let err = lexer.next_token().unwrap_err();
        assert!(err.to_string().contains("Unrecognized identifier \"printf\""));
    }

    #[test]
    fn test_identifier_length_limit() {
        let long = "a".repeat(40);
        let mut lexer = Lexer::new(&long, "t.prp");
        let err = lexer.next_token().unwrap_err();
        assert!(err.to_string().contains("maximum length of 32"));
    }

    #[test]
    fn test_keyword_stops_at_operator() {
        let mut lexer = Lexer::new("print+", "t.prp");
        assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Print);
        assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Plus);
    }
}
