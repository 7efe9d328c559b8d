//! Parser tests

use crate::ast::{BinaryOp, Expr};
use crate::parser::{MAX_EXPRESSION_DEPTH, MAX_NESTING_DEPTH};
use crate::Frontend;
use purple_common::CompilerError;

fn parse(source: &str) -> Expr {
    Frontend::parse_source(source, "test.prp").unwrap()
}

fn parse_err(source: &str) -> CompilerError {
    Frontend::parse_source(source, "test.prp").unwrap_err()
}

#[test]
fn test_single_constant() {
    let expr = parse("42");
    assert!(expr.is_leaf());
    assert_eq!(expr.to_string(), "42");
}

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(parse("1 + 2 * 3").to_string(), "(1 + (2 * 3))");
    assert_eq!(parse("1 * 2 + 3").to_string(), "((1 * 2) + 3)");
}

#[test]
fn test_left_associativity() {
    assert_eq!(parse("10 - 2 - 3").to_string(), "((10 - 2) - 3)");
    assert_eq!(parse("20 / 4 / 5").to_string(), "((20 / 4) / 5)");
}

#[test]
fn test_exponent_is_right_associative() {
    assert_eq!(parse("2 ** 3 ** 2").to_string(), "(2 ** (3 ** 2))");
    assert_eq!(parse("2 * 3 ** 2").to_string(), "(2 * (3 ** 2))");
}

#[test]
fn test_parentheses_override_precedence() {
    let expr = parse("(3 + 4) * 2");
    assert_eq!(expr.to_string(), "((3 + 4) * 2)");

    match expr {
        Expr::Binary { op, left, right } => {
            assert_eq!(op, BinaryOp::Multiply);
            assert!(!left.is_leaf());
            assert!(right.is_leaf());
        }
        other => panic!("expected binary node, got {other:?}"),
    }
}

#[test]
fn test_print_statement_form() {
    assert_eq!(parse("print 6 * 7;").to_string(), "(6 * 7)");
    assert_eq!(parse("6 * 7;").to_string(), "(6 * 7)");
}

#[test]
fn test_leaf_locations() {
    let expr = parse("1 +\n  2");
    match expr {
        Expr::Binary { right, .. } => match *right {
            Expr::Number { location, .. } => {
                assert_eq!(location.line, 2);
                assert_eq!(location.column, 3);
            }
            other => panic!("expected leaf, got {other:?}"),
        },
        other => panic!("expected binary node, got {other:?}"),
    }
}

#[test]
fn test_missing_operand() {
    let err = parse_err("1 +");
    assert!(matches!(err, CompilerError::Syntax { .. }));
    assert!(err.to_string().contains("Unexpected end of file"));
}

#[test]
fn test_unclosed_parenthesis() {
    let err = parse_err("(1 + 2");
    assert!(err.to_string().contains("Unexpected end of file"));
    assert!(err.to_string().contains(")"));
}

#[test]
fn test_trailing_tokens() {
    let err = parse_err("1 + 2 3");
    match err {
        CompilerError::Syntax { location, message } => {
            assert_eq!(location.column, 7);
            assert!(message.contains("found 3"));
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_operator_in_primary_position() {
    let err = parse_err("* 2");
    assert!(err.to_string().contains("Expected integer literal or ("));
}

#[test]
fn test_empty_program() {
    let err = parse_err("");
    assert!(matches!(err, CompilerError::Syntax { .. }));
}

#[test]
fn test_parenthesis_nesting_limit() {
    let open = "(".repeat(MAX_NESTING_DEPTH - 1);
    let close = ")".repeat(MAX_NESTING_DEPTH - 1);
    assert!(parse(&format!("{open}1{close}")).is_leaf());

    let deep = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
    match parse_err(&deep) {
        CompilerError::Syntax { location, message } => {
            assert_eq!(location.line, 1);
            assert_eq!(location.column as usize, MAX_NESTING_DEPTH + 1);
            assert!(message.contains("deeper than 256"));
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_right_associative_run_is_capped() {
    let run = vec!["2"; MAX_NESTING_DEPTH + 10].join(" ** ");
    assert!(matches!(parse_err(&run), CompilerError::Syntax { .. }));
}

#[test]
fn test_expression_depth_limit() {
    // walking and dropping a tree this deep is recursive
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let at_limit = vec!["1"; MAX_EXPRESSION_DEPTH + 1].join(" + ");
            assert_eq!(parse(&at_limit).leaf_count(), MAX_EXPRESSION_DEPTH + 1);

            let over = vec!["1"; MAX_EXPRESSION_DEPTH + 2].join(" + ");
            let err = parse_err(&over);
            assert!(matches!(err, CompilerError::Syntax { .. }));
            assert!(err.to_string().contains("deeper than 8192"));
        })
        .unwrap();
    handle.join().unwrap();
}
