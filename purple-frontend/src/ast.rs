//! Expression tree
//!
//! A parsed program is a single expression: constant leaves joined by
//! binary operators. The tree owns its children and is never mutated after
//! parsing.

use purple_common::{Number, SourceLocation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Exponent,
}

impl BinaryOp {
    /// Binding power used by the precedence-climbing parser
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Subtract => 10,
            BinaryOp::Multiply | BinaryOp::Divide => 20,
            BinaryOp::Exponent => 30,
        }
    }

    pub fn is_right_associative(self) -> bool {
        matches!(self, BinaryOp::Exponent)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Exponent => "**",
        };
        write!(f, "{op_str}")
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Constant leaf
    Number {
        value: Number,
        location: SourceLocation,
    },

    /// Operator applied to two subtrees
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn number(value: i32, location: SourceLocation) -> Self {
        Expr::Number {
            value: Number::Int32(value),
            location,
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Expr::Number { .. })
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Expr::Number { .. } => 1,
            Expr::Binary { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Operator levels above the deepest leaf (a bare constant has depth 0)
    pub fn depth(&self) -> usize {
        match self {
            Expr::Number { .. } => 0,
            Expr::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Fully parenthesised rendering, used in logs and tests
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number { value, .. } => write!(f, "{value}"),
            Expr::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}
