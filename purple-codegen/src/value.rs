//! Value representations threaded through translation

use purple_common::{Number, NumberKind, RegisterId};
use std::fmt;

/// Result of translating one subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// Immediate constant, not yet stored anywhere
    Constant(Number),

    /// Register holding a materialized value, usable directly as an operand
    Register { id: RegisterId, kind: NumberKind },

    /// Register holding the address of a storage slot; must be loaded before use
    Pointer { slot: RegisterId, kind: NumberKind },
}

impl Value {
    pub fn register(id: RegisterId, kind: NumberKind) -> Self {
        Value::Register { id, kind }
    }

    pub fn pointer(slot: RegisterId, kind: NumberKind) -> Self {
        Value::Pointer { slot, kind }
    }

    pub fn kind(&self) -> NumberKind {
        match self {
            Value::Constant(number) => number.kind(),
            Value::Register { kind, .. } | Value::Pointer { kind, .. } => *kind,
        }
    }

    /// The slot this value occupies, if it lives in storage
    pub fn slot(&self) -> Option<RegisterId> {
        match self {
            Value::Pointer { slot, .. } => Some(*slot),
            Value::Constant(_) | Value::Register { .. } => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Constant(number) => write!(f, "{number}"),
            Value::Register { id, .. } => write!(f, "%{id}"),
            Value::Pointer { slot, .. } => write!(f, "*%{slot}"),
        }
    }
}
