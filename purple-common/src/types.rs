//! Numeric kinds shared by the frontend and the code generator
//!
//! Each kind has one row in `NUMBER_FORMATS`. Emission code only ever asks
//! the table for sizes, alignment and spellings, so adding a kind means
//! adding a variant and a row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Register/slot handle number used in the emitted IR (`%N`)
pub type RegisterId = u32;

/// Numeric kinds supported by the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberKind {
    /// Signed 32-bit integer
    Int32,
}

/// Per-kind layout and spelling information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub kind: NumberKind,
    /// Size in bytes
    pub byte_size: u32,
    /// Required alignment in bytes
    pub align: u32,
    /// printf conversion used to print a value of this kind
    pub format_spec: &'static str,
    /// Spelling of the type in the emitted IR
    pub llvm_type: &'static str,
}

/// Lookup table indexed by `NumberKind`
pub const NUMBER_FORMATS: [NumberFormat; 1] = [NumberFormat {
    kind: NumberKind::Int32,
    byte_size: 4,
    align: 4,
    format_spec: "%d",
    llvm_type: "i32",
}];

impl NumberKind {
    /// Table row for this kind
    pub fn format(self) -> &'static NumberFormat {
        &NUMBER_FORMATS[self as usize]
    }

    pub fn byte_size(self) -> u32 {
        self.format().byte_size
    }

    pub fn align(self) -> u32 {
        self.format().align
    }

    pub fn llvm_type(self) -> &'static str {
        self.format().llvm_type
    }

    pub fn format_spec(self) -> &'static str {
        self.format().format_spec
    }
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberKind::Int32 => write!(f, "int32"),
        }
    }
}

/// A constant number together with its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Number {
    Int32(i32),
}

impl Number {
    pub fn kind(&self) -> NumberKind {
        match self {
            Number::Int32(_) => NumberKind::Int32,
        }
    }
}

/// Renders the literal bit pattern as it appears in a store instruction
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int32(v) => write!(f, "{v}"),
        }
    }
}
