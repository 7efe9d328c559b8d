//! Error handling for the Purple compiler
//!
//! Every failure is fatal. What differs between them is the category,
//! which decides the process exit status reported by the driver.

use crate::source_loc::SourceLocation;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Process exit statuses, one per error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ReturnCode {
    Ok = 0,
    Error = 1,
    SyntaxError = 2,
    ResourceError = 3,
    CompilerError = 4,
    ToolchainError = 5,
}

impl ReturnCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnCode::Ok => write!(f, "ok"),
            ReturnCode::Error => write!(f, "error"),
            ReturnCode::SyntaxError => write!(f, "syntax error"),
            ReturnCode::ResourceError => write!(f, "resource error"),
            ReturnCode::CompilerError => write!(f, "compiler error"),
            ReturnCode::ToolchainError => write!(f, "toolchain error"),
        }
    }
}

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Syntax error at {location}: {message}")]
    Syntax {
        location: SourceLocation,
        message: String,
    },

    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Internal compiler error: {message}")]
    Internal { message: String },

    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    #[error("Toolchain error: {message}")]
    Toolchain { message: String },
}

impl CompilerError {
    /// Create a syntax error
    pub fn syntax_error(message: String, location: SourceLocation) -> Self {
        CompilerError::Syntax { location, message }
    }

    /// Create an internal error (a defect in the translation pipeline)
    pub fn internal_error(message: String) -> Self {
        CompilerError::Internal { message }
    }

    /// Create an unsupported-construct error
    pub fn unsupported(message: String) -> Self {
        CompilerError::Unsupported { message }
    }

    /// Create a toolchain error
    pub fn toolchain_error(message: String) -> Self {
        CompilerError::Toolchain { message }
    }

    /// Wrap an IO failure on a specific file
    pub fn io_error(path: &Path, err: std::io::Error) -> Self {
        CompilerError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Exit status the driver reports for this error
    pub fn return_code(&self) -> ReturnCode {
        match self {
            CompilerError::Syntax { .. } => ReturnCode::SyntaxError,
            CompilerError::Io { .. } => ReturnCode::ResourceError,
            CompilerError::Internal { .. } | CompilerError::Unsupported { .. } => {
                ReturnCode::CompilerError
            }
            CompilerError::Toolchain { .. } => ReturnCode::ToolchainError,
        }
    }
}
